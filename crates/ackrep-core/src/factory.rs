//! Entity construction from parsed descriptors.

use ackrep_common_config::CatalogSchema;
use ackrep_common_core::EntityKey;
use serde_yaml::{Mapping, Value};

use crate::entity::{
    parse_date, Comment, CommonFields, Entity, EntityKind, EntityVariant, MethodPackage,
    ProblemSolution, ProblemSpecification,
};
use crate::error::{CatalogError, Result};

/// Builds typed entities from descriptor mappings.
///
/// Dispatch is on the `type` key only. Unknown keys are ignored and absent
/// ones take the field's empty default, so descriptors written for newer
/// schemas still load.
#[derive(Debug, Clone)]
pub struct EntityFactory {
    accepted: Vec<EntityKind>,
}

impl EntityFactory {
    /// Factory accepting the schema's entity types.
    ///
    /// Fails if the schema lists a type no entity variant exists for.
    pub fn new(schema: &CatalogSchema) -> Result<Self> {
        let accepted = schema
            .entity_types
            .iter()
            .map(|name| name.parse::<EntityKind>())
            .collect::<Result<Vec<_>>>()
            .map_err(|e| CatalogError::Config(e.to_string()))?;
        Ok(Self { accepted })
    }

    /// Whether entities of `kind` can be constructed.
    pub fn accepts(&self, kind: EntityKind) -> bool {
        self.accepted.contains(&kind)
    }

    /// Construct the entity a descriptor mapping declares.
    ///
    /// The returned entity has an empty `base_path`; the caller sets it from
    /// the descriptor's location.
    pub fn construct(&self, mapping: &Mapping) -> Result<Entity> {
        let fields = Fields(mapping);

        let missing: Vec<String> = ["pk", "type"]
            .into_iter()
            .filter(|k| fields.is_blank(k))
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            return Err(CatalogError::missing(missing));
        }

        let type_name = fields.text("type");
        let kind = type_name
            .parse::<EntityKind>()
            .ok()
            .filter(|kind| self.accepts(*kind))
            .ok_or_else(|| CatalogError::UnknownEntityType {
                path: None,
                type_name: type_name.clone(),
            })?;

        let raw_key = fields.text("pk");
        let key = EntityKey::parse(&raw_key)
            .map_err(|e| CatalogError::malformed(format!("invalid pk `{raw_key}`: {e}")))?;

        let common = CommonFields {
            key,
            name: fields.text("name"),
            short_description: fields.text("short_description"),
            version: fields.text("version"),
            tags: fields.list("tags"),
            creator: fields.text("creator"),
            editors: fields.list("editors"),
            creation_date: parse_date(&fields.text("creation_date")),
            related_docs: fields.list("related_docs"),
            related_datasets: fields.list("related_datasets"),
            external_references: fields.list("external_references"),
            notes: fields.text("notes"),
        };

        let variant = match kind {
            EntityKind::ProblemClass => EntityVariant::ProblemClass,
            EntityKind::ProblemSpecification => {
                EntityVariant::ProblemSpecification(ProblemSpecification {
                    problemclass_list: fields.list("problemclass_list"),
                    problem_file: fields.text("problem_file"),
                })
            }
            EntityKind::ProblemSolution => EntityVariant::ProblemSolution(ProblemSolution {
                solved_problem_list: fields.list("solved_problem_list"),
                method_package_list: fields.list("method_package_list"),
                compatible_environment: fields.text("compatible_environment"),
                estimated_runtime: fields.text("estimated_runtime"),
                solution_file: fields.text("solution_file"),
                postprocessing_file: fields.text("postprocessing_file"),
            }),
            EntityKind::Method => EntityVariant::Method(MethodPackage {
                compatible_environment: fields.text("compatible_environment"),
                implemented_methods: fields.list("implemented_methods"),
            }),
            EntityKind::Doc => EntityVariant::Doc,
            EntityKind::Dataset => EntityVariant::Dataset,
            EntityKind::Comment => EntityVariant::Comment(Comment {
                comment_file: fields.text("comment_file"),
            }),
        };

        Ok(Entity {
            common,
            variant,
            base_path: Default::default(),
        })
    }
}

/// Lenient typed reads from a descriptor mapping.
struct Fields<'a>(&'a Mapping);

impl Fields<'_> {
    fn is_blank(&self, key: &str) -> bool {
        self.text(key).trim().is_empty()
    }

    fn text(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(scalar)
                .collect::<Vec<_>>()
                .join(", "),
            Some(value) => scalar(value),
        }
    }

    fn list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Sequence(items)) => items
                .iter()
                .filter(|v| !v.is_null())
                .map(scalar)
                .collect(),
            Some(Value::String(s)) if s.trim().is_empty() => Vec::new(),
            Some(value) => vec![scalar(value)],
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => scalar(&tagged.value),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
