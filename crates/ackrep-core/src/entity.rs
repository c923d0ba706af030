//! Typed catalog entities.
//!
//! An [`Entity`] is the generic metadata every knowledge entity carries
//! ([`CommonFields`]) plus one member of the closed [`EntityVariant`] set with
//! that type's own fields. Entities are built from parsed descriptors by
//! [`EntityFactory`](crate::EntityFactory) and never mutated by the catalog.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ackrep_common_core::EntityKey;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::CatalogError;
use crate::template::TemplateContext;

/// Date format used in descriptors.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The closed set of entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    ProblemClass,
    ProblemSpecification,
    ProblemSolution,
    Method,
    Doc,
    Dataset,
    Comment,
}

impl EntityKind {
    /// Every kind, in catalog order.
    pub const ALL: [EntityKind; 7] = [
        Self::ProblemClass,
        Self::ProblemSpecification,
        Self::ProblemSolution,
        Self::Method,
        Self::Doc,
        Self::Dataset,
        Self::Comment,
    ];

    /// Type tag as written in descriptors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProblemClass => "problem_class",
            Self::ProblemSpecification => "problem_specification",
            Self::ProblemSolution => "problem_solution",
            Self::Method => "method",
            Self::Doc => "doc",
            Self::Dataset => "dataset",
            Self::Comment => "comment",
        }
    }

    /// Descriptor keys specific to this kind, in canonical order.
    pub fn variant_fields(&self) -> &'static [&'static str] {
        match self {
            Self::ProblemSpecification => &["problemclass_list", "problem_file"],
            Self::ProblemSolution => &[
                "solved_problem_list",
                "method_package_list",
                "compatible_environment",
                "estimated_runtime",
                "solution_file",
                "postprocessing_file",
            ],
            Self::Method => &["compatible_environment", "implemented_methods"],
            Self::Comment => &["comment_file"],
            Self::ProblemClass | Self::Doc | Self::Dataset => &[],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownEntityType {
                path: None,
                type_name: s.to_string(),
            })
    }
}

/// Metadata shared by every entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonFields {
    pub key: EntityKey,
    pub name: String,
    pub short_description: String,
    pub version: String,
    pub tags: Vec<String>,
    pub creator: String,
    pub editors: Vec<String>,
    pub creation_date: Option<NaiveDate>,
    pub related_docs: Vec<String>,
    pub related_datasets: Vec<String>,
    pub external_references: Vec<String>,
    pub notes: String,
}

impl CommonFields {
    /// Empty metadata for `key`.
    pub fn new(key: EntityKey) -> Self {
        Self {
            key,
            name: String::new(),
            short_description: String::new(),
            version: String::new(),
            tags: Vec::new(),
            creator: String::new(),
            editors: Vec::new(),
            creation_date: None,
            related_docs: Vec::new(),
            related_datasets: Vec::new(),
            external_references: Vec::new(),
            notes: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProblemSpecification {
    pub problemclass_list: Vec<String>,
    pub problem_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProblemSolution {
    pub solved_problem_list: Vec<String>,
    pub method_package_list: Vec<String>,
    pub compatible_environment: String,
    pub estimated_runtime: String,
    /// Path of the solution script, relative to the entity directory.
    pub solution_file: String,
    pub postprocessing_file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodPackage {
    pub compatible_environment: String,
    pub implemented_methods: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub comment_file: String,
}

/// Type-specific part of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityVariant {
    ProblemClass,
    ProblemSpecification(ProblemSpecification),
    ProblemSolution(ProblemSolution),
    Method(MethodPackage),
    Doc,
    Dataset,
    Comment(Comment),
}

impl EntityVariant {
    /// Variant with default fields for `kind`.
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::ProblemClass => Self::ProblemClass,
            EntityKind::ProblemSpecification => {
                Self::ProblemSpecification(ProblemSpecification::default())
            }
            EntityKind::ProblemSolution => Self::ProblemSolution(ProblemSolution::default()),
            EntityKind::Method => Self::Method(MethodPackage::default()),
            EntityKind::Doc => Self::Doc,
            EntityKind::Dataset => Self::Dataset,
            EntityKind::Comment => Self::Comment(Comment::default()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::ProblemClass => EntityKind::ProblemClass,
            Self::ProblemSpecification(_) => EntityKind::ProblemSpecification,
            Self::ProblemSolution(_) => EntityKind::ProblemSolution,
            Self::Method(_) => EntityKind::Method,
            Self::Doc => EntityKind::Doc,
            Self::Dataset => EntityKind::Dataset,
            Self::Comment(_) => EntityKind::Comment,
        }
    }

    fn write_fields(&self, m: &mut Mapping) {
        match self {
            Self::ProblemSpecification(spec) => {
                put(m, "problemclass_list", list(&spec.problemclass_list));
                put(m, "problem_file", text(&spec.problem_file));
            }
            Self::ProblemSolution(sol) => {
                put(m, "solved_problem_list", list(&sol.solved_problem_list));
                put(m, "method_package_list", list(&sol.method_package_list));
                put(m, "compatible_environment", text(&sol.compatible_environment));
                put(m, "estimated_runtime", text(&sol.estimated_runtime));
                put(m, "solution_file", text(&sol.solution_file));
                put(m, "postprocessing_file", text(&sol.postprocessing_file));
            }
            Self::Method(method) => {
                put(m, "compatible_environment", text(&method.compatible_environment));
                put(m, "implemented_methods", list(&method.implemented_methods));
            }
            Self::Comment(comment) => put(m, "comment_file", text(&comment.comment_file)),
            Self::ProblemClass | Self::Doc | Self::Dataset => {}
        }
    }
}

/// A catalog entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    #[serde(flatten)]
    pub common: CommonFields,
    #[serde(flatten)]
    pub variant: EntityVariant,
    /// Absolute directory holding the entity's descriptor; empty until loaded.
    pub base_path: PathBuf,
}

impl Entity {
    /// New entity with default metadata.
    pub fn new(key: EntityKey, kind: EntityKind) -> Self {
        Self {
            common: CommonFields::new(key),
            variant: EntityVariant::empty(kind),
            base_path: PathBuf::new(),
        }
    }

    /// Set the descriptor directory.
    #[must_use]
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn key(&self) -> &EntityKey {
        &self.common.key
    }

    pub fn kind(&self) -> EntityKind {
        self.variant.kind()
    }

    pub fn name(&self) -> &str {
        &self.common.name
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Descriptor mapping in canonical key order.
    ///
    /// Generic keys come first, followed by the variant's own keys. Unset
    /// values are written as empty strings, empty lists or null dates.
    pub fn to_mapping(&self) -> Mapping {
        let c = &self.common;
        let mut m = Mapping::new();
        put(&mut m, "pk", text(c.key.as_str()));
        put(&mut m, "type", text(self.kind().as_str()));
        put(&mut m, "name", text(&c.name));
        put(&mut m, "short_description", text(&c.short_description));
        put(&mut m, "version", text(&c.version));
        put(&mut m, "tags", list(&c.tags));
        put(&mut m, "creator", text(&c.creator));
        put(&mut m, "editors", list(&c.editors));
        let date = c
            .creation_date
            .map(|d| text(&d.format(DATE_FORMAT).to_string()))
            .unwrap_or(Value::Null);
        put(&mut m, "creation_date", date);
        put(&mut m, "related_docs", list(&c.related_docs));
        put(&mut m, "related_datasets", list(&c.related_datasets));
        put(&mut m, "external_references", list(&c.external_references));
        put(&mut m, "notes", text(&c.notes));
        self.variant.write_fields(&mut m);
        m
    }

    /// Render context holding every field plus `key` and `base_path`.
    pub fn template_context(&self) -> TemplateContext {
        let mut ctx = TemplateContext::from_mapping(&self.to_mapping());
        ctx.set("key", self.key().as_str());
        ctx.set("base_path", self.base_path.to_string_lossy().as_ref());
        ctx
    }
}

/// Parse a descriptor date: `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn put(m: &mut Mapping, key: &str, value: Value) {
    m.insert(Value::String(key.to_string()), value);
}

fn text(s: &str) -> Value {
    Value::String(s.to_string())
}

fn list(items: &[String]) -> Value {
    Value::Sequence(items.iter().cloned().map(Value::String).collect())
}
