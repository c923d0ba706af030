//! Configuration types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rule::LengthRule;

/// Generic descriptor keys every entity is expected to carry, in canonical order.
pub const GENERIC_FIELDS: [&str; 13] = [
    "pk",
    "type",
    "name",
    "short_description",
    "version",
    "tags",
    "creator",
    "editors",
    "creation_date",
    "related_docs",
    "related_datasets",
    "external_references",
    "notes",
];

/// Entity type tags accepted by default.
pub const ENTITY_TYPES: [&str; 7] = [
    "problem_class",
    "problem_specification",
    "problem_solution",
    "method",
    "doc",
    "dataset",
    "comment",
];

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AckrepConfig {
    /// Catalog schema.
    pub schema: CatalogSchema,
}

/// Schema of the catalog: which keys a descriptor must carry, which entity
/// types may be constructed and how descriptors and templates are located.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSchema {
    /// Keys checked by the required-field sanity check.
    pub required_fields: Vec<String>,
    /// Type tags the entity factory accepts.
    pub entity_types: Vec<String>,
    /// File name of an entity descriptor.
    pub descriptor_filename: String,
    /// Directories whose name contains this marker are not scanned.
    pub template_dir_marker: String,
    /// Substring removed from a template file name to derive its output name.
    pub template_marker_token: String,
    /// Run the required-field sanity check during bulk rebuilds.
    pub check_sanity_on_rebuild: bool,
    /// Soft length rules reported by the field check.
    pub field_rules: BTreeMap<String, LengthRule>,
}

impl Default for CatalogSchema {
    fn default() -> Self {
        let field_rules = [
            ("pk", LengthRule::exact(5)),
            ("name", LengthRule::between(3, 100)),
            ("short_description", LengthRule::shorter_than(500)),
            ("version", LengthRule::between(5, 10)),
            ("creator", LengthRule::between(3, 100)),
        ]
        .into_iter()
        .map(|(field, rule)| (field.to_string(), rule))
        .collect();

        Self {
            required_fields: GENERIC_FIELDS.iter().map(ToString::to_string).collect(),
            entity_types: ENTITY_TYPES.iter().map(ToString::to_string).collect(),
            descriptor_filename: "metadata.yml".to_string(),
            template_dir_marker: "_template".to_string(),
            template_marker_token: "template_".to_string(),
            check_sanity_on_rebuild: false,
            field_rules,
        }
    }
}

impl CatalogSchema {
    /// Whether `file_name` names an entity descriptor.
    pub fn is_descriptor(&self, file_name: &str) -> bool {
        file_name == self.descriptor_filename
    }

    /// Whether `type_name` is an accepted entity type tag.
    pub fn accepts_type(&self, type_name: &str) -> bool {
        self.entity_types.iter().any(|t| t == type_name)
    }

    /// Builder-style toggle for rebuild sanity checks.
    #[must_use]
    pub fn with_sanity_on_rebuild(mut self, enabled: bool) -> Self {
        self.check_sanity_on_rebuild = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_has_generic_fields() {
        let schema = CatalogSchema::default();
        assert_eq!(schema.required_fields.len(), 13);
        assert_eq!(schema.required_fields[0], "pk");
        assert_eq!(schema.entity_types.len(), 7);
        assert!(schema.is_descriptor("metadata.yml"));
        assert!(!schema.is_descriptor("metadata.yaml"));
        assert!(schema.accepts_type("problem_solution"));
        assert!(!schema.accepts_type("system_model"));
        assert!(!schema.check_sanity_on_rebuild);
    }

    #[test]
    fn test_partial_yaml_merges_with_defaults() {
        let yaml = r#"
schema:
  check_sanity_on_rebuild: true
  entity_types: [doc, dataset]
  field_rules:
    name: ">1, <20"
"#;
        let config: AckrepConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.schema.check_sanity_on_rebuild);
        assert_eq!(config.schema.entity_types, vec!["doc", "dataset"]);
        assert_eq!(config.schema.descriptor_filename, "metadata.yml");
        assert_eq!(
            config.schema.field_rules.get("name"),
            Some(&LengthRule::between(1, 20))
        );
        // a given map replaces the default rules entirely
        assert!(config.schema.field_rules.get("pk").is_none());
    }

    #[test]
    fn test_schema_serializes_rules_in_notation() {
        let yaml = serde_yaml::to_string(&AckrepConfig::default()).unwrap();
        assert!(yaml.contains("descriptor_filename: metadata.yml"));
        assert!(yaml.contains(">3, <100"));
    }
}
