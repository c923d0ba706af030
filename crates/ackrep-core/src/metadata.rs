//! Descriptor parsing and serialization.

use std::path::Path;

use ackrep_common_config::CatalogSchema;
use ackrep_common_fs::DEFAULT_MAX_FILE_SIZE;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::entity::parse_date;
use crate::error::{CatalogError, Result};

/// A soft rule violation found by [`MetadataLoader::check_fields`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

/// Reads descriptor files into generic mappings.
///
/// The loader knows nothing about entity types beyond the schema's lists; it
/// only parses text and checks key presence.
#[derive(Debug, Clone)]
pub struct MetadataLoader {
    schema: CatalogSchema,
}

impl MetadataLoader {
    pub fn new(schema: &CatalogSchema) -> Self {
        Self {
            schema: schema.clone(),
        }
    }

    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }

    /// Load a descriptor, optionally checking that every required key exists.
    pub fn load(&self, path: impl AsRef<Path>, check_sanity: bool) -> Result<Mapping> {
        let path = path.as_ref();
        let bytes = ackrep_common_fs::read(path, DEFAULT_MAX_FILE_SIZE)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            CatalogError::malformed(format!("not valid UTF-8: {}", e.utf8_error())).at(path)
        })?;
        let mapping = Self::parse(&text).map_err(|e| e.at(path))?;
        if check_sanity {
            self.check_sanity(&mapping).map_err(|e| e.at(path))?;
        }
        Ok(mapping)
    }

    /// Parse descriptor text. The document must be a non-empty mapping.
    pub fn parse(text: &str) -> Result<Mapping> {
        let value: Value = serde_yaml::from_str(text).map_err(|e| {
            let message = match e.location() {
                Some(loc) => format!("line {}: {e}", loc.line()),
                None => e.to_string(),
            };
            CatalogError::malformed(message)
        })?;

        match value {
            Value::Mapping(mapping) if !mapping.is_empty() => Ok(mapping),
            Value::Mapping(_) | Value::Null => Err(CatalogError::malformed("empty document")),
            _ => Err(CatalogError::malformed("top level is not a mapping")),
        }
    }

    /// Fail with every required key absent from `mapping`, sorted.
    pub fn check_sanity(&self, mapping: &Mapping) -> Result<()> {
        let mut missing: Vec<String> = self
            .schema
            .required_fields
            .iter()
            .filter(|field| !mapping.contains_key(field.as_str()))
            .cloned()
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(CatalogError::missing(missing))
    }

    /// Report soft rule violations without failing.
    pub fn check_fields(&self, mapping: &Mapping) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        let mut issue = |field: &str, message: String| {
            issues.push(FieldIssue {
                field: field.to_string(),
                message,
            })
        };

        for (field, rule) in &self.schema.field_rules {
            let Some(value) = mapping.get(field.as_str()).and_then(scalar_text) else {
                continue;
            };
            if let Some(message) = rule.check(&value) {
                issue(field.as_str(), message);
            }
        }

        if let Some(pk) = mapping.get("pk").and_then(scalar_text) {
            if !pk.chars().all(|c| c.is_ascii_alphanumeric()) {
                issue("pk", format!("`{pk}` contains non-alphanumeric characters"));
            }
        }

        if let Some(type_name) = mapping.get("type").and_then(scalar_text) {
            if !self.schema.accepts_type(&type_name) {
                issue(
                    "type",
                    format!(
                        "`{type_name}` is not one of: {}",
                        self.schema.entity_types.join(", ")
                    ),
                );
            }
        }

        if let Some(date) = mapping.get("creation_date").and_then(scalar_text) {
            if !date.is_empty() && parse_date(&date).is_none() {
                issue("creation_date", format!("`{date}` is not a YYYY-MM-DD date"));
            }
        }

        issues
    }
}

/// Serialize a mapping, keeping its key order, and optionally write it.
///
/// The text is returned whether or not it was written. Block sequences are
/// written flush with their parent key (`tags:\n- a`) rather than indented;
/// both forms load back to the same mapping.
pub fn dump(mapping: &Mapping, target: Option<&Path>) -> Result<String> {
    let text = serde_yaml::to_string(mapping)
        .map_err(|e| CatalogError::malformed(format!("cannot serialize descriptor: {e}")))?;
    if let Some(path) = target {
        ackrep_common_fs::write_string_atomic(path, &text)?;
    }
    Ok(text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
