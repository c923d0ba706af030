//! Environment variable handling.

use crate::types::CatalogSchema;

/// Environment variable names.
pub mod vars {
    pub const ACKREP_CONFIG: &str = "ACKREP_CONFIG";
    pub const ACKREP_CHECK_SANITY: &str = "ACKREP_CHECK_SANITY";
    pub const ACKREP_DESCRIPTOR_FILENAME: &str = "ACKREP_DESCRIPTOR_FILENAME";
}

/// Schema settings taken from the environment, applied on top of the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub check_sanity: Option<bool>,
    pub descriptor_filename: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read overrides from an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            check_sanity: lookup(vars::ACKREP_CHECK_SANITY).map(|v| parse_bool(&v)),
            descriptor_filename: lookup(vars::ACKREP_DESCRIPTOR_FILENAME)
                .filter(|v| !v.trim().is_empty()),
        }
    }

    /// Apply the overrides to a schema.
    pub fn apply(&self, schema: &mut CatalogSchema) {
        if let Some(check) = self.check_sanity {
            schema.check_sanity_on_rebuild = check;
        }
        if let Some(name) = &self.descriptor_filename {
            schema.descriptor_filename = name.clone();
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let overrides = EnvOverrides::from_lookup(|var| match var {
            vars::ACKREP_CHECK_SANITY => Some("yes".to_string()),
            vars::ACKREP_DESCRIPTOR_FILENAME => Some("entity.yml".to_string()),
            _ => None,
        });

        let mut schema = CatalogSchema::default();
        overrides.apply(&mut schema);
        assert!(schema.check_sanity_on_rebuild);
        assert_eq!(schema.descriptor_filename, "entity.yml");
    }

    #[test]
    fn test_empty_lookup_changes_nothing() {
        let overrides = EnvOverrides::from_lookup(|_| None);
        let mut schema = CatalogSchema::default();
        overrides.apply(&mut schema);
        assert_eq!(schema, CatalogSchema::default());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" 1 "));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("nope"));
    }
}
