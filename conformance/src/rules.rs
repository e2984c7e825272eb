//! Validation rules: the tags, namespaces, and vocabularies the checks compare against.
//!
//! Defaults match the documents produced by `sm-profile`. A TOML file may
//! override any subset of them:
//!
//! ```toml
//! expected_type = "sm:EquipmentType"
//! recommended_namespaces = ["sm", "rdfs", "xsd"]
//! unit_prefixes = ["unit:", "qudt:"]
//! unitless_data_types = ["xsd:string", "xsd:boolean", "xsd:integer", "xsd:dateTime"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sm_profile::namespaces::{self, datatypes, types};
use thiserror::Error;

/// A rules file that could not be loaded.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The file could not be read.
    #[error("failed to read rules file {}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid TOML or has unknown keys.
    #[error("failed to parse rules")]
    Parse(#[from] toml::de::Error),
}

/// What the checks consider expected, recommended, or recognized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationRules {
    /// `@type` a schema document is expected to carry.
    pub expected_type: String,
    /// Prefixes that should be declared in `@context`.
    pub recommended_namespaces: Vec<String>,
    /// Prefixes a unit reference must start with.
    pub unit_prefixes: Vec<String>,
    /// Datatypes exempt from the missing-unit warning.
    pub unitless_data_types: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            expected_type: types::EQUIPMENT_TYPE.to_owned(),
            recommended_namespaces: [namespaces::SM, namespaces::RDFS, namespaces::XSD]
                .iter()
                .map(|ns| ns.prefix.to_owned())
                .collect(),
            unit_prefixes: namespaces::UNIT_PREFIXES
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            unitless_data_types: datatypes::UNITLESS
                .iter()
                .map(|t| (*t).to_owned())
                .collect(),
        }
    }
}

impl ValidationRules {
    /// Parses rules from TOML text; omitted keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Parse`] if the text is not valid TOML or has unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, RulesError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads rules from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RulesError> {
        let text = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Returns true if `data_type` needs no unit.
    #[must_use]
    pub fn is_unitless(&self, data_type: Option<&str>) -> bool {
        data_type.is_some_and(|t| self.unitless_data_types.iter().any(|u| u == t))
    }

    /// Returns true if `unit` starts with a recognized prefix.
    #[must_use]
    pub fn is_recognized_unit(&self, unit: &str) -> bool {
        self.unit_prefixes.iter().any(|p| unit.starts_with(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_profile_vocabulary() {
        let rules = ValidationRules::default();
        assert_eq!(rules.expected_type, "sm:EquipmentType");
        assert_eq!(rules.recommended_namespaces, ["sm", "rdfs", "xsd"]);
        assert_eq!(rules.unit_prefixes, ["unit:", "qudt:"]);
        assert_eq!(
            rules.unitless_data_types,
            ["xsd:string", "xsd:boolean", "xsd:integer", "xsd:dateTime"]
        );
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let rules = ValidationRules::from_toml_str("expected_type = \"sm:OrificeGasMeter\"\n").unwrap();
        assert_eq!(rules.expected_type, "sm:OrificeGasMeter");
        assert_eq!(rules.unit_prefixes, ValidationRules::default().unit_prefixes);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ValidationRules::from_toml_str("strict = true"),
            Err(RulesError::Parse(_))
        ));
    }

    #[test]
    fn unitless_and_unit_predicates() {
        let rules = ValidationRules::default();
        assert!(rules.is_unitless(Some("xsd:string")));
        assert!(!rules.is_unitless(Some("xsd:float")));
        assert!(!rules.is_unitless(None));
        assert!(rules.is_recognized_unit("unit:KiloPA"));
        assert!(rules.is_recognized_unit("qudt:Unit"));
        assert!(!rules.is_recognized_unit("foo:Bar"));
    }

    #[test]
    fn missing_rules_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ValidationRules::from_file(&dir.path().join("rules.toml")).unwrap_err();
        assert!(matches!(err, RulesError::Io { .. }));
    }
}
