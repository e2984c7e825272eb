//! Envelope check.
//!
//! Every profile needs `@context`, `@id`, `@type` and `rdfs:label`. A `@type`
//! other than the expected equipment tag is only a warning, since subtypes
//! may be legitimate.

use serde_json::Value;
use tracing::debug;

use super::{display, CONTEXT, ID, LABEL, TYPE};
use crate::report::{Finding, ValidationReport};
use crate::rules::ValidationRules;

const CHECK: &str = "structure";

/// Envelope keys every profile must carry.
pub const REQUIRED_FIELDS: &[&str] = &[CONTEXT, ID, TYPE, LABEL];

/// Reports missing envelope keys and an unexpected `@type`.
#[must_use]
pub fn validate(document: &Value, rules: &ValidationRules) -> ValidationReport {
    debug!("Validating structure...");
    let mut report = ValidationReport::new();

    for field in REQUIRED_FIELDS {
        if document.get(field).is_none() {
            report.push(Finding::error(
                CHECK,
                format!("Missing required field: {field}"),
            ));
        }
    }

    if let Some(type_) = document.get(TYPE) {
        if type_.as_str() != Some(rules.expected_type.as_str()) {
            report.push(Finding::warn(
                CHECK,
                format!("Unexpected @type: {}", display(type_)),
            ));
        }
    }

    report
}
