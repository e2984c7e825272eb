//! Unit reference check.
//!
//! Every declared `sm:unit` must resolve against a unit vocabulary, i.e.
//! start with one of the recognized prefixes. Unconventional units are
//! warnings only.

use serde_json::Value;
use tracing::debug;

use super::{display, label_of, PROPERTIES, UNIT};
use crate::report::{Finding, ValidationReport};
use crate::rules::ValidationRules;

const CHECK: &str = "units";

/// Reports units without a recognized prefix. Skipped when `sm:properties`
/// is absent or not an array; the properties check reports those.
#[must_use]
pub fn validate(document: &Value, rules: &ValidationRules) -> ValidationReport {
    debug!("Validating units...");
    let mut report = ValidationReport::new();

    let Some(properties) = document.get(PROPERTIES).and_then(Value::as_array) else {
        return report;
    };

    for prop in properties {
        let Some(unit) = prop.get(UNIT) else {
            continue;
        };
        let recognized = unit.as_str().is_some_and(|u| rules.is_recognized_unit(u));
        if !recognized {
            report.push(Finding::warn(
                CHECK,
                format!(
                    "Property {} has non-standard unit: {}",
                    label_of(prop),
                    display(unit)
                ),
            ));
        }
    }

    report
}
