//! `@context` check.
//!
//! Namespace declarations are advisory: some consumers infer them, so a
//! missing prefix is a warning and never an error. A context that is not a
//! mapping declares no prefixes.

use serde_json::Value;
use tracing::debug;

use super::CONTEXT;
use crate::report::{Finding, ValidationReport};
use crate::rules::ValidationRules;

const CHECK: &str = "context";

/// Reports recommended prefixes missing from `@context`. Does nothing when
/// `@context` itself is absent; the structure check reports that.
#[must_use]
pub fn validate(document: &Value, rules: &ValidationRules) -> ValidationReport {
    debug!("Validating @context...");
    let mut report = ValidationReport::new();

    let Some(context) = document.get(CONTEXT) else {
        return report;
    };

    for ns in &rules.recommended_namespaces {
        let declared = context
            .as_object()
            .is_some_and(|map| map.contains_key(ns.as_str()));
        if !declared {
            report.push(Finding::warn(
                CHECK,
                format!("Missing recommended namespace: {ns}"),
            ));
        }
    }

    report
}
