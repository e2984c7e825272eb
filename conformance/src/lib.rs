//! SM Profile validator.
//!
//! Validates profile schema documents for structural and semantic
//! correctness. Four independent checks run on every document:
//!
//! | Check | Errors | Warnings |
//! |-------|--------|----------|
//! | structure | missing `@context`, `@id`, `@type`, `rdfs:label` | unexpected `@type` |
//! | context | – | missing recommended namespace prefix |
//! | properties | non-array `sm:properties`; entry without `@id` or `@type` | no properties; missing label, datatype, or unit |
//! | units | – | unit without a recognized prefix |
//!
//! Every check always runs, even after earlier checks found errors, so one
//! run surfaces the complete defect list. Only an unreadable or malformed
//! file stops validation early.
//!
//! # Entry Point
//!
//! ```
//! use serde_json::json;
//!
//! let report = sm_conformance::validate(&json!({"@id": "sm:Pump"}));
//! let (is_valid, errors, warnings) = report.into_parts();
//! assert!(!is_valid);
//! assert_eq!(errors.len(), 3);
//! assert_eq!(warnings, ["No properties defined"]);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod report;
pub mod rules;
pub mod validators;

use std::path::Path;

use serde_json::Value;
use tracing::{error, info, warn};

pub use report::{Finding, Severity, ValidationReport};
pub use rules::{RulesError, ValidationRules};

const LOAD_CHECK: &str = "load";

/// Runs the profile checks under a fixed set of rules.
///
/// Each call builds a fresh report; nothing carries over between documents.
#[derive(Debug, Clone, Default)]
pub struct ProfileValidator {
    rules: ValidationRules,
}

impl ProfileValidator {
    /// Creates a validator using `rules`.
    #[must_use]
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    /// Returns the rules in effect.
    #[must_use]
    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// Runs all four checks on a parsed document.
    #[must_use]
    pub fn validate(&self, document: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        report.extend(validators::structure::validate(document, &self.rules));
        report.extend(validators::context::validate(document, &self.rules));
        report.extend(validators::properties::validate(document, &self.rules));
        report.extend(validators::units::validate(document, &self.rules));
        log_summary(&report);
        report
    }

    /// Parses `text` and validates it. Malformed JSON yields a report with a
    /// single `Invalid JSON` error and no checks are run.
    #[must_use]
    pub fn validate_str(&self, text: &str) -> ValidationReport {
        match serde_json::from_str::<Value>(text) {
            Ok(document) => self.validate(&document),
            Err(e) => load_failure(format!("Invalid JSON: {e}")),
        }
    }

    /// Reads and validates a profile file. An unreadable file yields a report
    /// with a single `Failed to read file` error.
    #[must_use]
    pub fn validate_file(&self, path: &Path) -> ValidationReport {
        info!("Validating profile: {}", path.display());
        match std::fs::read_to_string(path) {
            Ok(text) => self.validate_str(&text),
            Err(e) => load_failure(format!("Failed to read file: {e}")),
        }
    }
}

/// Validates a parsed document under the default rules.
#[must_use]
pub fn validate(document: &Value) -> ValidationReport {
    ProfileValidator::default().validate(document)
}

/// Validates a profile file under the default rules.
#[must_use]
pub fn validate_file(path: &Path) -> ValidationReport {
    ProfileValidator::default().validate_file(path)
}

fn load_failure(message: String) -> ValidationReport {
    error!("{message}");
    let mut report = ValidationReport::new();
    report.push(Finding::error(LOAD_CHECK, message));
    report
}

fn log_summary(report: &ValidationReport) {
    if report.is_valid() {
        info!("Profile is valid");
    } else {
        error!(
            "Profile validation failed with {} error(s)",
            report.error_count()
        );
    }
    if report.warning_count() > 0 {
        warn!("Profile has {} warning(s)", report.warning_count());
    }
}
