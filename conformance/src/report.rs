//! Validation report types: findings, severity levels, and report aggregation.

use std::fmt;

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Advisory defect; never affects validity.
    Warning,
    /// Structural defect; makes the document invalid.
    Error,
}

impl Severity {
    /// Returns the tag printed before the message (`ERROR` or `WARN`).
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Severity::Warning => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// A single defect found by a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Short identifier of the check that produced this finding.
    pub check: &'static str,
    /// Human-readable description of the defect.
    pub message: String,
    /// Severity of the finding.
    pub severity: Severity,
}

impl Finding {
    /// Creates an error finding.
    pub fn error(check: &'static str, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Creates a warning finding.
    pub fn warn(check: &'static str, message: impl Into<String>) -> Self {
        Self {
            check,
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Returns true if this finding is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity.tag(), self.message)
    }
}

/// All findings from one validation run, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Every finding across all checks.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finding to this report.
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Extends this report with the findings of another report.
    pub fn extend(&mut self, other: ValidationReport) {
        self.findings.extend(other.findings);
    }

    /// Error messages, in order.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.messages(Severity::Error)
    }

    /// Warning messages, in order.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.messages(Severity::Warning)
    }

    /// Returns the count of errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error()).count()
    }

    /// Returns the count of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.error_count()
    }

    /// Returns true if no errors were found. Warnings do not affect validity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Splits the report into `(is_valid, errors, warnings)`.
    #[must_use]
    pub fn into_parts(self) -> (bool, Vec<String>, Vec<String>) {
        let is_valid = self.is_valid();
        let (errors, warnings): (Vec<Finding>, Vec<Finding>) =
            self.findings.into_iter().partition(Finding::is_error);
        (
            is_valid,
            errors.into_iter().map(|f| f.message).collect(),
            warnings.into_iter().map(|f| f.message).collect(),
        )
    }

    fn messages(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .filter(move |f| f.severity == severity)
            .map(|f| f.message.as_str())
    }
}
