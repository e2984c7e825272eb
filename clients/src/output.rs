//! Human-readable summaries printed by the binaries.

use std::fmt::Write;
use std::path::Path;

use sm_conformance::{Severity, ValidationReport};

const RULE_WIDTH: usize = 60;

/// A title framed by `=` rules, preceded by a blank line.
#[must_use]
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n{title}\n{rule}")
}

/// Summary printed after a successful conversion.
#[must_use]
pub fn render_conversion(input: &Path, output: &Path, meter_id: &str) -> String {
    let mut out = banner("CONVERSION COMPLETE");
    let _ = write!(
        out,
        "\nInput:  {}\nOutput: {}\nMeter:  {meter_id}",
        input.display(),
        output.display()
    );
    out.push_str(&validate_hint(output));
    out
}

/// Summary printed after a profile was written.
#[must_use]
pub fn render_generated(output: &Path) -> String {
    let mut out = format!(
        "\n[OK] Profile generated successfully!\n  Location: {}",
        output.display()
    );
    out.push_str(&validate_hint(output));
    out
}

/// Summary printed after a device document was written to disk.
#[must_use]
pub fn render_device(topic: &str, output: &Path, status: Option<&str>) -> String {
    let mut out = banner("DEVICE DOCUMENT COMPLETE");
    let _ = write!(
        out,
        "\nTopic:  {topic}\nOutput: {}\nStatus: {}",
        output.display(),
        status.unwrap_or("unknown")
    );
    out
}

fn validate_hint(path: &Path) -> String {
    format!("\n\nValidate with:\n  sm-validate {}", path.display())
}

/// Renders a report: errors, then warnings, then the pass/fail verdict.
#[must_use]
pub fn render_report(report: &ValidationReport) -> String {
    let mut out = banner("VALIDATION RESULTS");
    render_section(&mut out, report, Severity::Error, "ERRORS:");
    render_section(&mut out, report, Severity::Warning, "WARNINGS:");
    if report.is_valid() {
        out.push_str("\n\n[PASS] Profile is valid!");
    } else {
        out.push_str("\n\n[FAIL] Profile validation failed");
    }
    out
}

fn render_section(out: &mut String, report: &ValidationReport, severity: Severity, heading: &str) {
    let mut findings = report
        .findings
        .iter()
        .filter(|f| f.severity == severity)
        .peekable();
    if findings.peek().is_none() {
        return;
    }
    let _ = write!(out, "\n\n{heading}");
    for finding in findings {
        let _ = write!(out, "\n  {finding}");
    }
}
