//! The four profile checks.
//!
//! Each check inspects the raw document and returns its own report; the
//! validator runs all of them and concatenates the results. No check depends
//! on another having passed.

pub mod context;
pub mod properties;
pub mod structure;
pub mod units;

use serde_json::Value;

pub(crate) const CONTEXT: &str = "@context";
pub(crate) const ID: &str = "@id";
pub(crate) const TYPE: &str = "@type";
pub(crate) const LABEL: &str = "rdfs:label";
pub(crate) const PROPERTIES: &str = "sm:properties";
pub(crate) const DATA_TYPE: &str = "sm:dataType";
pub(crate) const UNIT: &str = "sm:unit";

/// Placeholder for a property without a label.
pub(crate) const UNKNOWN_LABEL: &str = "unknown";

/// Renders a value for a message: strings verbatim, anything else as JSON.
pub(crate) fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The label of a property entry, or `unknown`.
pub(crate) fn label_of(property: &Value) -> String {
    property
        .get(LABEL)
        .map_or_else(|| UNKNOWN_LABEL.to_owned(), display)
}
