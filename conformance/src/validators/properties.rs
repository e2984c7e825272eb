//! Property definition check.
//!
//! Each entry of `sm:properties` must carry `@id` and `@type`; `rdfs:label`
//! and `sm:dataType` are recommended. A property without `sm:unit` is flagged
//! unless its datatype is one of the unitless ones. An entry that is not an
//! object has none of these fields.

use serde_json::Value;
use tracing::debug;

use super::{label_of, DATA_TYPE, ID, LABEL, PROPERTIES, TYPE, UNIT};
use crate::report::{Finding, ValidationReport};
use crate::rules::ValidationRules;

const CHECK: &str = "properties";

/// Reports missing or malformed property definitions.
#[must_use]
pub fn validate(document: &Value, rules: &ValidationRules) -> ValidationReport {
    debug!("Validating properties...");
    let mut report = ValidationReport::new();

    let Some(properties) = document.get(PROPERTIES) else {
        report.push(Finding::warn(CHECK, "No properties defined"));
        return report;
    };
    let Some(properties) = properties.as_array() else {
        report.push(Finding::error(CHECK, format!("{PROPERTIES} must be an array")));
        return report;
    };

    for (idx, prop) in properties.iter().enumerate() {
        if prop.get(ID).is_none() {
            report.push(Finding::error(CHECK, format!("Property {idx} missing @id")));
        }
        if prop.get(TYPE).is_none() {
            report.push(Finding::error(CHECK, format!("Property {idx} missing @type")));
        }
        if prop.get(LABEL).is_none() {
            report.push(Finding::warn(CHECK, format!("Property {idx} missing label")));
        }
        if prop.get(DATA_TYPE).is_none() {
            report.push(Finding::warn(CHECK, format!("Property {idx} missing dataType")));
        }

        let data_type = prop.get(DATA_TYPE).and_then(Value::as_str);
        if prop.get(UNIT).is_none() && !rules.is_unitless(data_type) {
            report.push(Finding::warn(
                CHECK,
                format!("Property {idx} ({}) missing unit", label_of(prop)),
            ));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn property(data_type: &str) -> Value {
        json!({
            "@id": "sm:Pump/Speed",
            "@type": "sm:Property",
            "rdfs:label": "Speed",
            "sm:dataType": data_type
        })
    }

    fn check(properties: Value) -> ValidationReport {
        validate(&json!({ "sm:properties": properties }), &ValidationRules::default())
    }

    #[test]
    fn missing_list_warns_and_stops() {
        let report = validate(&json!({}), &ValidationRules::default());
        assert_eq!(report.warnings().collect::<Vec<_>>(), ["No properties defined"]);
        assert!(report.is_valid());
    }

    #[test]
    fn non_array_list_is_an_error() {
        let report = check(json!({"Speed": {}}));
        assert_eq!(report.errors().collect::<Vec<_>>(), ["sm:properties must be an array"]);
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn empty_list_is_clean() {
        assert!(check(json!([])).findings.is_empty());
    }

    #[test]
    fn string_without_unit_is_not_flagged() {
        assert!(check(json!([property("xsd:string")])).findings.is_empty());
    }

    #[test]
    fn float_without_unit_warns_once() {
        let report = check(json!([property("xsd:float")]));
        assert_eq!(report.warnings().collect::<Vec<_>>(), ["Property 0 (Speed) missing unit"]);
        assert!(report.is_valid());
    }

    #[test]
    fn every_unitless_type_is_exempt() {
        let props: Vec<Value> = ["xsd:string", "xsd:boolean", "xsd:integer", "xsd:dateTime"]
            .into_iter()
            .map(property)
            .collect();
        assert!(check(Value::Array(props)).findings.is_empty());
    }

    #[test]
    fn bare_entry_reports_every_field() {
        let report = check(json!([property("xsd:string"), {}]));
        assert_eq!(
            report.errors().collect::<Vec<_>>(),
            ["Property 1 missing @id", "Property 1 missing @type"]
        );
        assert_eq!(
            report.warnings().collect::<Vec<_>>(),
            [
                "Property 1 missing label",
                "Property 1 missing dataType",
                "Property 1 (unknown) missing unit",
            ]
        );
    }

    #[test]
    fn non_object_entry_has_no_fields() {
        let report = check(json!(["Speed"]));
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 3);
    }
}
