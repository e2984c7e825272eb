//! End-to-end validation of profile documents, generated and hand-written.

use std::fs;

use serde_json::{json, Value};
use sm_conformance::{validate, validate_file, ProfileValidator, ValidationRules};
use sm_profile::document::write_document;
use sm_profile::generate::{generate, PropertyDescriptor};

fn well_formed() -> Value {
    json!({
        "@context": {
            "sm": "http://cesmii.org/sm/",
            "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
            "xsd": "http://www.w3.org/2001/XMLSchema#",
            "unit": "http://qudt.org/vocab/unit/"
        },
        "@id": "sm:OrificeGasMeter",
        "@type": "sm:EquipmentType",
        "rdfs:label": "Orifice Gas Meter",
        "sm:properties": [
            {
                "@id": "sm:OrificeGasMeter/OrificeDiameter",
                "@type": "sm:Property",
                "rdfs:label": "OrificeDiameter",
                "sm:dataType": "xsd:float",
                "sm:unit": "unit:MilliM"
            },
            {
                "@id": "sm:OrificeGasMeter/Viscosity",
                "@type": "sm:Property",
                "rdfs:label": "Viscosity",
                "sm:dataType": "xsd:double",
                "sm:unit": "qudt:CentiPOISE"
            }
        ]
    })
}

#[test]
fn well_formed_profile_has_no_findings() {
    let report = validate(&well_formed());
    assert!(report.is_valid());
    assert!(report.findings.is_empty(), "{:#?}", report.findings);
}

#[test]
fn bare_document_has_exactly_four_structural_errors() {
    let (is_valid, errors, warnings) = validate(&json!({"sm:properties": []})).into_parts();
    assert!(!is_valid);
    assert_eq!(errors.len(), 4);
    assert!(errors.iter().all(|e| e.starts_with("Missing required field: ")));
    assert!(warnings.is_empty());
}

#[test]
fn unit_with_unknown_prefix_warns_once() {
    let mut doc = well_formed();
    doc["sm:properties"][1]["sm:unit"] = json!("foo:Bar");
    let (is_valid, errors, warnings) = validate(&doc).into_parts();
    assert!(is_valid);
    assert!(errors.is_empty());
    assert_eq!(warnings, ["Property Viscosity has non-standard unit: foo:Bar"]);
}

#[test]
fn generated_schema_is_valid() {
    let schema = generate(
        "Turbine Meter",
        &[
            PropertyDescriptor::new("FlowRate").with_unit("M3-PER-HR"),
            PropertyDescriptor::new("Pressure"),
            PropertyDescriptor::new("SerialNumber").with_data_type("string"),
            PropertyDescriptor::new("Running").with_data_type("boolean"),
        ],
    )
    .unwrap();
    let document = serde_json::to_value(&schema).unwrap();

    let (is_valid, errors, warnings) = validate(&document).into_parts();
    assert!(is_valid, "{errors:?}");
    assert_eq!(warnings, ["Property 1 (Pressure) missing unit"]);
}

#[test]
fn validates_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("turbine_meter.jsonld");
    let schema = generate("Turbine Meter", &[PropertyDescriptor::new("FlowRate").with_unit("M3-PER-HR")]).unwrap();
    write_document(&good, &schema).unwrap();
    let report = validate_file(&good);
    assert!(report.findings.is_empty(), "{:#?}", report.findings);

    let broken = dir.path().join("broken.jsonld");
    fs::write(&broken, "{\"@context\": {").unwrap();
    let (is_valid, errors, warnings) = validate_file(&broken).into_parts();
    assert!(!is_valid);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Invalid JSON: "));
    assert!(warnings.is_empty());

    let (is_valid, errors, _) = validate_file(&dir.path().join("missing.jsonld")).into_parts();
    assert!(!is_valid);
    assert!(errors[0].starts_with("Failed to read file: "));
}

#[test]
fn custom_rules_accept_instance_type() {
    let rules = ValidationRules::from_toml_str(
        r#"
        expected_type = "sm:OrificeGasMeter"
        recommended_namespaces = ["sm", "rdfs", "xsd", "unit"]
        "#,
    )
    .unwrap();
    let mut doc = well_formed();
    doc["@type"] = json!("sm:OrificeGasMeter");
    let report = ProfileValidator::new(rules).validate(&doc);
    assert!(report.findings.is_empty(), "{:#?}", report.findings);
}
