//! Meter configuration → SM Profile instance conversion.
//!
//! The converter is a fixed structural remap: each known configuration field
//! is copied to a fixed property name, with a fixed unit code when the
//! quantity is dimensioned. Values are never inspected. A field whose source
//! is absent or `null` produces no property at all.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::error::Category;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::model::{
    Aga3, Aga8, Configuration, ConfigurationDocument, Context, ProfileInstance, PropertyValue,
    Sensors,
};
use crate::namespaces::{self, types, units, INSTANCE_NAMESPACES};

/// Prefix of the per-component gas composition properties.
pub const GAS_COMPONENT_PREFIX: &str = "GasComp_";

/// Label used when the configuration has no name.
pub const UNKNOWN_METER_LABEL: &str = "Unknown Meter";

/// Extension given to converted instances written next to their input.
pub const INSTANCE_EXTENSION: &str = "sm.jsonld";

/// A configuration file that could not be mapped.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input is not JSON.
    #[error("invalid JSON")]
    Syntax(#[source] serde_json::Error),
    /// The input is JSON but a section has an impossible shape
    /// (e.g., `AGA3` is a string, or a gas component has no name).
    #[error("unexpected configuration structure")]
    Structure(#[source] serde_json::Error),
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => ConvertError::Structure(err),
            Category::Io | Category::Syntax | Category::Eof => ConvertError::Syntax(err),
        }
    }
}

/// Parses a configuration file's text and converts it.
///
/// # Errors
///
/// Returns [`ConvertError`] if `json` is not valid JSON or does not have the
/// shape of a meter configuration.
pub fn convert_str(json: &str, meter_id: &str) -> Result<ProfileInstance, ConvertError> {
    let value: Value = serde_json::from_str(json)?;
    convert_value(value, meter_id)
}

/// Converts an already-parsed configuration value.
///
/// # Errors
///
/// Returns [`ConvertError::Structure`] if `value` does not have the shape of a
/// meter configuration.
pub fn convert_value(value: Value, meter_id: &str) -> Result<ProfileInstance, ConvertError> {
    let document = ConfigurationDocument::from_value(value)?;
    Ok(convert(&document, meter_id))
}

/// Converts a meter configuration into an `sm:OrificeGasMeter` instance.
#[must_use]
pub fn convert(document: &ConfigurationDocument, meter_id: &str) -> ProfileInstance {
    let config = &document.configuration;
    let label = config
        .name
        .as_ref()
        .map_or_else(|| UNKNOWN_METER_LABEL.to_owned(), display_text);
    info!("Converting meter: {label}");

    let mut props = PropertyMap::default();
    map_identification(&mut props, config);
    map_base_conditions(&mut props, config);
    map_aga3(&mut props, &config.aga3);
    map_aga8(&mut props, &config.aga8);
    map_sensors(&mut props, &config.sensors);

    info!("Converted {} properties", props.0.len());

    ProfileInstance {
        context: Context::from_namespaces(INSTANCE_NAMESPACES),
        id: format!(
            "{}/Instance/{meter_id}",
            namespaces::compact(&namespaces::SM, "OrificeGasMeter")
        ),
        type_: types::ORIFICE_GAS_METER.to_owned(),
        label,
        property_values: props.0,
    }
}

#[derive(Default)]
struct PropertyMap(IndexMap<String, PropertyValue>);

impl PropertyMap {
    /// Records `value` under `name` unless it is absent. A repeated name
    /// replaces the earlier value in place.
    fn add(&mut self, name: impl Into<String>, value: Option<&Value>, unit: Option<&str>) {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return;
        };
        self.0.insert(
            name.into(),
            PropertyValue {
                value: value.clone(),
                unit: unit.map(str::to_owned),
                timestamp: None,
            },
        );
    }
}

fn map_identification(props: &mut PropertyMap, config: &Configuration) {
    props.add("Name", config.name.as_ref(), None);
    props.add("Owner", config.owner.as_ref(), None);
    props.add("Latitude", config.latitude.as_ref(), Some(units::DEGREE));
    props.add("Longitude", config.longitude.as_ref(), Some(units::DEGREE));
    props.add("Elevation", config.elevation.as_ref(), Some(units::METRE));
}

fn map_base_conditions(props: &mut PropertyMap, config: &Configuration) {
    props.add(
        "BaseTemperature",
        config.base_temperature.as_ref(),
        Some(units::DEGREE_CELSIUS),
    );
    props.add(
        "BasePressure",
        config.base_pressure.as_ref(),
        Some(units::KILOPASCAL),
    );
    props.add(
        "AtmosphericPressure",
        config.atmospheric_pressure.as_ref(),
        Some(units::KILOPASCAL),
    );
    props.add("Units", config.units.as_ref(), None);
    props.add("ContractHour", config.contract_hour.as_ref(), None);
}

fn map_aga3(props: &mut PropertyMap, aga3: &Aga3) {
    props.add("AGA3_Calculation", aga3.calculation.as_ref(), None);
    props.add("OrificeTapType", aga3.orifice_tap.as_ref(), None);
    props.add(
        "OrificeDiameter",
        aga3.orifice_diameter.as_ref(),
        Some(units::MILLIMETRE),
    );
    props.add("OrificeMaterial", aga3.orifice_material.as_ref(), None);
    props.add(
        "OrificeReferenceTemperature",
        aga3.orifice_reference_temperature.as_ref(),
        Some(units::DEGREE_CELSIUS),
    );
    props.add(
        "PipeInsideDiameter",
        aga3.pipe_inside_diameter.as_ref(),
        Some(units::MILLIMETRE),
    );
    props.add("PipeMaterial", aga3.pipe_material.as_ref(), None);
    props.add(
        "PipeReferenceTemperature",
        aga3.pipe_reference_temperature.as_ref(),
        Some(units::DEGREE_CELSIUS),
    );
    props.add(
        "IsentropicExponent",
        aga3.isentropic_exponent.as_ref(),
        Some(units::UNITLESS),
    );
    props.add("Viscosity", aga3.viscosity.as_ref(), Some(units::CENTIPOISE));
    props.add(
        "FlowExtension",
        aga3.flow_extension
            .as_ref()
            .or(aga3.flow_extension_corrected.as_ref()),
        None,
    );
}

fn map_aga8(props: &mut PropertyMap, aga8: &Aga8) {
    props.add("AGA8_Units", aga8.units.as_ref(), None);

    // Collapse duplicates first so a trailing null still removes the component.
    let mut components: IndexMap<&str, Option<&Value>> = IndexMap::new();
    for entry in &aga8.components {
        components.insert(entry.component.as_str(), entry.value.as_ref());
    }
    for (component, value) in components {
        props.add(
            format!("{GAS_COMPONENT_PREFIX}{component}"),
            value,
            Some(units::UNITLESS),
        );
    }

    props.add(
        "GasDensity",
        aga8.density.as_ref(),
        Some(units::KILOGRAM_PER_CUBIC_METRE),
    );
    props.add(
        "Compressibility",
        aga8.compressibility.as_ref(),
        Some(units::UNITLESS),
    );
}

fn map_sensors(props: &mut PropertyMap, sensors: &Sensors) {
    let dp = &sensors.differential_pressure;
    props.add("DPSensor_Source", dp.source.as_ref(), None);
    props.add("DPSensor_SerialNumber", dp.serial_number.as_ref(), None);
    props.add(
        "DPSensor_MinRange",
        dp.minimum_range.as_ref(),
        Some(units::KILOPASCAL),
    );
    props.add(
        "DPSensor_MaxRange",
        dp.maximum_range.as_ref(),
        Some(units::KILOPASCAL),
    );

    let sp = &sensors.static_pressure;
    props.add("StaticPressureSensor_Source", sp.source.as_ref(), None);
    props.add(
        "StaticPressureSensor_SerialNumber",
        sp.serial_number.as_ref(),
        None,
    );
    props.add(
        "StaticPressureSensor_MinRange",
        sp.minimum_range.as_ref(),
        Some(units::KILOPASCAL),
    );
    props.add(
        "StaticPressureSensor_MaxRange",
        sp.maximum_range.as_ref(),
        Some(units::KILOPASCAL),
    );
    props.add(
        "StaticPressureSensor_TapLocation",
        sp.tap_location.as_ref(),
        None,
    );
    props.add("StaticPressureSensor_Type", sp.sensor_type.as_ref(), None);

    let temp = &sensors.flowing_temperature;
    props.add("TempSensor_Source", temp.source.as_ref(), None);
    props.add("TempSensor_SerialNumber", temp.serial_number.as_ref(), None);
    props.add(
        "TempSensor_MinRange",
        temp.minimum_range.as_ref(),
        Some(units::DEGREE_CELSIUS),
    );
    props.add(
        "TempSensor_MaxRange",
        temp.maximum_range.as_ref(),
        Some(units::DEGREE_CELSIUS),
    );
}

/// Default output path: `input` with its extension replaced by `sm.jsonld`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(INSTANCE_EXTENSION)
}

/// Default meter identifier: the uppercased file stem of `input`.
#[must_use]
pub fn default_meter_id(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

/// Renders a name value as label text: strings verbatim, anything else as JSON.
fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn keys(instance: &ProfileInstance) -> Vec<&str> {
        instance.property_values.keys().map(String::as_str).collect()
    }

    #[test]
    fn end_to_end_well_a() {
        let input = r#"{"configuration":{"name":"Well A","AGA3":{"orificeDiameter":50.8},"AGA8":{"components":[{"component":"Methane","value":0.95}]}}}"#;
        let instance = convert_str(input, "W1").unwrap();

        assert_eq!(instance.id, "sm:OrificeGasMeter/Instance/W1");
        assert_eq!(instance.type_, "sm:OrificeGasMeter");
        assert_eq!(instance.label, "Well A");
        assert_eq!(
            serde_json::to_value(&instance.property_values).unwrap(),
            json!({
                "Name": {"value": "Well A"},
                "OrificeDiameter": {"value": 50.8, "unit": "unit:MilliM"},
                "GasComp_Methane": {"value": 0.95, "unit": "unit:UNITLESS"}
            })
        );
    }

    #[test]
    fn envelope_declares_instance_namespaces() {
        let instance = convert(&ConfigurationDocument::default(), "X");
        let value = serde_json::to_value(&instance).unwrap();
        assert_eq!(
            value["@context"],
            json!({
                "sm": "http://cesmii.org/sm/",
                "rdfs": "http://www.w3.org/2000/01/rdf-schema#",
                "xsd": "http://www.w3.org/2001/XMLSchema#",
                "unit": "http://qudt.org/vocab/unit/"
            })
        );
        assert_eq!(value["rdfs:label"], json!("Unknown Meter"));
        assert_eq!(value["sm:propertyValues"], json!({}));
    }

    #[test]
    fn null_fields_are_skipped() {
        let instance = convert_value(
            json!({
                "configuration": {
                    "name": "Run 1",
                    "owner": null,
                    "latitude": 53.5,
                    "AGA3": {"orificeDiameter": null, "pipeMaterial": "Carbon_Steel"},
                    "sensors": {"differentialPressure": {"serialNumber": null, "maximumRange": 62.2}}
                }
            }),
            "R1",
        )
        .unwrap();
        assert_eq!(
            keys(&instance),
            ["Name", "Latitude", "PipeMaterial", "DPSensor_MaxRange"]
        );
        assert!(instance
            .property_values
            .values()
            .all(|p| !p.value.is_null()));
    }

    #[test]
    fn textual_fields_carry_no_unit() {
        let instance = convert_value(
            json!({"configuration": {"owner": "Acme", "AGA3": {"orificeTap": "Flange"}}}),
            "A",
        )
        .unwrap();
        assert!(instance.property_values.values().all(|p| p.unit.is_none()));
    }

    #[test]
    fn duplicate_components_keep_last_value() {
        let instance = convert_value(
            json!({"configuration": {"AGA8": {"components": [
                {"component": "Methane", "value": 0.90},
                {"component": "Ethane", "value": 0.03},
                {"component": "Methane", "value": 0.94}
            ]}}}),
            "D",
        )
        .unwrap();
        assert_eq!(keys(&instance), ["GasComp_Methane", "GasComp_Ethane"]);
        assert_eq!(
            instance.property_values["GasComp_Methane"].value,
            json!(0.94)
        );
    }

    #[test]
    fn trailing_null_component_is_dropped() {
        let instance = convert_value(
            json!({"configuration": {"AGA8": {"components": [
                {"component": "Helium", "value": 0.01},
                {"component": "Helium", "value": null}
            ]}}}),
            "H",
        )
        .unwrap();
        assert!(instance.property_values.is_empty());
    }

    #[test]
    fn no_components_means_no_gas_properties() {
        let instance = convert_value(
            json!({"configuration": {"AGA8": {"units": "molar_fraction", "density": 0.8}}}),
            "G",
        )
        .unwrap();
        assert!(!keys(&instance)
            .iter()
            .any(|k| k.starts_with(GAS_COMPONENT_PREFIX)));
        assert_eq!(
            instance.property_values["GasDensity"].unit.as_deref(),
            Some("unit:KiloGM-PER-M3")
        );
    }

    #[test]
    fn sensor_ranges_use_sensor_units() {
        let instance = convert_value(
            json!({"configuration": {"sensors": {
                "staticPressure": {"minimumRange": 0, "maximumRange": 10000, "sensorType": "Gauge"},
                "flowingTemperature": {"minimumRange": -40, "maximumRange": 85}
            }}}),
            "S",
        )
        .unwrap();
        let unit_of = |name: &str| instance.property_values[name].unit.as_deref();
        assert_eq!(unit_of("StaticPressureSensor_MinRange"), Some("unit:KiloPA"));
        assert_eq!(unit_of("StaticPressureSensor_Type"), None);
        assert_eq!(unit_of("TempSensor_MaxRange"), Some("unit:DEG_C"));
    }

    #[test]
    fn non_string_name_becomes_json_label() {
        let instance = convert_value(json!({"configuration": {"name": 474}}), "N").unwrap();
        assert_eq!(instance.label, "474");
        assert_eq!(instance.property_values["Name"].value, json!(474));
    }

    #[test]
    fn cli_defaults_derive_from_input_path() {
        let input = Path::new("configs/well_a.json");
        assert_eq!(default_output_path(input), Path::new("configs/well_a.sm.jsonld"));
        assert_eq!(default_meter_id(input), "WELL_A");
        assert_eq!(default_output_path(Path::new("run1")), Path::new("run1.sm.jsonld"));
    }

    #[test]
    fn malformed_json_is_a_syntax_error() {
        let err = convert_str("{\"configuration\": ", "X").unwrap_err();
        assert!(matches!(err, ConvertError::Syntax(_)));
    }

    #[test]
    fn wrong_section_shape_is_a_structure_error() {
        let err = convert_str(r#"{"configuration": {"AGA3": "plate"}}"#, "X").unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)));

        let err = convert_str(
            r#"{"configuration": {"AGA8": {"components": [{"value": 0.5}]}}}"#,
            "X",
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)));

        let err = convert_value(
            json!({"configuration": {"AGA3": ["AGA3_1992", "Flange", 50.8]}}),
            "X",
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)));

        let err = convert_str(r#"[["Well A", "Acme"]]"#, "X").unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)));
    }

    #[test]
    fn flow_extension_prefers_exported_spelling() {
        let both = json!({"configuration": {"AGA3": {
            "flowExtentsion": "Method_1",
            "flowExtension": "Method_2"
        }}});
        let instance = convert_value(both, "X").unwrap();
        assert_eq!(keys(&instance), ["FlowExtension"]);
        assert_eq!(instance.property_values["FlowExtension"].value, json!("Method_1"));

        let corrected = json!({"configuration": {"AGA3": {"flowExtension": "Method_2"}}});
        let instance = convert_value(corrected, "X").unwrap();
        assert_eq!(instance.property_values["FlowExtension"].value, json!("Method_2"));
    }
}
