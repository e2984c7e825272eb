//! Document model types.
//!
//! Four document shapes flow through the tools:
//! - [`ConfigurationDocument`]: the flat-ish meter configuration read by the converter
//! - [`ProfileInstance`]: one concrete meter and its property values
//! - [`ProfileSchema`]: an equipment type and the properties its instances carry
//! - [`DeviceInstance`]: a live flow computer with its runs and meters nested inside
//!
//! Configuration values are kept as raw [`serde_json::Value`]s; the converter
//! copies them through without interpreting them.

use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::namespaces::Namespace;

/// The `@context` block of a linked-data document, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context(IndexMap<String, String>);

impl Context {
    /// Builds a context declaring each namespace in order.
    #[must_use]
    pub fn from_namespaces(namespaces: &[Namespace]) -> Self {
        Self(
            namespaces
                .iter()
                .map(|ns| (ns.prefix.to_owned(), ns.iri.to_owned()))
                .collect(),
        )
    }

    /// Returns the IRI declared for `prefix`, if any.
    #[must_use]
    pub fn iri(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    /// Iterates over the declared prefixes.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

// -----------------------------------------------------------------------------
// Configuration document (converter input)
// -----------------------------------------------------------------------------

/// Root of a meter configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigurationDocument {
    /// The `configuration` section.
    #[serde(deserialize_with = "mapping")]
    pub configuration: Configuration,
}

impl ConfigurationDocument {
    /// Reads a parsed configuration file. The root and every section must be
    /// JSON objects.
    ///
    /// # Errors
    ///
    /// Returns a data error if the root is not an object or a section has an
    /// impossible shape.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(map) => from_mapping(map),
            other => Err(de::Error::custom(format!(
                "expected a configuration object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Meter identification, base conditions, and the AGA/sensor sections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// Meter display name.
    pub name: Option<Value>,
    /// Operating company.
    pub owner: Option<Value>,
    /// Latitude in decimal degrees.
    pub latitude: Option<Value>,
    /// Longitude in decimal degrees.
    pub longitude: Option<Value>,
    /// Elevation in metres.
    pub elevation: Option<Value>,
    /// Base (contract) temperature in °C.
    pub base_temperature: Option<Value>,
    /// Base (contract) pressure in kPa.
    pub base_pressure: Option<Value>,
    /// Atmospheric pressure in kPa.
    pub atmospheric_pressure: Option<Value>,
    /// Unit system of the configuration (e.g., `"metric"`).
    pub units: Option<Value>,
    /// Hour of day at which the contract day rolls over.
    pub contract_hour: Option<Value>,
    /// AGA Report No. 3 orifice metering parameters.
    #[serde(rename = "AGA3", deserialize_with = "mapping")]
    pub aga3: Aga3,
    /// AGA Report No. 8 gas composition.
    #[serde(rename = "AGA8", deserialize_with = "mapping")]
    pub aga8: Aga8,
    /// Differential pressure, static pressure, and temperature transmitters.
    #[serde(deserialize_with = "mapping")]
    pub sensors: Sensors,
}

/// Orifice plate, pipe, and flow calculation settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Aga3 {
    /// Calculation edition (e.g., `"AGA3_1992"`).
    pub calculation: Option<Value>,
    /// Tap type (flange or pipe taps).
    pub orifice_tap: Option<Value>,
    /// Orifice bore in mm.
    pub orifice_diameter: Option<Value>,
    /// Orifice plate material.
    pub orifice_material: Option<Value>,
    /// Temperature at which the bore was measured, in °C.
    pub orifice_reference_temperature: Option<Value>,
    /// Meter tube inside diameter in mm.
    pub pipe_inside_diameter: Option<Value>,
    /// Meter tube material.
    pub pipe_material: Option<Value>,
    /// Temperature at which the tube was measured, in °C.
    pub pipe_reference_temperature: Option<Value>,
    /// Isentropic exponent of the gas.
    pub isentropic_exponent: Option<Value>,
    /// Dynamic viscosity in cP.
    pub viscosity: Option<Value>,
    /// Stored as `flowExtentsion` by the flow computer export.
    #[serde(rename = "flowExtentsion")]
    pub flow_extension: Option<Value>,
    /// Correctly spelled `flowExtension`; used only when `flowExtentsion` is absent.
    #[serde(rename = "flowExtension")]
    pub flow_extension_corrected: Option<Value>,
}

/// Gas composition settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Aga8 {
    /// Composition units (e.g., `"molar_fraction"`).
    pub units: Option<Value>,
    /// Per-component fractions.
    #[serde(deserialize_with = "mapping_list")]
    pub components: Vec<GasComponent>,
    /// Gas density in kg/m³.
    pub density: Option<Value>,
    /// Compressibility factor.
    pub compressibility: Option<Value>,
}

/// One entry of the gas composition list.
#[derive(Debug, Clone, Deserialize)]
pub struct GasComponent {
    /// Component name (e.g., `"Methane"`).
    pub component: String,
    /// Fraction of the mixture.
    #[serde(default)]
    pub value: Option<Value>,
}

/// Transmitters attached to the meter run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sensors {
    /// Differential pressure transmitter.
    #[serde(deserialize_with = "mapping")]
    pub differential_pressure: Sensor,
    /// Static pressure transmitter.
    #[serde(deserialize_with = "mapping")]
    pub static_pressure: Sensor,
    /// Flowing temperature transmitter.
    #[serde(deserialize_with = "mapping")]
    pub flowing_temperature: Sensor,
}

/// A single transmitter. Not every sensor kind reports every field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Sensor {
    /// Where the reading comes from (e.g., a register or tag).
    pub source: Option<Value>,
    /// Transmitter serial number.
    pub serial_number: Option<Value>,
    /// Lower range value.
    pub minimum_range: Option<Value>,
    /// Upper range value.
    pub maximum_range: Option<Value>,
    /// Upstream or downstream tap.
    pub tap_location: Option<Value>,
    /// Gauge or absolute.
    pub sensor_type: Option<Value>,
}

/// Reads a section that must be a mapping. An explicit `null` reads as an
/// empty section; any other non-mapping value is rejected.
fn mapping<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Map<String, Value>>::deserialize(deserializer)? {
        Some(map) => from_mapping(map).map_err(de::Error::custom),
        None => Ok(T::default()),
    }
}

/// Reads a list whose entries must each be a mapping. `null` reads as empty.
fn mapping_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Option::<Vec<Map<String, Value>>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .map(|map| from_mapping(map).map_err(de::Error::custom))
        .collect()
}

/// Reads an optional section that must be a mapping when present.
pub(crate) fn optional_mapping<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Option::<Map<String, Value>>::deserialize(deserializer)?
        .map(|map| from_mapping(map).map_err(de::Error::custom))
        .transpose()
}

fn from_mapping<T: DeserializeOwned>(map: Map<String, Value>) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(map))
}

// -----------------------------------------------------------------------------
// Profile instance (converter output)
// -----------------------------------------------------------------------------

/// A `{value, unit?}` record attached to a named property of an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// The configured or measured value, copied verbatim.
    pub value: Value,
    /// Compact QUDT unit reference; omitted for dimensionless or textual values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// When a live reading was taken (ISO-8601, UTC). Configuration values carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A concrete piece of equipment and its property values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInstance {
    /// Prefix declarations.
    #[serde(rename = "@context")]
    pub context: Context,
    /// Instance IRI (e.g., `sm:OrificeGasMeter/Instance/W1`).
    #[serde(rename = "@id")]
    pub id: String,
    /// Equipment type tag.
    #[serde(rename = "@type")]
    pub type_: String,
    /// Display name.
    #[serde(rename = "rdfs:label")]
    pub label: String,
    /// Property name → value record, in mapping order.
    #[serde(rename = "sm:propertyValues")]
    pub property_values: IndexMap<String, PropertyValue>,
}

// -----------------------------------------------------------------------------
// Device document (live builder output)
// -----------------------------------------------------------------------------

/// A live instance of a flow computer, meter run, or meter.
///
/// Instances nest: a flow computer lists its runs under `jpi:hasRun`, and a
/// run points at its meter through `jpi:hasMeterConfiguration`. Only the
/// outermost document declares `@context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInstance {
    /// Prefix declarations; present on the outermost document only.
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    /// Instance IRI (e.g., `jpi:MeterRun/Instance/RUN1`).
    #[serde(rename = "@id")]
    pub id: String,
    /// Profile tag.
    #[serde(rename = "@type")]
    pub type_: String,
    /// Display name.
    #[serde(rename = "rdfs:label")]
    pub label: String,
    /// Property name → value record, in build order.
    #[serde(rename = "jpi:propertyValues")]
    pub property_values: IndexMap<String, PropertyValue>,
    /// The meter measuring this run.
    #[serde(
        rename = "jpi:hasMeterConfiguration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub meter_configuration: Option<Box<DeviceInstance>>,
    /// Runs attached to this flow computer.
    #[serde(rename = "jpi:hasRun", default, skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<DeviceInstance>,
}

impl DeviceInstance {
    /// Returns the value of the `Status` property, if it is a string.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.property_values
            .get("Status")
            .and_then(|p| p.value.as_str())
    }
}

// -----------------------------------------------------------------------------
// Profile schema (generator output)
// -----------------------------------------------------------------------------

/// How clients may access a property.
///
/// Generated schemas only use [`AccessMode::Read`]; `readwrite` appears in
/// hand-edited profiles for setpoints and must survive a read/write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Value is reported by the equipment.
    Read,
    /// Value may also be written back.
    ReadWrite,
}

/// One property an instance of an equipment type may carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Property IRI, scoped under the equipment type.
    #[serde(rename = "@id")]
    pub id: String,
    /// Always `sm:Property`.
    #[serde(rename = "@type")]
    pub type_: String,
    /// Property name.
    #[serde(rename = "rdfs:label")]
    pub label: String,
    /// Description.
    #[serde(rename = "rdfs:comment")]
    pub comment: String,
    /// Compact `xsd:` datatype.
    #[serde(rename = "sm:dataType")]
    pub data_type: String,
    /// Read or read-write.
    #[serde(rename = "sm:accessMode")]
    pub access_mode: AccessMode,
    /// Compact unit reference for dimensioned datatypes.
    #[serde(rename = "sm:unit", default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// An equipment type and the properties its instances carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSchema {
    /// Prefix declarations.
    #[serde(rename = "@context")]
    pub context: Context,
    /// Equipment type IRI (e.g., `sm:TurbineMeter`).
    #[serde(rename = "@id")]
    pub id: String,
    /// Always `sm:EquipmentType` for generated schemas.
    #[serde(rename = "@type")]
    pub type_: String,
    /// Equipment type name as entered.
    #[serde(rename = "rdfs:label")]
    pub label: String,
    /// Description.
    #[serde(rename = "rdfs:comment")]
    pub comment: String,
    /// Profile version.
    #[serde(rename = "sm:version")]
    pub version: String,
    /// Property definitions in insertion order.
    #[serde(rename = "sm:properties")]
    pub properties: Vec<PropertyDefinition>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::namespaces::INSTANCE_NAMESPACES;

    #[test]
    fn context_keeps_declaration_order() {
        let ctx = Context::from_namespaces(INSTANCE_NAMESPACES);
        let prefixes: Vec<&str> = ctx.prefixes().collect();
        assert_eq!(prefixes, ["sm", "rdfs", "xsd", "unit"]);
        assert_eq!(ctx.iri("unit"), Some("http://qudt.org/vocab/unit/"));
        assert_eq!(ctx.iri("qudt"), None);
    }

    #[test]
    fn property_value_omits_missing_unit() {
        let value = PropertyValue {
            value: json!("Flange"),
            unit: None,
            timestamp: None,
        };
        assert_eq!(serde_json::to_value(&value).ok(), Some(json!({"value": "Flange"})));
    }

    #[test]
    fn null_sections_read_as_empty() {
        let doc: ConfigurationDocument = serde_json::from_value(json!({
            "configuration": {
                "name": null,
                "AGA3": null,
                "AGA8": {"components": null},
                "sensors": {"staticPressure": null}
            }
        }))
        .unwrap();
        assert!(doc.configuration.name.is_none());
        assert!(doc.configuration.aga3.orifice_diameter.is_none());
        assert!(doc.configuration.aga8.components.is_empty());
        assert!(doc.configuration.sensors.static_pressure.source.is_none());
    }

    #[test]
    fn sections_must_be_objects() {
        let positional = ConfigurationDocument::from_value(json!({
            "configuration": {"AGA3": ["AGA3_1992", "Flange", 50.8]}
        }));
        assert!(positional.is_err());

        let sensor = ConfigurationDocument::from_value(json!({
            "configuration": {"sensors": {"staticPressure": ["S1", "SN-1"]}}
        }));
        assert!(sensor.is_err());

        let component = ConfigurationDocument::from_value(json!({
            "configuration": {"AGA8": {"components": [["Methane", 0.95]]}}
        }));
        assert!(component.is_err());
    }

    #[test]
    fn root_must_be_an_object() {
        let err = ConfigurationDocument::from_value(json!([["Well A", "Acme"]])).unwrap_err();
        assert!(err.to_string().contains("found an array"));
        assert!(ConfigurationDocument::from_value(Value::Null).is_err());
        assert!(ConfigurationDocument::from_value(json!({})).is_ok());
    }

    #[test]
    fn nested_device_instances_round_trip() {
        let doc = json!({
            "@context": {"jpi": "https://github.com/JPISolutions/SMProfiles/profiles/v1#"},
            "@id": "jpi:FlowComputer/Instance/FC1",
            "@type": "jpi:FlowComputer",
            "rdfs:label": "FC1",
            "jpi:propertyValues": {
                "Status": {"value": "Alarm", "timestamp": "2024-05-01T12:00:00.000Z"}
            },
            "jpi:hasRun": [{
                "@id": "jpi:MeterRun/Instance/R1",
                "@type": "jpi:MeterRun",
                "rdfs:label": "Run 1",
                "jpi:propertyValues": {},
                "jpi:hasMeterConfiguration": {
                    "@id": "jpi:OrificeGasMeter/Instance/M1",
                    "@type": "jpi:OrificeGasMeter",
                    "rdfs:label": "Meter 1",
                    "jpi:propertyValues": {"FlowRate": {"value": 12.5, "unit": "unit:M3-PER-HR"}}
                }
            }]
        });
        let device: DeviceInstance = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(device.status(), Some("Alarm"));
        assert!(device.runs[0].context.is_none());
        assert_eq!(
            device.runs[0].meter_configuration.as_ref().unwrap().label,
            "Meter 1"
        );
        assert_eq!(serde_json::to_value(&device).unwrap(), doc);
    }

    #[test]
    fn flow_extension_accepts_both_spellings() {
        let exported: Aga3 = serde_json::from_value(json!({"flowExtentsion": "Method_1"})).unwrap();
        let corrected: Aga3 = serde_json::from_value(json!({"flowExtension": "Method_2"})).unwrap();
        assert_eq!(exported.flow_extension, Some(json!("Method_1")));
        assert_eq!(corrected.flow_extension_corrected, Some(json!("Method_2")));

        let both: Aga3 = serde_json::from_value(
            json!({"flowExtentsion": "Method_1", "flowExtension": "Method_2"}),
        )
        .unwrap();
        assert_eq!(both.flow_extension, Some(json!("Method_1")));
        assert_eq!(both.flow_extension_corrected, Some(json!("Method_2")));
    }

    #[test]
    fn gas_component_requires_a_name() {
        let result = serde_json::from_value::<GasComponent>(json!({"value": 0.5}));
        assert!(result.is_err());
    }

    #[test]
    fn access_mode_serializes_lowercase() {
        assert_eq!(serde_json::to_value(AccessMode::Read).ok(), Some(json!("read")));
        assert_eq!(
            serde_json::to_value(AccessMode::ReadWrite).ok(),
            Some(json!("readwrite"))
        );
    }
}
