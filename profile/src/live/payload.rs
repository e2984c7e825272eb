//! The flat poll payload and its construction from named registers.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::site::RegisterSettings;
use super::{is_set, Status};
use crate::model::optional_mapping;

/// A register reading that cannot be scaled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegisterError {
    /// A scaled register holds something other than a number.
    #[error("register {register} is not numeric: {value}")]
    NotNumeric {
        /// Register name as reported.
        register: String,
        /// The offending reading.
        value: Value,
    },
}

/// One poll of a flow computer, flattened.
///
/// Every field is optional; the builders fall back to site defaults or omit
/// the property. Values are copied into documents without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DevicePayload {
    // Meter location and base conditions.
    /// Latitude in decimal degrees.
    pub latitude: Option<Value>,
    /// Longitude in decimal degrees.
    pub longitude: Option<Value>,
    /// Elevation in metres.
    pub elevation: Option<Value>,
    /// Surface legal subdivision.
    #[serde(rename = "surfaceLSD")]
    pub surface_lsd: Option<Value>,
    /// Downhole legal subdivision.
    #[serde(rename = "downholeLSD")]
    pub downhole_lsd: Option<Value>,
    /// Base temperature in °C.
    pub base_temperature: Option<Value>,
    /// Base pressure in kPa.
    pub base_pressure: Option<Value>,
    /// Atmospheric pressure in kPa.
    pub atmospheric_pressure: Option<Value>,
    /// Unit system.
    pub units: Option<Value>,
    /// Contract day rollover hour.
    pub contract_hour: Option<Value>,

    // AGA-3 configuration.
    /// AGA-3 calculation edition.
    pub aga3_calculation: Option<Value>,
    /// Tap type.
    pub orifice_tap_type: Option<Value>,
    /// Orifice bore in mm.
    pub orifice_diameter: Option<Value>,
    /// Orifice plate material.
    pub orifice_material: Option<Value>,
    /// Orifice reference temperature in °C.
    pub orifice_ref_temp: Option<Value>,
    /// Meter tube inside diameter in mm.
    pub pipe_inside_diameter: Option<Value>,
    /// Meter tube material.
    pub pipe_material: Option<Value>,
    /// Meter tube reference temperature in °C.
    pub pipe_ref_temp: Option<Value>,
    /// Isentropic exponent.
    pub isentropic_exponent: Option<Value>,
    /// Viscosity in cP.
    pub viscosity: Option<Value>,
    /// Flow extension method.
    pub flow_extension: Option<Value>,

    // Gas properties.
    /// Component name (e.g., `methane`) → molar fraction, plus `units`.
    #[serde(deserialize_with = "optional_mapping")]
    pub gas_composition: Option<Map<String, Value>>,
    /// Gas density in kg/m³.
    pub gas_density: Option<Value>,
    /// Compressibility factor.
    pub compressibility: Option<Value>,
    /// Specific gravity.
    pub specific_gravity: Option<Value>,

    // Transmitters.
    /// Differential pressure transmitter.
    #[serde(deserialize_with = "optional_mapping")]
    pub dp_sensor: Option<PayloadSensor>,
    /// Static pressure transmitter.
    #[serde(deserialize_with = "optional_mapping")]
    pub static_pressure_sensor: Option<PayloadSensor>,
    /// Temperature transmitter.
    #[serde(deserialize_with = "optional_mapping")]
    pub temp_sensor: Option<PayloadSensor>,

    // Live measurements and totals.
    /// Flow rate in m³/h.
    pub flow_rate: Option<Value>,
    /// Differential pressure in kPa.
    pub differential_pressure: Option<Value>,
    /// Static pressure in kPa.
    pub static_pressure: Option<Value>,
    /// Flowing temperature in °C.
    pub temperature: Option<Value>,
    /// Energy flow rate in GJ/h.
    pub energy_flow_rate: Option<Value>,
    /// Heating value in MJ/m³.
    pub heating_value: Option<Value>,
    /// Accumulated volume in m³.
    pub accumulated_volume: Option<Value>,
    /// Accumulated energy in GJ.
    pub accumulated_energy: Option<Value>,
    /// Volume so far today in m³.
    pub current_day_volume: Option<Value>,
    /// Yesterday's volume in m³.
    pub previous_day_volume: Option<Value>,
    /// Volume so far this hour in m³.
    pub current_hour_volume: Option<Value>,
    /// Last hour's volume in m³.
    pub previous_hour_volume: Option<Value>,
    /// Meter status label.
    pub meter_status: Option<Value>,

    // Meter run.
    /// Explicit run status; derived from the meter when unset.
    pub run_status: Option<Value>,
    /// Whether the run is enabled.
    pub run_enabled: Option<Value>,
    /// Flow direction.
    pub flow_direction: Option<Value>,
    /// Purpose of the run (e.g., `Sales`).
    pub purpose: Option<Value>,

    // Flow computer.
    /// Explicit device status; derived from the run when unset.
    pub device_status: Option<Value>,
    /// Explicit active alarm count.
    pub active_alarm_count: Option<Value>,
    /// Device serial number.
    pub serial_number: Option<Value>,
    /// Firmware version.
    pub firmware_version: Option<Value>,
    /// Hardware revision.
    pub hardware_revision: Option<Value>,
    /// IP address.
    pub ip_address: Option<Value>,
    /// MAC address.
    pub mac_address: Option<Value>,
    /// Subnet mask.
    pub subnet_mask: Option<Value>,
    /// Default gateway.
    pub gateway: Option<Value>,
    /// Modbus slave address.
    pub modbus_address: Option<Value>,
    /// Free-text location.
    pub location: Option<Value>,
    /// Time zone.
    pub time_zone: Option<Value>,
    /// Uptime in seconds.
    pub uptime: Option<Value>,
    /// CPU load in percent.
    pub cpu_load: Option<Value>,
    /// Memory used in percent.
    pub memory_used: Option<Value>,
    /// Battery voltage.
    pub battery_voltage: Option<Value>,
    /// Power supply voltage.
    pub power_supply_voltage: Option<Value>,
    /// Enclosure temperature in °C.
    pub ambient_temperature: Option<Value>,
}

/// A transmitter as reported in the payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayloadSensor {
    /// Where the reading comes from.
    pub source: Option<Value>,
    /// Serial number.
    pub serial_number: Option<Value>,
    /// Lower range value.
    pub min_range: Option<Value>,
    /// Upper range value.
    pub max_range: Option<Value>,
    /// Upstream or downstream tap.
    pub tap_location: Option<Value>,
    /// Gauge or absolute.
    #[serde(rename = "type")]
    pub sensor_type: Option<Value>,
}

/// Maps named register readings onto a payload.
///
/// Each quantity is read from the first of its register names that holds a
/// set value. Scaled quantities fall back to zero or a site default and must
/// be numeric; the status register is decoded to its label.
///
/// # Errors
///
/// Returns [`RegisterError::NotNumeric`] if a scaled register holds a
/// non-numeric value.
pub fn payload_from_registers(
    raw: &Map<String, Value>,
    settings: &RegisterSettings,
) -> Result<DevicePayload, RegisterError> {
    let scale = &settings.scale;
    let defaults = &settings.defaults;
    let passthrough = |names: &[&str]| first_set(raw, names).map(|(_, v)| v.clone());
    let or_default = |names: &[&str], default: Value| passthrough(names).unwrap_or(default);

    Ok(DevicePayload {
        flow_rate: Some(scaled(raw, &["flowRate"], 0.0, scale.flow_rate)?),
        differential_pressure: Some(scaled(raw, &["dp", "differentialPressure"], 0.0, scale.pressure)?),
        static_pressure: Some(scaled(raw, &["sp", "staticPressure"], 0.0, scale.pressure)?),
        temperature: Some(scaled(raw, &["temp", "temperature"], 0.0, scale.temperature)?),

        accumulated_volume: Some(scaled(raw, &["accumVol", "accumulatedVolume"], 0.0, scale.volume)?),
        current_day_volume: Some(scaled(raw, &["todayVol", "currentDayVolume"], 0.0, scale.volume)?),
        previous_day_volume: Some(scaled(raw, &["yesterdayVol", "previousDayVolume"], 0.0, scale.volume)?),
        current_hour_volume: Some(scaled(raw, &["hourVol", "currentHourVolume"], 0.0, scale.volume)?),
        previous_hour_volume: Some(scaled(raw, &["prevHourVol", "previousHourVolume"], 0.0, scale.volume)?),

        orifice_diameter: Some(scaled(raw, &["orificeDia"], defaults.orifice_diameter, scale.diameter)?),
        pipe_inside_diameter: Some(scaled(raw, &["pipeDia"], defaults.pipe_inside_diameter, scale.diameter)?),
        base_temperature: Some(or_default(&["baseTemp"], defaults.base_temperature.into())),
        base_pressure: Some(or_default(&["basePress"], defaults.base_pressure.into())),
        atmospheric_pressure: Some(or_default(&["atmPress"], defaults.atmospheric_pressure.into())),
        contract_hour: Some(or_default(&["contractHr"], defaults.contract_hour.into())),
        aga3_calculation: Some(defaults.aga3_calculation.clone().into()),

        gas_density: passthrough(&["gasDensity", "density"]),
        compressibility: passthrough(&["zFactor", "compressibility"]),
        specific_gravity: passthrough(&["sg", "specificGravity"]),
        energy_flow_rate: passthrough(&["energyRate", "energyFlowRate"]),
        heating_value: passthrough(&["hv", "heatingValue"]),

        cpu_load: passthrough(&["cpuLoad"]),
        memory_used: passthrough(&["memUsed", "memoryUsed"]),
        battery_voltage: passthrough(&["battVolt", "batteryVoltage"]),
        power_supply_voltage: passthrough(&["psVolt", "powerSupplyVoltage"]),
        ambient_temperature: passthrough(&["ambTemp", "ambientTemperature"]),
        uptime: passthrough(&["uptime"]),

        ip_address: Some(defaults.ip_address.clone().into()),
        modbus_address: Some(defaults.modbus_address.into()),

        location: defaults.location.clone().map(Value::from),
        latitude: defaults.latitude.map(Value::from),
        longitude: defaults.longitude.map(Value::from),
        elevation: defaults.elevation.map(Value::from),
        surface_lsd: defaults.surface_lsd.clone().map(Value::from),

        meter_status: Some(decode_status(first_set(raw, &["status", "meterStatus"])).as_str().into()),

        ..DevicePayload::default()
    })
}

/// The first of `names` whose reading is set, with the name it was found under.
fn first_set<'a, 'n>(
    raw: &'a Map<String, Value>,
    names: &[&'n str],
) -> Option<(&'n str, &'a Value)> {
    names.iter().find_map(|name| {
        raw.get(*name)
            .filter(|v| is_set(Some(*v)))
            .map(|v| (*name, v))
    })
}

fn scaled(
    raw: &Map<String, Value>,
    names: &[&str],
    fallback: f64,
    factor: f64,
) -> Result<Value, RegisterError> {
    let reading = match first_set(raw, names) {
        Some((name, value)) => value.as_f64().ok_or_else(|| RegisterError::NotNumeric {
            register: name.to_owned(),
            value: value.clone(),
        })?,
        None => fallback,
    };
    Ok(Value::from(reading * factor))
}

fn decode_status(reading: Option<(&str, &Value)>) -> Status {
    reading
        .and_then(|(_, v)| {
            v.as_i64()
                .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        })
        .map_or(Status::Normal, Status::from_code)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::live::site::ScaleFactors;

    fn registers(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test registers are objects"),
        }
    }

    #[test]
    fn empty_registers_use_zero_and_site_defaults() {
        let payload = payload_from_registers(&Map::new(), &RegisterSettings::default()).unwrap();
        assert_eq!(payload.flow_rate, Some(json!(0.0)));
        assert_eq!(payload.accumulated_volume, Some(json!(0.0)));
        assert_eq!(payload.orifice_diameter, Some(json!(26.1)));
        assert_eq!(payload.pipe_inside_diameter, Some(json!(76.1)));
        assert_eq!(payload.base_pressure, Some(json!(101.325)));
        assert_eq!(payload.contract_hour, Some(json!(8)));
        assert_eq!(payload.aga3_calculation, Some(json!("AGA3_1992")));
        assert_eq!(payload.ip_address, Some(json!("192.168.1.100")));
        assert_eq!(payload.meter_status, Some(json!("Normal")));
        assert_eq!(payload.gas_density, None);
        assert_eq!(payload.latitude, None);
    }

    #[test]
    fn short_names_win_and_scale_applies() {
        let raw = registers(json!({
            "dp": 2.0,
            "differentialPressure": 99.0,
            "staticPressure": 100.0,
            "orificeDia": 2.0,
            "zFactor": 0.998,
            "density": 0.71
        }));
        let settings = RegisterSettings {
            scale: ScaleFactors {
                pressure: 10.0,
                diameter: 25.4,
                ..ScaleFactors::default()
            },
            ..RegisterSettings::default()
        };
        let payload = payload_from_registers(&raw, &settings).unwrap();
        assert_eq!(payload.differential_pressure, Some(json!(20.0)));
        assert_eq!(payload.static_pressure, Some(json!(1000.0)));
        assert_eq!(payload.orifice_diameter, Some(json!(50.8)));
        assert_eq!(payload.compressibility, Some(json!(0.998)));
        assert_eq!(payload.gas_density, Some(json!(0.71)));
    }

    #[test]
    fn zero_reading_falls_through_to_next_name() {
        let raw = registers(json!({"sp": 0, "staticPressure": 350.5}));
        let payload = payload_from_registers(&raw, &RegisterSettings::default()).unwrap();
        assert_eq!(payload.static_pressure, Some(json!(350.5)));
    }

    #[test]
    fn status_register_decodes() {
        for (code, label) in [(json!(1), "Alarm"), (json!(2.0), "Fault"), (json!(3), "Offline"), (json!(9), "Normal")] {
            let raw = registers(json!({ "status": code }));
            let payload = payload_from_registers(&raw, &RegisterSettings::default()).unwrap();
            assert_eq!(payload.meter_status, Some(json!(label)));
        }
    }

    #[test]
    fn non_numeric_scaled_register_is_rejected() {
        let raw = registers(json!({"flowRate": "12.5"}));
        let err = payload_from_registers(&raw, &RegisterSettings::default()).unwrap_err();
        assert_eq!(
            err,
            RegisterError::NotNumeric {
                register: "flowRate".to_owned(),
                value: json!("12.5"),
            }
        );
    }

    #[test]
    fn sensor_sections_must_be_objects() {
        let ok: DevicePayload =
            serde_json::from_value(json!({"dpSensor": {"source": "AI1", "type": "gauge"}})).unwrap();
        assert_eq!(ok.dp_sensor.unwrap().source, Some(json!("AI1")));
        assert!(serde_json::from_value::<DevicePayload>(json!({"dpSensor": ["AI1", "SN"]})).is_err());
        assert!(serde_json::from_value::<DevicePayload>(json!({"gasComposition": [0.9]})).is_err());
    }
}
