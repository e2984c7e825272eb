//! Builders for the flow computer, meter run, and meter instances.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use super::payload::{DevicePayload, PayloadSensor};
use super::site::SiteConfig;
use super::{is_set, set_or, Status};
use crate::convert::GAS_COMPONENT_PREFIX;
use crate::model::{Context, DeviceInstance, PropertyValue};
use crate::namespaces::{self, types, units, DEVICE_NAMESPACES};

/// Payload key → component code of the `GasComp_*` properties, in output order.
const GAS_COMPONENTS: &[(&str, &str)] = &[
    ("methane", "C1"),
    ("ethane", "C2"),
    ("propane", "C3"),
    ("isoButane", "iC4"),
    ("nButane", "nC4"),
    ("isoPentane", "iC5"),
    ("nPentane", "nC5"),
    ("hexane", "C6"),
    ("heptane", "C7"),
    ("octane", "C8"),
    ("nonane", "C9"),
    ("decane", "C10"),
    ("nitrogen", "N2"),
    ("carbonDioxide", "CO2"),
    ("hydrogenSulfide", "H2S"),
    ("hydrogen", "H2"),
    ("helium", "He"),
    ("water", "H2O"),
    ("carbonMonoxide", "CO"),
    ("oxygen", "O2"),
    ("argon", "Ar"),
];

/// Formats a poll time the way documents carry it: UTC, millisecond precision,
/// `Z` suffix (e.g., `2024-05-01T12:00:00.000Z`).
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Topic a device document is published under.
#[must_use]
pub fn topic(site: &SiteConfig) -> String {
    format!("efm/devices/{}/data", site.device.id)
}

/// Builds the full document for one poll: the flow computer with its run and
/// the run's meter nested inside.
#[must_use]
pub fn build_device_document(
    payload: &DevicePayload,
    site: &SiteConfig,
    at: DateTime<Utc>,
) -> DeviceInstance {
    info!("Building device document: {}", site.device.id);
    let meter = build_meter(payload, site, at);
    let run = build_meter_run(payload, site, Some(meter), at);
    build_flow_computer(payload, site, Some(run), at)
}

/// Builds the `jpi:OrificeGasMeter` instance.
///
/// Configuration values fall back to typical orifice settings when unset;
/// optional groups (location, gas composition, transmitters, energy) appear
/// only when the payload has them.
#[must_use]
pub fn build_meter(payload: &DevicePayload, site: &SiteConfig, at: DateTime<Utc>) -> DeviceInstance {
    use Reading::{Config, Live};

    let timestamp = format_timestamp(at);
    let mut p = Properties::new(&timestamp);

    p.put("Name", site.meter.name.as_str().into(), None, Config);
    p.put("Owner", site.owner.as_str().into(), None, Config);
    p.when_set("Latitude", payload.latitude.as_ref(), Some(units::DEGREE), Config);
    p.when_set("Longitude", payload.longitude.as_ref(), Some(units::DEGREE), Config);
    p.when_set("Elevation", payload.elevation.as_ref(), Some(units::METRE), Config);
    p.when_set("SurfaceLSD", payload.surface_lsd.as_ref(), None, Config);
    p.when_set("DownholeLSD", payload.downhole_lsd.as_ref(), None, Config);

    p.or("BaseTemperature", payload.base_temperature.as_ref(), 15.0, Some(units::DEGREE_CELSIUS), Config);
    p.or("BasePressure", payload.base_pressure.as_ref(), 101.325, Some(units::KILOPASCAL), Config);
    p.or("AtmosphericPressure", payload.atmospheric_pressure.as_ref(), 101.325, Some(units::KILOPASCAL), Config);
    p.or("Units", payload.units.as_ref(), "metric", None, Config);
    p.or("ContractHour", payload.contract_hour.as_ref(), 8, None, Config);
    p.or("AGA3_Calculation", payload.aga3_calculation.as_ref(), "AGA3_1992", None, Config);

    p.or("OrificeTapType", payload.orifice_tap_type.as_ref(), "Flange", None, Config);
    p.given("OrificeDiameter", payload.orifice_diameter.as_ref(), Some(units::MILLIMETRE), Config);
    p.or("OrificeMaterial", payload.orifice_material.as_ref(), "Type_316_Stainless_Steel", None, Config);
    p.or("OrificeReferenceTemperature", payload.orifice_ref_temp.as_ref(), 20.0, Some(units::DEGREE_CELSIUS), Config);
    p.given("PipeInsideDiameter", payload.pipe_inside_diameter.as_ref(), Some(units::MILLIMETRE), Config);
    p.or("PipeMaterial", payload.pipe_material.as_ref(), "Carbon_Steel", None, Config);
    p.or("PipeReferenceTemperature", payload.pipe_ref_temp.as_ref(), 20.0, Some(units::DEGREE_CELSIUS), Config);

    p.or("IsentropicExponent", payload.isentropic_exponent.as_ref(), 1.3, Some(units::UNITLESS), Config);
    p.or("Viscosity", payload.viscosity.as_ref(), 0.010268, Some(units::CENTIPOISE), Config);
    p.or("FlowExtension", payload.flow_extension.as_ref(), "Method_1", None, Config);

    if let Some(gas) = &payload.gas_composition {
        p.or("AGA8_Units", gas.get("units"), "molar_fraction", None, Config);
        for (key, code) in GAS_COMPONENTS {
            let name = format!("{GAS_COMPONENT_PREFIX}{code}");
            p.or(&name, gas.get(*key), 0, Some(units::UNITLESS), Config);
        }
    }

    p.when_set("GasDensity", payload.gas_density.as_ref(), Some(units::KILOGRAM_PER_CUBIC_METRE), Live);
    p.when_set("Compressibility", payload.compressibility.as_ref(), Some(units::UNITLESS), Live);
    p.when_set("SpecificGravity", payload.specific_gravity.as_ref(), Some(units::UNITLESS), Live);

    if let Some(dp) = &payload.dp_sensor {
        p.sensor("DPSensor", dp, units::KILOPASCAL, (0, 100));
    }
    if let Some(sp) = &payload.static_pressure_sensor {
        p.sensor("StaticPressureSensor", sp, units::KILOPASCAL, (0, 10000));
        p.or("StaticPressureSensor_TapLocation", sp.tap_location.as_ref(), "upstream", None, Config);
        p.or("StaticPressureSensor_Type", sp.sensor_type.as_ref(), "gauge", None, Config);
    }
    if let Some(temp) = &payload.temp_sensor {
        p.sensor("TempSensor", temp, units::DEGREE_CELSIUS, (-40, 100));
    }

    p.given("FlowRate", payload.flow_rate.as_ref(), Some(units::CUBIC_METRE_PER_HOUR), Live);
    p.given("DifferentialPressure", payload.differential_pressure.as_ref(), Some(units::KILOPASCAL), Live);
    p.given("StaticPressure", payload.static_pressure.as_ref(), Some(units::KILOPASCAL), Live);
    p.given("Temperature", payload.temperature.as_ref(), Some(units::DEGREE_CELSIUS), Live);
    p.when_set("EnergyFlowRate", payload.energy_flow_rate.as_ref(), Some(units::GIGAJOULE_PER_HOUR), Live);
    p.when_set("HeatingValue", payload.heating_value.as_ref(), Some(units::MEGAJOULE_PER_CUBIC_METRE), Live);

    p.or("AccumulatedVolume", payload.accumulated_volume.as_ref(), 0, Some(units::CUBIC_METRE), Live);
    p.when_set("AccumulatedEnergy", payload.accumulated_energy.as_ref(), Some(units::GIGAJOULE), Live);
    p.when_set("CurrentDayVolume", payload.current_day_volume.as_ref(), Some(units::CUBIC_METRE), Live);
    p.when_set("PreviousDayVolume", payload.previous_day_volume.as_ref(), Some(units::CUBIC_METRE), Config);
    p.when_set("CurrentHourVolume", payload.current_hour_volume.as_ref(), Some(units::CUBIC_METRE), Live);
    p.when_set("PreviousHourVolume", payload.previous_hour_volume.as_ref(), Some(units::CUBIC_METRE), Config);

    p.or("Status", payload.meter_status.as_ref(), Status::Normal.as_str(), None, Live);

    debug!("Built meter {} with {} properties", site.meter.id, p.values.len());
    DeviceInstance {
        context: None,
        id: instance_id("OrificeGasMeter", &site.meter.id),
        type_: types::LIVE_ORIFICE_GAS_METER.to_owned(),
        label: site.meter.name.clone(),
        property_values: p.values,
        meter_configuration: None,
        runs: Vec::new(),
    }
}

/// Builds the `jpi:MeterRun` instance, attaching `meter` as its meter configuration.
///
/// Without an explicit `runStatus` the run takes its status from the meter:
/// a faulted or offline meter faults the run, an alarmed meter alarms it.
#[must_use]
pub fn build_meter_run(
    payload: &DevicePayload,
    site: &SiteConfig,
    meter: Option<DeviceInstance>,
    at: DateTime<Utc>,
) -> DeviceInstance {
    use Reading::{Config, Live};

    let derived = Status::for_run(
        meter
            .as_ref()
            .and_then(DeviceInstance::status)
            .and_then(Status::from_label),
    );

    let timestamp = format_timestamp(at);
    let mut p = Properties::new(&timestamp);

    p.put("RunNumber", site.run.number.into(), None, Config);
    p.put("RunName", site.run.name.as_str().into(), None, Config);
    // Only orifice meters are built.
    p.put("MeterType", "Orifice".into(), None, Config);
    p.put(
        "Enabled",
        payload.run_enabled.clone().unwrap_or(Value::Bool(true)),
        None,
        Config,
    );
    p.or("FlowDirection", payload.flow_direction.as_ref(), "Forward", None, Config);
    p.put("Owner", site.owner.as_str().into(), None, Config);
    p.when_set("SurfaceLSD", payload.surface_lsd.as_ref(), None, Config);
    p.when_set("DownholeLSD", payload.downhole_lsd.as_ref(), None, Config);
    p.or("Purpose", payload.purpose.as_ref(), "Sales", None, Config);
    p.or("Status", payload.run_status.as_ref(), derived.as_str(), None, Live);

    debug!("Built run {} with {} properties", site.run.id, p.values.len());
    DeviceInstance {
        context: None,
        id: instance_id("MeterRun", &site.run.id),
        type_: types::METER_RUN.to_owned(),
        label: site.run.name.clone(),
        property_values: p.values,
        meter_configuration: meter.map(Box::new),
        runs: Vec::new(),
    }
}

/// Builds the outermost `jpi:FlowComputer` document, listing `run` under `jpi:hasRun`.
///
/// A faulted or alarmed run sets the device status and counts one active
/// alarm; `deviceStatus` and `activeAlarmCount` in the payload override both.
#[must_use]
pub fn build_flow_computer(
    payload: &DevicePayload,
    site: &SiteConfig,
    run: Option<DeviceInstance>,
    at: DateTime<Utc>,
) -> DeviceInstance {
    use Reading::{Config, Live};

    let run_status = run
        .as_ref()
        .and_then(DeviceInstance::status)
        .and_then(Status::from_label);
    let (derived, alarms) = match run_status {
        Some(Status::Fault) => (Status::Fault, 1),
        Some(Status::Alarm) => (Status::Alarm, 1),
        _ => (Status::Normal, 0),
    };
    let runs: Vec<DeviceInstance> = run.into_iter().collect();

    let timestamp = format_timestamp(at);
    let mut p = Properties::new(&timestamp);

    p.put("DeviceName", site.device.name.as_str().into(), None, Config);
    p.put("Manufacturer", site.device.manufacturer.as_str().into(), None, Config);
    p.put("Model", site.device.model.as_str().into(), None, Config);
    p.when_set("SerialNumber", payload.serial_number.as_ref(), None, Config);
    p.when_set("FirmwareVersion", payload.firmware_version.as_ref(), None, Config);
    p.when_set("HardwareRevision", payload.hardware_revision.as_ref(), None, Config);

    p.when_set("IPAddress", payload.ip_address.as_ref(), None, Config);
    p.when_set("MACAddress", payload.mac_address.as_ref(), None, Config);
    p.when_set("SubnetMask", payload.subnet_mask.as_ref(), None, Config);
    p.when_set("Gateway", payload.gateway.as_ref(), None, Config);
    p.when_set("ModbusAddress", payload.modbus_address.as_ref(), None, Config);

    p.when_set("Location", payload.location.as_ref(), None, Config);
    p.when_set("Latitude", payload.latitude.as_ref(), Some(units::DEGREE), Config);
    p.when_set("Longitude", payload.longitude.as_ref(), Some(units::DEGREE), Config);
    p.when_set("Elevation", payload.elevation.as_ref(), Some(units::METRE), Config);
    p.when_set("SurfaceLSD", payload.surface_lsd.as_ref(), None, Config);
    p.when_set("DownholeLSD", payload.downhole_lsd.as_ref(), None, Config);

    p.when_set("TimeZone", payload.time_zone.as_ref(), None, Config);
    p.put("CurrentDateTime", timestamp.as_str().into(), None, Config);
    p.when_set("Uptime", payload.uptime.as_ref(), Some(units::SECOND), Config);

    p.put("NumberOfRuns", runs.len().into(), None, Config);
    p.when_set("ContractHour", payload.contract_hour.as_ref(), None, Config);
    p.when_set("AtmosphericPressure", payload.atmospheric_pressure.as_ref(), Some(units::KILOPASCAL), Config);

    p.when_set("CPULoad", payload.cpu_load.as_ref(), Some(units::PERCENT), Live);
    p.when_set("MemoryUsed", payload.memory_used.as_ref(), Some(units::PERCENT), Live);
    p.when_set("BatteryVoltage", payload.battery_voltage.as_ref(), Some(units::VOLT), Live);
    p.when_set("PowerSupplyVoltage", payload.power_supply_voltage.as_ref(), Some(units::VOLT), Live);
    p.when_set("AmbientTemperature", payload.ambient_temperature.as_ref(), Some(units::DEGREE_CELSIUS), Live);

    p.or("Status", payload.device_status.as_ref(), derived.as_str(), None, Live);
    p.put(
        "ActiveAlarmCount",
        payload.active_alarm_count.clone().unwrap_or_else(|| alarms.into()),
        None,
        Config,
    );

    debug!("Built flow computer {} with {} properties", site.device.id, p.values.len());
    DeviceInstance {
        context: Some(Context::from_namespaces(DEVICE_NAMESPACES)),
        id: instance_id("FlowComputer", &site.device.id),
        type_: types::FLOW_COMPUTER.to_owned(),
        label: site.device.name.clone(),
        property_values: p.values,
        meter_configuration: None,
        runs,
    }
}

fn instance_id(profile: &str, id: &str) -> String {
    namespaces::compact(&namespaces::JPI, &format!("{profile}/Instance/{id}"))
}

/// Whether a property is a live reading stamped with the poll time.
#[derive(Debug, Clone, Copy)]
enum Reading {
    Config,
    Live,
}

/// Property values in insertion order. Null values are never recorded.
struct Properties<'t> {
    values: IndexMap<String, PropertyValue>,
    timestamp: &'t str,
}

impl<'t> Properties<'t> {
    fn new(timestamp: &'t str) -> Self {
        Self {
            values: IndexMap::new(),
            timestamp,
        }
    }

    fn put(&mut self, name: &str, value: Value, unit: Option<&str>, reading: Reading) {
        if value.is_null() {
            return;
        }
        let timestamp = match reading {
            Reading::Live => Some(self.timestamp.to_owned()),
            Reading::Config => None,
        };
        self.values.insert(
            name.to_owned(),
            PropertyValue {
                value,
                unit: unit.map(str::to_owned),
                timestamp,
            },
        );
    }

    /// Records `value` unless it is absent.
    fn given(&mut self, name: &str, value: Option<&Value>, unit: Option<&str>, reading: Reading) {
        if let Some(value) = value {
            self.put(name, value.clone(), unit, reading);
        }
    }

    /// Records `value` only if it is set.
    fn when_set(&mut self, name: &str, value: Option<&Value>, unit: Option<&str>, reading: Reading) {
        if is_set(value) {
            self.given(name, value, unit, reading);
        }
    }

    /// Records `value` if set, `default` otherwise.
    fn or(
        &mut self,
        name: &str,
        value: Option<&Value>,
        default: impl Into<Value>,
        unit: Option<&str>,
        reading: Reading,
    ) {
        self.put(name, set_or(value, default), unit, reading);
    }

    /// Records a transmitter's source, serial number, and range.
    fn sensor(&mut self, prefix: &str, sensor: &PayloadSensor, unit: &str, range: (i32, i32)) {
        let (min, max) = range;
        self.given(&format!("{prefix}_Source"), sensor.source.as_ref(), None, Reading::Config);
        self.given(&format!("{prefix}_SerialNumber"), sensor.serial_number.as_ref(), None, Reading::Config);
        self.or(&format!("{prefix}_MinRange"), sensor.min_range.as_ref(), min, Some(unit), Reading::Config);
        self.or(&format!("{prefix}_MaxRange"), sensor.max_range.as_ref(), max, Some(unit), Reading::Config);
    }
}
