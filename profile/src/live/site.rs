//! Per-installation settings: identities of the device, run, and meter, and
//! how raw registers map onto payload values.
//!
//! Every key is optional. A site file only lists what differs:
//!
//! ```toml
//! owner = "Acme Midstream"
//!
//! [device]
//! id = "FC-0042"
//!
//! [registers.scale]
//! pressure = 6.89476   # registers report psi
//!
//! [registers.defaults]
//! orifice_diameter = 38.1
//! latitude = 54.12
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// A site file that could not be loaded.
#[derive(Debug, Error)]
pub enum SiteError {
    /// The file could not be read.
    #[error("failed to read site file {}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid TOML or has unknown keys.
    #[error("failed to parse site file")]
    Parse(#[from] toml::de::Error),
}

/// Everything about an installation that the poll itself does not report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Operating company, stamped on the meter and the run.
    pub owner: String,
    /// The flow computer.
    pub device: DeviceIdentity,
    /// The meter run.
    pub run: RunIdentity,
    /// The meter on the run.
    pub meter: MeterIdentity,
    /// Register mapping settings.
    pub registers: RegisterSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            owner: "Your Company".to_owned(),
            device: DeviceIdentity::default(),
            run: RunIdentity::default(),
            meter: MeterIdentity::default(),
            registers: RegisterSettings::default(),
        }
    }
}

impl SiteConfig {
    /// Parses a site file; omitted keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Parse`] if the text is not valid TOML or has unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, SiteError> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a site file.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SiteError> {
        let text = std::fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Identity of the flow computer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceIdentity {
    /// Instance id, also used in the publish topic.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Manufacturer.
    pub manufacturer: String,
    /// Model.
    pub model: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            id: "SCADAPAK-474".to_owned(),
            name: "SCADAPack 474 Flow Computer".to_owned(),
            manufacturer: "Schneider_Electric".to_owned(),
            model: "SCADAPack 474".to_owned(),
        }
    }
}

/// Identity of the meter run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunIdentity {
    /// Instance id.
    pub id: String,
    /// Run number on the device.
    pub number: u32,
    /// Display name.
    pub name: String,
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self {
            id: "SCADAPAK-474-RUN1".to_owned(),
            number: 1,
            name: "Run 1 - Sales".to_owned(),
        }
    }
}

/// Identity of the meter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeterIdentity {
    /// Instance id.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Default for MeterIdentity {
    fn default() -> Self {
        Self {
            id: "SCADAPAK-474-RUN1-METER".to_owned(),
            name: "SCADAPak 474 Orifice Meter".to_owned(),
        }
    }
}

/// How named registers become payload values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegisterSettings {
    /// Multipliers converting register units to payload units.
    pub scale: ScaleFactors,
    /// Values used when a register is not reported.
    pub defaults: RegisterDefaults,
}

/// Multipliers applied to raw register readings.
///
/// All are 1 when registers already report m³/h, kPa, °C, m³, and mm.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaleFactors {
    /// Flow rate (0.001 for L/h registers).
    pub flow_rate: f64,
    /// Pressures (6.89476 for psi registers).
    pub pressure: f64,
    /// Temperatures.
    pub temperature: f64,
    /// Volumes (0.0283168 for scf registers).
    pub volume: f64,
    /// Diameters (25.4 for inch registers).
    pub diameter: f64,
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self {
            flow_rate: 1.0,
            pressure: 1.0,
            temperature: 1.0,
            volume: 1.0,
            diameter: 1.0,
        }
    }
}

/// Static values for quantities that are configured once rather than polled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegisterDefaults {
    /// Orifice bore in mm.
    pub orifice_diameter: f64,
    /// Meter tube inside diameter in mm.
    pub pipe_inside_diameter: f64,
    /// Base temperature in °C.
    pub base_temperature: f64,
    /// Base pressure in kPa.
    pub base_pressure: f64,
    /// Atmospheric pressure in kPa.
    pub atmospheric_pressure: f64,
    /// Contract day rollover hour.
    pub contract_hour: u32,
    /// AGA-3 calculation edition.
    pub aga3_calculation: String,
    /// Device IP address.
    pub ip_address: String,
    /// Modbus slave address.
    pub modbus_address: u32,
    /// Free-text location.
    pub location: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Elevation in metres.
    pub elevation: Option<f64>,
    /// Surface legal subdivision.
    pub surface_lsd: Option<String>,
}

impl Default for RegisterDefaults {
    fn default() -> Self {
        Self {
            orifice_diameter: 26.1,
            pipe_inside_diameter: 76.1,
            base_temperature: 15.0,
            base_pressure: 101.325,
            atmospheric_pressure: 101.325,
            contract_hour: 8,
            aga3_calculation: "AGA3_1992".to_owned(),
            ip_address: "192.168.1.100".to_owned(),
            modbus_address: 1,
            location: None,
            latitude: None,
            longitude: None,
            elevation: None,
            surface_lsd: None,
        }
    }
}
