//! Live device documents built from polled flow computer data.
//!
//! A poll of the flow computer yields a flat [`DevicePayload`] (directly, or
//! mapped from named registers with [`payload_from_registers`]). The builders
//! turn one payload into three nested instances:
//!
//! ```text
//! jpi:FlowComputer
//!   jpi:hasRun ─▶ jpi:MeterRun
//!                   jpi:hasMeterConfiguration ─▶ jpi:OrificeGasMeter
//! ```
//!
//! Live readings carry the poll timestamp; configuration values do not.
//! Status rolls up from the meter to its run and from the run to the device
//! unless the payload states it explicitly.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//! use sm_profile::live::{build_device_document, DevicePayload, SiteConfig};
//!
//! let payload: DevicePayload = serde_json::from_value(json!({
//!     "flowRate": 12.5,
//!     "meterStatus": "Fault"
//! }))?;
//! let polled_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
//! let device = build_device_document(&payload, &SiteConfig::default(), polled_at);
//!
//! assert_eq!(device.status(), Some("Fault"));
//! assert_eq!(device.runs[0].status(), Some("Fault"));
//! # Ok::<(), serde_json::Error>(())
//! ```

mod builder;
mod payload;
mod site;

use serde_json::Value;

pub use builder::{
    build_device_document, build_flow_computer, build_meter, build_meter_run, format_timestamp,
    topic,
};
pub use payload::{payload_from_registers, DevicePayload, PayloadSensor, RegisterError};
pub use site::{
    DeviceIdentity, MeterIdentity, RegisterDefaults, RegisterSettings, RunIdentity, ScaleFactors,
    SiteConfig, SiteError,
};

/// Operating state of a meter, run, or device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Operating normally.
    Normal,
    /// Operating with an active alarm.
    Alarm,
    /// Not measuring correctly.
    Fault,
    /// Not communicating.
    Offline,
}

impl Status {
    /// Returns the status as written into documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Normal => "Normal",
            Status::Alarm => "Alarm",
            Status::Fault => "Fault",
            Status::Offline => "Offline",
        }
    }

    /// Decodes a status register. Unknown codes read as [`Status::Normal`].
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Status::Alarm,
            2 => Status::Fault,
            3 => Status::Offline,
            _ => Status::Normal,
        }
    }

    /// Parses a status label; `None` for anything else.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Normal" => Some(Status::Normal),
            "Alarm" => Some(Status::Alarm),
            "Fault" => Some(Status::Fault),
            "Offline" => Some(Status::Offline),
            _ => None,
        }
    }

    /// The run status implied by its meter's status. An offline meter faults the run.
    #[must_use]
    pub fn for_run(meter: Option<Status>) -> Self {
        match meter {
            Some(Status::Fault | Status::Offline) => Status::Fault,
            Some(Status::Alarm) => Status::Alarm,
            _ => Status::Normal,
        }
    }
}

/// A payload value counts as set unless it is absent, `null`, `false`, zero,
/// or an empty string.
pub(crate) fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// The value if set, otherwise `default`.
pub(crate) fn set_or(value: Option<&Value>, default: impl Into<Value>) -> Value {
    match value {
        Some(v) if is_set(Some(v)) => v.clone(),
        _ => default.into(),
    }
}
