//! SM Profile documents as typed Rust data.
//!
//! The `sm-profile` crate models the document shapes handled by the SM
//! Profile tools and the transformations that produce profile documents:
//!
//! - [`convert`]: orifice meter configuration → `sm:OrificeGasMeter` instance
//! - [`live`]: polled device payload → nested `jpi:FlowComputer` document
//! - [`generate`]: equipment type name + property descriptors → skeleton
//!   `sm:EquipmentType` schema
//!
//! # Conversion
//!
//! ```
//! let json = r#"{"configuration":{"name":"Well A","AGA3":{"orificeDiameter":50.8}}}"#;
//! let instance = sm_profile::convert::convert_str(json, "W1")?;
//! assert_eq!(instance.id, "sm:OrificeGasMeter/Instance/W1");
//! assert_eq!(instance.property_values["OrificeDiameter"].unit.as_deref(), Some("unit:MilliM"));
//! # Ok::<(), sm_profile::ConvertError>(())
//! ```
//!
//! # Generation
//!
//! ```
//! use sm_profile::generate::{generate, PropertyDescriptor};
//!
//! let schema = generate("Turbine Meter", &[PropertyDescriptor::new("FlowRate").with_unit("M3-PER-HR")])?;
//! assert_eq!(schema.id, "sm:TurbineMeter");
//! # Ok::<(), sm_profile::GenerateError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod convert;
pub mod document;
pub mod generate;
pub mod live;
pub mod model;
pub mod namespaces;

pub use convert::ConvertError;
pub use document::DocumentError;
pub use generate::{GenerateError, PropertyDescriptor};
pub use model::{
    AccessMode, ConfigurationDocument, Context, DeviceInstance, ProfileInstance, ProfileSchema,
    PropertyDefinition, PropertyValue,
};
