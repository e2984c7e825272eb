//! Skeleton profile schema generation.
//!
//! A schema is built from an equipment type name and an ordered list of
//! property descriptors. The equipment name becomes the schema identifier
//! with its spaces removed; nothing else is normalized, so existing profiles
//! named with plain words keep their identifiers.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use crate::model::{AccessMode, Context, ProfileSchema, PropertyDefinition};
use crate::namespaces::{self, datatypes, types, SCHEMA_NAMESPACES};

/// Version stamped on freshly generated profiles.
pub const SKELETON_VERSION: &str = "0.1.0";

/// Directory generated profiles are written to, relative to the working directory.
pub const DEFAULT_PROFILE_DIR: &str = "../profiles";

/// File extension of generated profiles.
pub const PROFILE_EXTENSION: &str = "jsonld";

/// Characters that would split or terminate an IRI path segment.
const RESERVED_IDENTIFIER_CHARS: &[char] = &['/', ':', '#', '?'];

/// Reasons a schema cannot be generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The equipment type name is empty or whitespace.
    #[error("equipment name required")]
    EmptyEquipmentName,
    /// The equipment name does not yield a usable identifier.
    #[error("equipment name {name:?} yields invalid identifier {identifier:?}")]
    InvalidIdentifier {
        /// Name as given.
        name: String,
        /// Identifier after removing spaces.
        identifier: String,
    },
    /// No property descriptors were supplied.
    #[error("at least one property required")]
    NoProperties,
    /// A descriptor has an empty name.
    #[error("property {index} has an empty name")]
    EmptyPropertyName {
        /// Position of the descriptor.
        index: usize,
    },
}

/// A property to include in a generated schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name; also its label.
    pub name: String,
    /// Local `xsd:` datatype name; `float` when `None`.
    pub data_type: Option<String>,
    /// Local QUDT unit code (e.g., `KiloPA`), without the `unit:` prefix.
    pub unit: Option<String>,
}

impl PropertyDescriptor {
    /// Creates a descriptor with the default datatype and no unit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            unit: None,
        }
    }

    /// Sets the datatype local name.
    #[must_use]
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Sets the unit code.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    fn data_type_or_default(&self) -> &str {
        self.data_type
            .as_deref()
            .unwrap_or(datatypes::DEFAULT_LOCAL_NAME)
    }
}

/// A descriptor string that is not `NAME[:TYPE[:UNIT]]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid property descriptor {0:?}: expected NAME[:TYPE[:UNIT]]")]
pub struct ParseDescriptorError(String);

impl FromStr for PropertyDescriptor {
    type Err = ParseDescriptorError;

    /// Parses `NAME[:TYPE[:UNIT]]`. Empty `TYPE` or `UNIT` segments mean "not given".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':').map(str::trim);
        let name = match parts.next() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ParseDescriptorError(s.to_owned())),
        };
        let non_empty = |part: Option<&str>| part.filter(|p| !p.is_empty()).map(str::to_owned);
        Ok(Self {
            name: name.to_owned(),
            data_type: non_empty(parts.next()),
            unit: non_empty(parts.next()),
        })
    }
}

/// Derives the schema identifier segment: the equipment name with all spaces removed.
///
/// # Errors
///
/// Returns [`GenerateError::EmptyEquipmentName`] for a blank name and
/// [`GenerateError::InvalidIdentifier`] if the result contains `/`, `:`, `#`
/// or `?`.
pub fn identifier(equipment_name: &str) -> Result<String, GenerateError> {
    if equipment_name.trim().is_empty() {
        return Err(GenerateError::EmptyEquipmentName);
    }
    let identifier = equipment_name.replace(' ', "");
    if identifier.contains(RESERVED_IDENTIFIER_CHARS) {
        return Err(GenerateError::InvalidIdentifier {
            name: equipment_name.to_owned(),
            identifier,
        });
    }
    Ok(identifier)
}

/// Builds a skeleton `sm:EquipmentType` schema.
///
/// Every property is read-only; its datatype defaults to `xsd:float` and its
/// unit is emitted only when given.
///
/// # Errors
///
/// Returns [`GenerateError`] if the name is blank or yields an invalid
/// identifier, if `properties` is empty, or if a descriptor has an empty name.
pub fn generate(
    equipment_name: &str,
    properties: &[PropertyDescriptor],
) -> Result<ProfileSchema, GenerateError> {
    let id_name = identifier(equipment_name)?;
    if properties.is_empty() {
        return Err(GenerateError::NoProperties);
    }
    if let Some(index) = properties.iter().position(|p| p.name.trim().is_empty()) {
        return Err(GenerateError::EmptyPropertyName { index });
    }

    info!("Generating profile for: {equipment_name}");

    let schema_id = namespaces::compact(&namespaces::SM, &id_name);
    let definitions = properties
        .iter()
        .map(|prop| PropertyDefinition {
            id: format!("{schema_id}/{}", prop.name),
            type_: types::PROPERTY.to_owned(),
            label: prop.name.clone(),
            comment: format!("{} measurement", prop.name),
            data_type: namespaces::compact(&namespaces::XSD, prop.data_type_or_default()),
            access_mode: AccessMode::Read,
            unit: prop
                .unit
                .as_deref()
                .map(|unit| namespaces::compact(&namespaces::UNIT, unit)),
        })
        .collect();

    Ok(ProfileSchema {
        context: Context::from_namespaces(SCHEMA_NAMESPACES),
        id: schema_id,
        type_: types::EQUIPMENT_TYPE.to_owned(),
        label: equipment_name.to_owned(),
        comment: format!("SM Profile for {equipment_name}"),
        version: SKELETON_VERSION.to_owned(),
        properties: definitions,
    })
}

/// Returns where the profile for `equipment_name` is written under `dir`:
/// the lowercased name with spaces replaced by underscores.
#[must_use]
pub fn output_path(dir: &Path, equipment_name: &str) -> PathBuf {
    let stem = equipment_name.to_lowercase().replace(' ', "_");
    dir.join(format!("{stem}.{PROFILE_EXTENSION}"))
}
