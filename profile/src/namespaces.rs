//! Namespace prefixes and the shared vocabulary of SM Profile documents.
//!
//! Every document declares its prefixes in `@context` and then uses compact
//! `prefix:term` names for keys and values. The constants here are the only
//! place those prefixes, type tags, datatypes, and unit codes are spelled out.

/// A namespace declaration: the compact prefix and the IRI it expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    /// The prefix used in `@context` (e.g., `"sm"`).
    pub prefix: &'static str,
    /// The full IRI of the namespace.
    pub iri: &'static str,
}

/// CESMII Smart Manufacturing vocabulary.
pub const SM: Namespace = Namespace {
    prefix: "sm",
    iri: "http://cesmii.org/sm/",
};

/// RDF Schema.
pub const RDFS: Namespace = Namespace {
    prefix: "rdfs",
    iri: "http://www.w3.org/2000/01/rdf-schema#",
};

/// XML Schema datatypes.
pub const XSD: Namespace = Namespace {
    prefix: "xsd",
    iri: "http://www.w3.org/2001/XMLSchema#",
};

/// QUDT unit vocabulary.
pub const UNIT: Namespace = Namespace {
    prefix: "unit",
    iri: "http://qudt.org/vocab/unit/",
};

/// QUDT schema.
pub const QUDT: Namespace = Namespace {
    prefix: "qudt",
    iri: "http://qudt.org/schema/qudt/",
};

/// Published SM Profile definitions for flow computers, meter runs, and meters.
pub const JPI: Namespace = Namespace {
    prefix: "jpi",
    iri: "https://github.com/JPISolutions/SMProfiles/profiles/v1#",
};

/// Namespaces declared by converted profile instances.
pub const INSTANCE_NAMESPACES: &[Namespace] = &[SM, RDFS, XSD, UNIT];

/// Namespaces declared by generated profile schemas.
pub const SCHEMA_NAMESPACES: &[Namespace] = &[SM, RDFS, XSD, UNIT, QUDT];

/// Namespaces declared by live device documents.
pub const DEVICE_NAMESPACES: &[Namespace] = &[JPI, SM, RDFS, XSD, UNIT];

/// Type tags used in `@type`.
pub mod types {
    /// Tag of a profile schema document.
    pub const EQUIPMENT_TYPE: &str = "sm:EquipmentType";
    /// Tag of a property definition inside a schema.
    pub const PROPERTY: &str = "sm:Property";
    /// Tag of a converted orifice gas meter instance.
    pub const ORIFICE_GAS_METER: &str = "sm:OrificeGasMeter";

    /// Tag of a live flow computer document.
    pub const FLOW_COMPUTER: &str = "jpi:FlowComputer";
    /// Tag of a meter run nested in a flow computer.
    pub const METER_RUN: &str = "jpi:MeterRun";
    /// Tag of a live orifice gas meter nested in a meter run.
    pub const LIVE_ORIFICE_GAS_METER: &str = "jpi:OrificeGasMeter";
}

/// Compact `xsd:` datatype names.
pub mod datatypes {
    /// `xsd:string`.
    pub const STRING: &str = "xsd:string";
    /// `xsd:boolean`.
    pub const BOOLEAN: &str = "xsd:boolean";
    /// `xsd:integer`.
    pub const INTEGER: &str = "xsd:integer";
    /// `xsd:dateTime`.
    pub const DATE_TIME: &str = "xsd:dateTime";

    /// Datatype local name used when a property descriptor names none.
    pub const DEFAULT_LOCAL_NAME: &str = "float";

    /// Datatypes whose values carry no physical dimension.
    pub const UNITLESS: &[&str] = &[STRING, BOOLEAN, INTEGER, DATE_TIME];
}

/// QUDT unit codes attached to dimensioned property values.
pub mod units {
    /// Angle in degrees.
    pub const DEGREE: &str = "unit:DEG";
    /// Length in metres.
    pub const METRE: &str = "unit:M";
    /// Length in millimetres.
    pub const MILLIMETRE: &str = "unit:MilliM";
    /// Temperature in degrees Celsius.
    pub const DEGREE_CELSIUS: &str = "unit:DEG_C";
    /// Pressure in kilopascals.
    pub const KILOPASCAL: &str = "unit:KiloPA";
    /// Dynamic viscosity in centipoise.
    pub const CENTIPOISE: &str = "unit:CentiPOISE";
    /// Density in kilograms per cubic metre.
    pub const KILOGRAM_PER_CUBIC_METRE: &str = "unit:KiloGM-PER-M3";
    /// Dimensionless ratio.
    pub const UNITLESS: &str = "unit:UNITLESS";
    /// Volume in cubic metres.
    pub const CUBIC_METRE: &str = "unit:M3";
    /// Volumetric flow in cubic metres per hour.
    pub const CUBIC_METRE_PER_HOUR: &str = "unit:M3-PER-HR";
    /// Energy flow in gigajoules per hour.
    pub const GIGAJOULE_PER_HOUR: &str = "unit:GJ-PER-HR";
    /// Energy in gigajoules.
    pub const GIGAJOULE: &str = "unit:GigaJ";
    /// Heating value in megajoules per cubic metre.
    pub const MEGAJOULE_PER_CUBIC_METRE: &str = "unit:MegaJ-PER-M3";
    /// Time in seconds.
    pub const SECOND: &str = "unit:SEC";
    /// Percentage.
    pub const PERCENT: &str = "unit:PERCENT";
    /// Electric potential in volts.
    pub const VOLT: &str = "unit:V";
}

/// Prefixes a unit reference must start with to resolve against a unit vocabulary.
pub const UNIT_PREFIXES: &[&str] = &["unit:", "qudt:"];

/// Compacts `local` under `namespace` (e.g., `compact(&SM, "Pump")` is `"sm:Pump"`).
#[must_use]
pub fn compact(namespace: &Namespace, local: &str) -> String {
    format!("{}:{}", namespace.prefix, local)
}
