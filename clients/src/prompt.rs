//! Interactive question sequence for the profile generator.
//!
//! Reads answers line by line. End of input behaves like a blank answer, so
//! piping a prepared answer file works the same as typing.

use std::io::{self, BufRead, Write};

use sm_profile::generate::PropertyDescriptor;

/// What the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileRequest {
    /// Equipment type name, trimmed; empty if none was given.
    pub equipment_name: String,
    /// Properties in the order they were entered.
    pub properties: Vec<PropertyDescriptor>,
}

impl ProfileRequest {
    /// Builds a request from command-line values, trimming the name the same
    /// way the prompt trims answers.
    #[must_use]
    pub fn new(equipment_name: &str, properties: Vec<PropertyDescriptor>) -> Self {
        Self {
            equipment_name: equipment_name.trim().to_owned(),
            properties,
        }
    }
}

/// Asks for the equipment name and then for properties until a blank name.
///
/// The property loop is skipped when the equipment name is blank.
///
/// # Errors
///
/// Returns an error if reading `input` or writing `output` fails.
pub fn ask_profile<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<ProfileRequest> {
    let equipment_name = ask(
        &mut input,
        &mut output,
        "\nEquipment Type Name (e.g., 'Turbine Meter'): ",
    )?;
    if equipment_name.is_empty() {
        return Ok(ProfileRequest::default());
    }

    let mut properties = Vec::new();
    writeln!(output, "\nEnter properties (blank name to finish):")?;
    loop {
        writeln!(output, "\nProperty #{}", properties.len() + 1)?;
        let name = ask(&mut input, &mut output, "  Name: ")?;
        if name.is_empty() {
            break;
        }
        let data_type = ask(
            &mut input,
            &mut output,
            "  Data Type [float/string/boolean] (default: float): ",
        )?;
        let unit = ask(
            &mut input,
            &mut output,
            "  Unit (e.g., M3-PER-HR, KiloPA) [optional]: ",
        )?;

        let mut descriptor = PropertyDescriptor::new(name);
        if !data_type.is_empty() {
            descriptor = descriptor.with_data_type(data_type);
        }
        if !unit.is_empty() {
            descriptor = descriptor.with_unit(unit);
        }
        properties.push(descriptor);
    }

    Ok(ProfileRequest {
        equipment_name,
        properties,
    })
}

/// Prints `question`, reads one line, and returns it trimmed.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run(answers: &str) -> (ProfileRequest, String) {
        let mut output = Vec::new();
        let request = ask_profile(Cursor::new(answers), &mut output).unwrap();
        (request, String::from_utf8(output).unwrap())
    }

    #[test]
    fn collects_properties_until_blank_name() {
        let (request, transcript) = run("Turbine Meter\nFlowRate\n\nM3-PER-HR\nTag\nstring\n\n\n");
        assert_eq!(request.equipment_name, "Turbine Meter");
        assert_eq!(
            request.properties,
            [
                PropertyDescriptor::new("FlowRate").with_unit("M3-PER-HR"),
                PropertyDescriptor::new("Tag").with_data_type("string"),
            ]
        );
        assert!(transcript.contains("Property #3"));
    }

    #[test]
    fn flag_name_is_trimmed_like_an_answer() {
        let request = ProfileRequest::new("  Pump ", vec![PropertyDescriptor::new("Speed")]);
        let (answered, _) = run(" Pump \nSpeed\n\n\n\n");
        assert_eq!(request, answered);
        assert_eq!(request.equipment_name, "Pump");
    }

    #[test]
    fn blank_equipment_name_asks_nothing_else() {
        let (request, transcript) = run("   \n");
        assert_eq!(request, ProfileRequest::default());
        assert!(!transcript.contains("Enter properties"));
    }

    #[test]
    fn end_of_input_finishes_the_loop() {
        let (request, _) = run("Pump\nSpeed\nfloat\nREV-PER-MIN");
        assert_eq!(
            request.properties,
            [PropertyDescriptor::new("Speed").with_data_type("float").with_unit("REV-PER-MIN")]
        );
    }
}
