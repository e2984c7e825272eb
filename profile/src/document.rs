//! Reading and writing documents on disk.
//!
//! Documents are UTF-8 JSON written with 2-space indentation and a trailing
//! newline. Reads and writes are whole-file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// A document could not be read, parsed, or written.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid JSON, or not the expected shape.
    #[error("{}: {source}", path.display())]
    Json {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Serializes a document as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if `document` cannot be represented as JSON.
pub fn to_pretty_json<T: Serialize>(document: &T) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');
    Ok(text)
}

/// Reads a whole file as text.
///
/// # Errors
///
/// Returns [`DocumentError::Io`] if the file cannot be read.
pub fn read_text(path: &Path) -> Result<String, DocumentError> {
    fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses a JSON document.
///
/// # Errors
///
/// Returns [`DocumentError`] if the file cannot be read or parsed as `T`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| DocumentError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a document, creating missing parent directories.
///
/// Nothing is written if serialization fails.
///
/// # Errors
///
/// Returns [`DocumentError`] if serialization fails or the file cannot be written.
pub fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), DocumentError> {
    let text = to_pretty_json(document).map_err(|source| DocumentError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let io_err = |source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, text).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{generate, PropertyDescriptor};
    use crate::model::{AccessMode, ProfileSchema};

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let text = to_pretty_json(&serde_json::json!({"a": {"b": 1}})).unwrap();
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": 1\n  }\n}\n");
    }

    #[test]
    fn written_schema_reads_back_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/profiles/pump.jsonld");
        let schema = generate("Pump", &[PropertyDescriptor::new("Speed").with_unit("REV-PER-MIN")]).unwrap();

        write_document(&path, &schema).unwrap();
        let back: ProfileSchema = read_document(&path).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn hand_edited_readwrite_property_survives() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valve.jsonld");
        let mut schema = generate("Valve", &[PropertyDescriptor::new("Setpoint").with_unit("PERCENT")]).unwrap();
        let text = to_pretty_json(&schema)
            .unwrap()
            .replace("\"sm:accessMode\": \"read\"", "\"sm:accessMode\": \"readwrite\"");
        std::fs::write(&path, text).unwrap();

        let back: ProfileSchema = read_document(&path).unwrap();
        assert_eq!(back.properties[0].access_mode, AccessMode::ReadWrite);

        schema.properties[0].access_mode = AccessMode::ReadWrite;
        assert_eq!(back, schema);
        write_document(&path, &back).unwrap();
        assert!(read_text(&path).unwrap().contains("\"readwrite\""));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jsonld");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_document::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Json { .. }));
    }
}
