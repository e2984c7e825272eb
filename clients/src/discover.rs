//! Expands validator arguments into the list of profiles to check.

use std::path::{Path, PathBuf};

use sm_profile::generate::PROFILE_EXTENSION;
use walkdir::WalkDir;

/// Files to validate, and arguments that do not exist.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Targets {
    /// Profile files in argument order; directory contents sorted by path.
    pub files: Vec<PathBuf>,
    /// Arguments that name nothing on disk.
    pub missing: Vec<PathBuf>,
}

/// Resolves each argument: files are taken as given, directories contribute
/// every `*.jsonld` file beneath them.
#[must_use]
pub fn targets(paths: &[PathBuf]) -> Targets {
    let mut targets = Targets::default();
    for path in paths {
        if path.is_dir() {
            targets.files.extend(profiles_under(path));
        } else if path.exists() {
            targets.files.push(path.clone());
        } else {
            targets.missing.push(path.clone());
        }
    }
    targets
}

fn profiles_under(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .map(|x| x == PROFILE_EXTENSION)
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn expands_directories_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("profiles/meters")).unwrap();
        fs::write(root.join("profiles/pump.jsonld"), "{}").unwrap();
        fs::write(root.join("profiles/meters/turbine.jsonld"), "{}").unwrap();
        fs::write(root.join("profiles/notes.md"), "").unwrap();
        fs::write(root.join("single.json"), "{}").unwrap();

        let found = targets(&[
            root.join("single.json"),
            root.join("profiles"),
            root.join("absent.jsonld"),
        ]);

        assert_eq!(
            found.files,
            [
                root.join("single.json"),
                root.join("profiles/meters/turbine.jsonld"),
                root.join("profiles/pump.jsonld"),
            ]
        );
        assert_eq!(found.missing, [root.join("absent.jsonld")]);
    }
}
