//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! definitions and input strings from files and strings.

use crate::machine::TuringMachine;
use crate::parser::parse;
use crate::types::{Definition, TuringMachineError, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of machine definition files.
pub const DEFINITION_EXTENSION: &str = "tm";

/// `ProgramLoader` is a utility struct for loading machine definitions and inputs.
/// It provides methods to load definitions from individual files, from string content,
/// to discover and load all `.tm` files within a directory, and to read input files.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Definition)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read or is too large.
    /// * `Err(TuringMachineError::ParseError)` if the file content is not a valid definition.
    pub fn load_definition(path: &Path) -> Result<Definition, TuringMachineError> {
        let content = read_file(path)?;

        if content.len() > MAX_PROGRAM_SIZE {
            return Err(TuringMachineError::FileError(format!(
                "File {} exceeds the maximum definition size of {} bytes",
                path.display(),
                MAX_PROGRAM_SIZE
            )));
        }

        parse(&content)
    }

    /// Loads a definition from a file and builds a ready-to-run machine from it.
    pub fn load_machine(path: &Path) -> Result<TuringMachine, TuringMachineError> {
        TuringMachine::new(Self::load_definition(path)?)
    }

    /// Loads a single definition from the provided string content.
    pub fn load_definition_from_string(content: &str) -> Result<Definition, TuringMachineError> {
        parse(content)
    }

    /// Reads input strings from a file, one per line.
    ///
    /// Every line is an input, including empty lines (the empty input). A trailing `\r` is
    /// stripped so files with Windows line endings behave the same.
    pub fn load_inputs(path: &Path) -> Result<Vec<String>, TuringMachineError> {
        let content = read_file(path)?;

        Ok(Self::inputs_from_string(&content))
    }

    /// Splits text into input strings, one per line.
    pub fn inputs_from_string(content: &str) -> Vec<String> {
        content
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    }

    /// Loads all definition files (`.tm` extension) from a given directory.
    ///
    /// Directories and files with other extensions are skipped.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Definition), TuringMachineError>>` - one entry per `.tm` file,
    ///   either the loaded definition with its path or the error that prevented loading it.
    pub fn load_definitions(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, Definition), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.tm files
                if path.is_dir()
                    || path
                        .extension()
                        .is_none_or(|ext| ext != DEFINITION_EXTENSION)
                {
                    return None;
                }

                match Self::load_definition(&path) {
                    Ok(definition) => Some(Ok((path, definition))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load definition from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // read_dir order is platform dependent
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

fn read_file(path: &Path) -> Result<String, TuringMachineError> {
    fs::read_to_string(path).map_err(|e| {
        TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID_DEFINITION: &str = "q0 q1\n1\n1 .\nq0\n.\nq1\nq0 1 q1 1 S\n";

    fn write_file(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_definition() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");
        write_file(&file_path, VALID_DEFINITION);

        let definition = ProgramLoader::load_definition(&file_path).unwrap();
        assert_eq!(definition.initial_state, "q0");
        assert_eq!(definition.transitions.len(), 1);
    }

    #[test]
    fn test_load_machine() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.tm");
        write_file(&file_path, VALID_DEFINITION);

        let mut machine = ProgramLoader::load_machine(&file_path).unwrap();
        assert_eq!(machine.run("1", 10), Ok(true));
        assert!(machine.is_accepted());
    }

    #[test]
    fn test_load_machine_with_undeclared_initial_state() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("bad.tm");
        write_file(&file_path, "q0 q1\n1\n1 .\nq7\n.\nq1\n");

        assert_eq!(
            ProgramLoader::load_machine(&file_path).unwrap_err(),
            TuringMachineError::InvalidInitialState("q7".to_string())
        );
    }

    #[test]
    fn test_load_invalid_definition() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.tm");
        write_file(&file_path, "This is not a valid definition");

        assert!(ProgramLoader::load_definition(&file_path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_definition(&dir.path().join("missing.tm"));

        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_load_oversized_definition() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("big.tm");
        let mut content = String::from(VALID_DEFINITION);
        while content.len() <= MAX_PROGRAM_SIZE {
            content.push_str("# padding padding padding padding padding padding\n");
        }
        write_file(&file_path, &content);

        let error = ProgramLoader::load_definition(&file_path).unwrap_err();
        assert!(error.to_string().contains("exceeds the maximum definition size"));
    }

    #[test]
    fn test_load_inputs() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("inputs.txt");
        write_file(&file_path, "101\r\n\n11\n");

        let inputs = ProgramLoader::load_inputs(&file_path).unwrap();
        assert_eq!(inputs, vec!["101", "", "11"]);
    }

    #[test]
    fn test_load_definitions_from_directory() {
        let dir = tempdir().unwrap();

        write_file(&dir.path().join("valid.tm"), VALID_DEFINITION);
        write_file(&dir.path().join("invalid.tm"), "not a definition");
        write_file(&dir.path().join("ignored.txt"), "ignored");

        let results = ProgramLoader::load_definitions(dir.path());

        assert_eq!(results.len(), 2);
        assert!(matches!(&results[0], Ok((path, _)) if path.ends_with("valid.tm")));
        assert!(results[1].is_err());
    }

    #[test]
    fn test_load_definitions_from_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ProgramLoader::load_definitions(&dir.path().join("nope"));

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
