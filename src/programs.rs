//! A registry of machine definitions embedded in the binary, so they can be run without any
//! definition file on disk.

use crate::machine::TuringMachine;
use crate::types::{Definition, TuringMachineError};
use serde::Serialize;

// Default embedded programs
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    (
        "binary-increment",
        include_str!("../programs/binary-increment.tm"),
    ),
    ("unary-copy", include_str!("../programs/unary-copy.tm")),
    ("even-ones", include_str!("../programs/even-ones.tm")),
];

/// A parsed embedded program.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: &'static str,
    pub text: &'static str,
    pub definition: Definition,
}

lazy_static::lazy_static! {
    /// Every embedded program that parsed successfully, in registration order.
    pub static ref PROGRAMS: Vec<Program> = PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, text)| match crate::parser::parse(text) {
            Ok(definition) => Some(Program { name, text, definition }),
            Err(e) => {
                tracing::warn!(program = name, "failed to parse embedded program: {e}");
                None
            }
        })
        .collect();
}

/// Summary information about an embedded program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub tapes: usize,
    pub state_count: usize,
    pub transition_count: usize,
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program's definition by its index
    pub fn get_program_by_index(index: usize) -> Result<Definition, TuringMachineError> {
        PROGRAMS
            .get(index)
            .map(|program| program.definition.clone())
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program's definition by its name
    pub fn get_program_by_name(name: &str) -> Result<Definition, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .map(|program| program.definition.clone())
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// Builds a ready-to-run machine from the program with the given name.
    pub fn machine(name: &str) -> Result<TuringMachine, TuringMachineError> {
        TuringMachine::new(Self::get_program_by_name(name)?)
    }

    /// List all program names
    pub fn list_program_names() -> Vec<String> {
        PROGRAMS
            .iter()
            .map(|program| program.name.to_string())
            .collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let program = PROGRAMS.get(index).ok_or_else(|| {
            TuringMachineError::ValidationError(format!("Program index {} out of range", index))
        })?;

        Ok(ProgramInfo {
            index,
            name: program.name.to_string(),
            initial_state: program.definition.initial_state.clone(),
            tapes: program.definition.tapes,
            state_count: program.definition.states.len(),
            transition_count: program.definition.transitions.len(),
        })
    }

    /// Search for programs by name
    pub fn search_programs(query: &str) -> Vec<usize> {
        let query = query.to_lowercase();

        PROGRAMS
            .iter()
            .enumerate()
            .filter(|(_, program)| program.name.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect()
    }

    /// Get the original text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        PROGRAMS
            .get(index)
            .map(|program| program.text)
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!(
                    "Program text index {} out of range",
                    index
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_MAX_STEPS;

    #[test]
    fn test_all_embedded_programs_parse() {
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
        assert_eq!(
            ProgramManager::list_program_names(),
            vec!["binary-increment", "unary-copy", "even-ones"]
        );
    }

    #[test]
    fn test_all_embedded_programs_build_machines() {
        for name in ProgramManager::list_program_names() {
            assert!(ProgramManager::machine(&name).is_ok(), "{name} failed to build");
        }
    }

    #[test]
    fn test_get_program_by_name() {
        let definition = ProgramManager::get_program_by_name("unary-copy").unwrap();
        assert_eq!(definition.tapes, 2);

        assert!(ProgramManager::get_program_by_name("missing").is_err());
    }

    #[test]
    fn test_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(99).is_err());
    }

    #[test]
    fn test_get_program_info() {
        let info = ProgramManager::get_program_info(0).unwrap();

        assert_eq!(info.name, "binary-increment");
        assert_eq!(info.initial_state, "scan");
        assert_eq!(info.tapes, 1);
        assert_eq!(info.state_count, 3);
        assert_eq!(info.transition_count, 6);
    }

    #[test]
    fn test_search_programs() {
        assert_eq!(ProgramManager::search_programs("COPY"), vec![1]);
        assert!(ProgramManager::search_programs("nothing").is_empty());
    }

    #[test]
    fn test_get_program_text() {
        let text = ProgramManager::get_program_text_by_index(2).unwrap();
        assert!(text.contains("Even ones"));
    }

    #[test]
    fn test_binary_increment() {
        let mut machine = ProgramManager::machine("binary-increment").unwrap();

        assert_eq!(machine.run("1011", DEFAULT_MAX_STEPS), Ok(true));
        assert!(machine.is_accepted());
        assert_eq!(machine.step_count(), 8);
        assert_eq!(machine.tapes_content(), vec!["1100."]);
        assert_eq!(machine.result_from_first_tape(), "1100");

        assert_eq!(machine.run("11", DEFAULT_MAX_STEPS), Ok(true));
        assert_eq!(machine.step_count(), 6);
        assert_eq!(machine.tapes_content(), vec!["100."]);
        assert_eq!(machine.result_from_first_tape(), "100");

        assert_eq!(machine.run("", DEFAULT_MAX_STEPS), Ok(true));
        assert_eq!(machine.step_count(), 2);
        assert_eq!(machine.tapes_content(), vec!["1."]);
        assert_eq!(machine.result_from_first_tape(), "1");
    }
}
