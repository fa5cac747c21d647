//! This module provides functions for analyzing machine definitions before execution.
//! `analyze` rejects definitions that cannot be run deterministically; `lint` reports
//! suspicious but legal constructs such as unreachable states.

use crate::types::{Definition, Transition, TuringMachineError};
use std::collections::{HashMap, HashSet};

/// Represents the findings of a definition analysis.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Two or more transitions share a state and read tuple but disagree on the outcome.
    /// Each entry is rendered as `state [symbols]`.
    ConflictingTransitions(Vec<String>),
    /// States that cannot be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// Indicates structural problems with the definition (tape count mismatches, etc.).
    StructuralError(String),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into a `TuringMachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::ConflictingTransitions(keys) => TuringMachineError::ValidationError(
                format!("Conflicting transitions for: {}", keys.join(", ")),
            ),
            AnalysisError::UnreachableStates(states) => TuringMachineError::ValidationError(
                format!("Unreachable states detected: {:?}", states),
            ),
            AnalysisError::StructuralError(msg) => TuringMachineError::ValidationError(msg),
        }
    }
}

/// Analyzes a `Definition` for errors that make it unfit to run.
///
/// The machine itself resolves lookups by first match, so a table with conflicting rules
/// would still run. Such a table is not deterministic, though, and is rejected here.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError::ValidationError)` for the first failed check.
pub fn analyze(definition: &Definition) -> Result<(), TuringMachineError> {
    [check_structure, check_deterministic]
        .iter()
        .try_for_each(|check| check(definition))
        .map_err(Into::into)
}

/// Reports legal but suspicious constructs. An empty result means nothing was found.
pub fn lint(definition: &Definition) -> Vec<AnalysisError> {
    [check_unreachable_states]
        .iter()
        .filter_map(|check| check(definition).err())
        .collect()
}

/// Checks that every transition operates on the declared number of tapes.
fn check_structure(definition: &Definition) -> Result<(), AnalysisError> {
    if definition.tapes == 0 {
        return Err(AnalysisError::StructuralError(
            "No tapes defined".to_string(),
        ));
    }

    match definition
        .transitions
        .iter()
        .find(|t| t.tapes() != definition.tapes)
    {
        Some(t) => Err(AnalysisError::StructuralError(format!(
            "Transition '{}' operates on {} tapes but the definition declares {}",
            t,
            t.tapes(),
            definition.tapes
        ))),
        None => Ok(()),
    }
}

/// Checks that no two transitions with the same state and read tuple lead to different
/// outcomes. Exact duplicates are tolerated.
fn check_deterministic(definition: &Definition) -> Result<(), AnalysisError> {
    let mut seen: HashMap<(&str, &[char]), &Transition> = HashMap::new();
    let mut conflicts = Vec::new();

    for transition in &definition.transitions {
        let key = (transition.state(), transition.read());
        match seen.get(&key) {
            Some(&first) if first != transition => {
                let rendered = format!("{} {:?}", key.0, key.1);
                if !conflicts.contains(&rendered) {
                    conflicts.push(rendered);
                }
            }
            Some(_) => {}
            None => {
                seen.insert(key, transition);
            }
        }
    }

    if !conflicts.is_empty() {
        conflicts.sort(); // Sort for deterministic output
        return Err(AnalysisError::ConflictingTransitions(conflicts));
    }

    Ok(())
}

/// Checks for unreachable states by traversing the transition graph from the initial state.
fn check_unreachable_states(definition: &Definition) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![definition.initial_state.as_str()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for transition in definition
            .transitions
            .iter()
            .filter(|t| t.state() == state)
        {
            if !visited.contains(transition.next_state()) {
                queue.push(transition.next_state());
            }
        }
    }

    // `states` is ordered, so the result is already sorted.
    let unreachable: Vec<String> = definition
        .states
        .iter()
        .filter(|state| !visited.contains(state.as_str()))
        .cloned()
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}
