//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including machine definitions, transitions, step outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::alphabet::Alphabet;
use crate::Rule;

/// The blank symbol used when a definition does not say otherwise.
pub const DEFAULT_BLANK_SYMBOL: char = '.';
/// The maximum allowed size for a machine definition in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB
/// The maximum number of tapes a machine may declare.
pub const MAX_TAPES: usize = 64;
/// The step budget used by callers that do not supply one.
pub const DEFAULT_MAX_STEPS: usize = 10000;

/// A complete, not yet validated description of a machine: M = (Q, Σ, Γ, s, b, F, δ).
///
/// This is what the definition parser produces. Turning it into a runnable machine with
/// [`crate::TuringMachine::new`] checks every structural invariant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    /// The set of states Q.
    pub states: BTreeSet<String>,
    /// The input alphabet Σ.
    pub input_alphabet: Alphabet,
    /// The tape alphabet Γ.
    pub tape_alphabet: Alphabet,
    /// The initial state s.
    pub initial_state: String,
    /// The blank symbol b.
    pub blank: char,
    /// The set of final (accepting) states F.
    pub final_states: BTreeSet<String>,
    /// Number of tapes the machine operates on.
    pub tapes: usize,
    /// The transition function δ, in definition order.
    pub transitions: Vec<Transition>,
}

impl Definition {
    /// Returns `true` if the definition describes a single-tape machine.
    pub fn is_single_tape(&self) -> bool {
        self.tapes == 1
    }
}

/// Represents the possible directions a Turing Machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl Direction {
    /// Returns the canonical single-character tag: `L`, `R` or `S`.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Stay => 'S',
        }
    }
}

/// Decodes a movement tag. Tags are case-insensitive.
impl TryFrom<char> for Direction {
    type Error = TuringMachineError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'L' | 'l' => Ok(Direction::Left),
            'R' | 'r' => Ok(Direction::Right),
            'S' | 's' => Ok(Direction::Stay),
            _ => Err(TuringMachineError::InvalidMovement(c)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Represents a single transition rule of a multi-tape Turing Machine:
/// δ(q, [s1, ..., sn]) = (q', [w1, ..., wn], [m1, ..., mn]).
///
/// The read, write and direction vectors always have the same non-zero length, which is
/// enforced by [`Transition::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    state: String,
    read: Vec<char>,
    next_state: String,
    write: Vec<char>,
    directions: Vec<Direction>,
}

impl Transition {
    /// Creates a new transition.
    ///
    /// # Returns
    ///
    /// * `Ok(Transition)` if all vectors have the same length of at least one.
    /// * `Err(TuringMachineError::InconsistentTransition)` if their lengths differ.
    /// * `Err(TuringMachineError::EmptyTransition)` if they are empty.
    pub fn new(
        state: impl Into<String>,
        read: Vec<char>,
        next_state: impl Into<String>,
        write: Vec<char>,
        directions: Vec<Direction>,
    ) -> Result<Self, TuringMachineError> {
        if read.len() != write.len() || read.len() != directions.len() {
            return Err(TuringMachineError::InconsistentTransition {
                read: read.len(),
                write: write.len(),
                directions: directions.len(),
            });
        }

        if read.is_empty() {
            return Err(TuringMachineError::EmptyTransition);
        }

        Ok(Self {
            state: state.into(),
            read,
            next_state: next_state.into(),
            write,
            directions,
        })
    }

    /// The state this transition applies in.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// The symbols that must be under each head, one per tape.
    pub fn read(&self) -> &[char] {
        &self.read
    }

    /// The state the machine moves to.
    pub fn next_state(&self) -> &str {
        &self.next_state
    }

    /// The symbols written to each tape.
    pub fn write(&self) -> &[char] {
        &self.write
    }

    /// The head movement for each tape, applied after the write.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Number of tapes this transition operates on.
    pub fn tapes(&self) -> usize {
        self.read.len()
    }

    /// Returns `true` if this transition applies in `state` when the heads read `symbols`.
    ///
    /// Matching is exact and per tape. A `symbols` slice of the wrong length never matches.
    pub fn matches(&self, state: &str, symbols: &[char]) -> bool {
        self.state == state && self.read == symbols
    }
}

/// Renders the transition as `q0 a b -> q1 x y R L`.
impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        for symbol in &self.read {
            write!(f, " {symbol}")?;
        }
        write!(f, " -> {}", self.next_state)?;
        for symbol in &self.write {
            write!(f, " {symbol}")?;
        }
        for direction in &self.directions {
            write!(f, " {direction}")?;
        }
        Ok(())
    }
}

/// Represents the outcome of a Turing Machine execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine applied a transition and may continue.
    Continue,
    /// No transition applies to the current configuration; the machine has halted.
    Halt,
}

/// Summary of a finished `run`, suitable for printing or serializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub input: String,
    /// `true` if the machine stopped because no transition applied,
    /// `false` if the step budget ran out first.
    pub halted: bool,
    pub accepted: bool,
    pub state: String,
    pub steps: usize,
    pub tapes: Vec<String>,
    pub result: String,
}

/// Represents various errors that can occur during Turing Machine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The definition has no states at all.
    #[error("The set of states must not be empty")]
    EmptyStates,
    /// The initial state is not one of the declared states.
    #[error("Initial state {0} is not a declared state")]
    InvalidInitialState(String),
    /// A final state is not one of the declared states.
    #[error("Final state {0} is not a declared state")]
    InvalidFinalState(String),
    /// The blank symbol is missing from the tape alphabet.
    #[error("Blank symbol '{0}' must belong to the tape alphabet")]
    BlankNotInTapeAlphabet(char),
    /// The blank symbol also appears in the input alphabet.
    #[error("Blank symbol '{0}' must not belong to the input alphabet")]
    BlankInInputAlphabet(char),
    /// The machine was declared with zero tapes.
    #[error("A machine needs at least one tape")]
    NoTapes,
    /// The machine was declared with more than `MAX_TAPES` tapes.
    #[error("A machine supports at most {max} tapes, found {found}")]
    TooManyTapes { max: usize, found: usize },
    /// A transition refers to a state that is not declared.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// A transition reads or writes a symbol outside the tape alphabet.
    #[error("Symbol '{0}' does not belong to the tape alphabet")]
    InvalidTapeSymbol(char),
    /// A transition was built for a different number of tapes than the machine has.
    #[error("Transition operates on {found} tapes but the machine has {expected}")]
    TapeCountMismatch { expected: usize, found: usize },
    /// The read, write and direction vectors of a transition differ in length.
    #[error("Inconsistent transition: read={read}, write={write}, directions={directions}")]
    InconsistentTransition {
        read: usize,
        write: usize,
        directions: usize,
    },
    /// A transition has no tapes.
    #[error("A transition must operate on at least one tape")]
    EmptyTransition,
    /// A movement tag other than L, R or S.
    #[error("Invalid movement: {0}")]
    InvalidMovement(char),
    /// An input string contains a symbol outside the input alphabet.
    #[error("Input symbol '{0}' does not belong to the input alphabet")]
    InvalidInput(char),
    /// Indicates an error during the parsing of a machine definition.
    #[error("Definition parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an error found while analyzing a definition.
    #[error("Definition validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}
