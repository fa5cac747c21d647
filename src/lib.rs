//! This crate provides the core logic for a deterministic multi-tape Turing Machine simulator.
//! It includes modules for parsing machine definitions, analyzing them, simulating their
//! execution on unbounded tapes, and managing a collection of embedded programs.

pub mod alphabet;
pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Alphabet` type used for input and tape alphabets.
pub use alphabet::Alphabet;
/// Re-exports the `analyze` and `lint` functions and the `AnalysisError` enum.
pub use analyzer::{analyze, lint, AnalysisError};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use parser::{parse, Rule};
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Definition, Direction, RunReport, Step, Transition, TuringMachineError, DEFAULT_BLANK_SYMBOL,
    DEFAULT_MAX_STEPS, MAX_PROGRAM_SIZE, MAX_TAPES,
};
