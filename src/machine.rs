//! This module defines the `TuringMachine` struct, which simulates a deterministic multi-tape
//! Turing Machine. It validates the machine definition, owns one `Tape` per track, and drives
//! the step/run loop that applies transitions to all tapes in lockstep.

use std::collections::BTreeSet;
use std::fmt;

use crate::alphabet::Alphabet;
use crate::tape::Tape;
use crate::types::{Definition, RunReport, Step, Transition, TuringMachineError, MAX_TAPES};

/// Represents a deterministic multi-tape Turing Machine.
///
/// The static part (states, alphabets, blank, final states, transitions) is checked when
/// the machine is built and when transitions are added. The run-time part (current state,
/// tapes, step counter, halted flag) is reinitialized by [`TuringMachine::reset`],
/// [`TuringMachine::load`] and [`TuringMachine::run`].
#[derive(Debug, Clone)]
pub struct TuringMachine {
    states: BTreeSet<String>,
    input_alphabet: Alphabet,
    tape_alphabet: Alphabet,
    initial_state: String,
    blank: char,
    final_states: BTreeSet<String>,
    transitions: Vec<Transition>,

    state: String,
    tapes: Vec<Tape>,
    step_count: usize,
    halted: bool,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` from a `Definition`.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` in its initial configuration, with blank tapes.
    /// * `Err(TuringMachineError)` describing the first violated invariant: an empty state
    ///   set, an undeclared initial or final state, a blank symbol outside the tape alphabet,
    ///   zero or more than [`MAX_TAPES`] tapes, or any transition rejected by
    ///   [`TuringMachine::add_transition`].
    pub fn new(definition: Definition) -> Result<Self, TuringMachineError> {
        let Definition {
            states,
            input_alphabet,
            tape_alphabet,
            initial_state,
            blank,
            final_states,
            tapes,
            transitions,
        } = definition;

        if states.is_empty() {
            return Err(TuringMachineError::EmptyStates);
        }

        if !states.contains(&initial_state) {
            return Err(TuringMachineError::InvalidInitialState(initial_state));
        }

        if let Some(state) = final_states.iter().find(|s| !states.contains(*s)) {
            return Err(TuringMachineError::InvalidFinalState(state.clone()));
        }

        if !tape_alphabet.contains(blank) {
            return Err(TuringMachineError::BlankNotInTapeAlphabet(blank));
        }

        if tapes == 0 {
            return Err(TuringMachineError::NoTapes);
        }

        if tapes > MAX_TAPES {
            return Err(TuringMachineError::TooManyTapes {
                max: MAX_TAPES,
                found: tapes,
            });
        }

        let mut machine = Self {
            states,
            input_alphabet,
            tape_alphabet,
            state: initial_state.clone(),
            initial_state,
            blank,
            final_states,
            transitions: Vec::with_capacity(transitions.len()),
            tapes: vec![Tape::new(blank); tapes],
            step_count: 0,
            halted: false,
        };

        for transition in transitions {
            machine.add_transition(transition)?;
        }

        Ok(machine)
    }

    /// Appends a transition to the transition function.
    ///
    /// Both endpoints must be declared states, the transition must operate on as many tapes
    /// as the machine has, and every read and written symbol must belong to the tape
    /// alphabet. Adding a transition also requires the blank symbol to be absent from the
    /// input alphabet.
    pub fn add_transition(&mut self, transition: Transition) -> Result<(), TuringMachineError> {
        for state in [transition.state(), transition.next_state()] {
            if !self.states.contains(state) {
                return Err(TuringMachineError::InvalidState(state.to_string()));
            }
        }

        if transition.tapes() != self.tapes.len() {
            return Err(TuringMachineError::TapeCountMismatch {
                expected: self.tapes.len(),
                found: transition.tapes(),
            });
        }

        if let Some(&symbol) = transition
            .read()
            .iter()
            .chain(transition.write())
            .find(|&&symbol| !self.tape_alphabet.contains(symbol))
        {
            return Err(TuringMachineError::InvalidTapeSymbol(symbol));
        }

        if self.input_alphabet.contains(self.blank) {
            return Err(TuringMachineError::BlankInInputAlphabet(self.blank));
        }

        self.transitions.push(transition);
        Ok(())
    }

    /// Runs the machine on `input` until it halts or `max_steps` transitions have been applied.
    ///
    /// The input is checked against the input alphabet before anything is touched, so a
    /// rejected call leaves the machine exactly as it was.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` if the machine halted because no transition applied. Use
    ///   [`TuringMachine::is_accepted`] to tell acceptance from rejection.
    /// * `Ok(false)` if the step budget was exhausted first.
    /// * `Err(TuringMachineError::InvalidInput)` if `input` contains a foreign symbol.
    pub fn run(&mut self, input: &str, max_steps: usize) -> Result<bool, TuringMachineError> {
        self.load(input)?;

        tracing::debug!(input, max_steps, tapes = self.tapes.len(), "starting run");

        while self.step_count < max_steps {
            if self.step() == Step::Halt {
                tracing::debug!(
                    state = %self.state,
                    steps = self.step_count,
                    accepted = self.is_accepted(),
                    "machine halted"
                );
                return Ok(true);
            }
        }

        tracing::debug!(
            state = %self.state,
            steps = self.step_count,
            "step budget exhausted"
        );
        Ok(false)
    }

    /// Validates `input` and puts the machine in its initial configuration with `input` on
    /// the first tape and blank tapes elsewhere, without executing any step.
    pub fn load(&mut self, input: &str) -> Result<(), TuringMachineError> {
        if let Some(c) = input.chars().find(|&c| !self.input_alphabet.contains(c)) {
            return Err(TuringMachineError::InvalidInput(c));
        }

        self.reset();
        if let Some(first) = self.tapes.first_mut() {
            first.reset(input);
        }

        Ok(())
    }

    /// Executes a single step of the machine's computation.
    ///
    /// Reads the symbol under every head, finds the first transition matching the current
    /// state and those symbols, then moves to the next state and, tape by tape, writes the
    /// new symbol and moves the head. If no transition matches, nothing is modified and the
    /// machine is marked as halted.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was applied.
    /// * `Step::Halt` if no transition applies (or the machine had already halted).
    pub fn step(&mut self) -> Step {
        if self.halted {
            return Step::Halt;
        }

        let index = match self.transition_index() {
            Some(index) => index,
            None => {
                self.halted = true;
                return Step::Halt;
            }
        };

        let transition = &self.transitions[index];
        tracing::trace!(step = self.step_count + 1, %transition, "applying transition");

        self.state = transition.next_state().to_string();
        for ((tape, &symbol), &direction) in self
            .tapes
            .iter_mut()
            .zip(transition.write())
            .zip(transition.directions())
        {
            tape.write(symbol);
            tape.apply(direction);
        }

        self.step_count += 1;
        Step::Continue
    }

    /// Resets the machine to its initial configuration: initial state, zero steps,
    /// not halted, and every tape holding a single blank cell.
    pub fn reset(&mut self) {
        self.state.clone_from(&self.initial_state);
        self.step_count = 0;
        self.halted = false;

        for tape in &mut self.tapes {
            tape.reset("");
        }
    }

    /// Returns the symbols currently under each tape's head.
    pub fn symbols(&self) -> Vec<char> {
        self.tapes.iter().map(Tape::read).collect()
    }

    /// Finds the transition that applies to the current state and symbols.
    ///
    /// Transitions are scanned in insertion order and the first match wins.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition_index().map(|index| &self.transitions[index])
    }

    fn transition_index(&self) -> Option<usize> {
        let symbols = self.symbols();
        self.transitions
            .iter()
            .position(|t| t.matches(&self.state, &symbols))
    }

    /// Returns `true` if the current state is a final state.
    pub fn is_accepted(&self) -> bool {
        self.final_states.contains(&self.state)
    }

    /// Returns `true` once a step found no applicable transition.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Returns the current state of the machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the initial state of the machine.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Returns the total number of transitions applied since the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn blank(&self) -> char {
        self.blank
    }

    pub fn states(&self) -> &BTreeSet<String> {
        &self.states
    }

    pub fn final_states(&self) -> &BTreeSet<String> {
        &self.final_states
    }

    pub fn input_alphabet(&self) -> &Alphabet {
        &self.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &Alphabet {
        &self.tape_alphabet
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Returns a slice of the machine's tapes.
    pub fn tapes(&self) -> &[Tape] {
        &self.tapes
    }

    /// Returns the number of tapes.
    pub fn tape_count(&self) -> usize {
        self.tapes.len()
    }

    /// Returns the full content of every tape, blanks added by growth included.
    pub fn tapes_content(&self) -> Vec<String> {
        self.tapes.iter().map(Tape::content).collect()
    }

    /// Returns the content of every tape with the head cell bracketed.
    pub fn tapes_content_with_head(&self) -> Vec<String> {
        self.tapes.iter().map(Tape::content_with_head).collect()
    }

    /// Returns the first tape's content without leading and trailing blanks.
    ///
    /// A tape holding nothing but blanks yields a single blank symbol rather than an
    /// empty string.
    pub fn result_from_first_tape(&self) -> String {
        let Some(tape) = self.tapes.first() else {
            return String::new();
        };

        let content = tape.content();
        let trimmed = content.trim_matches(self.blank);
        if trimmed.is_empty() {
            self.blank.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Builds a `RunReport` for the current configuration.
    ///
    /// # Arguments
    ///
    /// * `input` - The input the machine was run on.
    /// * `halted` - The value returned by [`TuringMachine::run`].
    pub fn report(&self, input: &str, halted: bool) -> RunReport {
        RunReport {
            input: input.to_string(),
            halted,
            accepted: halted && self.is_accepted(),
            state: self.state.clone(),
            steps: self.step_count,
            tapes: self.tapes_content(),
            result: self.result_from_first_tape(),
        }
    }
}

/// Prints the current configuration: state, step count, every tape with its head, and
/// whether the current state is accepting.
impl fmt::Display for TuringMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State: {}", self.state)?;
        writeln!(f, "Steps: {}", self.step_count)?;
        for (i, tape) in self.tapes.iter().enumerate() {
            writeln!(f, "Tape {}: {}", i + 1, tape)?;
        }
        write!(f, "Accepted: {}", if self.is_accepted() { "yes" } else { "no" })
    }
}
