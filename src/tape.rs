//! This module defines the `Tape` struct, a single machine tape that is unbounded in both
//! directions. Storage is a `VecDeque` that grows by exactly one blank cell whenever the head
//! steps past either end, so every head position always refers to a real cell.

use crate::types::{Direction, DEFAULT_BLANK_SYMBOL};
use std::collections::VecDeque;
use std::fmt;

/// One tape of a Turing Machine together with its read/write head.
///
/// ```text
///   . a b c .      cells (two blanks grown by moves)
///     ^            head index 1, head position 0
/// ```
///
/// The head index addresses the deque directly. The head position is relative to the
/// left edge of the initial content and becomes negative once the head moves past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<char>,
    head: usize,
    // Number of cells prepended since the last reset.
    origin: usize,
    blank: char,
}

impl Tape {
    /// Creates an empty tape holding a single blank cell.
    pub fn new(blank: char) -> Self {
        Self::with_input("", blank)
    }

    /// Creates a tape whose cells are the characters of `input`, with the head on the first one.
    /// An empty `input` yields a single blank cell.
    pub fn with_input(input: &str, blank: char) -> Self {
        let mut tape = Self {
            cells: VecDeque::new(),
            head: 0,
            origin: 0,
            blank,
        };
        tape.reset(input);
        tape
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells[self.head]
    }

    /// Replaces the symbol under the head. No alphabet validation happens here.
    pub fn write(&mut self, symbol: char) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head one cell to the left, prepending a blank cell if the head is on the
    /// leftmost cell.
    pub fn move_left(&mut self) {
        if self.head == 0 {
            self.cells.push_front(self.blank);
            self.origin += 1;
        } else {
            self.head -= 1;
        }
    }

    /// Moves the head one cell to the right, appending a blank cell if the head leaves the
    /// rightmost cell.
    pub fn move_right(&mut self) {
        self.head += 1;
        if self.head >= self.cells.len() {
            self.cells.push_back(self.blank);
        }
    }

    /// Leaves the head where it is.
    pub fn move_stay(&mut self) {}

    /// Moves the head according to `direction`.
    pub fn apply(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Stay => self.move_stay(),
        }
    }

    /// Returns the head position relative to the left edge of the initial content.
    pub fn head_position(&self) -> isize {
        self.head as isize - self.origin as isize
    }

    /// Returns the index of the head within the stored cells.
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Returns the blank symbol used to fill newly exposed cells.
    pub fn blank(&self) -> char {
        self.blank
    }

    /// Returns the number of stored cells, including blanks added by growth.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A tape always holds at least one cell, so this is always `false`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns every stored cell from left to right, including blanks added by growth.
    pub fn content(&self) -> String {
        self.cells.iter().collect()
    }

    /// Same as [`Tape::content`], with the head cell bracketed, e.g. `ab[c]de`.
    pub fn content_with_head(&self) -> String {
        let mut content = String::with_capacity(self.cells.len() + 2);
        for (i, &symbol) in self.cells.iter().enumerate() {
            if i == self.head {
                content.push('[');
                content.push(symbol);
                content.push(']');
            } else {
                content.push(symbol);
            }
        }
        content
    }

    /// Discards all cells and reinitializes the tape with `input`, head on the first cell.
    pub fn reset(&mut self, input: &str) {
        self.cells.clear();
        self.cells.extend(input.chars());
        if self.cells.is_empty() {
            self.cells.push_back(self.blank);
        }
        self.head = 0;
        self.origin = 0;
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_BLANK_SYMBOL)
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content_with_head())
    }
}
