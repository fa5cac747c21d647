//! This module defines the `Alphabet` type, an ordered set of single-character symbols
//! used for both the input alphabet (Σ) and the tape alphabet (Γ) of a machine.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// An ordered set of unique symbols.
///
/// Symbols are kept in a `BTreeSet`, so membership tests are `O(log n)` and
/// iteration (and rendering) is always in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alphabet {
    symbols: BTreeSet<char>,
}

impl Alphabet {
    /// Creates an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an alphabet from a list of tokens.
    ///
    /// Only the first character of each token becomes a symbol; empty tokens are skipped.
    /// Duplicates collapse into a single symbol.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Any iterable of string-like tokens, e.g. the words of a definition line.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .filter_map(|token| token.as_ref().chars().next())
            .collect()
    }

    /// Adds a symbol. Adding a symbol that is already present has no effect.
    pub fn add_symbol(&mut self, symbol: char) {
        self.symbols.insert(symbol);
    }

    /// Returns `true` if `symbol` belongs to the alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// Returns the underlying symbol set.
    pub fn symbols(&self) -> &BTreeSet<char> {
        &self.symbols
    }

    /// Returns the number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterates over the symbols in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}

impl From<BTreeSet<char>> for Alphabet {
    fn from(symbols: BTreeSet<char>) -> Self {
        Self { symbols }
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

/// Renders the alphabet as `{a, b, c}`.
impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = self
            .symbols
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        write!(f, "{{{symbols}}}")
    }
}
