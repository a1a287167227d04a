//! Alphabet: bidirectional mapping between symbols and dense indices.

use std::collections::HashMap;

use crate::error::EnigmaError;

/// The upper-case Latin letters used when no alphabet is configured.
const DEFAULT_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// An ordered set of encodable symbols. Symbol number `k` has index `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    indices: HashMap<char, usize>,
}

impl Default for Alphabet {
    fn default() -> Self {
        let symbols: Vec<char> = DEFAULT_SYMBOLS.chars().collect();
        let indices = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, indices }
    }
}

impl Alphabet {
    /// Builds an alphabet from the symbols of `chars`, in order.
    ///
    /// # Errors
    /// - [`EnigmaError::EmptyAlphabet`] if `chars` is empty.
    /// - [`EnigmaError::AlphabetWhitespace`] if any symbol is whitespace.
    /// - [`EnigmaError::DuplicateSymbol`] if a symbol repeats.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Alphabet;
    ///
    /// let alpha = Alphabet::new("ABCD").unwrap();
    /// assert_eq!(alpha.size(), 4);
    /// assert!(Alphabet::new("ABCA").is_err());
    /// ```
    pub fn new(chars: &str) -> Result<Self, EnigmaError> {
        if chars.is_empty() {
            return Err(EnigmaError::EmptyAlphabet);
        }
        let mut symbols = Vec::with_capacity(chars.len());
        let mut indices = HashMap::with_capacity(chars.len());
        for (i, ch) in chars.chars().enumerate() {
            if ch.is_whitespace() {
                return Err(EnigmaError::AlphabetWhitespace);
            }
            if indices.insert(ch, i).is_some() {
                return Err(EnigmaError::DuplicateSymbol(ch));
            }
            symbols.push(ch);
        }
        Ok(Alphabet { symbols, indices })
    }

    /// Returns the number of symbols.
    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if `ch` is in this alphabet.
    pub fn contains(&self, ch: char) -> bool {
        self.indices.contains_key(&ch)
    }

    /// Returns symbol number `index`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::IndexOutOfRange`] unless `index < size()`.
    pub fn to_char(&self, index: usize) -> Result<char, EnigmaError> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Returns the index of `ch`. Inverse of [`to_char`](Self::to_char).
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `ch` is not a member.
    pub fn to_int(&self, ch: char) -> Result<usize, EnigmaError> {
        self.indices
            .get(&ch)
            .copied()
            .ok_or(EnigmaError::NotInAlphabet(ch))
    }

    /// Iterates over the symbols in index order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }
}
