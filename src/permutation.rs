//! Permutation: a bijection on alphabet indices written in cycle notation.
//!
//! Cycle text such as `"(ABD) (FG)"` is parsed once into forward and
//! inverse lookup tables, so applying the permutation is a table read.
//! Symbols that appear in no cycle map to themselves.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;

/// A permutation of the indices of an [`Alphabet`], defined by disjoint cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Vec<usize>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Builds the permutation described by `cycles` over `alphabet`.
    ///
    /// # Parameters
    /// - `cycles`: Cycle notation, e.g. `"(ABD) (FG)"`. Whitespace is
    ///   ignored; an empty string is the identity.
    /// - `alphabet`: The shared alphabet whose indices are permuted.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedCycles`] for unbalanced or empty groups, or
    ///   symbols outside any group.
    /// - [`EnigmaError::NotInAlphabet`] for symbols not in `alphabet`.
    /// - [`EnigmaError::OverlappingCycles`] if a symbol appears twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let perm = Permutation::new("(ABD)", alpha).unwrap();
    /// assert_eq!(perm.permute(0), 1);
    /// assert_eq!(perm.invert(0), 3);
    /// assert_eq!(perm.permute(2), 2);
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self, EnigmaError> {
        let mut perm = Self::identity(alphabet);
        perm.add_cycles(cycles)?;
        Ok(perm)
    }

    /// Builds the identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        Permutation {
            alphabet,
            cycles: Vec::new(),
            forward: (0..size).collect(),
            inverse: (0..size).collect(),
        }
    }

    /// Appends the cycles in `cycles` to this permutation.
    ///
    /// Used when a rotor's wiring spans several configuration lines. The new
    /// cycles must be disjoint from each other and from the existing ones;
    /// on error the permutation is left unchanged.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn add_cycles(&mut self, cycles: &str) -> Result<(), EnigmaError> {
        let mut member = vec![false; self.size()];
        for &index in self.cycles.iter().flatten() {
            member[index] = true;
        }
        let parsed = parse_cycles(cycles, &self.alphabet, &mut member)?;
        for cycle in &parsed {
            let len = cycle.len();
            for (i, &from) in cycle.iter().enumerate() {
                let to = cycle[(i + 1) % len];
                self.forward[from] = to;
                self.inverse[to] = from;
            }
        }
        self.cycles.extend(parsed);
        Ok(())
    }

    /// Returns the size of the alphabet I permute.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// Returns the alphabet this permutation was built against.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns `p` modulo the alphabet size, in `[0, size)`.
    pub fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }

    /// Applies the permutation to `p` modulo the alphabet size.
    pub fn permute(&self, p: isize) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Applies the inverse permutation to `c` modulo the alphabet size.
    pub fn invert(&self, c: isize) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Applies the permutation to symbol `p`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `p` is not in the alphabet.
    pub fn permute_char(&self, p: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_int(p)?;
        self.alphabet.to_char(self.forward[index])
    }

    /// Applies the inverse permutation to symbol `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if `c` is not in the alphabet.
    pub fn invert_char(&self, c: char) -> Result<char, EnigmaError> {
        let index = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.inverse[index])
    }

    /// Returns true iff no symbol maps to itself.
    ///
    /// Symbols missing from every cycle are fixed points, so a permutation
    /// must cover the whole alphabet with cycles of length two or more to
    /// qualify.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &to)| i != to)
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, cycle) in self.cycles.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            f.write_str("(")?;
            for &index in cycle {
                let ch = self.alphabet.to_char(index).map_err(|_| fmt::Error)?;
                write!(f, "{}", ch)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Parses cycle notation into index cycles.
///
/// `member` marks indices already claimed by a cycle and is updated as new
/// symbols are accepted.
fn parse_cycles(
    text: &str,
    alphabet: &Alphabet,
    member: &mut [bool],
) -> Result<Vec<Vec<usize>>, EnigmaError> {
    let mut cycles = Vec::new();
    let mut current: Option<Vec<usize>> = None;

    for ch in text.chars() {
        if ch.is_whitespace() {
            continue;
        }
        match ch {
            '(' => {
                if current.is_some() {
                    return Err(malformed("nested '('", text));
                }
                current = Some(Vec::new());
            }
            ')' => {
                let cycle = current
                    .take()
                    .ok_or_else(|| malformed("unmatched ')'", text))?;
                if cycle.is_empty() {
                    return Err(malformed("empty cycle", text));
                }
                cycles.push(cycle);
            }
            _ => {
                let cycle = current
                    .as_mut()
                    .ok_or_else(|| malformed(&format!("'{}' outside of a cycle", ch), text))?;
                let index = alphabet.to_int(ch)?;
                if member[index] {
                    return Err(EnigmaError::OverlappingCycles(ch));
                }
                member[index] = true;
                cycle.push(index);
            }
        }
    }

    if current.is_some() {
        return Err(malformed("unclosed '('", text));
    }
    Ok(cycles)
}

fn malformed(why: &str, text: &str) -> EnigmaError {
    EnigmaError::MalformedCycles(format!("{} in \"{}\"", why, text.trim()))
}
