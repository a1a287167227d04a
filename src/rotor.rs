//! Rotor: a wiring permutation seen through a rotational offset.
//!
//! One [`Rotor`] type covers the three machine parts: reflectors, fixed
//! rotors and moving rotors. They differ only in [`RotorKind`], which
//! decides whether the rotor can advance, carries notches, or reflects.
//!
//! Rotors are owned by a [`RotorCatalog`] and referenced by [`RotorId`],
//! so a machine's slots share the configured rotors instead of copying them.

use std::collections::HashMap;

use crate::error::EnigmaError;
use crate::permutation::Permutation;

/// The capability set of a rotor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Non-rotating, wiring is a derangement, always at setting 0.
    Reflector,
    /// Settable during setup, never advances while converting.
    Fixed,
    /// Advances when stepped. `notches` are alphabet indices.
    Moving { notches: Vec<usize> },
}

/// A substitution unit with a wiring permutation and a rotational offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    kind: RotorKind,
    permutation: Permutation,
    setting: usize,
}

impl Rotor {
    /// Creates a reflector named `name` wired by `permutation`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotADerangement`] if the wiring has a fixed point.
    pub fn reflector(name: &str, permutation: Permutation) -> Result<Self, EnigmaError> {
        if !permutation.derangement() {
            return Err(EnigmaError::NotADerangement(name.to_string()));
        }
        Ok(Self::build(name, RotorKind::Reflector, permutation))
    }

    /// Creates a rotor that has no ratchet and never advances.
    pub fn fixed(name: &str, permutation: Permutation) -> Self {
        Self::build(name, RotorKind::Fixed, permutation)
    }

    /// Creates a moving rotor whose notches are the symbols of `notches`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::NotInAlphabet`] if a notch symbol is not in the
    /// permutation's alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation, Rotor};
    ///
    /// let alpha = Arc::new(Alphabet::default());
    /// let perm = Permutation::new("(AELTPHQXRU) (BKNW)", alpha).unwrap();
    /// let mut rotor = Rotor::moving("I", perm, "Q").unwrap();
    /// rotor.set_symbol('P').unwrap();
    /// assert!(!rotor.at_notch());
    /// rotor.advance();
    /// assert!(rotor.at_notch());
    /// ```
    pub fn moving(name: &str, permutation: Permutation, notches: &str) -> Result<Self, EnigmaError> {
        let alphabet = permutation.alphabet();
        let notches = notches
            .chars()
            .map(|ch| alphabet.to_int(ch))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::build(name, RotorKind::Moving { notches }, permutation))
    }

    fn build(name: &str, kind: RotorKind, permutation: Permutation) -> Self {
        Rotor {
            name: name.to_string(),
            kind,
            permutation,
            setting: 0,
        }
    }

    /// Returns my name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns my kind.
    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Returns my wiring at setting 0.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Returns the size of my alphabet.
    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    /// Returns true iff I have a ratchet and can move.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    /// Returns true iff I reflect.
    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    /// Returns my current setting.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Sets my rotational offset to `posn`.
    ///
    /// # Errors
    /// - [`EnigmaError::IndexOutOfRange`] unless `posn < size()`.
    /// - [`EnigmaError::ReflectorSetting`] for a nonzero reflector setting.
    pub fn set(&mut self, posn: usize) -> Result<(), EnigmaError> {
        if posn >= self.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: posn,
                size: self.size(),
            });
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::ReflectorSetting(self.name.clone()));
        }
        self.setting = posn;
        Ok(())
    }

    /// Sets my rotational offset to the index of symbol `cposn`.
    ///
    /// # Errors
    /// As [`set`](Self::set), plus [`EnigmaError::NotInAlphabet`].
    pub fn set_symbol(&mut self, cposn: char) -> Result<(), EnigmaError> {
        let posn = self.permutation.alphabet().to_int(cposn)?;
        self.set(posn)
    }

    /// Converts index `p` entering from the right through my wiring.
    pub fn convert_forward(&self, p: usize) -> usize {
        let offset = self.setting as isize;
        let out = self.permutation.permute(p as isize + offset);
        self.permutation.wrap(out as isize - offset)
    }

    /// Converts index `e` entering from the left through my inverse wiring.
    pub fn convert_backward(&self, e: usize) -> usize {
        let offset = self.setting as isize;
        let out = self.permutation.invert(e as isize + offset);
        self.permutation.wrap(out as isize - offset)
    }

    /// Returns true iff I rotate and my current setting is one of my notches.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            _ => false,
        }
    }

    /// Advances me one position if I rotate; otherwise does nothing.
    pub fn advance(&mut self) {
        if self.rotates() {
            self.setting = (self.setting + 1) % self.size();
        }
    }
}

/// Identifier of a rotor within a [`RotorCatalog`].
///
/// Ids are only handed out by [`RotorCatalog::insert`] and
/// [`RotorCatalog::find`], so they cannot be forged from outside the crate:
///
/// ```compile_fail
/// let _ = enigma::RotorId(7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotorId(pub(crate) usize);

/// The set of available rotors, keyed by name.
///
/// Names are matched case-insensitively. The catalog is filled once from
/// the configuration; after that only rotor settings change.
#[derive(Debug, Clone, Default)]
pub struct RotorCatalog {
    rotors: Vec<Rotor>,
    by_name: HashMap<String, RotorId>,
}

impl RotorCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `rotor` to the catalog.
    ///
    /// # Returns
    /// The [`RotorId`] of the new rotor.
    ///
    /// # Errors
    /// Returns [`EnigmaError::DuplicateRotor`] if the name is already taken.
    pub fn insert(&mut self, rotor: Rotor) -> Result<RotorId, EnigmaError> {
        let key = rotor.name().to_uppercase();
        if self.by_name.contains_key(&key) {
            return Err(EnigmaError::DuplicateRotor(rotor.name().to_string()));
        }
        let id = RotorId(self.rotors.len());
        self.by_name.insert(key, id);
        self.rotors.push(rotor);
        Ok(id)
    }

    /// Looks up a rotor by name.
    pub fn find(&self, name: &str) -> Option<RotorId> {
        self.by_name.get(&name.to_uppercase()).copied()
    }

    /// Returns the rotor with the given id.
    pub fn get(&self, id: RotorId) -> &Rotor {
        &self.rotors[id.0]
    }

    /// Returns the rotor with the given id, mutably.
    pub fn get_mut(&mut self, id: RotorId) -> &mut Rotor {
        &mut self.rotors[id.0]
    }

    /// Returns the number of rotors in the catalog.
    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    /// Returns true if the catalog holds no rotors.
    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Iterates over the rotors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.iter()
    }
}
