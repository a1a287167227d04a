//! Machine: the rotor stack, the plugboard and the stepping mechanism.
//!
//! Holds an ordered array of rotor slots (slot 0 is the reflector) drawn
//! from a shared [`RotorCatalog`], plus a plugboard permutation. Each
//! converted symbol first steps the rotors, then travels
//! plugboard → rotors right to left → reflector → rotors left to right → plugboard.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::config::SetupLine;
use crate::error::EnigmaError;
use crate::permutation::Permutation;
use crate::rotor::{RotorCatalog, RotorId};

/// A complete Enigma machine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use enigma::{Alphabet, Machine, Permutation, Rotor, RotorCatalog};
///
/// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
/// let mut catalog = RotorCatalog::new();
/// catalog
///     .insert(Rotor::reflector("REF", Permutation::new("(AB)(CD)", alpha.clone()).unwrap()).unwrap())
///     .unwrap();
/// catalog.insert(Rotor::fixed("F1", Permutation::identity(alpha.clone()))).unwrap();
/// catalog
///     .insert(Rotor::fixed("F2", Permutation::new("(AC)", alpha.clone()).unwrap()))
///     .unwrap();
///
/// let mut machine = Machine::new(alpha, 3, 0, catalog).unwrap();
/// machine.insert_rotors(&["REF", "F1", "F2"]).unwrap();
/// machine.set_rotors("AA").unwrap();
/// assert_eq!(machine.convert("AABD").unwrap(), "DDCA");
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    catalog: RotorCatalog,
    num_rotors: usize,
    num_pawls: usize,
    slots: Vec<RotorId>,
    plugboard: Permutation,
}

impl Machine {
    /// Creates a machine over `alphabet` with `num_rotors` slots and
    /// `num_pawls` pawls, drawing its rotors from `catalog`.
    ///
    /// No rotors are inserted and the plugboard is the identity.
    ///
    /// # Errors
    /// Returns [`EnigmaError::InvalidRotorCounts`] unless
    /// `2 <= num_rotors` and `num_pawls < num_rotors`.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        catalog: RotorCatalog,
    ) -> Result<Self, EnigmaError> {
        if num_rotors < 2 || num_pawls >= num_rotors {
            return Err(EnigmaError::InvalidRotorCounts {
                num_rotors,
                num_pawls,
            });
        }
        debug!(
            num_rotors,
            num_pawls,
            available = catalog.len(),
            "machine built"
        );
        let plugboard = Permutation::identity(Arc::clone(&alphabet));
        Ok(Machine {
            alphabet,
            catalog,
            num_rotors,
            num_pawls,
            slots: Vec::with_capacity(num_rotors),
            plugboard,
        })
    }

    /// Returns the number of rotor slots I have.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Returns the number of pawls (and thus rotating rotors) I have.
    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// Returns my alphabet.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the rotors available to me.
    pub fn catalog(&self) -> &RotorCatalog {
        &self.catalog
    }

    /// Returns my plugboard.
    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Returns the names of the inserted rotors, reflector first.
    pub fn rotor_names(&self) -> Vec<&str> {
        self.slots
            .iter()
            .map(|&id| self.catalog.get(id).name())
            .collect()
    }

    /// Returns the current settings of the non-reflector slots as symbols,
    /// leftmost first.
    ///
    /// Empty if no rotors are inserted.
    pub fn positions(&self) -> String {
        self.slots
            .iter()
            .skip(1)
            .filter_map(|&id| self.alphabet.to_char(self.catalog.get(id).setting()).ok())
            .collect()
    }

    /// Fills my slots with the rotors named `rotors`, reflector first.
    ///
    /// Every inserted rotor is reset to setting 0.
    ///
    /// # Errors
    /// - [`EnigmaError::WrongRotorCount`] unless exactly `num_rotors` names are given.
    /// - [`EnigmaError::UnknownRotor`] for a name not in the catalog.
    /// - [`EnigmaError::DuplicateRotor`] if a rotor is named twice.
    /// - [`EnigmaError::MissingReflector`] if slot 0 is not a reflector.
    /// - [`EnigmaError::MisplacedReflector`] if a reflector is in any other slot.
    ///
    /// On error the previous slot contents are kept.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, rotors: &[S]) -> Result<(), EnigmaError> {
        if rotors.len() != self.num_rotors {
            return Err(EnigmaError::WrongRotorCount {
                expected: self.num_rotors,
                found: rotors.len(),
            });
        }

        let mut slots = Vec::with_capacity(self.num_rotors);
        for (slot, name) in rotors.iter().enumerate() {
            let name = name.as_ref();
            let id = self
                .catalog
                .find(name)
                .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))?;
            if slots.contains(&id) {
                return Err(EnigmaError::DuplicateRotor(name.to_string()));
            }
            let rotor = self.catalog.get(id);
            if slot == 0 && !rotor.reflecting() {
                return Err(EnigmaError::MissingReflector(rotor.name().to_string()));
            }
            if slot > 0 && rotor.reflecting() {
                return Err(EnigmaError::MisplacedReflector {
                    name: rotor.name().to_string(),
                    slot,
                });
            }
            slots.push(id);
        }

        for &id in &slots {
            self.catalog.get_mut(id).set(0)?;
        }
        self.slots = slots;
        debug!(rotors = ?self.rotor_names(), "rotors inserted");
        Ok(())
    }

    /// Sets my rotors according to `setting`, a string of `num_rotors - 1`
    /// symbols. The first symbol is the leftmost non-reflector rotor.
    ///
    /// # Errors
    /// - [`EnigmaError::RotorsNotInserted`] if no rotors are inserted.
    /// - [`EnigmaError::SettingLength`] for a setting of the wrong length.
    /// - [`EnigmaError::NotInAlphabet`] for a symbol outside the alphabet.
    ///
    /// Settings are validated in full before any rotor moves.
    pub fn set_rotors(&mut self, setting: &str) -> Result<(), EnigmaError> {
        if self.slots.is_empty() {
            return Err(EnigmaError::RotorsNotInserted);
        }
        let positions = self.parse_setting(setting)?;
        for (&id, &posn) in self.slots.iter().skip(1).zip(&positions) {
            self.catalog.get_mut(id).set(posn)?;
        }
        debug!(setting, "rotors set");
        Ok(())
    }

    /// Converts `setting` to one position per non-reflector slot.
    fn parse_setting(&self, setting: &str) -> Result<Vec<usize>, EnigmaError> {
        let positions = setting
            .chars()
            .map(|ch| self.alphabet.to_int(ch))
            .collect::<Result<Vec<_>, _>>()?;
        if positions.len() != self.num_rotors - 1 {
            return Err(EnigmaError::SettingLength {
                expected: self.num_rotors - 1,
                found: positions.len(),
            });
        }
        Ok(positions)
    }

    /// Sets the plugboard to `plugboard`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::AlphabetMismatch`] if `plugboard` permutes a
    /// different alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<(), EnigmaError> {
        if **plugboard.alphabet() != *self.alphabet {
            return Err(EnigmaError::AlphabetMismatch);
        }
        debug!(plugboard = %plugboard, "plugboard set");
        self.plugboard = plugboard;
        Ok(())
    }

    /// Applies a parsed `*` setup line: rotors, settings, then plugboard.
    ///
    /// # Errors
    /// Any error of [`insert_rotors`](Self::insert_rotors),
    /// [`set_rotors`](Self::set_rotors) or of parsing the plugboard cycles.
    /// The plugboard and setting are checked before any slot changes, so a
    /// rejected setup leaves the machine as it was.
    pub fn apply_setup(&mut self, setup: &SetupLine) -> Result<(), EnigmaError> {
        let plugboard = Permutation::new(&setup.plugboard, Arc::clone(&self.alphabet))?;
        self.parse_setting(&setup.setting)?;
        self.insert_rotors(&setup.rotors)?;
        self.set_rotors(&setup.setting)?;
        self.set_plugboard(plugboard)
    }

    /// Returns the result of converting index `c`, after first advancing
    /// the machine.
    ///
    /// # Errors
    /// - [`EnigmaError::RotorsNotInserted`] if no rotors are inserted.
    /// - [`EnigmaError::PawlMismatch`] if the number of rotating rotors
    ///   differs from `num_pawls`.
    /// - [`EnigmaError::IndexOutOfRange`] unless `c < alphabet.size()`.
    ///
    /// No rotor moves when an error is returned.
    pub fn convert_index(&mut self, c: usize) -> Result<usize, EnigmaError> {
        self.check_ready()?;
        if c >= self.alphabet.size() {
            return Err(EnigmaError::IndexOutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        self.step();
        Ok(self.substitute(c))
    }

    /// Returns the encoding/decoding of `msg`, updating rotor state.
    ///
    /// The message is upper-cased first. Characters outside the alphabet
    /// are copied unchanged and do not move the rotors.
    ///
    /// # Errors
    /// As [`convert_index`](Self::convert_index); checked once, before the
    /// first character is converted.
    pub fn convert(&mut self, msg: &str) -> Result<String, EnigmaError> {
        self.check_ready()?;
        let mut result = String::with_capacity(msg.len());
        for ch in msg.to_uppercase().chars() {
            match self.alphabet.to_int(ch) {
                Ok(index) => {
                    self.step();
                    let out = self.substitute(index);
                    result.push(self.alphabet.to_char(out)?);
                }
                Err(_) => result.push(ch),
            }
        }
        Ok(result)
    }

    /// Verifies that rotors are inserted and pawls match rotating rotors.
    fn check_ready(&self) -> Result<(), EnigmaError> {
        if self.slots.is_empty() {
            return Err(EnigmaError::RotorsNotInserted);
        }
        let rotating = self
            .slots
            .iter()
            .filter(|&&id| self.catalog.get(id).rotates())
            .count();
        if rotating != self.num_pawls {
            return Err(EnigmaError::PawlMismatch {
                expected: self.num_pawls,
                found: rotating,
            });
        }
        Ok(())
    }

    /// Advances the rotors for one keypress.
    ///
    /// The rightmost rotor always advances. When a rotating rotor sits at a
    /// notch and its left neighbour also rotates, the pawl between them
    /// pushes both. All decisions use the notch state before this step.
    fn step(&mut self) {
        let last = self.slots.len() - 1;
        let mut advance = vec![false; self.slots.len()];
        advance[last] = true;

        for i in 0..last {
            let left = self.catalog.get(self.slots[i]);
            let right = self.catalog.get(self.slots[i + 1]);
            if left.rotates() && right.rotates() && right.at_notch() {
                advance[i] = true;
                advance[i + 1] = true;
            }
        }

        for (slot, &id) in self.slots.iter().enumerate() {
            if advance[slot] {
                self.catalog.get_mut(id).advance();
            }
        }
        trace!(?advance, positions = %self.positions(), "stepped");
    }

    /// Runs index `c` through plugboard, rotor stack, reflector and back.
    fn substitute(&self, c: usize) -> usize {
        let mut c = self.plugboard.permute(c as isize);
        for &id in self.slots.iter().rev() {
            c = self.catalog.get(id).convert_forward(c);
        }
        for &id in self.slots.iter().skip(1) {
            c = self.catalog.get(id).convert_backward(c);
        }
        self.plugboard.permute(c as isize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotor::Rotor;

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::default())
    }

    fn perm(cycles: &str, alpha: &Arc<Alphabet>) -> Permutation {
        Permutation::new(cycles, Arc::clone(alpha)).unwrap()
    }

    /// Reflector B, fixed Beta, and moving rotors I, II, III.
    fn historical_catalog(alpha: &Arc<Alphabet>) -> RotorCatalog {
        let mut catalog = RotorCatalog::new();
        catalog
            .insert(
                Rotor::reflector(
                    "B",
                    perm(
                        "(AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)",
                        alpha,
                    ),
                )
                .unwrap(),
            )
            .unwrap();
        catalog
            .insert(Rotor::fixed(
                "Beta",
                perm("(ALBEVFCYODJWUGNMQTZSKPR) (HIX)", alpha),
            ))
            .unwrap();
        catalog
            .insert(
                Rotor::moving(
                    "I",
                    perm("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", alpha),
                    "Q",
                )
                .unwrap(),
            )
            .unwrap();
        catalog
            .insert(
                Rotor::moving(
                    "II",
                    perm("(FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)", alpha),
                    "E",
                )
                .unwrap(),
            )
            .unwrap();
        catalog
            .insert(
                Rotor::moving(
                    "III",
                    perm("(ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)", alpha),
                    "V",
                )
                .unwrap(),
            )
            .unwrap();
        catalog
    }

    fn three_rotor_machine() -> Machine {
        let alpha = upper();
        let catalog = historical_catalog(&alpha);
        let mut machine = Machine::new(alpha, 4, 3, catalog).unwrap();
        machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        machine
    }

    #[test]
    fn test_rejects_invalid_counts() {
        let alpha = upper();
        assert!(matches!(
            Machine::new(Arc::clone(&alpha), 3, 3, RotorCatalog::new()),
            Err(EnigmaError::InvalidRotorCounts { .. })
        ));
        assert!(matches!(
            Machine::new(alpha, 1, 0, RotorCatalog::new()),
            Err(EnigmaError::InvalidRotorCounts { .. })
        ));
    }

    #[test]
    fn test_insert_rotors_validation() {
        let alpha = upper();
        let mut machine = Machine::new(Arc::clone(&alpha), 4, 3, historical_catalog(&alpha)).unwrap();

        assert_eq!(
            machine.insert_rotors(&["B", "I", "II"]),
            Err(EnigmaError::WrongRotorCount {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            machine.insert_rotors(&["B", "I", "II", "IX"]),
            Err(EnigmaError::UnknownRotor("IX".to_string()))
        );
        assert_eq!(
            machine.insert_rotors(&["B", "I", "I", "III"]),
            Err(EnigmaError::DuplicateRotor("I".to_string()))
        );
        assert_eq!(
            machine.insert_rotors(&["I", "B", "II", "III"]),
            Err(EnigmaError::MissingReflector("I".to_string()))
        );
        assert!(machine.rotor_names().is_empty(), "failed insert keeps slots");

        machine.insert_rotors(&["b", "i", "ii", "iii"]).unwrap();
        assert_eq!(machine.rotor_names(), vec!["B", "I", "II", "III"]);
        assert_eq!(machine.positions(), "AAA");
    }

    #[test]
    fn test_set_rotors_validation() {
        let mut machine = three_rotor_machine();
        assert_eq!(
            machine.set_rotors("AB"),
            Err(EnigmaError::SettingLength {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            machine.set_rotors("A1B"),
            Err(EnigmaError::NotInAlphabet('1'))
        );
        machine.set_rotors("XYZ").unwrap();
        assert_eq!(machine.positions(), "XYZ");
    }

    #[test]
    fn test_convert_before_insert() {
        let alpha = upper();
        let mut machine = Machine::new(Arc::clone(&alpha), 4, 3, historical_catalog(&alpha)).unwrap();
        assert_eq!(machine.convert("A"), Err(EnigmaError::RotorsNotInserted));
        assert_eq!(machine.set_rotors("AAA"), Err(EnigmaError::RotorsNotInserted));
    }

    #[test]
    fn test_pawl_mismatch_leaves_state() {
        let alpha = upper();
        let mut machine = Machine::new(Arc::clone(&alpha), 4, 2, historical_catalog(&alpha)).unwrap();
        machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
        machine.set_rotors("ABC").unwrap();
        assert_eq!(
            machine.convert("HELLO"),
            Err(EnigmaError::PawlMismatch {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(machine.positions(), "ABC");

        machine.insert_rotors(&["B", "Beta", "II", "III"]).unwrap();
        assert!(machine.convert("HELLO").is_ok());
    }

    #[test]
    fn test_classic_double_step() {
        let mut machine = three_rotor_machine();
        machine.set_rotors("ADU").unwrap();

        machine.convert("A").unwrap();
        assert_eq!(machine.positions(), "ADV");
        machine.convert("A").unwrap();
        assert_eq!(machine.positions(), "AEW", "middle rotor steps with the right notch");
        machine.convert("A").unwrap();
        assert_eq!(machine.positions(), "BFX", "middle rotor steps again at its own notch");
    }

    #[test]
    fn test_left_and_middle_advance_together() {
        let mut machine = three_rotor_machine();
        // Middle at its notch (E), right at its notch (V).
        machine.set_rotors("AEV").unwrap();
        machine.convert("A").unwrap();
        assert_eq!(machine.positions(), "BFW");
    }

    #[test]
    fn test_known_ciphertext() {
        let mut machine = three_rotor_machine();
        machine.set_rotors("AAA").unwrap();
        // Without a Beta rotor beside the thin reflector this is not the
        // historical BDZGO.
        assert_eq!(machine.convert("AAAAA").unwrap(), "CXMVY");
    }

    #[test]
    fn test_pass_through_does_not_step() {
        let mut machine = three_rotor_machine();
        machine.set_rotors("AAA").unwrap();
        assert_eq!(machine.convert("a a, a.").unwrap(), "C X, M.");
        assert_eq!(machine.positions(), "AAD");
    }

    #[test]
    fn test_convert_index_range_and_reciprocity() {
        let mut machine = three_rotor_machine();
        machine.set_rotors("QEV").unwrap();
        assert_eq!(
            machine.convert_index(26),
            Err(EnigmaError::IndexOutOfRange { index: 26, size: 26 })
        );
        assert_eq!(machine.positions(), "QEV");

        let out: Vec<usize> = (0..26).map(|i| machine.convert_index(i).unwrap()).collect();
        machine.set_rotors("QEV").unwrap();
        for (i, &o) in out.iter().enumerate() {
            assert_ne!(i, o, "no symbol encodes to itself");
            assert_eq!(machine.convert_index(o).unwrap(), i);
        }
    }

    #[test]
    fn test_plugboard() {
        let mut machine = three_rotor_machine();
        let alpha = Arc::clone(machine.alphabet());
        machine.set_rotors("AAA").unwrap();
        machine.set_plugboard(perm("(AZ)", &alpha)).unwrap();
        let cipher = machine.convert("ZZZZZ").unwrap();
        assert_eq!(cipher.len(), 5);

        machine.set_rotors("AAA").unwrap();
        assert_eq!(machine.convert(&cipher).unwrap(), "ZZZZZ");

        let other = Arc::new(Alphabet::new("ABC").unwrap());
        assert_eq!(
            machine.set_plugboard(Permutation::identity(other)),
            Err(EnigmaError::AlphabetMismatch)
        );
    }

    #[test]
    fn test_apply_setup() {
        let mut machine = three_rotor_machine();
        let setup = SetupLine::parse("* B I II III AAA (AZ)", 4).unwrap();
        machine.apply_setup(&setup).unwrap();
        assert_eq!(machine.positions(), "AAA");
        assert_eq!(machine.plugboard().to_string(), "(AZ)");
    }

    #[test]
    fn test_apply_setup_bad_setting_keeps_machine() {
        let mut machine = three_rotor_machine();
        let setup = SetupLine::parse("* B I II III QEV (AZ)", 4).unwrap();
        machine.apply_setup(&setup).unwrap();

        let short = SetupLine::parse("* B III II I ZZ (BY)", 4).unwrap();
        assert_eq!(
            machine.apply_setup(&short),
            Err(EnigmaError::SettingLength {
                expected: 3,
                found: 2
            })
        );
        let foreign = SetupLine::parse("* B III II I Z1Z (BY)", 4).unwrap();
        assert_eq!(
            machine.apply_setup(&foreign),
            Err(EnigmaError::NotInAlphabet('1'))
        );

        assert_eq!(machine.rotor_names(), vec!["B", "I", "II", "III"]);
        assert_eq!(machine.positions(), "QEV");
        assert_eq!(machine.plugboard().to_string(), "(AZ)");
    }
}
