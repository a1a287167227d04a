//! Configuration reader: builds a [`Machine`] from configuration text and
//! parses the `*` setup lines of a message stream.
//!
//! Configuration layout:
//!
//! ```text
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ          alphabet
//! 5 3                                 slots, pawls
//! I MQ   (AELTPHQXRU) (BKNW) ...      NAME TYPE CYCLES
//! B R    (AE) (BN) (CK) (DQ) ...
//!        (RX) (SZ) (TV)               continuation of the previous wiring
//! ```
//!
//! TYPE is `R` (reflector), `N` (fixed) or `M` followed by the notch symbols.

use std::sync::Arc;

use tracing::debug;

use crate::alphabet::Alphabet;
use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorCatalog};

/// Returns a machine configured from the configuration text `text`.
///
/// # Errors
/// - [`EnigmaError::TruncatedConfig`] if the alphabet or counts are missing.
/// - [`EnigmaError::MalformedCounts`] if the counts are not two integers.
/// - Any alphabet, permutation, descriptor or rotor error.
/// - [`EnigmaError::DuplicateRotor`] if two rotors share a name.
/// - [`EnigmaError::InvalidRotorCounts`] for inconsistent counts.
///
/// # Examples
///
/// ```
/// use enigma::config::read_config;
///
/// let config = "ABCD\n3 1\nREF R (AB) (CD)\nF N (AC)\nM MB (ABCD)\n";
/// let machine = read_config(config).unwrap();
/// assert_eq!(machine.num_rotors(), 3);
/// assert_eq!(machine.catalog().len(), 3);
/// ```
pub fn read_config(text: &str) -> Result<Machine, EnigmaError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let alphabet_line = lines
        .next()
        .ok_or_else(|| EnigmaError::TruncatedConfig("missing alphabet".to_string()))?;
    let alphabet = Arc::new(Alphabet::new(alphabet_line.trim())?);

    let counts_line = lines
        .next()
        .ok_or_else(|| EnigmaError::TruncatedConfig("missing rotor and pawl counts".to_string()))?;
    let (num_rotors, num_pawls) = parse_counts(counts_line)?;

    let mut catalog = RotorCatalog::new();
    let mut pending: Option<RotorDescriptor> = None;
    for line in lines {
        if line.trim_start().starts_with('(') {
            let descriptor = pending.as_mut().ok_or_else(|| {
                EnigmaError::InvalidRotorDescriptor(format!(
                    "wiring \"{}\" does not follow a rotor",
                    line.trim()
                ))
            })?;
            descriptor.permutation.add_cycles(line)?;
        } else {
            if let Some(descriptor) = pending.take() {
                catalog.insert(descriptor.into_rotor()?)?;
            }
            pending = Some(parse_rotor_descriptor(line, &alphabet)?);
        }
    }
    if let Some(descriptor) = pending {
        catalog.insert(descriptor.into_rotor()?)?;
    }

    debug!(
        alphabet = alphabet_line.trim(),
        rotors = catalog.len(),
        "configuration read"
    );
    Machine::new(alphabet, num_rotors, num_pawls, catalog)
}

/// Parses the `numRotors numPawls` line.
fn parse_counts(line: &str) -> Result<(usize, usize), EnigmaError> {
    let malformed = || EnigmaError::MalformedCounts(line.trim().to_string());
    let mut tokens = line.split_whitespace();
    let num_rotors = tokens
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(malformed)?;
    let num_pawls = tokens
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(malformed)?;
    if tokens.next().is_some() {
        return Err(malformed());
    }
    Ok((num_rotors, num_pawls))
}

/// The rotor type given by a descriptor's TYPE field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
    /// `R`
    Reflector,
    /// `N`
    Fixed,
    /// `M` followed by the notch symbols.
    Moving(String),
}

/// A rotor description whose wiring may still grow through continuation lines.
#[derive(Debug, Clone)]
pub struct RotorDescriptor {
    /// Rotor name.
    pub name: String,
    /// Rotor type.
    pub kind: DescriptorKind,
    /// Wiring read so far.
    pub permutation: Permutation,
}

impl RotorDescriptor {
    /// Builds the rotor once its wiring is complete.
    ///
    /// # Errors
    /// [`EnigmaError::NotADerangement`] for a reflector with a fixed point,
    /// [`EnigmaError::NotInAlphabet`] for a notch outside the alphabet.
    pub fn into_rotor(self) -> Result<Rotor, EnigmaError> {
        debug!(name = %self.name, wiring = %self.permutation, "rotor read");
        match self.kind {
            DescriptorKind::Reflector => Rotor::reflector(&self.name, self.permutation),
            DescriptorKind::Fixed => Ok(Rotor::fixed(&self.name, self.permutation)),
            DescriptorKind::Moving(notches) => {
                Rotor::moving(&self.name, self.permutation, &notches)
            }
        }
    }
}

/// Parses one `NAME TYPE [CYCLES]` rotor descriptor line.
///
/// # Errors
/// [`EnigmaError::InvalidRotorDescriptor`] if the name or type is missing or
/// the type is not `R`, `N` or `M<notches>`; permutation errors for the cycles.
pub fn parse_rotor_descriptor(
    line: &str,
    alphabet: &Arc<Alphabet>,
) -> Result<RotorDescriptor, EnigmaError> {
    let invalid = |why: &str| {
        EnigmaError::InvalidRotorDescriptor(format!("{} in \"{}\"", why, line.trim()))
    };
    let trimmed = line.trim();
    let (name, rest) = trimmed
        .split_once(char::is_whitespace)
        .ok_or_else(|| invalid("missing rotor type"))?;
    let rest = rest.trim_start();
    let (type_code, cycles) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));

    let mut code = type_code.chars();
    let kind = match (code.next(), code.as_str()) {
        (Some('R'), "") => DescriptorKind::Reflector,
        (Some('N'), "") => DescriptorKind::Fixed,
        (Some('M'), "") => return Err(invalid("moving rotor without notches")),
        (Some('M'), notches) => DescriptorKind::Moving(notches.to_string()),
        _ => return Err(invalid("unknown rotor type")),
    };

    Ok(RotorDescriptor {
        name: name.to_string(),
        kind,
        permutation: Permutation::new(cycles, Arc::clone(alphabet))?,
    })
}

/// A parsed `* REFLECTOR ROTOR... SETTINGS [PLUGBOARD]` setup line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupLine {
    /// Rotor names, reflector first.
    pub rotors: Vec<String>,
    /// Initial positions, leftmost non-reflector rotor first.
    pub setting: String,
    /// Plugboard cycles; empty for no plugs.
    pub plugboard: String,
}

impl SetupLine {
    /// Parses `line` for a machine with `num_rotors` slots.
    ///
    /// # Errors
    /// - [`EnigmaError::MalformedSetup`] if the line does not start with `*`.
    /// - [`EnigmaError::WrongRotorCount`] if fewer than `num_rotors` names are given.
    /// - [`EnigmaError::SettingLength`] if the setting string is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::config::SetupLine;
    ///
    /// let setup = SetupLine::parse("* B Beta III IV I AXLE (HQ) (EX)", 5).unwrap();
    /// assert_eq!(setup.rotors, vec!["B", "Beta", "III", "IV", "I"]);
    /// assert_eq!(setup.setting, "AXLE");
    /// assert_eq!(setup.plugboard, "(HQ) (EX)");
    /// ```
    pub fn parse(line: &str, num_rotors: usize) -> Result<Self, EnigmaError> {
        let body = line.trim_start().strip_prefix('*').ok_or_else(|| {
            EnigmaError::MalformedSetup(format!("\"{}\" must start with '*'", line.trim()))
        })?;
        let tokens: Vec<&str> = body.split_whitespace().collect();

        if tokens.len() < num_rotors {
            return Err(EnigmaError::WrongRotorCount {
                expected: num_rotors,
                found: tokens.len(),
            });
        }
        let setting = tokens
            .get(num_rotors)
            .ok_or(EnigmaError::SettingLength {
                expected: num_rotors.saturating_sub(1),
                found: 0,
            })?;

        Ok(SetupLine {
            rotors: tokens[..num_rotors].iter().map(|s| s.to_string()).collect(),
            setting: setting.to_string(),
            plugboard: tokens[num_rotors + 1..].join(" "),
        })
    }
}
