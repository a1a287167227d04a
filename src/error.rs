//! Error types for the Enigma simulator.

use thiserror::Error;

/// Errors produced while configuring or running an Enigma machine.
///
/// Every failure, whether it comes from the configuration text, a setup
/// line or the core lookup tables, is reported through this one type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnigmaError {
    /// The alphabet string has no symbols.
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,
    /// The alphabet string contains whitespace.
    #[error("Alphabet may not contain whitespace")]
    AlphabetWhitespace,
    /// A symbol occurs more than once in the alphabet string.
    #[error("Duplicate symbol '{0}' in alphabet")]
    DuplicateSymbol(char),
    /// An index is outside `[0, size)`.
    #[error("Alphabet index {index} is out of range for size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// A symbol is not a member of the alphabet.
    #[error("Character '{0}' is not in the alphabet")]
    NotInAlphabet(char),
    /// Cycle text is not a sequence of parenthesized symbol runs.
    #[error("Malformed cycle notation: {0}")]
    MalformedCycles(String),
    /// A symbol appears in more than one cycle.
    #[error("Symbol '{0}' appears in more than one cycle")]
    OverlappingCycles(char),
    /// A reflector's wiring maps some symbol to itself.
    #[error("Reflector {0} wiring is not a derangement")]
    NotADerangement(String),
    /// A reflector was asked to rotate away from position 0.
    #[error("Reflector {0} can only be set to position 0")]
    ReflectorSetting(String),
    /// The rotor descriptor could not be parsed.
    #[error("Invalid rotor description: {0}")]
    InvalidRotorDescriptor(String),
    /// A setup line did not have the `* ROTORS... SETTING [PLUGBOARD]` shape.
    #[error("Malformed setup line: {0}")]
    MalformedSetup(String),
    /// The configuration text ended before it was complete.
    #[error("Truncated configuration: {0}")]
    TruncatedConfig(String),
    /// The rotor and pawl counts line could not be read.
    #[error("Expected rotor and pawl counts, found \"{0}\"")]
    MalformedCounts(String),
    /// Slot and pawl counts are inconsistent.
    #[error("Invalid rotor counts: {num_rotors} slots and {num_pawls} pawls")]
    InvalidRotorCounts { num_rotors: usize, num_pawls: usize },
    /// A rotor name was declared twice in the configuration.
    #[error("Duplicate rotor {0}")]
    DuplicateRotor(String),
    /// A rotor name is not in the catalog.
    #[error("Unknown rotor {0}")]
    UnknownRotor(String),
    /// The setup named the wrong number of rotors.
    #[error("Expected {expected} rotors, found {found}")]
    WrongRotorCount { expected: usize, found: usize },
    /// Slot 0 does not hold a reflector.
    #[error("Rotor {0} in slot 0 is not a reflector")]
    MissingReflector(String),
    /// A reflector was placed outside slot 0.
    #[error("Reflector {name} placed in slot {slot}")]
    MisplacedReflector { name: String, slot: usize },
    /// The number of rotating rotors differs from the number of pawls.
    #[error("Machine has {expected} pawls but {found} rotating rotors")]
    PawlMismatch { expected: usize, found: usize },
    /// The setting string has the wrong length.
    #[error("Setting string must have {expected} symbols, found {found}")]
    SettingLength { expected: usize, found: usize },
    /// A permutation was built against a different alphabet than the machine.
    #[error("Permutation alphabet does not match the machine alphabet")]
    AlphabetMismatch,
    /// Conversion was attempted before any rotors were inserted.
    #[error("No rotors have been inserted")]
    RotorsNotInserted,
    /// A message line was found before the first setup line.
    #[error("Message on line {0} precedes any setup line")]
    MessageBeforeSetup(usize),
}
