//! Enigma: an electromechanical rotor cipher machine simulator.
//!
//! Given a machine configuration (alphabet, rotor wirings, reflectors) and a
//! per-message rotor arrangement, converts text one symbol at a time while
//! stepping the rotors. Encoding and decoding are the same operation: running
//! ciphertext through a machine reset to the same settings restores the
//! plaintext.
//!
//! # Architecture
//!
//! ```text
//! Alphabet     (symbols ↔ indices, shared by every permutation)
//!     ↓
//! Permutation  (disjoint cycles → forward / inverse tables)
//!     ↓
//! Rotor        (reflector | fixed | moving, owned by a RotorCatalog)
//!     ↓
//! Machine      (slots + plugboard, stepping, signal path)
//!     ↓
//! Session      (`*` setup lines, message lines, five-symbol groups)
//! ```
//!
//! # Examples
//!
//! Encode and decode with a configuration read from text:
//!
//! ```
//! use enigma::config::read_config;
//!
//! let config = "\
//! ABCDEFGHIJKLMNOPQRSTUVWXYZ
//! 4 3
//! B R (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
//! I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
//! II ME (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
//! III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
//! ";
//!
//! let mut machine = read_config(config).unwrap();
//! machine.insert_rotors(&["B", "I", "II", "III"]).unwrap();
//! machine.set_rotors("AAA").unwrap();
//! let cipher = machine.convert("Hello world").unwrap();
//!
//! machine.set_rotors("AAA").unwrap();
//! assert_eq!(machine.convert(&cipher).unwrap(), "HELLO WORLD");
//! ```

#![deny(clippy::all)]

pub mod alphabet;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod session;
pub mod utils;

pub use alphabet::Alphabet;
pub use error::EnigmaError;
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorCatalog, RotorId, RotorKind};
pub use session::Session;
