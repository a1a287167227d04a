//! Session: drives a machine over a message stream.
//!
//! Lines starting with `*` reconfigure the machine; every other line is a
//! message whose conversion is emitted in groups of five symbols.

use tracing::{debug, info};

use crate::config::{read_config, SetupLine};
use crate::error::EnigmaError;
use crate::machine::Machine;
use crate::utils::grouping::group_by_five;

/// A machine together with the state of the message stream feeding it.
#[derive(Debug, Clone)]
pub struct Session {
    machine: Machine,
    line_number: usize,
    configured: bool,
}

impl Session {
    /// Wraps `machine`. A setup line must be processed before any message.
    pub fn new(machine: Machine) -> Self {
        Session {
            machine,
            line_number: 0,
            configured: false,
        }
    }

    /// Builds a session from configuration text.
    ///
    /// # Errors
    /// Any error of [`read_config`].
    pub fn from_config(config: &str) -> Result<Self, EnigmaError> {
        Ok(Self::new(read_config(config)?))
    }

    /// Returns the machine being driven.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Processes one input line.
    ///
    /// # Returns
    /// `None` for a setup line, `Some(output)` for a message line.
    ///
    /// # Errors
    /// - [`EnigmaError::MessageBeforeSetup`] for a message before any setup line.
    /// - Any setup or conversion error of [`Machine`].
    ///
    /// # Examples
    ///
    /// ```
    /// use enigma::Session;
    ///
    /// let mut session = Session::from_config("ABCD\n3 0\nREF R (AB)(CD)\nF1 N\nF2 N (AC)\n").unwrap();
    /// assert_eq!(session.process_line("* REF F1 F2 AA").unwrap(), None);
    /// assert_eq!(session.process_line("aabd").unwrap(), Some("DDCA".to_string()));
    /// ```
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>, EnigmaError> {
        self.line_number += 1;
        if line.trim_start().starts_with('*') {
            let setup = SetupLine::parse(line, self.machine.num_rotors())?;
            self.machine.apply_setup(&setup)?;
            self.configured = true;
            info!(
                line = self.line_number,
                rotors = ?setup.rotors,
                setting = %setup.setting,
                "machine set up"
            );
            return Ok(None);
        }
        if !self.configured {
            return Err(EnigmaError::MessageBeforeSetup(self.line_number));
        }
        let converted = self.machine.convert(line)?;
        debug!(line = self.line_number, symbols = converted.len(), "message converted");
        Ok(Some(group_by_five(&converted)))
    }

    /// Processes every line of `input`, returning one output line per
    /// message line, each terminated by a newline.
    ///
    /// # Errors
    /// The first error of [`process_line`](Self::process_line); no partial
    /// output is returned.
    pub fn process(&mut self, input: &str) -> Result<String, EnigmaError> {
        let mut output = String::with_capacity(input.len() + input.len() / 5);
        for line in input.lines() {
            if let Some(converted) = self.process_line(line)? {
                output.push_str(&converted);
                output.push('\n');
            }
        }
        Ok(output)
    }
}
