//! This module provides the `TableLoader` struct, responsible for loading
//! cellular automaton rule files and Turing machine descriptions from files
//! or string content.

use crate::automaton::RuleTable;
use crate::machine::TuringMachine;
use crate::parser::{parse_machine, parse_rule_table};
use crate::types::{DefaultPolicy, SimulatorError};
use std::fs;
use std::path::Path;

/// `TableLoader` is a utility struct for loading the two table formats the
/// simulator understands: rule files for automata and machine descriptions
/// for Turing machines.
pub struct TableLoader;

impl TableLoader {
    /// Loads a cellular automaton rule table from the specified file path.
    ///
    /// The default policy is chosen by the caller; the file format carries
    /// only explicit entries.
    ///
    /// # Returns
    ///
    /// * `Ok(RuleTable)` if the file is successfully read and parsed.
    /// * `Err(SimulatorError::FileError)` if the file cannot be read.
    /// * `Err(SimulatorError::ParseError)` if a data line is malformed.
    pub fn load_rule_table(
        path: &Path,
        policy: DefaultPolicy,
    ) -> Result<RuleTable, SimulatorError> {
        parse_rule_table(&Self::read(path)?, policy)
    }

    /// Loads a cellular automaton rule table from string content.
    pub fn load_rule_table_from_string(
        content: &str,
        policy: DefaultPolicy,
    ) -> Result<RuleTable, SimulatorError> {
        parse_rule_table(content, policy)
    }

    /// Loads a Turing machine description from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the file is successfully read, parsed, and
    ///   validated.
    /// * `Err(SimulatorError::FileError)` if the file cannot be read.
    /// * `Err(SimulatorError::ParseError)` if a line is malformed.
    /// * `Err(SimulatorError::ValidationError)` if the machine fails analysis.
    pub fn load_machine(path: &Path) -> Result<TuringMachine, SimulatorError> {
        parse_machine(&Self::read(path)?)
    }

    /// Loads a Turing machine description from string content.
    pub fn load_machine_from_string(content: &str) -> Result<TuringMachine, SimulatorError> {
        parse_machine(content)
    }

    fn read(path: &Path) -> Result<String, SimulatorError> {
        fs::read_to_string(path).map_err(|e| {
            SimulatorError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })
    }
}
