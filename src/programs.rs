//! Embedded demo programs.
//!
//! A small set of rule tables and machine descriptions ships inside the
//! binary so the simulator is usable without any files on disk. The
//! registry is filled lazily on first access.

use crate::automaton::RuleTable;
use crate::machine::TuringMachine;
use crate::parser;
use crate::types::{DefaultPolicy, SimulatorError};
use std::sync::RwLock;

/// What kind of description a demo program holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    /// A cellular automaton rule table.
    Automaton,
    /// A Turing machine description.
    Machine,
}

/// One embedded demo program.
#[derive(Debug, Clone, Copy)]
pub struct DemoProgram {
    pub name: &'static str,
    pub kind: DemoKind,
    pub text: &'static str,
}

// Default embedded programs
const DEMO_PROGRAMS: [DemoProgram; 3] = [
    DemoProgram {
        name: "flip",
        kind: DemoKind::Machine,
        text: include_str!("../programs/flip.tm"),
    },
    DemoProgram {
        name: "increment",
        kind: DemoKind::Machine,
        text: include_str!("../programs/increment.tm"),
    },
    DemoProgram {
        name: "zero",
        kind: DemoKind::Automaton,
        text: include_str!("../programs/zero.ca"),
    },
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<DemoProgram>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Fill the registry with the embedded demo programs.
    pub fn load() -> Result<(), SimulatorError> {
        if let Ok(mut write_guard) = PROGRAMS.write() {
            *write_guard = DEMO_PROGRAMS.to_vec();
        } else {
            return Err(SimulatorError::FileError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// List all demo program names.
    pub fn names() -> Vec<&'static str> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| programs.iter().map(|program| program.name).collect())
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get a demo program by its name.
    pub fn find(name: &str) -> Result<DemoProgram, SimulatorError> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| SimulatorError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name == name)
            .copied()
            .ok_or_else(|| {
                SimulatorError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// Parse a demo program as a Turing machine.
    pub fn machine(name: &str) -> Result<TuringMachine, SimulatorError> {
        let program = Self::find(name)?;

        if program.kind != DemoKind::Machine {
            return Err(SimulatorError::ValidationError(format!(
                "Program '{}' is not a machine description",
                name
            )));
        }

        parser::parse_machine(program.text)
    }

    /// Parse a demo program as a rule table.
    pub fn rule_table(name: &str, policy: DefaultPolicy) -> Result<RuleTable, SimulatorError> {
        let program = Self::find(name)?;

        if program.kind != DemoKind::Automaton {
            return Err(SimulatorError::ValidationError(format!(
                "Program '{}' is not a rule table",
                name
            )));
        }

        parser::parse_rule_table(program.text, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TmConfiguration;
    use crate::types::TmHalt;
    use std::sync::Arc;

    #[test]
    fn test_names_lists_all_demos() {
        let names = ProgramManager::names();
        assert!(names.contains(&"flip"));
        assert!(names.contains(&"increment"));
        assert!(names.contains(&"zero"));
    }

    #[test]
    fn test_all_demos_parse() {
        for name in ProgramManager::names() {
            let program = ProgramManager::find(name).unwrap();
            match program.kind {
                DemoKind::Machine => {
                    assert!(
                        ProgramManager::machine(name).is_ok(),
                        "Machine '{}' failed to parse",
                        name
                    );
                }
                DemoKind::Automaton => {
                    assert!(
                        ProgramManager::rule_table(name, DefaultPolicy::Identity).is_ok(),
                        "Rule table '{}' failed to parse",
                        name
                    );
                }
            }
        }
    }

    #[test]
    fn test_find_unknown_name() {
        assert!(ProgramManager::find("nonexistent").is_err());
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        assert!(ProgramManager::machine("zero").is_err());
        assert!(ProgramManager::rule_table("flip", DefaultPolicy::Identity).is_err());
    }

    #[test]
    fn test_increment_demo_increments() {
        let machine = Arc::new(ProgramManager::machine("increment").unwrap());
        let mut config = TmConfiguration::from_text("11", machine);

        let verdict = config.run(100, |_| {});

        assert_eq!(verdict, TmHalt::Accept);
        assert_eq!(config.tape(), &["1", "0", "0", "-"]);
    }
}
