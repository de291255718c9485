//! This crate provides the core logic for a cellular automaton and Turing
//! machine simulator. It includes modules for parsing rule tables and machine
//! descriptions, simulating their execution, compiling a machine into an
//! equivalent rule table, analyzing machine correctness, and managing a
//! collection of predefined demo programs.

pub mod analyzer;
pub mod automaton;
pub mod compiler;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod simulation;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the rule table and configuration types from the automaton module.
pub use automaton::{CaConfiguration, CaRunOptions, RuleTable};
/// Re-exports the compilation functions from the compiler module.
pub use compiler::{compile, decode_cells, encode_word};
/// Re-exports the `TableLoader` struct from the loader module.
pub use loader::TableLoader;
/// Re-exports the machine and configuration types from the machine module.
pub use machine::{TmConfiguration, TuringMachine};
/// Re-exports the parsing functions from the parser module.
pub use parser::{parse_cells, parse_machine, parse_rule_table, parse_window};
/// Re-exports `DemoProgram`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{DemoKind, DemoProgram, ProgramManager, PROGRAMS};
/// Re-exports the simulation driver and its reports from the simulation module.
pub use simulation::{CaReport, SimulationDriver, TmReport};
/// Re-exports various types related to automaton and machine execution from the types module.
pub use types::{
    CaHalt, CellValue, DefaultPolicy, Move, SimulatorError, TmHalt, DEFAULT_BLANK_SYMBOL,
    DEFAULT_MAX_STEPS, MAX_EXECUTION_STEPS,
};
