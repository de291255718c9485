//! This module defines the core data structures shared by the cellular
//! automaton engine, the Turing machine engine, and the compiler that bridges
//! them: cell values, head moves, default policies, halt verdicts, and error
//! types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// The reserved terminal state a Turing machine enters when no transition is
/// defined for the current (state, symbol) pair.
pub const REJECT_STATE: &str = "REJECT";
/// The default blank symbol for tape cells outside the materialized range.
pub const DEFAULT_BLANK_SYMBOL: &str = "-";
/// The default step budget for bounded cellular automaton runs.
pub const DEFAULT_MAX_STEPS: usize = 1000;
/// The maximum number of steps a Turing machine run may execute.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// A single value held by a cellular automaton cell.
///
/// Plain symbols cover ordinary automata loaded from rule files. The marked,
/// fused (head) and boundary variants form the alphabet the compiler encodes
/// Turing machine configurations into: a marked cell is a tape symbol the
/// head is not on, a head cell carries both the machine state and the symbol
/// under the head, and the boundary sentinel marks the edge of the
/// materialized tape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellValue {
    /// A plain symbol token.
    Symbol(String),
    /// A known tape symbol, head absent. Rendered as `*<symbol>`.
    Marked(String),
    /// The head is on this cell, in the given state, over the given symbol.
    /// Rendered as `<state>@<symbol>`.
    Head(String, String),
    /// The tape-end sentinel. Rendered as `#`.
    Boundary,
}

impl CellValue {
    /// Returns the tape symbol this cell carries, if any. The boundary
    /// sentinel carries none.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            CellValue::Symbol(s) | CellValue::Marked(s) => Some(s),
            CellValue::Head(_, s) => Some(s),
            CellValue::Boundary => None,
        }
    }

    /// Returns `true` if this cell is a fused head value.
    pub fn is_head(&self) -> bool {
        matches!(self, CellValue::Head(_, _))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Symbol(s) => write!(f, "{}", s),
            CellValue::Marked(s) => write!(f, "*{}", s),
            CellValue::Head(state, symbol) => write!(f, "{}@{}", state, symbol),
            CellValue::Boundary => write!(f, "#"),
        }
    }
}

impl FromStr for CellValue {
    type Err = SimulatorError;

    /// Parses a cell token: `#` is the boundary sentinel, `*sym` a marked
    /// symbol, `state@sym` a fused head value, and anything else a plain
    /// symbol.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.is_empty() {
            return Err(SimulatorError::ValidationError(
                "Empty cell token".to_string(),
            ));
        }

        if token == "#" {
            return Ok(CellValue::Boundary);
        }

        if let Some(symbol) = token.strip_prefix('*') {
            if symbol.is_empty() {
                return Err(SimulatorError::ValidationError(format!(
                    "Marked cell token '{}' has no symbol",
                    token
                )));
            }
            return Ok(CellValue::Marked(symbol.to_string()));
        }

        if let Some((state, symbol)) = token.split_once('@') {
            if state.is_empty() || symbol.is_empty() {
                return Err(SimulatorError::ValidationError(format!(
                    "Head cell token '{}' must be '<state>@<symbol>'",
                    token
                )));
            }
            return Ok(CellValue::Head(state.to_string(), symbol.to_string()));
        }

        Ok(CellValue::Symbol(token.to_string()))
    }
}

/// A 3-cell rule window: (left, center, right).
pub type Window = (CellValue, CellValue, CellValue);

/// Renders a window the way rule files spell it: `l,c,r`.
pub fn format_window(window: &Window) -> String {
    format!("{},{},{}", window.0, window.1, window.2)
}

/// Represents the possible directions a Turing machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Move {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Move::Left => 'L',
            Move::Right => 'R',
            Move::Stay => 'S',
        };
        write!(f, "{}", c)
    }
}

/// The result half of a Turing machine transition: what to write, where to
/// move, and which state to enter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmTransition {
    /// The symbol written over the cell under the head.
    pub write: String,
    /// The head movement applied after writing.
    pub movement: Move,
    /// The state the machine transitions to.
    pub next_state: String,
}

/// How a rule table resolves a lookup miss.
///
/// Exactly one policy is attached to each table at construction; it is part
/// of the table's contract rather than an implicit constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultPolicy {
    /// A missing window leaves the center cell unchanged.
    Identity,
    /// A missing window yields this fixed value.
    Fixed(CellValue),
}

/// The outcome of a single cellular automaton step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaStep {
    /// Whether any cell changed value during this step.
    pub changed: bool,
    /// The windows that matched an explicit rule entry during this step.
    pub used_rules: Vec<Window>,
}

/// Why a bounded cellular automaton run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaHalt {
    /// The watched window was used during the given step.
    TransitionHit { window: Window, step: usize },
    /// No cell changed during the given step.
    Stable { step: usize },
    /// The step budget ran out before any stop condition held.
    StepBudget,
}

/// The verdict of a Turing machine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TmHalt {
    /// The machine reached an accept state.
    Accept,
    /// The machine reached the reject sentinel state.
    Reject,
    /// The step budget ran out before the machine became terminal.
    StepBudget,
}

/// Represents the outcome of a single Turing machine step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmStep {
    /// The machine performed a step and can continue.
    Continue,
    /// The machine is terminal.
    Halted(TmHalt),
}

/// Represents various errors that can occur while loading or running
/// simulations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulatorError {
    /// Indicates a syntax error in a rule or machine description file.
    #[error("Parse error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structurally invalid table or machine description.
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates a cell value outside the declared alphabet. Distinct from an
    /// ordinary rule miss, which resolves via the default policy.
    #[error("Cell value '{0}' is outside the declared alphabet")]
    AlphabetViolation(String),
}
