//! This module provides functions for analyzing parsed Turing machine
//! descriptions to detect common errors before execution or compilation:
//! missing transitions, an empty accept set, misuse of the reserved reject
//! state, and unreachable accept states.

use crate::machine::TuringMachine;
use crate::types::{SimulatorError, REJECT_STATE};
use std::collections::HashSet;

/// Represents various errors that can be found during the analysis of a
/// Turing machine description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The description defines no transitions at all.
    NoTransitions,
    /// The description declares no accept states, so no run can accept.
    EmptyAcceptSet,
    /// The reserved `REJECT` state is used as a source or accept state.
    ReservedState(String),
    /// Accept states that no transition ever enters.
    UnreachableAcceptStates(Vec<String>),
    /// Accept states with outgoing transitions, which can never fire.
    AcceptStateHasTransitions(Vec<String>),
}

impl From<AnalysisError> for SimulatorError {
    /// Converts an `AnalysisError` into a `SimulatorError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::NoTransitions => {
                SimulatorError::ValidationError("Machine has no transitions".to_string())
            }
            AnalysisError::EmptyAcceptSet => {
                SimulatorError::ValidationError("Machine declares no accept states".to_string())
            }
            AnalysisError::ReservedState(usage) => SimulatorError::ValidationError(format!(
                "The state name '{}' is reserved: {}",
                REJECT_STATE, usage
            )),
            AnalysisError::UnreachableAcceptStates(states) => SimulatorError::ValidationError(
                format!("Accept states never entered by any transition: {:?}", states),
            ),
            AnalysisError::AcceptStateHasTransitions(states) => SimulatorError::ValidationError(
                format!("Accept states with outgoing transitions: {:?}", states),
            ),
        }
    }
}

/// Analyzes a parsed Turing machine for structural and logical errors.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(SimulatorError::ValidationError)` if any validation rule is violated.
pub fn analyze(machine: &TuringMachine) -> Result<(), SimulatorError> {
    let errors = [
        check_transitions,
        check_accept_set,
        check_reserved_state,
        check_accept_reachability,
        check_accept_sources,
    ]
    .iter()
    .filter_map(|f| f(machine).err())
    .collect::<Vec<_>>();

    // Return the first error
    if let Some(first_error) = errors.first() {
        return Err(first_error.clone().into());
    }

    Ok(())
}

/// Checks that the machine defines at least one transition.
fn check_transitions(machine: &TuringMachine) -> Result<(), AnalysisError> {
    if machine.transitions().is_empty() {
        return Err(AnalysisError::NoTransitions);
    }
    Ok(())
}

/// Checks that the machine declares at least one accept state.
fn check_accept_set(machine: &TuringMachine) -> Result<(), AnalysisError> {
    if machine.accept_states().is_empty() {
        return Err(AnalysisError::EmptyAcceptSet);
    }
    Ok(())
}

/// Checks that the reserved `REJECT` sentinel is not declared as a source
/// state or an accept state. Transitioning into it explicitly is allowed.
fn check_reserved_state(machine: &TuringMachine) -> Result<(), AnalysisError> {
    if machine
        .transitions()
        .keys()
        .any(|(state, _)| state == REJECT_STATE)
    {
        return Err(AnalysisError::ReservedState(
            "it cannot be a transition source".to_string(),
        ));
    }

    if machine.is_accepting(REJECT_STATE) {
        return Err(AnalysisError::ReservedState(
            "it cannot be an accept state".to_string(),
        ));
    }

    Ok(())
}

/// Checks that every accept state is the target of at least one transition.
fn check_accept_reachability(machine: &TuringMachine) -> Result<(), AnalysisError> {
    let targets: HashSet<&str> = machine
        .transitions()
        .values()
        .map(|t| t.next_state.as_str())
        .collect();

    let mut unreachable: Vec<String> = machine
        .accept_states()
        .iter()
        .filter(|state| !targets.contains(state.as_str()))
        .cloned()
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort();
        return Err(AnalysisError::UnreachableAcceptStates(unreachable));
    }

    Ok(())
}

/// Checks that no accept state has outgoing transitions; a run stops as soon
/// as it enters an accept state, so such transitions are dead.
fn check_accept_sources(machine: &TuringMachine) -> Result<(), AnalysisError> {
    let mut offenders: Vec<String> = machine
        .transitions()
        .keys()
        .filter(|(state, _)| machine.is_accepting(state))
        .map(|(state, _)| state.clone())
        .collect();

    if !offenders.is_empty() {
        offenders.sort();
        offenders.dedup();
        return Err(AnalysisError::AcceptStateHasTransitions(offenders));
    }

    Ok(())
}
