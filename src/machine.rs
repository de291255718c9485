//! This module defines the `TuringMachine` struct, the immutable transition
//! table of a single-tape Turing machine, and `TmConfiguration`, the mutable
//! tape/head/state triple that advances under it.

use crate::types::{Move, TmHalt, TmStep, TmTransition, DEFAULT_BLANK_SYMBOL, REJECT_STATE};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// An immutable single-tape Turing machine description.
///
/// The transition table maps (state, symbol) to (write, move, next state).
/// A lookup miss is not an error: it is the mechanism that drives a running
/// configuration into the reserved `REJECT` state.
#[derive(Debug, Clone, PartialEq)]
pub struct TuringMachine {
    transitions: HashMap<(String, String), TmTransition>,
    initial_state: String,
    accept_states: HashSet<String>,
    blank: String,
}

impl TuringMachine {
    /// Creates a machine from its transition table, initial state, and accept
    /// states, using the default blank symbol.
    pub fn new(
        transitions: HashMap<(String, String), TmTransition>,
        initial_state: String,
        accept_states: HashSet<String>,
    ) -> Self {
        Self {
            transitions,
            initial_state,
            accept_states,
            blank: DEFAULT_BLANK_SYMBOL.to_string(),
        }
    }

    /// Replaces the blank symbol used for uninitialized tape cells.
    pub fn with_blank(mut self, blank: &str) -> Self {
        self.blank = blank.to_string();
        self
    }

    /// Returns the transition for the given state and symbol, if any.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&TmTransition> {
        self.transitions
            .get(&(state.to_string(), symbol.to_string()))
    }

    /// Returns the full transition table.
    pub fn transitions(&self) -> &HashMap<(String, String), TmTransition> {
        &self.transitions
    }

    /// Returns the initial state.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Returns the accept states.
    pub fn accept_states(&self) -> &HashSet<String> {
        &self.accept_states
    }

    /// Returns `true` if the given state is an accept state.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accept_states.contains(state)
    }

    /// Returns the blank symbol.
    pub fn blank(&self) -> &str {
        &self.blank
    }

    /// Returns the tape alphabet: every symbol read or written by some
    /// transition, plus the blank.
    pub fn tape_alphabet(&self) -> HashSet<String> {
        let mut alphabet = HashSet::new();
        alphabet.insert(self.blank.clone());
        for ((_, read), transition) in &self.transitions {
            alphabet.insert(read.clone());
            alphabet.insert(transition.write.clone());
        }
        alphabet
    }
}

/// One Turing machine configuration: tape, head index, and current state,
/// advancing under a shared, read-only machine description.
///
/// The tape grows with blank cells whenever the head leaves the materialized
/// range; the head index therefore always stays in bounds after a step.
#[derive(Debug, Clone)]
pub struct TmConfiguration {
    tape: Vec<String>,
    head: usize,
    state: String,
    machine: Arc<TuringMachine>,
    step_count: usize,
}

impl TmConfiguration {
    /// Creates a configuration over the given word, head at position 0, in
    /// the machine's initial state.
    pub fn new(word: Vec<String>, machine: Arc<TuringMachine>) -> Self {
        Self {
            tape: word,
            head: 0,
            state: machine.initial_state().to_string(),
            machine,
            step_count: 0,
        }
    }

    /// Creates a configuration from a plain text word, one symbol per
    /// character.
    pub fn from_text(word: &str, machine: Arc<TuringMachine>) -> Self {
        Self::new(word.chars().map(|c| c.to_string()).collect(), machine)
    }

    /// Moves the initial head position. Positions beyond the word are read as
    /// blanks until written.
    pub fn with_head(mut self, head: usize) -> Self {
        self.head = head;
        self
    }

    /// Returns the tape contents.
    pub fn tape(&self) -> &[String] {
        &self.tape
    }

    /// Returns the head index.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the number of steps taken so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the machine driving this configuration.
    pub fn machine(&self) -> &TuringMachine {
        &self.machine
    }

    /// Returns the verdict if the configuration is terminal.
    pub fn verdict(&self) -> Option<TmHalt> {
        if self.state == REJECT_STATE {
            Some(TmHalt::Reject)
        } else if self.machine.is_accepting(&self.state) {
            Some(TmHalt::Accept)
        } else {
            None
        }
    }

    /// Returns `true` if the state is `REJECT` or an accept state.
    pub fn is_terminal(&self) -> bool {
        self.verdict().is_some()
    }

    /// Performs one transition of the machine.
    ///
    /// Reads the symbol under the head (the blank when the head is outside
    /// the materialized range), looks it up in the transition table, and on a
    /// hit writes the new symbol, moves the head (growing the tape at the
    /// edge the head now exceeds), and enters the new state. A lookup miss
    /// drives the configuration into the `REJECT` state.
    pub fn step(&mut self) -> TmStep {
        if let Some(verdict) = self.verdict() {
            return TmStep::Halted(verdict);
        }

        let symbol = self
            .tape
            .get(self.head)
            .cloned()
            .unwrap_or_else(|| self.machine.blank().to_string());

        let transition = match self.machine.transition(&self.state, &symbol) {
            Some(t) => t.clone(),
            None => {
                self.state = REJECT_STATE.to_string();
                self.step_count += 1;
                return TmStep::Halted(TmHalt::Reject);
            }
        };

        // Materialize the cell under the head before writing
        if self.head >= self.tape.len() {
            self.tape
                .resize(self.head + 1, self.machine.blank().to_string());
        }
        self.tape[self.head] = transition.write;

        match transition.movement {
            Move::Left => {
                if self.head == 0 {
                    // Extend tape to the left
                    self.tape.insert(0, self.machine.blank().to_string());
                } else {
                    self.head -= 1;
                }
            }
            Move::Right => {
                self.head += 1;
                if self.head >= self.tape.len() {
                    self.tape.push(self.machine.blank().to_string());
                }
            }
            Move::Stay => {
                // Head position remains unchanged
            }
        }

        self.state = transition.next_state;
        self.step_count += 1;

        TmStep::Continue
    }

    /// Runs the configuration until it is terminal or the step budget runs
    /// out. The observer sees the initial configuration and every
    /// configuration a step produces, including the final one.
    pub fn run<F>(&mut self, max_steps: usize, mut observe: F) -> TmHalt
    where
        F: FnMut(&TmConfiguration),
    {
        observe(self);

        for _ in 0..max_steps {
            if let Some(verdict) = self.verdict() {
                return verdict;
            }

            if let TmStep::Halted(verdict) = self.step() {
                observe(self);
                return verdict;
            }

            observe(self);
        }

        self.verdict().unwrap_or(TmHalt::StepBudget)
    }

    /// Renders the configuration as three lines: the tape row, a caret under
    /// the head, and the current state.
    pub fn render(&self) -> String {
        let tape: String = self.tape.concat();
        let offset: usize = self.tape.iter().take(self.head).map(|s| s.len()).sum();
        format!(
            "Tape: {}\n      {}^\nState: {}",
            tape,
            " ".repeat(offset),
            self.state
        )
    }
}
