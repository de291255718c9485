//! This module defines the cellular automaton engine: an immutable `RuleTable`
//! mapping 3-cell windows to next values, and `CaConfiguration`, the
//! dynamically-growing row of cells that advances under such a table.

use crate::types::{
    CaHalt, CaStep, CellValue, DefaultPolicy, SimulatorError, Window, DEFAULT_MAX_STEPS,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// An immutable mapping from a 3-cell window to the next value of the center
/// cell, with an explicit default policy for lookup misses.
///
/// A table may optionally declare its cell alphabet; the stepper then treats
/// any cell outside it as a fatal configuration error rather than an ordinary
/// rule miss.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    entries: HashMap<Window, CellValue>,
    default_policy: DefaultPolicy,
    alphabet: Option<HashSet<CellValue>>,
}

impl RuleTable {
    /// Creates a rule table from explicit entries and a default policy.
    pub fn new(entries: HashMap<Window, CellValue>, default_policy: DefaultPolicy) -> Self {
        Self {
            entries,
            default_policy,
            alphabet: None,
        }
    }

    /// Declares the cell alphabet this table is defined over, enabling fatal
    /// out-of-alphabet detection during stepping.
    pub fn with_alphabet(mut self, alphabet: HashSet<CellValue>) -> Self {
        self.alphabet = Some(alphabet);
        self
    }

    /// Returns the next value for the given window.
    ///
    /// Pure function of the three inputs and the table's default policy: an
    /// explicit entry wins, otherwise the identity policy returns the center
    /// unchanged and the fixed policy returns its configured value.
    pub fn transition(&self, left: &CellValue, center: &CellValue, right: &CellValue) -> CellValue {
        let key = (left.clone(), center.clone(), right.clone());
        match self.entries.get(&key) {
            Some(next) => next.clone(),
            None => match &self.default_policy {
                DefaultPolicy::Identity => center.clone(),
                DefaultPolicy::Fixed(value) => value.clone(),
            },
        }
    }

    /// Returns `true` if the table holds an explicit entry for this window.
    pub fn contains(&self, window: &Window) -> bool {
        self.entries.contains_key(window)
    }

    /// Returns the number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the default policy attached to this table.
    pub fn default_policy(&self) -> &DefaultPolicy {
        &self.default_policy
    }

    /// Returns the declared alphabet, if any.
    pub fn alphabet(&self) -> Option<&HashSet<CellValue>> {
        self.alphabet.as_ref()
    }

    /// Returns the explicit entries of this table.
    pub fn entries(&self) -> &HashMap<Window, CellValue> {
        &self.entries
    }
}

/// Options controlling a bounded cellular automaton run.
#[derive(Debug, Clone, PartialEq)]
pub struct CaRunOptions {
    /// The maximum number of steps to execute.
    pub max_steps: usize,
    /// Stop early when this window matches an explicit entry during a step.
    pub stop_on_transition: Option<Window>,
    /// Stop early when a step changes no cell.
    pub stop_on_stable: bool,
}

impl Default for CaRunOptions {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            stop_on_transition: None,
            stop_on_stable: false,
        }
    }
}

/// One cellular automaton configuration: a finite row of cells advancing
/// under a shared, read-only rule table.
///
/// The row grows by at most one boundary sentinel per side per step and never
/// keeps more than one sentinel at either edge.
#[derive(Debug, Clone)]
pub struct CaConfiguration {
    cells: Vec<CellValue>,
    rules: Arc<RuleTable>,
    step_count: usize,
}

impl CaConfiguration {
    /// Creates a configuration from an initial row of cells.
    pub fn new(cells: Vec<CellValue>, rules: Arc<RuleTable>) -> Self {
        Self {
            cells,
            rules,
            step_count: 0,
        }
    }

    /// Returns the current row of cells.
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// Returns the rule table driving this configuration.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Returns the number of steps taken so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Renders the configuration as space-separated cell tokens.
    pub fn render(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Advances the configuration by one step.
    ///
    /// The current row is padded with one boundary sentinel per side, every
    /// padded position is rewritten through the rule table (out-of-range
    /// neighbors read as sentinels), and redundant edge sentinels are then
    /// collapsed so at most one remains at each edge.
    pub fn step(&mut self) -> Result<CaStep, SimulatorError> {
        // Two sentinels per side: the outer pair stands in for the
        // out-of-range neighbors of the padded row being rewritten.
        let mut ctx = Vec::with_capacity(self.cells.len() + 4);
        ctx.push(CellValue::Boundary);
        ctx.push(CellValue::Boundary);
        ctx.extend(self.cells.iter().cloned());
        ctx.push(CellValue::Boundary);
        ctx.push(CellValue::Boundary);

        let mut next = Vec::with_capacity(ctx.len() - 2);
        let mut used_rules: Vec<Window> = Vec::new();
        let mut changed = false;

        for i in 1..ctx.len() - 1 {
            let (left, center, right) = (&ctx[i - 1], &ctx[i], &ctx[i + 1]);

            if let Some(alphabet) = &self.rules.alphabet {
                if !alphabet.contains(center) {
                    return Err(SimulatorError::AlphabetViolation(center.to_string()));
                }
            }

            let value = self.rules.transition(left, center, right);

            if value != *center {
                changed = true;
            }

            let window = (left.clone(), center.clone(), right.clone());
            if self.rules.contains(&window) && !used_rules.contains(&window) {
                used_rules.push(window);
            }

            next.push(value);
        }

        // Collapse redundant edge sentinels.
        while next.len() > 2 && next[0] == CellValue::Boundary && next[1] == CellValue::Boundary {
            next.remove(0);
        }
        while next.len() > 2
            && next[next.len() - 1] == CellValue::Boundary
            && next[next.len() - 2] == CellValue::Boundary
        {
            next.pop();
        }

        self.cells = next;
        self.step_count += 1;

        Ok(CaStep {
            changed,
            used_rules,
        })
    }

    /// Runs the configuration for at most `options.max_steps` steps.
    ///
    /// The observer sees every configuration (with its step index) before the
    /// next step is taken. The run stops early when the watched window is
    /// used or, if requested, when a step changes nothing.
    pub fn run<F>(&mut self, options: &CaRunOptions, mut observe: F) -> Result<CaHalt, SimulatorError>
    where
        F: FnMut(usize, &CaConfiguration),
    {
        for step in 0..options.max_steps {
            observe(step, self);

            let outcome = self.step()?;

            if let Some(watched) = &options.stop_on_transition {
                if outcome.used_rules.contains(watched) {
                    return Ok(CaHalt::TransitionHit {
                        window: watched.clone(),
                        step,
                    });
                }
            }

            if options.stop_on_stable && !outcome.changed {
                return Ok(CaHalt::Stable { step });
            }
        }

        Ok(CaHalt::StepBudget)
    }
}
