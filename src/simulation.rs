//! This module defines the `SimulationDriver`, which runs cellular automaton
//! and Turing machine configurations to completion and collects step-by-step
//! textual traces alongside the final verdict.
//!
//! The two engines never call each other: a paired run simply compiles the
//! machine once, then drives each configuration to its own stop condition.

use crate::automaton::{CaConfiguration, CaRunOptions};
use crate::compiler::{compile, encode_word};
use crate::machine::{TmConfiguration, TuringMachine};
use crate::types::{
    format_window, CaHalt, CellValue, SimulatorError, TmHalt, MAX_EXECUTION_STEPS,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The trace and outcome of a bounded cellular automaton run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaReport {
    /// One rendered line per observed configuration, plus a final line
    /// naming the stop reason.
    pub trace: Vec<String>,
    /// Why the run stopped.
    pub halt: CaHalt,
    /// The number of steps taken.
    pub steps: usize,
    /// The final configuration.
    pub cells: Vec<CellValue>,
}

/// The trace and outcome of a Turing machine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmReport {
    /// One rendered configuration per observed step, plus a final line
    /// naming the verdict.
    pub trace: Vec<String>,
    /// The run's verdict.
    pub verdict: TmHalt,
    /// The number of steps taken.
    pub steps: usize,
    /// The final tape contents.
    pub tape: Vec<String>,
}

/// `SimulationDriver` runs configurations for a bounded number of steps
/// under stop conditions and exposes their step traces.
pub struct SimulationDriver;

impl SimulationDriver {
    /// Runs a cellular automaton configuration under the given options,
    /// recording every configuration before the next step is taken.
    pub fn run_automaton(
        config: &mut CaConfiguration,
        options: &CaRunOptions,
    ) -> Result<CaReport, SimulatorError> {
        let mut trace = Vec::new();
        let halt = config.run(options, |step, c| {
            trace.push(format!("Step {}: {}", step, c.render()));
        })?;

        trace.push(match &halt {
            CaHalt::TransitionHit { window, step } => format!(
                "Stopped: transition {} used at step {}",
                format_window(window),
                step
            ),
            CaHalt::Stable { step } => {
                format!("Stopped: configuration stable at step {}", step)
            }
            CaHalt::StepBudget => "Stopped: step budget exhausted".to_string(),
        });

        Ok(CaReport {
            trace,
            halt,
            steps: config.step_count(),
            cells: config.cells().to_vec(),
        })
    }

    /// Runs a Turing machine configuration until it is terminal or the step
    /// budget runs out, recording every configuration.
    pub fn run_machine(config: &mut TmConfiguration, max_steps: usize) -> TmReport {
        let mut trace = Vec::new();
        let verdict = config.run(max_steps, |c| trace.push(c.render()));

        trace.push(match verdict {
            TmHalt::Accept => "Result: ACCEPT".to_string(),
            TmHalt::Reject => "Result: REJECT".to_string(),
            TmHalt::StepBudget => "Result: step budget exhausted".to_string(),
        });

        TmReport {
            trace,
            verdict,
            steps: config.step_count(),
            tape: config.tape().to_vec(),
        }
    }

    /// Compiles the machine, then runs the machine and the compiled
    /// automaton independently on the same word.
    ///
    /// Neither run synchronizes with the other; each stops on its own
    /// condition. The automaton run stops on stability if the options do not
    /// say otherwise.
    pub fn run_compiled(
        machine: Arc<TuringMachine>,
        word: &[String],
        options: &CaRunOptions,
    ) -> Result<(TmReport, CaReport), SimulatorError> {
        let rules = Arc::new(compile(&machine));

        let mut tm = TmConfiguration::new(word.to_vec(), machine.clone());
        let tm_report = Self::run_machine(&mut tm, MAX_EXECUTION_STEPS);

        let mut ca = CaConfiguration::new(encode_word(&machine, word), rules);
        let ca_report = Self::run_automaton(&mut ca, options)?;

        Ok((tm_report, ca_report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::tests::flip_machine;
    use crate::types::DefaultPolicy;
    use crate::RuleTable;
    use std::collections::HashMap;

    fn sym(s: &str) -> CellValue {
        CellValue::Symbol(s.to_string())
    }

    #[test]
    fn test_ca_report_names_stop_reason() {
        let mut entries = HashMap::new();
        entries.insert((sym("0"), sym("0"), sym("0")), sym("0"));
        let rules = Arc::new(RuleTable::new(entries, DefaultPolicy::Identity));

        let mut config = CaConfiguration::new(vec![sym("1"), sym("0"), sym("0")], rules);
        let options = CaRunOptions {
            max_steps: 5,
            stop_on_stable: true,
            ..Default::default()
        };

        let report = SimulationDriver::run_automaton(&mut config, &options).unwrap();

        assert_eq!(report.halt, CaHalt::Stable { step: 0 });
        assert_eq!(report.trace.first().unwrap(), "Step 0: 1 0 0");
        assert_eq!(
            report.trace.last().unwrap(),
            "Stopped: configuration stable at step 0"
        );
    }

    #[test]
    fn test_tm_report_accept() {
        let machine = Arc::new(flip_machine());
        let mut config = TmConfiguration::from_text("01", machine);

        let report = SimulationDriver::run_machine(&mut config, 100);

        assert_eq!(report.verdict, TmHalt::Accept);
        assert_eq!(report.tape, vec!["1", "1"]);
        assert_eq!(report.trace.last().unwrap(), "Result: ACCEPT");
        // Initial configuration plus one line per step, plus the verdict.
        assert_eq!(report.trace.len(), report.steps + 2);
    }

    #[test]
    fn test_tm_report_reject() {
        let machine = Arc::new(flip_machine());
        let mut config = TmConfiguration::from_text("00", machine);

        let report = SimulationDriver::run_machine(&mut config, 100);

        assert_eq!(report.verdict, TmHalt::Reject);
        assert_eq!(report.trace.last().unwrap(), "Result: REJECT");
    }

    #[test]
    fn test_paired_run_is_independent_and_agrees() {
        let machine = Arc::new(flip_machine());
        let word: Vec<String> = vec!["0".to_string(), "1".to_string()];
        let options = CaRunOptions {
            max_steps: 100,
            stop_on_stable: true,
            ..Default::default()
        };

        let (tm_report, ca_report) =
            SimulationDriver::run_compiled(machine, &word, &options).unwrap();

        assert_eq!(tm_report.verdict, TmHalt::Accept);
        assert!(matches!(ca_report.halt, CaHalt::Stable { .. }));
        assert_eq!(
            crate::compiler::decode_cells(&ca_report.cells),
            tm_report.tape
        );
    }

    #[test]
    fn test_report_serializes() {
        let machine = Arc::new(flip_machine());
        let mut config = TmConfiguration::from_text("01", machine);
        let report = SimulationDriver::run_machine(&mut config, 100);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"verdict\":\"Accept\""));
    }
}
