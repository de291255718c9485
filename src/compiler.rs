//! This module compiles a Turing machine description into a cellular
//! automaton rule table whose local dynamics reproduce the machine's global
//! step behavior, along with the word encoding/decoding between the two
//! representations.
//!
//! The encoding fuses head position and machine state into cell values: a
//! cell is either a marked symbol (head absent), a head value (state plus the
//! symbol under the head), or the boundary sentinel. Because a rule only sees
//! three adjacent cells, every transition is expanded into one rule per
//! neighbor combination the head cell can legally encounter.

use crate::automaton::RuleTable;
use crate::machine::TuringMachine;
use crate::types::{CellValue, DefaultPolicy, Move, Window};
use std::collections::{HashMap, HashSet};

/// Compiles a Turing machine into a rule table over the marked/head/boundary
/// cell alphabet.
///
/// For every transition, rules are generated for the full neighbor alphabet
/// (every marked symbol plus the boundary sentinel) so that each window
/// reachable from a valid encoded configuration has an explicit entry. The
/// resulting table uses the identity default policy, which is correct for
/// passive cells, and declares its cell alphabet so stray values fail fast.
///
/// Transitions into an accept state emit a marked cell instead of a head
/// cell, terminating the encoded head track on acceptance.
pub fn compile(machine: &TuringMachine) -> RuleTable {
    let mut symbols: Vec<String> = machine.tape_alphabet().into_iter().collect();
    symbols.sort();

    let mut neighbors: Vec<CellValue> = symbols
        .iter()
        .map(|s| CellValue::Marked(s.clone()))
        .collect();
    neighbors.push(CellValue::Boundary);

    let centers: Vec<CellValue> = symbols
        .iter()
        .map(|s| CellValue::Marked(s.clone()))
        .collect();

    let mut entries: HashMap<Window, CellValue> = HashMap::new();

    for ((state, read), transition) in machine.transitions() {
        let fused = CellValue::Head(state.clone(), read.clone());
        let departed = CellValue::Marked(transition.write.clone());
        let arrive = |symbol: &str| {
            if machine.is_accepting(&transition.next_state) {
                CellValue::Marked(symbol.to_string())
            } else {
                CellValue::Head(transition.next_state.clone(), symbol.to_string())
            }
        };

        match transition.movement {
            Move::Stay => {
                // The head cell rewrites in place, independent of neighbors.
                let result = arrive(&transition.write);
                for left in &neighbors {
                    for right in &neighbors {
                        entries.insert(
                            (left.clone(), fused.clone(), right.clone()),
                            result.clone(),
                        );
                    }
                }
            }
            Move::Right => {
                // The head cell becomes a marked cell with the new symbol...
                for left in &neighbors {
                    for right in &neighbors {
                        entries.insert(
                            (left.clone(), fused.clone(), right.clone()),
                            departed.clone(),
                        );
                    }
                }
                // ...while in the same step the head arrives at the right
                // neighbor, preserving that cell's own symbol.
                for center in &centers {
                    let symbol = center.symbol().unwrap_or_default();
                    for right in &neighbors {
                        entries.insert(
                            (fused.clone(), center.clone(), right.clone()),
                            arrive(symbol),
                        );
                    }
                }
                // Moving past the tape edge turns the sentinel into a fresh
                // blank cell under the head.
                for right in &neighbors {
                    entries.insert(
                        (fused.clone(), CellValue::Boundary, right.clone()),
                        arrive(machine.blank()),
                    );
                }
            }
            Move::Left => {
                for left in &neighbors {
                    for right in &neighbors {
                        entries.insert(
                            (left.clone(), fused.clone(), right.clone()),
                            departed.clone(),
                        );
                    }
                }
                for center in &centers {
                    let symbol = center.symbol().unwrap_or_default();
                    for left in &neighbors {
                        entries.insert(
                            (left.clone(), center.clone(), fused.clone()),
                            arrive(symbol),
                        );
                    }
                }
                for left in &neighbors {
                    entries.insert(
                        (left.clone(), CellValue::Boundary, fused.clone()),
                        arrive(machine.blank()),
                    );
                }
            }
        }
    }

    let alphabet = cell_alphabet(machine, &symbols);
    RuleTable::new(entries, DefaultPolicy::Identity).with_alphabet(alphabet)
}

/// The full cell alphabet an encoded run of this machine can touch: the
/// boundary sentinel, every marked symbol, and every head value over a
/// non-accept state.
fn cell_alphabet(machine: &TuringMachine, symbols: &[String]) -> HashSet<CellValue> {
    let mut states: HashSet<&str> = HashSet::new();
    for ((state, _), transition) in machine.transitions() {
        states.insert(state);
        if !machine.is_accepting(&transition.next_state) {
            states.insert(&transition.next_state);
        }
    }

    let mut alphabet = HashSet::new();
    alphabet.insert(CellValue::Boundary);
    for symbol in symbols {
        alphabet.insert(CellValue::Marked(symbol.clone()));
        for state in &states {
            alphabet.insert(CellValue::Head(state.to_string(), symbol.clone()));
        }
    }
    alphabet
}

/// Encodes an input word as an initial automaton configuration: the head
/// cell fuses the initial state with the first symbol, every other symbol is
/// marked, and the row is bounded by sentinels.
///
/// An empty word puts the head over a blank. The blank is materialized in
/// the encoding immediately, whereas the machine itself only materializes it
/// on its first step, so for the empty word the decoded row reads `["-"]`
/// one step before the machine's tape does.
pub fn encode_word(machine: &TuringMachine, word: &[String]) -> Vec<CellValue> {
    let mut cells = Vec::with_capacity(word.len() + 2);
    cells.push(CellValue::Boundary);

    match word.first() {
        Some(first) => {
            cells.push(CellValue::Head(
                machine.initial_state().to_string(),
                first.clone(),
            ));
            for symbol in &word[1..] {
                cells.push(CellValue::Marked(symbol.clone()));
            }
        }
        None => {
            cells.push(CellValue::Head(
                machine.initial_state().to_string(),
                machine.blank().to_string(),
            ));
        }
    }

    cells.push(CellValue::Boundary);
    cells
}

/// Decodes an automaton configuration back into the symbol sequence it
/// represents, dropping boundary sentinels.
pub fn decode_cells(cells: &[CellValue]) -> Vec<String> {
    cells
        .iter()
        .filter_map(|cell| cell.symbol().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{CaConfiguration, CaRunOptions};
    use crate::machine::tests::{flip_machine, increment_machine};
    use crate::machine::TmConfiguration;
    use crate::types::TmHalt;
    use std::sync::Arc;

    fn marked(s: &str) -> CellValue {
        CellValue::Marked(s.to_string())
    }

    fn head(state: &str, symbol: &str) -> CellValue {
        CellValue::Head(state.to_string(), symbol.to_string())
    }

    fn word(text: &str) -> Vec<String> {
        text.chars().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_right_move_emits_departing_and_arriving_rules() {
        let machine = flip_machine();
        let rules = compile(&machine);

        // Departing: the old head cell becomes the written symbol, marked.
        assert_eq!(
            rules.transition(&CellValue::Boundary, &head("q0", "0"), &marked("0")),
            marked("1")
        );
        assert_eq!(
            rules.transition(&marked("1"), &head("q0", "0"), &CellValue::Boundary),
            marked("1")
        );

        // Arriving: the right neighbor takes the head, keeping its symbol.
        assert_eq!(
            rules.transition(&head("q0", "0"), &marked("0"), &CellValue::Boundary),
            head("q0", "0")
        );
        assert_eq!(
            rules.transition(&head("q0", "0"), &marked("-"), &marked("1")),
            head("q0", "-")
        );
    }

    #[test]
    fn test_left_move_emits_departing_and_arriving_rules() {
        let machine = increment_machine();
        let rules = compile(&machine);

        // Departing: (q1, 1) -> (q1, 0, L) leaves the written 0 behind.
        assert_eq!(
            rules.transition(&marked("1"), &head("q1", "1"), &marked("-")),
            marked("0")
        );
        assert_eq!(
            rules.transition(&CellValue::Boundary, &head("q1", "1"), &marked("0")),
            marked("0")
        );

        // Arriving: the left neighbor takes the head, keeping its symbol.
        assert_eq!(
            rules.transition(&marked("1"), &marked("1"), &head("q1", "1")),
            head("q1", "1")
        );
        assert_eq!(
            rules.transition(&CellValue::Boundary, &marked("0"), &head("q1", "1")),
            head("q1", "0")
        );
    }

    #[test]
    fn test_left_move_past_edge_synthesizes_blank() {
        let machine = increment_machine();
        let rules = compile(&machine);

        assert_eq!(
            rules.transition(&CellValue::Boundary, &CellValue::Boundary, &head("q1", "1")),
            head("q1", "-")
        );
    }

    #[test]
    fn test_right_move_past_edge_synthesizes_blank() {
        let machine = flip_machine();
        let rules = compile(&machine);

        assert_eq!(
            rules.transition(&head("q0", "0"), &CellValue::Boundary, &CellValue::Boundary),
            head("q0", "-")
        );
    }

    #[test]
    fn test_accepting_transition_folds_head_into_marked_cell() {
        let machine = flip_machine();
        let rules = compile(&machine);

        // (q0, 1) -> (qf, 1, S) with qf accepting: the head track ends.
        assert_eq!(
            rules.transition(&marked("1"), &head("q0", "1"), &CellValue::Boundary),
            marked("1")
        );
    }

    #[test]
    fn test_stay_rules_cover_every_neighbor_pair() {
        let machine = flip_machine();
        let rules = compile(&machine);

        // 3 marked symbols + the sentinel on each side.
        let neighbors = [marked("0"), marked("1"), marked("-"), CellValue::Boundary];
        for left in &neighbors {
            for right in &neighbors {
                let window = (left.clone(), head("q0", "1"), right.clone());
                assert!(rules.contains(&window), "missing window for {:?}", window);
            }
        }
    }

    #[test]
    fn test_compiled_table_uses_identity_policy() {
        let machine = flip_machine();
        let rules = compile(&machine);

        assert_eq!(rules.default_policy(), &DefaultPolicy::Identity);
        // Passive cells fall through unchanged.
        assert_eq!(
            rules.transition(&marked("1"), &marked("0"), &marked("1")),
            marked("0")
        );
    }

    #[test]
    fn test_encode_word() {
        let machine = flip_machine();

        assert_eq!(
            encode_word(&machine, &word("01")),
            vec![
                CellValue::Boundary,
                head("q0", "0"),
                marked("1"),
                CellValue::Boundary
            ]
        );
    }

    #[test]
    fn test_encode_empty_word_puts_head_over_blank() {
        let machine = flip_machine();

        assert_eq!(
            encode_word(&machine, &[]),
            vec![CellValue::Boundary, head("q0", "-"), CellValue::Boundary]
        );
        // The encoding materializes the blank up front; the machine's own
        // tape stays empty until its first step reads past the edge.
        assert_eq!(decode_cells(&encode_word(&machine, &[])), vec!["-"]);
    }

    #[test]
    fn test_decode_cells_drops_sentinels() {
        let cells = vec![
            CellValue::Boundary,
            marked("1"),
            head("q0", "0"),
            CellValue::Boundary,
        ];
        assert_eq!(decode_cells(&cells), vec!["1", "0"]);
    }

    /// Runs the machine and its compiled automaton on the same word and
    /// asserts the decoded tape agrees at every step until the machine
    /// becomes terminal.
    fn assert_equivalent(machine: TuringMachine, text: &str, expected: TmHalt) {
        let machine = Arc::new(machine);
        let rules = Arc::new(compile(&machine));

        let mut tm = TmConfiguration::new(word(text), machine.clone());
        let mut tm_tapes = Vec::new();
        let verdict = tm.run(100, |c| tm_tapes.push(c.tape().to_vec()));
        assert_eq!(verdict, expected);

        let mut ca = CaConfiguration::new(encode_word(&machine, &word(text)), rules);
        let mut ca_tapes = Vec::new();
        let options = CaRunOptions {
            max_steps: 100,
            stop_on_stable: true,
            ..Default::default()
        };
        ca.run(&options, |_, c| ca_tapes.push(decode_cells(c.cells())))
            .unwrap();

        assert!(ca_tapes.len() >= tm_tapes.len());
        for (step, tape) in tm_tapes.iter().enumerate() {
            assert_eq!(&ca_tapes[step], tape, "divergence at step {}", step);
        }
    }

    #[test]
    fn test_compiled_ca_matches_tm_until_accept() {
        assert_equivalent(flip_machine(), "01", TmHalt::Accept);
    }

    #[test]
    fn test_compiled_ca_matches_tm_until_reject() {
        // The blank transition is missing; the machine rejects and the
        // automaton stabilizes with the head cell stuck in place.
        assert_equivalent(flip_machine(), "00", TmHalt::Reject);
    }

    #[test]
    fn test_compiled_ca_matches_tm_through_left_moves() {
        // The increment machine carries the head left across the word and
        // past the left edge, covering the left-move rule families.
        for word in ["11", "10", "0", "111"] {
            assert_equivalent(increment_machine(), word, TmHalt::Accept);
        }
    }

    #[test]
    fn test_compiled_ca_run_stabilizes_after_acceptance() {
        let machine = Arc::new(flip_machine());
        let rules = Arc::new(compile(&machine));

        let mut ca = CaConfiguration::new(encode_word(&machine, &word("01")), rules);
        let options = CaRunOptions {
            max_steps: 100,
            stop_on_stable: true,
            ..Default::default()
        };
        let halt = ca.run(&options, |_, _| {}).unwrap();

        assert!(matches!(halt, crate::types::CaHalt::Stable { .. }));
        assert_eq!(decode_cells(ca.cells()), vec!["1", "1"]);
        assert!(!ca.cells().iter().any(CellValue::is_head));
    }
}
