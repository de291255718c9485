//! This module provides the parsers for the two line-oriented table formats,
//! utilizing the `pest` crate: cellular automaton rule files (`l,c,r:next`
//! per data line) and Turing machine descriptions
//! (`state,symbol:new_state,new_symbol,move` plus `accept` lines).

use crate::analyzer::analyze;
use crate::automaton::RuleTable;
use crate::machine::TuringMachine;
use crate::types::{
    format_window, CellValue, DefaultPolicy, Move, SimulatorError, TmTransition, Window,
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::{HashMap, HashSet};

/// Derives a `PestParser` for the table formats defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TableParser;

/// Parses a cellular automaton rule file into a `RuleTable` with the given
/// default policy.
///
/// Lines without a `:` are treated as comments and skipped. A line that does
/// contain a `:` but is not a well-formed `l,c,r:next` entry is a fatal
/// parse error, as is a duplicate window.
pub fn parse_rule_table(
    input: &str,
    policy: DefaultPolicy,
) -> Result<RuleTable, SimulatorError> {
    let root = TableParser::parse(Rule::rule_file, input.trim())
        .map_err(|e| SimulatorError::ParseError(Box::new(e)))?
        .next()
        .unwrap();

    let mut entries: HashMap<Window, CellValue> = HashMap::new();

    for pair in root.into_inner() {
        if pair.as_rule() == Rule::rule_entry {
            let span = pair.as_span();
            let mut tokens = pair.into_inner();

            let left = parse_cell(&mut tokens)?;
            let center = parse_cell(&mut tokens)?;
            let right = parse_cell(&mut tokens)?;
            let next = parse_cell(&mut tokens)?;

            let window = (left, center, right);
            if entries.contains_key(&window) {
                return Err(parse_error(
                    &format!("Duplicate rule for window {}", format_window(&window)),
                    span,
                ));
            }
            entries.insert(window, next);
        }
    }

    Ok(RuleTable::new(entries, policy))
}

/// Parses a Turing machine description into a `TuringMachine`.
///
/// The state named on the first transition line is the initial state; lines
/// beginning with the token `accept` list accept states. The parsed machine
/// is validated before being returned.
pub fn parse_machine(input: &str) -> Result<TuringMachine, SimulatorError> {
    let root = TableParser::parse(Rule::tm_file, input.trim())
        .map_err(|e| SimulatorError::ParseError(Box::new(e)))?
        .next()
        .unwrap();

    let mut transitions: HashMap<(String, String), TmTransition> = HashMap::new();
    let mut initial_state: Option<String> = None;
    let mut accept_states: HashSet<String> = HashSet::new();

    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::tm_entry => {
                let span = pair.as_span();
                let mut tokens = pair.into_inner();

                let state = next_token(&mut tokens);
                let symbol = next_token(&mut tokens);
                let next_state = next_token(&mut tokens);
                let write = next_token(&mut tokens);
                let movement = parse_move(tokens.next().unwrap())?;

                // The first transition names the initial state
                if initial_state.is_none() {
                    initial_state = Some(state.clone());
                }

                let key = (state, symbol);
                if transitions.contains_key(&key) {
                    return Err(parse_error(
                        &format!("Duplicate transition for ({}, {})", key.0, key.1),
                        span,
                    ));
                }
                transitions.insert(
                    key,
                    TmTransition {
                        write,
                        movement,
                        next_state,
                    },
                );
            }
            Rule::accept_line => {
                for token in pair.into_inner() {
                    if token.as_rule() == Rule::token {
                        accept_states.insert(token.as_str().to_string());
                    }
                }
            }
            _ => {} // Skip blank lines and EOI
        }
    }

    let initial_state = initial_state.ok_or_else(|| {
        SimulatorError::ValidationError("Machine description defines no transitions".to_string())
    })?;

    let machine = TuringMachine::new(transitions, initial_state, accept_states);

    // Validate the parsed machine
    analyze(&machine)?;

    Ok(machine)
}

/// Parses a comma-separated list of cell tokens, e.g. `#,q0@1,*0,#`.
pub fn parse_cells(input: &str) -> Result<Vec<CellValue>, SimulatorError> {
    input
        .split(',')
        .map(|token| token.trim().parse::<CellValue>())
        .collect()
}

/// Parses a 3-cell window spelled `l,c,r`.
pub fn parse_window(input: &str) -> Result<Window, SimulatorError> {
    let cells = parse_cells(input)?;
    match <[CellValue; 3]>::try_from(cells) {
        Ok([left, center, right]) => Ok((left, center, right)),
        Err(cells) => Err(SimulatorError::ValidationError(format!(
            "Expected 3 window cells, got {}",
            cells.len()
        ))),
    }
}

/// Creates a `SimulatorError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> SimulatorError {
    SimulatorError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Parses the next `token` pair from an entry as a `CellValue`.
fn parse_cell(tokens: &mut pest::iterators::Pairs<Rule>) -> Result<CellValue, SimulatorError> {
    tokens.next().unwrap().as_str().parse()
}

/// Extracts the next `token` pair from an entry as a string.
fn next_token(tokens: &mut pest::iterators::Pairs<Rule>) -> String {
    tokens.next().unwrap().as_str().to_string()
}

/// Parses a head movement from a `Pair<Rule::move_dir>`.
fn parse_move(pair: Pair<Rule>) -> Result<Move, SimulatorError> {
    let span = pair.as_span();
    match pair.as_str() {
        "L" => Ok(Move::Left),
        "R" => Ok(Move::Right),
        "S" => Ok(Move::Stay),
        _ => Err(parse_error(
            &format!("Unsupported move: {}", pair.as_str()),
            span,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule_file() {
        let input = "0,0,0:0";
        let table = parse_rule_table(input, DefaultPolicy::Identity).unwrap();

        assert_eq!(table.len(), 1);
        let zero = CellValue::Symbol("0".to_string());
        assert!(table.contains(&(zero.clone(), zero.clone(), zero)));
    }

    #[test]
    fn test_parse_rule_file_skips_lines_without_colon() {
        let input = "CA with a single quiescent rule\n\n0,0,0:0\n";
        let table = parse_rule_table(input, DefaultPolicy::Identity).unwrap();

        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_parse_rule_file_with_encoded_cell_tokens() {
        let input = "#,q0@0,*1:*0\n*1,*0,#:q1@0";
        let table = parse_rule_table(input, DefaultPolicy::Identity).unwrap();

        let window = (
            CellValue::Boundary,
            CellValue::Head("q0".to_string(), "0".to_string()),
            CellValue::Marked("1".to_string()),
        );
        assert_eq!(
            table.transition(&window.0, &window.1, &window.2),
            CellValue::Marked("0".to_string())
        );
    }

    #[test]
    fn test_parse_rule_file_rejects_wrong_field_count() {
        let result = parse_rule_table("0,0:0", DefaultPolicy::Identity);
        assert!(matches!(result, Err(SimulatorError::ParseError(_))));
    }

    #[test]
    fn test_parse_rule_file_rejects_duplicate_window() {
        let result = parse_rule_table("0,0,0:0\n0,0,0:1", DefaultPolicy::Identity);
        assert!(matches!(result, Err(SimulatorError::ParseError(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Duplicate rule for window 0,0,0"));
    }

    #[test]
    fn test_parse_machine() {
        let input = "q0,0:q0,1,R\nq0,1:qf,1,S\naccept qf";
        let machine = parse_machine(input).unwrap();

        assert_eq!(machine.initial_state(), "q0");
        assert!(machine.is_accepting("qf"));
        assert_eq!(machine.transitions().len(), 2);

        let transition = machine.transition("q0", "0").unwrap();
        assert_eq!(transition.write, "1");
        assert_eq!(transition.movement, Move::Right);
        assert_eq!(transition.next_state, "q0");
    }

    #[test]
    fn test_parse_machine_with_spaces_and_blank_lines() {
        let input = "q0, 0 : q0, 1, R\n\nq0, 1 : qf, 1, S\naccept qf\n";
        let machine = parse_machine(input).unwrap();

        assert_eq!(machine.transitions().len(), 2);
        assert!(machine.is_accepting("qf"));
    }

    #[test]
    fn test_parse_machine_multiple_accept_states() {
        let input = "q0,0:qf,0,S\nq0,1:qg,1,S\naccept qf qg";
        let machine = parse_machine(input).unwrap();

        assert!(machine.is_accepting("qf"));
        assert!(machine.is_accepting("qg"));
    }

    #[test]
    fn test_parse_machine_bare_accept_line_is_a_no_op() {
        let input = "q0,0:q0,1,R\nq0,1:qf,1,S\naccept\naccept qf";
        let machine = parse_machine(input).unwrap();

        assert_eq!(machine.accept_states().len(), 1);
        assert!(machine.is_accepting("qf"));
    }

    #[test]
    fn test_parse_machine_with_only_bare_accept_fails_validation() {
        // A nameless accept line adds nothing, so the accept set stays empty.
        let input = "q0,0:q0,1,R\naccept";
        let result = parse_machine(input);

        assert!(matches!(result, Err(SimulatorError::ValidationError(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("no accept states"));
    }

    #[test]
    fn test_parse_machine_rejects_duplicate_key() {
        let input = "q0,0:q0,1,R\nq0,0:qf,1,S\naccept qf";
        let result = parse_machine(input);

        assert!(matches!(result, Err(SimulatorError::ParseError(_))));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Duplicate transition for (q0, 0)"));
    }

    #[test]
    fn test_parse_machine_rejects_bad_move() {
        let input = "q0,0:q0,1,X\naccept qf";
        let result = parse_machine(input);
        assert!(matches!(result, Err(SimulatorError::ParseError(_))));
    }

    #[test]
    fn test_parse_machine_rejects_missing_fields() {
        let input = "q0,0:q0,R\naccept qf";
        let result = parse_machine(input);
        assert!(matches!(result, Err(SimulatorError::ParseError(_))));
    }

    #[test]
    fn test_parse_machine_rejects_empty_description() {
        let result = parse_machine("accept qf");
        assert!(matches!(result, Err(SimulatorError::ValidationError(_))));
    }

    #[test]
    fn test_parse_cells() {
        let cells = parse_cells("#, q0@0, *1, #").unwrap();
        assert_eq!(
            cells,
            vec![
                CellValue::Boundary,
                CellValue::Head("q0".to_string(), "0".to_string()),
                CellValue::Marked("1".to_string()),
                CellValue::Boundary,
            ]
        );
    }

    #[test]
    fn test_parse_window() {
        let window = parse_window("0,0,0").unwrap();
        let zero = CellValue::Symbol("0".to_string());
        assert_eq!(window, (zero.clone(), zero.clone(), zero));

        assert!(parse_window("0,0").is_err());
    }
}
