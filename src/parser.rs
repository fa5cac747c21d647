//! This module provides the parser for machine definition files, utilizing the `pest` crate.
//! The grammar lives in `grammar.pest`; this module turns the parse tree into a `Definition`.

use crate::{
    alphabet::Alphabet,
    analyzer::analyze,
    types::{Definition, Direction, Transition, TuringMachineError, MAX_TAPES},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::BTreeSet;

/// Token that marks an empty set of final states.
const EMPTY_SET: &str = "-";
/// Optional separator between the read symbols and the next state of a transition.
const ARROW: &str = "->";

/// Derives a `PestParser` for the definition grammar in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Parses a machine definition into a `Definition`.
///
/// The parsed definition is analyzed before being returned, so structurally broken or
/// non-deterministic transition tables are rejected here. Invariants such as "the initial
/// state is declared" are checked when the `Definition` is turned into a
/// [`crate::TuringMachine`].
///
/// # Returns
///
/// * `Ok(Definition)` if the input is successfully parsed and analyzed.
/// * `Err(TuringMachineError::ParseError)` if there are any syntax errors.
/// * `Err(TuringMachineError::ValidationError)` if the definition fails analysis.
pub fn parse(input: &str) -> Result<Definition, TuringMachineError> {
    let root = DefinitionParser::parse(Rule::definition, input)
        .map_err(|e| TuringMachineError::ParseError(e.into()))?
        .next()
        .ok_or_else(|| TuringMachineError::ValidationError("Empty definition".to_string()))?;

    let definition = parse_definition(root)?;

    analyze(&definition)?;

    Ok(definition)
}

/// Walks the sections of a `Pair<Rule::definition>` in order.
///
/// The grammar guarantees every mandatory section is present exactly once, so only the
/// transitions depend on anything parsed before them (the tape count).
fn parse_definition(pair: Pair<Rule>) -> Result<Definition, TuringMachineError> {
    let mut definition = Definition {
        states: BTreeSet::new(),
        input_alphabet: Alphabet::new(),
        tape_alphabet: Alphabet::new(),
        initial_state: String::new(),
        blank: crate::types::DEFAULT_BLANK_SYMBOL,
        final_states: BTreeSet::new(),
        tapes: 1,
        transitions: Vec::new(),
    };

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::states => definition.states = parse_names(p),
            Rule::input_alphabet => definition.input_alphabet = Alphabet::from_tokens(tokens(p)),
            Rule::tape_alphabet => definition.tape_alphabet = Alphabet::from_tokens(tokens(p)),
            Rule::initial => definition.initial_state = parse_single(p),
            Rule::blank => {
                definition.blank = parse_single(p)
                    .chars()
                    .next()
                    .unwrap_or(crate::types::DEFAULT_BLANK_SYMBOL)
            }
            Rule::finals => definition.final_states = parse_final_states(p),
            Rule::tape_count => definition.tapes = parse_tape_count(p)?,
            Rule::transition => {
                let transition = parse_transition(p, definition.tapes)?;
                definition.transitions.push(transition);
            }
            _ => {} // EOI
        }
    }

    Ok(definition)
}

/// Collects the raw tokens of a line.
fn tokens(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner().map(|p| p.as_str().to_string()).collect()
}

/// Parses a line of state names into a set.
fn parse_names(pair: Pair<Rule>) -> BTreeSet<String> {
    tokens(pair).into_iter().collect()
}

/// Parses the final states line, where a lone `-` stands for the empty set.
fn parse_final_states(pair: Pair<Rule>) -> BTreeSet<String> {
    let names = parse_names(pair);
    if names.len() == 1 && names.contains(EMPTY_SET) {
        return BTreeSet::new();
    }
    names
}

/// Extracts the single token of a one-token line.
fn parse_single(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default()
}

/// Parses the tape count line. The count must be between one and `MAX_TAPES`.
fn parse_tape_count(pair: Pair<Rule>) -> Result<usize, TuringMachineError> {
    let span = pair.as_span();
    let count = pair
        .as_str()
        .trim()
        .parse::<usize>()
        .map_err(|e| parse_error(&format!("Invalid tape count: {e}"), span))?;

    if count == 0 {
        return Err(parse_error("Tape count must be at least 1", span));
    }

    if count > MAX_TAPES {
        return Err(parse_error(
            &format!("Tape count must be at most {MAX_TAPES}, found {count}"),
            span,
        ));
    }

    Ok(count)
}

/// Parses a transition line for a machine with `tapes` tapes.
///
/// Accepts both `state r1..rN next w1..wN m1..mN` and the rendered form with `->` between
/// the read symbols and the next state.
fn parse_transition(pair: Pair<Rule>, tapes: usize) -> Result<Transition, TuringMachineError> {
    let span = pair.as_span();
    let mut fields: Vec<Pair<Rule>> = pair.into_inner().collect();

    if fields.get(tapes + 1).is_some_and(|p| p.as_str() == ARROW) {
        fields.remove(tapes + 1);
    }

    let expected = 3 * tapes + 2;
    if fields.len() != expected {
        return Err(parse_error(
            &format!(
                "Transition for {tapes} tape(s) needs {expected} fields, found {}",
                fields.len()
            ),
            span,
        ));
    }

    let state = fields[0].as_str();
    let read = fields[1..=tapes]
        .iter()
        .map(parse_symbol)
        .collect::<Result<Vec<_>, _>>()?;
    let next_state = fields[tapes + 1].as_str();
    let write = fields[tapes + 2..2 * tapes + 2]
        .iter()
        .map(parse_symbol)
        .collect::<Result<Vec<_>, _>>()?;
    let directions = fields[2 * tapes + 2..]
        .iter()
        .map(parse_direction)
        .collect::<Result<Vec<_>, _>>()?;

    Transition::new(state, read, next_state, write, directions)
}

/// Parses a symbol field, which must be exactly one character.
fn parse_symbol(pair: &Pair<Rule>) -> Result<char, TuringMachineError> {
    single_char(pair).ok_or_else(|| {
        parse_error(
            &format!("Expected a single symbol, found '{}'", pair.as_str()),
            pair.as_span(),
        )
    })
}

/// Parses a movement field: `L`, `R` or `S` in either case.
fn parse_direction(pair: &Pair<Rule>) -> Result<Direction, TuringMachineError> {
    single_char(pair)
        .and_then(|c| Direction::try_from(c).ok())
        .ok_or_else(|| {
            parse_error(
                &format!("Unsupported movement: {}", pair.as_str()),
                pair.as_span(),
            )
        })
}

fn single_char(pair: &Pair<Rule>) -> Option<char> {
    let mut chars = pair.as_str().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Creates a `TuringMachineError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    TuringMachineError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_definition() {
        let input = "\
q0 q1
0 1
0 1 .
q0
.
q1
q0 1 q1 1 S
q0 0 q1 0 S
";

        let definition = parse(input).unwrap();
        assert_eq!(definition.states.len(), 2);
        assert_eq!(definition.input_alphabet.to_string(), "{0, 1}");
        assert_eq!(definition.tape_alphabet.to_string(), "{., 0, 1}");
        assert_eq!(definition.initial_state, "q0");
        assert_eq!(definition.blank, '.');
        assert!(definition.final_states.contains("q1"));
        assert!(definition.is_single_tape());
        assert_eq!(definition.transitions.len(), 2);
        assert_eq!(definition.transitions[0].to_string(), "q0 1 -> q1 1 S");
    }

    #[test]
    fn test_parse_multi_tape_definition() {
        let input = "\
# Two tapes
q0 q1
a
a b x y _
q0
_
q1
2
q0 a b q1 x y R L
";

        let definition = parse(input).unwrap();
        assert_eq!(definition.tapes, 2);
        assert_eq!(
            definition.transitions[0],
            Transition::new(
                "q0",
                vec!['a', 'b'],
                "q1",
                vec!['x', 'y'],
                vec![Direction::Right, Direction::Left],
            )
            .unwrap()
        );
    }

    #[test]
    fn test_parse_comments_blank_lines_and_arrow_form() {
        let input = "
# Header comment
#   spanning lines

q0 q1

1
1 .
   # indented comment
q0
.
q1
q0 1 -> q1 1 s

q1 . -> q1 . l
# trailing comment";

        let definition = parse(input).unwrap();
        assert_eq!(definition.transitions.len(), 2);
        assert_eq!(definition.transitions[1].directions(), &[Direction::Left]);
    }

    #[test]
    fn test_parse_empty_final_states() {
        let input = "q0\n1\n1 .\nq0\n.\n-\nq0 1 q0 1 R\n";

        let definition = parse(input).unwrap();
        assert!(definition.final_states.is_empty());
    }

    #[test]
    fn test_parse_alphabet_uses_first_character() {
        let input = "q0\nab cd\nab cd .\nq0\n.\n-\n";

        let definition = parse(input).unwrap();
        assert_eq!(definition.input_alphabet.to_string(), "{a, c}");
        assert!(definition.transitions.is_empty());
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let input = "q0 q1\r\n1\r\n1 .\r\nq0\r\n.\r\nq1\r\nq0 1 q1 1 S\r\n";

        let definition = parse(input).unwrap();
        assert_eq!(definition.transitions.len(), 1);
    }

    #[test]
    fn test_parse_missing_section() {
        let input = "q0 q1\n1\n1 .\nq0\n";

        let error = parse(input).unwrap_err();
        assert!(matches!(error, TuringMachineError::ParseError(_)));
    }

    #[test]
    fn test_parse_initial_state_with_two_tokens() {
        let input = "q0 q1\n1\n1 .\nq0 q1\n.\nq1\n";

        let error = parse(input).unwrap_err();
        assert!(matches!(error, TuringMachineError::ParseError(_)));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let input = "q0 q1\n1\n1 .\nq0\n.\nq1\nq0 1 q1 1\n";

        let error = parse(input).unwrap_err();
        assert!(matches!(error, TuringMachineError::ParseError(_)));
        assert!(error
            .to_string()
            .contains("Transition for 1 tape(s) needs 5 fields, found 4"));
    }

    #[test]
    fn test_parse_unsupported_movement() {
        let input = "q0 q1\n1\n1 .\nq0\n.\nq1\nq0 1 q1 1 X\n";

        let error = parse(input).unwrap_err();
        assert!(matches!(error, TuringMachineError::ParseError(_)));
        assert!(error.to_string().contains("Unsupported movement: X"));
    }

    #[test]
    fn test_parse_multi_character_symbol() {
        let input = "q0 q1\n1\n1 .\nq0\n.\nq1\nq0 11 q1 1 R\n";

        let error = parse(input).unwrap_err();
        assert!(error
            .to_string()
            .contains("Expected a single symbol, found '11'"));
    }

    #[test]
    fn test_parse_zero_tapes() {
        let input = "q0 q1\n1\n1 .\nq0\n.\nq1\n0\n";

        let error = parse(input).unwrap_err();
        assert!(error.to_string().contains("Tape count must be at least 1"));
    }

    #[test]
    fn test_parse_tape_count_above_limit() {
        for count in ["18446744073709551615", "1000000000000", "65"] {
            let input = format!("q0 q1\n1\n1 .\nq0\n.\nq1\n{count}\nq0 1 q1 1 S\n");

            let error = parse(&input).unwrap_err();
            assert!(matches!(error, TuringMachineError::ParseError(_)));
            assert!(
                error.to_string().contains("Tape count must be at most 64"),
                "count {count}"
            );
        }
    }

    #[test]
    fn test_parse_tape_count_at_limit() {
        let input = format!("q0 q1\n1\n1 .\nq0\n.\nq1\n{MAX_TAPES}\n");

        let definition = parse(&input).unwrap();
        assert_eq!(definition.tapes, MAX_TAPES);
        assert_eq!(
            crate::TuringMachine::new(definition).unwrap().tape_count(),
            MAX_TAPES
        );
    }

    #[test]
    fn test_parse_conflicting_transitions() {
        let input = "q0 q1\n1\n1 .\nq0\n.\nq1\nq0 1 q1 1 S\nq0 1 q0 . R\n";

        let error = parse(input).unwrap_err();
        assert!(matches!(error, TuringMachineError::ValidationError(_)));
        assert!(error.to_string().contains("Conflicting transitions"));
    }

    #[test]
    fn test_parsed_definition_serializes_to_json() {
        let input = "q0 q1\n1\n1 .\nq0\n.\nq1\nq0 1 q1 1 S\n";

        let json = serde_json::to_value(parse(input).unwrap()).unwrap();
        assert_eq!(json["states"], serde_json::json!(["q0", "q1"]));
        assert_eq!(json["tape_alphabet"]["symbols"], serde_json::json!([".", "1"]));
        assert_eq!(json["blank"], ".");
        assert_eq!(json["tapes"], 1);
        assert_eq!(json["transitions"][0]["next_state"], "q1");
        assert_eq!(json["transitions"][0]["directions"], serde_json::json!(["Stay"]));
    }

    #[test]
    fn test_parsed_definition_builds_a_machine() {
        let input = "q0 q1\n1\n1 .\nq0\n.\nq1\nq0 1 q1 1 S\n";

        let mut machine = crate::TuringMachine::new(parse(input).unwrap()).unwrap();
        assert_eq!(machine.run("1", 10), Ok(true));
        assert!(machine.is_accepted());
    }
}
