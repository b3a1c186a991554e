//! Plain-text definition format.
//!
//! ```text
//! # comments and blank lines are ignored
//! guard
//! 3
//! Chase Avoid Hide
//! 0.25 0.5  0.25
//! 0.25 0.25 0.5
//! 0.5  0.25 0.25
//! ```
//!
//! The first line is the machine name, the second the number of states, the
//! third the state names, followed by one row of probabilities per state.

use crate::core::State;
use crate::definition::{DefinitionError, MachineDefinition};
use std::fmt::Display;
use std::str::FromStr;

/// Parse a definition from the text format above.
///
/// Only the layout is checked here; use
/// [`validate`](crate::definition::validate) for the probabilities.
pub fn parse_text<S>(source: &str) -> Result<MachineDefinition<S>, DefinitionError>
where
    S: State + FromStr,
    S::Err: Display,
{
    let mut lines = source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, strip_comment(line).trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, name) = lines.next().ok_or(DefinitionError::MissingLine {
        expected: "machine name",
    })?;

    let (count_line, count_token) = lines.next().ok_or(DefinitionError::MissingLine {
        expected: "state count",
    })?;
    let count: usize = count_token
        .parse()
        .map_err(|_| DefinitionError::InvalidStateCount {
            line: count_line,
            token: count_token.to_string(),
        })?;

    let (states_line, states_text) = lines.next().ok_or(DefinitionError::MissingLine {
        expected: "state names",
    })?;
    let states = states_text
        .split_whitespace()
        .map(|token| {
            token.parse::<S>().map_err(|e| DefinitionError::UnknownState {
                line: states_line,
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<S>, _>>()?;
    if states.len() != count {
        return Err(DefinitionError::StateCount {
            line: states_line,
            expected: count,
            found: states.len(),
        });
    }

    let mut matrix = Vec::with_capacity(count);
    for _ in 0..count {
        let (row_line, row_text) = lines.next().ok_or(DefinitionError::MissingLine {
            expected: "matrix row",
        })?;
        let row = row_text
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| DefinitionError::InvalidNumber {
                    line: row_line,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        matrix.push(row);
    }

    if let Some((line, _)) = lines.next() {
        return Err(DefinitionError::UnexpectedLine { line });
    }

    Ok(MachineDefinition {
        name: name.to_string(),
        states,
        matrix,
    })
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(content, _)| content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Behavior {
            Chase,
            Avoid,
            Hide,
        }
    }

    const GUARD: &str = "
        # patrol guard
        guard
        3
        Chase Avoid Hide
        0.25 0.5  0.25   # mostly avoids
        0.25 0.25 0.5

        0.5  0.25 0.25
    ";

    #[test]
    fn parses_well_formed_text() {
        let def: MachineDefinition<Behavior> = parse_text(GUARD).unwrap();
        assert_eq!(def.name, "guard");
        assert_eq!(def.states, vec![Behavior::Chase, Behavior::Avoid, Behavior::Hide]);
        assert_eq!(def.matrix[0], vec![0.25, 0.5, 0.25]);
        assert_eq!(def.matrix[2], vec![0.5, 0.25, 0.25]);
    }

    #[test]
    fn reports_missing_lines() {
        let result = parse_text::<Behavior>("guard\n2\nChase Avoid\n0.5 0.5\n");
        assert!(matches!(
            result,
            Err(DefinitionError::MissingLine {
                expected: "matrix row"
            })
        ));
        assert!(matches!(
            parse_text::<Behavior>(""),
            Err(DefinitionError::MissingLine {
                expected: "machine name"
            })
        ));
    }

    #[test]
    fn reports_bad_tokens_with_line_numbers() {
        assert!(matches!(
            parse_text::<Behavior>("guard\ntwo\n"),
            Err(DefinitionError::InvalidStateCount { line: 2, .. })
        ));
        assert!(matches!(
            parse_text::<Behavior>("guard\n2\nChase Dance\n"),
            Err(DefinitionError::UnknownState { line: 3, .. })
        ));
        assert!(matches!(
            parse_text::<Behavior>("guard\n2\nChase Avoid\n0.5 half\n0.5 0.5\n"),
            Err(DefinitionError::InvalidNumber { line: 4, .. })
        ));
    }

    #[test]
    fn state_count_must_match_names() {
        assert!(matches!(
            parse_text::<Behavior>("guard\n3\nChase Avoid\n"),
            Err(DefinitionError::StateCount {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn rejects_trailing_content() {
        let result = parse_text::<Behavior>("guard\n1\nChase\n1.0\n0.5\n");
        assert!(matches!(result, Err(DefinitionError::UnexpectedLine { line: 5 })));
    }
}
