use chumsky::prelude::*;
use num_bigint::BigInt;
use num_traits::Zero;
use thiserror::Error;

use crate::{Matrix, Rat};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: `{token}` is not a rational literal: {reason}")]
    InvalidToken {
        line: usize,
        token: String,
        reason: String,
    },
    #[error("line {line}: row has {found} entries, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("input contains no matrix rows")]
    Empty,
}

/// Parses whitespace-delimited rows of rational literals into a matrix.
///
/// Blank lines are skipped and line numbers in errors are 1-based. Every
/// row must have the same number of entries as the first.
pub fn parse_matrix(input: &str) -> Result<Matrix, ParseError> {
    let token_parser = rational();
    let mut rows: Matrix = Vec::new();
    let mut width = None;

    for (i, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let value = token_parser
                .parse(token)
                .into_result()
                .map_err(|errs| ParseError::InvalidToken {
                    line: i + 1,
                    token: token.to_owned(),
                    reason: errs
                        .first()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "invalid rational literal".to_owned()),
                })?;
            row.push(value);
        }

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(ParseError::RaggedRow {
                    line: i + 1,
                    expected,
                    found: row.len(),
                });
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(rows)
}

/// Accepts `-?digits` and `-?digits/-?digits`, rejecting zero denominators.
fn rational<'a>() -> impl Parser<'a, &'a str, Rat, extra::Err<Rich<'a, char>>> {
    let digits = any()
        .filter(char::is_ascii_digit)
        .repeated()
        .at_least(1)
        .collect::<String>();

    let integer = just('-').or_not().then(digits).try_map(
        |(sign, digits): (Option<char>, String), span| {
            digits
                .parse::<BigInt>()
                .map(|n| if sign.is_some() { -n } else { n })
                .map_err(|e| Rich::custom(span, e))
        },
    );

    integer
        .clone()
        .then(just('/').ignore_then(integer).or_not())
        .try_map(|(numer, denom), span| match denom {
            Some(d) if d.is_zero() => Err(Rich::custom(span, "denominator is zero")),
            Some(d) => Ok(Rat::new(numer, d)),
            None => Ok(Rat::from_integer(numer)),
        })
        .then_ignore(end())
}
