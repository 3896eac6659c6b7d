//! # Text input and output
//!
//! Reads LPs in the brace-delimited text format
//!
//! ```text
//! 3 3
//! {{3, 2, 0}, {1, 1, 4}, {1, 0, 2}}
//! ```
//!
//! where the header gives the number of rows `m` (constraints + 1) and columns `n` (variables +
//! 1), followed by `m` rows of `n` integers: the objective row `[c | d]` first, then one row
//! `[A_i | b_i]` per constraint. Vectors and matrices are written back in the same brace notation.

use std::fmt;

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::linalg::Matrix;
use crate::solver::Outcome;
use crate::tableau::Tableau;

fn parse_token(token: &str) -> Result<f64> {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedInput(format!("expected an integer, got {:?}", token)));
    }
    token.parse::<f64>().map_err(|e| Error::MalformedInput(format!("{:?}: {}", token, e)))
}

fn parse_dimension(token: Option<&str>, name: &str) -> Result<usize> {
    let token = token.ok_or_else(|| Error::MalformedInput(format!("missing {} in the header", name)))?;
    token.parse::<usize>().map_err(|e| Error::MalformedInput(format!("{} {:?}: {}", name, token, e)))
}

/// Parses an LP from its text form into a [Tableau].
///
/// Fails with [Error::MalformedInput] if the header is not two non-negative integers, a token is
/// not an integer, or the rows do not match the announced dimensions.
///
/// # Example:
///
/// ```
/// use tableaurs::io::parse_tableau;
/// let tableau = parse_tableau("3 3\n{{3, 2, 0}, {1, 1, 4}, {1, 0, 2}}").expect("valid input");
/// assert_eq!(tableau.row(0), &[-3., -2., 0.]);
/// assert_eq!(tableau.shape().constraints, 2);
/// ```
pub fn parse_tableau(input: &str) -> Result<Tableau> {
    let (header, body) = input
        .split_once('{')
        .ok_or_else(|| Error::MalformedInput("no rows found".to_string()))?;
    let mut dimensions = header.split_whitespace();
    let m = parse_dimension(dimensions.next(), "row count")?;
    let n = parse_dimension(dimensions.next(), "column count")?;
    if let Some(extra) = dimensions.next() {
        return Err(Error::MalformedInput(format!("unexpected {:?} after the header", extra)));
    }

    let rows = body
        .split('{')
        .map(|row| {
            row.split(|c: char| c == ',' || c == '}' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(parse_token)
                .collect::<Result<Vec<f64>>>()
        })
        .filter_ok(|row| !row.is_empty())
        .collect::<Result<Vec<Vec<f64>>>>()?;

    if rows.len() != m {
        return Err(Error::MalformedInput(format!("expected {} rows, got {}", m, rows.len())));
    }
    if let Some((i, row)) = rows.iter().find_position(|row| row.len() != n) {
        return Err(Error::MalformedInput(format!("expected {} values in row {}, got {}", n, i, row.len())));
    }
    Tableau::from_rows(&rows)
}

/// Rounds to 5 decimals, with negative zero printed as 0.
fn format_value(value: f64) -> String {
    let rounded = (value * 100_000.0).round() / 100_000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Writes a vector as `{a, b, ...}` with every value rounded to 5 decimals.
///
/// # Example:
///
/// ```
/// use tableaurs::io::format_vector;
/// assert_eq!(format_vector(&[2., 1.0 / 3.0, -0.0]), "{2, 0.33333, 0}");
/// ```
pub fn format_vector(vector: &[f64]) -> String {
    format!("{{{}}}", vector.iter().map(|v| format_value(*v)).join(", "))
}

/// Writes a matrix as a brace-delimited vector of its rows.
pub fn format_matrix(matrix: &Matrix) -> String {
    format!("{{{}}}", (0..matrix.nrows).map(|i| format_vector(matrix.row(i))).join(", "))
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_matrix(self.matrix()))
    }
}

/// An optimal outcome is written as `x`, the objective value and `y` on three lines. An
/// infeasible outcome is written as its certificate `y`, an unbounded outcome as the structural
/// part of its ray.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Optimal(solution) => write!(
                f,
                "{}\n{}\n{}",
                format_vector(&solution.x),
                format_value(solution.objective),
                format_vector(&solution.y)
            ),
            Outcome::Infeasible(certificate) => write!(f, "{}", format_vector(&certificate.y)),
            Outcome::Unbounded(certificate) => write!(f, "{}", format_vector(&certificate.z)),
        }
    }
}
