//! # Canonical form
//!
//! The basis type and the pivot operator bringing a tableau into canonical form for a basis:
//! every basic column becomes a unit vector with its 1 in the row the basis assigns it to,
//! and a 0 in every other row, objective row included.

use std::fmt;

use log::trace;

use crate::error::{Error, Result};
use crate::tableau::{LpShape, Tableau};

/// Basic column per constraint row. `columns[i]` is basic in row `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basis {
    columns: Vec<usize>,
}

impl Basis {
    pub fn new(columns: Vec<usize>) -> Basis {
        Basis { columns }
    }
    /// The slack columns, canonical right after [Tableau::to_standard_form].
    pub fn slack(shape: &LpShape) -> Basis {
        Basis::new(shape.slack_columns().collect())
    }
    /// The artificial columns, the starting basis of the auxiliary LP.
    pub fn artificial(shape: &LpShape) -> Basis {
        Basis::new(shape.artificial_columns().collect())
    }
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }
    pub fn len(&self) -> usize {
        self.columns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
    /// Basic column of constraint row `row` (1-based, row 0 being the objective).
    pub fn column_of_row(&self, row: usize) -> usize {
        self.columns[row - 1]
    }
    /// Makes `column` basic in constraint row `row` (1-based).
    pub fn replace(&mut self, row: usize, column: usize) {
        self.columns[row - 1] = column;
    }
    pub fn contains(&self, column: usize) -> bool {
        self.columns.contains(&column)
    }

    fn validate(&self, shape: &LpShape) -> Result<()> {
        if self.columns.len() != shape.constraints {
            return Err(Error::MalformedBasis(format!("expected {} basic columns, got {}", shape.constraints, self.columns.len())));
        }
        let decision = shape.decision_columns();
        match self.columns.iter().find(|j| !decision.contains(j)) {
            Some(j) => Err(Error::MalformedBasis(format!("column {} is outside the decision columns {:?}", j, decision))),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.columns)
    }
}

impl Tableau {
    /// Brings the tableau into canonical form for `basis` by Gauss-Jordan elimination.
    ///
    /// For each constraint row the pivot entry in its basic column is made nonzero (by adding a
    /// later row when it is zero), scaled to 1, and eliminated from all other rows. Entries that
    /// fall below [crate::linalg::EPSILON] are snapped to zero. Running it again on a canonical
    /// tableau changes nothing.
    ///
    /// Fails with [Error::MalformedBasis] if the basis does not fit the tableau or its columns are
    /// linearly dependent.
    ///
    /// # Example:
    ///
    /// ```
    /// use tableaurs::pivot::Basis;
    /// use tableaurs::tableau::Tableau;
    /// let mut t = Tableau::from_rows(&[vec![3., 2., 0.], vec![1., 1., 4.], vec![1., 0., 2.]])
    ///     .expect("valid")
    ///     .to_standard_form();
    /// let basis = Basis::new(vec![1, 0]);
    /// t.canonicalize(&basis).expect("basis is invertible");
    /// assert_eq!(t.row(0), &[0., 0., 2., 1., 10.]);
    /// assert!(t.is_canonical(&basis));
    /// ```
    pub fn canonicalize(&mut self, basis: &Basis) -> Result<()> {
        basis.validate(&self.shape)?;
        let m = self.shape.m();
        for (i, &column) in basis.columns.iter().enumerate() {
            let row = i + 1;
            if self.get(row, column) == 0.0 {
                let replacement = ((row + 1)..m).find(|&k| self.get(k, column) != 0.0).ok_or_else(|| {
                    Error::MalformedBasis(format!("no pivot for column {} in row {}, the basis {} is singular", column, row, basis))
                })?;
                trace!("adding row {} to row {} to pivot on column {}", replacement, row, column);
                self.matrix.add_scaled_row(row, replacement, 1.0);
            }
            let pivot = self.get(row, column);
            if pivot != 1.0 {
                self.matrix.scale_row(row, 1.0 / pivot);
                // scaling may leave the pivot one ulp away from 1
                self.matrix.set(row, column, 1.0);
            }
            for j in (0..m).filter(|&j| j != row) {
                let factor = self.get(j, column);
                if factor != 0.0 {
                    self.matrix.add_scaled_row(j, row, -factor);
                    self.matrix.set(j, column, 0.0);
                }
            }
        }
        Ok(())
    }

    /// Whether every basic column is a unit vector in its row.
    pub fn is_canonical(&self, basis: &Basis) -> bool {
        basis.len() == self.shape.constraints
            && basis.columns.iter().enumerate().all(|(i, &column)| {
                (0..self.shape.m()).all(|j| self.get(j, column) == if j == i + 1 { 1.0 } else { 0.0 })
            })
    }
}
