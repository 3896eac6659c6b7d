//! # Tableau
//!
//! Dense simplex tableau and the descriptor of its column blocks.
//!
//! Row 0 holds the reduced costs, rows `1..m` the constraints. Columns are laid out as
//!
//! | operations register | structural | slack | artificial | RHS |
//!
//! where every block except the structural one and the RHS may be empty, depending on which
//! transform steps (see [crate::transform]) have been applied.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::linalg::{snap, Matrix};

/// Sizes of the column blocks of a [Tableau].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LpShape {
    /// Number of constraint rows
    pub constraints: usize,
    /// Number of structural (original) variables
    pub variables: usize,
    /// Number of slack columns
    pub slacks: usize,
    /// Number of artificial columns
    pub artificials: usize,
    /// Width of the operations register
    pub register: usize,
}

impl LpShape {
    /// Number of rows, objective row included.
    pub fn m(&self) -> usize {
        self.constraints + 1
    }
    /// Number of columns, RHS included.
    pub fn n(&self) -> usize {
        self.register + self.decision_count() + 1
    }
    /// Number of columns a basis may pick from.
    pub fn decision_count(&self) -> usize {
        self.variables + self.slacks + self.artificials
    }
    pub fn register_columns(&self) -> Range<usize> {
        0..self.register
    }
    /// Structural, slack and artificial columns.
    pub fn decision_columns(&self) -> Range<usize> {
        self.register..self.register + self.decision_count()
    }
    pub fn structural_columns(&self) -> Range<usize> {
        self.register..self.register + self.variables
    }
    pub fn slack_columns(&self) -> Range<usize> {
        let start = self.register + self.variables;
        start..start + self.slacks
    }
    pub fn artificial_columns(&self) -> Range<usize> {
        let start = self.register + self.variables + self.slacks;
        start..start + self.artificials
    }
    pub fn rhs_column(&self) -> usize {
        self.n() - 1
    }
}

/// A linear program in tableau form.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    pub(crate) matrix: Matrix,
    pub(crate) shape: LpShape,
}

impl Tableau {
    /// Loads the linear program
    /// $$ \max \quad c^T x + d \quad s.t. \quad Ax \le b, \ x \ge 0 $$
    /// from rows `[c | d]`, `[A_1 | b_1]`, ..., `[A_{m-1} | b_{m-1}]`.
    ///
    /// The objective row is stored as reduced costs, i.e. as `[-c | d]`.
    ///
    /// # Example:
    ///
    /// ```
    /// use tableaurs::tableau::Tableau;
    /// let tableau = Tableau::from_rows(&[
    ///     vec![3., 2., 0.],
    ///     vec![1., 1., 4.],
    ///     vec![1., 0., 2.],
    /// ]).expect("valid input");
    /// assert_eq!(tableau.row(0), &[-3., -2., 0.]);
    /// assert_eq!((tableau.shape().m(), tableau.shape().n()), (3, 3));
    /// ```
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Tableau> {
        if rows.is_empty() {
            return Err(Error::MalformedInput("the tableau has no objective row".to_string()));
        }
        let mut matrix = Matrix::from_rows(rows)
            .ok_or_else(|| Error::MalformedInput("rows differ in length".to_string()))?;
        if matrix.ncols < 2 {
            return Err(Error::MalformedInput(format!("expected at least one variable and a RHS column, got {} column(s)", matrix.ncols)));
        }
        if let Some(position) = matrix.val.iter().position(|v| !v.is_finite()) {
            return Err(Error::MalformedInput(format!("non-finite value at row {}, column {}", position / matrix.ncols, position % matrix.ncols)));
        }
        let variables = matrix.ncols - 1;
        for j in 0..variables {
            matrix.set(0, j, snap(-matrix.get(0, j)));
        }
        Ok(Tableau {
            shape: LpShape { constraints: matrix.nrows - 1, variables, ..Default::default() },
            matrix,
        })
    }

    pub fn shape(&self) -> &LpShape {
        &self.shape
    }
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix.get(i, j)
    }
    pub fn row(&self, i: usize) -> &[f64] {
        self.matrix.row(i)
    }
    /// Right hand side of row `i`. For row 0 this is the current objective value.
    pub fn rhs(&self, i: usize) -> f64 {
        self.matrix.get(i, self.shape.rhs_column())
    }
    /// Objective value of the basic solution the tableau currently represents.
    pub fn objective_value(&self) -> f64 {
        self.rhs(0)
    }
    /// Constraint rows with a negative right hand side.
    pub fn negative_rhs_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.shape.m()).filter(move |&i| self.rhs(i) < 0.0)
    }
    /// First decision column with a negative reduced cost, with its value.
    pub fn first_negative_reduced_cost(&self) -> Option<(usize, f64)> {
        self.shape.decision_columns()
            .map(|j| (j, self.get(0, j)))
            .find(|&(_, v)| v < 0.0)
    }
    /// Negates every constraint row with a negative right hand side.
    pub fn make_rhs_non_negative(&mut self) {
        let rows: Vec<usize> = self.negative_rhs_rows().collect();
        for i in rows {
            self.matrix.negate_row(i);
        }
    }
    /// Objective coefficients `c`, the structural part of row 0 with its sign restored.
    pub fn objective(&self) -> Vec<f64> {
        self.shape.structural_columns().map(|j| snap(-self.get(0, j))).collect()
    }
    /// Structural constraint coefficients `A`.
    pub fn constraint_matrix(&self) -> Matrix {
        let m = self.shape.m();
        let cols = self.matrix.get_columns(self.shape.structural_columns());
        Matrix { val: cols.val[cols.ncols..].to_vec(), ncols: cols.ncols, nrows: m - 1 }
    }
    /// Right hand side `b` of the constraint rows.
    pub fn rhs_vector(&self) -> Vec<f64> {
        (1..self.shape.m()).map(|i| self.rhs(i)).collect()
    }
}
