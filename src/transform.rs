//! # Tableau transforms
//!
//! Structural steps that widen a tableau before the simplex runs: slack columns for the standard
//! equality form, the operations register, and the Phase-1 auxiliary LP.

use log::debug;

use crate::linalg::{identity_matrix, Matrix};
use crate::tableau::{LpShape, Tableau};

/// Builds a block of `m` rows whose rows `1..m` form an identity matrix and whose row 0 is `objective`.
fn identity_block(m: usize, objective: f64) -> Matrix {
    let identity = identity_matrix(m - 1);
    let mut val = vec![objective; m - 1];
    val.extend(identity.val);
    Matrix { val, ncols: m - 1, nrows: m }
}

impl Tableau {
    /// Converts the LP to standard equality form by inserting one slack column per constraint
    /// right before the RHS column. The slack columns form an identity block on the constraint rows
    /// and have zero cost.
    ///
    /// # Example:
    ///
    /// ```
    /// use tableaurs::tableau::Tableau;
    /// let sef = Tableau::from_rows(&[vec![1., 0.], vec![2., 3.]]).expect("valid").to_standard_form();
    /// assert_eq!(sef.row(0), &[-1., 0., 0.]);
    /// assert_eq!(sef.row(1), &[2., 1., 3.]);
    /// assert_eq!(sef.shape().slacks, 1);
    /// ```
    pub fn to_standard_form(self) -> Tableau {
        let m = self.shape.m();
        let matrix = self.matrix.insert_columns(self.shape.rhs_column(), &identity_block(m, 0.0));
        let shape = LpShape { slacks: self.shape.slacks + m - 1, ..self.shape };
        debug!("standard equality form: {} rows, {} columns", shape.m(), shape.n());
        Tableau { matrix, shape }
    }

    /// Prepends the operations register: an identity block on the constraint rows with zeros in
    /// row 0. Every later row operation is applied to the register as well, so once the tableau is
    /// canonical for a basis, the register part of row 0 holds the dual values.
    ///
    /// # Example:
    ///
    /// ```
    /// use tableaurs::tableau::Tableau;
    /// let t = Tableau::from_rows(&[vec![1., 0.], vec![2., 3.]]).expect("valid")
    ///     .to_standard_form()
    ///     .with_operations_register();
    /// assert_eq!(t.row(0), &[0., -1., 0., 0.]);
    /// assert_eq!(t.row(1), &[1., 2., 1., 3.]);
    /// ```
    pub fn with_operations_register(self) -> Tableau {
        let m = self.shape.m();
        let matrix = self.matrix.insert_columns(0, &identity_block(m, 0.0));
        let shape = LpShape { register: self.shape.register + m - 1, ..self.shape };
        debug!("operations register added: {} rows, {} columns", shape.m(), shape.n());
        Tableau { matrix, shape }
    }

    /// Builds the Phase-1 auxiliary LP on a copy of the tableau.
    ///
    /// Constraint rows with a negative RHS are negated, one artificial column per constraint is
    /// inserted before the RHS (identity on the constraint rows) and row 0 is replaced by the
    /// artificial costs: 1 above each artificial column and 0 elsewhere. Maximizing this objective
    /// reaches 0 if and only if the original LP is feasible.
    ///
    /// Panics if the tableau is not in standard equality form with an operations register, or if it
    /// already carries artificial columns.
    pub fn auxiliary(&self) -> Tableau {
        assert!(
            self.shape.slacks == self.shape.constraints && self.shape.register == self.shape.constraints && self.shape.artificials == 0,
            "the auxiliary LP is built from a standard form tableau with an operations register"
        );
        let m = self.shape.m();
        let mut copy = self.clone();
        copy.make_rhs_non_negative();
        for v in copy.matrix.row_mut(0) {
            *v = 0.0;
        }
        let matrix = copy.matrix.insert_columns(self.shape.rhs_column(), &identity_block(m, 1.0));
        let shape = LpShape { artificials: m - 1, ..self.shape };
        debug!("auxiliary LP: {} rows, {} columns", shape.m(), shape.n());
        Tableau { matrix, shape }
    }
}
