//! # Certificates
//!
//! Reads primal solutions, dual solutions and the infeasibility and unboundedness certificates
//! off a terminal tableau. All vectors are indexed like the columns of the tableau with the
//! operations register removed, i.e. structural variables first, then slacks.

use crate::pivot::Basis;
use crate::tableau::Tableau;

/// Optimal primal/dual pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalSolution {
    /// Value of the structural variables
    pub x: Vec<f64>,
    /// Value of the slack variables, $ b - Ax $
    pub slack: Vec<f64>,
    /// Objective value $ c^T x + d $
    pub objective: f64,
    /// Dual values, one per constraint
    pub y: Vec<f64>,
}

/// Farkas certificate: $ y \ge 0 $, $ y^T A \ge 0 $ and $ y^T b < 0 $.
#[derive(Debug, Clone, PartialEq)]
pub struct InfeasibilityCertificate {
    pub y: Vec<f64>,
}

/// Unbounded ray: $ z \ge 0 $, $ Az + slack = 0 $ with $ slack \ge 0 $, and $ c^T z > 0 $.
#[derive(Debug, Clone, PartialEq)]
pub struct UnboundednessCertificate {
    /// Structural part of the ray
    pub z: Vec<f64>,
    /// Slack part of the ray
    pub slack: Vec<f64>,
}

/// Values of the basic solution over all decision columns: basic columns take the RHS of their
/// row, every other column is 0.
pub fn primal_solution(tableau: &Tableau, basis: &Basis) -> Vec<f64> {
    let shape = tableau.shape();
    let mut x = vec![0.0; shape.decision_count()];
    for (i, &column) in basis.columns().iter().enumerate() {
        x[column - shape.register] = tableau.rhs(i + 1);
    }
    x
}

/// The operations register part of row 0, i.e. the dual values once the tableau is canonical.
pub fn dual_solution(tableau: &Tableau) -> Vec<f64> {
    tableau.row(0)[tableau.shape().register_columns()].to_vec()
}

/// The operations register part of constraint row `row`. When the dual simplex stops on a row
/// with a negative RHS and no negative coefficient, this is a Farkas certificate.
pub fn register_row(tableau: &Tableau, row: usize) -> Vec<f64> {
    tableau.row(row)[tableau.shape().register_columns()].to_vec()
}

/// Ray along the entering column `column` returned by an unbounded primal run: 1 at the
/// entering column, minus the column's coefficient at every basic column, 0 elsewhere.
pub fn unboundedness_ray(tableau: &Tableau, basis: &Basis, column: usize) -> Vec<f64> {
    let shape = tableau.shape();
    let mut z = vec![0.0; shape.decision_count()];
    for (i, &basic) in basis.columns().iter().enumerate() {
        let coefficient = tableau.get(i + 1, column);
        if coefficient != 0.0 {
            z[basic - shape.register] = -coefficient;
        }
    }
    z[column - shape.register] = 1.0;
    z
}

impl OptimalSolution {
    /// Extracts the solution from a tableau that is optimal and canonical for `basis`.
    ///
    /// # Example:
    ///
    /// ```
    /// use tableaurs::certificate::OptimalSolution;
    /// use tableaurs::pivot::Basis;
    /// use tableaurs::tableau::Tableau;
    /// let mut t = Tableau::from_rows(&[vec![3., 2., 0.], vec![1., 1., 4.], vec![1., 0., 2.]])
    ///     .expect("valid")
    ///     .to_standard_form()
    ///     .with_operations_register();
    /// let basis = Basis::new(vec![3, 2]);
    /// t.canonicalize(&basis).expect("invertible");
    /// let solution = OptimalSolution::from_tableau(&t, &basis);
    /// assert_eq!(solution.x, vec![2., 2.]);
    /// assert_eq!(solution.objective, 10.);
    /// assert_eq!(solution.y, vec![2., 1.]);
    /// ```
    pub fn from_tableau(tableau: &Tableau, basis: &Basis) -> OptimalSolution {
        let mut x = primal_solution(tableau, basis);
        let slack = x.split_off(tableau.shape().variables);
        OptimalSolution {
            x,
            slack,
            objective: tableau.objective_value(),
            y: dual_solution(tableau),
        }
    }
}

impl InfeasibilityCertificate {
    /// Takes the dual solution of a terminated auxiliary LP whose optimal value is negative.
    pub fn from_auxiliary(auxiliary: &Tableau) -> InfeasibilityCertificate {
        InfeasibilityCertificate { y: dual_solution(auxiliary) }
    }
    /// Takes the register of the row a dual simplex run stopped on.
    pub fn from_row(tableau: &Tableau, row: usize) -> InfeasibilityCertificate {
        InfeasibilityCertificate { y: register_row(tableau, row) }
    }
}

impl UnboundednessCertificate {
    pub fn from_tableau(tableau: &Tableau, basis: &Basis, column: usize) -> UnboundednessCertificate {
        let mut z = unboundedness_ray(tableau, basis, column);
        let slack = z.split_off(tableau.shape().variables);
        UnboundednessCertificate { z, slack }
    }
}
