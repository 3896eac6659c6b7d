//! # Simplex engine
//!
//! Primal and dual simplex on a [Tableau]. Both variants share one loop
//!
//! ```text
//! CANONICALIZING -> SELECT -> PIVOT -> CANONICALIZING -> ... -> OPTIMAL | UNBOUNDED
//! ```
//!
//! and differ only in how the entering column and the leaving row are selected. Selection follows
//! Bland's rule: the lowest eligible index is taken, and ratio ties go to the lowest row (primal)
//! or column (dual).

use log::{debug, info, trace, warn};

use crate::error::{Error, Result};
use crate::pivot::Basis;
use crate::settings::SimplexSettings;
use crate::tableau::Tableau;

/// Simplex variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Keeps the RHS non-negative and drives the reduced costs non-negative
    Primal,
    /// Keeps the reduced costs non-negative and drives the RHS non-negative
    Dual,
}

/// How a simplex run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The tableau is optimal for the final basis
    Optimal,
    /// Primal simplex found an entering column without any positive coefficient
    Unbounded { column: usize },
    /// Dual simplex found a leaving row without any negative coefficient, i.e. the dual is
    /// unbounded and the primal LP is infeasible
    DualUnbounded { row: usize },
}

/// Outcome of a selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Optimal,
    Unbounded { column: usize },
    DualUnbounded { row: usize },
    Pivot { row: usize, column: usize },
}

/// Primal selection on a canonical tableau: the first decision column with a negative reduced
/// cost enters, the row with the smallest ratio `RHS / coefficient` among the rows with a positive
/// coefficient leaves (lowest row on ties).
///
/// # Example:
///
/// ```
/// use tableaurs::simplex::{primal_selection, Selection};
/// use tableaurs::tableau::Tableau;
/// let t = Tableau::from_rows(&[vec![3., 2., 0.], vec![1., 1., 4.], vec![1., 0., 2.]])
///     .expect("valid")
///     .to_standard_form();
/// assert_eq!(primal_selection(&t), Selection::Pivot { row: 2, column: 0 });
/// ```
pub fn primal_selection(tableau: &Tableau) -> Selection {
    let column = match tableau.first_negative_reduced_cost() {
        Some((column, _)) => column,
        None => return Selection::Optimal,
    };
    let leaving = (1..tableau.shape().m())
        .filter(|&i| tableau.get(i, column) > 0.0)
        .map(|i| (i, tableau.rhs(i) / tableau.get(i, column)))
        .min_by(|(_, left), (_, right)| left.total_cmp(right));
    match leaving {
        Some((row, _)) => Selection::Pivot { row, column },
        None => Selection::Unbounded { column },
    }
}

/// Dual selection on a canonical tableau: the first constraint row with a negative RHS leaves, the
/// column with the smallest ratio `reduced cost / -coefficient` among the decision columns with a
/// negative coefficient in that row enters (lowest column on ties).
pub fn dual_selection(tableau: &Tableau) -> Selection {
    let row = match tableau.negative_rhs_rows().next() {
        Some(row) => row,
        None => return Selection::Optimal,
    };
    let entering = tableau.shape().decision_columns()
        .filter(|&j| tableau.get(row, j) < 0.0)
        .map(|j| (j, tableau.get(0, j) / -tableau.get(row, j)))
        .min_by(|(_, left), (_, right)| left.total_cmp(right));
    match entering {
        Some((column, _)) => Selection::Pivot { row, column },
        None => Selection::DualUnbounded { row },
    }
}

impl Method {
    pub fn select(&self, tableau: &Tableau) -> Selection {
        match self {
            Method::Primal => primal_selection(tableau),
            Method::Dual => dual_selection(tableau),
        }
    }
}

/// A simplex run owning its tableau and basis.
///
/// # Example:
///
/// ```
/// use tableaurs::settings::SimplexSettings;
/// use tableaurs::simplex::{Method, Simplex, Termination};
/// use tableaurs::tableau::Tableau;
/// let t = Tableau::from_rows(&[vec![3., 2., 0.], vec![1., 1., 4.], vec![1., 0., 2.]])
///     .expect("valid")
///     .to_standard_form()
///     .with_operations_register();
/// let mut simplex = Simplex::new(t, Method::Primal, SimplexSettings::default());
/// assert_eq!(simplex.run(), Ok(Termination::Optimal));
/// assert_eq!(simplex.tableau().objective_value(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct Simplex {
    tableau: Tableau,
    basis: Option<Basis>,
    method: Method,
    settings: SimplexSettings,
    iterations: usize,
    history: Vec<Tableau>,
}

impl Simplex {
    pub fn new(tableau: Tableau, method: Method, settings: SimplexSettings) -> Simplex {
        Simplex { tableau, basis: None, method, settings, iterations: 0, history: Vec::new() }
    }

    /// Sets the starting basis. Without one the run starts from the slack basis.
    pub fn set_initial_basis(&mut self, basis: Basis) {
        self.basis = Some(basis);
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }
    pub fn basis(&self) -> Option<&Basis> {
        self.basis.as_ref()
    }
    /// Number of pivots performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
    /// Snapshots taken after every canonicalization, if [SimplexSettings::record_history] is set.
    pub fn history(&self) -> &[Tableau] {
        &self.history
    }
    /// Splits the run into its tableau, basis, pivot count and history. A run that never
    /// started reports the slack basis.
    pub fn into_parts(self) -> (Tableau, Basis, usize, Vec<Tableau>) {
        let basis = self.basis.unwrap_or_else(|| Basis::slack(self.tableau.shape()));
        (self.tableau, basis, self.iterations, self.history)
    }

    /// Runs the simplex until it is optimal or unbounded.
    ///
    /// The primal variant first negates constraint rows with a negative RHS and fails with
    /// [Error::MalformedBasis] if the starting basis is still infeasible once canonical. The dual
    /// variant fails with [Error::InvalidSimplexChoice] if the canonical tableau has a negative
    /// reduced cost. Exceeding the iteration limit fails with [Error::DegenerateCycle].
    pub fn run(&mut self) -> Result<Termination> {
        let shape = *self.tableau.shape();
        let limit = self.settings.iteration_limit(&shape);
        let mut basis = self.basis.take().unwrap_or_else(|| Basis::slack(&shape));
        if self.method == Method::Primal {
            self.tableau.make_rhs_non_negative();
        }
        let result = self.iterate(&mut basis, limit);
        self.basis = Some(basis);
        result
    }

    fn iterate(&mut self, basis: &mut Basis, limit: usize) -> Result<Termination> {
        self.canonicalize(basis)?;
        self.check_start(basis)?;
        loop {
            match self.method.select(&self.tableau) {
                Selection::Optimal => {
                    if self.settings.verbose {
                        info!("{:?} simplex optimal after {} pivots, objective {}", self.method, self.iterations, self.tableau.objective_value());
                    }
                    return Ok(Termination::Optimal);
                }
                Selection::Unbounded { column } => {
                    if self.settings.verbose {
                        info!("{:?} simplex unbounded along column {} after {} pivots", self.method, column, self.iterations);
                    }
                    return Ok(Termination::Unbounded { column });
                }
                Selection::DualUnbounded { row } => {
                    if self.settings.verbose {
                        info!("{:?} simplex: row {} proves infeasibility after {} pivots", self.method, row, self.iterations);
                    }
                    return Ok(Termination::DualUnbounded { row });
                }
                Selection::Pivot { row, column } => {
                    if self.iterations >= limit {
                        warn!("{:?} simplex stopped at the iteration limit of {} with basis {}", self.method, limit, basis);
                        return Err(Error::DegenerateCycle { limit });
                    }
                    debug!("pivot {}: column {} enters in row {}, column {} leaves", self.iterations, column, row, basis.column_of_row(row));
                    basis.replace(row, column);
                    self.iterations += 1;
                    self.canonicalize(basis)?;
                }
            }
        }
    }

    fn canonicalize(&mut self, basis: &Basis) -> Result<()> {
        self.tableau.canonicalize(basis)?;
        trace!("canonical for {}: {}", basis, self.tableau);
        if self.settings.record_history {
            self.history.push(self.tableau.clone());
        }
        Ok(())
    }

    fn check_start(&self, basis: &Basis) -> Result<()> {
        match self.method {
            Method::Primal => match self.tableau.negative_rhs_rows().next() {
                Some(row) => Err(Error::MalformedBasis(format!("basis {} is not primal feasible, row {} has RHS {}", basis, row, self.tableau.rhs(row)))),
                None => Ok(()),
            },
            Method::Dual => match self.tableau.first_negative_reduced_cost() {
                Some((column, value)) => Err(Error::InvalidSimplexChoice { column, value }),
                None => Ok(()),
            },
        }
    }
}
