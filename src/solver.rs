//! # Solver
//!
//! Drives a loaded LP through the transforms and simplex runs. An LP is solved either in two
//! phases, where an auxiliary LP finds a feasible basis first, or with an explicitly chosen
//! simplex variant.
//!

use log::{debug, info};

use crate::certificate::{InfeasibilityCertificate, OptimalSolution, UnboundednessCertificate};
use crate::error::{Error, Result};
use crate::pivot::Basis;
use crate::settings::SimplexSettings;
use crate::simplex::{Method, Simplex, Termination};
use crate::tableau::Tableau;

/// How the solver looks for a feasible starting basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Phase 1 on the auxiliary LP, then the primal simplex from the basis it finds
    TwoPhase,
    /// Run the given simplex variant. The primal variant falls back on Phase 1 only when the slack
    /// basis is infeasible; the dual variant starts from the slack basis and needs non-negative
    /// reduced costs there.
    Explicit(Method),
}

/// Result of solving an LP.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Optimal(OptimalSolution),
    Infeasible(InfeasibilityCertificate),
    Unbounded(UnboundednessCertificate),
}

/// Outcome of [solve] together with the final state of the last simplex run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub outcome: Outcome,
    /// Pivots performed over all phases
    pub iterations: usize,
    /// Final tableau. For an LP found infeasible in Phase 1 this is the auxiliary tableau.
    pub tableau: Tableau,
    /// Basis the final tableau is canonical for
    pub basis: Basis,
    /// Tableau snapshots of all phases, if [SimplexSettings::record_history] is set
    pub history: Vec<Tableau>,
}

enum PhaseOne {
    Feasible(Basis),
    Infeasible { tableau: Tableau, basis: Basis },
}

/// Bookkeeping shared by the simplex runs of one solve.
struct Phases<'a> {
    settings: &'a SimplexSettings,
    iterations: usize,
    history: Vec<Tableau>,
}

impl<'a> Phases<'a> {
    fn run(&mut self, tableau: Tableau, method: Method, basis: Option<Basis>) -> Result<(Termination, Tableau, Basis)> {
        let mut simplex = Simplex::new(tableau, method, self.settings.clone());
        if let Some(basis) = basis {
            simplex.set_initial_basis(basis);
        }
        let result = simplex.run();
        let (tableau, basis, iterations, history) = simplex.into_parts();
        self.iterations += iterations;
        self.history.extend(history);
        Ok((result?, tableau, basis))
    }

    fn phase_one(&mut self, sef: &Tableau) -> Result<PhaseOne> {
        let auxiliary = sef.auxiliary();
        let start = Basis::artificial(auxiliary.shape());
        let (termination, mut auxiliary, mut basis) = self.run(auxiliary, Method::Primal, Some(start))?;
        if termination != Termination::Optimal {
            unreachable!("the auxiliary LP is bounded by 0 but ended with {:?}", termination);
        }
        if auxiliary.objective_value() < 0.0 {
            if self.settings.verbose {
                info!("Phase 1 optimum {} is negative, the LP is infeasible", auxiliary.objective_value());
            }
            return Ok(PhaseOne::Infeasible { tableau: auxiliary, basis });
        }
        drive_out_artificials(&mut auxiliary, &mut basis)?;
        if self.settings.verbose {
            info!("Phase 1 found the feasible basis {}", basis);
        }
        Ok(PhaseOne::Feasible(basis))
    }

    fn report(self, termination: Termination, tableau: Tableau, basis: Basis) -> Report {
        let outcome = match termination {
            Termination::Optimal => Outcome::Optimal(OptimalSolution::from_tableau(&tableau, &basis)),
            Termination::Unbounded { column } => Outcome::Unbounded(UnboundednessCertificate::from_tableau(&tableau, &basis, column)),
            Termination::DualUnbounded { row } => Outcome::Infeasible(InfeasibilityCertificate::from_row(&tableau, row)),
        };
        Report { outcome, iterations: self.iterations, tableau, basis, history: self.history }
    }
}

/// Pivots every artificial column still basic after Phase 1 out of the basis. Such a column has
/// value 0, so any non-artificial column with a nonzero entry in its row can replace it without
/// changing the basic solution.
fn drive_out_artificials(auxiliary: &mut Tableau, basis: &mut Basis) -> Result<()> {
    let shape = *auxiliary.shape();
    let artificial = shape.artificial_columns();
    for row in 1..shape.m() {
        let leaving = basis.column_of_row(row);
        if !artificial.contains(&leaving) {
            continue;
        }
        let entering = (shape.register..artificial.start)
            .find(|&j| auxiliary.get(row, j) != 0.0)
            .ok_or_else(|| Error::MalformedBasis(format!("artificial column {} cannot leave row {}", leaving, row)))?;
        debug!("driving artificial column {} out of row {} for column {}", leaving, row, entering);
        basis.replace(row, entering);
        auxiliary.canonicalize(basis)?;
    }
    Ok(())
}

/// Solves the LP held by a tableau fresh from [Tableau::from_rows].
///
/// Fails with [Error::MalformedInput] if the tableau was already transformed, with
/// [Error::InvalidSimplexChoice] if the dual simplex is chosen for an LP with a negative reduced
/// cost at the slack basis, and with [Error::DegenerateCycle] if a run exceeds the iteration limit.
///
/// # Example:
///
/// ```
/// use tableaurs::settings::SimplexSettings;
/// use tableaurs::solver::{solve, Mode, Outcome};
/// use tableaurs::tableau::Tableau;
/// // maximize 3x1 + 2x2 s.t. x1 + x2 <= 4, x1 <= 2
/// let lp = Tableau::from_rows(&[vec![3., 2., 0.], vec![1., 1., 4.], vec![1., 0., 2.]]).expect("valid");
/// let report = solve(lp, Mode::TwoPhase, &SimplexSettings::default()).expect("solvable");
/// match report.outcome {
///     Outcome::Optimal(solution) => {
///         assert_eq!(solution.x, vec![2., 2.]);
///         assert_eq!(solution.objective, 10.);
///         assert_eq!(solution.y, vec![2., 1.]);
///     }
///     _ => panic!("expected an optimal solution"),
/// }
/// ```
pub fn solve(lp: Tableau, mode: Mode, settings: &SimplexSettings) -> Result<Report> {
    let shape = *lp.shape();
    if shape.slacks != 0 || shape.artificials != 0 || shape.register != 0 {
        return Err(Error::MalformedInput(format!("expected a freshly loaded tableau, got one shaped {:?}", shape)));
    }
    let sef = lp.to_standard_form().with_operations_register();
    let mut phases = Phases { settings, iterations: 0, history: Vec::new() };
    let start = match mode {
        Mode::Explicit(Method::Dual) => {
            let (termination, tableau, basis) = phases.run(sef, Method::Dual, None)?;
            return Ok(phases.report(termination, tableau, basis));
        }
        Mode::Explicit(Method::Primal) if sef.negative_rhs_rows().next().is_none() => {
            if settings.verbose {
                info!("the slack basis is feasible, skipping Phase 1");
            }
            None
        }
        Mode::Explicit(Method::Primal) | Mode::TwoPhase => match phases.phase_one(&sef)? {
            PhaseOne::Feasible(basis) => Some(basis),
            PhaseOne::Infeasible { tableau, basis } => {
                let certificate = InfeasibilityCertificate::from_auxiliary(&tableau);
                return Ok(Report {
                    outcome: Outcome::Infeasible(certificate),
                    iterations: phases.iterations,
                    tableau,
                    basis,
                    history: phases.history,
                });
            }
        },
    };
    let (termination, tableau, basis) = phases.run(sef, Method::Primal, start)?;
    Ok(phases.report(termination, tableau, basis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::Matrix;
    use approx::assert_abs_diff_eq;
    use itertools::iproduct;

    const TOLERANCE: f64 = 1e-6;

    fn load(rows: &[Vec<f64>]) -> Tableau {
        Tableau::from_rows(rows).expect("valid input")
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn assert_close(given: &[f64], expected: &[f64]) {
        assert_eq!(given.len(), expected.len());
        for (g, e) in given.iter().zip(expected) {
            assert_abs_diff_eq!(*g, *e, epsilon = 1e-9);
        }
    }

    fn optimal(report: &Report) -> &OptimalSolution {
        match &report.outcome {
            Outcome::Optimal(solution) => solution,
            outcome => panic!("expected an optimal solution, got {:?}", outcome),
        }
    }

    fn column(x: &[f64]) -> Matrix {
        Matrix { val: x.to_vec(), ncols: 1, nrows: x.len() }
    }

    fn inner(left: &[f64], right: &[f64]) -> f64 {
        left.iter().zip(right).map(|(l, r)| l * r).sum()
    }

    /// Checks the outcome of `report` against the LP `lp` was loaded from.
    fn verify(lp: &Tableau, report: &Report) {
        let a = lp.constraint_matrix();
        let b = lp.rhs_vector();
        let c = lp.objective();
        match &report.outcome {
            Outcome::Optimal(solution) => {
                let ax = a.dot(&column(&solution.x)).val;
                for i in 0..b.len() {
                    assert_abs_diff_eq!(ax[i] + solution.slack[i], b[i], epsilon = TOLERANCE);
                }
                assert!(solution.x.iter().chain(&solution.slack).all(|&v| v >= -TOLERANCE));
                assert_abs_diff_eq!(inner(&c, &solution.x), solution.objective, epsilon = TOLERANCE);
                assert_abs_diff_eq!(inner(&solution.y, &b), solution.objective, epsilon = TOLERANCE);
                assert!(solution.y.iter().all(|&v| v >= -TOLERANCE));
                let ya = a.transpose().dot(&column(&solution.y)).val;
                assert!(ya.iter().zip(&c).all(|(&l, &r)| l >= r - TOLERANCE));
            }
            Outcome::Infeasible(certificate) => {
                assert_eq!(certificate.y.len(), b.len());
                assert!(certificate.y.iter().all(|&v| v >= -TOLERANCE));
                let ya = a.transpose().dot(&column(&certificate.y)).val;
                assert!(ya.iter().all(|&v| v >= -TOLERANCE));
                assert!(inner(&certificate.y, &b) < -TOLERANCE);
            }
            Outcome::Unbounded(certificate) => {
                assert!(certificate.z.iter().chain(&certificate.slack).all(|&v| v >= -TOLERANCE));
                let az = a.dot(&column(&certificate.z)).val;
                for i in 0..b.len() {
                    assert_abs_diff_eq!(az[i] + certificate.slack[i], 0.0, epsilon = TOLERANCE);
                }
                assert!(inner(&c, &certificate.z) > TOLERANCE);
            }
        }
    }

    #[test]
    fn test_optimal_two_phase() {
        init_logger();
        let lp = load(&[vec![3.0, 2.0, 0.0], vec![1.0, 1.0, 4.0], vec![1.0, 0.0, 2.0]]);
        let settings = SimplexSettings { verbose: true, ..Default::default() };
        let report = solve(lp.clone(), Mode::TwoPhase, &settings).expect("solvable");
        let solution = optimal(&report);
        assert_close(&solution.x, &[2.0, 2.0]);
        assert_close(&solution.slack, &[0.0, 0.0]);
        assert_close(&solution.y, &[2.0, 1.0]);
        assert_abs_diff_eq!(solution.objective, 10.0);
        assert!(report.tableau.is_canonical(&report.basis));
        assert_eq!(report.tableau.shape().artificials, 0);
        verify(&lp, &report);
    }

    #[test]
    fn test_optimal_explicit_primal_skips_phase_one() {
        let lp = load(&[vec![3.0, 2.0, 0.0], vec![1.0, 1.0, 4.0], vec![1.0, 0.0, 2.0]]);
        let settings = SimplexSettings { record_history: true, ..Default::default() };
        let report = solve(lp, Mode::Explicit(Method::Primal), &settings).expect("solvable");
        assert_eq!(report.iterations, 2);
        assert_eq!(report.basis, Basis::new(vec![3, 2]));
        // one snapshot for the slack basis and one per pivot, none from an auxiliary LP
        assert_eq!(report.history.len(), 3);
        assert!(report.history.iter().all(|t| t.shape().artificials == 0));
        assert_abs_diff_eq!(optimal(&report).objective, 10.0);
    }

    #[test]
    fn test_objective_constant_is_carried() {
        let lp = load(&[vec![3.0, 2.0, 5.0], vec![1.0, 1.0, 4.0], vec![1.0, 0.0, 2.0]]);
        let report = solve(lp, Mode::TwoPhase, &SimplexSettings::default()).expect("solvable");
        assert_abs_diff_eq!(optimal(&report).objective, 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_infeasible() {
        // x1 + x2 <= -1
        let lp = load(&[vec![0.0, 0.0, 0.0], vec![1.0, 1.0, -1.0]]);
        for mode in [Mode::TwoPhase, Mode::Explicit(Method::Primal), Mode::Explicit(Method::Dual)] {
            let report = solve(lp.clone(), mode, &SimplexSettings::default()).expect("solvable");
            match &report.outcome {
                Outcome::Infeasible(certificate) => assert_close(&certificate.y, &[1.0]),
                outcome => panic!("expected infeasible in {:?}, got {:?}", mode, outcome),
            }
            verify(&lp, &report);
        }
    }

    #[test]
    fn test_infeasible_report_keeps_auxiliary_tableau() {
        let lp = load(&[vec![0.0, 0.0, 0.0], vec![1.0, 1.0, -1.0]]);
        let report = solve(lp, Mode::TwoPhase, &SimplexSettings::default()).expect("solvable");
        assert_eq!(report.tableau.shape().artificials, 1);
        assert_eq!(report.basis, Basis::new(vec![4]));
        assert_eq!(report.iterations, 0);
        assert_abs_diff_eq!(report.tableau.objective_value(), -1.0);
    }

    #[test]
    fn test_unbounded() {
        // maximize x1 s.t. x1 - x2 <= 1
        let lp = load(&[vec![1.0, 0.0, 0.0], vec![1.0, -1.0, 1.0]]);
        for mode in [Mode::TwoPhase, Mode::Explicit(Method::Primal)] {
            let report = solve(lp.clone(), mode, &SimplexSettings::default()).expect("solvable");
            match &report.outcome {
                Outcome::Unbounded(certificate) => {
                    assert_close(&certificate.z, &[1.0, 1.0]);
                    assert_close(&certificate.slack, &[0.0]);
                }
                outcome => panic!("expected unbounded in {:?}, got {:?}", mode, outcome),
            }
            verify(&lp, &report);
        }
    }

    #[test]
    fn test_degenerate_tie_is_reproducible() {
        // maximize 2x1 + x2 s.t. x1 <= 2, x1 + x2 <= 2
        let lp = load(&[vec![2.0, 1.0, 0.0], vec![1.0, 0.0, 2.0], vec![1.0, 1.0, 2.0]]);
        let settings = SimplexSettings { record_history: true, ..Default::default() };
        for mode in [Mode::TwoPhase, Mode::Explicit(Method::Primal)] {
            let first = solve(lp.clone(), mode, &settings).expect("solvable");
            let second = solve(lp.clone(), mode, &settings).expect("solvable");
            assert_eq!(first, second);
            assert_eq!(first.basis, Basis::new(vec![2, 3]));
            let solution = optimal(&first);
            assert_close(&solution.x, &[2.0, 0.0]);
            assert_abs_diff_eq!(solution.objective, 4.0);
            verify(&lp, &first);
        }
    }

    #[test]
    fn test_negative_rhs_needs_phase_one() {
        // maximize x1 s.t. -x1 <= -1, x1 <= 3
        let lp = load(&[vec![1.0, 0.0], vec![-1.0, -1.0], vec![1.0, 3.0]]);
        for mode in [Mode::TwoPhase, Mode::Explicit(Method::Primal)] {
            let report = solve(lp.clone(), mode, &SimplexSettings::default()).expect("solvable");
            let solution = optimal(&report);
            assert_close(&solution.x, &[3.0]);
            assert_close(&solution.slack, &[2.0, 0.0]);
            assert_close(&solution.y, &[0.0, 1.0]);
            assert_abs_diff_eq!(solution.objective, 3.0);
            verify(&lp, &report);
        }
    }

    #[test]
    fn test_dual_optimal() {
        // minimize x1 + x2 s.t. x1 + 2x2 >= 2, 2x1 + x2 >= 2
        let lp = load(&[vec![-1.0, -1.0, 0.0], vec![-1.0, -2.0, -2.0], vec![-2.0, -1.0, -2.0]]);
        let dual = solve(lp.clone(), Mode::Explicit(Method::Dual), &SimplexSettings::default()).expect("solvable");
        let solution = optimal(&dual);
        assert_close(&solution.x, &[2.0 / 3.0, 2.0 / 3.0]);
        assert_close(&solution.y, &[1.0 / 3.0, 1.0 / 3.0]);
        assert_abs_diff_eq!(solution.objective, -4.0 / 3.0, epsilon = 1e-9);
        verify(&lp, &dual);
        let primal = solve(lp.clone(), Mode::TwoPhase, &SimplexSettings::default()).expect("solvable");
        assert_abs_diff_eq!(optimal(&primal).objective, -4.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dual_rejects_negative_reduced_costs() {
        let lp = load(&[vec![3.0, 2.0, 0.0], vec![1.0, 1.0, 4.0], vec![1.0, 0.0, 2.0]]);
        let result = solve(lp, Mode::Explicit(Method::Dual), &SimplexSettings::default());
        assert_eq!(result, Err(Error::InvalidSimplexChoice { column: 2, value: -3.0 }));
    }

    #[test]
    fn test_rejects_transformed_tableau() {
        let lp = load(&[vec![3.0, 2.0, 0.0], vec![1.0, 1.0, 4.0]]).to_standard_form();
        assert!(matches!(solve(lp, Mode::TwoPhase, &SimplexSettings::default()), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_iteration_limit() {
        let lp = load(&[vec![3.0, 2.0, 0.0], vec![1.0, 1.0, 4.0], vec![1.0, 0.0, 2.0]]);
        let settings = SimplexSettings { max_iterations: Some(1), ..Default::default() };
        let result = solve(lp, Mode::Explicit(Method::Primal), &settings);
        assert_eq!(result, Err(Error::DegenerateCycle { limit: 1 }));
    }

    #[test]
    fn test_klee_minty() {
        // maximize 4x1 + 2x2 + x3 s.t. x1 <= 5, 4x1 + x2 <= 25, 8x1 + 4x2 + x3 <= 125
        let lp = load(&[
            vec![4.0, 2.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0, 5.0],
            vec![4.0, 1.0, 0.0, 25.0],
            vec![8.0, 4.0, 1.0, 125.0],
        ]);
        for mode in [Mode::TwoPhase, Mode::Explicit(Method::Primal)] {
            let report = solve(lp.clone(), mode, &SimplexSettings::default()).expect("solvable");
            let solution = optimal(&report);
            assert_close(&solution.x, &[0.0, 0.0, 125.0]);
            assert_abs_diff_eq!(solution.objective, 125.0, epsilon = 1e-9);
            verify(&lp, &report);
        }
    }

    #[test]
    fn test_small_lp_grid() {
        init_logger();
        let entries = [-1.0, 0.0, 2.0];
        let rhs = [-1.0, 2.0];
        let costs = [-1.0, 0.0, 1.0];
        let settings = SimplexSettings::default();
        for (a11, a12, a21, a22) in iproduct!(entries, entries, entries, entries) {
            for ((b1, b2), (c1, c2)) in iproduct!(iproduct!(rhs, rhs), iproduct!(costs, costs)) {
                let lp = load(&[vec![c1, c2, 0.0], vec![a11, a12, b1], vec![a21, a22, b2]]);
                let two_phase = solve(lp.clone(), Mode::TwoPhase, &settings).expect("terminates");
                verify(&lp, &two_phase);
                let primal = solve(lp.clone(), Mode::Explicit(Method::Primal), &settings).expect("terminates");
                verify(&lp, &primal);
                let mut reports = vec![primal];
                if c1 <= 0.0 && c2 <= 0.0 {
                    let dual = solve(lp.clone(), Mode::Explicit(Method::Dual), &settings).expect("terminates");
                    verify(&lp, &dual);
                    reports.push(dual);
                }
                for report in &reports {
                    match (&two_phase.outcome, &report.outcome) {
                        (Outcome::Optimal(left), Outcome::Optimal(right)) => {
                            assert_abs_diff_eq!(left.objective, right.objective, epsilon = TOLERANCE)
                        }
                        (Outcome::Infeasible(_), Outcome::Infeasible(_)) => {}
                        (Outcome::Unbounded(_), Outcome::Unbounded(_)) => {}
                        (left, right) => panic!("modes disagree on {:?}: {:?} and {:?}", lp, left, right),
                    }
                }
            }
        }
    }
}
