//! # Tableau simplex
//!
//! Dense tableau simplex solver for linear programs of the form
//!
//! ```text
//! maximize c^T x + d  s.t.  Ax <= b, x >= 0
//! ```
//!
//! An LP is loaded as a tableau whose first row is `[c | d]` and whose remaining rows are the
//! constraints `[A_i | b_i]`. Solving returns either an optimal primal/dual pair, a Farkas
//! certificate of infeasibility, or an unbounded ray.
//!
//! ```
//! use tableaurs::io::parse_tableau;
//! use tableaurs::settings::SimplexSettings;
//! use tableaurs::solver::{solve, Mode};
//! let lp = parse_tableau("3 3\n{{3, 2, 0}, {1, 1, 4}, {1, 0, 2}}").expect("valid input");
//! let report = solve(lp, Mode::TwoPhase, &SimplexSettings::default()).expect("solvable");
//! assert_eq!(report.outcome.to_string(), "{2, 2}\n10\n{2, 1}");
//! ```

pub mod certificate;
pub mod error;
pub mod io;
pub mod linalg;
pub mod pivot;
pub mod settings;
pub mod simplex;
pub mod solver;
pub mod tableau;
pub mod transform;

pub use error::{Error, Result};
pub use settings::SimplexSettings;
pub use simplex::Method;
pub use solver::{solve, Mode, Outcome, Report};
pub use tableau::Tableau;
