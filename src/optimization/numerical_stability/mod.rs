//! numerical_stability — numerically robust scalar transforms and tolerances.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms plus the small shared
//! tolerances used across the crate, so that emission fitting, chain
//! analysis and log-domain arithmetic can assume well-conditioned `f64`
//! arithmetic.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, its inverse, and
//!   `safe_logistic`) for mapping unconstrained reals into strictly
//!   positive parameters without overflow/underflow, together with the
//!   derivative needed for chain-rule gradients.
//! - Provide a max-shifted `log_sum_exp` used by log-domain probability
//!   arithmetic.
//! - Centralize numeric tolerances (`EIGEN_EPS`, `GENERAL_TOL`) so
//!   downstream modules share consistent guards and clamping behavior.
//!
//! Invariants & assumptions
//! ------------------------
//! - All public transforms assume finite `f64` inputs unless documented
//!   otherwise; domain validation is enforced by the callers.
//!
//! Conventions
//! -----------
//! - This module never logs, performs I/O, or touches global state; it is
//!   pure numerical helpers suitable for use inside tight inner loops.
//!
//! Downstream usage
//! ----------------
//! - Weighted MLE for positive-parameter emission families maps
//!   optimizer-space `θ` through `safe_softplus` and back-propagates
//!   gradients with `safe_logistic`.
//! - `LogProb` addition is a two-term `log_sum_exp`.
//! - Stationary-distribution code uses `EIGEN_EPS` for ergodicity checks and
//!   `GENERAL_TOL` to clamp rounding noise.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] cover agreement of stable transforms
//!   with naïve formulas on safe grids, tail behavior, and the degenerate
//!   inputs of `log_sum_exp`.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, GENERAL_TOL, log_sum_exp, safe_logistic, safe_softplus, safe_softplus_inv,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hmm::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, GENERAL_TOL, log_sum_exp, safe_logistic, safe_softplus, safe_softplus_inv,
    };
}
