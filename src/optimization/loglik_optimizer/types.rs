//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Canonical aliases for parameter vectors, gradients and costs (`Theta`,
//! `Grad`, `Cost`), the Argmin function-evaluation counter map
//! (`FnEvalMap`), and pre-wired L-BFGS solver aliases for both line
//! searches. Everything is `f64` over `ndarray`; `Cost` is the negated
//! log-likelihood seen by Argmin.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, same length as `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value; Argmin sees `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
