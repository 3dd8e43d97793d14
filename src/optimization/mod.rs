//! optimization — L-BFGS maximizer, numerically stable transforms, and the
//! optimizer error surface.
//!
//! Purpose
//! -------
//! Support the parts of HMM estimation that are not closed-form: emission
//! families whose weighted MLE has to be found numerically, and the shared
//! numeric primitives (softplus/logistic transforms, log-sum-exp, eigenvalue
//! and clamping tolerances) used by the chain and log-domain code.
//!
//! Key behaviors
//! -------------
//! - `loglik_optimizer`: maximize a user log-likelihood `ℓ(θ)` with Argmin's
//!   L-BFGS, analytic or finite-difference gradients, and validated options.
//! - `numerical_stability`: stable scalar transforms and shared tolerances.
//! - `errors`: a single [`OptError`](errors::OptError) enum covering
//!   configuration, objective and backend failures.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; user-facing values
//!   are log-likelihoods.
//! - Numeric kernels never log. Progress output is opt-in through
//!   `MLEOptions::verbose` and the `obs_slog` feature.
//!
//! Downstream usage
//! ----------------
//! - Emission families implement `LogLikelihood` for their weighted
//!   objective and call `maximize`; their error types wrap `OptError`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hmm::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
