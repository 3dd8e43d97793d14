//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Maximize log-likelihoods `ℓ(θ)` that have no closed-form maximizer. In
//! this crate that is the weighted M-step of emission families such as the
//! Weibull: the emission implements [`LogLikelihood`] over its weighted
//! samples and calls [`maximize`] from its current parameters.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the Argmin cost
//!   `c(θ) = -ℓ(θ)`, negating analytic gradients or falling back to finite
//!   differences of the cost.
//! - [`maximize`] validates the start with [`LogLikelihood::check`], builds
//!   L-BFGS with the configured line search ([`builders`]) and runs it
//!   ([`run::run_lbfgs`]), returning an [`OptimOutcome`].
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`]; mapping to
//!   constrained model parameters happens in the model layer (typically via
//!   `safe_softplus`).
//! - [`OptimOutcome::value`] is a log-likelihood, never a cost.
//! - Errors bubble up as [`OptResult<T>`](crate::optimization::errors::OptResult).
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions and the FD fallback ([`adapter`]),
//!   solver construction ([`builders`]), configuration rules ([`traits`]),
//!   and end-to-end maximization of toy objectives ([`api`]). Emission
//!   tests exercise the optimizer on real weighted fits.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hmm::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
