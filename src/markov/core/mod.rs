//! core — discrete-time Markov chain model, counts, prior, and fitting.
//!
//! Purpose
//! -------
//! Collect the building blocks of the transition model of an HMM: the chain
//! itself, the Dirichlet-conjugate prior, the sufficient-statistics
//! accumulator, probability constructors, and validation helpers. The HMM
//! layer builds on these and reuses the same fitting code for its M-step.
//!
//! Key behaviors
//! -------------
//! - [`DiscreteMarkovChain`] validates `(p0, P)` once, then offers
//!   simulation, path log-likelihoods, the stationary distribution and
//!   MLE/MAP fitting (split across `chain`, `stationary` and `fit`).
//! - [`DiscreteMarkovChainStats`] accumulates observed or expected counts
//!   additively and merges per-sequence accumulators.
//! - [`DiscreteMarkovChainPrior`] evaluates and samples Dirichlet priors and
//!   drives MAP estimation under the posterior-mode convention.
//! - Stateless constructors build uniform or random probability vectors and
//!   stochastic matrices.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every chain that exists satisfies the probability axioms within the
//!   tolerance of its numeric representation.
//! - States are `usize` in `0..S`; sequences are slices of states.
//!
//! Conventions
//! -----------
//! - All probability-valued objects are generic over
//!   [`Probability`](crate::numerics::Probability) with `f64` as default;
//!   Dirichlet concentrations are always linear `f64`.
//! - No I/O and no logging; failures are reported as
//!   [`ChainError`](crate::markov::errors::ChainError).
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own behavior. Statistical
//!   recovery of simulated chains and the stationary scenario are repeated
//!   end to end in the crate's integration tests.

pub mod chain;
pub mod constructors;
pub mod fit;
pub mod prior;
pub mod stationary;
pub mod stats;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::chain::DiscreteMarkovChain;
pub use self::constructors::{rand_prob_vec, rand_trans_mat, uniform_prob_vec, uniform_trans_mat};
pub use self::prior::DiscreteMarkovChainPrior;
pub use self::stats::DiscreteMarkovChainStats;
pub use self::validation::{
    is_prob_vec, is_trans_mat, validate_concentration_mat, validate_concentration_vec,
    validate_prob_vec, validate_state_sequences, validate_states, validate_trans_mat,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hmm::markov::core::prelude::*;
//
// to import the main chain surface in a single line.

pub mod prelude {
    pub use super::chain::DiscreteMarkovChain;
    pub use super::constructors::{
        rand_prob_vec, rand_trans_mat, uniform_prob_vec, uniform_trans_mat,
    };
    pub use super::prior::DiscreteMarkovChainPrior;
    pub use super::stats::DiscreteMarkovChainStats;
}
