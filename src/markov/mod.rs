//! markov — discrete-time Markov chains (the HMM transition model).
//!
//! Purpose
//! -------
//! Provide a validated, immutable discrete Markov chain with simulation,
//! path log-likelihoods, stationary-distribution analysis and MLE/MAP
//! estimation from state sequences or accumulated (expected) counts.
//!
//! Key behaviors
//! -------------
//! - Fitting always builds a new chain; existing chains are never mutated.
//! - MAP estimation uses the Dirichlet posterior mode, so the flat
//!   (all-ones) prior coincides with MLE.
//! - Unvisited predecessor rows fall back to uniform rows; a zero
//!   initialization total is an error.
//! - Non-ergodic chains are detected before solving for a stationary
//!   distribution.
//!
//! Conventions
//! -----------
//! - The numeric representation is a type parameter (`f64`, `f32` or
//!   [`LogProb`](crate::numerics::LogProb)); conversions go through logs.
//! - Indices are 0-based; error variants carry the offending index/value.
//!
//! Downstream usage
//! ----------------
//! - Standalone chain estimation:
//!   `DiscreteMarkovChain::<f64>::fit_mle(&sequences)`.
//! - The HMM M-step calls
//!   [`DiscreteMarkovChain::fit_mle_from_stats`] /
//!   [`DiscreteMarkovChain::fit_map_from_stats`] on expected counts
//!   accumulated by forward-backward.

pub mod core;
pub mod errors;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    DiscreteMarkovChain, DiscreteMarkovChainPrior, DiscreteMarkovChainStats, rand_prob_vec,
    rand_trans_mat, uniform_prob_vec, uniform_trans_mat,
};

pub use self::errors::{ChainError, ChainResult};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hmm::markov::prelude::*;
//
// to import the main Markov-chain surface in a single line.

pub mod prelude {
    pub use super::{
        ChainError, ChainResult, DiscreteMarkovChain, DiscreteMarkovChainPrior,
        DiscreteMarkovChainStats, rand_prob_vec, rand_trans_mat, uniform_prob_vec,
        uniform_trans_mat,
    };
}
