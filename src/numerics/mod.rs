//! numerics — probability representations for likelihood computations.
//!
//! Purpose
//! -------
//! Give the Markov-chain and HMM layers a single numeric interface,
//! [`Probability`], that is implemented both by ordinary floats and by the
//! log-domain [`LogProb`]. Algorithms are generic over `R: Probability`, so
//! the caller chooses between rescaled linear arithmetic (fast) and
//! log-domain arithmetic (immune to underflow) at the type level.
//!
//! Key behaviors
//! -------------
//! - `f64` and `f32` implement [`Probability`] directly.
//! - [`LogProb`] stores `ln p` and implements `+` as a stable log-sum-exp.
//! - [`sum_probs`] folds any iterator of probabilities.
//!
//! Conventions
//! -----------
//! - Conversions in and out of the abstraction always go through linear
//!   `f64` (`from_f64`/`to_f64`) or natural logs (`from_ln`/`ln`).
//! - Nothing in this module allocates, logs, or panics.

pub mod log_prob;
pub mod probability;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::log_prob::LogProb;
pub use self::probability::{Probability, sum_probs};
