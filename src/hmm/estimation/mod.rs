//! estimation — Baum-Welch (EM) for hidden Markov models.
//!
//! - [`baum_welch`] / [`baum_welch_multiple_sequences`]: maximum likelihood.
//! - [`baum_welch_map`]: posterior-mode estimation under a
//!   `HiddenMarkovModelPrior`.
//! - [`BaumWelchOptions`] configures the iteration budget, tolerance and
//!   logging; [`BaumWelchOutcome`] reports the fitted model, the
//!   log-likelihood history and the final [`BaumWelchState`].

pub mod baum_welch;
pub mod options;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::baum_welch::{
    BaumWelchOutcome, baum_welch, baum_welch_map, baum_welch_multiple_sequences,
};
pub use self::options::{BaumWelchOptions, BaumWelchState};
