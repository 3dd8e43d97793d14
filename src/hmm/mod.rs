//! hmm — hidden Markov models: inference and Baum-Welch estimation.
//!
//! Purpose
//! -------
//! Estimate the parameters of a latent discrete-state process from one or
//! more observation sequences. A [`HiddenMarkovModel`] pairs a
//! `DiscreteMarkovChain` with one [`Emission`] per state; the
//! forward-backward engine computes posteriors and sufficient statistics,
//! and the Baum-Welch driver iterates E- and M-steps until the
//! log-likelihood stops improving.
//!
//! Key behaviors
//! -------------
//! - `core`: the emission contract, the model and its prior, the
//!   observation-density builder, the owned workspace and the scaled
//!   forward-backward engine.
//! - `estimation`: Baum-Welch options, states, outcome and entry points
//!   (MLE and MAP, one or many sequences, optional `parallel` E-step).
//! - `emissions`: Normal, exponential and Weibull families plus a Gamma
//!   rate prior.
//! - `errors`: [`HMMError`] and [`EmissionError`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `emissions.len() == nb_states` for every model and prior.
//! - Every algorithm is generic over the numeric representation
//!   `R: Probability`; `f64` (rescaled) and `LogProb` (log domain) give the
//!   same results up to rounding.
//!
//! Conventions
//! -----------
//! - Observation sequences are slices of `E::Obs`; collections of sequences
//!   are slices of anything implementing `AsRef<[E::Obs]>`.
//! - Numeric kernels never log; only the Baum-Welch driver reports progress,
//!   and only when `verbose` is set with the `obs_slog` feature.
//!
//! Downstream usage
//! ----------------
//! ```no_run
//! use ndarray::array;
//! use rust_hmm::hmm::prelude::*;
//!
//! let init = HiddenMarkovModel::from_parts(
//!     array![0.5, 0.5],
//!     array![[0.8, 0.2], [0.2, 0.8]],
//!     vec![NormalEmission::new(1.0, 1.0)?, NormalEmission::new(-1.0, 1.0)?],
//! )?;
//! let seqs = vec![vec![0.9, 1.2, -0.7, -1.1], vec![0.3, -0.8, -1.4]];
//! let out = baum_welch_multiple_sequences(&init, &seqs, &BaumWelchOptions::default())?;
//! println!("{} after {} iterations", out.status, out.iterations);
//! # Ok::<(), rust_hmm::hmm::errors::HMMError>(())
//! ```

pub mod core;
pub mod emissions;
pub mod errors;
pub mod estimation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    Emission, EmissionPrior, FlatEmissionPrior, ForwardBackwardWorkspace, HiddenMarkovModel,
    HiddenMarkovModelPrior, HiddenMarkovModelStats, SampleEmission, WeightedSamples,
    forward_backward,
};
pub use self::emissions::{ExponentialEmission, GammaRatePrior, NormalEmission, WeibullEmission};
pub use self::errors::{EmissionError, EmissionResult, HMMError, HMMResult};
pub use self::estimation::{
    BaumWelchOptions, BaumWelchOutcome, BaumWelchState, baum_welch, baum_welch_map,
    baum_welch_multiple_sequences,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_hmm::hmm::prelude::*;
//
// to import the main HMM surface in a single line.

pub mod prelude {
    pub use super::core::{
        Emission, EmissionPrior, FlatEmissionPrior, ForwardBackwardWorkspace, HiddenMarkovModel,
        HiddenMarkovModelPrior, SampleEmission, WeightedSamples, forward_backward,
    };
    pub use super::emissions::{
        ExponentialEmission, GammaRatePrior, NormalEmission, WeibullEmission,
    };
    pub use super::errors::{EmissionError, EmissionResult, HMMError, HMMResult};
    pub use super::estimation::{
        BaumWelchOptions, BaumWelchOutcome, BaumWelchState, baum_welch, baum_welch_map,
        baum_welch_multiple_sequences,
    };
}
