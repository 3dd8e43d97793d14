//! core — HMM model, emission contract and the forward-backward engine.
//!
//! Purpose
//! -------
//! Hold everything needed to evaluate a hidden Markov model on data: the
//! model type, the emission capability it is generic over, the observation
//! density matrix, the owned forward-backward workspace, the engine itself,
//! and the sufficient statistics it accumulates for Baum-Welch.
//!
//! Key behaviors
//! -------------
//! - [`Emission`] / [`SampleEmission`] / [`EmissionPrior`] define what a
//!   per-state observation model must provide.
//! - [`HiddenMarkovModel`] pairs a `DiscreteMarkovChain` with aligned
//!   emissions and exposes simulation, log-likelihoods and posteriors.
//! - [`forward_backward`] fills a [`ForwardBackwardWorkspace`] with scaled
//!   `α`, `β`, `γ`, `ξ`; [`accumulate_stats`] folds them into
//!   [`HiddenMarkovModelStats`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Workspaces are exclusively owned by one call at a time.
//! - Posteriors are exact up to rounding in every numeric representation.
//!
//! Testing notes
//! -------------
//! - Brute-force path enumeration checks the forward pass; γ/ξ
//!   normalization is property-tested; linear and log-domain runs are
//!   compared on sequences long enough to underflow unscaled products.

pub mod emission;
pub mod forward_backward;
pub mod model;
pub mod obs_density;
pub mod prior;
pub mod stats;
pub mod workspace;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::emission::{
    Emission, EmissionPrior, FlatEmissionPrior, SampleEmission, WeightedSamples,
};
pub use self::forward_backward::{
    accumulate_stats, backward_pass, compute_posteriors, forward, forward_backward, forward_pass,
    prepare_workspace,
};
pub use self::model::HiddenMarkovModel;
pub use self::obs_density::update_obs_density;
pub use self::prior::HiddenMarkovModelPrior;
pub use self::stats::HiddenMarkovModelStats;
pub use self::workspace::ForwardBackwardWorkspace;
