//! Emission contract — what a per-state observation model must provide.
//!
//! Purpose
//! -------
//! Keep the forward-backward engine and the Baum-Welch driver independent
//! of any concrete observation family. A family implements [`Emission`]
//! (density evaluation plus weighted re-estimation) and optionally
//! [`SampleEmission`] (simulation); the engine never special-cases one.
//!
//! Key behaviors
//! -------------
//! - [`Emission::log_density`] evaluates `ln f(o)` for a single observation,
//!   returning `-∞` outside the support.
//! - [`Emission::fit_weighted`] re-estimates the family from
//!   [`WeightedSamples`], returning a new object; the current object is the
//!   starting point for families without a closed-form M-step.
//! - [`EmissionPrior`] lets MAP estimation regularize the emission M-step;
//!   [`FlatEmissionPrior`] reduces it to the weighted MLE.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights are finite and non-negative, and `weights.len() == obs.len()`
//!   (checked by [`WeightedSamples::new`]).
//! - Observations with zero weight must not influence the fit; families may
//!   skip support checks on them.
//!
//! Conventions
//! -----------
//! - Densities are with respect to the family's natural base measure
//!   (Lebesgue for continuous data, counting for discrete data), so only
//!   ratios across states matter to the engine.
use crate::hmm::errors::{EmissionError, EmissionResult};
use rand::Rng;
use std::fmt::Debug;

/// Per-state observation model usable by the HMM engine.
pub trait Emission: Clone + Debug + Send + Sync {
    /// Observation type (e.g. `f64`, or a `History` for point processes).
    type Obs: Sync;

    /// Natural log of the density at `obs` (`-∞` outside the support).
    fn log_density(&self, obs: &Self::Obs) -> f64;

    /// Density at `obs`.
    fn density(&self, obs: &Self::Obs) -> f64 {
        self.log_density(obs).exp()
    }

    /// Weighted maximum-likelihood re-estimation.
    ///
    /// # Errors
    /// Family-specific [`EmissionError`]s (zero total weight, observations
    /// outside the support, optimizer failures).
    fn fit_weighted(&self, samples: &WeightedSamples<'_, Self::Obs>) -> EmissionResult<Self>;
}

/// Emissions that can draw observations.
pub trait SampleEmission: Emission {
    fn sample<G: Rng + ?Sized>(&self, rng: &mut G) -> Self::Obs;
}

/// Observations paired with non-negative weights (posterior responsibilities).
#[derive(Debug, Clone, Copy)]
pub struct WeightedSamples<'a, O> {
    obs: &'a [&'a O],
    weights: &'a [f64],
}

impl<'a, O> WeightedSamples<'a, O> {
    /// Pair `obs` with `weights`.
    ///
    /// # Errors
    /// - [`EmissionError::WeightLengthMismatch`] if the lengths differ.
    /// - [`EmissionError::InvalidWeight`] for negative or non-finite weights.
    pub fn new(obs: &'a [&'a O], weights: &'a [f64]) -> EmissionResult<Self> {
        if obs.len() != weights.len() {
            return Err(EmissionError::WeightLengthMismatch {
                weights: weights.len(),
                observations: obs.len(),
            });
        }
        if let Some((index, &value)) =
            weights.iter().enumerate().find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(EmissionError::InvalidWeight { index, value });
        }
        Ok(Self { obs, weights })
    }

    /// `(weight, observation)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &'a O)> + '_ {
        self.weights.iter().copied().zip(self.obs.iter().copied())
    }

    /// Pairs with strictly positive weight, with their input index.
    pub fn iter_positive(&self) -> impl Iterator<Item = (usize, f64, &'a O)> + '_ {
        self.iter().enumerate().filter(|(_, (w, _))| *w > 0.0).map(|(i, (w, o))| (i, w, o))
    }

    pub fn len(&self) -> usize {
        self.obs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obs.is_empty()
    }

    pub fn weights(&self) -> &'a [f64] {
        self.weights
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Total weight, rejecting an all-zero weighting.
    ///
    /// # Errors
    /// [`EmissionError::ZeroTotalWeight`].
    pub fn positive_total_weight(&self) -> EmissionResult<f64> {
        let total = self.total_weight();
        if total > 0.0 { Ok(total) } else { Err(EmissionError::ZeroTotalWeight) }
    }
}

/// Prior over one emission family, used by MAP Baum-Welch.
pub trait EmissionPrior<E: Emission>: Send + Sync {
    /// Posterior-mode re-estimation from weighted samples.
    ///
    /// # Errors
    /// Family-specific [`EmissionError`]s.
    fn fit_map(&self, current: &E, samples: &WeightedSamples<'_, E::Obs>) -> EmissionResult<E>;

    /// Log prior density of `emission` (up to an additive constant).
    fn log_density(&self, emission: &E) -> f64;
}

/// Improper flat prior: MAP coincides with the weighted MLE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlatEmissionPrior;

impl<E: Emission> EmissionPrior<E> for FlatEmissionPrior {
    fn fit_map(&self, current: &E, samples: &WeightedSamples<'_, E::Obs>) -> EmissionResult<E> {
        current.fit_weighted(samples)
    }

    fn log_density(&self, _emission: &E) -> f64 {
        0.0
    }
}
