//! HiddenMarkovModelStats — E-step accumulator for Baum-Welch.
//!
//! Holds the expected transition counts (as [`DiscreteMarkovChainStats`]),
//! the per-state posterior weights of every observation, and the summed
//! sequence log-likelihoods. Weights are stored per state in observation
//! order (sequence by sequence), which is the order the M-step pairs them
//! with observations.
use crate::{
    hmm::errors::{HMMError, HMMResult},
    markov::DiscreteMarkovChainStats,
    numerics::Probability,
};

/// Sufficient statistics accumulated over one or more sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenMarkovModelStats<R: Probability = f64> {
    pub(crate) transitions: DiscreteMarkovChainStats<R>,
    pub(crate) emission_weights: Vec<Vec<f64>>,
    pub(crate) loglik: f64,
}

impl<R: Probability> HiddenMarkovModelStats<R> {
    /// Empty accumulator for `nb_states` states.
    ///
    /// # Errors
    /// [`HMMError::Chain`] if `nb_states == 0`.
    pub fn zeros(nb_states: usize) -> HMMResult<Self> {
        Ok(Self {
            transitions: DiscreteMarkovChainStats::zeros(nb_states)?,
            emission_weights: vec![Vec::new(); nb_states],
            loglik: 0.0,
        })
    }

    pub fn nb_states(&self) -> usize {
        self.emission_weights.len()
    }

    pub fn transitions(&self) -> &DiscreteMarkovChainStats<R> {
        &self.transitions
    }

    /// Posterior weights `γ[s, t]` for every accumulated observation.
    pub fn emission_weights(&self, state: usize) -> Option<&[f64]> {
        self.emission_weights.get(state).map(Vec::as_slice)
    }

    /// Sum of the accumulated sequence log-likelihoods.
    pub fn loglik(&self) -> f64 {
        self.loglik
    }

    /// Clear counts, weights and log-likelihood, keeping allocations.
    pub fn reset(&mut self) {
        self.transitions.reset();
        for w in &mut self.emission_weights {
            w.clear();
        }
        self.loglik = 0.0;
    }

    /// Append `other` after the data already accumulated here.
    ///
    /// Merging in sequence order keeps the weights aligned with the
    /// flattened observations.
    ///
    /// # Errors
    /// [`HMMError::Chain`] on a state-count mismatch.
    pub fn merge(&mut self, other: &Self) -> HMMResult<()> {
        self.transitions.merge(&other.transitions).map_err(HMMError::from)?;
        for (mine, theirs) in self.emission_weights.iter_mut().zip(&other.emission_weights) {
            mine.extend_from_slice(theirs);
        }
        self.loglik += other.loglik;
        Ok(())
    }
}
