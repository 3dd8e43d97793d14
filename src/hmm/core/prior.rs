//! HiddenMarkovModelPrior — prior over transitions and per-state emissions.
//!
//! Pairs a [`DiscreteMarkovChainPrior`] with one [`EmissionPrior`] per
//! state, index-aligned with the model's states. Consumed by
//! `baum_welch_map`, whose M-step replaces the MLE updates by posterior
//! modes.
use crate::{
    hmm::{
        core::{
            emission::{Emission, EmissionPrior, FlatEmissionPrior},
            model::HiddenMarkovModel,
        },
        errors::{HMMError, HMMResult},
    },
    markov::DiscreteMarkovChainPrior,
    numerics::Probability,
};

/// Prior on a [`HiddenMarkovModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenMarkovModelPrior<P> {
    transitions_prior: DiscreteMarkovChainPrior,
    emissions_prior: Vec<P>,
}

impl<P> HiddenMarkovModelPrior<P> {
    /// # Errors
    /// [`HMMError::EmissionCountMismatch`] if the per-state priors do not
    /// match the chain prior's state count.
    pub fn new(
        transitions_prior: DiscreteMarkovChainPrior, emissions_prior: Vec<P>,
    ) -> HMMResult<Self> {
        if emissions_prior.len() != transitions_prior.nb_states() {
            return Err(HMMError::EmissionCountMismatch {
                states: transitions_prior.nb_states(),
                emissions: emissions_prior.len(),
            });
        }
        Ok(Self { transitions_prior, emissions_prior })
    }

    pub fn transitions_prior(&self) -> &DiscreteMarkovChainPrior {
        &self.transitions_prior
    }

    pub fn emissions_prior(&self) -> &[P] {
        &self.emissions_prior
    }

    pub fn nb_states(&self) -> usize {
        self.emissions_prior.len()
    }

    /// Log prior density of `hmm` (chain term plus emission terms).
    ///
    /// # Errors
    /// Size mismatches between the prior and the model.
    pub fn log_density<E, R>(&self, hmm: &HiddenMarkovModel<E, R>) -> HMMResult<f64>
    where
        E: Emission,
        R: Probability,
        P: EmissionPrior<E>,
    {
        if hmm.nb_states() != self.nb_states() {
            return Err(HMMError::EmissionCountMismatch {
                states: hmm.nb_states(),
                emissions: self.nb_states(),
            });
        }
        let chain = self.transitions_prior.log_density(hmm.transitions())?;
        let emissions: f64 =
            self.emissions_prior.iter().zip(hmm.emissions()).map(|(p, e)| p.log_density(e)).sum();
        Ok(chain + emissions)
    }
}

impl HiddenMarkovModelPrior<FlatEmissionPrior> {
    /// Flat prior on every component: MAP Baum-Welch reduces to plain Baum-Welch.
    ///
    /// # Errors
    /// [`HMMError::Chain`] if `nb_states == 0`.
    pub fn flat(nb_states: usize) -> HMMResult<Self> {
        Ok(Self {
            transitions_prior: DiscreteMarkovChainPrior::flat(nb_states)?,
            emissions_prior: vec![FlatEmissionPrior; nb_states],
        })
    }
}
