//! HiddenMarkovModel — a Markov chain with one emission per state.
//!
//! Purpose
//! -------
//! Compose a [`DiscreteMarkovChain`] (the hidden dynamics) with an
//! index-aligned vector of [`Emission`]s (the observation models), and
//! offer the model-level operations built on the forward-backward engine:
//! simulation, sequence log-likelihood and state posteriors.
//!
//! Invariants & assumptions
//! ------------------------
//! - `emissions.len() == transitions.nb_states()`, checked on construction.
//! - Instances are immutable; Baum-Welch returns new models.
use crate::{
    hmm::{
        core::{
            emission::{Emission, SampleEmission},
            forward_backward::{forward, forward_backward},
            workspace::ForwardBackwardWorkspace,
        },
        errors::{HMMError, HMMResult},
    },
    markov::DiscreteMarkovChain,
    numerics::Probability,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

/// Hidden Markov model with emission family `E` and numeric representation `R`.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenMarkovModel<E: Emission, R: Probability = f64> {
    transitions: DiscreteMarkovChain<R>,
    emissions: Vec<E>,
}

impl<E: Emission, R: Probability> HiddenMarkovModel<E, R> {
    /// Build a model from a chain and one emission per state.
    ///
    /// # Errors
    /// [`HMMError::EmissionCountMismatch`] if the counts differ.
    pub fn new(transitions: DiscreteMarkovChain<R>, emissions: Vec<E>) -> HMMResult<Self> {
        if emissions.len() != transitions.nb_states() {
            return Err(HMMError::EmissionCountMismatch {
                states: transitions.nb_states(),
                emissions: emissions.len(),
            });
        }
        Ok(Self { transitions, emissions })
    }

    /// Build a model from raw `p0`, `P` and emissions.
    ///
    /// # Errors
    /// Chain validation errors and [`HMMError::EmissionCountMismatch`].
    pub fn from_parts(p0: Array1<R>, p: Array2<R>, emissions: Vec<E>) -> HMMResult<Self> {
        Self::new(DiscreteMarkovChain::new(p0, p)?, emissions)
    }

    pub fn transitions(&self) -> &DiscreteMarkovChain<R> {
        &self.transitions
    }

    pub fn emissions(&self) -> &[E] {
        &self.emissions
    }

    /// Emission of state `s`, if it exists.
    pub fn emission(&self, s: usize) -> Option<&E> {
        self.emissions.get(s)
    }

    pub fn nb_states(&self) -> usize {
        self.emissions.len()
    }

    pub fn initial_distribution(&self) -> ArrayView1<'_, R> {
        self.transitions.initial_distribution()
    }

    pub fn transition_matrix(&self) -> ArrayView2<'_, R> {
        self.transitions.transition_matrix()
    }

    /// Re-express the transition model in another numeric representation.
    pub fn convert<R2: Probability>(&self) -> HiddenMarkovModel<E, R2> {
        HiddenMarkovModel { transitions: self.transitions.convert(), emissions: self.emissions.clone() }
    }

    /// Simulate `n_steps` hidden states and their observations.
    pub fn simulate<G: Rng + ?Sized>(
        &self, rng: &mut G, n_steps: usize,
    ) -> (Vec<usize>, Vec<E::Obs>)
    where
        E: SampleEmission,
    {
        let states = self.transitions.simulate(rng, n_steps);
        let obs = states.iter().map(|&s| self.emissions[s].sample(rng)).collect();
        (states, obs)
    }

    /// Log-likelihood of one observation sequence (forward pass only).
    ///
    /// # Errors
    /// Shape, density and zero-likelihood errors from the engine.
    pub fn log_likelihood(&self, obs: &[E::Obs]) -> HMMResult<f64> {
        let mut ws = ForwardBackwardWorkspace::new(self.nb_states(), obs.len())?;
        forward(&mut ws, self, obs)
    }

    /// Summed log-likelihood of independent sequences.
    ///
    /// # Errors
    /// [`HMMError::NoSequences`], or the first per-sequence error wrapped in
    /// [`HMMError::InSequence`].
    pub fn log_likelihood_sequences<S: AsRef<[E::Obs]>>(&self, seqs: &[S]) -> HMMResult<f64> {
        if seqs.is_empty() {
            return Err(HMMError::NoSequences);
        }
        let mut ws = ForwardBackwardWorkspace::new(self.nb_states(), 1)?;
        let mut total = 0.0;
        for (index, seq) in seqs.iter().enumerate() {
            let seq = seq.as_ref();
            if seq.is_empty() {
                return Err(HMMError::EmptySequence { index });
            }
            total += forward(&mut ws, self, seq).map_err(|e| HMMError::in_sequence(index, e))?;
        }
        Ok(total)
    }

    /// Posterior state probabilities `γ[s, t]` as linear `f64`.
    ///
    /// # Errors
    /// Shape, density and zero-likelihood errors from the engine.
    pub fn posterior_states(&self, obs: &[E::Obs]) -> HMMResult<Array2<f64>> {
        let mut ws = ForwardBackwardWorkspace::new(self.nb_states(), obs.len())?;
        forward_backward(&mut ws, self, obs)?;
        Ok(ws.gamma().mapv(|g| g.to_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{hmm::emissions::NormalEmission, markov::errors::ChainError};
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction checks and accessors.
    // - Simulation output shapes and supports.
    // - Single- and multi-sequence log-likelihoods and posteriors.
    // -------------------------------------------------------------------------

    fn emissions() -> Vec<NormalEmission> {
        vec![
            NormalEmission::new(0.4, 0.7).expect("valid"),
            NormalEmission::new(-0.8, 0.3).expect("valid"),
        ]
    }

    fn reference_hmm() -> HiddenMarkovModel<NormalEmission> {
        HiddenMarkovModel::from_parts(array![0.3, 0.7], array![[0.9, 0.1], [0.2, 0.8]], emissions())
            .expect("valid model")
    }

    #[test]
    // Purpose
    // -------
    // Misaligned emissions and invalid chains are rejected.
    //
    // Given
    // -----
    // - A 3-state chain with 2 emissions; p0 summing to 0.9.
    //
    // Expect
    // ------
    // - EmissionCountMismatch and a wrapped chain error.
    fn construction_checks_alignment() {
        // Arrange
        let mc3 = DiscreteMarkovChain::new(
            array![1.0, 0.0, 0.0],
            Array2::from_elem((3, 3), 1.0 / 3.0),
        )
        .expect("valid chain");

        // Act
        let e1 = HiddenMarkovModel::new(mc3, emissions()).expect_err("3 vs 2");
        let e2 = HiddenMarkovModel::from_parts(
            array![0.5, 0.4],
            array![[1.0, 0.0], [0.0, 1.0]],
            emissions(),
        )
        .expect_err("p0 not normalized");

        // Assert
        assert_eq!(e1, HMMError::EmissionCountMismatch { states: 3, emissions: 2 });
        assert!(matches!(e2, HMMError::Chain(ChainError::VectorNotNormalized { .. })));
        let hmm = reference_hmm();
        assert_eq!(hmm.nb_states(), 2);
        assert!(hmm.emission(1).is_some());
        assert!(hmm.emission(2).is_none());
    }

    #[test]
    // Purpose
    // -------
    // Simulation returns aligned states and observations.
    //
    // Given
    // -----
    // - The reference model, 500 steps, seed 5.
    //
    // Expect
    // ------
    // - Both outputs have length 500; observations in state 1 average near -0.8.
    fn simulate_returns_aligned_outputs() {
        // Arrange
        let hmm = reference_hmm();
        let mut rng = StdRng::seed_from_u64(5);

        // Act
        let (states, obs) = hmm.simulate(&mut rng, 500);

        // Assert
        assert_eq!(states.len(), 500);
        assert_eq!(obs.len(), 500);
        let in_one: Vec<f64> =
            states.iter().zip(&obs).filter(|(s, _)| **s == 1).map(|(_, o)| *o).collect();
        let mean = in_one.iter().sum::<f64>() / in_one.len() as f64;
        assert!((mean + 0.8).abs() < 0.1);
    }

    #[test]
    // Purpose
    // -------
    // Multi-sequence log-likelihood is the sum of per-sequence values and
    // posteriors are proper distributions.
    //
    // Given
    // -----
    // - Two short sequences and an empty one.
    //
    // Expect
    // ------
    // - Sum identity; columns of γ sum to one; the empty sequence is
    //   reported with its index.
    fn log_likelihood_and_posteriors() {
        // Arrange
        let hmm = reference_hmm();
        let a = vec![0.2, -0.7, -0.9];
        let b = vec![1.1, 0.3];

        // Act
        let la = hmm.log_likelihood(&a).expect("possible");
        let lb = hmm.log_likelihood(&b).expect("possible");
        let both = hmm.log_likelihood_sequences(&[a.clone(), b]).expect("possible");
        let err = hmm.log_likelihood_sequences(&[a.clone(), Vec::new()]).expect_err("empty");
        let gamma = hmm.posterior_states(&a).expect("possible");

        // Assert
        assert_relative_eq!(both, la + lb, epsilon = 1e-12);
        assert_eq!(err, HMMError::EmptySequence { index: 1 });
        for col in gamma.columns() {
            assert_relative_eq!(col.sum(), 1.0, epsilon = 1e-12);
        }
    }
}
