//! DiscreteMarkovChainStats — sufficient statistics for chain estimation.
//!
//! Purpose
//! -------
//! Accumulate the counts needed to (re-)estimate a [`DiscreteMarkovChain`]:
//! how often each state starts a sequence and how often each transition
//! occurs. Counts may be integral (observed state paths) or expected
//! (posterior weights from forward-backward), so they are stored in the
//! same numeric representation `R` as the chain.
//!
//! Key behaviors
//! -------------
//! - Additive accumulation via [`DiscreteMarkovChainStats::add_sequence`],
//!   [`DiscreteMarkovChainStats::add_initialization`] and
//!   [`DiscreteMarkovChainStats::add_transition`].
//! - [`DiscreteMarkovChainStats::merge`] sums two accumulators, which is the
//!   reduction step when sequences are processed independently.
//! - [`DiscreteMarkovChainStats::reset`] zeroes everything in place so one
//!   accumulator can be reused across EM iterations.
//!
//! Invariants & assumptions
//! ------------------------
//! - `initialization_count.len() == S` and `transition_count` is `S × S`.
//! - All counts are non-negative.
//!
//! [`DiscreteMarkovChain`]: crate::markov::DiscreteMarkovChain
use crate::{
    markov::{
        core::validation::validate_state_sequences,
        errors::{ChainError, ChainResult},
    },
    numerics::Probability,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

/// Initialization and transition counts for an `S`-state chain.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteMarkovChainStats<R: Probability = f64> {
    initialization_count: Array1<R>,
    transition_count: Array2<R>,
}

impl<R: Probability> DiscreteMarkovChainStats<R> {
    /// Zeroed accumulator for `nb_states` states.
    ///
    /// # Errors
    /// [`ChainError::EmptyStateSpace`] if `nb_states == 0`.
    pub fn zeros(nb_states: usize) -> ChainResult<Self> {
        if nb_states == 0 {
            return Err(ChainError::EmptyStateSpace);
        }
        Ok(Self {
            initialization_count: Array1::from_elem(nb_states, R::zero()),
            transition_count: Array2::from_elem((nb_states, nb_states), R::zero()),
        })
    }

    /// Count statistics of observed state sequences.
    ///
    /// # Errors
    /// Propagates sequence validation errors.
    pub fn from_sequences<S: AsRef<[usize]>>(nb_states: usize, sequences: &[S]) -> ChainResult<Self> {
        let mut stats = Self::zeros(nb_states)?;
        validate_state_sequences(sequences, nb_states)?;
        for seq in sequences {
            stats.add_validated_sequence(seq.as_ref());
        }
        Ok(stats)
    }

    pub fn nb_states(&self) -> usize {
        self.initialization_count.len()
    }

    pub fn initialization_count(&self) -> ArrayView1<'_, R> {
        self.initialization_count.view()
    }

    pub fn transition_count(&self) -> ArrayView2<'_, R> {
        self.transition_count.view()
    }

    /// Zero all counts in place.
    pub fn reset(&mut self) {
        self.initialization_count.fill(R::zero());
        self.transition_count.fill(R::zero());
    }

    /// Add one observed state sequence.
    ///
    /// # Errors
    /// - [`ChainError::EmptySequence`] if `states` is empty.
    /// - [`ChainError::StateOutOfRange`] for out-of-range states.
    pub fn add_sequence(&mut self, states: &[usize]) -> ChainResult<()> {
        validate_state_sequences(&[states], self.nb_states())?;
        self.add_validated_sequence(states);
        Ok(())
    }

    /// Add `weight` to the initialization count of `state`.
    pub fn add_initialization(&mut self, state: usize, weight: R) {
        let slot = &mut self.initialization_count[state];
        *slot = *slot + weight;
    }

    /// Add `weight` to the transition count `from → to`.
    pub fn add_transition(&mut self, from: usize, to: usize, weight: R) {
        let slot = &mut self.transition_count[[from, to]];
        *slot = *slot + weight;
    }

    /// Add a full vector of initialization weights (e.g. `γ[:, 0]`).
    pub(crate) fn add_initialization_weights(&mut self, weights: ArrayView1<'_, R>) {
        Zip::from(&mut self.initialization_count).and(weights).for_each(|c, &w| *c = *c + w);
    }

    /// Add a full matrix of transition weights (e.g. `Σ_t ξ[:, :, t]`).
    pub(crate) fn add_transition_weights(&mut self, weights: ArrayView2<'_, R>) {
        Zip::from(&mut self.transition_count).and(weights).for_each(|c, &w| *c = *c + w);
    }

    /// Sum another accumulator into this one.
    ///
    /// # Errors
    /// [`ChainError::DimensionMismatch`] if the state counts differ.
    pub fn merge(&mut self, other: &Self) -> ChainResult<()> {
        if other.nb_states() != self.nb_states() {
            return Err(ChainError::DimensionMismatch {
                what: "sufficient statistics",
                expected: self.nb_states(),
                actual: other.nb_states(),
            });
        }
        self.add_initialization_weights(other.initialization_count.view());
        self.add_transition_weights(other.transition_count.view());
        Ok(())
    }

    fn add_validated_sequence(&mut self, states: &[usize]) {
        self.add_initialization(states[0], R::one());
        for pair in states.windows(2) {
            self.add_transition(pair[0], pair[1], R::one());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::LogProb;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Counting from observed sequences.
    // - Reset and merge semantics.
    // - Log-domain counts agreeing with linear counts.
    //
    // They intentionally DO NOT cover:
    // - Normalization into chains (see `fit`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check counts on two short sequences.
    //
    // Given
    // -----
    // - Sequences [0, 0, 1] and [1, 0].
    //
    // Expect
    // ------
    // - init = [1, 1]; transitions = [[1, 1], [1, 0]].
    fn from_sequences_counts_starts_and_transitions() {
        // Arrange
        let seqs = vec![vec![0, 0, 1], vec![1, 0]];

        // Act
        let stats = DiscreteMarkovChainStats::<f64>::from_sequences(2, &seqs).expect("valid");

        // Assert
        assert_eq!(stats.initialization_count(), array![1.0, 1.0]);
        assert_eq!(stats.transition_count(), array![[1.0, 1.0], [1.0, 0.0]]);
    }

    #[test]
    // Purpose
    // -------
    // Merge sums and reset clears.
    //
    // Given
    // -----
    // - Two accumulators over different sequences and a 3-state accumulator.
    //
    // Expect
    // ------
    // - Merged counts equal counts over the union; reset gives zeros;
    //   merging different sizes fails.
    fn merge_and_reset_behave_additively() {
        // Arrange
        let mut a = DiscreteMarkovChainStats::<f64>::from_sequences(2, &[vec![0, 1]]).expect("valid");
        let b = DiscreteMarkovChainStats::<f64>::from_sequences(2, &[vec![1, 1]]).expect("valid");
        let c = DiscreteMarkovChainStats::<f64>::zeros(3).expect("valid");

        // Act
        a.merge(&b).expect("same size");
        let err = a.merge(&c).expect_err("size mismatch");

        // Assert
        assert_eq!(a.initialization_count(), array![1.0, 1.0]);
        assert_eq!(a.transition_count(), array![[0.0, 1.0], [0.0, 1.0]]);
        assert!(format!("{err:?}").contains("DimensionMismatch"));
        a.reset();
        assert!(a.transition_count().iter().all(|&v| v == 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Log-domain counts equal linear counts after conversion.
    //
    // Given
    // -----
    // - The same sequence counted in f64 and LogProb.
    //
    // Expect
    // ------
    // - Entry-wise equality after `to_f64`.
    fn log_domain_counts_agree() {
        // Arrange
        let seqs = [vec![0, 1, 1, 0, 0, 0, 1]];

        // Act
        let lin = DiscreteMarkovChainStats::<f64>::from_sequences(2, &seqs).expect("valid");
        let log = DiscreteMarkovChainStats::<LogProb>::from_sequences(2, &seqs).expect("valid");

        // Assert
        for (a, b) in lin.transition_count().iter().zip(log.transition_count().iter()) {
            assert!((a - b.to_f64()).abs() < 1e-12);
        }
    }
}
