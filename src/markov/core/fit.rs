//! Chain fitting — maximum likelihood and Dirichlet MAP from counts.
//!
//! Purpose
//! -------
//! Turn [`DiscreteMarkovChainStats`] (observed or expected counts) into a
//! new [`DiscreteMarkovChain`], either by plain normalization (MLE) or by
//! adding Dirichlet pseudo-counts first (MAP).
//!
//! Key behaviors
//! -------------
//! - MLE: `p0[s] = c₀[s] / Σ c₀`, `P[i, :] = C[i, :] / Σ_j C[i, j]`.
//! - MAP uses the **posterior mode**: counts are shifted by `α − 1` before
//!   normalizing, so the all-ones (flat) prior reproduces MLE exactly.
//! - A transition row with zero total (a state never left) falls back to the
//!   uniform row.
//!
//! Invariants & assumptions
//! ------------------------
//! - The mode exists only when every concentration is `≥ 1`; smaller values
//!   raise [`ChainError::ModeUndefined`] instead of producing negative
//!   "probabilities".
//! - A zero initialization total cannot be repaired (there is no data about
//!   starts) and raises [`ChainError::ZeroCountNormalization`].
//!
//! Conventions
//! -----------
//! - The target representation `R` is chosen by the caller through the
//!   type, e.g. `DiscreteMarkovChain::<LogProb>::fit_mle(&seqs)`.
//! - [`DiscreteMarkovChain::fit_mle`] infers the state count as
//!   `max state + 1`; use [`DiscreteMarkovChain::fit_mle_with_states`] when
//!   trailing states may be unobserved.
use crate::{
    markov::{
        core::{
            chain::DiscreteMarkovChain, prior::DiscreteMarkovChainPrior,
            stats::DiscreteMarkovChainStats, validation::validate_state_sequences,
        },
        errors::{ChainError, ChainResult},
    },
    numerics::{Probability, sum_probs},
};
use ndarray::{Array1, Array2, ArrayView1, Axis};

impl<R: Probability> DiscreteMarkovChain<R> {
    /// Maximum-likelihood chain from observed state sequences.
    ///
    /// The number of states is `1 + max state` over all sequences.
    ///
    /// # Errors
    /// - [`ChainError::NoSequences`] / [`ChainError::EmptySequence`] for
    ///   degenerate inputs.
    pub fn fit_mle<S: AsRef<[usize]>>(sequences: &[S]) -> ChainResult<Self> {
        validate_state_sequences(sequences, usize::MAX)?;
        let nb_states = sequences
            .iter()
            .flat_map(|s| s.as_ref().iter().copied())
            .max()
            .map_or(0, |m| m + 1);
        Self::fit_mle_with_states(nb_states, sequences)
    }

    /// Maximum-likelihood chain on an explicit state space `0..nb_states`.
    ///
    /// # Errors
    /// Sequence validation errors, or [`ChainError::EmptyStateSpace`].
    pub fn fit_mle_with_states<S: AsRef<[usize]>>(
        nb_states: usize, sequences: &[S],
    ) -> ChainResult<Self> {
        let stats = DiscreteMarkovChainStats::<R>::from_sequences(nb_states, sequences)?;
        Self::fit_mle_from_stats(&stats)
    }

    /// Maximum-likelihood chain from accumulated (possibly expected) counts.
    ///
    /// # Errors
    /// [`ChainError::ZeroCountNormalization`] if no initialization mass was
    /// accumulated.
    pub fn fit_mle_from_stats(stats: &DiscreteMarkovChainStats<R>) -> ChainResult<Self> {
        let p0 = normalize(stats.initialization_count(), None)
            .ok_or(ChainError::ZeroCountNormalization { what: "initialization counts" })?;
        let p = normalize_rows(stats, None);
        Self::new(p0, p)
    }

    /// MAP chain (Dirichlet posterior mode) from observed state sequences.
    ///
    /// # Errors
    /// Sequence validation errors (state count taken from the prior) and the
    /// errors of [`DiscreteMarkovChain::fit_map_from_stats`].
    pub fn fit_map<S: AsRef<[usize]>>(
        prior: &DiscreteMarkovChainPrior, sequences: &[S],
    ) -> ChainResult<Self> {
        let stats = DiscreteMarkovChainStats::<R>::from_sequences(prior.nb_states(), sequences)?;
        Self::fit_map_from_stats(prior, &stats)
    }

    /// MAP chain from accumulated counts and a Dirichlet prior.
    ///
    /// # Errors
    /// - [`ChainError::DimensionMismatch`] if prior and stats disagree on `S`.
    /// - [`ChainError::ModeUndefined`] if any concentration is below one.
    /// - [`ChainError::ZeroCountNormalization`] if counts plus pseudo-counts
    ///   for the initial distribution are all zero.
    pub fn fit_map_from_stats(
        prior: &DiscreteMarkovChainPrior, stats: &DiscreteMarkovChainStats<R>,
    ) -> ChainResult<Self> {
        if prior.nb_states() != stats.nb_states() {
            return Err(ChainError::DimensionMismatch {
                what: "prior vs statistics",
                expected: prior.nb_states(),
                actual: stats.nb_states(),
            });
        }
        check_mode_exists(prior)?;
        let p0 = normalize(stats.initialization_count(), Some(prior.p0_alpha()))
            .ok_or(ChainError::ZeroCountNormalization { what: "initialization counts" })?;
        let p = normalize_rows(stats, Some(prior));
        Self::new(p0, p)
    }
}

// ---- Helper Methods ----

fn check_mode_exists(prior: &DiscreteMarkovChainPrior) -> ChainResult<()> {
    if let Some((col, &value)) = prior.p0_alpha().iter().enumerate().find(|(_, a)| **a < 1.0) {
        return Err(ChainError::ModeUndefined { row: None, col, value });
    }
    if let Some(((row, col), &value)) = prior.p_alpha().indexed_iter().find(|(_, a)| **a < 1.0) {
        return Err(ChainError::ModeUndefined { row: Some(row), col, value });
    }
    Ok(())
}

/// Normalize `counts (+ alpha − 1)`; `None` when the total is zero.
fn normalize<R: Probability>(
    counts: ArrayView1<'_, R>, alpha: Option<ArrayView1<'_, f64>>,
) -> Option<Array1<R>> {
    let shifted: Array1<R> = match alpha {
        Some(alpha) => counts
            .iter()
            .zip(alpha.iter())
            .map(|(&c, &a)| c + R::from_f64(a - 1.0))
            .collect(),
        None => counts.to_owned(),
    };
    let total = sum_probs(shifted.iter().copied());
    if total.is_zero() {
        return None;
    }
    Some(shifted.mapv(|v| v / total))
}

fn normalize_rows<R: Probability>(
    stats: &DiscreteMarkovChainStats<R>, prior: Option<&DiscreteMarkovChainPrior>,
) -> Array2<R> {
    let n = stats.nb_states();
    let uniform = R::from_f64(1.0 / n as f64);
    let mut out = Array2::from_elem((n, n), uniform);
    for (i, counts) in stats.transition_count().outer_iter().enumerate() {
        let alpha = prior.map(|p| p.p_alpha().index_axis_move(Axis(0), i));
        if let Some(row) = normalize(counts, alpha) {
            out.row_mut(i).assign(&row);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::LogProb;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - MLE on hand-computed counts, including the uniform-row fallback.
    // - Consistency of MLE on a long simulated path.
    // - MAP under the posterior-mode convention and the flat prior.
    // - Agreement of linear and log-domain fits.
    //
    // They intentionally DO NOT cover:
    // - Expected counts from forward-backward (see `hmm`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // MLE normalizes counts; an unvisited predecessor row is uniform.
    //
    // Given
    // -----
    // - Sequence [0, 0, 1] on an explicit 3-state space.
    //
    // Expect
    // ------
    // - p0 = [1, 0, 0]; P[0] = [0.5, 0.5, 0]; rows 1 and 2 uniform.
    fn mle_normalizes_counts_with_uniform_fallback() {
        // Arrange
        let seqs = [vec![0, 0, 1]];

        // Act
        let mc = DiscreteMarkovChain::<f64>::fit_mle_with_states(3, &seqs).expect("valid");

        // Assert
        assert_eq!(mc.initial_distribution(), array![1.0, 0.0, 0.0]);
        assert_eq!(mc.transition_matrix().row(0), array![0.5, 0.5, 0.0]);
        for row in 1..3 {
            for &v in mc.transition_matrix().row(row).iter() {
                assert_relative_eq!(v, 1.0 / 3.0, epsilon = 1e-15);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // MLE recovers the generating chain from a long simulated path.
    //
    // Given
    // -----
    // - p0 = [0.3, 0.7], P = [[0.9, 0.1], [0.2, 0.8]], 100_000 steps, seed 42.
    //
    // Expect
    // ------
    // - Mean absolute error of P below 0.01; state count inferred as 2.
    fn mle_recovers_generating_chain() {
        // Arrange
        let truth = DiscreteMarkovChain::new(array![0.3, 0.7], array![[0.9, 0.1], [0.2, 0.8]])
            .expect("valid");
        let mut rng = StdRng::seed_from_u64(42);
        let path = truth.simulate(&mut rng, 100_000);

        // Act
        let fitted = DiscreteMarkovChain::<f64>::fit_mle(&[path]).expect("valid");

        // Assert
        assert_eq!(fitted.nb_states(), 2);
        let mae = (&fitted.transition_matrix() - &truth.transition_matrix())
            .mapv(f64::abs)
            .mean()
            .expect("non-empty");
        assert!(mae < 0.01, "mae = {mae}");
    }

    #[test]
    // Purpose
    // -------
    // The flat prior makes MAP identical to MLE.
    //
    // Given
    // -----
    // - Three short sequences and the flat 2-state prior.
    //
    // Expect
    // ------
    // - Entry-wise equal chains within 1e-12.
    fn map_with_flat_prior_equals_mle() {
        // Arrange
        let seqs = vec![vec![0, 1, 1, 0], vec![1, 1, 1], vec![0, 0, 0, 1]];
        let prior = DiscreteMarkovChainPrior::flat(2).expect("n > 0");

        // Act
        let mle = DiscreteMarkovChain::<f64>::fit_mle(&seqs).expect("valid");
        let map = DiscreteMarkovChain::<f64>::fit_map(&prior, &seqs).expect("valid");

        // Assert
        for (a, b) in mle.transition_matrix().iter().zip(map.transition_matrix().iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        for (a, b) in mle.initial_distribution().iter().zip(map.initial_distribution().iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // Pin the posterior-mode convention with pseudo-counts α − 1.
    //
    // Given
    // -----
    // - Sequence [0, 0, 0, 1]: init counts [1, 0], row-0 counts [2, 1].
    // - p0_alpha = [3, 3], p_alpha = [[1, 3], [1, 1]].
    //
    // Expect
    // ------
    // - p0 = [(1+2)/(1+4), (0+2)/(1+4)] = [0.6, 0.4];
    //   P[0] = [(2+0)/5, (1+2)/5] = [0.4, 0.6]; row 1 uniform.
    fn map_uses_posterior_mode() {
        // Arrange
        let prior = DiscreteMarkovChainPrior::new(array![3.0, 3.0], array![[1.0, 3.0], [1.0, 1.0]])
            .expect("valid");

        // Act
        let mc = DiscreteMarkovChain::<f64>::fit_map(&prior, &[vec![0, 0, 0, 1]]).expect("valid");

        // Assert
        assert_relative_eq!(mc.initial_distribution()[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(mc.transition_matrix()[[0, 1]], 0.6, epsilon = 1e-12);
        assert_relative_eq!(mc.transition_matrix()[[1, 0]], 0.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Concentrations below one and zero start counts are reported.
    //
    // Given
    // -----
    // - A prior with p_alpha[1][0] = 0.5; empty stats.
    //
    // Expect
    // ------
    // - ModeUndefined and ZeroCountNormalization respectively.
    fn map_and_mle_report_degenerate_inputs() {
        // Arrange
        let prior = DiscreteMarkovChainPrior::new(array![1.0, 1.0], array![[1.0, 1.0], [0.5, 1.0]])
            .expect("valid prior");
        let empty = DiscreteMarkovChainStats::<f64>::zeros(2).expect("n > 0");

        // Act
        let e1 = DiscreteMarkovChain::<f64>::fit_map(&prior, &[vec![0, 1]]).expect_err("mode");
        let e2 = DiscreteMarkovChain::<f64>::fit_mle_from_stats(&empty).expect_err("zero");

        // Assert
        assert_eq!(e1, ChainError::ModeUndefined { row: Some(1), col: 0, value: 0.5 });
        assert!(matches!(e2, ChainError::ZeroCountNormalization { .. }));
    }

    #[test]
    // Purpose
    // -------
    // Log-domain and linear fits agree.
    //
    // Given
    // -----
    // - A 1000-step path from the reference chain, seed 5.
    //
    // Expect
    // ------
    // - Equal transition matrices within 1e-12.
    fn log_domain_fit_matches_linear_fit() {
        // Arrange
        let truth = DiscreteMarkovChain::new(array![0.3, 0.7], array![[0.9, 0.1], [0.2, 0.8]])
            .expect("valid");
        let mut rng = StdRng::seed_from_u64(5);
        let path = truth.simulate(&mut rng, 1_000);

        // Act
        let lin = DiscreteMarkovChain::<f64>::fit_mle(&[&path[..]]).expect("valid");
        let log = DiscreteMarkovChain::<LogProb>::fit_mle(&[&path[..]]).expect("valid");

        // Assert
        for (a, b) in lin.transition_matrix().iter().zip(log.transition_matrix().iter()) {
            assert_relative_eq!(*a, b.to_f64(), epsilon = 1e-12);
        }
    }
}
