//! DiscreteMarkovChainPrior — Dirichlet-conjugate prior on `(p0, P)`.
//!
//! Purpose
//! -------
//! Encode prior pseudo-counts for chain estimation: one Dirichlet over the
//! initial distribution and one independent Dirichlet per transition-matrix
//! row. The prior feeds MAP fitting, can be evaluated at a chain, and can be
//! sampled to produce random chains.
//!
//! Key behaviors
//! -------------
//! - [`DiscreteMarkovChainPrior::flat`] (and
//!   [`DiscreteMarkovChain::flat_prior`]) build the all-ones prior, under
//!   which MAP estimation coincides with MLE.
//! - [`DiscreteMarkovChainPrior::log_density`] sums the Dirichlet log
//!   densities of `p0` and each row of `P`.
//! - [`DiscreteMarkovChainPrior::sample`] draws a chain by normalizing
//!   independent `Gamma(α, 1)` variates.
//!
//! Invariants & assumptions
//! ------------------------
//! - Concentrations are finite and strictly positive; `p0_alpha.len() == S`
//!   and `p_alpha` is `S × S`.
//!
//! Conventions
//! -----------
//! - Concentrations are always stored as linear `f64`, independently of the
//!   representation of the chains they are applied to.
//! - `α − 1` is read as a pseudo-count: a prior worth "4 observed starts,
//!   balanced" is `p0_alpha = 1 + 4 · [0.5, 0.5]`.
use crate::{
    markov::{
        core::{
            chain::DiscreteMarkovChain,
            validation::{validate_concentration_mat, validate_concentration_vec},
        },
        errors::{ChainError, ChainResult},
    },
    numerics::Probability,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::{Rng, distributions::Distribution};
use statrs::{distribution::Gamma, function::gamma::ln_gamma};

/// Dirichlet concentrations for the initial distribution and each row of
/// the transition matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteMarkovChainPrior {
    p0_alpha: Array1<f64>,
    p_alpha: Array2<f64>,
}

impl DiscreteMarkovChainPrior {
    /// Build a prior from concentration parameters.
    ///
    /// # Errors
    /// - [`ChainError::EmptyStateSpace`] for an empty `p0_alpha`.
    /// - [`ChainError::InvalidConcentration`] for non-finite or non-positive
    ///   entries.
    /// - Shape errors if `p_alpha` is not `S × S`.
    pub fn new(p0_alpha: Array1<f64>, p_alpha: Array2<f64>) -> ChainResult<Self> {
        validate_concentration_vec(p0_alpha.view())?;
        validate_concentration_mat(p_alpha.view(), p0_alpha.len())?;
        Ok(Self { p0_alpha, p_alpha })
    }

    /// All-ones prior: zero pseudo-counts, MAP equals MLE.
    ///
    /// # Errors
    /// [`ChainError::EmptyStateSpace`] if `nb_states == 0`.
    pub fn flat(nb_states: usize) -> ChainResult<Self> {
        if nb_states == 0 {
            return Err(ChainError::EmptyStateSpace);
        }
        Ok(Self {
            p0_alpha: Array1::ones(nb_states),
            p_alpha: Array2::ones((nb_states, nb_states)),
        })
    }

    pub fn nb_states(&self) -> usize {
        self.p0_alpha.len()
    }

    pub fn p0_alpha(&self) -> ArrayView1<'_, f64> {
        self.p0_alpha.view()
    }

    pub fn p_alpha(&self) -> ArrayView2<'_, f64> {
        self.p_alpha.view()
    }

    /// Log prior density of a chain.
    ///
    /// Returns `-∞` when a zero probability meets a concentration above one.
    ///
    /// # Errors
    /// [`ChainError::DimensionMismatch`] if the chain size differs.
    pub fn log_density<R: Probability>(&self, chain: &DiscreteMarkovChain<R>) -> ChainResult<f64> {
        if chain.nb_states() != self.nb_states() {
            return Err(ChainError::DimensionMismatch {
                what: "chain vs prior",
                expected: self.nb_states(),
                actual: chain.nb_states(),
            });
        }
        let mut total = dirichlet_ln_pdf(self.p0_alpha.view(), chain.initial_distribution());
        for (alpha_row, p_row) in self.p_alpha.outer_iter().zip(chain.transition_matrix().outer_iter()) {
            total += dirichlet_ln_pdf(alpha_row, p_row);
        }
        Ok(total)
    }

    /// Sample a chain from the prior.
    ///
    /// # Errors
    /// [`ChainError::SamplingFailed`] if a Gamma sampler cannot be built, or
    /// validation errors if every draw of a row underflows to zero.
    pub fn sample<R: Probability, G: Rng + ?Sized>(
        &self, rng: &mut G,
    ) -> ChainResult<DiscreteMarkovChain<R>> {
        let p0 = dirichlet_draw(self.p0_alpha.view(), rng)?;
        let n = self.nb_states();
        let mut p = Array2::from_elem((n, n), R::zero());
        for (alpha_row, mut dst) in self.p_alpha.outer_iter().zip(p.outer_iter_mut()) {
            let row: Array1<R> = dirichlet_draw(alpha_row, rng)?;
            dst.assign(&row);
        }
        DiscreteMarkovChain::new(p0, p)
    }
}

impl<R: Probability> DiscreteMarkovChain<R> {
    /// All-ones prior matching this chain's state count.
    pub fn flat_prior(&self) -> DiscreteMarkovChainPrior {
        let n = self.nb_states();
        DiscreteMarkovChainPrior { p0_alpha: Array1::ones(n), p_alpha: Array2::ones((n, n)) }
    }
}

// ---- Helper Methods ----

fn dirichlet_ln_pdf<R: Probability>(alpha: ArrayView1<'_, f64>, p: ArrayView1<'_, R>) -> f64 {
    let alpha_sum: f64 = alpha.sum();
    let mut out = ln_gamma(alpha_sum) - alpha.iter().map(|&a| ln_gamma(a)).sum::<f64>();
    for (&a, &x) in alpha.iter().zip(p.iter()) {
        if a == 1.0 {
            continue;
        }
        out += (a - 1.0) * x.ln();
    }
    out
}

fn dirichlet_draw<R: Probability, G: Rng + ?Sized>(
    alpha: ArrayView1<'_, f64>, rng: &mut G,
) -> ChainResult<Array1<R>> {
    let mut draws = Vec::with_capacity(alpha.len());
    for &a in alpha.iter() {
        let gamma =
            Gamma::new(a, 1.0).map_err(|e| ChainError::SamplingFailed { text: e.to_string() })?;
        draws.push(gamma.sample(rng));
    }
    let total: f64 = draws.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(ChainError::ZeroCountNormalization { what: "Dirichlet draw" });
    }
    Ok(draws.into_iter().map(|d| R::from_f64(d / total)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Concentration validation and the flat constructor.
    // - Dirichlet log density against closed forms.
    // - Sampling valid chains and their mean under a concentrated prior.
    //
    // They intentionally DO NOT cover:
    // - MAP fitting (see `fit`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The flat prior density does not depend on the chain.
    //
    // Given
    // -----
    // - Two different 2-state chains under the flat prior.
    //
    // Expect
    // ------
    // - Equal log densities (each Dirichlet(1,1) density is ln Γ(2) = 0).
    fn flat_prior_density_is_constant() {
        // Arrange
        let prior = DiscreteMarkovChainPrior::flat(2).expect("n > 0");
        let a = DiscreteMarkovChain::new(array![0.3, 0.7], array![[0.9, 0.1], [0.2, 0.8]])
            .expect("valid");
        let b = DiscreteMarkovChain::new(array![0.5, 0.5], array![[0.5, 0.5], [0.0, 1.0]])
            .expect("valid");

        // Act
        let la = prior.log_density(&a).expect("same size");
        let lb = prior.log_density(&b).expect("same size");

        // Assert
        assert_relative_eq!(la, lb, epsilon = 1e-12);
        assert_relative_eq!(la, 0.0, epsilon = 1e-12);
        assert_eq!(a.flat_prior(), prior);
    }

    #[test]
    // Purpose
    // -------
    // Check the Dirichlet density on a Beta(3, 2) marginal.
    //
    // Given
    // -----
    // - p0_alpha = [3, 2], flat rows, p0 = [0.6, 0.4].
    //
    // Expect
    // ------
    // - ln(12 · 0.6² · 0.4) since B(3,2) = 1/12.
    fn log_density_matches_beta_closed_form() {
        // Arrange
        let prior = DiscreteMarkovChainPrior::new(array![3.0, 2.0], Array2::ones((2, 2)))
            .expect("valid");
        let mc = DiscreteMarkovChain::new(array![0.6, 0.4], array![[0.5, 0.5], [0.5, 0.5]])
            .expect("valid");

        // Act
        let ld = prior.log_density(&mc).expect("same size");

        // Assert
        assert_relative_eq!(ld, (12.0 * 0.36 * 0.4_f64).ln(), epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Sampling yields valid chains concentrated around the prior mean.
    //
    // Given
    // -----
    // - p_alpha rows [[900, 100], [200, 800]], seed 3, 200 draws.
    //
    // Expect
    // ------
    // - Average P close to [[0.9, 0.1], [0.2, 0.8]].
    fn sample_concentrates_on_prior_mean() {
        // Arrange
        let prior = DiscreteMarkovChainPrior::new(
            array![50.0, 50.0],
            array![[900.0, 100.0], [200.0, 800.0]],
        )
        .expect("valid");
        let mut rng = StdRng::seed_from_u64(3);

        // Act
        let mut mean = Array2::<f64>::zeros((2, 2));
        for _ in 0..200 {
            let mc: DiscreteMarkovChain<f64> = prior.sample(&mut rng).expect("valid draw");
            mean = mean + &mc.transition_matrix();
        }
        mean /= 200.0;

        // Assert
        assert!((mean[[0, 0]] - 0.9).abs() < 0.01);
        assert!((mean[[1, 1]] - 0.8).abs() < 0.01);
    }

    #[test]
    // Purpose
    // -------
    // Invalid concentrations are rejected.
    //
    // Given
    // -----
    // - A negative entry in p_alpha.
    //
    // Expect
    // ------
    // - InvalidConcentration with row/col context.
    fn invalid_concentrations_are_rejected() {
        let err = DiscreteMarkovChainPrior::new(array![1.0, 1.0], array![[1.0, -1.0], [1.0, 1.0]])
            .expect_err("negative concentration");
        assert_eq!(err, ChainError::InvalidConcentration { row: Some(0), col: 1, value: -1.0 });
    }
}
