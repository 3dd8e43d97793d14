//! DiscreteMarkovChain — the transition model of an HMM.
//!
//! Purpose
//! -------
//! Represent a time-homogeneous discrete-time Markov chain on states
//! `0..S` through its initial distribution `p0` and row-stochastic
//! transition matrix `P`, and provide simulation and exact log-likelihood
//! evaluation of realized state paths.
//!
//! Key behaviors
//! -------------
//! - [`DiscreteMarkovChain::new`] validates the probability axioms once;
//!   instances are immutable afterwards and fitting always builds a new one.
//! - [`DiscreteMarkovChain::simulate`] draws `x₀ ~ p0`, then
//!   `x_{t+1} ~ P[x_t, :]`.
//! - [`DiscreteMarkovChain::log_likelihood`] sums `ln p0[x₀]` and
//!   `ln P[x_t, x_{t+1}]`, reporting impossible paths as errors with their
//!   position instead of returning `-∞`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `S ≥ 1`, `p0.len() == S`, `P` is `S × S`.
//! - `p0` and every row of `P` sum to one within `R::SUM_TOL`.
//!
//! Conventions
//! -----------
//! - The numeric representation `R` (linear `f64`/`f32` or log-domain
//!   [`LogProb`](crate::numerics::LogProb)) is a type parameter; use
//!   [`DiscreteMarkovChain::convert`] to switch.
//! - Stationary distributions, priors and fitting live in sibling modules
//!   (`stationary`, `prior`, `fit`) as additional `impl` blocks.
use crate::{
    markov::{
        core::validation::{validate_prob_vec, validate_states, validate_trans_mat},
        errors::{ChainError, ChainResult},
    },
    numerics::Probability,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rand::Rng;

/// DiscreteMarkovChain — initial distribution plus transition matrix.
///
/// Fields
/// ------
/// - `p0`: `Array1<R>`
///   Initial state distribution of length `S`.
/// - `p`: `Array2<R>`
///   Row-stochastic `S × S` transition matrix, `p[[i, j]] = P(x_{t+1} = j | x_t = i)`.
///
/// Invariants
/// ----------
/// - Both fields are valid probability objects (checked by [`DiscreteMarkovChain::new`]).
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteMarkovChain<R: Probability = f64> {
    p0: Array1<R>,
    p: Array2<R>,
}

impl<R: Probability> DiscreteMarkovChain<R> {
    /// Build a chain from an initial distribution and a transition matrix.
    ///
    /// Errors
    /// ------
    /// - [`ChainError::EmptyStateSpace`] if `p0` is empty.
    /// - Shape and probability-axiom errors from the validation helpers.
    pub fn new(p0: Array1<R>, p: Array2<R>) -> ChainResult<Self> {
        validate_prob_vec(p0.view())?;
        validate_trans_mat(p.view(), p0.len())?;
        Ok(Self { p0, p })
    }

    pub fn initial_distribution(&self) -> ArrayView1<'_, R> {
        self.p0.view()
    }

    pub fn transition_matrix(&self) -> ArrayView2<'_, R> {
        self.p.view()
    }

    pub fn nb_states(&self) -> usize {
        self.p0.len()
    }

    /// Re-express the chain in another numeric representation.
    ///
    /// Conversion goes through natural logs, so zeros stay exact zeros.
    pub fn convert<R2: Probability>(&self) -> DiscreteMarkovChain<R2> {
        DiscreteMarkovChain {
            p0: self.p0.mapv(|v| R2::from_ln(v.ln())),
            p: self.p.mapv(|v| R2::from_ln(v.ln())),
        }
    }

    /// Simulate a state path of length `n_steps` (empty when `n_steps == 0`).
    pub fn simulate<G: Rng + ?Sized>(&self, rng: &mut G, n_steps: usize) -> Vec<usize> {
        let mut states = Vec::with_capacity(n_steps);
        if n_steps == 0 {
            return states;
        }
        let mut current = sample_categorical(self.p0.view(), rng);
        states.push(current);
        for _ in 1..n_steps {
            current = sample_categorical(self.p.row(current), rng);
            states.push(current);
        }
        states
    }

    /// Exact log-likelihood of a realized state path.
    ///
    /// Errors
    /// ------
    /// - [`ChainError::EmptySequence`] for an empty path.
    /// - [`ChainError::StateOutOfRange`] for states `>= nb_states`.
    /// - [`ChainError::ImpossibleInitialState`] if `p0[x₀] == 0`.
    /// - [`ChainError::ImpossibleTransition`] if some `P[x_t, x_{t+1}] == 0`;
    ///   `t` is the index of the arrival state.
    pub fn log_likelihood(&self, states: &[usize]) -> ChainResult<f64> {
        if states.is_empty() {
            return Err(ChainError::EmptySequence { index: 0 });
        }
        validate_states(states, self.nb_states())?;
        let first = states[0];
        let start = self.p0[first];
        if start.is_zero() {
            return Err(ChainError::ImpossibleInitialState { state: first });
        }
        let mut loglik = start.ln();
        for (t, pair) in states.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let q = self.p[[from, to]];
            if q.is_zero() {
                return Err(ChainError::ImpossibleTransition { t: t + 1, from, to });
            }
            loglik += q.ln();
        }
        Ok(loglik)
    }
}

/// Draw an index from an (unnormalized) categorical distribution.
///
/// Falls back to the last index with positive mass when rounding leaves the
/// uniform draw just above the cumulative total.
pub(crate) fn sample_categorical<R: Probability, G: Rng + ?Sized>(
    probs: ArrayView1<'_, R>, rng: &mut G,
) -> usize {
    let total: f64 = probs.iter().map(|p| p.to_f64()).sum();
    let u = rng.gen_range(0.0..1.0) * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, p) in probs.iter().enumerate() {
        let w = p.to_f64();
        if w > 0.0 {
            last_positive = i;
        }
        cumulative += w;
        if u < cumulative {
            return i;
        }
    }
    last_positive
}
