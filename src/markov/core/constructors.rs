//! Constructors for probability vectors and row-stochastic matrices.
//!
//! Pure, stateless helpers used to initialize chains and EM runs. Random
//! constructors draw uniformly on the simplex (normalized `Exp(1)` draws) and
//! take the caller's RNG so results are reproducible under a seed.
use crate::{
    markov::errors::{ChainError, ChainResult},
    numerics::Probability,
};
use ndarray::{Array1, Array2};
use rand::{Rng, distributions::Distribution};
use statrs::distribution::Exp;

/// Uniform distribution over `n` states.
///
/// # Errors
/// [`ChainError::EmptyStateSpace`] if `n == 0`.
pub fn uniform_prob_vec<R: Probability>(n: usize) -> ChainResult<Array1<R>> {
    if n == 0 {
        return Err(ChainError::EmptyStateSpace);
    }
    Ok(Array1::from_elem(n, R::from_f64(1.0 / n as f64)))
}

/// `n × n` matrix whose rows are all uniform.
///
/// # Errors
/// [`ChainError::EmptyStateSpace`] if `n == 0`.
pub fn uniform_trans_mat<R: Probability>(n: usize) -> ChainResult<Array2<R>> {
    if n == 0 {
        return Err(ChainError::EmptyStateSpace);
    }
    Ok(Array2::from_elem((n, n), R::from_f64(1.0 / n as f64)))
}

/// Random probability vector of length `n`, uniform on the simplex.
///
/// # Errors
/// [`ChainError::EmptyStateSpace`] if `n == 0`.
pub fn rand_prob_vec<R: Probability, G: Rng + ?Sized>(
    rng: &mut G, n: usize,
) -> ChainResult<Array1<R>> {
    if n == 0 {
        return Err(ChainError::EmptyStateSpace);
    }
    let draws = simplex_draw(rng, n)?;
    Ok(draws.into_iter().map(R::from_f64).collect())
}

/// Random `n × n` row-stochastic matrix with independent uniform rows.
///
/// # Errors
/// [`ChainError::EmptyStateSpace`] if `n == 0`.
pub fn rand_trans_mat<R: Probability, G: Rng + ?Sized>(
    rng: &mut G, n: usize,
) -> ChainResult<Array2<R>> {
    if n == 0 {
        return Err(ChainError::EmptyStateSpace);
    }
    let mut out = Array2::from_elem((n, n), R::zero());
    for mut row in out.outer_iter_mut() {
        let draws = simplex_draw(rng, n)?;
        for (dst, p) in row.iter_mut().zip(draws) {
            *dst = R::from_f64(p);
        }
    }
    Ok(out)
}

// ---- Helper Methods ----

fn simplex_draw<G: Rng + ?Sized>(rng: &mut G, n: usize) -> ChainResult<Vec<f64>> {
    let exp = Exp::new(1.0).map_err(|e| ChainError::SamplingFailed { text: e.to_string() })?;
    let mut draws: Vec<f64> = (0..n).map(|_| exp.sample(rng)).collect();
    let total: f64 = draws.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(ChainError::ZeroCountNormalization { what: "random simplex draw" });
    }
    draws.iter_mut().for_each(|d| *d /= total);
    Ok(draws)
}
