//! Validation helpers for Markov-chain inputs.
//!
//! This module centralizes the consistency checks used by the chain, prior,
//! stats and fitting code:
//!
//! - **Probability objects**: [`validate_prob_vec`], [`validate_trans_mat`]
//!   enforce non-negative finite entries and unit sums (per row for
//!   matrices) within the representation's `SUM_TOL`.
//! - **Concentrations**: [`validate_concentration_vec`],
//!   [`validate_concentration_mat`] enforce finite, strictly positive
//!   Dirichlet parameters.
//! - **State sequences**: [`validate_state_sequences`] rejects empty
//!   collections, empty sequences, and out-of-range states.
//!
//! All helpers return [`ChainResult`] with index-level context so callers can
//! point at the offending entry.
use crate::{
    markov::errors::{ChainError, ChainResult},
    numerics::{Probability, sum_probs},
};
use ndarray::{ArrayView1, ArrayView2};

/// Validate a probability vector: non-empty, entries valid, sum ≈ 1.
///
/// # Errors
/// - [`ChainError::EmptyStateSpace`] if `p` is empty.
/// - [`ChainError::InvalidProbability`] for the first invalid entry.
/// - [`ChainError::VectorNotNormalized`] if the sum deviates from one.
pub fn validate_prob_vec<R: Probability>(p: ArrayView1<'_, R>) -> ChainResult<()> {
    if p.is_empty() {
        return Err(ChainError::EmptyStateSpace);
    }
    for (col, &value) in p.iter().enumerate() {
        if !value.is_finite() {
            return Err(ChainError::InvalidProbability { row: None, col, value: value.to_f64() });
        }
    }
    let sum = sum_probs(p.iter().copied()).to_f64();
    if (sum - 1.0).abs() > R::SUM_TOL * p.len() as f64 {
        return Err(ChainError::VectorNotNormalized { sum });
    }
    Ok(())
}

/// Validate a row-stochastic matrix with `nb_states` rows and columns.
///
/// # Errors
/// - [`ChainError::NonSquareMatrix`] / [`ChainError::DimensionMismatch`] on
///   shape problems.
/// - [`ChainError::InvalidProbability`] for the first invalid entry.
/// - [`ChainError::RowNotStochastic`] for the first row whose sum deviates
///   from one.
pub fn validate_trans_mat<R: Probability>(
    p: ArrayView2<'_, R>, nb_states: usize,
) -> ChainResult<()> {
    let (rows, cols) = p.dim();
    if rows != cols {
        return Err(ChainError::NonSquareMatrix { rows, cols });
    }
    if rows != nb_states {
        return Err(ChainError::DimensionMismatch {
            what: "transition matrix",
            expected: nb_states,
            actual: rows,
        });
    }
    for (row, values) in p.outer_iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(ChainError::InvalidProbability {
                    row: Some(row),
                    col,
                    value: value.to_f64(),
                });
            }
        }
        let sum = sum_probs(values.iter().copied()).to_f64();
        if (sum - 1.0).abs() > R::SUM_TOL * cols as f64 {
            return Err(ChainError::RowNotStochastic { row, sum });
        }
    }
    Ok(())
}

/// `true` if `p` is a valid probability vector.
pub fn is_prob_vec<R: Probability>(p: ArrayView1<'_, R>) -> bool {
    validate_prob_vec(p).is_ok()
}

/// `true` if `p` is a valid square row-stochastic matrix.
pub fn is_trans_mat<R: Probability>(p: ArrayView2<'_, R>) -> bool {
    validate_trans_mat(p, p.nrows()).is_ok()
}

/// Validate Dirichlet concentrations for an initial distribution.
///
/// # Errors
/// - [`ChainError::EmptyStateSpace`] if `alpha` is empty.
/// - [`ChainError::InvalidConcentration`] for the first non-finite or
///   non-positive entry.
pub fn validate_concentration_vec(alpha: ArrayView1<'_, f64>) -> ChainResult<()> {
    if alpha.is_empty() {
        return Err(ChainError::EmptyStateSpace);
    }
    for (col, &value) in alpha.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(ChainError::InvalidConcentration { row: None, col, value });
        }
    }
    Ok(())
}

/// Validate row-wise Dirichlet concentrations for a transition matrix.
///
/// # Errors
/// - Shape errors as in [`validate_trans_mat`].
/// - [`ChainError::InvalidConcentration`] for the first invalid entry.
pub fn validate_concentration_mat(alpha: ArrayView2<'_, f64>, nb_states: usize) -> ChainResult<()> {
    let (rows, cols) = alpha.dim();
    if rows != cols {
        return Err(ChainError::NonSquareMatrix { rows, cols });
    }
    if rows != nb_states {
        return Err(ChainError::DimensionMismatch {
            what: "transition concentrations",
            expected: nb_states,
            actual: rows,
        });
    }
    for ((row, col), &value) in alpha.indexed_iter() {
        if !value.is_finite() || value <= 0.0 {
            return Err(ChainError::InvalidConcentration { row: Some(row), col, value });
        }
    }
    Ok(())
}

/// Validate a collection of state sequences against `nb_states`.
///
/// # Errors
/// - [`ChainError::NoSequences`] if the collection is empty.
/// - [`ChainError::EmptySequence`] for the first empty sequence.
/// - [`ChainError::StateOutOfRange`] for the first state `>= nb_states`.
pub fn validate_state_sequences<S: AsRef<[usize]>>(
    sequences: &[S], nb_states: usize,
) -> ChainResult<()> {
    if sequences.is_empty() {
        return Err(ChainError::NoSequences);
    }
    for (index, seq) in sequences.iter().enumerate() {
        let seq = seq.as_ref();
        if seq.is_empty() {
            return Err(ChainError::EmptySequence { index });
        }
        validate_states(seq, nb_states)?;
    }
    Ok(())
}

/// Validate that every state of `states` lies in `0..nb_states`.
///
/// # Errors
/// Returns [`ChainError::StateOutOfRange`] with the first offending time index.
pub fn validate_states(states: &[usize], nb_states: usize) -> ChainResult<()> {
    match states.iter().position(|&s| s >= nb_states) {
        Some(t) => Err(ChainError::StateOutOfRange { t, state: states[t], nb_states }),
        None => Ok(()),
    }
}
