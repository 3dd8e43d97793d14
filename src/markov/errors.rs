//! Errors for discrete-time Markov chains (shape checks, probability axioms,
//! sequence validation, and degenerate estimation inputs).
//!
//! This module defines [`ChainError`], used by the chain, prior, stats and
//! fitting code, plus the [`ChainResult`] alias. It implements
//! `Display`/`Error` and converts to `PyErr` behind `python-bindings`.
//!
//! ## Conventions
//! - **Indices are 0-based**; states are `usize` in `0..nb_states`.
//! - Shape errors are raised at construction, degeneracy errors (zero
//!   probabilities where a log or ratio is needed) at use.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for Markov-chain operations that may produce [`ChainError`].
pub type ChainResult<T> = Result<T, ChainError>;

/// Unified error type for discrete Markov chains.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainError {
    // ---- Shape ----
    /// A chain needs at least one state.
    EmptyStateSpace,

    /// Two objects that must be aligned have different sizes.
    DimensionMismatch { what: &'static str, expected: usize, actual: usize },

    /// The transition matrix is not square.
    NonSquareMatrix { rows: usize, cols: usize },

    // ---- Probability axioms ----
    /// A probability entry is negative or non-finite.
    InvalidProbability { row: Option<usize>, col: usize, value: f64 },

    /// The initial distribution does not sum to one.
    VectorNotNormalized { sum: f64 },

    /// A transition-matrix row does not sum to one.
    RowNotStochastic { row: usize, sum: f64 },

    // ---- Dirichlet concentrations ----
    /// Concentration parameters must be finite and strictly positive.
    InvalidConcentration { row: Option<usize>, col: usize, value: f64 },

    /// The Dirichlet mode requires concentrations of at least one.
    ModeUndefined { row: Option<usize>, col: usize, value: f64 },

    // ---- Sequences ----
    /// No state sequences were supplied.
    NoSequences,

    /// A state sequence is empty.
    EmptySequence { index: usize },

    /// A state lies outside `0..nb_states`.
    StateOutOfRange { t: usize, state: usize, nb_states: usize },

    // ---- Degeneracy ----
    /// The sequence starts in a state with zero initial probability.
    ImpossibleInitialState { state: usize },

    /// The sequence uses a transition with zero probability.
    ImpossibleTransition { t: usize, from: usize, to: usize },

    /// A normalization constant is zero, so no distribution can be formed.
    ZeroCountNormalization { what: &'static str },

    /// The chain has no unique stationary distribution.
    NonErgodic { reason: &'static str },

    /// Sampling-distribution construction failed.
    SamplingFailed { text: String },
}

impl std::error::Error for ChainError {}

impl std::fmt::Display for ChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape ----
            ChainError::EmptyStateSpace => {
                write!(f, "Markov chain must have at least one state")
            }
            ChainError::DimensionMismatch { what, expected, actual } => {
                write!(f, "Dimension mismatch for {what}: expected {expected}, actual {actual}")
            }
            ChainError::NonSquareMatrix { rows, cols } => {
                write!(f, "Transition matrix must be square, got {rows}x{cols}")
            }

            // ---- Probability axioms ----
            ChainError::InvalidProbability { row: Some(row), col, value } => {
                write!(f, "Invalid probability at ({row}, {col}): {value}, must be finite and >= 0")
            }
            ChainError::InvalidProbability { row: None, col, value } => {
                write!(f, "Invalid probability at index {col}: {value}, must be finite and >= 0")
            }
            ChainError::VectorNotNormalized { sum } => {
                write!(f, "Initial distribution sums to {sum}, expected 1")
            }
            ChainError::RowNotStochastic { row, sum } => {
                write!(f, "Transition matrix row {row} sums to {sum}, expected 1")
            }

            // ---- Dirichlet concentrations ----
            ChainError::InvalidConcentration { row: Some(row), col, value } => {
                write!(f, "Invalid concentration at ({row}, {col}): {value}, must be finite and > 0")
            }
            ChainError::InvalidConcentration { row: None, col, value } => {
                write!(f, "Invalid concentration at index {col}: {value}, must be finite and > 0")
            }
            ChainError::ModeUndefined { row: Some(row), col, value } => {
                write!(f, "Dirichlet mode undefined: concentration at ({row}, {col}) is {value} < 1")
            }
            ChainError::ModeUndefined { row: None, col, value } => {
                write!(f, "Dirichlet mode undefined: concentration at index {col} is {value} < 1")
            }

            // ---- Sequences ----
            ChainError::NoSequences => {
                write!(f, "At least one state sequence is required")
            }
            ChainError::EmptySequence { index } => {
                write!(f, "State sequence {index} is empty")
            }
            ChainError::StateOutOfRange { t, state, nb_states } => {
                write!(f, "State {state} at t = {t} is out of range for {nb_states} states")
            }

            // ---- Degeneracy ----
            ChainError::ImpossibleInitialState { state } => {
                write!(f, "Sequence is impossible: initial state {state} has probability zero")
            }
            ChainError::ImpossibleTransition { t, from, to } => {
                write!(f, "Sequence is impossible: transition {from} -> {to} at t = {t} has probability zero")
            }
            ChainError::ZeroCountNormalization { what } => {
                write!(f, "Cannot normalize {what}: total count is zero")
            }
            ChainError::NonErgodic { reason } => {
                write!(f, "Chain is not ergodic: {reason}")
            }
            ChainError::SamplingFailed { text } => {
                write!(f, "Sampling failed: {text}")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl std::convert::From<ChainError> for PyErr {
    fn from(err: ChainError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
