//! Errors for hidden Markov models: emission fitting, forward-backward
//! degeneracies, and Baum-Welch configuration.
//!
//! This module defines two enums and their result aliases:
//!
//! - [`EmissionError`] / [`EmissionResult`]: raised by emission families
//!   when parameters, weighted samples or observations are invalid, or when
//!   a numerical M-step fails.
//! - [`HMMError`] / [`HMMResult`]: raised by the model, the
//!   forward-backward engine and the Baum-Welch driver. Chain and emission
//!   errors are wrapped with the state or sequence they belong to.
//!
//! ## Conventions
//! - **Shape errors** (emission count, empty inputs, workspace shape) fail
//!   at construction or entry.
//! - **Degeneracy errors** separate "impossible under this model"
//!   ([`HMMError::ImpossibleObservation`], [`HMMError::ZeroLikelihood`])
//!   from "insufficient data" (zero weights or counts in the M-step).
//! - Reaching the iteration budget is **not** an error; see
//!   `BaumWelchState::MaxIterationsReached`.
use crate::{
    markov::errors::ChainError, optimization::errors::OptError,
    point_process::errors::HistoryError,
};
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for emission operations.
pub type EmissionResult<T> = Result<T, EmissionError>;

/// Result alias for HMM operations.
pub type HMMResult<T> = Result<T, HMMError>;

/// Errors raised by emission families.
#[derive(Debug, Clone, PartialEq)]
pub enum EmissionError {
    // ---- Parameters ----
    /// A distribution parameter is outside its domain.
    InvalidParameter { name: &'static str, value: f64, reason: &'static str },

    /// A parameter vector has the wrong length.
    DimensionMismatch { expected: usize, actual: usize },

    /// A `statrs` distribution rejected its parameters.
    Distribution { text: String },

    // ---- Weighted samples ----
    /// Weights and observations are not aligned.
    WeightLengthMismatch { weights: usize, observations: usize },

    /// A weight is negative or non-finite.
    InvalidWeight { index: usize, value: f64 },

    /// The weights sum to zero, so nothing can be estimated.
    ZeroTotalWeight,

    /// An observation carrying positive weight is outside the support.
    InvalidObservation { index: usize, reason: &'static str },

    /// The weighted sufficient statistics do not identify the parameters.
    DegenerateSamples { reason: &'static str },

    // ---- Wrapped ----
    /// Numerical weighted MLE failed.
    Optimization(OptError),

    /// A history observation was rejected.
    History(HistoryError),
}

impl std::error::Error for EmissionError {}

impl std::fmt::Display for EmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Parameters ----
            EmissionError::InvalidParameter { name, value, reason } => {
                write!(f, "Invalid emission parameter {name} = {value}: {reason}")
            }
            EmissionError::DimensionMismatch { expected, actual } => {
                write!(f, "Emission parameter length mismatch: expected {expected}, got {actual}")
            }
            EmissionError::Distribution { text } => {
                write!(f, "Distribution construction failed: {text}")
            }

            // ---- Weighted samples ----
            EmissionError::WeightLengthMismatch { weights, observations } => {
                write!(f, "Got {weights} weights for {observations} observations")
            }
            EmissionError::InvalidWeight { index, value } => {
                write!(f, "Invalid weight at index {index}: {value}, must be finite and >= 0")
            }
            EmissionError::ZeroTotalWeight => {
                write!(f, "Weighted samples have zero total weight")
            }
            EmissionError::InvalidObservation { index, reason } => {
                write!(f, "Invalid observation at index {index}: {reason}")
            }
            EmissionError::DegenerateSamples { reason } => {
                write!(f, "Degenerate weighted samples: {reason}")
            }

            // ---- Wrapped ----
            EmissionError::Optimization(err) => write!(f, "Weighted MLE failed: {err}"),
            EmissionError::History(err) => write!(f, "History error: {err}"),
        }
    }
}

impl From<OptError> for EmissionError {
    fn from(err: OptError) -> Self {
        EmissionError::Optimization(err)
    }
}

impl From<HistoryError> for EmissionError {
    fn from(err: HistoryError) -> Self {
        EmissionError::History(err)
    }
}

/// Errors raised by HMM construction, inference and estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum HMMError {
    // ---- Wrapped ----
    /// Transition-model error (construction or M-step).
    Chain(ChainError),

    /// Emission error, with the state it belongs to when known.
    Emission { state: Option<usize>, source: EmissionError },

    /// Error raised while processing one of several sequences.
    InSequence { index: usize, source: Box<HMMError> },

    // ---- Shape ----
    /// The number of emissions differs from the number of states.
    EmissionCountMismatch { states: usize, emissions: usize },

    /// No observation sequences were supplied.
    NoSequences,

    /// An observation sequence is empty.
    EmptySequence { index: usize },

    /// A workspace was used with a model or sequence of another shape.
    WorkspaceShape { expected: (usize, usize), actual: (usize, usize) },

    // ---- Degeneracy ----
    /// Observation `t` has zero density under every state.
    ImpossibleObservation { t: usize },

    /// An emission returned NaN or `+∞` as a log density.
    InvalidDensity { state: usize, t: usize, value: f64 },

    /// The forward (or backward) mass vanished at step `t`: every state
    /// that can emit observation `t` is unreachable.
    ZeroLikelihood { t: usize },

    // ---- Baum-Welch options ----
    /// `max_iterations` must be at least one.
    InvalidMaxIterations { value: usize },

    /// `tol` must be finite and non-negative.
    InvalidTolerance { value: f64 },
}

impl HMMError {
    /// Attach a sequence index, leaving single-sequence errors readable.
    pub(crate) fn in_sequence(index: usize, err: HMMError) -> HMMError {
        HMMError::InSequence { index, source: Box::new(err) }
    }
}

impl std::error::Error for HMMError {}

impl std::fmt::Display for HMMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Wrapped ----
            HMMError::Chain(err) => write!(f, "Transition model error: {err}"),
            HMMError::Emission { state: Some(s), source } => {
                write!(f, "Emission error in state {s}: {source}")
            }
            HMMError::Emission { state: None, source } => write!(f, "Emission error: {source}"),
            HMMError::InSequence { index, source } => write!(f, "Sequence {index}: {source}"),

            // ---- Shape ----
            HMMError::EmissionCountMismatch { states, emissions } => {
                write!(f, "Model has {states} states but {emissions} emissions")
            }
            HMMError::NoSequences => write!(f, "No observation sequences supplied"),
            HMMError::EmptySequence { index } => write!(f, "Observation sequence {index} is empty"),
            HMMError::WorkspaceShape { expected, actual } => {
                write!(f, "Workspace shape mismatch: expected {expected:?}, got {actual:?}")
            }

            // ---- Degeneracy ----
            HMMError::ImpossibleObservation { t } => {
                write!(f, "Observation {t} has zero density under every state")
            }
            HMMError::InvalidDensity { state, t, value } => {
                write!(f, "Invalid log density {value} for state {state} at observation {t}")
            }
            HMMError::ZeroLikelihood { t } => {
                write!(f, "Sequence is impossible under the model at step {t}")
            }

            // ---- Baum-Welch options ----
            HMMError::InvalidMaxIterations { value } => {
                write!(f, "Invalid max_iterations {value}: must be at least 1")
            }
            HMMError::InvalidTolerance { value } => {
                write!(f, "Invalid tolerance {value}: must be finite and >= 0")
            }
        }
    }
}

impl From<ChainError> for HMMError {
    fn from(err: ChainError) -> Self {
        HMMError::Chain(err)
    }
}

impl From<EmissionError> for HMMError {
    fn from(err: EmissionError) -> Self {
        HMMError::Emission { state: None, source: err }
    }
}

#[cfg(feature = "python-bindings")]
impl From<EmissionError> for PyErr {
    fn from(err: EmissionError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(feature = "python-bindings")]
impl From<HMMError> for PyErr {
    fn from(err: HMMError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
