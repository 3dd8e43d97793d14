//! Errors for event histories (window, ordering and rescaling checks).
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// The observation window must satisfy `tmin < tmax` with finite ends.
    InvalidWindow { tmin: f64, tmax: f64 },

    /// `times` and `marks` have different lengths.
    LengthMismatch { times: usize, marks: usize },

    /// An event time lies outside `[tmin, tmax)` or is not finite.
    TimeOutOfWindow { index: usize, time: f64 },

    /// Event times must be non-decreasing.
    UnorderedTimes { index: usize, previous: f64, time: f64 },

    /// Appended histories must start where the current one ends.
    NonContiguous { tmax: f64, next_tmin: f64 },

    /// A time change must map the history to a non-decreasing finite one.
    NonMonotoneTimeChange { index: usize },

    /// Chunk durations must be finite and strictly positive.
    InvalidChunkDuration { value: f64 },
}

impl std::error::Error for HistoryError {}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::InvalidWindow { tmin, tmax } => {
                write!(f, "Invalid window [{tmin}, {tmax}): need finite tmin < tmax")
            }
            HistoryError::LengthMismatch { times, marks } => {
                write!(f, "Got {times} event times but {marks} marks")
            }
            HistoryError::TimeOutOfWindow { index, time } => {
                write!(f, "Event {index} at time {time} is outside the observation window")
            }
            HistoryError::UnorderedTimes { index, previous, time } => {
                write!(f, "Event {index} at time {time} precedes the previous event at {previous}")
            }
            HistoryError::NonContiguous { tmax, next_tmin } => {
                write!(f, "Cannot append a history starting at {next_tmin} to one ending at {tmax}")
            }
            HistoryError::NonMonotoneTimeChange { index } => {
                write!(f, "Time change is not monotone (or not finite) at event {index}")
            }
            HistoryError::InvalidChunkDuration { value } => {
                write!(f, "Invalid chunk duration {value}: must be finite and > 0")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<HistoryError> for PyErr {
    fn from(err: HistoryError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
