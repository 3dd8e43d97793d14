//! point_process — event histories and Poisson-process emissions.
//!
//! Purpose
//! -------
//! Let HMM states emit whole event histories instead of scalars: a
//! [`History`] holds marked event times on a window, and a
//! [`MultivariatePoissonProcess`] evaluates and re-estimates per-mark rates
//! from weighted collections of histories.
//!
//! Conventions
//! -----------
//! - Windows are half-open `[tmin, tmax)`; marks are `usize` indices for
//!   the Poisson family but any type for the container itself.
//! - Errors from history manipulation are [`HistoryError`]s and convert
//!   into `EmissionError` at the emission boundary.

pub mod errors;
pub mod history;
pub mod poisson;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{HistoryError, HistoryResult};
pub use self::history::History;
pub use self::poisson::MultivariatePoissonProcess;
