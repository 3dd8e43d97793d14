//! Baum-Welch configuration and run states.
use crate::hmm::errors::{HMMError, HMMResult};

/// Options for the Baum-Welch driver.
///
/// Fields
/// ------
/// - `max_iterations`: cap on E-steps (likelihood evaluations), at least
///   one. A run performs at most `max_iterations - 1` M-steps, so every
///   recorded log-likelihood belongs to a model the run produced and the
///   last one to the returned model; `max_iterations = 1` only scores the
///   initial model.
/// - `tol`: minimum log-likelihood improvement required to keep iterating.
/// - `verbose`: emit one structured log record per iteration (feature
///   `obs_slog`; ignored otherwise).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaumWelchOptions {
    pub max_iterations: usize,
    pub tol: f64,
    pub verbose: bool,
}

impl BaumWelchOptions {
    /// # Errors
    /// - [`HMMError::InvalidMaxIterations`] if `max_iterations == 0`.
    /// - [`HMMError::InvalidTolerance`] if `tol` is negative or not finite.
    pub fn new(max_iterations: usize, tol: f64, verbose: bool) -> HMMResult<Self> {
        if max_iterations == 0 {
            return Err(HMMError::InvalidMaxIterations { value: max_iterations });
        }
        if !tol.is_finite() || tol < 0.0 {
            return Err(HMMError::InvalidTolerance { value: tol });
        }
        Ok(Self { max_iterations, tol, verbose })
    }

    pub(crate) fn validate(&self) -> HMMResult<()> {
        Self::new(self.max_iterations, self.tol, self.verbose).map(|_| ())
    }
}

impl Default for BaumWelchOptions {
    fn default() -> Self {
        Self { max_iterations: 100, tol: 1e-5, verbose: false }
    }
}

/// Lifecycle of a Baum-Welch run.
///
/// Only `Converged` and `MaxIterationsReached` are ever reported in an
/// outcome; the other two describe a run in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaumWelchState {
    /// Inputs are being validated.
    Initializing,
    /// EM iterations are running.
    Iterating,
    /// The last improvement fell below `tol`.
    Converged,
    /// The iteration budget ran out first.
    MaxIterationsReached,
}

impl std::fmt::Display for BaumWelchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BaumWelchState::Initializing => "initializing",
            BaumWelchState::Iterating => "iterating",
            BaumWelchState::Converged => "converged",
            BaumWelchState::MaxIterationsReached => "max iterations reached",
        };
        f.write_str(name)
    }
}
