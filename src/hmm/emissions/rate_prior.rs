//! Gamma prior on positive rates, shared by rate-parameterized emissions.
//!
//! For a rate `λ` with `Gamma(shape = a, rate = b)` prior and weighted
//! evidence of `n` events over exposure `τ`, the posterior is
//! `Gamma(a + n, b + τ)` and its mode `(a − 1 + n) / (b + τ)` is the MAP
//! estimate. The mode requires `a ≥ 1`, the same convention as the
//! Dirichlet prior on transitions.
use crate::hmm::errors::{EmissionError, EmissionResult};
use statrs::distribution::{Continuous, Gamma};

/// `Gamma(shape, rate)` prior on a positive rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaRatePrior {
    shape: f64,
    rate: f64,
}

impl GammaRatePrior {
    /// # Errors
    /// [`EmissionError::InvalidParameter`] unless `shape ≥ 1` and `rate ≥ 0`,
    /// both finite.
    pub fn new(shape: f64, rate: f64) -> EmissionResult<Self> {
        if !shape.is_finite() || shape < 1.0 {
            return Err(EmissionError::InvalidParameter {
                name: "shape",
                value: shape,
                reason: "must be finite and >= 1 for the posterior mode to exist",
            });
        }
        if !rate.is_finite() || rate < 0.0 {
            return Err(EmissionError::InvalidParameter {
                name: "rate",
                value: rate,
                reason: "must be finite and >= 0",
            });
        }
        Ok(Self { shape, rate })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Posterior mode given `events` (weighted count) over `exposure`.
    ///
    /// # Errors
    /// [`EmissionError::DegenerateSamples`] when the posterior has no
    /// finite mode (no exposure and no prior rate).
    pub fn posterior_mode(&self, events: f64, exposure: f64) -> EmissionResult<f64> {
        let denom = self.rate + exposure;
        if denom <= 0.0 {
            return Err(EmissionError::DegenerateSamples { reason: "zero posterior rate" });
        }
        Ok((self.shape - 1.0 + events) / denom)
    }

    /// Log prior density of `lambda` (`-∞` outside `[0, ∞)`).
    ///
    /// An improper prior (`rate == 0`) contributes `(a − 1) ln λ`.
    pub fn ln_pdf(&self, lambda: f64) -> f64 {
        if lambda < 0.0 || !lambda.is_finite() {
            return f64::NEG_INFINITY;
        }
        if lambda == 0.0 {
            return if self.shape == 1.0 { self.rate.ln() } else { f64::NEG_INFINITY };
        }
        match Gamma::new(self.shape, self.rate) {
            Ok(g) => g.ln_pdf(lambda),
            Err(_) => (self.shape - 1.0) * lambda.ln(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parameter validation, the posterior mode, and the log density.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Pin the posterior-mode convention.
    //
    // Given
    // -----
    // - Gamma(3, 2) prior, 5 events over exposure 4.
    //
    // Expect
    // ------
    // - (3 − 1 + 5) / (2 + 4) = 7/6; shape < 1 rejected; no exposure with
    //   rate 0 is degenerate.
    fn posterior_mode_convention() {
        // Arrange
        let prior = GammaRatePrior::new(3.0, 2.0).expect("valid");
        let improper = GammaRatePrior::new(1.0, 0.0).expect("valid");

        // Act
        let mode = prior.posterior_mode(5.0, 4.0).expect("finite mode");

        // Assert
        assert_relative_eq!(mode, 7.0 / 6.0, epsilon = 1e-12);
        assert!(GammaRatePrior::new(0.5, 1.0).is_err());
        assert!(improper.posterior_mode(0.0, 0.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Log density matches the Gamma closed form and handles the support.
    //
    // Given
    // -----
    // - Gamma(2, 3) at λ = 0.5, and λ = -1.
    //
    // Expect
    // ------
    // - ln(9 · 0.5 · e^{-1.5}); -∞ outside the support.
    fn log_density_matches_closed_form() {
        // Arrange
        let prior = GammaRatePrior::new(2.0, 3.0).expect("valid");

        // Act
        let ld = prior.ln_pdf(0.5);

        // Assert
        assert_relative_eq!(ld, (9.0_f64 * 0.5).ln() - 1.5, epsilon = 1e-12);
        assert_eq!(prior.ln_pdf(-1.0), f64::NEG_INFINITY);
    }
}
