//! Exponential emission with closed-form weighted rate and Gamma MAP.
use crate::hmm::{
    core::emission::{Emission, EmissionPrior, SampleEmission, WeightedSamples},
    emissions::rate_prior::GammaRatePrior,
    errors::{EmissionError, EmissionResult},
};
use rand::{Rng, distributions::Distribution};
use statrs::distribution::{Continuous, Exp};

/// `Exp(rate)` over non-negative `f64` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialEmission {
    rate: f64,
    dist: Exp,
}

impl ExponentialEmission {
    /// # Errors
    /// [`EmissionError::InvalidParameter`] unless `rate` is finite and positive.
    pub fn new(rate: f64) -> EmissionResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EmissionError::InvalidParameter {
                name: "rate",
                value: rate,
                reason: "must be finite and > 0",
            });
        }
        let dist = Exp::new(rate).map_err(|e| EmissionError::Distribution { text: e.to_string() })?;
        Ok(Self { rate, dist })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Weighted event count and exposure `(Σ w, Σ w·x)`.
    fn sufficient_stats(samples: &WeightedSamples<'_, f64>) -> EmissionResult<(f64, f64)> {
        let mut events = 0.0;
        let mut exposure = 0.0;
        for (index, w, &x) in samples.iter_positive() {
            if !x.is_finite() || x < 0.0 {
                return Err(EmissionError::InvalidObservation {
                    index,
                    reason: "outside the support [0, ∞)",
                });
            }
            events += w;
            exposure += w * x;
        }
        Ok((events, exposure))
    }
}

impl Emission for ExponentialEmission {
    type Obs = f64;

    fn log_density(&self, obs: &f64) -> f64 {
        if !obs.is_finite() || *obs < 0.0 {
            return f64::NEG_INFINITY;
        }
        self.dist.ln_pdf(*obs)
    }

    /// `rate = Σ w / Σ w·x`.
    fn fit_weighted(&self, samples: &WeightedSamples<'_, f64>) -> EmissionResult<Self> {
        samples.positive_total_weight()?;
        let (events, exposure) = Self::sufficient_stats(samples)?;
        if exposure <= 0.0 {
            return Err(EmissionError::DegenerateSamples { reason: "all weighted values are zero" });
        }
        Self::new(events / exposure)
    }
}

impl SampleEmission for ExponentialEmission {
    fn sample<G: Rng + ?Sized>(&self, rng: &mut G) -> f64 {
        self.dist.sample(rng)
    }
}

impl EmissionPrior<ExponentialEmission> for GammaRatePrior {
    fn fit_map(
        &self, _current: &ExponentialEmission, samples: &WeightedSamples<'_, f64>,
    ) -> EmissionResult<ExponentialEmission> {
        let (events, exposure) = ExponentialEmission::sufficient_stats(samples)?;
        ExponentialEmission::new(self.posterior_mode(events, exposure)?)
    }

    fn log_density(&self, emission: &ExponentialEmission) -> f64 {
        self.ln_pdf(emission.rate())
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
    // - Density values and support.
    // - Weighted MLE and Gamma MAP updates.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Density is ln λ − λx on [0, ∞) and -∞ elsewhere.
    //
    // Given
    // -----
    // - Exp(2) at 0.5 and at -0.1.
    //
    // Expect
    // ------
    // - ln 2 − 1 and -∞.
    fn density_and_support() {
        // Arrange
        let e = ExponentialEmission::new(2.0).expect("valid");

        // Act / Assert
        assert_relative_eq!(e.log_density(&0.5), 2.0_f64.ln() - 1.0, epsilon = 1e-12);
        assert_eq!(e.log_density(&-0.1), f64::NEG_INFINITY);
        assert!(ExponentialEmission::new(0.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // MLE and MAP rates match their closed forms.
    //
    // Given
    // -----
    // - x = [0.5, 1.5, -3.0] with weights [2, 2, 0]; prior Gamma(3, 1).
    //
    // Expect
    // ------
    // - MLE = 4 / 4 = 1; MAP = (3 − 1 + 4) / (1 + 4) = 1.2; a negative
    //   value with positive weight is rejected.
    fn mle_and_map_rates() {
        // Arrange
        let (a, b, c) = (0.5, 1.5, -3.0);
        let obs = [&a, &b, &c];
        let samples = WeightedSamples::new(&obs, &[2.0, 2.0, 0.0]).expect("valid");
        let bad = WeightedSamples::new(&obs, &[1.0, 1.0, 1.0]).expect("valid");
        let start = ExponentialEmission::new(3.0).expect("valid");
        let prior = GammaRatePrior::new(3.0, 1.0).expect("valid");

        // Act
        let mle = start.fit_weighted(&samples).expect("fit");
        let map = prior.fit_map(&start, &samples).expect("fit");
        let err = start.fit_weighted(&bad).expect_err("negative value");

        // Assert
        assert_relative_eq!(mle.rate(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(map.rate(), 1.2, epsilon = 1e-12);
        assert!(matches!(err, EmissionError::InvalidObservation { index: 2, .. }));
    }
}
