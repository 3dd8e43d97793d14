//! Gaussian emission with closed-form weighted re-estimation.
use crate::hmm::{
    core::emission::{Emission, SampleEmission, WeightedSamples},
    errors::{EmissionError, EmissionResult},
};
use rand::{Rng, distributions::Distribution};
use statrs::distribution::{Continuous, Normal};

/// Variance floor applied by the weighted fit, so a state that captures a
/// single repeated value stays a proper density.
pub const MIN_VARIANCE: f64 = 1e-10;

/// `N(mean, std_dev²)` over `f64` observations.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalEmission {
    mean: f64,
    std_dev: f64,
    dist: Normal,
}

impl NormalEmission {
    /// # Errors
    /// [`EmissionError::InvalidParameter`] unless `mean` is finite and
    /// `std_dev` is finite and positive.
    pub fn new(mean: f64, std_dev: f64) -> EmissionResult<Self> {
        if !mean.is_finite() {
            return Err(EmissionError::InvalidParameter {
                name: "mean",
                value: mean,
                reason: "must be finite",
            });
        }
        if !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(EmissionError::InvalidParameter {
                name: "std_dev",
                value: std_dev,
                reason: "must be finite and > 0",
            });
        }
        let dist = Normal::new(mean, std_dev)
            .map_err(|e| EmissionError::Distribution { text: e.to_string() })?;
        Ok(Self { mean, std_dev, dist })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl Emission for NormalEmission {
    type Obs = f64;

    fn log_density(&self, obs: &f64) -> f64 {
        if !obs.is_finite() {
            return f64::NEG_INFINITY;
        }
        self.dist.ln_pdf(*obs)
    }

    /// Weighted mean and (biased) weighted variance, floored at [`MIN_VARIANCE`].
    fn fit_weighted(&self, samples: &WeightedSamples<'_, f64>) -> EmissionResult<Self> {
        let total = samples.positive_total_weight()?;
        let mut weighted_sum = 0.0;
        for (index, w, &x) in samples.iter_positive() {
            if !x.is_finite() {
                return Err(EmissionError::InvalidObservation { index, reason: "non-finite value" });
            }
            weighted_sum += w * x;
        }
        let mean = weighted_sum / total;
        let var = samples.iter_positive().map(|(_, w, &x)| w * (x - mean).powi(2)).sum::<f64>()
            / total;
        Self::new(mean, var.max(MIN_VARIANCE).sqrt())
    }
}

impl SampleEmission for NormalEmission {
    fn sample<G: Rng + ?Sized>(&self, rng: &mut G) -> f64 {
        self.dist.sample(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parameter validation and density values.
    // - Weighted fitting, including zero weights and the variance floor.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Construction validates parameters; densities match the closed form.
    //
    // Given
    // -----
    // - N(1, 2) at x = 0, and invalid std_dev values.
    //
    // Expect
    // ------
    // - ln pdf = -ln(2√(2π)) - 1/8; InvalidParameter errors; -∞ at NaN.
    fn density_and_validation() {
        // Arrange
        let n = NormalEmission::new(1.0, 2.0).expect("valid");

        // Act
        let ld = n.log_density(&0.0);

        // Assert
        let expected = -(2.0 * (2.0 * std::f64::consts::PI).sqrt()).ln() - 0.125;
        assert_relative_eq!(ld, expected, epsilon = 1e-12);
        assert_eq!(n.log_density(&f64::NAN), f64::NEG_INFINITY);
        assert!(NormalEmission::new(0.0, 0.0).is_err());
        assert!(NormalEmission::new(f64::INFINITY, 1.0).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Weighted fit ignores zero-weight points and matches hand computation.
    //
    // Given
    // -----
    // - x = [1, 3, 100] with weights [1, 3, 0].
    //
    // Expect
    // ------
    // - mean = 2.5, variance = (1·2.25 + 3·0.25)/4 = 0.75.
    fn weighted_fit_matches_hand_computation() {
        // Arrange
        let (a, b, c) = (1.0, 3.0, 100.0);
        let obs = [&a, &b, &c];
        let samples = WeightedSamples::new(&obs, &[1.0, 3.0, 0.0]).expect("valid");
        let start = NormalEmission::new(0.0, 1.0).expect("valid");

        // Act
        let fitted = start.fit_weighted(&samples).expect("fit");

        // Assert
        assert_relative_eq!(fitted.mean(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(fitted.std_dev(), 0.75_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Degenerate data hits the variance floor; sampling matches moments.
    //
    // Given
    // -----
    // - Two identical observations; 20_000 draws from N(-0.8, 0.3).
    //
    // Expect
    // ------
    // - std_dev = sqrt(MIN_VARIANCE); sample mean within 0.01 of -0.8.
    fn variance_floor_and_sampling() {
        // Arrange
        let x = 4.0;
        let obs = [&x, &x];
        let samples = WeightedSamples::new(&obs, &[0.5, 0.5]).expect("valid");
        let n = NormalEmission::new(-0.8, 0.3).expect("valid");
        let mut rng = StdRng::seed_from_u64(1);

        // Act
        let fitted = n.fit_weighted(&samples).expect("fit");
        let mean = (0..20_000).map(|_| n.sample(&mut rng)).sum::<f64>() / 20_000.0;

        // Assert
        assert_relative_eq!(fitted.std_dev(), MIN_VARIANCE.sqrt(), epsilon = 1e-15);
        assert!((mean + 0.8).abs() < 0.01);
    }
}
