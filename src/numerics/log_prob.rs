//! LogProb — probabilities stored as natural logarithms.
//!
//! Purpose
//! -------
//! Provide an underflow-free probability type for long observation
//! sequences. Products become sums of logs and sums become a stable
//! log-sum-exp, so forward-backward can run without per-step rescaling
//! ever losing mass to denormals.
//!
//! Key behaviors
//! -------------
//! - `a + b` computes `ln(e^a + e^b)` with the max-shift trick.
//! - `a * b` is `a.0 + b.0`; `a / b` is `a.0 - b.0`.
//! - Ordering follows the linear probabilities since `ln` is monotone.
//!
//! Invariants & assumptions
//! ------------------------
//! - The stored value is `ln p` for some `p ≥ 0`; `p = 0` is `-∞`.
//! - `+∞` and `NaN` never arise from valid inputs and are reported as
//!   non-finite by [`Probability::is_finite`].
use crate::{
    numerics::probability::Probability, optimization::numerical_stability::log_sum_exp,
};
use std::ops::{Add, Div, Mul};

/// A probability represented by its natural logarithm.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LogProb(pub f64);

impl LogProb {
    /// The stored log value.
    #[inline]
    pub fn ln_value(self) -> f64 {
        self.0
    }
}

impl Default for LogProb {
    fn default() -> Self {
        LogProb(f64::NEG_INFINITY)
    }
}

impl Add for LogProb {
    type Output = LogProb;

    #[inline]
    fn add(self, rhs: LogProb) -> LogProb {
        LogProb(log_sum_exp(&[self.0, rhs.0]))
    }
}

impl Mul for LogProb {
    type Output = LogProb;

    #[inline]
    fn mul(self, rhs: LogProb) -> LogProb {
        LogProb(self.0 + rhs.0)
    }
}

impl Div for LogProb {
    type Output = LogProb;

    #[inline]
    fn div(self, rhs: LogProb) -> LogProb {
        // 0 / x stays 0, including the 0 / 0 case the kernels never rely on.
        if self.0 == f64::NEG_INFINITY {
            return self;
        }
        LogProb(self.0 - rhs.0)
    }
}

impl Probability for LogProb {
    const SUM_TOL: f64 = 1e-8;
    const NAME: &'static str = "LogProb";

    #[inline]
    fn zero() -> Self {
        LogProb(f64::NEG_INFINITY)
    }

    #[inline]
    fn one() -> Self {
        LogProb(0.0)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        LogProb(value.ln())
    }

    #[inline]
    fn from_ln(ln_value: f64) -> Self {
        LogProb(ln_value)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.0.exp()
    }

    #[inline]
    fn ln(self) -> f64 {
        self.0
    }

    #[inline]
    fn is_finite(self) -> bool {
        !self.0.is_nan() && self.0 != f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::probability::sum_probs;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Log-sum-exp addition, including the zero identity.
    // - Products/quotients and ordering against linear probabilities.
    // - Behavior far below the f64 denormal range.
    //
    // They intentionally DO NOT cover:
    // - Forward-backward agreement, tested in `hmm::core::forward_backward`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check that `+`, `*`, `/` match linear arithmetic on moderate values.
    //
    // Given
    // -----
    // - p = 0.2, q = 0.5 in log form.
    //
    // Expect
    // ------
    // - p + q = 0.7, p * q = 0.1, p / q = 0.4.
    fn arithmetic_matches_linear_values() {
        // Arrange
        let p = LogProb::from_f64(0.2);
        let q = LogProb::from_f64(0.5);

        // Act
        let sum = p + q;
        let prod = p * q;
        let quot = p / q;

        // Assert
        assert_relative_eq!(sum.to_f64(), 0.7, epsilon = 1e-14);
        assert_relative_eq!(prod.to_f64(), 0.1, epsilon = 1e-14);
        assert_relative_eq!(quot.to_f64(), 0.4, epsilon = 1e-14);
        assert!(p < q);
    }

    #[test]
    // Purpose
    // -------
    // Ensure zero behaves as the additive identity and absorbs products.
    //
    // Given
    // -----
    // - LogProb::zero() and p = 0.3.
    //
    // Expect
    // ------
    // - 0 + p = p, p * 0 = 0, 0 / p = 0, and is_zero holds.
    fn zero_is_identity_and_absorbing() {
        // Arrange
        let zero = LogProb::zero();
        let p = LogProb::from_f64(0.3);

        // Act / Assert
        assert_eq!(zero + p, p);
        assert_eq!(p + zero, p);
        assert!((p * zero).is_zero());
        assert!((zero / p).is_zero());
        assert!((zero + zero).is_zero());
    }

    #[test]
    // Purpose
    // -------
    // Show that masses far below f64::MIN_POSITIVE stay representable.
    //
    // Given
    // -----
    // - 1000 factors of 1e-5 multiplied together, then summed with itself.
    //
    // Expect
    // ------
    // - ln of the product is 1000·ln(1e-5); doubling adds ln 2.
    fn tiny_products_do_not_underflow() {
        // Arrange
        let factor = LogProb::from_f64(1e-5);

        // Act
        let prod = (0..1000).fold(LogProb::one(), |acc, _| acc * factor);
        let doubled = sum_probs([prod, prod]);

        // Assert
        assert_relative_eq!(prod.ln(), 1000.0 * 1e-5_f64.ln(), epsilon = 1e-8);
        assert_relative_eq!(doubled.ln() - prod.ln(), 2.0_f64.ln(), epsilon = 1e-12);
        assert!(prod.is_finite());
        assert_eq!(prod.to_f64(), 0.0);
    }
}
