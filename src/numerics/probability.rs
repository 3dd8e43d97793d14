//! Probability — numeric abstraction shared by every likelihood kernel.
//!
//! Purpose
//! -------
//! Let the Markov-chain and forward-backward code be written once and run
//! either on plain linear probabilities (`f64`, `f32`) or on a log-domain
//! representation ([`LogProb`](crate::numerics::LogProb)) that cannot
//! underflow on long sequences.
//!
//! Key behaviors
//! -------------
//! - [`Probability`] exposes the handful of operations the algorithms need:
//!   `+`, `*`, `/`, ordering, conversion from/to linear `f64`, and `ln`.
//! - Linear impls for `f64` and `f32` are thin wrappers over the float
//!   arithmetic; the single-precision impl exists so callers can trade
//!   accuracy for memory.
//!
//! Invariants & assumptions
//! ------------------------
//! - Values handled through this trait are non-negative probabilities or
//!   unnormalized masses; negative inputs are a caller bug and are rejected by
//!   the validation layers in `markov` and `hmm`, never here.
//! - `zero()` is the additive identity and absorbing for `*`; `one()` is the
//!   multiplicative identity.
//!
//! Conventions
//! -----------
//! - `from_ln(x)` builds the value whose natural log is `x`; `ln()` is its
//!   inverse. For linear types this goes through `exp`/`ln`.
//! - `SUM_TOL` is the tolerance used when checking that a vector "sums to
//!   one" in this representation.
use std::{
    fmt::Debug,
    ops::{Add, Div, Mul},
};

/// Numeric value type used for probabilities and likelihood masses.
///
/// Implemented for `f64`, `f32` and [`LogProb`](crate::numerics::LogProb).
pub trait Probability:
    Copy
    + Debug
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Tolerance used by "sums to one" checks.
    const SUM_TOL: f64;

    /// Human-readable representation name (used in error messages).
    const NAME: &'static str;

    fn zero() -> Self;
    fn one() -> Self;

    /// Build from a linear-scale value.
    fn from_f64(value: f64) -> Self;

    /// Build from a natural-log value.
    fn from_ln(ln_value: f64) -> Self;

    /// Linear-scale value as `f64`.
    fn to_f64(self) -> f64;

    /// Natural logarithm as `f64`.
    fn ln(self) -> f64;

    fn is_zero(self) -> bool {
        self == Self::zero()
    }

    /// `true` when the value is a usable, finite non-negative mass.
    fn is_finite(self) -> bool;
}

impl Probability for f64 {
    const SUM_TOL: f64 = 1e-8;
    const NAME: &'static str = "f64";

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn from_ln(ln_value: f64) -> Self {
        ln_value.exp()
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn ln(self) -> f64 {
        f64::ln(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self) && self >= 0.0
    }
}

impl Probability for f32 {
    const SUM_TOL: f64 = 1e-4;
    const NAME: &'static str = "f32";

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn from_ln(ln_value: f64) -> Self {
        ln_value.exp() as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn ln(self) -> f64 {
        (self as f64).ln()
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self) && self >= 0.0
    }
}

/// Sum an iterator of probabilities with the representation's own `+`.
pub fn sum_probs<R: Probability, I: IntoIterator<Item = R>>(values: I) -> R {
    values.into_iter().fold(R::zero(), |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Identity elements and ln/exp conversions for the linear impls.
    // - `sum_probs` folding.
    //
    // They intentionally DO NOT cover:
    // - The log-domain type, which has its own tests in `log_prob`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check that the linear impls round-trip through `from_ln`/`ln`.
    //
    // Given
    // -----
    // - ln(0.25).
    //
    // Expect
    // ------
    // - `f64` and `f32` both recover 0.25 within their precision.
    fn linear_impls_convert_through_logs() {
        // Arrange
        let ln_quarter = 0.25_f64.ln();

        // Act
        let a = <f64 as Probability>::from_ln(ln_quarter);
        let b = <f32 as Probability>::from_ln(ln_quarter);

        // Assert
        assert_relative_eq!(a, 0.25, epsilon = 1e-15);
        assert_relative_eq!(b.to_f64(), 0.25, epsilon = 1e-7);
        assert_relative_eq!(Probability::ln(a), ln_quarter, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Verify `sum_probs` and the zero predicate on `f64`.
    //
    // Given
    // -----
    // - Values [0.1, 0.2, 0.7] and an empty iterator.
    //
    // Expect
    // ------
    // - Sum is 1.0; the empty sum is zero.
    fn sum_probs_folds_from_zero() {
        // Arrange
        let values = [0.1_f64, 0.2, 0.7];

        // Act
        let total: f64 = sum_probs(values);
        let empty: f64 = sum_probs(std::iter::empty());

        // Assert
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        assert!(Probability::is_zero(empty));
        assert!(!Probability::is_finite(-1.0_f64));
    }
}
