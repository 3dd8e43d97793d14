//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), using explicit
//! cutoffs (`x > 20.0`) to keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: distance under which an eigenvalue is treated as lying
//!   on the unit circle (or equal to one) in ergodicity checks.
//! - [`GENERAL_TOL`]: generic clamping tolerance for values that should be
//!   non-negative but can pick up rounding noise (e.g. solved probability
//!   vectors).
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//! - [`safe_softplus_inv(x)`]: inverse of softplus, mapping
//!   (0, ∞) → ℝ without catastrophic cancellation.
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`, which is also the
//!   derivative of softplus.
//! - [`log_sum_exp(values)`]: max-shifted `ln Σ exp(vᵢ)`.
//!
//! # Rationale
//! These transforms are building blocks in optimization and
//! probabilistic modeling whenever parameters must be kept
//! strictly positive or probabilities are handled in log space.

/// Tolerance for locating eigenvalues on the unit circle.
pub const EIGEN_EPS: f64 = 1e-8;

/// Generic tolerance for clamping rounding noise.
pub const GENERAL_TOL: f64 = 1e-10;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves for `t` in
/// `softplus(t) = x`, returning `t = ln(exp(x) - 1)`.
///
/// - For sufficiently large `x`, `ln(exp(x) - 1) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
///
/// # Parameters
/// - `x`: a positive real (the softplus output), must be finite and `> 0`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// Branches on the sign of `x` so that `exp` is only ever evaluated at a
/// non-positive argument.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Max-shifted `ln Σ exp(vᵢ)`.
///
/// Returns `-∞` for an empty input or when every value is `-∞`, and `+∞` if
/// any value is `+∞`.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    let shifted: f64 = values.iter().map(|&v| (v - max).exp()).sum();
    max + shifted.ln()
}
