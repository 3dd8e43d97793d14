//! High-level entry point for maximizing a [`LogLikelihood`].
//!
//! Selects L-BFGS with the configured line search, wraps the objective in an
//! [`ArgMinAdapter`] (which minimizes `-ℓ(θ)`), and delegates to
//! [`run_lbfgs`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` from `theta0`.
///
/// # Errors
/// - Errors from `f.check` on the starting point.
/// - Solver configuration or runtime errors, mapped into `OptError`.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_hmm::optimization::{
///     errors::OptResult,
///     loglik_optimizer::{LogLikelihood, MLEOptions, Theta, maximize},
/// };
///
/// struct Concave;
/// impl LogLikelihood for Concave {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Concave, array![0.1, -0.2], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_hmm::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, Tolerances},
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - End-to-end maximization of a smooth concave objective with both line
    //   searches.
    // - Propagation of `check` failures.
    // -------------------------------------------------------------------------

    /// ℓ(θ) = -Σ (θᵢ - i)², maximized at θ = [0, 1, 2].
    struct Bowl;

    impl LogLikelihood for Bowl {
        type Data = usize;

        fn value(&self, theta: &Theta, _: &usize) -> OptResult<f64> {
            Ok(-theta.iter().enumerate().map(|(i, t)| (t - i as f64).powi(2)).sum::<f64>())
        }

        fn check(&self, theta: &Theta, dim: &usize) -> OptResult<()> {
            if theta.len() != *dim {
                return Err(OptError::ThetaLengthMismatch { expected: *dim, actual: theta.len() });
            }
            Ok(())
        }

        fn grad(&self, theta: &Theta, _: &usize) -> OptResult<Grad> {
            Ok(theta.iter().enumerate().map(|(i, t)| -2.0 * (t - i as f64)).collect())
        }
    }

    #[test]
    // Purpose
    // -------
    // Both line searches find the maximizer of a quadratic bowl.
    //
    // Given
    // -----
    // - θ₀ = [5, 5, 5], tol_grad = 1e-10.
    //
    // Expect
    // ------
    // - θ̂ ≈ [0, 1, 2] and ℓ(θ̂) ≈ 0.
    fn maximize_finds_bowl_optimum() {
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            // Arrange
            let tols = Tolerances::new(Some(1e-10), None, Some(100)).expect("valid");
            let opts = MLEOptions::new(tols, ls, false, None).expect("valid");

            // Act
            let out = maximize(&Bowl, array![5.0, 5.0, 5.0], &3, &opts).expect("solvable");

            // Assert
            for (i, t) in out.theta_hat.iter().enumerate() {
                assert_relative_eq!(*t, i as f64, epsilon = 1e-6);
            }
            assert!(out.value > -1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // A failing `check` aborts before any solver work.
    //
    // Given
    // -----
    // - A 2-dimensional start for a 3-dimensional objective.
    //
    // Expect
    // ------
    // - ThetaLengthMismatch.
    fn maximize_propagates_check_errors() {
        let err = maximize(&Bowl, array![0.0, 0.0], &3, &MLEOptions::default())
            .expect_err("wrong dimension");
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 3, actual: 2 });
    }
}
