//! Stationary distribution of a discrete Markov chain.
//!
//! The stationary distribution `π` is the left eigenvector of `P` for
//! eigenvalue one, normalized to sum to one. It exists and is unique (and
//! the chain converges to it) only for ergodic chains, so the eigenvalues
//! of `Pᵀ` are inspected first:
//!
//! - eigenvalue one must be simple, otherwise the chain is reducible;
//! - no other eigenvalue may lie on the unit circle, otherwise the chain is
//!   periodic.
//!
//! `π` is then obtained from the linear system `(Pᵀ − I) π = 0` with the
//! last equation replaced by `Σ π = 1`, solved by LU decomposition.
use crate::{
    markov::{
        core::chain::DiscreteMarkovChain,
        errors::{ChainError, ChainResult},
    },
    numerics::Probability,
    optimization::numerical_stability::{EIGEN_EPS, GENERAL_TOL},
};
use nalgebra::{DMatrix, DVector};
use ndarray::Array1;

impl<R: Probability> DiscreteMarkovChain<R> {
    /// Stationary distribution `π` with `π P = π` and `Σ π = 1`.
    ///
    /// # Errors
    /// [`ChainError::NonErgodic`] if eigenvalue one is repeated, another
    /// eigenvalue has unit modulus, or the normalized system is singular.
    pub fn stationary_distribution(&self) -> ChainResult<Array1<R>> {
        let n = self.nb_states();
        let p = self.transition_matrix();
        let pt = DMatrix::from_fn(n, n, |i, j| p[[j, i]].to_f64());

        let mut nb_unit = 0;
        for lambda in pt.complex_eigenvalues().iter() {
            let modulus = lambda.re.hypot(lambda.im);
            if (lambda.re - 1.0).abs() < EIGEN_EPS && lambda.im.abs() < EIGEN_EPS {
                nb_unit += 1;
            } else if (modulus - 1.0).abs() < EIGEN_EPS {
                return Err(ChainError::NonErgodic { reason: "periodic chain" });
            }
        }
        if nb_unit != 1 {
            return Err(ChainError::NonErgodic {
                reason: "eigenvalue 1 is not simple (reducible chain)",
            });
        }

        let mut system = pt - DMatrix::<f64>::identity(n, n);
        system.row_mut(n - 1).fill(1.0);
        let mut rhs = DVector::<f64>::zeros(n);
        rhs[n - 1] = 1.0;
        let solution = system
            .lu()
            .solve(&rhs)
            .ok_or(ChainError::NonErgodic { reason: "singular stationary system" })?;

        let clamped: Vec<f64> = solution
            .iter()
            .map(|&v| if v < 0.0 && v > -GENERAL_TOL { 0.0 } else { v })
            .collect();
        if clamped.iter().any(|v| *v < 0.0 || !v.is_finite()) {
            return Err(ChainError::NonErgodic { reason: "no non-negative solution" });
        }
        let total: f64 = clamped.iter().sum();
        Ok(clamped.into_iter().map(|v| R::from_f64(v / total)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::LogProb;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The closed-form two-state stationary distribution and `π P = π`.
    // - Detection of reducible and periodic chains.
    // - The log-domain representation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Two-state stationary distribution matches the closed form.
    //
    // Given
    // -----
    // - P = [[0.9, 0.1], [0.2, 0.8]].
    //
    // Expect
    // ------
    // - π = [2/3, 1/3], π P = π and Σ π = 1.
    fn two_state_closed_form() {
        // Arrange
        let mc = DiscreteMarkovChain::new(array![0.3, 0.7], array![[0.9, 0.1], [0.2, 0.8]])
            .expect("valid");

        // Act
        let pi = mc.stationary_distribution().expect("ergodic");

        // Assert
        assert_relative_eq!(pi[0], 2.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(pi[1], 1.0 / 3.0, epsilon = 1e-10);
        let pi_p = pi.dot(&mc.transition_matrix());
        for (a, b) in pi.iter().zip(pi_p.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
        assert_relative_eq!(pi.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Non-ergodic chains are detected, not solved.
    //
    // Given
    // -----
    // - The 2x2 identity (reducible) and the 2-cycle [[0, 1], [1, 0]].
    //
    // Expect
    // ------
    // - NonErgodic for both, with distinct reasons.
    fn non_ergodic_chains_are_rejected() {
        // Arrange
        let reducible = DiscreteMarkovChain::new(array![0.5, 0.5], array![[1.0, 0.0], [0.0, 1.0]])
            .expect("valid");
        let periodic = DiscreteMarkovChain::new(array![0.5, 0.5], array![[0.0, 1.0], [1.0, 0.0]])
            .expect("valid");

        // Act
        let e1 = reducible.stationary_distribution().expect_err("reducible");
        let e2 = periodic.stationary_distribution().expect_err("periodic");

        // Assert
        assert!(format!("{e1:?}").contains("reducible"));
        assert!(format!("{e2:?}").contains("periodic"));
    }

    #[test]
    // Purpose
    // -------
    // A three-state chain in log form solves `π P = π`.
    //
    // Given
    // -----
    // - A dense 3-state chain converted to LogProb.
    //
    // Expect
    // ------
    // - Linear π satisfies the balance equations within 1e-10.
    fn three_state_log_domain_balance() {
        // Arrange
        let mc = DiscreteMarkovChain::new(
            array![1.0, 0.0, 0.0],
            array![[0.5, 0.3, 0.2], [0.1, 0.6, 0.3], [0.25, 0.25, 0.5]],
        )
        .expect("valid");
        let mc_log: DiscreteMarkovChain<LogProb> = mc.convert();

        // Act
        let pi: Array1<f64> =
            mc_log.stationary_distribution().expect("ergodic").mapv(|v| v.to_f64());

        // Assert
        let pi_p = pi.dot(&mc.transition_matrix());
        for (a, b) in pi.iter().zip(pi_p.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-10);
        }
    }
}
