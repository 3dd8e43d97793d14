//! ForwardBackwardWorkspace — owned buffers for one forward-backward run.
//!
//! Purpose
//! -------
//! Hold every array the forward-backward engine writes so that repeated
//! calls (across sequences and EM iterations) reuse allocations instead of
//! reallocating `O(S²·T)` memory each time.
//!
//! Key behaviors
//! -------------
//! - [`ForwardBackwardWorkspace::resize`] reallocates only when `(S, T)`
//!   changes; buffers are otherwise overwritten in place by the engine.
//! - Read accessors expose the latest results (`obs_density`, `alpha`,
//!   `beta`, `gamma`, `xi`, the per-step scale factors and the sequence
//!   log-likelihood).
//!
//! Invariants & assumptions
//! ------------------------
//! - Shapes: `obs_density`, `alpha`, `beta`, `gamma` are `S × T`; `xi` is
//!   `S × S × (T − 1)`; `alpha_sum`, `beta_sum`, `obs_log_offset` have
//!   length `T`.
//! - A workspace is owned by one call at a time. Concurrent sequences each
//!   get their own workspace.
//!
//! Conventions
//! -----------
//! - `obs_density[[s, t]]` is the emission density of observation `t` under
//!   state `s` divided by `exp(obs_log_offset[t])`, the largest density in
//!   column `t`. The offset is added back into the log-likelihood.
use crate::{
    hmm::errors::{HMMError, HMMResult},
    markov::errors::ChainError,
    numerics::Probability,
};
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, ArrayView3};

/// Buffers for forward-backward on an `S`-state model and a length-`T` sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardBackwardWorkspace<R: Probability = f64> {
    pub(crate) obs_density: Array2<R>,
    pub(crate) obs_log_offset: Array1<f64>,
    pub(crate) alpha: Array2<R>,
    pub(crate) alpha_sum: Array1<R>,
    pub(crate) beta: Array2<R>,
    pub(crate) beta_sum: Array1<R>,
    pub(crate) gamma: Array2<R>,
    pub(crate) xi: Array3<R>,
    pub(crate) loglik: f64,
}

impl<R: Probability> ForwardBackwardWorkspace<R> {
    /// Allocate buffers for `nb_states` states and `len` observations.
    ///
    /// # Errors
    /// - [`HMMError::Chain`] with `EmptyStateSpace` if `nb_states == 0`.
    /// - [`HMMError::EmptySequence`] if `len == 0`.
    pub fn new(nb_states: usize, len: usize) -> HMMResult<Self> {
        check_shape(nb_states, len)?;
        let (s, t) = (nb_states, len);
        Ok(Self {
            obs_density: Array2::from_elem((s, t), R::zero()),
            obs_log_offset: Array1::zeros(t),
            alpha: Array2::from_elem((s, t), R::zero()),
            alpha_sum: Array1::from_elem(t, R::zero()),
            beta: Array2::from_elem((s, t), R::zero()),
            beta_sum: Array1::from_elem(t, R::zero()),
            gamma: Array2::from_elem((s, t), R::zero()),
            xi: Array3::from_elem((s, s, t - 1), R::zero()),
            loglik: f64::NEG_INFINITY,
        })
    }

    /// Make the buffers fit `(nb_states, len)`, reallocating only on change.
    ///
    /// # Errors
    /// Same as [`ForwardBackwardWorkspace::new`].
    pub fn resize(&mut self, nb_states: usize, len: usize) -> HMMResult<()> {
        check_shape(nb_states, len)?;
        if self.shape() != (nb_states, len) {
            *self = Self::new(nb_states, len)?;
        }
        Ok(())
    }

    /// `(S, T)` the buffers are sized for.
    pub fn shape(&self) -> (usize, usize) {
        self.alpha.dim()
    }

    pub fn obs_density(&self) -> ArrayView2<'_, R> {
        self.obs_density.view()
    }

    pub fn obs_log_offset(&self) -> ArrayView1<'_, f64> {
        self.obs_log_offset.view()
    }

    pub fn alpha(&self) -> ArrayView2<'_, R> {
        self.alpha.view()
    }

    pub fn alpha_sum(&self) -> ArrayView1<'_, R> {
        self.alpha_sum.view()
    }

    pub fn beta(&self) -> ArrayView2<'_, R> {
        self.beta.view()
    }

    pub fn beta_sum(&self) -> ArrayView1<'_, R> {
        self.beta_sum.view()
    }

    /// State posteriors `γ[s, t]`; each column sums to one.
    pub fn gamma(&self) -> ArrayView2<'_, R> {
        self.gamma.view()
    }

    /// Transition posteriors `ξ[i, j, t]`; each `t`-slice sums to one.
    pub fn xi(&self) -> ArrayView3<'_, R> {
        self.xi.view()
    }

    /// Log-likelihood of the last sequence passed through the forward pass.
    pub fn log_likelihood(&self) -> f64 {
        self.loglik
    }

    pub(crate) fn ensure_shape(&self, nb_states: usize, len: usize) -> HMMResult<()> {
        let actual = self.shape();
        if actual != (nb_states, len) {
            return Err(HMMError::WorkspaceShape { expected: (nb_states, len), actual });
        }
        Ok(())
    }
}

fn check_shape(nb_states: usize, len: usize) -> HMMResult<()> {
    if nb_states == 0 {
        return Err(HMMError::Chain(ChainError::EmptyStateSpace));
    }
    if len == 0 {
        return Err(HMMError::EmptySequence { index: 0 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::LogProb;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Buffer shapes after `new` and `resize`.
    // - Degenerate shapes.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Shapes follow (S, T) and resize only reallocates on change.
    //
    // Given
    // -----
    // - A 3-state, 5-step workspace resized to (3, 5) then (2, 1).
    //
    // Expect
    // ------
    // - xi is 3x3x4 initially; after the second resize it is 2x2x0.
    fn resize_tracks_shape() {
        // Arrange
        let mut ws = ForwardBackwardWorkspace::<f64>::new(3, 5).expect("valid shape");
        ws.loglik = -1.5;

        // Act
        ws.resize(3, 5).expect("same shape");
        let kept = ws.log_likelihood();
        ws.resize(2, 1).expect("new shape");

        // Assert
        assert_eq!(kept, -1.5);
        assert_eq!(ws.shape(), (2, 1));
        assert_eq!(ws.xi().dim(), (2, 2, 0));
        assert_eq!(ws.alpha_sum().len(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Zero states or zero length are shape errors.
    //
    // Given
    // -----
    // - (0, 4) and (2, 0).
    //
    // Expect
    // ------
    // - Chain(EmptyStateSpace) and EmptySequence.
    fn degenerate_shapes_are_rejected() {
        // Act
        let e1 = ForwardBackwardWorkspace::<LogProb>::new(0, 4).expect_err("no states");
        let e2 = ForwardBackwardWorkspace::<LogProb>::new(2, 0).expect_err("no observations");

        // Assert
        assert_eq!(e1, HMMError::Chain(ChainError::EmptyStateSpace));
        assert_eq!(e2, HMMError::EmptySequence { index: 0 });
    }
}
