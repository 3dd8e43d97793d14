//! Forward-backward — scaled two-pass inference for one observation sequence.
//!
//! Purpose
//! -------
//! Compute, for a fixed [`HiddenMarkovModel`] and sequence `o_0..o_{T-1}`,
//! the forward and backward variables, the state posteriors `γ`, the
//! transition posteriors `ξ` and the sequence log-likelihood, and fold them
//! into Baum-Welch sufficient statistics.
//!
//! Key behaviors
//! -------------
//! - [`forward_pass`]: `α[:, 0] = p0 ⊙ B[:, 0]`,
//!   `α[:, t] = (Pᵀ α[:, t−1]) ⊙ B[:, t]`, each column rescaled to sum to one
//!   with its scale stored in `alpha_sum[t]`;
//!   `ln L = Σ_t ln alpha_sum[t] + Σ_t obs_log_offset[t]`.
//! - [`backward_pass`]: `β[:, T−1] = 1`, `β[:, t] = P (B[:, t+1] ⊙ β[:, t+1])`,
//!   rescaled the same way into `beta_sum`.
//! - [`compute_posteriors`]: `γ[:, t] ∝ α[:, t] ⊙ β[:, t]` and
//!   `ξ[i, j, t] ∝ α[i, t] P[i, j] B[j, t+1] β[j, t+1]`, normalized per `t`.
//! - [`accumulate_stats`]: adds `γ[:, 0]` to the initialization counts,
//!   `Σ_t ξ[:, :, t]` to the transition counts, appends `γ[s, :]` to each
//!   state's emission weights and adds the log-likelihood.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rescaling makes every intermediate column sum to one, so the linear
//!   representations never underflow; the log-domain [`LogProb`] runs the
//!   same code and agrees up to rounding.
//! - Because the scale factors cancel in `γ` and `ξ`, both are exact
//!   posteriors regardless of representation.
//!
//! Conventions
//! -----------
//! - Time indices in errors are 0-based positions in the sequence.
//! - The building blocks operate on an already filled workspace; the
//!   wrappers [`forward`] and [`forward_backward`] size it and fill the
//!   observation densities first.
//!
//! [`LogProb`]: crate::numerics::LogProb
use crate::{
    hmm::{
        core::{
            emission::Emission, model::HiddenMarkovModel, obs_density::update_obs_density,
            stats::HiddenMarkovModelStats, workspace::ForwardBackwardWorkspace,
        },
        errors::{HMMError, HMMResult},
    },
    numerics::{Probability, sum_probs},
};
use ndarray::{Array2, Axis, Zip};

/// Size `ws` for `(hmm, obs)` and fill the observation densities.
///
/// # Errors
/// Shape errors, and density errors from [`update_obs_density`].
pub fn prepare_workspace<E: Emission, R: Probability>(
    ws: &mut ForwardBackwardWorkspace<R>, hmm: &HiddenMarkovModel<E, R>, obs: &[E::Obs],
) -> HMMResult<()> {
    ws.resize(hmm.nb_states(), obs.len())?;
    update_obs_density(&mut ws.obs_density, &mut ws.obs_log_offset, hmm, obs)
}

/// Scaled forward recursion on a prepared workspace.
///
/// Returns the sequence log-likelihood, also stored in the workspace.
///
/// # Errors
/// - [`HMMError::WorkspaceShape`] if `ws` does not match the model.
/// - [`HMMError::ZeroLikelihood`] if the forward mass vanishes at some `t`.
pub fn forward_pass<E: Emission, R: Probability>(
    ws: &mut ForwardBackwardWorkspace<R>, hmm: &HiddenMarkovModel<E, R>,
) -> HMMResult<f64> {
    let (n_states, n_obs) = ws.shape();
    ws.ensure_shape(hmm.nb_states(), n_obs)?;
    let p0 = hmm.initial_distribution();
    let p = hmm.transition_matrix();

    for t in 0..n_obs {
        for j in 0..n_states {
            let prior = if t == 0 {
                p0[j]
            } else {
                sum_probs((0..n_states).map(|i| ws.alpha[[i, t - 1]] * p[[i, j]]))
            };
            ws.alpha[[j, t]] = prior * ws.obs_density[[j, t]];
        }
        let c = sum_probs(ws.alpha.column(t).iter().copied());
        if c.is_zero() || !c.is_finite() {
            return Err(HMMError::ZeroLikelihood { t });
        }
        ws.alpha.column_mut(t).mapv_inplace(|a| a / c);
        ws.alpha_sum[t] = c;
    }

    let scaled: f64 = ws.alpha_sum.iter().map(|c| c.ln()).sum();
    ws.loglik = scaled + ws.obs_log_offset.sum();
    Ok(ws.loglik)
}

/// Scaled backward recursion on a workspace that went through [`forward_pass`].
///
/// # Errors
/// - [`HMMError::WorkspaceShape`] if `ws` does not match the model.
/// - [`HMMError::ZeroLikelihood`] if the backward mass vanishes at some `t`.
pub fn backward_pass<E: Emission, R: Probability>(
    ws: &mut ForwardBackwardWorkspace<R>, hmm: &HiddenMarkovModel<E, R>,
) -> HMMResult<()> {
    let (n_states, n_obs) = ws.shape();
    ws.ensure_shape(hmm.nb_states(), n_obs)?;
    let p = hmm.transition_matrix();

    ws.beta.column_mut(n_obs - 1).fill(R::one());
    ws.beta_sum[n_obs - 1] = R::one();
    for t in (0..n_obs - 1).rev() {
        for i in 0..n_states {
            ws.beta[[i, t]] = sum_probs(
                (0..n_states).map(|j| p[[i, j]] * ws.obs_density[[j, t + 1]] * ws.beta[[j, t + 1]]),
            );
        }
        let d = sum_probs(ws.beta.column(t).iter().copied());
        if d.is_zero() || !d.is_finite() {
            return Err(HMMError::ZeroLikelihood { t });
        }
        ws.beta.column_mut(t).mapv_inplace(|b| b / d);
        ws.beta_sum[t] = d;
    }
    Ok(())
}

/// State and transition posteriors from filled `α` and `β`.
///
/// # Errors
/// - [`HMMError::WorkspaceShape`] if `ws` does not match the model.
/// - [`HMMError::ZeroLikelihood`] if a normalizer vanishes.
pub fn compute_posteriors<E: Emission, R: Probability>(
    ws: &mut ForwardBackwardWorkspace<R>, hmm: &HiddenMarkovModel<E, R>,
) -> HMMResult<()> {
    let (n_states, n_obs) = ws.shape();
    ws.ensure_shape(hmm.nb_states(), n_obs)?;
    let p = hmm.transition_matrix();

    for t in 0..n_obs {
        for s in 0..n_states {
            ws.gamma[[s, t]] = ws.alpha[[s, t]] * ws.beta[[s, t]];
        }
        let z = sum_probs(ws.gamma.column(t).iter().copied());
        if z.is_zero() {
            return Err(HMMError::ZeroLikelihood { t });
        }
        ws.gamma.column_mut(t).mapv_inplace(|g| g / z);
    }

    for t in 0..n_obs.saturating_sub(1) {
        let mut z = R::zero();
        for i in 0..n_states {
            for j in 0..n_states {
                let v = ws.alpha[[i, t]]
                    * p[[i, j]]
                    * ws.obs_density[[j, t + 1]]
                    * ws.beta[[j, t + 1]];
                ws.xi[[i, j, t]] = v;
                z = z + v;
            }
        }
        if z.is_zero() {
            return Err(HMMError::ZeroLikelihood { t });
        }
        ws.xi.index_axis_mut(Axis(2), t).mapv_inplace(|x| x / z);
    }
    Ok(())
}

/// Sequence log-likelihood from the forward pass alone.
///
/// # Errors
/// Shape, density and zero-likelihood errors.
pub fn forward<E: Emission, R: Probability>(
    ws: &mut ForwardBackwardWorkspace<R>, hmm: &HiddenMarkovModel<E, R>, obs: &[E::Obs],
) -> HMMResult<f64> {
    prepare_workspace(ws, hmm, obs)?;
    forward_pass(ws, hmm)
}

/// Full forward-backward: densities, both passes and posteriors.
///
/// Returns the sequence log-likelihood; `γ` and `ξ` are left in `ws`.
///
/// # Errors
/// Shape, density and zero-likelihood errors.
pub fn forward_backward<E: Emission, R: Probability>(
    ws: &mut ForwardBackwardWorkspace<R>, hmm: &HiddenMarkovModel<E, R>, obs: &[E::Obs],
) -> HMMResult<f64> {
    let loglik = forward(ws, hmm, obs)?;
    backward_pass(ws, hmm)?;
    compute_posteriors(ws, hmm)?;
    Ok(loglik)
}

/// Fold the posteriors held in `ws` into `stats`.
///
/// The transition posteriors are summed over time before being added, so
/// accumulating directly or through per-sequence accumulators merged in
/// order gives identical results.
///
/// # Errors
/// [`HMMError::WorkspaceShape`] if `stats` has a different state count.
pub fn accumulate_stats<R: Probability>(
    ws: &ForwardBackwardWorkspace<R>, stats: &mut HiddenMarkovModelStats<R>,
) -> HMMResult<()> {
    let (n_states, n_obs) = ws.shape();
    if stats.nb_states() != n_states {
        return Err(HMMError::WorkspaceShape {
            expected: (stats.nb_states(), n_obs),
            actual: (n_states, n_obs),
        });
    }

    stats.transitions.add_initialization_weights(ws.gamma.column(0));
    let mut xi_total = Array2::from_elem((n_states, n_states), R::zero());
    for xi_t in ws.xi.axis_iter(Axis(2)) {
        Zip::from(&mut xi_total).and(&xi_t).for_each(|acc, &x| *acc = *acc + x);
    }
    stats.transitions.add_transition_weights(xi_total.view());

    for (weights, gamma_s) in stats.emission_weights.iter_mut().zip(ws.gamma.rows()) {
        weights.extend(gamma_s.iter().map(|g| g.to_f64()));
    }
    stats.loglik += ws.loglik;
    Ok(())
}
