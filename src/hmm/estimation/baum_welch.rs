//! Baum-Welch — EM estimation of hidden Markov models.
//!
//! Purpose
//! -------
//! Fit a [`HiddenMarkovModel`] to one or more observation sequences by
//! alternating an E-step (forward-backward over every sequence, accumulating
//! expected counts and state weights) and an M-step (re-estimating the
//! transition model and each state's emission from those statistics).
//!
//! Key behaviors
//! -------------
//! - Iteration `k` runs the E-step on the current model and records its
//!   total log-likelihood `ℓ_k`. The run stops as
//!   [`BaumWelchState::Converged`] when `k ≥ 2` and `ℓ_k − ℓ_{k−1} < tol`,
//!   or as [`BaumWelchState::MaxIterationsReached`] when `k` hits the budget;
//!   otherwise the M-step produces the next model.
//! - The returned model is the one whose log-likelihood is the last entry of
//!   `loglik_history`, so `loglik_history.len() == iterations`.
//! - MAP estimation ([`baum_welch_map`]) uses Dirichlet posterior modes for
//!   the chain and [`EmissionPrior::fit_map`] for the emissions, and tracks
//!   `ℓ_k + ln π(model)` instead of `ℓ_k`.
//! - A state whose accumulated weight is zero keeps its current emission.
//!
//! Invariants & assumptions
//! ------------------------
//! - EM never decreases the tracked objective beyond rounding (up to the
//!   accuracy of numerical emission M-steps); decreases are logged as
//!   warnings under `obs_slog` and stop the run through the `tol` rule.
//! - Sequences are independent realizations of the same model.
//!
//! Conventions
//! -----------
//! - With the `parallel` feature, per-sequence E-steps run on rayon with a
//!   workspace per worker and a statistics object per sequence, merged in
//!   sequence order; results equal the sequential path exactly.
//! - Per-sequence errors are wrapped in [`HMMError::InSequence`] and
//!   per-state emission errors carry `state: Some(s)`.
use crate::{
    hmm::{
        core::{
            emission::{Emission, EmissionPrior, FlatEmissionPrior, WeightedSamples},
            forward_backward::{accumulate_stats, forward_backward},
            model::HiddenMarkovModel,
            prior::HiddenMarkovModelPrior,
            stats::HiddenMarkovModelStats,
            workspace::ForwardBackwardWorkspace,
        },
        errors::{HMMError, HMMResult},
        estimation::options::{BaumWelchOptions, BaumWelchState},
    },
    markov::DiscreteMarkovChain,
    numerics::Probability,
};

/// Result of a Baum-Welch run.
///
/// Fields
/// ------
/// - `hmm`: fitted model (the model evaluated at the last iteration).
/// - `loglik_history`: objective at each iteration, starting with the
///   initial model.
/// - `status`: `Converged` or `MaxIterationsReached`.
/// - `iterations`: number of E-steps performed.
#[derive(Debug, Clone, PartialEq)]
pub struct BaumWelchOutcome<E: Emission, R: Probability = f64> {
    pub hmm: HiddenMarkovModel<E, R>,
    pub loglik_history: Vec<f64>,
    pub status: BaumWelchState,
    pub iterations: usize,
}

impl<E: Emission, R: Probability> BaumWelchOutcome<E, R> {
    pub fn converged(&self) -> bool {
        self.status == BaumWelchState::Converged
    }

    /// Last recorded objective value (`-∞` for an empty history).
    pub fn final_loglik(&self) -> f64 {
        self.loglik_history.last().copied().unwrap_or(f64::NEG_INFINITY)
    }
}

/// Baum-Welch on a single observation sequence.
///
/// # Errors
/// See [`baum_welch_multiple_sequences`].
pub fn baum_welch<E, R>(
    hmm: &HiddenMarkovModel<E, R>, obs: &[E::Obs], opts: &BaumWelchOptions,
) -> HMMResult<BaumWelchOutcome<E, R>>
where
    E: Emission,
    R: Probability,
{
    baum_welch_multiple_sequences(hmm, &[obs], opts)
}

/// Baum-Welch on independent observation sequences.
///
/// # Errors
/// - Option validation errors.
/// - [`HMMError::NoSequences`] / [`HMMError::EmptySequence`].
/// - Engine errors wrapped in [`HMMError::InSequence`].
/// - M-step errors: [`HMMError::Chain`] or [`HMMError::Emission`].
pub fn baum_welch_multiple_sequences<E, R, S>(
    hmm: &HiddenMarkovModel<E, R>, seqs: &[S], opts: &BaumWelchOptions,
) -> HMMResult<BaumWelchOutcome<E, R>>
where
    E: Emission,
    R: Probability,
    S: AsRef<[E::Obs]> + Sync,
{
    run::<E, R, FlatEmissionPrior, S>(hmm, seqs, None, opts)
}

/// MAP Baum-Welch under `prior`.
///
/// # Errors
/// As [`baum_welch_multiple_sequences`], plus
/// [`HMMError::EmissionCountMismatch`] when the prior has another size and
/// `ChainError::ModeUndefined` for concentrations below one.
pub fn baum_welch_map<E, R, P, S>(
    hmm: &HiddenMarkovModel<E, R>, seqs: &[S], prior: &HiddenMarkovModelPrior<P>,
    opts: &BaumWelchOptions,
) -> HMMResult<BaumWelchOutcome<E, R>>
where
    E: Emission,
    R: Probability,
    P: EmissionPrior<E>,
    S: AsRef<[E::Obs]> + Sync,
{
    if prior.nb_states() != hmm.nb_states() {
        return Err(HMMError::EmissionCountMismatch {
            states: hmm.nb_states(),
            emissions: prior.nb_states(),
        });
    }
    run(hmm, seqs, Some(prior), opts)
}

fn run<E, R, P, S>(
    hmm: &HiddenMarkovModel<E, R>, seqs: &[S], prior: Option<&HiddenMarkovModelPrior<P>>,
    opts: &BaumWelchOptions,
) -> HMMResult<BaumWelchOutcome<E, R>>
where
    E: Emission,
    R: Probability,
    P: EmissionPrior<E>,
    S: AsRef<[E::Obs]> + Sync,
{
    // Initializing
    opts.validate()?;
    validate_sequences(seqs)?;
    let all_obs: Vec<&E::Obs> = seqs.iter().flat_map(|s| s.as_ref().iter()).collect();
    let mut stats = HiddenMarkovModelStats::<R>::zeros(hmm.nb_states())?;
    #[cfg(not(feature = "parallel"))]
    let mut ws = ForwardBackwardWorkspace::<R>::new(hmm.nb_states(), 1)?;
    #[cfg(feature = "obs_slog")]
    let logger = opts.verbose.then(crate::utils::term_logger);

    let mut current = hmm.clone();
    let mut history: Vec<f64> = Vec::with_capacity(opts.max_iterations);
    let mut status = BaumWelchState::Iterating;
    while status == BaumWelchState::Iterating {
        #[cfg(feature = "parallel")]
        e_step_parallel(&current, seqs, &mut stats)?;
        #[cfg(not(feature = "parallel"))]
        e_step(&current, seqs, &mut stats, &mut ws)?;

        let mut objective = stats.loglik();
        if let Some(prior) = prior {
            objective += prior.log_density(&current)?;
        }
        let delta = history.last().map(|prev| objective - prev);
        history.push(objective);
        let k = history.len();

        #[cfg(feature = "obs_slog")]
        if let Some(log) = &logger {
            slog::info!(log, "baum-welch iteration";
                "iter" => k, "loglik" => objective, "delta" => delta);
            if delta.is_some_and(|d| d < -1e-8 * objective.abs().max(1.0)) {
                slog::warn!(log, "log-likelihood decreased"; "iter" => k, "delta" => delta);
            }
        }

        if delta.is_some_and(|d| d < opts.tol) {
            status = BaumWelchState::Converged;
        } else if k >= opts.max_iterations {
            status = BaumWelchState::MaxIterationsReached;
        } else {
            current = m_step(&current, &all_obs, &stats, prior)?;
        }
    }

    #[cfg(feature = "obs_slog")]
    if let Some(log) = &logger {
        slog::info!(log, "baum-welch done";
            "status" => status.to_string(), "iterations" => history.len(),
            "loglik" => history.last().copied());
    }

    let iterations = history.len();
    Ok(BaumWelchOutcome { hmm: current, loglik_history: history, status, iterations })
}

fn validate_sequences<O, S: AsRef<[O]>>(seqs: &[S]) -> HMMResult<()> {
    if seqs.is_empty() {
        return Err(HMMError::NoSequences);
    }
    if let Some(index) = seqs.iter().position(|s| s.as_ref().is_empty()) {
        return Err(HMMError::EmptySequence { index });
    }
    Ok(())
}

/// Sequential E-step: reset `stats` and accumulate every sequence.
pub(crate) fn e_step<E, R, S>(
    hmm: &HiddenMarkovModel<E, R>, seqs: &[S], stats: &mut HiddenMarkovModelStats<R>,
    ws: &mut ForwardBackwardWorkspace<R>,
) -> HMMResult<()>
where
    E: Emission,
    R: Probability,
    S: AsRef<[E::Obs]>,
{
    stats.reset();
    for (index, seq) in seqs.iter().enumerate() {
        forward_backward(ws, hmm, seq.as_ref()).map_err(|e| HMMError::in_sequence(index, e))?;
        accumulate_stats(ws, stats)?;
    }
    Ok(())
}

/// Parallel E-step: per-sequence statistics reduced in sequence order.
#[cfg(feature = "parallel")]
pub(crate) fn e_step_parallel<E, R, S>(
    hmm: &HiddenMarkovModel<E, R>, seqs: &[S], stats: &mut HiddenMarkovModelStats<R>,
) -> HMMResult<()>
where
    E: Emission,
    R: Probability,
    S: AsRef<[E::Obs]> + Sync,
{
    use rayon::prelude::*;

    let n_states = hmm.nb_states();
    let locals: Vec<HMMResult<HiddenMarkovModelStats<R>>> = seqs
        .par_iter()
        .enumerate()
        .map_init(
            || ForwardBackwardWorkspace::<R>::new(n_states, 1),
            |ws, (index, seq)| {
                let ws = ws.as_mut().map_err(|e| e.clone())?;
                let mut local = HiddenMarkovModelStats::zeros(n_states)?;
                forward_backward(ws, hmm, seq.as_ref())
                    .map_err(|e| HMMError::in_sequence(index, e))?;
                accumulate_stats(ws, &mut local)?;
                Ok(local)
            },
        )
        .collect();

    stats.reset();
    for local in locals {
        stats.merge(&local?)?;
    }
    Ok(())
}

/// M-step: re-estimate the chain and every emission from `stats`.
fn m_step<E, R, P>(
    hmm: &HiddenMarkovModel<E, R>, all_obs: &[&E::Obs], stats: &HiddenMarkovModelStats<R>,
    prior: Option<&HiddenMarkovModelPrior<P>>,
) -> HMMResult<HiddenMarkovModel<E, R>>
where
    E: Emission,
    R: Probability,
    P: EmissionPrior<E>,
{
    let transitions = match prior {
        Some(p) => {
            DiscreteMarkovChain::fit_map_from_stats(p.transitions_prior(), stats.transitions())?
        }
        None => DiscreteMarkovChain::fit_mle_from_stats(stats.transitions())?,
    };

    let mut emissions = Vec::with_capacity(hmm.nb_states());
    for (s, current) in hmm.emissions().iter().enumerate() {
        let with_state = |source| HMMError::Emission { state: Some(s), source };
        let weights = stats.emission_weights(s).unwrap_or_default();
        let samples = WeightedSamples::new(all_obs, weights).map_err(with_state)?;
        if samples.total_weight() <= 0.0 {
            emissions.push(current.clone());
            continue;
        }
        let fitted = match prior {
            Some(p) => p.emissions_prior()[s].fit_map(current, &samples),
            None => current.fit_weighted(&samples),
        };
        emissions.push(fitted.map_err(with_state)?);
    }
    HiddenMarkovModel::new(transitions, emissions)
}
