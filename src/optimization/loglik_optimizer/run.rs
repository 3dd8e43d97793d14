//! Execution helper that runs an `argmin` solver on a log-likelihood problem
//! and returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, IterState, Solver, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;

/// Run an `argmin` solver from `theta0` and normalize the result.
///
/// With the `obs_slog` feature and `opts.verbose`, the initial `ℓ(θ₀)` is
/// logged once and Argmin's slog observer reports every iteration.
///
/// # Errors
/// - Argmin runtime errors (line-search failures, objective errors raised
///   during the run), converted into `OptError`.
/// - Validation errors when building the [`OptimOutcome`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, Grad, (), (), (), f64>> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver).configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F: LogLikelihood>(
    theta0: &Theta, problem: &ArgMinAdapter<'_, F>,
) -> OptResult<()> {
    let loglik = -problem.cost(theta0)?;
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    let log = crate::utils::term_logger();
    slog::info!(log, "lbfgs start"; "loglik" => loglik, "grad_norm" => grad_norm);
    Ok(())
}
