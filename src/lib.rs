//! rust_hmm — hidden Markov models and discrete Markov chains with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! Markov-chain fitting and Gaussian-HMM estimation to Python via the
//! `_rust_hmm` extension module.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules as the public crate surface:
//!   - `numerics`: the `Probability` abstraction (`f64`, `f32`, `LogProb`).
//!   - `markov`: `DiscreteMarkovChain`, Dirichlet priors, MLE/MAP fitting,
//!     stationary distributions.
//!   - `hmm`: emission contract, forward-backward engine, Baum-Welch.
//!   - `point_process`: event histories and Poisson-process emissions.
//!   - `optimization`: L-BFGS log-likelihood maximizer used by emission
//!     families without closed-form M-steps.
//! - Define `#[pyclass]` wrappers and the `#[pymodule]` initializer for the
//!   `_rust_hmm` Python extension when `python-bindings` is enabled.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner Rust modules; this file performs
//!   only FFI glue, input conversion and error mapping.
//! - Python-facing classes use `f64` probabilities.
//!
//! Conventions
//! -----------
//! - States are 0-based `usize` indices; probability vectors are rows of the
//!   transition matrix (`P[i, j] = P(x_{t+1} = j | x_t = i)`).
//! - Errors from core Rust code are rich enums internally and become
//!   `ValueError`s at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code depends on the inner modules (each has a `prelude`)
//!   and can ignore the items guarded by `python-bindings`.
//! - The Python packaging layer imports `_rust_hmm` and wraps its classes.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   the end-to-end scenarios under `tests/`.

pub mod hmm;
pub mod markov;
pub mod numerics;
pub mod optimization;
pub mod point_process;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use rand::{SeedableRng, rngs::StdRng};

#[cfg(feature = "python-bindings")]
use crate::{
    hmm::{
        BaumWelchOptions, BaumWelchState, HiddenMarkovModel, NormalEmission,
        baum_welch_multiple_sequences,
    },
    markov::{DiscreteMarkovChain, DiscreteMarkovChainPrior},
    utils::{
        extract_f64_sequences, extract_f64_vec, extract_matrix, extract_prob_vec,
        extract_state_sequences,
    },
};

#[cfg(feature = "python-bindings")]
fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(feature = "python-bindings")]
fn matrix_rows(m: ndarray::ArrayView2<'_, f64>) -> Vec<Vec<f64>> {
    m.outer_iter().map(|row| row.to_vec()).collect()
}

/// MarkovChain — Python-facing wrapper for [`DiscreteMarkovChain`].
///
/// Purpose
/// -------
/// Fit, simulate and evaluate a finite-state Markov chain from Python while
/// forwarding all computation to [`DiscreteMarkovChain<f64>`].
///
/// Key behaviors
/// -------------
/// - Construct from an initial distribution and a transition matrix, or fit
///   from state sequences by MLE (`fit_mle`) or Dirichlet MAP (`fit_map`).
/// - Expose `log_likelihood`, `simulate` and `stationary_distribution`.
///
/// Parameters
/// ----------
/// Constructed from Python via `MarkovChain(p0, p)`:
/// - `p0`: 1-D array-like of length `S` summing to one.
/// - `p`: `S × S` row-stochastic matrix (2-D array or list of rows).
///
/// Invariants
/// ----------
/// - The wrapped chain satisfies every invariant of [`DiscreteMarkovChain`].
///
/// Notes
/// -----
/// - Rust callers should use [`DiscreteMarkovChain`] directly.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_hmm.markov")]
pub struct MarkovChain {
    inner: DiscreteMarkovChain<f64>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl MarkovChain {
    #[new]
    #[pyo3(text_signature = "(p0, p, /)")]
    pub fn new<'py>(p0: &Bound<'py, PyAny>, p: &Bound<'py, PyAny>) -> PyResult<Self> {
        let inner = DiscreteMarkovChain::new(extract_prob_vec(p0)?, extract_matrix(p)?)?;
        Ok(MarkovChain { inner })
    }

    /// Maximum-likelihood chain from one sequence or a list of sequences.
    #[staticmethod]
    #[pyo3(signature = (sequences, nb_states = None))]
    pub fn fit_mle<'py>(
        sequences: &Bound<'py, PyAny>, nb_states: Option<usize>,
    ) -> PyResult<Self> {
        let seqs = extract_state_sequences(sequences)?;
        let inner = match nb_states {
            Some(n) => DiscreteMarkovChain::fit_mle_with_states(n, &seqs)?,
            None => DiscreteMarkovChain::fit_mle(&seqs)?,
        };
        Ok(MarkovChain { inner })
    }

    /// Dirichlet posterior-mode chain; every concentration must be `≥ 1`.
    #[staticmethod]
    #[pyo3(signature = (sequences, p0_alpha, p_alpha))]
    pub fn fit_map<'py>(
        sequences: &Bound<'py, PyAny>, p0_alpha: &Bound<'py, PyAny>, p_alpha: &Bound<'py, PyAny>,
    ) -> PyResult<Self> {
        let seqs = extract_state_sequences(sequences)?;
        let prior = DiscreteMarkovChainPrior::new(
            Array1::from(extract_f64_vec(p0_alpha)?),
            extract_matrix(p_alpha)?,
        )?;
        let inner = DiscreteMarkovChain::fit_map(&prior, &seqs)?;
        Ok(MarkovChain { inner })
    }

    pub fn log_likelihood<'py>(&self, states: &Bound<'py, PyAny>) -> PyResult<f64> {
        let states: Vec<usize> = states.extract()?;
        Ok(self.inner.log_likelihood(&states)?)
    }

    #[pyo3(signature = (n_steps, seed = None))]
    pub fn simulate(&self, n_steps: usize, seed: Option<u64>) -> Vec<usize> {
        self.inner.simulate(&mut seeded_rng(seed), n_steps)
    }

    pub fn stationary_distribution(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.stationary_distribution()?.to_vec())
    }

    #[getter]
    pub fn nb_states(&self) -> usize {
        self.inner.nb_states()
    }

    #[getter]
    pub fn initial_distribution(&self) -> Vec<f64> {
        self.inner.initial_distribution().to_vec()
    }

    #[getter]
    pub fn transition_matrix(&self) -> Vec<Vec<f64>> {
        matrix_rows(self.inner.transition_matrix())
    }
}

/// GaussianHMM — Python-facing HMM with one Normal emission per state.
///
/// `baum_welch` refits the wrapped model in place (GIL released during the
/// fit) and returns the per-iteration log-likelihood history; the final
/// status is available through `status` and `converged`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_hmm.hmm")]
pub struct GaussianHMM {
    inner: HiddenMarkovModel<NormalEmission>,
    status: BaumWelchState,
    iterations: usize,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GaussianHMM {
    #[new]
    #[pyo3(text_signature = "(p0, p, means, std_devs, /)")]
    pub fn new<'py>(
        p0: &Bound<'py, PyAny>, p: &Bound<'py, PyAny>, means: &Bound<'py, PyAny>,
        std_devs: &Bound<'py, PyAny>,
    ) -> PyResult<Self> {
        let means = extract_f64_vec(means)?;
        let std_devs = extract_f64_vec(std_devs)?;
        if means.len() != std_devs.len() {
            return Err(PyValueError::new_err("means and std_devs must have the same length"));
        }
        let emissions = means
            .iter()
            .zip(&std_devs)
            .map(|(&m, &s)| NormalEmission::new(m, s))
            .collect::<Result<Vec<_>, _>>()?;
        let inner =
            HiddenMarkovModel::from_parts(extract_prob_vec(p0)?, extract_matrix(p)?, emissions)?;
        Ok(GaussianHMM { inner, status: BaumWelchState::Initializing, iterations: 0 })
    }

    #[pyo3(signature = (observations, max_iterations = 100, tol = 1e-5, verbose = false))]
    pub fn baum_welch<'py>(
        &mut self, py: Python<'py>, observations: &Bound<'py, PyAny>, max_iterations: usize,
        tol: f64, verbose: bool,
    ) -> PyResult<Vec<f64>> {
        let seqs = extract_f64_sequences(observations)?;
        let opts = BaumWelchOptions::new(max_iterations, tol, verbose)?;
        let model = &self.inner;
        let outcome = py.allow_threads(|| baum_welch_multiple_sequences(model, &seqs, &opts))?;
        self.inner = outcome.hmm;
        self.status = outcome.status;
        self.iterations = outcome.iterations;
        Ok(outcome.loglik_history)
    }

    pub fn log_likelihood<'py>(&self, observations: &Bound<'py, PyAny>) -> PyResult<f64> {
        let seqs = extract_f64_sequences(observations)?;
        Ok(self.inner.log_likelihood_sequences(&seqs)?)
    }

    /// State posteriors `γ` as a list of `T` rows of length `S`.
    pub fn posterior_states<'py>(&self, observations: &Bound<'py, PyAny>) -> PyResult<Vec<Vec<f64>>> {
        let obs = extract_f64_vec(observations)?;
        let gamma = self.inner.posterior_states(&obs)?;
        Ok(matrix_rows(gamma.t()))
    }

    #[pyo3(signature = (n_steps, seed = None))]
    pub fn simulate(&self, n_steps: usize, seed: Option<u64>) -> (Vec<usize>, Vec<f64>) {
        self.inner.simulate(&mut seeded_rng(seed), n_steps)
    }

    #[getter]
    pub fn status(&self) -> String {
        self.status.to_string()
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.status == BaumWelchState::Converged
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    #[getter]
    pub fn initial_distribution(&self) -> Vec<f64> {
        self.inner.initial_distribution().to_vec()
    }

    #[getter]
    pub fn transition_matrix(&self) -> Vec<Vec<f64>> {
        matrix_rows(self.inner.transition_matrix())
    }

    #[getter]
    pub fn means(&self) -> Vec<f64> {
        self.inner.emissions().iter().map(NormalEmission::mean).collect()
    }

    #[getter]
    pub fn std_devs(&self) -> Vec<f64> {
        self.inner.emissions().iter().map(NormalEmission::std_dev).collect()
    }
}

/// _rust_hmm — PyO3 module initializer for the Python extension.
///
/// Creates the `markov` and `hmm` submodules, attaches them to `_rust_hmm`
/// and registers them in `sys.modules` so dotted imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_hmm<'py>(py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let markov_mod = PyModule::new(py, "markov")?;
    markov_mod.add_class::<MarkovChain>()?;
    m.add_submodule(&markov_mod)?;

    let hmm_mod = PyModule::new(py, "hmm")?;
    hmm_mod.add_class::<GaussianHMM>()?;
    m.add_submodule(&hmm_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    let modules = py.import("sys")?.getattr("modules")?;
    modules.set_item("rust_hmm.markov", markov_mod)?;
    modules.set_item("rust_hmm.hmm", hmm_mod)?;
    Ok(())
}
