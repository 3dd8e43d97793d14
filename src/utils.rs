//! Shared helpers: the terminal `slog` logger and PyO3 input extraction.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2};

#[cfg(feature = "python-bindings")]
use numpy::{PyReadonlyArray1, PyReadonlyArray2};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

/// Asynchronous, human-readable logger writing to stderr.
///
/// Used for opt-in progress reporting (`verbose` options); numeric kernels
/// never log.
#[cfg(feature = "obs_slog")]
pub fn term_logger() -> slog::Logger {
    use slog::Drain;

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    slog::Logger::root(drain, slog::o!())
}

/// Copy a 1-D array-like of `float64` (numpy array, pandas Series with
/// `to_numpy`, or Python sequence) into a `Vec<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec(raw: &Bound<'_, PyAny>) -> PyResult<Vec<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        return Ok(arr.as_array().to_vec());
    }
    if let Ok(obj) = raw.call_method0("to_numpy") {
        if let Ok(arr) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(arr.as_array().to_vec());
        }
    }
    raw.extract::<Vec<f64>>().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })
}

/// Probability vector from a 1-D array-like.
#[cfg(feature = "python-bindings")]
pub fn extract_prob_vec(raw: &Bound<'_, PyAny>) -> PyResult<Array1<f64>> {
    Ok(Array1::from(extract_f64_vec(raw)?))
}

/// Square matrix from a 2-D `float64` array or a list of equal-length rows.
#[cfg(feature = "python-bindings")]
pub fn extract_matrix(raw: &Bound<'_, PyAny>) -> PyResult<Array2<f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr.as_array().to_owned());
    }
    let rows: Vec<Vec<f64>> = raw
        .extract()
        .map_err(|_| PyTypeError::new_err("expected a 2-D numpy.ndarray or list of float rows"))?;
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(PyValueError::new_err("matrix rows must all have the same length"));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), n_cols), flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// One or many sequences of state indices (`list[int]` or `list[list[int]]`).
#[cfg(feature = "python-bindings")]
pub fn extract_state_sequences(raw: &Bound<'_, PyAny>) -> PyResult<Vec<Vec<usize>>> {
    if let Ok(seqs) = raw.extract::<Vec<Vec<usize>>>() {
        return Ok(seqs);
    }
    raw.extract::<Vec<usize>>().map(|seq| vec![seq]).map_err(|_| {
        PyTypeError::new_err("expected a sequence of non-negative ints or a list of such sequences")
    })
}

/// One or many real-valued observation sequences.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_sequences(raw: &Bound<'_, PyAny>) -> PyResult<Vec<Vec<f64>>> {
    if let Ok(seqs) = raw.extract::<Vec<Vec<f64>>>() {
        return Ok(seqs);
    }
    Ok(vec![extract_f64_vec(raw)?])
}
