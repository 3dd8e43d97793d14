//! Observation-density builder.
//!
//! Fills the `S × T` matrix `B[s, t] = f_s(o_t)` consumed by the forward
//! and backward recursions. Each column is shifted by its largest log
//! density before leaving the log domain, so linear representations do not
//! underflow on observations that are unlikely under every state; the shift
//! is returned per column and added back into the log-likelihood.
use crate::{
    hmm::{
        core::{emission::Emission, model::HiddenMarkovModel},
        errors::{HMMError, HMMResult},
    },
    numerics::Probability,
};
use ndarray::{Array1, Array2};

/// Evaluate every state's emission at every observation.
///
/// On success `density[[s, t]] = exp(ln f_s(o_t) − log_offset[t])` and
/// `log_offset[t] = max_s ln f_s(o_t)`.
///
/// # Errors
/// - [`HMMError::WorkspaceShape`] if the buffers are not `S × T` / `T`.
/// - [`HMMError::InvalidDensity`] if an emission returns NaN or `+∞`.
/// - [`HMMError::ImpossibleObservation`] if a column is zero for every state.
pub fn update_obs_density<E: Emission, R: Probability>(
    density: &mut Array2<R>, log_offset: &mut Array1<f64>, hmm: &HiddenMarkovModel<E, R>,
    obs: &[E::Obs],
) -> HMMResult<()> {
    let expected = (hmm.nb_states(), obs.len());
    if density.dim() != expected || log_offset.len() != obs.len() {
        return Err(HMMError::WorkspaceShape { expected, actual: density.dim() });
    }

    let mut column = vec![f64::NEG_INFINITY; expected.0];
    for (t, o) in obs.iter().enumerate() {
        for (s, emission) in hmm.emissions().iter().enumerate() {
            let ld = emission.log_density(o);
            if ld.is_nan() || ld == f64::INFINITY {
                return Err(HMMError::InvalidDensity { state: s, t, value: ld });
            }
            column[s] = ld;
        }
        let max_ld = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max_ld == f64::NEG_INFINITY {
            return Err(HMMError::ImpossibleObservation { t });
        }
        for (s, &ld) in column.iter().enumerate() {
            density[[s, t]] = R::from_ln(ld - max_ld);
        }
        log_offset[t] = max_ld;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hmm::emissions::{ExponentialEmission, NormalEmission},
        markov::DiscreteMarkovChain,
        numerics::LogProb,
    };
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Column shifting and the reconstruction of raw densities.
    // - Impossible observations and shape errors.
    // -------------------------------------------------------------------------

    fn normal_hmm<R: Probability>() -> HiddenMarkovModel<NormalEmission, R> {
        let mc = DiscreteMarkovChain::new(array![0.5, 0.5], array![[0.5, 0.5], [0.5, 0.5]])
            .expect("valid chain")
            .convert();
        let emissions = vec![
            NormalEmission::new(0.0, 1.0).expect("valid"),
            NormalEmission::new(3.0, 1.0).expect("valid"),
        ];
        HiddenMarkovModel::new(mc, emissions).expect("aligned")
    }

    #[test]
    // Purpose
    // -------
    // The shifted matrix times exp(offset) reproduces the raw densities.
    //
    // Given
    // -----
    // - Normal emissions N(0,1), N(3,1) and observations [0.5, 2.0].
    //
    // Expect
    // ------
    // - Column maxima equal one; B·exp(offset) equals the pdf values, in
    //   both f64 and LogProb.
    fn shifted_columns_reconstruct_densities() {
        // Arrange
        let obs = [0.5, 2.0];
        let hmm64 = normal_hmm::<f64>();
        let hmm_log = normal_hmm::<LogProb>();
        let mut b64 = Array2::zeros((2, 2));
        let mut off64 = Array1::zeros(2);
        let mut b_log = Array2::from_elem((2, 2), LogProb::zero());
        let mut off_log = Array1::zeros(2);

        // Act
        update_obs_density(&mut b64, &mut off64, &hmm64, &obs).expect("valid");
        update_obs_density(&mut b_log, &mut off_log, &hmm_log, &obs).expect("valid");

        // Assert
        for t in 0..2 {
            let col_max = b64.column(t).iter().cloned().fold(0.0, f64::max);
            assert_relative_eq!(col_max, 1.0, epsilon = 1e-12);
            for s in 0..2 {
                let raw = hmm64.emissions()[s].density(&obs[t]);
                assert_relative_eq!(b64[[s, t]] * off64[t].exp(), raw, epsilon = 1e-12);
                assert_relative_eq!(b_log[[s, t]].to_f64(), b64[[s, t]], epsilon = 1e-12);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // A column of zero densities is reported with its time index.
    //
    // Given
    // -----
    // - Two exponential emissions and observations [1.0, -2.0].
    //
    // Expect
    // ------
    // - ImpossibleObservation { t: 1 }; a wrongly shaped buffer fails with
    //   WorkspaceShape.
    fn impossible_column_is_an_error() {
        // Arrange
        let mc = DiscreteMarkovChain::new(array![1.0, 0.0], array![[0.5, 0.5], [0.5, 0.5]])
            .expect("valid chain");
        let emissions = vec![
            ExponentialEmission::new(1.0).expect("valid"),
            ExponentialEmission::new(2.0).expect("valid"),
        ];
        let hmm = HiddenMarkovModel::new(mc, emissions).expect("aligned");
        let mut b = Array2::zeros((2, 2));
        let mut off = Array1::zeros(2);
        let mut wrong = Array2::zeros((3, 2));

        // Act
        let err = update_obs_density(&mut b, &mut off, &hmm, &[1.0, -2.0]).expect_err("t = 1");
        let shape = update_obs_density(&mut wrong, &mut off, &hmm, &[1.0, 2.0])
            .expect_err("wrong buffer");

        // Assert
        assert_eq!(err, HMMError::ImpossibleObservation { t: 1 });
        assert!(matches!(shape, HMMError::WorkspaceShape { .. }));
    }
}
