//! Multivariate (marked) homogeneous Poisson process.
//!
//! Purpose
//! -------
//! Model a [`History<usize>`] as the superposition of `M` independent
//! homogeneous Poisson processes, mark `m` firing at rate `λ_m`. Used as an
//! HMM emission whose observations are event histories (e.g. one window of
//! activity per time step).
//!
//! Key behaviors
//! -------------
//! - Log-likelihood of a history on `[tmin, tmax)` with `n_m` events of mark
//!   `m`: `Σ_m n_m ln λ_m − (tmax − tmin) Σ_m λ_m`.
//! - Weighted MLE is closed form: `λ_m = Σ w·n_m / Σ w·duration`.
//! - [`GammaRatePrior`] gives an independent posterior-mode update per mark.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one mark; every rate finite and `≥ 0`.
//! - A history containing a mark `≥ M` has log-density `-∞`.
use crate::{
    hmm::{
        core::emission::{Emission, EmissionPrior, SampleEmission, WeightedSamples},
        emissions::GammaRatePrior,
        errors::{EmissionError, EmissionResult},
    },
    point_process::history::{History, check_window},
};
use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
};
use statrs::distribution::Exp;

/// Independent Poisson processes, one rate per mark.
#[derive(Debug, Clone, PartialEq)]
pub struct MultivariatePoissonProcess {
    rates: Vec<f64>,
}

impl MultivariatePoissonProcess {
    /// # Errors
    /// - [`EmissionError::DegenerateSamples`] if `rates` is empty.
    /// - [`EmissionError::InvalidParameter`] for a negative or non-finite rate.
    pub fn new(rates: Vec<f64>) -> EmissionResult<Self> {
        if rates.is_empty() {
            return Err(EmissionError::DegenerateSamples { reason: "no marks" });
        }
        if let Some(&value) = rates.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(EmissionError::InvalidParameter {
                name: "rates",
                value,
                reason: "must be finite and >= 0",
            });
        }
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn nb_processes(&self) -> usize {
        self.rates.len()
    }

    pub fn total_rate(&self) -> f64 {
        self.rates.iter().sum()
    }

    /// Simulate a history on `[tmin, tmax)`.
    ///
    /// # Errors
    /// [`EmissionError::History`] for an invalid window.
    pub fn simulate<G: Rng + ?Sized>(
        &self, rng: &mut G, tmin: f64, tmax: f64,
    ) -> EmissionResult<History<usize>> {
        check_window(tmin, tmax)?;
        Ok(self.simulate_unchecked(rng, tmin, tmax))
    }

    fn simulate_unchecked<G: Rng + ?Sized>(
        &self, rng: &mut G, tmin: f64, tmax: f64,
    ) -> History<usize> {
        let (mut times, mut marks) = (Vec::new(), Vec::new());
        // Both fail only when every rate is zero, i.e. no events.
        let gaps = Exp::new(self.total_rate());
        let mark_dist = WeightedIndex::new(&self.rates);
        if let (Ok(gaps), Ok(mark_dist)) = (gaps, mark_dist) {
            let mut t = tmin + gaps.sample(rng);
            while t < tmax {
                times.push(t);
                marks.push(mark_dist.sample(rng));
                t += gaps.sample(rng);
            }
        }
        History::from_sorted(times, marks, tmin, tmax)
    }

    /// Unweighted MLE over a collection of histories.
    ///
    /// # Errors
    /// - [`EmissionError::ZeroTotalWeight`] for an empty collection.
    /// - [`EmissionError::InvalidObservation`] if a mark is `≥ nb_processes`.
    pub fn fit_mle(nb_processes: usize, histories: &[History<usize>]) -> EmissionResult<Self> {
        let refs: Vec<&History<usize>> = histories.iter().collect();
        let weights = vec![1.0; histories.len()];
        let samples = WeightedSamples::new(&refs, &weights)?;
        let (events, exposure) = Self::sufficient_stats(nb_processes, &samples)?;
        Self::new(events.iter().map(|n| n / exposure).collect())
    }

    /// Weighted per-mark event counts and total weighted exposure.
    fn sufficient_stats(
        nb_processes: usize, samples: &WeightedSamples<'_, History<usize>>,
    ) -> EmissionResult<(Vec<f64>, f64)> {
        samples.positive_total_weight()?;
        let mut events = vec![0.0; nb_processes];
        let mut exposure = 0.0;
        for (index, w, history) in samples.iter_positive() {
            for &m in history.event_marks() {
                match events.get_mut(m) {
                    Some(count) => *count += w,
                    None => {
                        return Err(EmissionError::InvalidObservation {
                            index,
                            reason: "mark outside the process range",
                        });
                    }
                }
            }
            exposure += w * history.duration();
        }
        Ok((events, exposure))
    }
}

impl Emission for MultivariatePoissonProcess {
    type Obs = History<usize>;

    fn log_density(&self, obs: &History<usize>) -> f64 {
        let mut counts = vec![0usize; self.rates.len()];
        for &m in obs.event_marks() {
            match counts.get_mut(m) {
                Some(n) => *n += 1,
                None => return f64::NEG_INFINITY,
            }
        }
        let events: f64 = counts
            .iter()
            .zip(&self.rates)
            .filter(|(n, _)| **n > 0)
            .map(|(&n, &rate)| n as f64 * rate.ln())
            .sum();
        events - obs.duration() * self.total_rate()
    }

    fn fit_weighted(&self, samples: &WeightedSamples<'_, History<usize>>) -> EmissionResult<Self> {
        let (events, exposure) = Self::sufficient_stats(self.rates.len(), samples)?;
        Self::new(events.iter().map(|n| n / exposure).collect())
    }
}

impl SampleEmission for MultivariatePoissonProcess {
    /// One unit window `[0, 1)`.
    fn sample<G: Rng + ?Sized>(&self, rng: &mut G) -> History<usize> {
        self.simulate_unchecked(rng, 0.0, 1.0)
    }
}

impl EmissionPrior<MultivariatePoissonProcess> for GammaRatePrior {
    fn fit_map(
        &self, current: &MultivariatePoissonProcess,
        samples: &WeightedSamples<'_, History<usize>>,
    ) -> EmissionResult<MultivariatePoissonProcess> {
        let (events, exposure) =
            MultivariatePoissonProcess::sufficient_stats(current.nb_processes(), samples)?;
        let rates = events
            .iter()
            .map(|&n| self.posterior_mode(n, exposure))
            .collect::<EmissionResult<Vec<f64>>>()?;
        MultivariatePoissonProcess::new(rates)
    }

    fn log_density(&self, emission: &MultivariatePoissonProcess) -> f64 {
        emission.rates().iter().map(|&rate| self.ln_pdf(rate)).sum()
    }
}
