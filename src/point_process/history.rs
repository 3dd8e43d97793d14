//! History — marked event times observed on a window `[tmin, tmax)`.
//!
//! Purpose
//! -------
//! Store one realization of a marked point process so that point-process
//! emission families can evaluate likelihoods and re-estimate rates from
//! it. A history is an ordinary observation for the HMM engine.
//!
//! Key behaviors
//! -------------
//! - Construction validates the window, ordering and alignment of times and
//!   marks; [`History::push`] and [`History::append`] keep those invariants.
//! - Interval queries ([`History::nb_events_in`], [`History::has_events_in`])
//!   use binary search on the sorted times over half-open `[a, b)`.
//! - [`History::time_change`] applies a monotone rescaling `t ↦ Λ(t)` to
//!   the window and every event.
//! - [`History::split_into_chunks`] cuts the window into consecutive
//!   sub-histories of equal duration; a trailing partial window is dropped.
//!
//! Invariants & assumptions
//! ------------------------
//! - `tmin < tmax`, both finite.
//! - `tmin ≤ times[i] < tmax` and `times` is non-decreasing; ties are
//!   allowed and kept in insertion order.
//! - `marks.len() == times.len()`.
use crate::point_process::errors::{HistoryError, HistoryResult};
use std::cmp::Ordering;

/// Upper bound on the number of chunks produced by
/// [`History::split_into_chunks`].
const MAX_CHUNKS: f64 = 4_294_967_296.0;
/// Relative slack on the chunk count.
const CHUNK_COUNT_EPS: f64 = 1e-9;

/// Marked event history on `[tmin, tmax)`.
#[derive(Debug, Clone, PartialEq)]
pub struct History<M> {
    times: Vec<f64>,
    marks: Vec<M>,
    tmin: f64,
    tmax: f64,
}

impl<M> History<M> {
    /// Build a history from sorted times and aligned marks.
    ///
    /// # Errors
    /// - [`HistoryError::InvalidWindow`] unless `tmin < tmax`, both finite.
    /// - [`HistoryError::LengthMismatch`] if `times` and `marks` differ.
    /// - [`HistoryError::TimeOutOfWindow`] / [`HistoryError::UnorderedTimes`].
    pub fn new(times: Vec<f64>, marks: Vec<M>, tmin: f64, tmax: f64) -> HistoryResult<Self> {
        check_window(tmin, tmax)?;
        if times.len() != marks.len() {
            return Err(HistoryError::LengthMismatch { times: times.len(), marks: marks.len() });
        }
        for (index, &time) in times.iter().enumerate() {
            if !time.is_finite() || time < tmin || time >= tmax {
                return Err(HistoryError::TimeOutOfWindow { index, time });
            }
            if index > 0 && time < times[index - 1] {
                return Err(HistoryError::UnorderedTimes {
                    index,
                    previous: times[index - 1],
                    time,
                });
            }
        }
        Ok(Self { times, marks, tmin, tmax })
    }

    /// History with no events on `[tmin, tmax)`.
    ///
    /// # Errors
    /// [`HistoryError::InvalidWindow`].
    pub fn empty(tmin: f64, tmax: f64) -> HistoryResult<Self> {
        check_window(tmin, tmax)?;
        Ok(Self { times: Vec::new(), marks: Vec::new(), tmin, tmax })
    }

    /// Assemble a history whose invariants the caller already guarantees.
    pub(crate) fn from_sorted(times: Vec<f64>, marks: Vec<M>, tmin: f64, tmax: f64) -> Self {
        debug_assert!(times.len() == marks.len() && times.windows(2).all(|w| w[0] <= w[1]));
        Self { times, marks, tmin, tmax }
    }

    /// Append one event at or after the last event time.
    ///
    /// # Errors
    /// [`HistoryError::TimeOutOfWindow`] / [`HistoryError::UnorderedTimes`].
    pub fn push(&mut self, time: f64, mark: M) -> HistoryResult<()> {
        let index = self.times.len();
        if !time.is_finite() || time < self.tmin || time >= self.tmax {
            return Err(HistoryError::TimeOutOfWindow { index, time });
        }
        if let Some(&previous) = self.times.last() {
            if time < previous {
                return Err(HistoryError::UnorderedTimes { index, previous, time });
            }
        }
        self.times.push(time);
        self.marks.push(mark);
        Ok(())
    }

    /// Concatenate a history whose window starts where this one ends.
    ///
    /// # Errors
    /// [`HistoryError::NonContiguous`] unless `other.tmin == self.tmax`.
    pub fn append(&mut self, other: History<M>) -> HistoryResult<()> {
        if other.tmin != self.tmax {
            return Err(HistoryError::NonContiguous { tmax: self.tmax, next_tmin: other.tmin });
        }
        self.times.extend(other.times);
        self.marks.extend(other.marks);
        self.tmax = other.tmax;
        Ok(())
    }

    pub fn event_times(&self) -> &[f64] {
        &self.times
    }

    pub fn event_marks(&self) -> &[M] {
        &self.marks
    }

    /// `(time, mark)` pairs in time order.
    pub fn events(&self) -> impl Iterator<Item = (f64, &M)> + '_ {
        self.times.iter().copied().zip(self.marks.iter())
    }

    pub fn min_time(&self) -> f64 {
        self.tmin
    }

    pub fn max_time(&self) -> f64 {
        self.tmax
    }

    pub fn duration(&self) -> f64 {
        self.tmax - self.tmin
    }

    pub fn nb_events(&self) -> usize {
        self.times.len()
    }

    /// Number of events with `a ≤ t < b` (zero when `b ≤ a`).
    pub fn nb_events_in(&self, a: f64, b: f64) -> usize {
        if a.partial_cmp(&b) != Some(Ordering::Less) {
            return 0;
        }
        let lo = self.times.partition_point(|&t| t < a);
        let hi = self.times.partition_point(|&t| t < b);
        hi - lo
    }

    pub fn has_events(&self) -> bool {
        !self.times.is_empty()
    }

    pub fn has_events_in(&self, a: f64, b: f64) -> bool {
        self.nb_events_in(a, b) > 0
    }

    /// Apply the time rescaling `t ↦ Λ(t)` to the window and every event.
    ///
    /// # Errors
    /// - [`HistoryError::NonMonotoneTimeChange`] if the rescaled event times
    ///   leave the rescaled window, decrease, or are not finite (`index` is
    ///   the first offending event, or `nb_events` for the window itself).
    pub fn time_change<F>(&self, lambda: F) -> HistoryResult<History<M>>
    where
        F: Fn(f64) -> f64,
        M: Clone,
    {
        let (tmin, tmax) = (lambda(self.tmin), lambda(self.tmax));
        if !tmin.is_finite() || !tmax.is_finite() || tmin >= tmax {
            return Err(HistoryError::NonMonotoneTimeChange { index: self.times.len() });
        }
        let mut times: Vec<f64> = Vec::with_capacity(self.times.len());
        for (index, &t) in self.times.iter().enumerate() {
            let s = lambda(t);
            let previous = times.last().copied().unwrap_or(tmin);
            if !s.is_finite() || s < previous || s >= tmax {
                return Err(HistoryError::NonMonotoneTimeChange { index });
            }
            times.push(s);
        }
        Ok(History { times, marks: self.marks.clone(), tmin, tmax })
    }

    /// Split into consecutive sub-histories of duration `chunk_duration`.
    ///
    /// Chunk `k` covers `[tmin + k·d, tmin + (k+1)·d)`; a trailing window
    /// shorter than `d` is dropped.
    ///
    /// # Errors
    /// [`HistoryError::InvalidChunkDuration`] unless `d` is finite and positive
    /// and yields at most `2^32` chunks.
    pub fn split_into_chunks(&self, chunk_duration: f64) -> HistoryResult<Vec<History<M>>>
    where
        M: Clone,
    {
        if !chunk_duration.is_finite() || chunk_duration <= 0.0 {
            return Err(HistoryError::InvalidChunkDuration { value: chunk_duration });
        }
        let ratio = self.duration() / chunk_duration;
        if !ratio.is_finite() || ratio > MAX_CHUNKS {
            return Err(HistoryError::InvalidChunkDuration { value: chunk_duration });
        }
        // Absorb division round-off so `0.3 / 0.1` counts three chunks.
        let n_chunks = (ratio + CHUNK_COUNT_EPS * ratio.max(1.0)).floor() as usize;
        let mut chunks = Vec::new();
        let mut start_idx = 0;
        for k in 0..n_chunks {
            let a = self.tmin + k as f64 * chunk_duration;
            let mut b = a + chunk_duration;
            if k + 1 == n_chunks {
                b = b.min(self.tmax);
            }
            let end_idx = start_idx + self.times[start_idx..].partition_point(|&t| t < b);
            chunks.push(History {
                times: self.times[start_idx..end_idx].to_vec(),
                marks: self.marks[start_idx..end_idx].to_vec(),
                tmin: a,
                tmax: b,
            });
            start_idx = end_idx;
        }
        Ok(chunks)
    }
}

impl<M: Copy + Ord> History<M> {
    /// Largest mark, if any event exists.
    pub fn max_mark(&self) -> Option<M> {
        self.marks.iter().copied().max()
    }
}

pub(crate) fn check_window(tmin: f64, tmax: f64) -> HistoryResult<()> {
    if !tmin.is_finite() || !tmax.is_finite() || tmin >= tmax {
        return Err(HistoryError::InvalidWindow { tmin, tmax });
    }
    Ok(())
}
