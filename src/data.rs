use ndarray::{Array1, ArrayView1};
use crate::error::{ensure_same_len, CoxError, Result};

/// survival batch - times and event flags, index-aligned
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalBatch {
    times: Array1<f64>,  // time to event/censoring
    events: Vec<bool>,   // true = event, false = censored
}

impl SurvivalBatch {
    /// make a new batch from raw vecs
    pub fn new(
        times: Vec<f64>,   // survival/censoring times
        events: Vec<bool>, // true = event occurred, false = censored
    ) -> Result<Self> {
        ensure_same_len(
            "survival batch",
            &[("times", times.len()), ("events", events.len())],
        )?;

        if times.iter().any(|&t| t < 0.0 || !t.is_finite()) {
            return Err(CoxError::invalid_survival_data(
                "survival times must be non-negative & finite"
            ));
        }

        Ok(Self {
            times: Array1::from(times),
            events,
        })
    }

    /// same as `new` but from 0/1 event codes, the way most training data ships
    pub fn from_indicators(times: Vec<f64>, indicators: &[u8]) -> Result<Self> {
        let events = indicators
            .iter()
            .map(|&code| match code {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(CoxError::invalid_parameter("event indicator", other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(times, events)
    }

    /// how many samples
    pub fn n_samples(&self) -> usize {
        self.times.len()
    }

    /// how many observed events (uncensored samples)
    pub fn n_events(&self) -> usize {
        self.events.iter().filter(|&&e| e).count()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// survival/censoring times
    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.times.view()
    }

    /// event indicators (true = event, false = censored)
    pub fn events(&self) -> &[bool] {
        &self.events
    }

    /// stable permutation putting the longest survivors first.
    /// under that order, position <= i is exactly "still at risk at t_i" when times are distinct
    pub fn descending_time_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.n_samples()).collect();
        // times are validated finite, total_cmp agrees with partial_cmp here
        order.sort_by(|&a, &b| self.times[b].total_cmp(&self.times[a]));
        order
    }

    /// does input order already encode risk-set membership?
    pub fn is_sorted_descending(&self) -> bool {
        self.times
            .iter()
            .zip(self.times.iter().skip(1))
            .all(|(prev, next)| prev >= next)
    }

    /// unique event times in order
    pub fn event_times(&self) -> Vec<f64> {
        let mut times: Vec<f64> = self.times
            .iter()
            .zip(self.events.iter())
            .filter_map(|(time, event)| if *event { Some(*time) } else { None })
            .collect();

        times.sort_by(f64::total_cmp);
        times.dedup();
        times
    }

    /// grab a subset of samples by indices (also used to reorder)
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        if indices.iter().any(|&i| i >= self.n_samples()) {
            return Err(CoxError::invalid_dimensions(
                "subset index out of bounds"
            ));
        }

        let times: Vec<f64> = indices.iter().map(|&i| self.times[i]).collect();
        let events: Vec<bool> = indices.iter().map(|&i| self.events[i]).collect();

        Self::new(times, events)
    }
}
