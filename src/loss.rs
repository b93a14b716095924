use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use crate::{
    data::SurvivalBatch,
    error::{ensure_same_len, CoxError, Result},
    risk_set::{log_risk_set_sums, risk_set_matrix},
};

/// how risk sets are read off the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskSetOrdering {
    /// input position is the risk-set order: row i covers samples `0..=i`.
    /// only matches the textbook risk set if the caller sorted by time descending
    #[default]
    Positional,
    /// sort by survival time descending (stable) before building risk sets,
    /// gradient is scattered back to input order
    DescendingTime,
}

/// configuration for the negative log partial likelihood
#[derive(Debug, Clone, PartialEq)]
pub struct CoxLossConfig {
    pub ordering: RiskSetOrdering,
    pub stabilize: bool, // running log-sum-exp instead of raw exp
}

impl Default for CoxLossConfig {
    fn default() -> Self {
        Self {
            ordering: RiskSetOrdering::Positional,
            stabilize: true,
        }
    }
}

impl CoxLossConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ordering(mut self, ordering: RiskSetOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// turn log-sum-exp stabilization on/off. off reproduces raw `exp(score)` and can overflow
    pub fn with_stabilization(mut self, stabilize: bool) -> Self {
        self.stabilize = stabilize;
        self
    }
}

/// loss value plus d(loss)/d(risk score), in input order
#[derive(Debug, Clone)]
pub struct CoxLossOutput {
    pub loss: f64,
    pub gradient: Array1<f64>,
    pub n_events: usize,
}

/// Negative log partial likelihood over a batch of risk scores.
///
/// For scores `s`, event flags `d` and risk-set sums `R_i = sum_{j<=i} exp(s_j)`:
///
/// ```text
/// loss = -( sum_i d_i * (s_i - ln R_i) ) / (n_events + 1)
/// ```
///
/// The `+ 1` keeps event-free batches finite (their loss is zero). Censored samples
/// add nothing to the numerator but still sit in every `R_i` they are part of.
#[derive(Debug, Clone, Default)]
pub struct CoxLoss {
    config: CoxLossConfig,
}

impl CoxLoss {
    pub fn new(config: CoxLossConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoxLossConfig {
        &self.config
    }

    /// scalar loss only
    pub fn forward(
        &self,
        times: ArrayView1<f64>,
        events: &[bool],
        risk_scores: ArrayView1<f64>,
    ) -> Result<f64> {
        Ok(self.forward_backward(times, events, risk_scores)?.loss)
    }

    /// loss and its gradient wrt the risk scores
    pub fn forward_backward(
        &self,
        times: ArrayView1<f64>,
        events: &[bool],
        risk_scores: ArrayView1<f64>,
    ) -> Result<CoxLossOutput> {
        ensure_same_len(
            "cox loss",
            &[
                ("times", times.len()),
                ("events", events.len()),
                ("risk scores", risk_scores.len()),
            ],
        )?;
        let batch = SurvivalBatch::new(times.to_vec(), events.to_vec())?;
        self.forward_backward_batch(&batch, risk_scores)
    }

    /// same as `forward_backward` for an already validated batch
    pub fn forward_backward_batch(
        &self,
        batch: &SurvivalBatch,
        risk_scores: ArrayView1<f64>,
    ) -> Result<CoxLossOutput> {
        let n = ensure_same_len(
            "cox loss",
            &[("batch", batch.n_samples()), ("risk scores", risk_scores.len())],
        )?;
        if n == 0 {
            return Err(CoxError::empty_input("cox loss batch"));
        }

        if risk_scores.iter().any(|s| !s.is_finite()) {
            warn!("cox loss got non-finite risk scores; loss will not be finite");
        }

        let output = match self.config.ordering {
            RiskSetOrdering::Positional => {
                if !batch.is_sorted_descending() {
                    debug!(
                        "positional risk sets on a batch not sorted by time descending (n = {})",
                        n
                    );
                }
                self.partial_likelihood(risk_scores, batch.events())
            }
            RiskSetOrdering::DescendingTime => {
                let order = batch.descending_time_order();
                let sorted_scores = risk_scores.select(Axis(0), &order);
                let sorted_events: Vec<bool> = order.iter().map(|&i| batch.events()[i]).collect();

                let mut out = self.partial_likelihood(sorted_scores.view(), &sorted_events);
                let mut gradient = Array1::zeros(n);
                for (k, &i) in order.iter().enumerate() {
                    gradient[i] = out.gradient[k];
                }
                out.gradient = gradient;
                out
            }
        };

        if !output.loss.is_finite() || output.gradient.iter().any(|g| !g.is_finite()) {
            warn!(
                "cox loss is not finite (loss = {}, stabilize = {}); clamp risk scores or enable stabilization",
                output.loss, self.config.stabilize
            );
        }

        Ok(output)
    }

    /// the actual computation, scores and events already in risk-set order
    fn partial_likelihood(&self, scores: ArrayView1<f64>, events: &[bool]) -> CoxLossOutput {
        let n = scores.len();
        let n_events = events.iter().filter(|&&e| e).count();
        let n_observed = n_events as f64 + 1.0;

        let indicator = risk_set_matrix(n);
        // ln R_i = ln sum_{j<=i} exp(s_j)
        let log_risk = if self.config.stabilize {
            log_risk_set_sums(scores)
        } else {
            indicator.dot(&scores.mapv(f64::exp)).mapv(f64::ln)
        };

        let mut sum_diff_in_observed = 0.0;
        let mut observed = Array1::zeros(n);
        for i in 0..n {
            if events[i] {
                sum_diff_in_observed += scores[i] - log_risk[i];
                observed[i] = 1.0;
            }
        }

        // share of sample k in risk set i: exp(s_k - ln R_i), zero outside the set
        let shares = Array2::from_shape_fn((n, n), |(i, k)| {
            if indicator[[i, k]] > 0.0 {
                (scores[k] - log_risk[i]).exp()
            } else {
                0.0
            }
        });

        // d loss / d s_k = -(d_k - sum_{i >= k} d_i * exp(s_k) / R_i) / (E + 1)
        let gradient = (shares.t().dot(&observed) - &observed) / n_observed;

        CoxLossOutput {
            loss: -(sum_diff_in_observed / n_observed),
            gradient,
            n_events,
        }
    }
}

/// negative log partial likelihood with default settings (positional, stabilized)
pub fn cox_loss(
    times: ArrayView1<f64>,
    events: &[bool],
    risk_scores: ArrayView1<f64>,
) -> Result<f64> {
    CoxLoss::default().forward(times, events, risk_scores)
}
