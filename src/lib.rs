//! # cox risk
//!
//! cox partial-likelihood loss for training risk models + the survival metrics you report on them
//!
//! ## what you get
//!
//! - negative log partial likelihood w/ analytic gradient (plug into any optimizer)
//! - overflow-safe by default (running log-sum-exp over each risk set)
//! - concordance index, median-split log-rank test, median-split accuracy
//! - month -> binary grade conversion
//! - L1/L2 penalties and parameter counts over your model's tensors
//!
//! ## quick start
//!
//! ```rust
//! use cox_risk::{CoxLoss, CoxLossConfig, RiskSetOrdering, concordance_index};
//! use ndarray::array;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let times = array![5.0, 3.5, 2.0, 1.0];
//! let events = [true, false, true, true]; // true = died, false = censored
//! let risk_scores = array![-0.4, 0.1, 0.3, 1.2]; // model output, higher = riskier
//!
//! // risk sets from survival times rather than input position
//! let loss = CoxLoss::new(CoxLossConfig::new().with_ordering(RiskSetOrdering::DescendingTime));
//! let out = loss.forward_backward(times.view(), &events, risk_scores.view())?;
//! assert!(out.loss.is_finite());
//! assert_eq!(out.gradient.len(), 4); // d loss / d risk score, feed to backprop
//!
//! let c = concordance_index(risk_scores.view(), &events, times.view())?;
//! assert!((0.0..=1.0).contains(&c));
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod dichotomize;
pub mod error;
pub mod logrank;
pub mod loss;
pub mod metrics;
pub mod regularization;
pub mod risk_set;

pub use data::SurvivalBatch;
pub use dichotomize::{dichotomize, median, percentile, CohortSplit};
pub use error::{CoxError, Result};
pub use logrank::{cox_log_rank, log_rank_p_value, log_rank_test, LogRankResult};
pub use loss::{cox_loss, CoxLoss, CoxLossConfig, CoxLossOutput, RiskSetOrdering};
pub use metrics::{
    accuracy_by_median_split, concordance_index, time_to_grade, EvaluationReport,
};
pub use risk_set::risk_set_matrix;
