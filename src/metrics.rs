use ndarray::ArrayView1;
use crate::{
    data::SurvivalBatch,
    dichotomize::dichotomize,
    error::{ensure_same_len, CoxError, Result},
    logrank::cox_log_rank,
};

/// concordance index - how often do higher risk scores = shorter survival?
///
/// risk scores are negated and handed to [`concordance_from_survival_predictions`],
/// which reads larger values as longer predicted survival.
pub fn concordance_index(
    risk_scores: ArrayView1<f64>,
    events: &[bool],
    times: ArrayView1<f64>,
) -> Result<f64> {
    let predicted_survival = risk_scores.mapv(|r| -r);
    concordance_from_survival_predictions(times, predicted_survival.view(), events)
}

/// Harrell's C for predictions where bigger means "lives longer".
///
/// A pair (i, j) is comparable when i had an event and j outlived it: `t_j > t_i`, or j was
/// censored at `t_j >= t_i`. Two events at the same time are not comparable. Concordant
/// pairs score 1, prediction ties 0.5.
pub fn concordance_from_survival_predictions(
    times: ArrayView1<f64>,
    predictions: ArrayView1<f64>,
    events: &[bool],
) -> Result<f64> {
    let n = ensure_same_len(
        "concordance",
        &[
            ("times", times.len()),
            ("predictions", predictions.len()),
            ("events", events.len()),
        ],
    )?;

    if predictions.iter().chain(times.iter()).any(|v| v.is_nan()) {
        return Err(CoxError::numerical_error("NaN in concordance inputs"));
    }

    let mut concordant = 0.0;
    let mut tied = 0.0;
    let mut comparable = 0.0;

    for i in 0..n {
        if !events[i] {
            continue; // censored obs can't anchor a pair
        }

        for j in 0..n {
            if i == j {
                continue;
            }

            if times[j] > times[i] || (!events[j] && times[j] >= times[i]) {
                comparable += 1.0;

                if predictions[i] < predictions[j] {
                    concordant += 1.0;
                } else if predictions[i] == predictions[j] {
                    tied += 1.0;
                }
            }
        }
    }

    if comparable == 0.0 {
        return Err(CoxError::numerical_error(
            "no comparable pairs for concordance calc"
        ));
    }

    Ok((concordant + 0.5 * tied) / comparable)
}

/// fraction of samples whose median-split risk group matches the given 0/1 label
/// (1 = high risk). labels have to encode the same high/low semantics for this to mean anything
pub fn accuracy_by_median_split(risk_scores: ArrayView1<f64>, labels: &[u8]) -> Result<f64> {
    let n = ensure_same_len(
        "accuracy",
        &[("risk scores", risk_scores.len()), ("labels", labels.len())],
    )?;
    if n == 0 {
        return Err(CoxError::empty_input("accuracy labels"));
    }
    if let Some(&bad) = labels.iter().find(|&&l| l > 1) {
        return Err(CoxError::invalid_parameter("label", bad));
    }

    let split = dichotomize(risk_scores)?;
    let correct = split
        .labels
        .iter()
        .zip(labels)
        .filter(|(predicted, truth)| predicted == truth)
        .count();

    Ok(correct as f64 / n as f64)
}

/// binarize time predictions at `threshold` (e.g. 60 months = 5 years).
/// 0 = below threshold (early event), 1 = at or above
pub fn time_to_grade(time_predictions: ArrayView1<f64>, threshold: f64) -> Vec<u8> {
    time_predictions
        .iter()
        .map(|&t| if t < threshold { 0 } else { 1 })
        .collect()
}

/// Time-based log partial likelihood with Breslow ties: every sample with `t >= t_event`
/// is in the risk set, whatever its position. Useful to check the positional loss.
pub fn log_partial_likelihood(
    data: &SurvivalBatch,
    risk_scores: ArrayView1<f64>,
) -> Result<f64> {
    if risk_scores.len() != data.n_samples() {
        return Err(CoxError::invalid_dimensions(
            "risk scores length must match number of samples"
        ));
    }

    let mut loglik = 0.0;

    for &event_time in &data.event_times() {
        let events_at_time: Vec<usize> = (0..data.n_samples())
            .filter(|&i| data.times()[i] == event_time && data.events()[i])
            .collect();

        let risk_set: Vec<usize> = (0..data.n_samples())
            .filter(|&i| data.times()[i] >= event_time)
            .collect();

        // log sum exp, shifted by the max
        let max_risk = risk_set.iter().map(|&i| risk_scores[i]).fold(f64::NEG_INFINITY, f64::max);
        let log_sum_exp = max_risk +
            risk_set.iter()
                .map(|&i| (risk_scores[i] - max_risk).exp())
                .sum::<f64>()
                .ln();

        for &event_idx in &events_at_time {
            loglik += risk_scores[event_idx] - log_sum_exp;
        }
    }

    Ok(loglik)
}

/// everything reported at an evaluation checkpoint
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub n_samples: usize,
    pub n_events: usize,
    pub c_index: f64,
    pub log_rank_p_value: f64,
    pub log_rank_statistic: f64,
    pub accuracy: Option<f64>,
    pub log_likelihood: f64,
}

impl EvaluationReport {
    /// compute all metrics for one set of risk scores
    pub fn compute(
        data: &SurvivalBatch,
        risk_scores: ArrayView1<f64>,
        labels: Option<&[u8]>,
    ) -> Result<Self> {
        ensure_same_len(
            "evaluation",
            &[("batch", data.n_samples()), ("risk scores", risk_scores.len())],
        )?;

        let c_index = concordance_index(risk_scores, data.events(), data.times())?;
        let log_rank = cox_log_rank(risk_scores, data.events(), data.times())?;

        let accuracy = labels
            .map(|labels| accuracy_by_median_split(risk_scores, labels))
            .transpose()?;

        let log_likelihood = log_partial_likelihood(data, risk_scores)?;

        Ok(Self {
            n_samples: data.n_samples(),
            n_events: data.n_events(),
            c_index,
            log_rank_p_value: log_rank.p_value,
            log_rank_statistic: log_rank.statistic,
            accuracy,
            log_likelihood,
        })
    }

    /// print metrics summary
    pub fn print(&self) {
        println!("Survival Evaluation");
        println!("===================");
        println!("Samples / events:    {} / {}", self.n_samples, self.n_events);
        println!("C-index:             {:.6}", self.c_index);
        println!("Log-rank chi2:       {:.6}", self.log_rank_statistic);
        println!("Log-rank p-value:    {:.6}", self.log_rank_p_value);
        match self.accuracy {
            Some(acc) => println!("Median-split acc.:   {:.6}", acc),
            None => println!("Median-split acc.:   n/a"),
        }
        println!("Log-likelihood:      {:.6}", self.log_likelihood);
    }
}
