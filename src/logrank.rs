use ndarray::ArrayView1;
use crate::{
    data::SurvivalBatch,
    dichotomize::dichotomize,
    error::{ensure_same_len, CoxError, Result},
};

/// two-sample log-rank test outcome. index 0 = first group (low risk), 1 = second (high risk)
#[derive(Debug, Clone, PartialEq)]
pub struct LogRankResult {
    pub statistic: f64,     // chi-squared, 1 df
    pub p_value: f64,
    pub observed: [f64; 2], // events seen per group
    pub expected: [f64; 2], // events expected under equal hazards
    pub variance: f64,      // hypergeometric variance of O - E for group 0
}

/// Mantel-Haenszel log-rank test: do the two groups share a survival curve?
pub fn log_rank_test(group_a: &SurvivalBatch, group_b: &SurvivalBatch) -> Result<LogRankResult> {
    if group_a.is_empty() || group_b.is_empty() {
        return Err(CoxError::degenerate_groups(format!(
            "log-rank needs two non-empty groups (sizes {} and {})",
            group_a.n_samples(),
            group_b.n_samples()
        )));
    }

    // (time, event, group), ascending time
    let mut rows: Vec<(f64, bool, usize)> = Vec::with_capacity(group_a.n_samples() + group_b.n_samples());
    for (g, batch) in [group_a, group_b].into_iter().enumerate() {
        rows.extend(batch.times().iter().zip(batch.events()).map(|(&t, &e)| (t, e, g)));
    }
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut at_risk = [group_a.n_samples() as f64, group_b.n_samples() as f64];
    let mut observed = [0.0; 2];
    let mut expected = [0.0; 2];
    let mut variance = 0.0;

    let mut i = 0;
    while i < rows.len() {
        let t = rows[i].0;
        let mut deaths = [0.0; 2];
        let mut leaving = [0.0; 2];
        while i < rows.len() && rows[i].0 == t {
            let (_, event, g) = rows[i];
            if event {
                deaths[g] += 1.0;
            }
            leaving[g] += 1.0;
            i += 1;
        }

        let d_total = deaths[0] + deaths[1];
        let n_total = at_risk[0] + at_risk[1];
        if d_total > 0.0 {
            for g in 0..2 {
                observed[g] += deaths[g];
                expected[g] += d_total * at_risk[g] / n_total;
            }
            if n_total > 1.0 {
                variance += d_total * (n_total - d_total) * at_risk[0] * at_risk[1]
                    / (n_total * n_total * (n_total - 1.0));
            }
        }

        at_risk[0] -= leaving[0];
        at_risk[1] -= leaving[1];
    }

    let diff = observed[0] - expected[0];
    let statistic = if variance > 0.0 { diff * diff / variance } else { 0.0 };
    let p_value = chi_squared_sf(statistic, 1.0);

    Ok(LogRankResult {
        statistic,
        p_value,
        observed,
        expected,
        variance,
    })
}

/// median-split the cohort by risk score, then log-rank low vs high.
/// reporting only: nothing here carries a gradient
pub fn cox_log_rank(
    risk_scores: ArrayView1<f64>,
    events: &[bool],
    times: ArrayView1<f64>,
) -> Result<LogRankResult> {
    ensure_same_len(
        "log-rank",
        &[
            ("risk scores", risk_scores.len()),
            ("events", events.len()),
            ("times", times.len()),
        ],
    )?;
    let cohort = SurvivalBatch::new(times.to_vec(), events.to_vec())?;
    let split = dichotomize(risk_scores)?;

    let low = cohort.subset(&split.low_indices())?;
    let high = cohort.subset(&split.high_indices())?;
    log_rank_test(&low, &high)
}

/// p-value of the median-split log-rank test
pub fn log_rank_p_value(
    risk_scores: ArrayView1<f64>,
    events: &[bool],
    times: ArrayView1<f64>,
) -> Result<f64> {
    Ok(cox_log_rank(risk_scores, events, times)?.p_value)
}

/// upper tail of chi-squared(k), straight from the upper incomplete gamma so tiny p-values survive
fn chi_squared_sf(x: f64, k: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    statrs::function::gamma::gamma_ur(k / 2.0, x / 2.0)
}
