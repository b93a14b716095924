use ndarray::ArrayView1;
use crate::error::{CoxError, Result};

/// q-th percentile w/ linear interpolation between order statistics (numpy's default)
pub fn percentile(values: ArrayView1<f64>, q: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&q) {
        return Err(CoxError::invalid_parameter("percentile", q));
    }
    if values.is_empty() {
        return Err(CoxError::empty_input("percentile values"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CoxError::numerical_error("can't take a percentile of non-finite values"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// middle value (mean of the two middle values for even n)
pub fn median(values: ArrayView1<f64>) -> Result<f64> {
    percentile(values, 50.0)
}

/// low/high risk partition of a cohort by median risk score
#[derive(Debug, Clone, PartialEq)]
pub struct CohortSplit {
    pub median: f64,
    pub labels: Vec<u8>, // 1 = high risk (score > median), 0 = low risk
}

impl CohortSplit {
    pub fn is_high_risk(&self, i: usize) -> bool {
        self.labels[i] == 1
    }

    pub fn n_high(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }

    pub fn n_low(&self) -> usize {
        self.labels.len() - self.n_high()
    }

    /// indices of the low risk group (ties at the median land here)
    pub fn low_indices(&self) -> Vec<usize> {
        (0..self.labels.len()).filter(|&i| !self.is_high_risk(i)).collect()
    }

    pub fn high_indices(&self) -> Vec<usize> {
        (0..self.labels.len()).filter(|&i| self.is_high_risk(i)).collect()
    }
}

/// split at the empirical median; strictly above = high risk, ties go low
pub fn dichotomize(risk_scores: ArrayView1<f64>) -> Result<CohortSplit> {
    let median = median(risk_scores)?;
    let labels = risk_scores
        .iter()
        .map(|&s| if s > median { 1 } else { 0 })
        .collect();

    Ok(CohortSplit { median, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_percentile_interpolates() {
        let v = array![1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(percentile(v.view(), 0.0).unwrap(), 1.0);
        assert_relative_eq!(percentile(v.view(), 100.0).unwrap(), 4.0);
        assert_relative_eq!(percentile(v.view(), 25.0).unwrap(), 1.75);
        assert_relative_eq!(percentile(v.view(), 90.0).unwrap(), 3.7, epsilon = 1e-12);
    }

    #[test]
    fn test_percentile_rejects_bad_q() {
        let v = array![1.0];
        assert!(percentile(v.view(), -1.0).is_err());
        assert!(percentile(v.view(), 100.5).is_err());
        assert!(percentile(v.view(), f64::NAN).is_err());
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_relative_eq!(median(array![5.0, 1.0, 3.0].view()).unwrap(), 3.0);
        assert_relative_eq!(median(array![4.0, 1.0, 3.0, 2.0].view()).unwrap(), 2.5);
    }

    #[test]
    fn test_dichotomize_ties_go_low() {
        let split = dichotomize(array![0.1, 0.5, 0.9].view()).unwrap();
        assert_eq!(split.labels, vec![0, 0, 1]);
        assert_eq!(split.n_low(), 2);
        assert_eq!(split.high_indices(), vec![2]);

        // all equal: nobody is strictly above the median
        let flat = dichotomize(array![2.0, 2.0, 2.0, 2.0].view()).unwrap();
        assert_eq!(flat.n_high(), 0);
    }

    #[test]
    fn test_dichotomize_even_split() {
        let split = dichotomize(array![3.0, -1.0, 8.0, 0.5].view()).unwrap();
        assert_relative_eq!(split.median, 1.75);
        assert_eq!(split.labels, vec![1, 0, 1, 0]);
        assert_eq!(split.low_indices(), vec![1, 3]);
    }

    #[test]
    fn test_dichotomize_errors() {
        assert!(dichotomize(Array1::<f64>::zeros(0).view()).is_err());
        assert!(dichotomize(array![1.0, f64::NAN].view()).is_err());
    }
}
