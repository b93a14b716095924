//! risk-set indicator matrix
//!
//! row i marks the samples at positions `0..=i` as "at risk" when sample i is evaluated.
//! the construction is positional: survival-time values are never consulted, so callers
//! wanting textbook risk sets pass samples sorted by time descending first
//! (see [`crate::SurvivalBatch::descending_time_order`]). tied times are not merged.

use ndarray::{Array1, Array2, ArrayView1};

/// lower-triangular ones matrix for a batch of `n` samples
pub fn risk_set_matrix(n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |(i, j)| if j <= i { 1.0 } else { 0.0 })
}

/// `ln(M · exp(s))` as a running log-sum-exp: each prefix carries its own max,
/// so a low score ahead of a high one never underflows to `ln 0`
pub fn log_risk_set_sums(scores: ArrayView1<f64>) -> Array1<f64> {
    let mut out = Array1::zeros(scores.len());
    let mut max = f64::NEG_INFINITY;
    let mut acc = 0.0; // sum of exp(s_j - max) over the prefix

    for (i, &s) in scores.iter().enumerate() {
        if s > max {
            acc = acc * (max - s).exp() + 1.0;
            max = s;
        } else if s != f64::NEG_INFINITY {
            acc += (s - max).exp();
        }
        out[i] = max + acc.ln();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Axis};

    #[test]
    fn test_lower_triangular_with_diagonal() {
        for n in 0..8 {
            let m = risk_set_matrix(n);
            assert_eq!(m.dim(), (n, n));
            for ((i, j), &v) in m.indexed_iter() {
                assert_eq!(v, if j <= i { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_row_sums_count_up() {
        let m = risk_set_matrix(5);
        let row_sums = m.sum_axis(Axis(1));
        assert_eq!(row_sums, array![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_layered_summation() {
        // [1 0 0]   [a]   [a    ]
        // [1 1 0] · [b] = [a+b  ]
        // [1 1 1]   [c]   [a+b+c]
        let v = array![2.0, 3.0, 7.0];
        assert_eq!(risk_set_matrix(3).dot(&v), array![2.0, 5.0, 12.0]);
    }

    #[test]
    fn test_transpose_collects_later_rows() {
        // column j of M is "every row i >= j", so Mᵀ·w is a suffix sum
        let w = array![1.0, 10.0, 100.0];
        assert_eq!(risk_set_matrix(3).t().dot(&w), array![111.0, 110.0, 100.0]);
    }

    #[test]
    fn test_log_sums_match_dense_product() {
        let s = array![0.3, -1.2, 2.5, 0.0, -0.7];
        let dense = risk_set_matrix(5).dot(&s.mapv(f64::exp)).mapv(f64::ln);
        let running = log_risk_set_sums(s.view());
        for (a, b) in dense.iter().zip(running.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_log_sums_low_then_high() {
        // exp(-400 - 400) underflows; each prefix still gets its own scale
        let running = log_risk_set_sums(array![-400.0, 400.0].view());
        assert_relative_eq!(running[0], -400.0);
        assert_relative_eq!(running[1], 400.0, epsilon = 1e-12);

        let running = log_risk_set_sums(array![1000.0, 999.0].view());
        assert_relative_eq!(running[1], 1000.0 + (1.0 + (-1.0f64).exp()).ln(), epsilon = 1e-12);
    }
}
