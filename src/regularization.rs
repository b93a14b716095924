//! weight penalties and parameter counts, folded over whatever tensors the caller's model owns

use ndarray::ArrayViewD;

/// one named weight tensor borrowed from an external model
#[derive(Debug, Clone)]
pub struct Parameter<'a> {
    pub name: &'a str,
    pub values: ArrayViewD<'a, f64>,
    pub trainable: bool, // frozen tensors still count toward penalties
}

impl<'a> Parameter<'a> {
    pub fn new(name: &'a str, values: ArrayViewD<'a, f64>) -> Self {
        Self { name, values, trainable: true }
    }

    pub fn frozen(mut self) -> Self {
        self.trainable = false;
        self
    }
}

/// which penalty to fold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Penalty {
    L1, // sum |w|
    L2, // 0.5 * sum w^2
}

/// lasso term over every tensor, `sum |w|`
pub fn l1_norm(params: &[Parameter<'_>]) -> f64 {
    params
        .iter()
        .map(|p| p.values.iter().map(|w| w.abs()).sum::<f64>())
        .sum()
}

/// ridge term, `0.5 * sum w^2`
pub fn l2_norm(params: &[Parameter<'_>]) -> f64 {
    0.5 * params
        .iter()
        .map(|p| p.values.iter().map(|w| w * w).sum::<f64>())
        .sum::<f64>()
}

/// penalty value to add to the loss, already scaled by `strength`
pub fn penalty(params: &[Parameter<'_>], kind: Penalty, strength: f64) -> f64 {
    let norm = match kind {
        Penalty::L1 => l1_norm(params),
        Penalty::L2 => l2_norm(params),
    };
    strength * norm
}

/// number of scalar weights the optimizer actually updates
pub fn count_trainable(params: &[Parameter<'_>]) -> usize {
    params
        .iter()
        .filter(|p| p.trainable)
        .map(|p| p.values.len())
        .sum()
}
