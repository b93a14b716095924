use cox_risk::{
    regularization::{count_trainable, penalty, Parameter, Penalty},
    time_to_grade, accuracy_by_median_split, CoxLoss, CoxLossConfig, EvaluationReport,
    RiskSetOrdering, SurvivalBatch,
};
use ndarray::{Array1, Array2};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Cox Partial Likelihood - Training Loop Example");
    println!("==============================================\n");

    // survival in months, event = death observed
    let months = vec![5.0, 71.0, 22.0, 48.0, 93.0, 13.0, 60.0, 37.0, 84.0, 29.0,
                      66.0, 9.0, 55.0, 102.0, 41.0, 18.0, 77.0, 33.0, 61.0, 25.0];

    let events = vec![true, false, true, true, false, true, false, true, true, true,
                      false, true, true, false, true, true, false, true, true, true];

    // covariates: age (scaled), tumor grade (scaled), treatment (0/1)
    let covariates = Array2::from_shape_vec((20, 3), vec![
         1.2,  1.0, 0.0,
        -0.8, -1.0, 1.0,
         0.6,  0.5, 0.0,
         0.1,  0.0, 1.0,
        -1.3, -1.2, 1.0,
         1.5,  1.3, 0.0,
        -0.4, -0.6, 1.0,
         0.3,  0.4, 0.0,
        -0.9, -0.8, 1.0,
         0.7,  0.6, 0.0,
        -0.6, -0.7, 1.0,
         1.4,  1.1, 0.0,
        -0.2, -0.1, 1.0,
        -1.5, -1.4, 1.0,
         0.2,  0.3, 0.0,
         1.0,  0.9, 0.0,
        -1.1, -0.9, 1.0,
         0.5,  0.2, 0.0,
        -0.3, -0.5, 1.0,
         0.8,  0.7, 0.0,
    ])?;

    let batch = SurvivalBatch::new(months, events)?;

    println!("Cohort:");
    println!("  - samples:  {}", batch.n_samples());
    println!("  - events:   {}", batch.n_events());
    println!("  - censored: {}", batch.n_samples() - batch.n_events());
    println!();

    // the "model" is a linear scorer; any autodiff framework would take the loss gradient
    // and push it through its own graph the same way
    let loss_fn = CoxLoss::new(CoxLossConfig::new().with_ordering(RiskSetOrdering::DescendingTime));
    let mut beta = Array1::<f64>::zeros(3);
    let learning_rate = 0.5;
    let l1_strength = 0.01;

    println!("{:>6} {:>12} {:>12}", "step", "cox loss", "objective");
    println!("{:-<32}", "");

    for step in 0..=200 {
        let scores = covariates.dot(&beta);
        let out = loss_fn.forward_backward_batch(&batch, scores.view())?;

        let weights = beta.clone().into_dyn();
        let params = [Parameter::new("linear.weight", weights.view())];
        let objective = out.loss + penalty(&params, Penalty::L1, l1_strength);

        if step % 40 == 0 {
            println!("{:>6} {:>12.6} {:>12.6}", step, out.loss, objective);
        }

        let mut grad_beta = covariates.t().dot(&out.gradient);
        grad_beta += &(l1_strength * &beta.mapv(f64::signum));
        beta = &beta - &(learning_rate * &grad_beta);
    }
    println!();

    let params = [Parameter::new("linear.weight", beta.view().into_dyn())];
    println!("Trainable parameters: {}", count_trainable(&params));
    println!("Learned coefficients: {:.4}", beta);
    println!();

    let risk_scores = covariates.dot(&beta);
    let five_year_grade = time_to_grade(batch.times(), 60.0);
    // grade 0 = died before 5 years = high risk label
    let high_risk_labels: Vec<u8> = five_year_grade.iter().map(|&g| 1 - g).collect();

    let report = EvaluationReport::compute(&batch, risk_scores.view(), Some(&high_risk_labels))?;
    report.print();

    println!();
    println!(
        "Median-split accuracy vs 5-year grade: {:.3}",
        accuracy_by_median_split(risk_scores.view(), &high_risk_labels)?
    );

    Ok(())
}
