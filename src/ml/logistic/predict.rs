use crate::dataset::TrainingTable;
use crate::ml::metrics::BinaryConfusion;

use super::DECISION_THRESHOLD;
use super::likelihood::probabilities;
use super::params::Parameters;

/// Diagnostic comparison of predictions against a table's label column.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    /// Probability of label 1 for each row.
    pub probabilities: Vec<f64>,
    /// `1.0` or `0.0` for each row.
    pub predictions: Vec<f64>,
    /// Rows whose prediction equals the stored label exactly.
    pub correct: usize,
    pub total: usize,
    pub confusion: BinaryConfusion,
}

impl EvaluationReport {
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Map a probability onto the hard label.
pub fn classify(probability: f64) -> f64 {
    if probability > DECISION_THRESHOLD {
        1.0
    } else {
        0.0
    }
}

/// Hard predictions for every row of `table`.
pub fn predict(params: &Parameters, table: &TrainingTable) -> Vec<f64> {
    probabilities(params, table).into_iter().map(classify).collect()
}

/// Predict every row and count matches against the stored labels.
pub fn evaluate(params: &Parameters, table: &TrainingTable) -> EvaluationReport {
    let probabilities = probabilities(params, table);
    let predictions: Vec<f64> = probabilities.iter().copied().map(classify).collect();
    let labels = table.labels();
    let correct = labels
        .iter()
        .zip(&predictions)
        .filter(|(label, predicted)| label == predicted)
        .count();
    let report = EvaluationReport {
        confusion: BinaryConfusion::from_predictions(&labels, &predictions),
        probabilities,
        predictions,
        correct,
        total: table.len(),
    };
    tracing::debug!("Result: {} correct out of {}", report.correct, report.total);
    report
}
