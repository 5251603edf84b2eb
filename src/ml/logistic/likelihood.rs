//! Sigmoid scores and the two log-likelihood costs.

use crate::dataset::TrainingTable;

use super::{PROBABILITY_CLAMP, SATURATION_PENALTY};
use super::params::Parameters;

/// Logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the logistic function, `e^-x / (1 + e^-x)^2`.
pub fn sigmoid_derivative(x: f64) -> f64 {
    let e = (-x).exp();
    e / (1.0 + e).powi(2)
}

/// Predicted probability of label 1 for a feature vector.
pub fn probability(params: &Parameters, features: &[f64]) -> f64 {
    sigmoid(params.linear_combination(features))
}

/// Probabilities for every row of `table`, in table order.
pub fn probabilities(params: &Parameters, table: &TrainingTable) -> Vec<f64> {
    table
        .iter()
        .map(|example| probability(params, &example.features))
        .collect()
}

/// Negative log-likelihood used as the training convergence signal.
///
/// Saturated probabilities add a fixed penalty instead of evaluating
/// `log(0)`. Labels other than 0 and 1 contribute nothing.
pub fn convergence_cost(labels: impl IntoIterator<Item = f64>, scores: &[f64]) -> f64 {
    let mut cost = 0.0;
    for (label, &a) in labels.into_iter().zip(scores) {
        if label == 0.0 {
            if a > 1.0 - PROBABILITY_CLAMP {
                cost += SATURATION_PENALTY;
            } else {
                cost -= (1.0 - a).ln();
            }
        } else if label == 1.0 {
            if a < PROBABILITY_CLAMP {
                cost += SATURATION_PENALTY;
            } else {
                cost -= a.ln();
            }
        }
    }
    cost
}

/// Signed log-likelihood of `table` under `params`, summed over rows.
///
/// Unclamped: extreme scores may produce `-inf` or NaN. Any label other than
/// 0 is scored as a positive example.
pub fn log_likelihood(params: &Parameters, table: &TrainingTable) -> f64 {
    table
        .iter()
        .map(|example| {
            let z = params.linear_combination(&example.features);
            if example.label == 0.0 {
                (1.0 / (1.0 + z.exp())).ln()
            } else {
                (1.0 / (1.0 + (-z).exp())).ln()
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> TrainingTable {
        TrainingTable::from_rows(&[vec![0.0, 1.0, 1.0], vec![1.0, 2.0, 2.0]]).unwrap()
    }

    #[test]
    fn sigmoid_matches_known_values() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!((sigmoid(2.0) - 0.880_797_077_977_882_3).abs() < 1e-12);
        assert!((sigmoid_derivative(0.0) - 0.25).abs() < 1e-15);
    }

    #[test]
    fn probability_of_second_toy_row() {
        let params = Parameters {
            theta: vec![0.5, 0.5],
            bias: 0.0,
        };
        let scores = probabilities(&params, &toy());
        assert!((scores[1] - 0.8808).abs() < 1e-4);
    }

    #[test]
    fn convergence_cost_at_even_odds() {
        let cost = convergence_cost([0.0, 1.0], &[0.5, 0.5]);
        assert!((cost - 2.0 * std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn convergence_cost_penalizes_saturation() {
        assert_eq!(convergence_cost([0.0], &[1.0]), SATURATION_PENALTY);
        assert_eq!(convergence_cost([1.0], &[0.0]), SATURATION_PENALTY);
        assert_eq!(convergence_cost([0.0, 1.0], &[1.0, 1e-9]), 2.0 * SATURATION_PENALTY);
    }

    #[test]
    fn convergence_cost_ignores_malformed_labels() {
        assert_eq!(convergence_cost([0.5, 2.0], &[0.3, 0.7]), 0.0);
    }

    #[test]
    fn log_likelihood_is_negated_convergence_cost_when_unsaturated() {
        let params = Parameters {
            theta: vec![0.2, -0.1],
            bias: 0.3,
        };
        let table = toy();
        let scores = probabilities(&params, &table);
        let nll = convergence_cost(table.labels(), &scores);
        assert!((log_likelihood(&params, &table) + nll).abs() < 1e-12);
    }

    #[test]
    fn log_likelihood_overflows_without_clamping() {
        let params = Parameters {
            theta: vec![1000.0, 1000.0],
            bias: 0.0,
        };
        let ll = log_likelihood(&params, &toy());
        assert!(ll.is_infinite() && ll < 0.0);
    }
}
