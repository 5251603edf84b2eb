//! Evaluation metrics for binary classifiers.

/// Confusion counts for labels `0.0` (negative) and `1.0` (positive).
///
/// Rows whose stored label is neither value are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryConfusion {
    pub true_positive: u32,
    pub false_positive: u32,
    pub true_negative: u32,
    pub false_negative: u32,
}

impl BinaryConfusion {
    /// Tally predictions against stored labels, pairwise in order.
    pub fn from_predictions(labels: &[f64], predictions: &[f64]) -> Self {
        let mut cm = Self::default();
        for (&truth, &predicted) in labels.iter().zip(predictions) {
            cm.add(truth, predicted);
        }
        cm
    }

    pub fn add(&mut self, truth: f64, predicted: f64) {
        let positive = predicted == 1.0;
        let slot = if truth == 1.0 {
            if positive {
                &mut self.true_positive
            } else {
                &mut self.false_negative
            }
        } else if truth == 0.0 {
            if positive {
                &mut self.false_positive
            } else {
                &mut self.true_negative
            }
        } else {
            return;
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    /// `TP / (TP + FP)`.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// `TP / (TP + FN)`.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> f64 {
        let (precision, recall) = (self.precision(), self.recall());
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
