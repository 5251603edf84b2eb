//! In-memory labeled tables consumed by the logistic model.

use super::DataError;

/// Placeholder label attached to feature vectors whose class is unknown.
pub const UNKNOWN_LABEL: f64 = 0.0;

/// A single row: a binary label followed by `d` feature values.
///
/// Labels are expected to be exactly `0.0` or `1.0` but are not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    pub label: f64,
    pub features: Vec<f64>,
}

impl LabeledExample {
    pub fn new(label: f64, features: Vec<f64>) -> Self {
        Self { label, features }
    }

    /// Split a raw record (`[label, f1, .., fd]`) into label and features.
    pub fn from_record(record: &[f64]) -> Result<Self, DataError> {
        let (&label, features) = record.split_first().ok_or(DataError::EmptyRecord)?;
        Ok(Self {
            label,
            features: features.to_vec(),
        })
    }
}

/// Ordered sequence of examples sharing the same feature width.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingTable {
    feature_len: usize,
    examples: Vec<LabeledExample>,
}

impl TrainingTable {
    /// Create an empty table whose rows will carry `feature_len` features.
    pub fn empty(feature_len: usize) -> Self {
        Self {
            feature_len,
            examples: Vec::new(),
        }
    }

    /// Build a table from raw `[label, features..]` records.
    ///
    /// The width of the first record fixes the feature count; every later
    /// record must match it.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, DataError> {
        let first = rows.first().ok_or(DataError::NoRows)?;
        let first = LabeledExample::from_record(first.as_ref())?;
        let mut table = Self::empty(first.features.len());
        table.examples.reserve(rows.len());
        table.examples.push(first);
        for row in &rows[1..] {
            table.push(LabeledExample::from_record(row.as_ref())?)?;
        }
        Ok(table)
    }

    /// Build an evaluation table from unlabeled feature vectors.
    pub fn unlabeled(feature_len: usize, vectors: Vec<Vec<f64>>) -> Result<Self, DataError> {
        let mut table = Self::empty(feature_len);
        for features in vectors {
            table.push(LabeledExample::new(UNKNOWN_LABEL, features))?;
        }
        Ok(table)
    }

    /// Append an example, rejecting rows of the wrong width.
    pub fn push(&mut self, example: LabeledExample) -> Result<(), DataError> {
        if example.features.len() != self.feature_len {
            return Err(DataError::WidthMismatch {
                row: self.examples.len(),
                expected: self.feature_len,
                got: example.features.len(),
            });
        }
        self.examples.push(example);
        Ok(())
    }

    pub fn feature_len(&self) -> usize {
        self.feature_len
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledExample> {
        self.examples.iter()
    }

    /// Label column in table order.
    pub fn labels(&self) -> Vec<f64> {
        self.examples.iter().map(|example| example.label).collect()
    }

    /// Split off the first `cutoff` rows as a holdout table.
    ///
    /// Returns `(training, holdout)`; the holdout keeps the leading rows.
    pub fn split_holdout(self, cutoff: usize) -> Result<(Self, Self), DataError> {
        if cutoff > self.examples.len() {
            return Err(DataError::SplitOutOfRange {
                cutoff,
                len: self.examples.len(),
            });
        }
        let feature_len = self.feature_len;
        let mut holdout = self.examples;
        let training = holdout.split_off(cutoff);
        Ok((
            Self {
                feature_len,
                examples: training,
            },
            Self {
                feature_len,
                examples: holdout,
            },
        ))
    }

    /// Project every row onto the listed feature indices (0-based).
    ///
    /// Labels are carried over unchanged. Indices may repeat or appear in any
    /// order; the output width equals `indices.len()`.
    pub fn select_features(&self, indices: &[usize]) -> Result<Self, DataError> {
        if let Some(&index) = indices.iter().find(|&&index| index >= self.feature_len) {
            return Err(DataError::FeatureOutOfRange {
                index,
                feature_len: self.feature_len,
            });
        }
        let examples = self
            .examples
            .iter()
            .map(|example| LabeledExample {
                label: example.label,
                features: indices.iter().map(|&i| example.features[i]).collect(),
            })
            .collect();
        Ok(Self {
            feature_len: indices.len(),
            examples,
        })
    }
}

impl<'a> IntoIterator for &'a TrainingTable {
    type Item = &'a LabeledExample;
    type IntoIter = std::slice::Iter<'a, LabeledExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TrainingTable {
        TrainingTable::from_rows(&[
            vec![0.0, 1.0, 10.0, 100.0],
            vec![1.0, 2.0, 20.0, 200.0],
            vec![0.0, 3.0, 30.0, 300.0],
        ])
        .unwrap()
    }

    #[test]
    fn from_rows_splits_label_from_features() {
        let table = sample();
        assert_eq!(table.len(), 3);
        assert_eq!(table.feature_len(), 3);
        assert_eq!(table.examples()[1].label, 1.0);
        assert_eq!(table.examples()[1].features, vec![2.0, 20.0, 200.0]);
        assert_eq!(table.labels(), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = TrainingTable::from_rows(&[vec![0.0, 1.0, 2.0], vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(
            err,
            DataError::WidthMismatch {
                row: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        let rows: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(
            TrainingTable::from_rows(&rows),
            Err(DataError::NoRows)
        ));
        assert!(matches!(
            TrainingTable::from_rows(&[Vec::<f64>::new()]),
            Err(DataError::EmptyRecord)
        ));
    }

    #[test]
    fn split_holdout_keeps_leading_rows_for_evaluation() {
        let (training, holdout) = sample().split_holdout(1).unwrap();
        assert_eq!(holdout.len(), 1);
        assert_eq!(holdout.examples()[0].features[0], 1.0);
        assert_eq!(training.len(), 2);
        assert_eq!(training.examples()[0].features[0], 2.0);
        assert_eq!(training.feature_len(), 3);
    }

    #[test]
    fn split_holdout_rejects_cutoff_past_end() {
        let err = sample().split_holdout(4).unwrap_err();
        assert!(matches!(err, DataError::SplitOutOfRange { cutoff: 4, len: 3 }));
    }

    #[test]
    fn select_features_reorders_and_keeps_labels() {
        let subset = sample().select_features(&[2, 0]).unwrap();
        assert_eq!(subset.feature_len(), 2);
        assert_eq!(subset.examples()[2].label, 0.0);
        assert_eq!(subset.examples()[2].features, vec![300.0, 3.0]);
    }

    #[test]
    fn select_features_rejects_unknown_index() {
        let err = sample().select_features(&[0, 3]).unwrap_err();
        assert!(matches!(
            err,
            DataError::FeatureOutOfRange {
                index: 3,
                feature_len: 3
            }
        ));
    }

    #[test]
    fn unlabeled_uses_placeholder_label() {
        let table = TrainingTable::unlabeled(2, vec![vec![1.0, 2.0]]).unwrap();
        assert_eq!(table.examples()[0].label, UNKNOWN_LABEL);
        assert!(TrainingTable::unlabeled(2, vec![vec![1.0]]).is_err());
    }
}
