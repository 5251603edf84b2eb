//! Fisher information (negative Hessian of the log-likelihood).

use ndarray::Array2;

use crate::dataset::TrainingTable;

use super::likelihood::sigmoid_derivative;
use super::params::Parameters;

/// Square `(d+1)×(d+1)` information matrix; index 0 is the bias term.
#[derive(Debug, Clone, PartialEq)]
pub struct FisherInformation {
    matrix: Array2<f64>,
}

impl FisherInformation {
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.matrix[[row, col]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Row-major copy of the matrix.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.matrix.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Whether `H[i][j]` and `H[j][i]` agree within `tolerance` everywhere.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.dim();
        (0..n).all(|i| (i + 1..n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance))
    }
}

/// Compute `H_ij = Σ_k x_i(k) x_j(k) e^{-z_k} / (1 + e^{-z_k})^2` with `x_0 ≡ 1`.
///
/// Each row is scored once; the upper triangle is accumulated and mirrored.
/// Extreme scores are not guarded and may yield NaN entries.
pub fn fisher_information(params: &Parameters, table: &TrainingTable) -> FisherInformation {
    debug_assert_eq!(params.dim(), table.feature_len());
    let dim = params.dim() + 1;
    let mut matrix = Array2::<f64>::zeros((dim, dim));
    let mut x = vec![1.0; dim];

    for example in table {
        let weight = sigmoid_derivative(params.linear_combination(&example.features));
        x[1..].copy_from_slice(&example.features);
        for i in 0..dim {
            let wx = weight * x[i];
            for j in i..dim {
                matrix[[i, j]] += wx * x[j];
            }
        }
    }
    for i in 0..dim {
        for j in 0..i {
            matrix[[i, j]] = matrix[[j, i]];
        }
    }
    FisherInformation { matrix }
}
