use rand::Rng;

/// Weight vector `theta` and scalar bias `b` of a binary logistic model.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub theta: Vec<f64>,
    pub bias: f64,
}

impl Parameters {
    /// All-zero parameters for `dim` features.
    pub fn zeros(dim: usize) -> Self {
        Self {
            theta: vec![0.0; dim],
            bias: 0.0,
        }
    }

    /// Random starting point: `theta_j ~ U[-1, 1)` and `b ~ U[0, 1)`.
    ///
    /// The bias is drawn first so that a given seed reproduces the same
    /// starting point regardless of how the weights are consumed later.
    pub fn random<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Self {
        let bias = rng.random::<f64>();
        let theta = (0..dim).map(|_| 2.0 * rng.random::<f64>() - 1.0).collect();
        Self { theta, bias }
    }

    pub fn dim(&self) -> usize {
        self.theta.len()
    }

    /// Linear score `z = b + Σ_j theta_j · x_j`.
    pub fn linear_combination(&self, features: &[f64]) -> f64 {
        self.theta
            .iter()
            .zip(features)
            .fold(self.bias, |acc, (w, x)| acc + w * x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_draws_stay_in_range_and_are_reproducible() {
        let a = Parameters::random(64, &mut StdRng::seed_from_u64(7));
        let b = Parameters::random(64, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!((0.0..1.0).contains(&a.bias));
        assert!(a.theta.iter().all(|w| (-1.0..1.0).contains(w)));
    }

    #[test]
    fn linear_combination_adds_bias() {
        let params = Parameters {
            theta: vec![0.5, -2.0],
            bias: 1.5,
        };
        assert_eq!(params.linear_combination(&[2.0, 1.0]), 0.5);
    }
}
