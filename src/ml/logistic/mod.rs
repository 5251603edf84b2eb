//! Binary logistic regression fitted by full-batch gradient ascent.
//!
//! [`LogisticModel`] is the single writer of its [`Parameters`]: only
//! [`LogisticModel::fit`] and the explicit override in
//! [`LogisticModel::fix_parameters`] change them. The likelihood, Fisher
//! information and prediction helpers are free functions that borrow the
//! parameters read-only, so they can also be used on parameters obtained
//! elsewhere.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::dataset::TrainingTable;

mod hessian;
mod likelihood;
mod params;
mod predict;
mod train;

pub use hessian::{FisherInformation, fisher_information};
pub use likelihood::{
    convergence_cost, log_likelihood, probabilities, probability, sigmoid, sigmoid_derivative,
};
pub use params::Parameters;
pub use predict::{EvaluationReport, classify, evaluate, predict};
pub use train::{
    ConvergenceState, IterationStats, TrainOptions, TrainOutcome, gradient_ascent, step_size,
};

/// Default convergence tolerance on the change in cost between iterations.
pub const DEFAULT_EPSILON: f64 = 1e-10;
/// Default initial step size before decay.
pub const DEFAULT_STEP_SIZE: f64 = 0.01;
/// Multiplier applied to the initial step size: `alpha_t = 0.2 * initial / sqrt(t)`.
pub const STEP_DECAY_FACTOR: f64 = 0.2;
/// Distance from 0 or 1 at which a probability counts as saturated.
pub const PROBABILITY_CLAMP: f64 = 1e-7;
/// Cost added for each saturated row instead of evaluating `log(0)`.
pub const SATURATION_PENALTY: f64 = 1000.0;
/// Probabilities strictly above this are classified as label 1.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Shape errors raised where tables or parameters enter a model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A table or weight vector whose width differs from the model's.
    #[error("{what} has {got} features but the model expects {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

/// A logistic model together with its training and evaluation tables.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    params: Parameters,
    training: TrainingTable,
    evaluation: TrainingTable,
    options: TrainOptions,
    convergence: ConvergenceState,
}

impl LogisticModel {
    /// Build a model over `training` with randomly initialized parameters.
    pub fn new<R: Rng + ?Sized>(training: TrainingTable, rng: &mut R) -> Self {
        let params = Parameters::random(training.feature_len(), rng);
        let evaluation = TrainingTable::empty(training.feature_len());
        Self {
            params,
            training,
            evaluation,
            options: TrainOptions::default(),
            convergence: ConvergenceState::default(),
        }
    }

    /// Same as [`LogisticModel::new`] with a generator seeded from `seed`.
    pub fn with_seed(training: TrainingTable, seed: u64) -> Self {
        Self::new(training, &mut StdRng::seed_from_u64(seed))
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn training_table(&self) -> &TrainingTable {
        &self.training
    }

    pub fn evaluation_table(&self) -> &TrainingTable {
        &self.evaluation
    }

    pub fn options(&self) -> &TrainOptions {
        &self.options
    }

    pub fn convergence(&self) -> ConvergenceState {
        self.convergence
    }

    pub fn feature_len(&self) -> usize {
        self.params.dim()
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.options.epsilon = epsilon;
    }

    pub fn set_step_size(&mut self, initial_step_size: f64) {
        self.options.initial_step_size = initial_step_size;
    }

    pub fn set_options(&mut self, options: TrainOptions) {
        self.options = options;
    }

    /// Swap in a new training table.
    ///
    /// The weight vector is resized to the new width and zeroed; the bias is
    /// kept. An evaluation table of a different width is cleared.
    pub fn replace_training_table(&mut self, training: TrainingTable) {
        let width = training.feature_len();
        self.params.theta = vec![0.0; width];
        if self.evaluation.feature_len() != width {
            tracing::debug!(
                "Clearing evaluation table of width {} after training width changed to {width}",
                self.evaluation.feature_len()
            );
            self.evaluation = TrainingTable::empty(width);
        }
        tracing::debug!("Training table replaced: {} rows, {width} features", training.len());
        self.training = training;
    }

    /// Swap in a new evaluation table of matching width.
    pub fn replace_evaluation_table(&mut self, evaluation: TrainingTable) -> Result<(), ModelError> {
        self.check_width("evaluation table", evaluation.feature_len())?;
        self.evaluation = evaluation;
        Ok(())
    }

    /// Overwrite the parameters with caller-chosen values, bypassing training.
    pub fn fix_parameters(&mut self, theta: Vec<f64>, bias: f64) -> Result<(), ModelError> {
        self.check_width("theta", theta.len())?;
        tracing::debug!("Parameters fixed manually: bias={bias}, theta={theta:?}");
        self.params = Parameters { theta, bias };
        Ok(())
    }

    /// Run gradient ascent for at most `max_iterations + 1` iterations.
    pub fn fit(&mut self, max_iterations: usize) -> TrainOutcome {
        self.fit_with(max_iterations, |_| {})
    }

    /// Like [`LogisticModel::fit`], calling `observer` after every iteration.
    ///
    /// The convergence state is reset to zero at the start of each run.
    pub fn fit_with<F>(&mut self, max_iterations: usize, observer: F) -> TrainOutcome
    where
        F: FnMut(&IterationStats),
    {
        tracing::debug!(
            "Training on {} rows (epsilon={}, step size={}, max iterations={max_iterations})",
            self.training.len(),
            self.options.epsilon,
            self.options.initial_step_size
        );
        self.convergence = ConvergenceState::default();
        gradient_ascent(
            &mut self.params,
            &self.training,
            &self.options,
            max_iterations,
            &mut self.convergence,
            observer,
        )
    }

    /// Signed log-likelihood of the training table.
    pub fn log_likelihood(&self) -> f64 {
        log_likelihood(&self.params, &self.training)
    }

    /// Fisher information of the training table at the current parameters.
    pub fn fisher_information(&self) -> FisherInformation {
        fisher_information(&self.params, &self.training)
    }

    /// Hard predictions for the evaluation table.
    pub fn predict(&self) -> Vec<f64> {
        predict(&self.params, &self.evaluation)
    }

    /// Predictions for the evaluation table compared against its labels.
    pub fn evaluate(&self) -> EvaluationReport {
        evaluate(&self.params, &self.evaluation)
    }

    fn check_width(&self, what: &'static str, got: usize) -> Result<(), ModelError> {
        let expected = self.params.dim();
        if got != expected {
            return Err(ModelError::ShapeMismatch {
                what,
                expected,
                got,
            });
        }
        Ok(())
    }
}
