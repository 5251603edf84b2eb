use crate::dataset::TrainingTable;

use super::likelihood::{convergence_cost, probabilities};
use super::params::Parameters;
use super::{DEFAULT_EPSILON, DEFAULT_STEP_SIZE, STEP_DECAY_FACTOR};

/// Tunables applied to every gradient-ascent run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainOptions {
    /// Largest change in cost between iterations that still counts as converged.
    pub epsilon: f64,
    /// Step size before decay; iteration `t` uses `0.2 * initial / sqrt(t)`.
    pub initial_step_size: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            initial_step_size: DEFAULT_STEP_SIZE,
        }
    }
}

/// Cost of the last two iterations of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConvergenceState {
    pub previous_cost: f64,
    pub current_cost: f64,
}

impl ConvergenceState {
    fn advance(&mut self, cost: f64) -> f64 {
        self.previous_cost = self.current_cost;
        self.current_cost = cost;
        (self.current_cost - self.previous_cost).abs()
    }
}

/// Terminal state of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainOutcome {
    /// The cost changed by less than `epsilon` at this iteration.
    Converged { iterations: usize },
    /// The iteration counter passed the caller's budget.
    MaxIterationsReached { iterations: usize },
}

impl TrainOutcome {
    pub fn iterations(&self) -> usize {
        match *self {
            TrainOutcome::Converged { iterations }
            | TrainOutcome::MaxIterationsReached { iterations } => iterations,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, TrainOutcome::Converged { .. })
    }
}

/// Snapshot handed to observers after each iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    pub iteration: usize,
    pub step_size: f64,
    pub cost: f64,
    pub delta: f64,
}

/// Decayed step size for the 1-indexed `iteration`.
pub fn step_size(initial_step_size: f64, iteration: usize) -> f64 {
    STEP_DECAY_FACTOR * initial_step_size / (iteration as f64).sqrt()
}

/// Full-batch gradient ascent on the log-likelihood.
///
/// Every iteration scores all rows with the current parameters, moves all
/// weights and the bias simultaneously along the gradient, then compares the
/// clamped cost of those scores with the previous iteration's. The loop stops
/// once the change drops below `options.epsilon`, or after the iteration
/// numbered `max_iterations + 1` otherwise.
pub fn gradient_ascent<F>(
    params: &mut Parameters,
    table: &TrainingTable,
    options: &TrainOptions,
    max_iterations: usize,
    state: &mut ConvergenceState,
    mut observer: F,
) -> TrainOutcome
where
    F: FnMut(&IterationStats),
{
    debug_assert_eq!(params.dim(), table.feature_len());
    let mut gradient = vec![0.0; params.dim()];

    for iteration in 1usize.. {
        let alpha = step_size(options.initial_step_size, iteration);
        let scores = probabilities(params, table);

        gradient.fill(0.0);
        let mut bias_gradient = 0.0;
        for (example, &a) in table.iter().zip(&scores) {
            let residual = a - example.label;
            for (g, x) in gradient.iter_mut().zip(&example.features) {
                *g += residual * x;
            }
            bias_gradient += residual;
        }
        for (w, g) in params.theta.iter_mut().zip(&gradient) {
            *w -= alpha * g;
        }
        params.bias -= alpha * bias_gradient;

        let cost = convergence_cost(table.iter().map(|example| example.label), &scores);
        let delta = state.advance(cost);
        let stats = IterationStats {
            iteration,
            step_size: alpha,
            cost,
            delta,
        };
        tracing::trace!(?stats, "gradient ascent iteration");
        observer(&stats);

        if delta < options.epsilon {
            tracing::info!("Training converged after {iteration} iterations");
            return TrainOutcome::Converged {
                iterations: iteration,
            };
        }
        if iteration > max_iterations {
            tracing::warn!(
                "Reached the maximum of {max_iterations} iterations; consider changing the step size"
            );
            return TrainOutcome::MaxIterationsReached {
                iterations: iteration,
            };
        }
    }
    unreachable!("iteration counter overflowed")
}
