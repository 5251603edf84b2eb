//! Machine learning building blocks: the binary logistic model and its metrics.

pub mod logistic;
pub mod metrics;
