//! Binary logistic regression with Fisher information for the fitted estimates.
/// Application directory resolution.
pub mod app_dirs;
/// Persisted training settings.
pub mod config;
/// Labeled tables and the CSV loader.
pub mod dataset;
/// Tracing subscriber setup.
pub mod logging;
/// Logistic model, training loop and metrics.
pub mod ml;
