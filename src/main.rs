//! Command-line driver: load a CSV table, fit the logistic model, and print
//! the Fisher information, coefficients, predictions and log-likelihood.

use std::path::PathBuf;

use logit_fisher::config::{self, TrainingSettings};
use logit_fisher::dataset::{TrainingTable, load_table};
use logit_fisher::logging;
use logit_fisher::ml::logistic::{FisherInformation, LogisticModel, TrainOutcome};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let run_label = options
        .data_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Err(err) = logging::init(&run_label) {
        eprintln!("Logging disabled: {err}");
    }
    let settings = resolve_settings(&options)?;

    let mut table = load_table(&options.data_path).map_err(|err| err.to_string())?;
    if let Some(features) = &options.features {
        table = table
            .select_features(features)
            .map_err(|err| err.to_string())?;
    }
    let (training, holdout) = match options.holdout {
        Some(cutoff) => {
            let (training, holdout) = table.split_holdout(cutoff).map_err(|err| err.to_string())?;
            (training, Some(holdout))
        }
        None => (table, None),
    };

    let mut model = LogisticModel::with_seed(training, settings.seed);
    model.set_options(settings.train_options());

    match &options.fixed {
        Some(fixed) => {
            model
                .fix_parameters(fixed.theta.clone(), fixed.bias)
                .map_err(|err| err.to_string())?;
            println!("Using fixed parameters; training skipped");
        }
        None => match model.fit(settings.max_iterations) {
            TrainOutcome::Converged { iterations } => {
                println!("Process completed in {iterations} iterations");
            }
            TrainOutcome::MaxIterationsReached { iterations } => {
                println!(
                    "Reached the maximum number of iterations ({iterations}). Consider changing the step size"
                );
            }
        },
    }

    print_information(&model.fisher_information());
    print_parameters(&model);

    let evaluation = match holdout {
        Some(holdout) => Some(holdout),
        None if options.predict.is_empty() => None,
        None => Some(
            TrainingTable::unlabeled(model.feature_len(), options.predict.clone())
                .map_err(|err| err.to_string())?,
        ),
    };
    if let Some(evaluation) = evaluation {
        let labeled = options.predict.is_empty();
        model
            .replace_evaluation_table(evaluation)
            .map_err(|err| err.to_string())?;
        print_evaluation(&model, labeled);
    }

    println!("Cost is: {}", model.log_likelihood());
    Ok(())
}

#[derive(Debug, Clone)]
struct CliOptions {
    data_path: PathBuf,
    config_path: Option<PathBuf>,
    holdout: Option<usize>,
    features: Option<Vec<usize>>,
    epsilon: Option<f64>,
    step_size: Option<f64>,
    max_iterations: Option<usize>,
    seed: Option<u64>,
    fixed: Option<FixedParameters>,
    predict: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct FixedParameters {
    bias: f64,
    theta: Vec<f64>,
}

fn resolve_settings(options: &CliOptions) -> Result<TrainingSettings, String> {
    let loaded = match &options.config_path {
        Some(path) => config::load_from_path(path),
        None => config::load_or_default(),
    };
    let mut settings = match loaded {
        Ok(config) => config.training,
        Err(err) if options.config_path.is_some() => return Err(err.to_string()),
        Err(err) => {
            tracing::warn!("Using default training settings: {err}");
            TrainingSettings::default()
        }
    };
    if let Some(epsilon) = options.epsilon {
        settings.epsilon = epsilon;
    }
    if let Some(step_size) = options.step_size {
        settings.initial_step_size = step_size;
    }
    if let Some(max_iterations) = options.max_iterations {
        settings.max_iterations = max_iterations;
    }
    if let Some(seed) = options.seed {
        settings.seed = seed;
    }
    Ok(settings)
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut data_path: Option<PathBuf> = None;
    let mut config_path = None;
    let mut holdout = None;
    let mut features = None;
    let mut epsilon = None;
    let mut step_size = None;
    let mut max_iterations = None;
    let mut seed = None;
    let mut bias: Option<f64> = None;
    let mut theta: Option<Vec<f64>> = None;
    let mut predict = Vec::new();

    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "-h" | "--help" => return Err(help_text()),
            "--data" => data_path = Some(PathBuf::from(value_for(&args, &mut idx, flag)?)),
            "--config" => config_path = Some(PathBuf::from(value_for(&args, &mut idx, flag)?)),
            "--holdout" => holdout = Some(parse_value(value_for(&args, &mut idx, flag)?, flag)?),
            "--features" => {
                let columns: Vec<usize> = parse_list(value_for(&args, &mut idx, flag)?, flag)?;
                if columns.contains(&0) {
                    return Err("--features columns are 1-based".to_string());
                }
                features = Some(columns.into_iter().map(|column| column - 1).collect());
            }
            "--epsilon" => epsilon = Some(parse_value(value_for(&args, &mut idx, flag)?, flag)?),
            "--step-size" => {
                step_size = Some(parse_value(value_for(&args, &mut idx, flag)?, flag)?)
            }
            "--max-iterations" => {
                max_iterations = Some(parse_value(value_for(&args, &mut idx, flag)?, flag)?)
            }
            "--seed" => seed = Some(parse_value(value_for(&args, &mut idx, flag)?, flag)?),
            "--bias" => bias = Some(parse_value(value_for(&args, &mut idx, flag)?, flag)?),
            "--theta" => theta = Some(parse_list(value_for(&args, &mut idx, flag)?, flag)?),
            "--predict" => predict.push(parse_list(value_for(&args, &mut idx, flag)?, flag)?),
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let fixed = match (bias, theta) {
        (Some(bias), Some(theta)) => Some(FixedParameters { bias, theta }),
        (None, None) => None,
        _ => return Err("--bias and --theta must be given together".to_string()),
    };
    if holdout.is_some() && !predict.is_empty() {
        return Err("--holdout and --predict are mutually exclusive".to_string());
    }
    let data_path = data_path.ok_or_else(help_text)?;
    Ok(CliOptions {
        data_path,
        config_path,
        holdout,
        features,
        epsilon,
        step_size,
        max_iterations,
        seed,
        fixed,
        predict,
    })
}

fn value_for<'a>(args: &'a [String], idx: &mut usize, flag: &str) -> Result<&'a str, String> {
    *idx += 1;
    args.get(*idx)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn parse_value<T: std::str::FromStr>(value: &str, flag: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid {flag} value: {value}"))
}

fn parse_list<T: std::str::FromStr>(value: &str, flag: &str) -> Result<Vec<T>, String> {
    value
        .split(',')
        .map(|item| parse_value(item, flag))
        .collect()
}

fn help_text() -> String {
    [
        "logit-fisher",
        "",
        "Fits a binary logistic regression by gradient ascent and reports the Fisher information.",
        "",
        "Usage:",
        "  logit-fisher --data <file.csv> [options]",
        "",
        "The CSV has one header line; each row is `label,feature_1,..,feature_d`.",
        "",
        "Options:",
        "  --data <file>            Training CSV (required).",
        "  --config <file>          Settings TOML (default: app config directory).",
        "  --holdout <n>            Use the first n rows as the evaluation table.",
        "                           Cannot be combined with --predict.",
        "  --features <i,j,..>      Keep only these feature columns (1-based).",
        "  --epsilon <f64>          Convergence tolerance (default: 1e-10).",
        "  --step-size <f64>        Initial step size (default: 0.01).",
        "  --max-iterations <n>     Iteration budget (default: 1000000).",
        "  --seed <u64>             RNG seed for initial parameters (default: 42).",
        "  --bias <f64>             Fixed bias; requires --theta and skips training.",
        "  --theta <w1,w2,..>       Fixed weights; requires --bias.",
        "  --predict <x1,x2,..>     Classify a feature vector (repeatable).",
    ]
    .join("\n")
}

/// Leading cells at 4 decimals; the last cell of each row, the bias column,
/// at 9.
fn print_information(info: &FisherInformation) {
    println!("Info Matrix: ");
    for row in info.rows() {
        println!("{{{}}}, ", format_information_row(&row));
    }
}

fn format_information_row(row: &[f64]) -> String {
    let last = row.len().saturating_sub(1);
    row.iter()
        .enumerate()
        .map(|(idx, value)| {
            if idx == last {
                format!("{value:.9}")
            } else {
                format!("{value:.4}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_parameters(model: &LogisticModel) {
    let params = model.parameters();
    println!("Constant Term, theta zero: {}", params.bias);
    println!("Thetas: ");
    for weight in &params.theta {
        println!("{weight}");
    }
    println!("============================");
}

fn print_evaluation(model: &LogisticModel, labeled: bool) {
    let report = model.evaluate();
    for probability in &report.probabilities {
        println!("{probability}");
    }
    if !labeled {
        let predictions: Vec<String> = report.predictions.iter().map(|p| p.to_string()).collect();
        println!("Predicted Labels: {}", predictions.join(", "));
        return;
    }
    let expected: Vec<String> = model
        .evaluation_table()
        .labels()
        .iter()
        .map(|label| label.to_string())
        .collect();
    println!("Expected Labels: {}", expected.join(", "));
    println!("Result: {} correct out of {}", report.correct, report.total);
    println!(
        "Precision: {:.4}  Recall: {:.4}  F1: {:.4}",
        report.confusion.precision(),
        report.confusion.recall(),
        report.confusion.f1()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_overrides_and_lists() {
        let options = parse_args(args(&[
            "--data",
            "train.csv",
            "--features",
            "1,3",
            "--epsilon",
            "1e-6",
            "--predict",
            "3,1",
            "--predict",
            "1,0",
        ]))
        .unwrap();
        assert_eq!(options.data_path, PathBuf::from("train.csv"));
        assert_eq!(options.features, Some(vec![0, 2]));
        assert_eq!(options.epsilon, Some(1e-6));
        assert_eq!(options.predict, vec![vec![3.0, 1.0], vec![1.0, 0.0]]);
        assert!(options.fixed.is_none());
    }

    #[test]
    fn fixed_parameters_need_both_flags() {
        let err = parse_args(args(&["--data", "d.csv", "--bias", "1"])).unwrap_err();
        assert!(err.contains("--theta"));
        let options =
            parse_args(args(&["--data", "d.csv", "--bias", "1", "--theta", "0.5,-2"])).unwrap();
        let fixed = options.fixed.unwrap();
        assert_eq!(fixed.bias, 1.0);
        assert_eq!(fixed.theta, vec![0.5, -2.0]);
    }

    #[test]
    fn rejects_missing_values_and_zero_columns() {
        assert!(parse_args(args(&["--data"])).unwrap_err().contains("requires a value"));
        assert!(parse_args(args(&["--data", "d.csv", "--features", "0,1"])).is_err());
        assert!(parse_args(args(&["--data", "d.csv", "--seed", "x"])).is_err());
        assert!(parse_args(args(&["--holdout", "3"])).is_err());
    }

    #[test]
    fn holdout_and_predict_cannot_be_combined() {
        let err = parse_args(args(&[
            "--data",
            "d.csv",
            "--holdout",
            "1",
            "--predict",
            "2,2",
            "--bias",
            "0",
            "--theta",
            "0.5,0.5",
        ]))
        .unwrap_err();
        assert!(err.contains("mutually exclusive"));
        let options = parse_args(args(&["--data", "d.csv", "--holdout", "1"])).unwrap();
        assert_eq!(options.holdout, Some(1));
        assert!(options.predict.is_empty());
    }

    #[test]
    fn information_rows_print_last_cell_with_nine_decimals() {
        assert_eq!(
            format_information_row(&[1.0, 0.25, 0.123_456_789_9]),
            "1.0000, 0.2500, 0.123456790"
        );
        assert_eq!(format_information_row(&[2.0]), "2.000000000");
        assert_eq!(format_information_row(&[]), "");
    }
}
