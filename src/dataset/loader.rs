//! Comma-delimited table loader.
//!
//! Files carry one header line followed by rows of the form
//! `label,feature_1,..,feature_d`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{DataError, TrainingTable};

/// Load a training table from a CSV file on disk.
pub fn load_table(path: &Path) -> Result<TrainingTable, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(BufReader::new(file)).map_err(|err| match err {
        DataError::Io { source, .. } => DataError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    tracing::debug!(
        "Loaded {} rows with {} features from {}",
        table.len(),
        table.feature_len(),
        path.display()
    );
    Ok(table)
}

/// Parse a CSV stream, skipping the header line and blank lines.
pub fn parse_table<R: BufRead>(reader: R) -> Result<TrainingTable, DataError> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line.map_err(|source| DataError::Io {
            path: Default::default(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_row(&line, idx + 1)?);
    }
    TrainingTable::from_rows(&rows)
}

fn parse_row(line: &str, line_no: usize) -> Result<Vec<f64>, DataError> {
    line.split(',')
        .enumerate()
        .map(|(column, cell)| {
            let text = cell.trim();
            text.parse::<f64>().map_err(|_| DataError::ParseNumber {
                line: line_no,
                column: column + 1,
                text: text.to_string(),
            })
        })
        .collect()
}
