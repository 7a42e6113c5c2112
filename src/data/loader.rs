// ============================================================
// Layer 4 — CSV Housing Loader
// ============================================================
// Loads the California-housing style table from a CSV file
// with a header row, e.g.
//
//   MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude,MedHouseVal
//   8.3252,41.0,6.98,1.02,322.0,2.55,37.88,-122.23,4.526
//   ...
//
// Target column: "MedHouseVal" if present, otherwise the last
// column. Every other column is a feature, in header order.
//
// The format is flat numeric CSV (no quoting of separators),
// so each line is split on ',' directly. Blank lines are
// skipped; any other malformed line is an error that names
// the file and line number.

use anyhow::{bail, Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::dataset::Dataset;
use crate::domain::traits::DatasetSource;

/// Default target column of the housing dataset
pub const TARGET_COLUMN: &str = "MedHouseVal";

/// Loads a numeric feature/target table from a CSV file.
/// Implements the DatasetSource trait from Layer 3.
pub struct CsvHousingLoader {
    path: PathBuf,
}

impl CsvHousingLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for CsvHousingLoader {
    fn load(&self) -> Result<Dataset> {
        let text = fs::read_to_string(&self.path).with_context(|| {
            format!(
                "Cannot read dataset '{}'. Place the housing CSV there or pass --synthetic-rows.",
                self.path.display()
            )
        })?;

        let dataset = parse_csv(&text)
            .with_context(|| format!("Malformed dataset '{}'", self.path.display()))?;

        tracing::info!(
            "Loaded {} rows x {} features from '{}'",
            dataset.len(),
            dataset.n_features(),
            self.path.display()
        );
        Ok(dataset)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Parse CSV text into a Dataset.
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        bail!("file is empty");
    };

    let columns: Vec<String> = header
        .split(',')
        .map(|c| c.trim().trim_matches('"').to_string())
        .collect();
    if columns.len() < 2 {
        bail!("need at least one feature column and one target column, got {}", columns.len());
    }

    let target_idx = columns
        .iter()
        .position(|c| c == TARGET_COLUMN)
        .unwrap_or(columns.len() - 1);

    let feature_names: Vec<String> = columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target_idx)
        .map(|(_, c)| c.clone())
        .collect();

    let mut rows    = Vec::new();
    let mut targets = Vec::new();

    for (line_no, line) in lines {
        // 1-based for humans
        let line_no = line_no + 1;

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != columns.len() {
            bail!(
                "line {line_no}: expected {} fields, found {}",
                columns.len(),
                fields.len()
            );
        }

        let mut row = Vec::with_capacity(feature_names.len());
        for (i, field) in fields.iter().enumerate() {
            let value: f64 = field.trim_matches('"').parse().with_context(|| {
                format!("line {line_no}: column '{}' is not a number: '{field}'", columns[i])
            })?;

            if i == target_idx {
                targets.push(value);
            } else {
                row.push(value);
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        bail!("no data rows after the header");
    }

    Ok(Dataset::new(feature_names, rows, targets)?)
}
