// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one row per evaluation to a CSV file, so the
// full-precision and quantised scores of successive runs can be
// compared side by side.
//
// Output file: artifacts/metrics.csv
//
//   stage,scheme,source,rows,r2,rmse
//   train,full,synthetic:100rows/seed42,20,0.998101,0.058214
//   predict-quant,global,synthetic:100rows/seed42,20,0.412003,0.791530
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "stage,scheme,source,rows,r2,rmse";

/// One evaluation on the held-out partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Pipeline stage that produced the numbers (train, predict-quant)
    pub stage: String,

    /// "full" for f64 parameters, otherwise the codec scheme
    pub scheme: String,

    /// DatasetSource::describe() of the data used
    pub source: String,

    /// Number of held-out rows evaluated
    pub rows: usize,

    pub r2:   f64,
    pub rmse: f64,
}

impl RunMetrics {
    pub fn new(
        stage:  impl Into<String>,
        scheme: impl Into<String>,
        source: impl Into<String>,
        rows:   usize,
        r2:     f64,
        rmse:   f64,
    ) -> Self {
        Self {
            stage:  stage.into(),
            scheme: scheme.into(),
            source: source.into(),
            rows,
            r2,
            rmse,
        }
    }
}

/// Logs evaluation metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let csv_path = dir.join("metrics.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one row. Commas in the source description are
    /// replaced so the row keeps six columns.
    pub fn log(&self, m: &RunMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{},{:.6},{:.6}",
            m.stage,
            m.scheme,
            m.source.replace(',', ";"),
            m.rows,
            m.r2,
            m.rmse,
        )?;

        tracing::debug!(
            "Logged {} metrics: r2={:.4}, rmse={:.4}",
            m.stage,
            m.r2,
            m.rmse,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
