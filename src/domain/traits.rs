// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer programs against these traits, so a
// CSV file and a synthetic generator are interchangeable as
// data sources.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::dataset::Dataset;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Any component that can produce the feature/target table.
///
/// Implementations:
///   - CsvHousingLoader → reads a headered CSV file
///   - SyntheticHousing → seeded linear data for tests and demos
pub trait DatasetSource {
    /// Load the full dataset (before any train/test split).
    fn load(&self) -> Result<Dataset>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

// ─── Regressor ────────────────────────────────────────────────────────────────
/// Anything that maps one feature row to a predicted target.
///
/// Implemented by LinearModel, whether fitted directly or rebuilt
/// from decoded parameters.
pub trait Regressor {
    fn predict_row(&self, row: &[f64]) -> f64;

    /// Predict every row in order.
    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }
}
