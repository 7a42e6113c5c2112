// ============================================================
// Layer 4 — Data Source Configuration
// ============================================================
// Records WHICH source a training run read from, so the
// quantised and full-precision predictors can rebuild the very
// same table, and therefore the very same held-out split.
//
// Persisted inside train_config.json, e.g.
//   { "kind": "csv", "path": "data/california_housing.csv" }
//   { "kind": "synthetic", "rows": 100, "seed": 42, "noise": 0.1 }

use serde::{Deserialize, Serialize};

use crate::data::{loader::CsvHousingLoader, synthetic::SyntheticHousing};
use crate::domain::traits::DatasetSource;

pub const DEFAULT_DATA_PATH: &str = "data/california_housing.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSourceConfig {
    Csv { path: String },
    Synthetic { rows: usize, seed: u64, noise: f64 },
}

impl DataSourceConfig {
    /// Instantiate the source this config describes.
    pub fn build(&self) -> Box<dyn DatasetSource> {
        match self {
            Self::Csv { path } => Box::new(CsvHousingLoader::new(path)),
            Self::Synthetic { rows, seed, noise } => {
                Box::new(SyntheticHousing::new(*rows, *seed, *noise))
            }
        }
    }
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self::Csv { path: DEFAULT_DATA_PATH.to_string() }
    }
}
