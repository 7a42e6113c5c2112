// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the training pipeline in order:
//
//   Step 1: Load the dataset            (Layer 4 - data)
//   Step 2: Seeded 80/20 split          (Layer 4 - data)
//   Step 3: Least-squares fit           (Layer 5 - ml)
//   Step 4: R² / RMSE on held-out rows  (Layer 5 - ml)
//   Step 5: Save config + model         (Layer 6 - infra)
//   Step 6: Append metrics row          (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    source::DataSourceConfig,
    splitter::{train_test_split, Split, DEFAULT_SEED, DEFAULT_TEST_SIZE},
};
use crate::domain::traits::Regressor;
use crate::infra::{
    artifacts::ArtifactStore,
    metrics::{MetricsLogger, RunMetrics},
};
use crate::ml::{
    evaluation::{r2_score, rmse},
    model::LinearModel,
    trainer::fit_least_squares,
};

pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

// ─── Training Configuration ──────────────────────────────────────────────────
// Persisted to train_config.json so the predictors can rebuild the
// exact same held-out partition (same source, fraction and seed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub source:        DataSourceConfig,
    pub artifacts_dir: String,
    pub test_size:     f64,
    pub seed:          u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            source:        DataSourceConfig::default(),
            artifacts_dir: DEFAULT_ARTIFACTS_DIR.to_string(),
            test_size:     DEFAULT_TEST_SIZE,
            seed:          DEFAULT_SEED,
        }
    }
}

impl TrainConfig {
    /// Load the configured dataset and split it.
    /// Returns the split and a description of the source for logging.
    pub fn load_split(&self) -> Result<(Split, String)> {
        let source  = self.source.build();
        let dataset = source.load()?;
        let split   = train_test_split(&dataset, self.test_size, self.seed)
            .with_context(|| format!("Cannot split '{}'", source.describe()))?;
        Ok((split, source.describe()))
    }
}

/// What a training run produced.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub model:        LinearModel,
    pub r2:           f64,
    pub rmse:         f64,
    pub test_indices: Vec<usize>,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;

        // ── Step 1 + 2: Load and split ───────────────────────────────────────
        let (split, source) = cfg.load_split()?;
        tracing::info!(
            "Split '{}': {} train, {} test",
            source,
            split.train.len(),
            split.test.len()
        );

        // ── Step 3: Fit ──────────────────────────────────────────────────────
        let model = fit_least_squares(&split.train)?;

        // ── Step 4: Evaluate on the held-out partition ───────────────────────
        let preds = model.predict(&split.test.rows);
        let r2    = r2_score(&split.test.targets, &preds)?;
        let rmse  = rmse(&split.test.targets, &preds)?;
        tracing::info!("Held-out R² = {:.4}, RMSE = {:.4}", r2, rmse);

        // ── Step 5: Persist ──────────────────────────────────────────────────
        let store = ArtifactStore::new(&cfg.artifacts_dir)?;
        store.save_config(cfg)?;
        let path = store.save_model(&model)?;
        tracing::info!("Model saved to '{}'", path.display());

        // ── Step 6: Metrics ──────────────────────────────────────────────────
        let metrics = MetricsLogger::new(store.dir())?;
        metrics.log(&RunMetrics::new(
            "train",
            "full",
            source,
            split.test.len(),
            r2,
            rmse,
        ))?;
        tracing::info!("Metrics appended to '{}'", metrics.csv_path().display());

        Ok(TrainReport {
            model,
            r2,
            rmse,
            test_indices: split.test_indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::synthetic_config;
    use crate::infra::artifacts::MODEL_FILE;

    #[test]
    fn test_train_on_synthetic_scores_well() {
        let tmp    = tempfile::tempdir().unwrap();
        let report = TrainUseCase::new(synthetic_config(tmp.path())).execute().unwrap();

        assert!(report.r2 > 0.5, "R² too low: {}", report.r2);
        assert_eq!(report.model.n_features(), 8);
        assert_eq!(report.test_indices.len(), 20);
        assert!(tmp.path().join(MODEL_FILE).exists());
        assert!(tmp.path().join("metrics.csv").exists());
    }

    #[test]
    fn test_two_runs_are_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = synthetic_config(tmp.path());

        let a = TrainUseCase::new(cfg.clone()).execute().unwrap();
        let b = TrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(a.model, b.model);
        assert_eq!(a.test_indices, b.test_indices);
        assert_eq!(a.r2, b.r2);
    }

    #[test]
    fn test_config_is_persisted() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = synthetic_config(tmp.path());
        TrainUseCase::new(cfg.clone()).execute().unwrap();

        let store = ArtifactStore::new(tmp.path()).unwrap();
        assert_eq!(store.load_config().unwrap(), cfg);
    }

    #[test]
    fn test_missing_csv_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TrainConfig {
            source:        DataSourceConfig::Csv { path: "nope/missing.csv".into() },
            artifacts_dir: tmp.path().to_string_lossy().into_owned(),
            ..TrainConfig::default()
        };
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
