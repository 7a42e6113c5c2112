// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Full-precision predictions: reload the model and the training
// config, rebuild the held-out partition, and predict its first
// `rows` rows.

use anyhow::Result;

use crate::application::train_use_case::DEFAULT_ARTIFACTS_DIR;
use crate::domain::traits::Regressor;
use crate::error::PipelineError;
use crate::infra::artifacts::ArtifactStore;
use crate::ml::model::LinearModel;

pub const DEFAULT_PREDICT_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct PredictConfig {
    pub artifacts_dir: String,
    pub rows:          usize,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: DEFAULT_ARTIFACTS_DIR.to_string(),
            rows:          DEFAULT_PREDICT_ROWS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PredictReport {
    pub predictions: Vec<f64>,
    pub model:       LinearModel,
}

pub struct PredictUseCase {
    config: PredictConfig,
}

impl PredictUseCase {
    pub fn new(config: PredictConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PredictReport> {
        let store = ArtifactStore::new(&self.config.artifacts_dir)?;
        let model = store.load_model()?;
        let (split, source) = store.load_config()?.load_split()?;

        if split.test.n_features() != model.n_features() {
            return Err(PipelineError::ShapeMismatch {
                what:     "held-out features",
                got:      split.test.n_features(),
                expected: model.n_features(),
            }
            .into());
        }

        let batch       = split.test.head(self.config.rows);
        let predictions = model.predict(&batch.rows);
        tracing::info!(
            "Predicted {} of {} held-out rows from '{}'",
            predictions.len(),
            split.test.len(),
            source
        );

        Ok(PredictReport { predictions, model })
    }
}
