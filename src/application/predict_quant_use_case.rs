// ============================================================
// Layer 2 — QuantPredictUseCase
// ============================================================
// Predicts the whole held-out partition from the quantised
// artifact alone; the full-precision model is never read.
//
//   Step 1: Load the artifact for the requested scheme  (Layer 6)
//   Step 2: Decode to a ParameterVector                 (Layer 5)
//   Step 3: Rebuild the held-out split                  (Layer 4)
//   Step 4: Rebuild a LinearModel, X · coefs + b        (Layer 5)
//   Step 5: R² / RMSE against the true targets          (Layer 5)
//   Step 6: Append metrics row                          (Layer 6)

use anyhow::{Context, Result};

use crate::application::train_use_case::DEFAULT_ARTIFACTS_DIR;
use crate::domain::traits::Regressor;
use crate::infra::{
    artifacts::ArtifactStore,
    metrics::{MetricsLogger, RunMetrics},
};
use crate::ml::{
    codec::{decode, SchemeKind},
    evaluation::{r2_score, rmse},
    model::LinearModel,
};

#[derive(Debug, Clone, PartialEq)]
pub struct QuantPredictConfig {
    pub artifacts_dir: String,
    /// Which artifact to read; its encode settings are stored inside it
    pub scheme:        SchemeKind,
}

impl Default for QuantPredictConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: DEFAULT_ARTIFACTS_DIR.to_string(),
            scheme:        SchemeKind::PerParameter,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuantPredictReport {
    /// One prediction per held-out row, in split order
    pub predictions:  Vec<f64>,
    pub coefficients: Vec<f32>,
    pub intercept:    f32,
    pub r2:           f64,
    pub rmse:         f64,
    pub test_indices: Vec<usize>,
}

pub struct QuantPredictUseCase {
    config: QuantPredictConfig,
}

impl QuantPredictUseCase {
    pub fn new(config: QuantPredictConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<QuantPredictReport> {
        let store  = ArtifactStore::new(&self.config.artifacts_dir)?;
        let scheme = self.config.scheme;

        // ── Step 1 + 2: Load and decode ──────────────────────────────────────
        let params = decode(&store.load_quantized(scheme)?)?;

        // ── Step 3: Same split the trainer evaluated on ──────────────────────
        let (split, source) = store.load_config()?.load_split()?;

        // ── Step 4: Predict ──────────────────────────────────────────────────
        // from_parameters rejects a vector that is not n_features + 1 long
        let model = LinearModel::from_parameters(split.test.feature_names.clone(), &params)
            .with_context(|| format!("Quantised {} artifact does not fit the data", scheme.name()))?;
        let predictions = model.predict(&split.test.rows);

        // ── Step 5: Evaluate ─────────────────────────────────────────────────
        let r2   = r2_score(&split.test.targets, &predictions)?;
        let rmse = rmse(&split.test.targets, &predictions)?;
        tracing::info!("Quantised ({}) R² = {:.4}, RMSE = {:.4}", scheme.name(), r2, rmse);

        // ── Step 6: Metrics ──────────────────────────────────────────────────
        MetricsLogger::new(store.dir())?.log(&RunMetrics::new(
            "predict-quant",
            scheme.name(),
            source,
            split.test.len(),
            r2,
            rmse,
        ))?;

        Ok(QuantPredictReport {
            predictions,
            coefficients: model.coefficients.iter().map(|&c| c as f32).collect(),
            intercept:    model.intercept as f32,
            r2,
            rmse,
            test_indices: split.test_indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::quantize_use_case::{QuantizeConfig, QuantizeUseCase};
    use crate::application::test_support::trained;
    use crate::application::train_use_case::TrainUseCase;
    use crate::domain::params::ParameterVector;
    use crate::error::PipelineError;
    use crate::infra::artifacts::{GLOBAL_QUANT_FILE, PER_PARAMETER_QUANT_FILE};
    use crate::ml::codec::{encode, Scheme, CODE_LEVELS};

    fn dir_string(dir: &std::path::Path) -> String {
        dir.to_string_lossy().into_owned()
    }

    fn quantize(dir: &std::path::Path, scheme: Scheme) {
        QuantizeUseCase::new(QuantizeConfig { artifacts_dir: dir_string(dir), scheme })
            .execute()
            .unwrap();
    }

    fn predict_quant(dir: &std::path::Path, scheme: SchemeKind) -> Result<QuantPredictReport> {
        QuantPredictUseCase::new(QuantPredictConfig { artifacts_dir: dir_string(dir), scheme })
            .execute()
    }

    #[test]
    fn test_per_parameter_pipeline_keeps_accuracy() {
        let tmp = tempfile::tempdir().unwrap();
        trained(tmp.path());
        quantize(tmp.path(), Scheme::per_parameter());

        let report = predict_quant(tmp.path(), SchemeKind::PerParameter).unwrap();
        assert_eq!(report.predictions.len(), 20);
        assert_eq!(report.coefficients.len(), 8);
        assert!(report.r2 > 0.5, "R² too low: {}", report.r2);
    }

    #[test]
    fn test_held_out_rows_match_training_split() {
        let tmp   = tempfile::tempdir().unwrap();
        let cfg   = trained(tmp.path());
        let train = TrainUseCase::new(cfg).execute().unwrap();
        quantize(tmp.path(), Scheme::Global);

        let report = predict_quant(tmp.path(), SchemeKind::Global).unwrap();
        assert_eq!(report.test_indices, train.test_indices);
    }

    #[test]
    fn test_quantised_predictions_within_error_bound() {
        let tmp   = tempfile::tempdir().unwrap();
        let cfg   = trained(tmp.path());
        let store = ArtifactStore::new(tmp.path()).unwrap();
        let model = store.load_model().unwrap();
        let (split, _) = cfg.load_split().unwrap();
        let full  = model.predict(&split.test.rows);

        for scheme in [Scheme::Global, Scheme::per_parameter()] {
            quantize(tmp.path(), scheme);
            let bounds = store.load_quantized(scheme.kind()).unwrap().error_bounds();
            let report = predict_quant(tmp.path(), scheme.kind()).unwrap();

            // f32 storage of the original parameters adds its own rounding
            let slack = 5e-5;
            let (coef_bounds, intercept_bound) = bounds.split_at(bounds.len() - 1);

            for ((row, q), f) in split.test.rows.iter().zip(&report.predictions).zip(&full) {
                let tol: f64 = row
                    .iter()
                    .zip(coef_bounds)
                    .map(|(x, &e)| x.abs() * (e as f64 + slack))
                    .sum::<f64>()
                    + intercept_bound[0] as f64
                    + slack;
                let drift = (q - f).abs();
                assert!(drift <= tol * (1.0 + 1e-6) + 1e-9, "{}: {drift} > {tol}", scheme.name());
            }
        }
    }

    #[test]
    fn test_margin_is_read_from_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        trained(tmp.path());
        let margin = 0.2;
        quantize(tmp.path(), Scheme::PerParameter { margin });

        let store    = ArtifactStore::new(tmp.path()).unwrap();
        let original = store.load_model().unwrap().parameters();
        let report   = predict_quant(tmp.path(), SchemeKind::PerParameter).unwrap();

        let (coefs, intercept) = original.split().unwrap();
        let bound = margin / CODE_LEVELS + 1e-4;
        for (a, b) in coefs.iter().zip(&report.coefficients) {
            assert!((a - b).abs() <= bound, "{a} vs {b}");
        }
        assert!((intercept - report.intercept).abs() <= bound);
    }

    #[test]
    fn test_wrong_parameter_count_is_shape_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        trained(tmp.path());

        // three parameters for an eight-feature table
        let store = ArtifactStore::new(tmp.path()).unwrap();
        let short = encode(&ParameterVector::new(vec![0.1, 0.2, 0.3]), Scheme::Global).unwrap();
        store.save_quantized(&short).unwrap();

        let err = predict_quant(tmp.path(), SchemeKind::Global).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::ShapeMismatch { got: 2, expected: 8, .. })
        ));
    }

    #[test]
    fn test_scheme_mismatch_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        trained(tmp.path());
        quantize(tmp.path(), Scheme::per_parameter());

        // a per-parameter layout where the global artifact should be
        std::fs::copy(
            tmp.path().join(PER_PARAMETER_QUANT_FILE),
            tmp.path().join(GLOBAL_QUANT_FILE),
        )
        .unwrap();

        let err = predict_quant(tmp.path(), SchemeKind::Global).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_artifact_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        trained(tmp.path());

        let err = predict_quant(tmp.path(), SchemeKind::Global).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingArtifact { .. })
        ));
    }
}
