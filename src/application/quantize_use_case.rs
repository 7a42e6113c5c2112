// ============================================================
// Layer 2 — QuantizeUseCase
// ============================================================
// Loads the trained model and compresses its parameters:
//
//   Step 1: Load linear_model.json                (Layer 6)
//   Step 2: Flatten to [coefs..., intercept]      (Layer 3)
//   Step 3: Save the raw f32 parameters           (Layer 6)
//   Step 4: Encode with the chosen scheme         (Layer 5)
//   Step 5: Decode once to measure the max error  (Layer 5)
//   Step 6: Save the quantised artifact           (Layer 6)

use anyhow::Result;
use std::path::PathBuf;

use crate::application::train_use_case::DEFAULT_ARTIFACTS_DIR;
use crate::domain::params::ParameterVector;
use crate::infra::artifacts::{ArtifactStore, RawParams};
use crate::ml::codec::{decode, encode, QuantizedParams, Scheme};

#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeConfig {
    pub artifacts_dir: String,
    pub scheme:        Scheme,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: DEFAULT_ARTIFACTS_DIR.to_string(),
            scheme:        Scheme::per_parameter(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuantizeReport {
    /// Parameters before encoding (f32, intercept last)
    pub original:      ParameterVector,
    pub quantized:     QuantizedParams,
    /// Largest |original - decode(quantized)| over all parameters
    pub max_error:     f32,
    pub artifact_path: PathBuf,
}

pub struct QuantizeUseCase {
    config: QuantizeConfig,
}

impl QuantizeUseCase {
    pub fn new(config: QuantizeConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<QuantizeReport> {
        let store = ArtifactStore::new(&self.config.artifacts_dir)?;
        let model = store.load_model()?;

        let original = model.parameters();
        let (coefs, intercept) = original.split()?;
        tracing::info!("Original coefficients: {:?}", coefs);
        tracing::info!("Original intercept: {}", intercept);

        store.save_raw_params(&RawParams {
            coefficients: coefs.to_vec(),
            intercept,
        })?;

        tracing::debug!(
            "Encoding {} parameters with the {} scheme",
            original.len(),
            self.config.scheme.name()
        );
        let quantized = encode(&original, self.config.scheme)?;
        let max_error = original.max_abs_diff(&decode(&quantized)?)?;

        let artifact_path = store.save_quantized(&quantized)?;
        tracing::info!(
            "Quantised {} parameters ({}) to '{}', max error {:.6}",
            quantized.len(),
            quantized.scheme_name(),
            artifact_path.display(),
            max_error
        );

        Ok(QuantizeReport { original, quantized, max_error, artifact_path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::trained;
    use crate::error::PipelineError;
    use crate::infra::artifacts::{GLOBAL_QUANT_FILE, PER_PARAMETER_QUANT_FILE};
    use crate::ml::codec::{CODE_LEVELS, DEFAULT_MARGIN};

    fn quantize(dir: &std::path::Path, scheme: Scheme) -> Result<QuantizeReport> {
        QuantizeUseCase::new(QuantizeConfig {
            artifacts_dir: dir.to_string_lossy().into_owned(),
            scheme,
        })
        .execute()
    }

    #[test]
    fn test_per_parameter_error_within_margin() {
        let tmp = tempfile::tempdir().unwrap();
        trained(tmp.path());

        let report = quantize(tmp.path(), Scheme::per_parameter()).unwrap();
        assert_eq!(report.quantized.len(), 9);
        assert!(report.artifact_path.ends_with(PER_PARAMETER_QUANT_FILE));
        assert!(report.max_error <= DEFAULT_MARGIN / CODE_LEVELS + 1e-4);
    }

    #[test]
    fn test_global_error_within_half_step() {
        let tmp = tempfile::tempdir().unwrap();
        trained(tmp.path());

        let report = quantize(tmp.path(), Scheme::Global).unwrap();
        assert!(report.artifact_path.ends_with(GLOBAL_QUANT_FILE));

        let bound = report.quantized.error_bounds()[0];
        assert!(report.max_error <= bound + 1e-4, "{} > {}", report.max_error, bound);
    }

    #[test]
    fn test_raw_params_written() {
        let tmp = tempfile::tempdir().unwrap();
        trained(tmp.path());
        let report = quantize(tmp.path(), Scheme::Global).unwrap();

        let raw = ArtifactStore::new(tmp.path()).unwrap().load_raw_params().unwrap();
        let (coefs, intercept) = report.original.split().unwrap();
        assert_eq!(raw.coefficients, coefs);
        assert_eq!(raw.intercept, intercept);
    }

    #[test]
    fn test_without_model_is_missing_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let err = quantize(tmp.path(), Scheme::Global).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingArtifact { .. })
        ));
    }
}
