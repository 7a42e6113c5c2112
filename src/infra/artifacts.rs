// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores every file the pipeline hands from one
// stage to the next. All artifacts are pretty-printed JSON in a
// single directory:
//
//   artifacts/
//     linear_model.json    ← full-precision model      (train)
//     train_config.json    ← data source, seed, split  (train)
//     unquant_params.json  ← raw f32 parameters        (quantize)
//     quant_params.json    ← global-scheme artifact    (quantize --scheme global)
//     quant_model.json     ← per-parameter artifact    (quantize --scheme per-parameter)
//     metrics.csv          ← see metrics.rs
//
// Writes overwrite the file wholesale. Reads of a file that is
// not there fail with PipelineError::MissingArtifact so the user
// is told which stage to run first.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::error::PipelineError;
use crate::ml::codec::{QuantizedParams, SchemeKind};
use crate::ml::model::LinearModel;

pub const MODEL_FILE: &str = "linear_model.json";
pub const CONFIG_FILE: &str = "train_config.json";
pub const RAW_PARAMS_FILE: &str = "unquant_params.json";
pub const GLOBAL_QUANT_FILE: &str = "quant_params.json";
pub const PER_PARAMETER_QUANT_FILE: &str = "quant_model.json";

/// Unquantised parameters kept next to the quantised artifact
/// so the two can be compared offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParams {
    pub coefficients: Vec<f32>,
    pub intercept:    f32,
}

/// Reads and writes pipeline artifacts inside one directory.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open the store, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    // ── Full-precision model ─────────────────────────────────────────────────

    pub fn save_model(&self, model: &LinearModel) -> Result<PathBuf> {
        self.write_json(MODEL_FILE, model)
    }

    pub fn load_model(&self) -> Result<LinearModel> {
        let model: LinearModel = self.read_json(MODEL_FILE)?;
        tracing::info!(
            "Loaded model with {} coefficients from '{}'",
            model.n_features(),
            self.path_of(MODEL_FILE).display()
        );
        Ok(model)
    }

    // ── Training config ──────────────────────────────────────────────────────
    // Predictors rebuild the held-out split from this file.

    pub fn save_config(&self, cfg: &TrainConfig) -> Result<PathBuf> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE)
    }

    // ── Parameters ───────────────────────────────────────────────────────────

    pub fn save_raw_params(&self, raw: &RawParams) -> Result<PathBuf> {
        self.write_json(RAW_PARAMS_FILE, raw)
    }

    #[cfg(test)]
    pub fn load_raw_params(&self) -> Result<RawParams> {
        self.read_json(RAW_PARAMS_FILE)
    }

    /// Write a quantised artifact to the file owned by its scheme.
    pub fn save_quantized(&self, q: &QuantizedParams) -> Result<PathBuf> {
        self.write_json(quant_file_for(q.kind()), q)
    }

    /// Read the artifact written for `kind`.
    ///
    /// Fails with SchemaMismatch if the file holds the other scheme's
    /// layout or is not a quantised artifact at all.
    pub fn load_quantized(&self, kind: SchemeKind) -> Result<QuantizedParams> {
        let file = quant_file_for(kind);
        let path = self.existing(file)?;

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        let q: QuantizedParams = serde_json::from_str(&json).map_err(|e| {
            PipelineError::SchemaMismatch {
                expected: format!("{} artifact", kind.name()),
                found:    format!("unreadable layout in '{}': {e}", path.display()),
            }
        })?;

        if q.kind() != kind {
            return Err(PipelineError::SchemaMismatch {
                expected: format!("{} artifact", kind.name()),
                found:    format!("{} artifact in '{}'", q.scheme_name(), path.display()),
            }
            .into());
        }

        tracing::debug!("Loaded {} codes from '{}'", q.len(), path.display());
        Ok(q)
    }

    // ── JSON helpers ─────────────────────────────────────────────────────────

    fn existing(&self, file: &str) -> Result<PathBuf> {
        let path = self.path_of(file);
        if !path.exists() {
            return Err(PipelineError::MissingArtifact { path }.into());
        }
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<PathBuf> {
        let path = self.path_of(file);
        let json = serde_json::to_string_pretty(value)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        tracing::debug!("Saved '{}'", path.display());
        Ok(path)
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.existing(file)?;

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Cannot parse '{}'", path.display()))
    }
}

/// Artifact file name used by a codec scheme.
pub fn quant_file_for(kind: SchemeKind) -> &'static str {
    match kind {
        SchemeKind::Global => GLOBAL_QUANT_FILE,
        SchemeKind::PerParameter => PER_PARAMETER_QUANT_FILE,
    }
}
