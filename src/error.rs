// ============================================================
// Typed pipeline errors
// ============================================================
// The failure kinds the pipeline can name explicitly.
// Application code wraps these in anyhow with file context;
// tests match on them with `downcast_ref::<PipelineError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// An artifact the current stage depends on is not on disk.
    #[error("artifact '{}' not found; run the stage that produces it first", path.display())]
    MissingArtifact { path: PathBuf },

    /// The quantisation range cannot be expressed as a finite affine map.
    #[error("degenerate quantisation scale: {reason}")]
    DegenerateScale { reason: String },

    /// An artifact was produced by a different codec scheme or layout.
    #[error("schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("parameter vector is empty")]
    EmptyParameters,

    #[error("invalid train/test split: {reason}")]
    InvalidSplit { reason: String },

    #[error("shape mismatch in {what}: got {got}, expected {expected}")]
    ShapeMismatch {
        what:     &'static str,
        got:      usize,
        expected: usize,
    },

    #[error("least-squares solve failed: {0}")]
    Solve(String),
}

/// Result alias for the lower layers (domain, data, ml).
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
