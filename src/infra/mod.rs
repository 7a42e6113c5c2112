// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system concerns shared by every stage:
//
//   artifacts.rs — JSON persistence of the model, the training
//                  config, the raw parameters and both quantised
//                  artifact layouts; typed MissingArtifact and
//                  SchemaMismatch failures on read.
//
//   metrics.rs   — appends R² / RMSE of each evaluation to a
//                  CSV file.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Artifact directory reads and writes
pub mod artifacts;

/// Evaluation metrics CSV logger
pub mod metrics;
