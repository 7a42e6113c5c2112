// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All numeric code lives here; nalgebra is imported by the
// trainer only.
//
//   model.rs      — LinearModel: coefficients + intercept,
//                   implements Regressor
//
//   trainer.rs    — closed-form least squares (centred SVD
//                   solve) producing a LinearModel
//
//   evaluation.rs — R², RMSE and display rounding
//
//   codec.rs      — 8-bit affine quantisation of a parameter
//                   vector, global or per-parameter scheme
//
// Reference: nalgebra documentation (SVD::solve)

/// Linear regression model
pub mod model;

/// Least-squares fitting
pub mod trainer;

/// Regression metrics
pub mod evaluation;

/// Parameter quantise / dequantise
pub mod codec;
