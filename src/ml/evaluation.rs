// ============================================================
// Layer 5 — Regression Metrics
// ============================================================
//   R²   = 1 - SS_res / SS_tot
//   RMSE = sqrt(mean((y_true - y_pred)²))
//
// Both require equal, non-empty inputs.

use crate::error::{PipelineError, PipelineResult};

fn check_lengths(y_true: &[f64], y_pred: &[f64]) -> PipelineResult<()> {
    if y_true.len() != y_pred.len() {
        return Err(PipelineError::ShapeMismatch {
            what:     "predictions",
            got:      y_pred.len(),
            expected: y_true.len(),
        });
    }
    if y_true.is_empty() {
        return Err(PipelineError::ShapeMismatch {
            what:     "evaluation rows",
            got:      0,
            expected: 1,
        });
    }
    Ok(())
}

/// Coefficient of determination.
///
/// A constant `y_true` has SS_tot = 0; the score is then 1.0 for a
/// perfect prediction and 0.0 otherwise.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> PipelineResult<f64> {
    check_lengths(y_true, y_pred)?;

    let mean   = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_tot: f64 = y_true.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(y, p)| (y - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Root-mean-squared error, in target units.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> PipelineResult<f64> {
    check_lengths(y_true, y_pred)?;

    let mse = y_true
        .iter()
        .zip(y_pred)
        .map(|(y, p)| (y - p).powi(2))
        .sum::<f64>()
        / y_true.len() as f64;
    Ok(mse.sqrt())
}

/// Round half away from zero to `decimals` places, for display.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn round_all(values: &[f64], decimals: i32) -> Vec<f64> {
    values.iter().map(|&v| round_to(v, decimals)).collect()
}
