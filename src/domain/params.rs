// ============================================================
// Layer 3 — ParameterVector Domain Type
// ============================================================
// The flat parameter layout shared by the quantiser and the
// quantised predictor:
//
//   [ coef_0, coef_1, ..., coef_{n-1}, intercept ]
//
// Values are held as f32, the precision the codec works in.
// The intercept is always the LAST element; encode and decode
// both rely on that order.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    values: Vec<f32>,
}

impl ParameterVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Concatenate model coefficients and intercept into one vector.
    pub fn from_parts(coefficients: &[f64], intercept: f64) -> Self {
        let mut values: Vec<f32> = coefficients.iter().map(|&c| c as f32).collect();
        values.push(intercept as f32);
        Self { values }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Split back into (coefficients, intercept).
    pub fn split(&self) -> PipelineResult<(&[f32], f32)> {
        match self.values.split_last() {
            Some((intercept, coefficients)) => Ok((coefficients, *intercept)),
            None => Err(PipelineError::EmptyParameters),
        }
    }

    /// Largest elementwise |self - other|.
    pub fn max_abs_diff(&self, other: &ParameterVector) -> PipelineResult<f32> {
        if self.len() != other.len() {
            return Err(PipelineError::ShapeMismatch {
                what:     "parameter vector",
                got:      other.len(),
                expected: self.len(),
            });
        }
        Ok(self
            .values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max))
    }
}
