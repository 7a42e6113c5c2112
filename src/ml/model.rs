// ============================================================
// Layer 5 — Linear Model
// ============================================================
// The trained model: one f64 coefficient per feature plus an
// intercept.
//
//   y_hat = Σ coefficients[i] * x_i + intercept
//
// Serialisable so the artifact store can write it as JSON.

use serde::{Deserialize, Serialize};

use crate::domain::params::ParameterVector;
use crate::domain::traits::Regressor;
use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Features the model was fitted on, in coefficient order
    pub feature_names: Vec<String>,
    pub coefficients:  Vec<f64>,
    pub intercept:     f64,
}

impl LinearModel {
    pub fn new(
        feature_names: Vec<String>,
        coefficients:  Vec<f64>,
        intercept:     f64,
    ) -> PipelineResult<Self> {
        if feature_names.len() != coefficients.len() {
            return Err(PipelineError::ShapeMismatch {
                what:     "model coefficients",
                got:      coefficients.len(),
                expected: feature_names.len(),
            });
        }
        Ok(Self { feature_names, coefficients, intercept })
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Flatten to [coefficients..., intercept] for the codec.
    pub fn parameters(&self) -> ParameterVector {
        ParameterVector::from_parts(&self.coefficients, self.intercept)
    }

    /// Rebuild a model from a (possibly decoded) parameter vector.
    pub fn from_parameters(
        feature_names: Vec<String>,
        params:        &ParameterVector,
    ) -> PipelineResult<Self> {
        let (coefs, intercept) = params.split()?;
        Self::new(
            feature_names,
            coefs.iter().map(|&c| c as f64).collect(),
            intercept as f64,
        )
    }
}

impl Regressor for LinearModel {
    fn predict_row(&self, row: &[f64]) -> f64 {
        row.iter()
            .zip(&self.coefficients)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.intercept
    }
}
