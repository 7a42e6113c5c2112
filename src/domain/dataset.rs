// ============================================================
// Layer 3 — Dataset Domain Type
// ============================================================
// A tabular regression dataset: one row of feature values per
// sample plus one target value per sample.
//
// Rows are stored row-major as Vec<Vec<f64>> so a single sample
// can be handed to a regressor as a plain slice.
//
// Invariants (checked in Dataset::new):
//   - every row has exactly feature_names.len() values
//   - rows.len() == targets.len()

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Column names in the order the values appear in each row
    pub feature_names: Vec<String>,

    /// Feature values, one Vec per sample
    pub rows: Vec<Vec<f64>>,

    /// Target value for each sample
    pub targets: Vec<f64>,
}

impl Dataset {
    /// Build a dataset, validating that rows and targets line up.
    pub fn new(
        feature_names: Vec<String>,
        rows:          Vec<Vec<f64>>,
        targets:       Vec<f64>,
    ) -> PipelineResult<Self> {
        if rows.len() != targets.len() {
            return Err(PipelineError::ShapeMismatch {
                what:     "dataset targets",
                got:      targets.len(),
                expected: rows.len(),
            });
        }

        let width = feature_names.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != width) {
            return Err(PipelineError::ShapeMismatch {
                what:     "dataset row width",
                got:      bad.len(),
                expected: width,
            });
        }

        Ok(Self { feature_names, rows, targets })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Copy out the samples at `indices`, in that order.
    /// Indices must be in range; callers derive them from `len()`.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            rows:          indices.iter().map(|&i| self.rows[i].clone()).collect(),
            targets:       indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }

    /// The first `n` samples (or fewer if the dataset is shorter).
    pub fn head(&self, n: usize) -> Dataset {
        let n = n.min(self.len());
        let indices: Vec<usize> = (0..n).collect();
        self.select(&indices)
    }
}
