// ============================================================
// Layer 5 — Least-Squares Trainer
// ============================================================
// Closed-form ordinary least squares with an intercept:
//
//   1. centre features and target:  Xc = X - x̄,  yc = y - ȳ
//   2. solve  min ||Xc β - yc||²  with an SVD (nalgebra)
//   3. intercept = ȳ - x̄ · β
//
// Singular values below  max(σ) * max(n, p) * ε  are treated as
// zero, so collinear or constant columns give the minimum-norm
// solution instead of an error.
//
// Deterministic: the same training rows always give the same
// coefficients.

use nalgebra::{DMatrix, DVector};

use crate::domain::dataset::Dataset;
use crate::error::{PipelineError, PipelineResult};
use crate::ml::model::LinearModel;

/// Fit a linear model on `train`.
pub fn fit_least_squares(train: &Dataset) -> PipelineResult<LinearModel> {
    let n = train.len();
    let p = train.n_features();

    if train.is_empty() {
        return Err(PipelineError::Solve("no training rows".to_string()));
    }
    let all_finite = train.rows.iter().flatten().chain(&train.targets).all(|v| v.is_finite());
    if !all_finite {
        return Err(PipelineError::Solve("training data contains NaN or infinity".to_string()));
    }

    let x_mean: Vec<f64> = (0..p)
        .map(|j| train.rows.iter().map(|r| r[j]).sum::<f64>() / n as f64)
        .collect();
    let y_mean = train.targets.iter().sum::<f64>() / n as f64;

    let coefficients: Vec<f64> = if p == 0 {
        Vec::new()
    } else {
        let xc = DMatrix::from_fn(n, p, |i, j| train.rows[i][j] - x_mean[j]);
        let yc = DVector::from_fn(n, |i, _| train.targets[i] - y_mean);

        let svd = xc.svd(true, true);
        let eps = svd.singular_values.max() * (n.max(p) as f64) * f64::EPSILON;
        let beta = svd
            .solve(&yc, eps)
            .map_err(|e| PipelineError::Solve(e.to_string()))?;

        beta.iter().copied().collect()
    };

    let intercept = y_mean
        - x_mean
            .iter()
            .zip(&coefficients)
            .map(|(m, b)| m * b)
            .sum::<f64>();

    tracing::debug!("Fitted {} coefficients on {} rows", p, n);
    LinearModel::new(train.feature_names.clone(), coefficients, intercept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::{SyntheticHousing, TRUE_COEFS, TRUE_INTERCEPT};
    use crate::domain::traits::DatasetSource;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_exact_line() {
        // y = 2x + 1
        let rows = (0..10).map(|i| vec![i as f64]).collect();
        let ys   = (0..10).map(|i| 2.0 * i as f64 + 1.0).collect();
        let ds   = Dataset::new(vec!["x".into()], rows, ys).unwrap();

        let m = fit_least_squares(&ds).unwrap();
        assert_relative_eq!(m.coefficients[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(m.intercept, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_recovers_noiseless_synthetic_coefficients() {
        let ds = SyntheticHousing::new(200, 5, 0.0).load().unwrap();
        let m  = fit_least_squares(&ds).unwrap();

        for (got, want) in m.coefficients.iter().zip(TRUE_COEFS) {
            assert_relative_eq!(*got, want, epsilon = 1e-6);
        }
        assert_relative_eq!(m.intercept, TRUE_INTERCEPT, epsilon = 1e-5);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let ds = SyntheticHousing::new(100, 11, 0.1).load().unwrap();
        let a  = fit_least_squares(&ds).unwrap();
        let b  = fit_least_squares(&ds).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_constant_column_does_not_fail() {
        let rows = (0..6).map(|i| vec![i as f64, 3.0]).collect();
        let ys   = (0..6).map(|i| i as f64).collect();
        let ds   = Dataset::new(vec!["x".into(), "c".into()], rows, ys).unwrap();

        let m = fit_least_squares(&ds).unwrap();
        assert_relative_eq!(m.coefficients[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(m.coefficients[1], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        let empty = Dataset::new(vec!["x".into()], Vec::new(), Vec::new()).unwrap();
        assert!(fit_least_squares(&empty).is_err());

        let nan = Dataset::new(vec!["x".into()], vec![vec![f64::NAN]], vec![1.0]).unwrap();
        assert!(matches!(fit_least_squares(&nan), Err(PipelineError::Solve(_))));
    }
}
