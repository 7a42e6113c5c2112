// ============================================================
// Layer 4 — Synthetic Housing Generator
// ============================================================
// Produces a seeded table shaped like the housing dataset:
// 8 features drawn uniformly from realistic ranges, and
//
//   target = Σ TRUE_COEFS[i] * x_i + TRUE_INTERCEPT + u,   u ~ U(-noise, noise)
//
// The same (rows, seed, noise) triple always yields the same
// table, so a synthetic run can be split and re-split exactly
// like a CSV run.

use anyhow::{ensure, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::dataset::Dataset;
use crate::domain::traits::DatasetSource;

/// Column names matching the housing CSV layout
pub const FEATURE_NAMES: [&str; 8] = [
    "MedInc", "HouseAge", "AveRooms", "AveBedrms",
    "Population", "AveOccup", "Latitude", "Longitude",
];

/// Sampling range [low, high) for each feature
const FEATURE_RANGES: [(f64, f64); 8] = [
    (0.5, 15.0),
    (1.0, 52.0),
    (2.0, 10.0),
    (0.8, 2.0),
    (100.0, 5000.0),
    (1.0, 6.0),
    (32.5, 42.0),
    (-124.3, -114.3),
];

/// Generating coefficients, in FEATURE_NAMES order
pub const TRUE_COEFS: [f64; 8] = [0.44, 0.0097, -0.12, 0.78, -0.000002, -0.0035, -0.42, -0.43];

pub const TRUE_INTERCEPT: f64 = -37.0;

#[derive(Debug, Clone)]
pub struct SyntheticHousing {
    rows:  usize,
    seed:  u64,
    noise: f64,
}

impl SyntheticHousing {
    pub fn new(rows: usize, seed: u64, noise: f64) -> Self {
        Self { rows, seed, noise }
    }
}

impl DatasetSource for SyntheticHousing {
    fn load(&self) -> Result<Dataset> {
        ensure!(self.rows > 0, "synthetic dataset needs at least one row");
        ensure!(
            self.noise.is_finite() && self.noise >= 0.0,
            "synthetic noise must be finite and non-negative, got {}",
            self.noise
        );

        let mut rng     = StdRng::seed_from_u64(self.seed);
        let mut rows    = Vec::with_capacity(self.rows);
        let mut targets = Vec::with_capacity(self.rows);

        for _ in 0..self.rows {
            let row: Vec<f64> = FEATURE_RANGES
                .iter()
                .map(|&(lo, hi)| rng.gen_range(lo..hi))
                .collect();

            let signal: f64 = row.iter().zip(TRUE_COEFS).map(|(x, w)| x * w).sum();
            let noise = if self.noise > 0.0 {
                rng.gen_range(-self.noise..self.noise)
            } else {
                0.0
            };

            targets.push(signal + TRUE_INTERCEPT + noise);
            rows.push(row);
        }

        let names = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        tracing::debug!("Generated {} synthetic rows (seed {})", self.rows, self.seed);
        Ok(Dataset::new(names, rows, targets)?)
    }

    fn describe(&self) -> String {
        format!("synthetic:{}rows/seed{}", self.rows, self.seed)
    }
}
