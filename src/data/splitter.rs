// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles row indices with a SEEDED generator and splits them
// into two partitions:
//   - Test set:  the first ceil(n * test_fraction) shuffled rows
//   - Train set: the remaining rows
//
// The seed is what makes the held-out partition identical in
// `train`, `predict` and `predict-quant`: every stage calls this
// function with the same (dataset, fraction, seed) and gets the
// same rows back. Metrics from different stages are only
// comparable because of that.
//
// Fisher-Yates shuffle via rand::seq::SliceRandom over a
// StdRng seeded from a u64.
//
// Reference: rand crate documentation (SeedableRng)

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::domain::dataset::Dataset;
use crate::error::{PipelineError, PipelineResult};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// The two partitions plus the shuffled indices that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train:         Dataset,
    pub test:          Dataset,
    pub train_indices: Vec<usize>,
    pub test_indices:  Vec<usize>,
}

/// Shuffle 0..n with `seed` and cut it into (train, test) index lists.
///
/// # Arguments
/// * `n`             - Number of samples
/// * `test_fraction` - Proportion held out, strictly between 0 and 1
/// * `seed`          - RNG seed; equal seeds give equal splits
pub fn split_indices(
    n:             usize,
    test_fraction: f64,
    seed:          u64,
) -> PipelineResult<(Vec<usize>, Vec<usize>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::InvalidSplit {
            reason: format!("test fraction must be in (0, 1), got {test_fraction}"),
        });
    }

    let n_test  = ((n as f64) * test_fraction).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(PipelineError::InvalidSplit {
            reason: format!(
                "{n} samples with test fraction {test_fraction} leaves an empty partition"
            ),
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    // split_off(k) leaves [0..k) in `indices` and returns [k..n)
    let train = indices.split_off(n_test);
    let test  = indices;

    Ok((train, test))
}

/// Split a dataset into reproducible train and test partitions.
pub fn train_test_split(
    dataset:       &Dataset,
    test_fraction: f64,
    seed:          u64,
) -> PipelineResult<Split> {
    let (train_indices, test_indices) = split_indices(dataset.len(), test_fraction, seed)?;

    tracing::debug!(
        "Dataset split: {} train, {} test (seed {})",
        train_indices.len(),
        test_indices.len(),
        seed
    );

    Ok(Split {
        train: dataset.select(&train_indices),
        test:  dataset.select(&test_indices),
        train_indices,
        test_indices,
    })
}
