// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and their flags:
//
//   train          fit and evaluate the full-precision model
//   quantize       encode its parameters to 8-bit codes
//   predict        full-precision predictions on held-out rows
//   predict-quant  predictions from the quantised artifact
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{
    predict_quant_use_case::QuantPredictConfig,
    predict_use_case::PredictConfig,
    quantize_use_case::QuantizeConfig,
    train_use_case::TrainConfig,
};
use crate::data::source::{DataSourceConfig, DEFAULT_DATA_PATH};
use crate::ml::codec::{Scheme, SchemeKind, DEFAULT_MARGIN};

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit linear regression and report held-out R² / RMSE
    Train(TrainArgs),

    /// Quantise the trained parameters to 8-bit codes
    Quantize(QuantizeArgs),

    /// Predict held-out rows with the full-precision model
    Predict(PredictArgs),

    /// Predict the held-out rows from the quantised artifact
    PredictQuant(PredictQuantArgs),
}

/// Codec scheme as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeArg {
    /// One min/scale pair over the whole parameter vector
    Global,
    /// A ±margin window around each parameter
    PerParameter,
}

impl SchemeArg {
    fn with_margin(self, margin: f32) -> Scheme {
        match self {
            SchemeArg::Global       => Scheme::Global,
            SchemeArg::PerParameter => Scheme::PerParameter { margin },
        }
    }
}

impl From<SchemeArg> for SchemeKind {
    fn from(a: SchemeArg) -> Self {
        match a {
            SchemeArg::Global       => SchemeKind::Global,
            SchemeArg::PerParameter => SchemeKind::PerParameter,
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV file with a header row; target column MedHouseVal (or the last column)
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data_path: String,

    /// Generate this many synthetic housing rows instead of reading a CSV
    #[arg(long)]
    pub synthetic_rows: Option<usize>,

    /// Half-width of the uniform noise added to synthetic targets
    #[arg(long, default_value_t = 0.5)]
    pub synthetic_noise: f64,

    /// Seed for the train/test shuffle (and the synthetic generator)
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Where models, codes and metrics are written
    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        let source = match a.synthetic_rows {
            Some(rows) => DataSourceConfig::Synthetic { rows, seed: a.seed, noise: a.synthetic_noise },
            None       => DataSourceConfig::Csv { path: a.data_path },
        };
        TrainConfig {
            source,
            artifacts_dir: a.artifacts_dir,
            test_size:     a.test_size,
            seed:          a.seed,
        }
    }
}

/// All arguments for the `quantize` command
#[derive(Args, Debug)]
pub struct QuantizeArgs {
    #[arg(long, value_enum, default_value_t = SchemeArg::PerParameter)]
    pub scheme: SchemeArg,

    /// Half-width of each per-parameter window (ignored for global)
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: f32,

    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,
}

impl From<QuantizeArgs> for QuantizeConfig {
    fn from(a: QuantizeArgs) -> Self {
        QuantizeConfig {
            artifacts_dir: a.artifacts_dir,
            scheme:        a.scheme.with_margin(a.margin),
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// How many held-out rows to predict
    #[arg(long, default_value_t = 5)]
    pub rows: usize,

    /// Also print the model's coefficients and intercept
    #[arg(long)]
    pub show_params: bool,

    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,
}

impl From<&PredictArgs> for PredictConfig {
    fn from(a: &PredictArgs) -> Self {
        PredictConfig {
            artifacts_dir: a.artifacts_dir.clone(),
            rows:          a.rows,
        }
    }
}

/// All arguments for the `predict-quant` command
#[derive(Args, Debug)]
pub struct PredictQuantArgs {
    /// Which quantised artifact to read
    #[arg(long, value_enum, default_value_t = SchemeArg::PerParameter)]
    pub scheme: SchemeArg,

    #[arg(long, default_value = "artifacts")]
    pub artifacts_dir: String,
}

impl From<PredictQuantArgs> for QuantPredictConfig {
    fn from(a: PredictQuantArgs) -> Self {
        QuantPredictConfig {
            artifacts_dir: a.artifacts_dir,
            scheme:        a.scheme.into(),
        }
    }
}
