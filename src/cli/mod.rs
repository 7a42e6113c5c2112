// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application);
// this layer only routes and prints.
//
// Four commands are supported, meant to be run in order:
//   1. `train`          — fit + evaluate, writes linear_model.json
//   2. `quantize`       — writes the 8-bit artifact
//   3. `predict`        — full-precision sample predictions
//   4. `predict-quant`  — predictions from the 8-bit artifact
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, PredictQuantArgs, QuantizeArgs, TrainArgs};

use crate::ml::evaluation::{round_all, round_to};

/// Number of predictions echoed by `predict-quant`
const SHOWN_PREDICTIONS: usize = 5;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "housing-quant",
    version = "0.1.0",
    about = "Train linear regression on housing data, quantise its parameters to 8 bits, and predict from either."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)        => run_train(args),
            Commands::Quantize(args)     => run_quantize(args),
            Commands::Predict(args)      => run_predict(args),
            Commands::PredictQuant(args) => run_predict_quant(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Training with artifacts in: {}", args.artifacts_dir);

    let report = TrainUseCase::new(args.into()).execute()?;
    tracing::info!(
        "Fitted {} coefficients, evaluated on {} held-out rows",
        report.model.n_features(),
        report.test_indices.len()
    );
    println!("R²: {:.4} | RMSE: {:.4}", report.r2, report.rmse);
    Ok(())
}

fn run_quantize(args: QuantizeArgs) -> Result<()> {
    use crate::application::quantize_use_case::QuantizeUseCase;

    let report = QuantizeUseCase::new(args.into()).execute()?;
    let (coefs, intercept) = report.original.split()?;

    println!("Original coefficients: {:?}", coefs);
    println!("Original intercept: {}", intercept);
    println!(
        "Quantised ({}) → {}",
        report.quantized.scheme_name(),
        report.artifact_path.display()
    );
    println!("Worst-case error per parameter: {:?}", report.quantized.error_bounds());
    println!("Max reconstruction error: {:.6}", report.max_error);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let report = PredictUseCase::new((&args).into()).execute()?;

    println!("Sample predictions: {:?}", round_all(&report.predictions, 3));
    if args.show_params {
        println!("Coefficients: {:?}", report.model.coefficients);
        println!("Intercept: {}", report.model.intercept);
    }
    Ok(())
}

fn run_predict_quant(args: PredictQuantArgs) -> Result<()> {
    use crate::application::predict_quant_use_case::QuantPredictUseCase;

    let report = QuantPredictUseCase::new(args.into()).execute()?;
    tracing::info!("Scored {} held-out rows", report.test_indices.len());

    let shown = report.predictions.len().min(SHOWN_PREDICTIONS);
    let coefs: Vec<f64> = report
        .coefficients
        .iter()
        .map(|&c| round_to(c as f64, 4))
        .collect();

    println!(
        "Quantised predictions (first {shown}): {:?}",
        round_all(&report.predictions[..shown], 3)
    );
    println!("Coefficients: {:?}", coefs);
    println!("Intercept: {:.4}", report.intercept);
    println!("R²: {:.4} | RMSE: {:.4}", report.r2, report.rmse);
    Ok(())
}
