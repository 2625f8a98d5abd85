//! Ingreso CLI Library
//!
//! This crate provides the command-line interface for Ingreso:
//!
//! - **Serve**: run the HTTP form and prediction endpoint
//! - **Predict**: classify a single feature vector offline
//!
//! # Example
//!
//! ```bash
//! # Serve the form on the default address (127.0.0.1:5000)
//! ingreso serve --artifact-dir /srv/ingreso
//!
//! # Classify one vector with the same artifacts
//! ingreso predict --artifact-dir /srv/ingreso \
//!     --values 39,1,77516,1,13,0,2,0,1,1,2174,0,40,0
//! ```

pub mod commands;

use clap::{Args, Parser, Subcommand};
use ingreso_serving::config::{DEFAULT_MODEL_FILE, DEFAULT_SCALER_FILE};
use std::path::PathBuf;

pub use commands::{PredictCommand, ServeCommand};

/// Ingreso - income-class prediction form service
///
/// Serves a fourteen-field form and classifies submissions with a pre-fitted
/// scaler and binary classifier.
#[derive(Parser, Debug)]
#[command(name = "ingreso")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the prediction form over HTTP
    Serve(ServeCommand),

    /// Classify one feature vector without starting a server
    Predict(PredictCommand),
}

/// Artifact location flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ArtifactArgs {
    /// Directory containing the scaler and model artifacts
    #[arg(long, short = 'd', default_value = ".", env = "INGRESO_ARTIFACT_DIR")]
    pub artifact_dir: PathBuf,

    /// Scaler artifact file name, relative to the artifact directory
    #[arg(long, default_value = DEFAULT_SCALER_FILE, env = "INGRESO_SCALER_FILE")]
    pub scaler_file: PathBuf,

    /// Model artifact file name, relative to the artifact directory
    #[arg(long, default_value = DEFAULT_MODEL_FILE, env = "INGRESO_MODEL_FILE")]
    pub model_file: PathBuf,
}
