//! Predict Command Implementation
//!
//! Runs the same scale-then-classify path as the HTTP handler for one vector
//! given on the command line.

use crate::ArtifactArgs;
use anyhow::{Context, Result};
use clap::Args;
use ingreso_serving::{AppContext, FeatureVector, PredictionOutcome, ServerConfig};
use tracing::debug;

/// Classify one feature vector without starting a server
///
/// # Example
///
/// ```bash
/// ingreso predict --values 39,1,77516,1,13,0,2,0,1,1,2174,0,40,0
/// ```
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    /// Fourteen comma separated integers in form field order
    #[arg(long, short = 'v', allow_hyphen_values = true)]
    pub values: String,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

impl PredictCommand {
    fn server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .artifact_dir(self.artifacts.artifact_dir.clone())
            .scaler_file(self.artifacts.scaler_file.clone())
            .model_file(self.artifacts.model_file.clone())
            .build()
    }

    /// Load the artifacts and classify the vector.
    ///
    /// Artifact problems are returned as errors; bad input becomes a
    /// [`PredictionOutcome::Failure`], exactly as the HTTP handler reports it.
    pub fn evaluate(&self) -> Result<PredictionOutcome> {
        let ctx = AppContext::load(&self.server_config()).context("Failed to load artifacts")?;
        debug!("Classifying {:?}", self.values);
        let result = FeatureVector::parse_csv(&self.values).and_then(|f| ctx.predict(&f));
        Ok(result.into())
    }

    /// Execute the predict command
    pub async fn run(&self) -> Result<()> {
        match self.evaluate()? {
            PredictionOutcome::Label(label) => {
                println!("{label}");
                Ok(())
            }
            failure @ PredictionOutcome::Failure(_) => anyhow::bail!("{}", failure.body()),
        }
    }
}
