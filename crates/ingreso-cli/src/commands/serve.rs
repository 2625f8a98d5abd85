//! Serve Command Implementation
//!
//! Loads the artifacts once and serves the form until interrupted.

use crate::ArtifactArgs;
use anyhow::{Context, Result};
use clap::Args;
use ingreso_serving::{Server, ServerConfig};
use tracing::info;

/// Serve the prediction form over HTTP
///
/// # Example
///
/// ```bash
/// ingreso serve \
///     --artifact-dir /srv/ingreso \
///     --host 0.0.0.0 \
///     --port 5000
/// ```
#[derive(Args, Debug, Clone)]
pub struct ServeCommand {
    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1", env = "INGRESO_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "5000", env = "INGRESO_PORT")]
    pub port: u16,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,
}

impl ServeCommand {
    /// Build the server configuration from the parsed flags.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .host(self.host.clone())
            .port(self.port)
            .artifact_dir(self.artifacts.artifact_dir.clone())
            .scaler_file(self.artifacts.scaler_file.clone())
            .model_file(self.artifacts.model_file.clone())
            .build()
    }

    /// Execute the serve command
    pub async fn run(&self) -> Result<()> {
        let config = self.server_config();
        info!("Artifact directory: {:?}", config.artifact_dir);
        info!("Listening on {}", config.socket_addr());

        let server = Server::new(config);
        server
            .start()
            .await
            .context("Failed to start the form server")?;

        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for shutdown signal")?;

        info!("Received shutdown signal, stopping server...");
        server.stop().await?;
        Ok(())
    }
}
