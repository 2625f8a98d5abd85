//! Ingreso CLI - serve the income prediction form or classify a vector offline.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ingreso_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("ingreso=info".parse()?))
        .init();

    let cli = Cli::parse();

    info!("Ingreso CLI starting...");

    match cli.command {
        Commands::Serve(cmd) => cmd.run().await?,
        Commands::Predict(cmd) => cmd.run().await?,
    }

    Ok(())
}
