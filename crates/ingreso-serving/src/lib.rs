//! HTTP form serving for the Ingreso income-class predictor.
//!
//! This crate serves a fourteen-field HTML form and answers submissions with the
//! label produced by a pre-fitted scaler and binary classifier.
//!
//! # Overview
//!
//! - **Form page** (`GET /`): static form compiled into the binary
//! - **Prediction handler** (`POST /predecir`): parse, scale, classify, render
//! - **Health check** (`GET /health`): artifact summary as JSON
//! - **AppContext**: the scaler and classifier, loaded once and shared read-only
//! - **Server**: lifecycle around the router (start, stop, health)
//!
//! # Architecture
//!
//! ```text
//!   browser ── GET / ──────────────▶ form page
//!      │
//!      └──── POST /predecir ──▶ FeatureVector::from_form
//!                                      │
//!                                      ▼
//!                     ┌──────────── AppContext ────────────┐
//!                     │  Scaler::transform ─▶ Classifier   │
//!                     └────────────────────────────────────┘
//!                                      │
//!                                      ▼
//!                 result page  |  "Error en la predicción: ..."
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use ingreso_serving::{Server, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::builder()
//!     .host("127.0.0.1")
//!     .port(5000)
//!     .artifact_dir("/srv/ingreso")
//!     .build();
//!
//! let server = Server::new(config);
//! server.start().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Making Predictions Without HTTP
//!
//! ```no_run
//! use ingreso_serving::{AppContext, FeatureVector, ServerConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = AppContext::load(&ServerConfig::default())?;
//! let features = FeatureVector::parse_csv("39,1,77516,1,13,0,2,0,1,1,2174,0,40,0")?;
//! println!("{}", ctx.predict(&features)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Library operations return [`ServingResult<T>`]. At the HTTP boundary every
//! error becomes a [`PredictionOutcome::Failure`] and is rendered as plain text.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classifier;
pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod handler;
pub mod model_loader;
pub mod scaler;
pub mod server;
pub mod templates;

// Re-export main types at crate root for convenience
pub use classifier::{ClassLabel, Classifier, ClassifierSpec};
pub use config::{ConfigError, ServerConfig};
pub use context::AppContext;
pub use error::{ServingError, ServingResult};
pub use features::{FeatureVector, FIELD_NAMES, NUM_FEATURES};
pub use handler::{PredictionOutcome, ERROR_PREFIX};
pub use scaler::Scaler;
pub use server::{router, HealthStatus, Server, ServerState};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
