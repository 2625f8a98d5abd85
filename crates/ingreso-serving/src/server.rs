//! HTTP server for the Ingreso form service.
//!
//! This module provides the router that hosts the form, the prediction endpoint
//! and a health check, plus a [`Server`] that owns its lifecycle.

use crate::config::ServerConfig;
use crate::context::AppContext;
use crate::error::{ServingError, ServingResult};
use crate::features::NUM_FEATURES;
use crate::handler::{form_page, predecir};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Server state enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    /// Server is not started
    Stopped,
    /// Server is starting up
    Starting,
    /// Server is running and ready
    Running,
    /// Server is shutting down
    ShuttingDown,
    /// Server encountered an error
    Error,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Always "ok" while the router answers
    pub status: &'static str,
    /// Seconds since the artifacts were loaded
    pub uptime_secs: u64,
    /// Width of the feature vector
    pub n_features: usize,
    /// Scaler family
    pub scaler: &'static str,
    /// Classifier family
    pub model: &'static str,
}

impl HealthReport {
    fn from_context(ctx: &AppContext) -> Self {
        Self {
            status: "ok",
            uptime_secs: ctx.loaded_at().elapsed().as_secs(),
            n_features: NUM_FEATURES,
            scaler: ctx.scaler().kind(),
            model: ctx.classifier().kind(),
        }
    }
}

/// Health status of the server.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Overall health status
    pub healthy: bool,

    /// Server state
    pub state: ServerState,

    /// Whether the artifacts are loaded
    pub artifacts_loaded: bool,

    /// Server uptime in seconds
    pub uptime_secs: u64,

    /// Additional health details
    pub details: HashMap<String, String>,
}

/// Build the routes served for one application context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/", get(form_page))
        .route("/predecir", post(predecir))
        .route("/health", get(health))
        .with_state(ctx)
}

async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthReport> {
    Json(HealthReport::from_context(&ctx))
}

/// HTTP server for the form service.
///
/// # Example
///
/// ```no_run
/// use ingreso_serving::{Server, ServerConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::builder().port(5000).artifact_dir(".").build();
///
/// let server = Server::new(config);
/// server.start().await?;
///
/// // Server is now running...
/// server.stop().await?;
/// # Ok(())
/// # }
/// ```
pub struct Server {
    /// Server configuration
    config: ServerConfig,

    /// Current server state
    state: Arc<RwLock<ServerState>>,

    /// Loaded artifacts
    context: RwLock<Option<Arc<AppContext>>>,

    /// Address the listener actually bound
    local_addr: RwLock<Option<SocketAddr>>,

    /// Server start time
    start_time: RwLock<Option<Instant>>,

    /// Shutdown signal sender
    shutdown_tx: RwLock<Option<oneshot::Sender<()>>>,

    /// Serving task
    task: RwLock<Option<JoinHandle<()>>>,
}

impl Server {
    /// Create a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(ServerState::Stopped)),
            context: RwLock::new(None),
            local_addr: RwLock::new(None),
            start_time: RwLock::new(None),
            shutdown_tx: RwLock::new(None),
            task: RwLock::new(None),
        }
    }

    /// Start serving.
    ///
    /// This method:
    /// 1. Validates the configuration
    /// 2. Loads the scaler and classifier
    /// 3. Binds the listener and spawns the HTTP server
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, either artifact cannot be
    /// loaded, or the address cannot be bound.
    pub async fn start(&self) -> ServingResult<()> {
        {
            let current_state = *self.state.read();
            if current_state == ServerState::Running {
                warn!("Server is already running");
                return Ok(());
            }
            if current_state == ServerState::Starting {
                return Err(ServingError::server("Server is already starting"));
            }
        }

        *self.state.write() = ServerState::Starting;
        info!("Starting Ingreso form server...");

        let ctx = match self.prepare() {
            Ok(ctx) => Arc::new(ctx),
            Err(e) => {
                *self.state.write() = ServerState::Error;
                error!("Failed to start server: {}", e);
                return Err(e);
            }
        };

        let listener = match tokio::net::TcpListener::bind(self.config.socket_addr()).await {
            Ok(listener) => listener,
            Err(e) => {
                *self.state.write() = ServerState::Error;
                return Err(ServingError::server(format!(
                    "Failed to bind {}: {e}",
                    self.config.socket_addr()
                )));
            }
        };
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(Arc::clone(&ctx));
        let state = Arc::clone(&self.state);
        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
                *state.write() = ServerState::Error;
            }
        });

        *self.context.write() = Some(ctx);
        *self.local_addr.write() = Some(addr);
        *self.shutdown_tx.write() = Some(shutdown_tx);
        *self.task.write() = Some(task);
        *self.start_time.write() = Some(Instant::now());
        *self.state.write() = ServerState::Running;

        info!("Server started on http://{}", addr);
        Ok(())
    }

    fn prepare(&self) -> ServingResult<AppContext> {
        self.config.validate()?;
        info!("Loading artifacts from: {:?}", self.config.artifact_dir);
        AppContext::load(&self.config)
    }

    /// Stop the server gracefully, letting in-flight requests finish.
    pub async fn stop(&self) -> ServingResult<()> {
        if *self.state.read() == ServerState::Stopped {
            return Ok(());
        }

        info!("Stopping server...");
        *self.state.write() = ServerState::ShuttingDown;

        let tx = self.shutdown_tx.write().take();
        if let Some(tx) = tx {
            let _ = tx.send(());
        }

        let task = self.task.write().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Serving task ended abnormally: {}", e);
            }
        }

        *self.context.write() = None;
        *self.local_addr.write() = None;
        *self.start_time.write() = None;
        *self.state.write() = ServerState::Stopped;

        info!("Server stopped");
        Ok(())
    }

    /// Get the current health status of the server.
    pub fn health(&self) -> HealthStatus {
        let state = *self.state.read();
        let uptime_secs = self
            .start_time
            .read()
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0);

        let context = self.context.read().clone();
        let artifacts_loaded = context.is_some();

        let mut details = HashMap::new();
        details.insert("host".to_string(), self.config.host.clone());
        let port = self
            .local_addr()
            .map(|addr| addr.port())
            .unwrap_or(self.config.port);
        details.insert("port".to_string(), port.to_string());
        if let Some(ctx) = context {
            details.insert("scaler".to_string(), ctx.scaler().kind().to_string());
            details.insert("model".to_string(), ctx.classifier().kind().to_string());
        }

        HealthStatus {
            healthy: state == ServerState::Running && artifacts_loaded,
            state,
            artifacts_loaded,
            uptime_secs,
            details,
        }
    }

    /// Get the current server state.
    pub fn state(&self) -> ServerState {
        *self.state.read()
    }

    /// Check if the server is running.
    pub fn is_running(&self) -> bool {
        self.state() == ServerState::Running
    }

    /// Address the server is listening on, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.read()
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the loaded application context (if running).
    pub fn context(&self) -> Option<Arc<AppContext>> {
        self.context.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_server_is_stopped() {
        let server = Server::new(ServerConfig::default());
        assert_eq!(server.state(), ServerState::Stopped);
        assert!(!server.is_running());
        assert!(server.local_addr().is_none());

        let health = server.health();
        assert!(!health.healthy);
        assert!(!health.artifacts_loaded);
        assert_eq!(health.details.get("port").map(String::as_str), Some("5000"));
    }

    #[tokio::test]
    async fn test_start_fails_without_artifacts() {
        let dir = tempdir().unwrap();
        let config = ServerConfig::builder()
            .port(0)
            .artifact_dir(dir.path())
            .build();

        let server = Server::new(config);
        let err = server.start().await.unwrap_err();
        assert!(matches!(err, ServingError::ArtifactLoad { .. }));
        assert_eq!(server.state(), ServerState::Error);
        assert!(server.local_addr().is_none());
    }

    #[tokio::test]
    async fn test_stop_when_stopped_is_noop() {
        let server = Server::new(ServerConfig::default());
        server.stop().await.unwrap();
        assert_eq!(server.state(), ServerState::Stopped);
    }
}
