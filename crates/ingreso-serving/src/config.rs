//! Server configuration for the Ingreso form service.
//!
//! Defaults reproduce a local development server: bind `127.0.0.1:5000` and read
//! both artifacts from the working directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default scaler artifact file name.
pub const DEFAULT_SCALER_FILE: &str = "scaler.json";

/// Default classifier artifact file name.
pub const DEFAULT_MODEL_FILE: &str = "modelo_svm_rbf.json";

/// Configuration for the HTTP form server.
///
/// # Example
///
/// ```
/// use ingreso_serving::config::ServerConfig;
///
/// let config = ServerConfig::builder()
///     .host("0.0.0.0")
///     .port(8080)
///     .artifact_dir("/srv/ingreso")
///     .build();
///
/// assert_eq!(config.socket_addr(), "0.0.0.0:8080");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to (default: "127.0.0.1")
    pub host: String,

    /// Port to listen on (default: 5000)
    pub port: u16,

    /// Directory holding the persisted artifacts
    pub artifact_dir: PathBuf,

    /// Scaler artifact file name, relative to `artifact_dir`
    pub scaler_file: PathBuf,

    /// Classifier artifact file name, relative to `artifact_dir`
    pub model_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            artifact_dir: PathBuf::from("."),
            scaler_file: PathBuf::from(DEFAULT_SCALER_FILE),
            model_file: PathBuf::from(DEFAULT_MODEL_FILE),
        }
    }
}

impl ServerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Get the socket address string for binding.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full path of the scaler artifact.
    pub fn scaler_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.scaler_file)
    }

    /// Full path of the classifier artifact.
    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }

    /// Validate the configuration.
    ///
    /// A port of 0 is accepted and binds an ephemeral port; read the real one
    /// from `Server::local_addr` after start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if !self.artifact_dir.is_dir() {
            return Err(ConfigError::ArtifactDirNotFound(self.artifact_dir.clone()));
        }
        Ok(())
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    artifact_dir: Option<PathBuf>,
    scaler_file: Option<PathBuf>,
    model_file: Option<PathBuf>,
}

impl ServerConfigBuilder {
    /// Set the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the port number.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the artifact directory.
    pub fn artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = Some(dir.into());
        self
    }

    /// Set the scaler artifact file name.
    pub fn scaler_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.scaler_file = Some(file.into());
        self
    }

    /// Set the classifier artifact file name.
    pub fn model_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.model_file = Some(file.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ServerConfig {
        let default = ServerConfig::default();
        ServerConfig {
            host: self.host.unwrap_or(default.host),
            port: self.port.unwrap_or(default.port),
            artifact_dir: self.artifact_dir.unwrap_or(default.artifact_dir),
            scaler_file: self.scaler_file.unwrap_or(default.scaler_file),
            model_file: self.model_file.unwrap_or(default.model_file),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Empty host
    #[error("Invalid host: host cannot be empty")]
    EmptyHost,

    /// Artifact directory not found
    #[error("Artifact directory not found: {0}")]
    ArtifactDirNotFound(PathBuf),
}
