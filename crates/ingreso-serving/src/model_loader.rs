//! Artifact loading for serving.
//!
//! Both artifacts are plain JSON files produced by the training side. They are
//! read once at startup; any problem is reported as
//! [`ServingError::ArtifactLoad`] naming the offending file.

use crate::classifier::{build_classifier, Classifier, ClassifierSpec};
use crate::error::{ServingError, ServingResult};
use crate::scaler::Scaler;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

/// Load and validate a fitted scaler.
pub fn load_scaler(path: impl AsRef<Path>) -> ServingResult<Scaler> {
    let path = path.as_ref();
    let scaler: Scaler = read_json(path)?;
    scaler
        .validate()
        .map_err(|reason| ServingError::artifact_load(path, reason))?;
    info!(
        "Loaded {} scaler with {} features from {:?}",
        scaler.kind(),
        scaler.n_features(),
        path
    );
    Ok(scaler)
}

/// Load and validate a fitted classifier.
pub fn load_classifier(path: impl AsRef<Path>) -> ServingResult<Box<dyn Classifier>> {
    let path = path.as_ref();
    let spec: ClassifierSpec = read_json(path)?;
    let model = build_classifier(spec).map_err(|reason| ServingError::artifact_load(path, reason))?;
    info!(
        "Loaded {} classifier with {} features from {:?}",
        model.kind(),
        model.n_features(),
        path
    );
    Ok(model)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ServingResult<T> {
    debug!("Reading artifact {:?}", path);
    let text = std::fs::read_to_string(path)
        .map_err(|e| ServingError::artifact_load(path, format!("read failed: {e}")))?;
    serde_json::from_str(&text)
        .map_err(|e| ServingError::artifact_load(path, format!("parse failed: {e}")))
}
