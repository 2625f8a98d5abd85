//! Process-wide application context.
//!
//! [`AppContext`] owns the fitted scaler and classifier. It is built once at
//! startup and shared read-only with every request, so no locking is needed on
//! the prediction path.

use crate::classifier::{ClassLabel, Classifier};
use crate::config::ServerConfig;
use crate::error::ServingResult;
use crate::features::{FeatureVector, NUM_FEATURES};
use crate::model_loader::{load_classifier, load_scaler};
use crate::scaler::Scaler;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Immutable artifacts used to answer predictions.
#[derive(Debug)]
pub struct AppContext {
    scaler: Scaler,
    classifier: Box<dyn Classifier>,
    loaded_at: Instant,
    sources: Option<(PathBuf, PathBuf)>,
}

impl AppContext {
    /// Assemble a context from already-built artifacts.
    ///
    /// Widths are not checked here. A scaler or model fitted on something other
    /// than [`NUM_FEATURES`] features fails each prediction with
    /// [`ServingError::DimensionMismatch`](crate::ServingError::DimensionMismatch).
    pub fn new(scaler: Scaler, classifier: Box<dyn Classifier>) -> Self {
        Self {
            scaler,
            classifier,
            loaded_at: Instant::now(),
            sources: None,
        }
    }

    /// Load both artifacts from the paths named in `config`.
    pub fn load(config: &ServerConfig) -> ServingResult<Self> {
        let scaler_path = config.scaler_path();
        let model_path = config.model_path();
        let scaler = load_scaler(&scaler_path)?;
        let classifier = load_classifier(&model_path)?;

        for (component, width) in [
            ("scaler", scaler.n_features()),
            ("model", classifier.n_features()),
        ] {
            if width != NUM_FEATURES {
                warn!(
                    "{} expects {} features but the form sends {}; predictions will fail",
                    component, width, NUM_FEATURES
                );
            }
        }

        let mut ctx = Self::new(scaler, classifier);
        info!(
            "Artifacts ready: {} scaler, {} classifier",
            ctx.scaler.kind(),
            ctx.classifier.kind()
        );
        ctx.sources = Some((scaler_path, model_path));
        Ok(ctx)
    }

    /// Scale one vector and classify it.
    pub fn predict(&self, features: &FeatureVector) -> ServingResult<ClassLabel> {
        let scaled = self.scaler.transform(&features.to_f64())?;
        let label = self.classifier.predict(&scaled)?;
        debug!("Predicted label {}", label);
        Ok(label)
    }

    /// The fitted scaler.
    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// The fitted classifier.
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// When the artifacts were loaded.
    pub fn loaded_at(&self) -> Instant {
        self.loaded_at
    }

    /// Scaler and model file paths, when loaded from disk.
    pub fn sources(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.sources.as_ref().map(|(s, m)| (s, m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{build_classifier, ClassifierSpec, LinearSpec};
    use crate::error::ServingError;
    use crate::scaler::StandardScaler;

    fn linear(n: usize) -> Box<dyn Classifier> {
        let mut coef = vec![0.0; n];
        coef[0] = 1.0;
        build_classifier(ClassifierSpec::Linear(LinearSpec {
            classes: [ClassLabel::Int(0), ClassLabel::Int(1)],
            coef,
            intercept: 0.0,
        }))
        .unwrap()
    }

    fn standard(n: usize, age_mean: f64) -> Scaler {
        let mut mean = vec![0.0; n];
        mean[0] = age_mean;
        Scaler::Standard(StandardScaler {
            mean,
            scale: vec![1.0; n],
        })
    }

    #[test]
    fn test_predict_scales_before_classifying() {
        let ctx = AppContext::new(standard(NUM_FEATURES, 40.0), linear(NUM_FEATURES));
        let mut values = [0i64; NUM_FEATURES];

        values[0] = 39;
        assert_eq!(
            ctx.predict(&FeatureVector::new(values)).unwrap(),
            ClassLabel::Int(0)
        );

        values[0] = 41;
        assert_eq!(
            ctx.predict(&FeatureVector::new(values)).unwrap(),
            ClassLabel::Int(1)
        );
        assert!(ctx.sources().is_none());
    }

    #[test]
    fn test_wrong_width_fails_at_prediction() {
        let values = FeatureVector::new([1; NUM_FEATURES]);

        let ctx = AppContext::new(standard(3, 0.0), linear(NUM_FEATURES));
        let err = ctx.predict(&values).unwrap_err();
        assert_eq!(err.to_string(), "scaler expects 3 features, got 14");

        let ctx = AppContext::new(standard(NUM_FEATURES, 0.0), linear(13));
        let err = ctx.predict(&values).unwrap_err();
        assert!(matches!(
            err,
            ServingError::DimensionMismatch {
                component: "model",
                expected: 13,
                actual: 14
            }
        ));
    }
}
