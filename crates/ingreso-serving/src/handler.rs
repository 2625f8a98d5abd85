//! Request handlers for the form and the prediction endpoint.
//!
//! Every failure on the prediction path, from an unreadable body to a model
//! error, collapses into a single plain-text line served with status 200.

use crate::classifier::ClassLabel;
use crate::context::AppContext;
use crate::error::{ServingError, ServingResult};
use crate::features::FeatureVector;
use crate::templates::{render_result, FORM_PAGE};
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix of every failure response body.
pub const ERROR_PREFIX: &str = "Error en la predicción: ";

/// Result of handling one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionOutcome {
    /// The model produced a label.
    Label(ClassLabel),
    /// Parsing or inference failed; holds the failure description.
    Failure(String),
}

impl PredictionOutcome {
    /// Body text of the response this outcome renders to.
    pub fn body(&self) -> String {
        match self {
            PredictionOutcome::Label(label) => render_result(label),
            PredictionOutcome::Failure(reason) => format!("{ERROR_PREFIX}{reason}"),
        }
    }
}

impl From<ServingResult<ClassLabel>> for PredictionOutcome {
    fn from(result: ServingResult<ClassLabel>) -> Self {
        match result {
            Ok(label) => PredictionOutcome::Label(label),
            Err(e) => PredictionOutcome::Failure(e.to_string()),
        }
    }
}

impl IntoResponse for PredictionOutcome {
    fn into_response(self) -> Response {
        match &self {
            PredictionOutcome::Label(_) => Html(self.body()).into_response(),
            PredictionOutcome::Failure(_) => self.body().into_response(),
        }
    }
}

/// Parse decoded form pairs, scale, and classify.
pub fn predict_from_form<K, V>(ctx: &AppContext, pairs: &[(K, V)]) -> PredictionOutcome
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let result = FeatureVector::from_form(pairs).and_then(|features| ctx.predict(&features));
    match &result {
        Err(e) if e.is_client_error() => debug!("Prediction request failed: {}", e),
        Err(e) => warn!("Inference failed: {}", e),
        Ok(_) => {}
    }
    result.into()
}

/// `GET /`
pub async fn form_page() -> Html<&'static str> {
    Html(FORM_PAGE)
}

/// `POST /predecir`
pub async fn predecir(
    State(ctx): State<Arc<AppContext>>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> PredictionOutcome {
    match form {
        Ok(Form(pairs)) => predict_from_form(&ctx, &pairs),
        Err(rejection) => {
            let err = ServingError::InvalidForm(rejection.body_text());
            debug!("Rejected form submission: {}", err);
            PredictionOutcome::Failure(err.to_string())
        }
    }
}
