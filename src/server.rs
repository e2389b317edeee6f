//! HTTP façade over the churn classifier.
//!
//! Three routes: a liveness check at `/`, scoring at `/predict`, and static
//! offline evaluation statistics at `/metrics`. Every failure on the predict
//! path is translated here, at the route boundary, into a JSON error body
//! with status 500; no framework error page ever reaches the client.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    features::{AssembleError, assemble},
    metrics::EvalReport,
    model::ChurnModel,
};

/// Text returned by the liveness route.
pub const HEALTH_TEXT: &str = "Churn prediction API is running";

/// Shared state handed to every request handler.
///
/// The model is loaded once at startup and never mutated afterwards, so the
/// `Arc` is the only synchronization requests need.
#[derive(Clone)]
pub struct AppState {
    /// The loaded classifier artifact.
    pub model: Arc<ChurnModel>,
}

impl AppState {
    /// Wrap a loaded model for sharing across request handlers.
    pub fn new(model: ChurnModel) -> Self {
        Self {
            model: Arc::new(model),
        }
    }
}

/// Errors that may occur while serving one `/predict` request.
#[derive(Debug, Error)]
pub enum PredictError {
    /// The request body is not parseable JSON.
    #[error("Request body is not valid JSON: {0}")]
    BodyParse(#[from] serde_json::Error),
    /// The request body parsed but is not a JSON object.
    #[error("Request body must be a JSON object")]
    NotAnObject,
    /// Feature assembly rejected the record.
    #[error(transparent)]
    Assemble(#[from] AssembleError),
    /// The classifier returned an unusable score.
    #[error("Classifier produced a non-finite probability")]
    Score,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    prediction: &'static str,
    probability: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Build the application router over the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/predict", post(predict))
        .route("/metrics", get(metrics_report))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    HEALTH_TEXT
}

async fn metrics_report() -> Json<EvalReport> {
    Json(EvalReport::baseline())
}

async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    match score_request(&state.model, &body) {
        Ok(response) => {
            tracing::info!(
                prediction = response.prediction,
                probability = response.probability,
                "Scored predict request"
            );
            Ok(Json(response))
        }
        Err(err) => {
            tracing::error!("Predict request failed: {err}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Prediction failed: {err}"),
                }),
            ))
        }
    }
}

fn score_request(model: &ChurnModel, body: &[u8]) -> Result<PredictResponse, PredictError> {
    let value: Value = serde_json::from_slice(body)?;
    let record = value.as_object().ok_or(PredictError::NotAnObject)?;
    let row = assemble(record)?;
    let prediction = model.predict(&row);
    if !prediction.probability.is_finite() {
        return Err(PredictError::Score);
    }
    Ok(PredictResponse {
        prediction: if prediction.label == 1 {
            "Churn"
        } else {
            "No Churn"
        },
        probability: round4(prediction.probability),
    })
}

/// Round a probability to 4 decimal places for the wire format.
///
/// The model is never rounded internally; this is the presentation boundary.
fn round4(probability: f32) -> f64 {
    (f64::from(probability) * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FEATURES;
    use crate::model::Stump;
    use serde_json::json;

    fn tiny_model() -> ChurnModel {
        ChurnModel {
            model_version: 1,
            feature_names: FEATURES.iter().map(|spec| spec.name.to_string()).collect(),
            base_score: 0.0,
            learning_rate: 1.0,
            stumps: vec![Stump {
                feature_index: 0,
                threshold: 0.5,
                left_value: 2.0,
                right_value: -2.0,
            }],
            decision_threshold: 0.5,
        }
    }

    fn valid_body() -> Vec<u8> {
        json!({
            "Contract": "Month-to-month",
            "Monthly Charge": 70.5,
            "Number of Referrals": 3,
            "Dependents": "Yes",
            "Avg Monthly GB Download": 20,
            "Tenure in Months": 24,
            "Payment Method": "Credit Card",
            "Online Backup": "Yes",
            "Online Security": "No",
            "Premium Tech Support": "No"
        })
        .to_string()
        .into_bytes()
    }

    #[test]
    fn round4_truncates_to_presentation_precision() {
        assert_eq!(round4(0.123_456), 0.1235);
        assert_eq!(round4(0.999_99), 1.0);
        assert_eq!(round4(0.0), 0.0);
    }

    #[test]
    fn score_request_labels_churn() {
        let response = score_request(&tiny_model(), &valid_body()).unwrap();
        assert_eq!(response.prediction, "Churn");
        assert!(response.probability > 0.5 && response.probability <= 1.0);
    }

    #[test]
    fn score_request_rejects_non_json_body() {
        let err = score_request(&tiny_model(), b"not json").unwrap_err();
        assert!(matches!(err, PredictError::BodyParse(_)));
    }

    #[test]
    fn score_request_rejects_non_object_body() {
        let err = score_request(&tiny_model(), b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, PredictError::NotAnObject));
    }

    #[test]
    fn assembly_errors_keep_their_message() {
        let body = json!({"Contract": "Quarterly"}).to_string().into_bytes();
        let err = score_request(&tiny_model(), &body).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Quarterly"));
        assert!(message.contains("Contract"));
    }
}
