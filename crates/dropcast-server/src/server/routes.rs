use crate::models::{ModelInfo, PredictionResponse, SchemaGroup};
use crate::server::AppState;
use crate::telemetry;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dropcast_classifiers::predict_detailed;
use dropcast_core::{fields, Error, FieldGroup, ModelInput};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

// ============================================================================
// Errors
// ============================================================================

/// Error response wrapper: maps core errors to status codes
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            Error::UnsupportedInput(_) => StatusCode::BAD_REQUEST,
            Error::Inference(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ============================================================================
// Health and metadata endpoints
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn model_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(ModelInfo {
        name: state.model.name().to_string(),
        feature_names: state.model.feature_names().to_vec(),
        classes: state.model.classes().to_vec(),
        objective: state.model.objective_name().to_string(),
        trees: state.model.num_estimators(),
    })
}

pub async fn schema() -> impl IntoResponse {
    Json(schema_groups())
}

/// Field catalogue grouped by form section
pub fn schema_groups() -> Vec<SchemaGroup> {
    [
        FieldGroup::Personal,
        FieldGroup::Family,
        FieldGroup::Application,
        FieldGroup::Financial,
        FieldGroup::FirstSemester,
        FieldGroup::SecondSemester,
        FieldGroup::Economic,
    ]
    .into_iter()
    .map(|group| SchemaGroup {
        title: group.title(),
        fields: fields::fields_in(group).copied().collect(),
    })
    .collect()
}

// ============================================================================
// Prediction endpoint
// ============================================================================

pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let start = Instant::now();

    let result = body
        .map_err(|rejection| Error::unsupported_input(rejection.body_text()))
        .and_then(|Json(body)| ModelInput::try_from(body))
        .and_then(|input| predict_detailed(input, state.model.as_ref()));

    let prediction = match result {
        Ok(prediction) => prediction,
        Err(e) => {
            warn!("Prediction failed: {}", e);
            telemetry::record_error(e.kind());
            return Err(e.into());
        }
    };

    let latency_us = start.elapsed().as_micros() as u64;
    let response = PredictionResponse::new(prediction, latency_us);
    telemetry::record_prediction(response.outcome, latency_us);
    debug!(label = response.label, latency_us, "Prediction served");

    Ok(Json(response))
}

// ============================================================================
// Metrics endpoint
// ============================================================================

pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
