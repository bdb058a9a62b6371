use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::api::{state::AppState, types::*};
use crate::error::RatecastError;

impl IntoResponse for RatecastError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

/// POST /api/predict
///
/// One prediction per record, in request order.
pub async fn predict(
    State(state): State<AppState>,
    body: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> std::result::Result<Json<PredictResponse>, Response> {
    let Json(req) = body.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: e.body_text() }),
        )
            .into_response()
    })?;
    let records = req.into_records();

    match state.predictor.predict_batch(&records) {
        Ok(predictions) => {
            info!(records = records.len(), "Batch prediction served");
            Ok(Json(PredictResponse { predictions }))
        }
        Err(e) => {
            warn!(records = records.len(), error = %e, "Batch prediction rejected");
            Err(e.into_response())
        }
    }
}

/// GET /api/schema
pub async fn get_schema(State(state): State<AppState>) -> Json<SchemaResponse> {
    Json(SchemaResponse {
        features: state.predictor.schema().names().to_vec(),
        target_year: state.target_year,
    })
}

/// GET /health -- liveness probe with a summary of the loaded model
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.predictor.model();
    Json(HealthResponse {
        status: "ok".to_string(),
        model: ModelSummary {
            kind: model.kind().to_string(),
            input_dim: model.input_dim(),
            declares_feature_names: model.feature_names().is_some(),
        },
        uptime_seconds: state.uptime_seconds(),
    })
}
