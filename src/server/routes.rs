//! HTTP route handlers for the distance server API.

use crate::chart::{ChartSpec, ChartType, Style};
use crate::distance::DistanceType;
use crate::encode::{self, ErrorResponse};
use crate::error::AnalysisError;
use crate::export::{self, ExportFormat, ExportResults, ExportedResults};
use crate::point::{points_from_rows, Point};
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// --- Request/Response types ---

/// Single-pair (`point_a` + `point_b`) or batch (`points`) distance request.
#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub point_a: Option<Vec<f64>>,
    pub point_b: Option<Vec<f64>>,
    pub points: Option<Vec<Vec<f64>>>,
    #[serde(rename = "type")]
    pub calculation_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisualizationRequest {
    #[serde(default)]
    pub points: Vec<Vec<f64>>,
    pub chart_type: Option<String>,
    pub style: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub format: Option<String>,
    #[serde(default)]
    pub results: ExportResults,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_reply(err: AnalysisError) -> ApiError {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    tracing::warn!(%status, "request failed: {}", err);
    (status, Json(encode::encode_error(&err)))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| error_reply(AnalysisError::validation(rejection.body_text())))
}

/// Run CPU-bound work on the blocking pool.
async fn offload<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> crate::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| error_reply(AnalysisError::Render(format!("worker failed: {}", e))))?
        .map_err(error_reply)
}

// --- Router ---

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/calculate-distance", post(calculate_distance))
        .route("/api/generate-visualization", post(generate_visualization))
        .route("/api/export-results", post(export_results))
        .route("/health", get(health))
        .with_state(state)
}

// --- Handlers ---

async fn calculate_distance(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DistanceRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let req = body(payload)?;
    let metric: DistanceType = req
        .calculation_type
        .as_deref()
        .unwrap_or("euclidean")
        .parse()
        .map_err(error_reply)?;

    if let Some(rows) = req.points {
        let points = points_from_rows(rows);
        let engine = state.engine.clone();
        let matrix = offload(move || engine.compute_batch(&points, metric)).await?;
        return Ok(Json(encode::encode_batch(&matrix, metric)).into_response());
    }

    let (a, b) = match (req.point_a, req.point_b) {
        (Some(a), Some(b)) => (Point::new(a), Point::new(b)),
        _ => {
            return Err(error_reply(AnalysisError::validation(
                "both point_a and point_b are required",
            )))
        }
    };

    let distance = state.engine.compute(&a, &b, metric).map_err(error_reply)?;
    Ok(Json(encode::encode_distance(&a, &b, metric, distance)).into_response())
}

async fn generate_visualization(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VisualizationRequest>, JsonRejection>,
) -> Result<Json<encode::VisualizationResponse>, ApiError> {
    let req = body(payload)?;
    let chart_type: ChartType = req
        .chart_type
        .as_deref()
        .unwrap_or("scatter")
        .parse()
        .map_err(error_reply)?;
    let style: Style = req
        .style
        .as_deref()
        .unwrap_or("default")
        .parse()
        .map_err(error_reply)?;

    let points = points_from_rows(req.points);
    let spec = ChartSpec::new(chart_type, style);
    let renderer = state.renderer.clone();
    let chart = offload(move || renderer.render(&points, &spec)).await?;

    Ok(Json(encode::encode_chart(&chart)))
}

async fn export_results(
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Json<ExportedResults>, ApiError> {
    let req = body(payload)?;
    let format: ExportFormat = req
        .format
        .as_deref()
        .unwrap_or("json")
        .parse()
        .map_err(error_reply)?;

    export::export(&req.results, format)
        .map(Json)
        .map_err(error_reply)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "distance-server".to_string(),
    })
}
