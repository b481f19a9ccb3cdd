//! HTTP API tests driven through the router without binding a socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose, Engine as _};
use distance_server::server::{routes::create_router, AppState};
use distance_server::{EngineConfig, RenderConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(
        EngineConfig::default(),
        RenderConfig {
            width: 200,
            height: 150,
            margin: 10,
            ..RenderConfig::default()
        },
    )
    .unwrap();
    create_router(Arc::new(state))
}

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_calculate_distance() {
    let (status, body) = post(
        "/api/calculate-distance",
        json!({ "point_a": [0.0, 0.0], "point_b": [3.0, 4.0], "type": "euclidean" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["distance"], 5.0);
    assert_eq!(body["dimensionality"], 2);
}

#[tokio::test]
async fn test_calculate_distance_defaults_to_euclidean() {
    let (status, body) = post(
        "/api/calculate-distance",
        json!({ "point_a": [1.0], "point_b": [4.0] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["calculation_type"], "euclidean");
    assert_eq!(body["distance"], 3.0);
}

#[tokio::test]
async fn test_dimension_mismatch_is_400() {
    let (status, body) = post(
        "/api/calculate-distance",
        json!({ "point_a": [1.0, 2.0], "point_b": [1.0, 2.0, 3.0], "type": "euclidean" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("dimension mismatch"));
}

#[tokio::test]
async fn test_degenerate_cosine_is_400() {
    let (status, body) = post(
        "/api/calculate-distance",
        json!({ "point_a": [0.0, 0.0, 0.0], "point_b": [1.0, 1.0, 1.0], "type": "cosine" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Degenerate vector"));
}

#[tokio::test]
async fn test_cosine_of_huge_coordinates_is_finite() {
    let (status, body) = post(
        "/api/calculate-distance",
        json!({ "point_a": [1e200, 1e200], "point_b": [1e200, 1e200], "type": "cosine" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["distance"].as_f64().unwrap().abs() < 1e-12, "{}", body);
}

#[tokio::test]
async fn test_overflowing_distance_is_400() {
    let (status, body) = post(
        "/api/calculate-distance",
        json!({ "point_a": [1e308], "point_b": [-1e308], "type": "manhattan" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("overflow"), "{}", body);
}

#[tokio::test]
async fn test_missing_point_is_400() {
    let (status, body) = post("/api/calculate-distance", json!({ "point_a": [1.0] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("point_b"));
}

#[tokio::test]
async fn test_unknown_metric_is_400() {
    let (status, body) = post(
        "/api/calculate-distance",
        json!({ "point_a": [1.0], "point_b": [2.0], "type": "chebyshev" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("chebyshev"));
}

#[tokio::test]
async fn test_batch_distance() {
    let (status, body) = post(
        "/api/calculate-distance",
        json!({ "points": [[0.0, 0.0], [3.0, 4.0], [6.0, 8.0]], "type": "euclidean" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["distances"],
        json!([[0.0, 5.0, 10.0], [5.0, 0.0, 5.0], [10.0, 5.0, 0.0]])
    );
    assert_eq!(body["point_count"], 3);
    assert_eq!(body["calculation_pairs"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_generate_visualization() {
    let (status, body) = post(
        "/api/generate-visualization",
        json!({ "points": [[1.0, 2.0], [3.0, 4.0]], "chart_type": "scatter", "style": "seaborn" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chart_type"], "scatter");
    assert_eq!(body["style"], "seaborn");
    assert_eq!(body["point_count"], 2);

    let image = general_purpose::STANDARD
        .decode(body["chart_data"]["image_base64"].as_str().unwrap())
        .unwrap();
    assert_eq!(&image[1..4], b"PNG");
    assert_eq!(body["chart_data"]["width"], 200);
}

#[tokio::test]
async fn test_visualization_ragged_heatmap_is_400() {
    let (status, body) = post(
        "/api/generate-visualization",
        json!({ "points": [[1.0, 2.0], [3.0]], "chart_type": "heatmap" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Chart input error"));
}

#[tokio::test]
async fn test_visualization_unknown_style_is_400() {
    let (status, _) = post(
        "/api/generate-visualization",
        json!({ "points": [[1.0, 2.0]], "style": "solarized" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_results() {
    let (status, body) = post(
        "/api/export-results",
        json!({ "format": "csv", "results": { "distances": [[0.0, 2.0], [2.0, 0.0]] } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["format"], "csv");
    assert_eq!(body["data"], "Point,P0,P1\nP0,0,2\nP1,2,0\n");
}

#[tokio::test]
async fn test_export_xml() {
    let (status, body) = post(
        "/api/export-results",
        json!({ "format": "xml", "results": { "distances": [[0.0, 2.0], [2.0, 0.0]] } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["format"], "xml");
    assert!(body["data"]
        .as_str()
        .unwrap()
        .contains("<row index=\"1\"><value>2</value><value>0</value></row>"));
}

#[tokio::test]
async fn test_export_unknown_format_is_400() {
    let (status, body) = post(
        "/api/export-results",
        json!({ "format": "excel", "results": {} }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unsupported export format: excel");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/calculate-distance")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
}
