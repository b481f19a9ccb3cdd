//! JSON response bodies for distance results, rendered charts and errors.

use crate::chart::RenderedChart;
use crate::distance::DistanceType;
use crate::engine::{CalculationPair, DistanceMatrix};
use crate::error::AnalysisError;
use crate::point::Point;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub distance: f64,
    pub calculation_type: DistanceType,
    pub point_a: Vec<f64>,
    pub point_b: Vec<f64>,
    pub dimensionality: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDistanceResponse {
    pub distances: Vec<Vec<f64>>,
    pub calculation_type: DistanceType,
    pub point_count: usize,
    pub calculation_pairs: Vec<CalculationPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub image_base64: String,
    pub format: String,
    pub encoding: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizationResponse {
    pub chart_type: String,
    pub style: String,
    pub point_count: usize,
    pub chart_data: ChartData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn encode_distance(
    a: &Point,
    b: &Point,
    metric: DistanceType,
    distance: f64,
) -> DistanceResponse {
    DistanceResponse {
        distance,
        calculation_type: metric,
        point_a: a.as_slice().to_vec(),
        point_b: b.as_slice().to_vec(),
        dimensionality: a.dimension(),
    }
}

pub fn encode_batch(matrix: &DistanceMatrix, metric: DistanceType) -> BatchDistanceResponse {
    BatchDistanceResponse {
        distances: matrix.to_rows(),
        calculation_type: metric,
        point_count: matrix.len(),
        calculation_pairs: matrix.pairs(),
    }
}

/// Embed the chart image as base64 alongside how it was produced.
pub fn encode_chart(chart: &RenderedChart) -> VisualizationResponse {
    VisualizationResponse {
        chart_type: chart.spec.chart_type.to_string(),
        style: chart.spec.style.to_string(),
        point_count: chart.point_count,
        chart_data: ChartData {
            image_base64: general_purpose::STANDARD.encode(&chart.bytes),
            format: chart.format.as_str().to_string(),
            encoding: "base64".to_string(),
            width: chart.width,
            height: chart.height,
        },
    }
}

/// The error message is passed through verbatim.
pub fn encode_error(err: &AnalysisError) -> ErrorResponse {
    ErrorResponse {
        error: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartSpec, ChartType, ImageFormat, Style};
    use crate::engine::DistanceEngine;

    #[test]
    fn test_distance_shape() {
        let a = Point::new(vec![1.0, 2.0]);
        let b = Point::new(vec![4.0, 6.0]);
        let json = serde_json::to_value(encode_distance(&a, &b, DistanceType::Euclidean, 5.0)).unwrap();
        assert_eq!(json["distance"], 5.0);
        assert_eq!(json["calculation_type"], "euclidean");
        assert_eq!(json["dimensionality"], 2);
    }

    #[test]
    fn test_batch_shape() {
        let points = vec![Point::new(vec![0.0]), Point::new(vec![2.0])];
        let matrix = DistanceEngine::default()
            .compute_batch(&points, DistanceType::Manhattan)
            .unwrap();
        let json = serde_json::to_value(encode_batch(&matrix, DistanceType::Manhattan)).unwrap();
        assert_eq!(json["distances"], serde_json::json!([[0.0, 2.0], [2.0, 0.0]]));
        assert_eq!(json["calculation_pairs"][0]["point_indices"], serde_json::json!([0, 1]));
    }

    #[test]
    fn test_chart_base64() {
        let chart = RenderedChart {
            bytes: vec![0x89, b'P', b'N', b'G'],
            format: ImageFormat::Png,
            spec: ChartSpec::new(ChartType::Line, Style::Ggplot),
            point_count: 3,
            width: 10,
            height: 5,
        };
        let response = encode_chart(&chart);
        assert_eq!(response.chart_data.image_base64, "iVBORw==");
        assert_eq!(response.chart_type, "line");
        assert_eq!(response.style, "ggplot");
        assert_eq!(response.chart_data.format, "png");
    }

    #[test]
    fn test_error_verbatim() {
        let err = AnalysisError::chart_input("heatmap rows must have equal length");
        assert_eq!(encode_error(&err).error, err.to_string());
    }
}
