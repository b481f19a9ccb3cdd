//! Input validation for distance and chart operations.
//!
//! Validation is a pure check: on success the input comes back wrapped in a
//! type that can only be built here, so the engines never see unchecked data.

use crate::chart::ChartType;
use crate::config::EngineConfig;
use crate::distance::DistanceType;
use crate::error::{AnalysisError, Result};
use crate::point::Point;

/// What the point set is about to be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Metric(DistanceType),
    Chart(ChartType),
}

/// A pair of points that satisfies the preconditions of a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPair {
    a: Point,
    b: Point,
    metric: DistanceType,
}

impl ValidatedPair {
    pub fn a(&self) -> &Point {
        &self.a
    }

    pub fn b(&self) -> &Point {
        &self.b
    }

    pub fn metric(&self) -> DistanceType {
        self.metric
    }

    pub fn dimension(&self) -> usize {
        self.a.dimension()
    }
}

/// A point set that satisfies the preconditions of a [`Context`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPointSet {
    points: Vec<Point>,
}

impl ValidatedPointSet {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shared dimensionality, if every point has the same number of coordinates.
    pub fn dimension(&self) -> Option<usize> {
        let first = self.points.first()?.dimension();
        self.points
            .iter()
            .all(|p| p.dimension() == first)
            .then_some(first)
    }
}

/// Validate a pair of points for a single distance computation.
pub fn validate_pair(
    a: Point,
    b: Point,
    metric: DistanceType,
    limits: &EngineConfig,
) -> Result<ValidatedPair> {
    let label = |i: usize| {
        let name = if i == 0 { "point_a" } else { "point_b" };
        name.to_string()
    };
    let pair = [a, b];
    check_metric_points(&pair, metric, limits, label)?;
    let [a, b] = pair;
    Ok(ValidatedPair { a, b, metric })
}

/// Validate a point set for batch computation or rendering.
pub fn validate(
    points: Vec<Point>,
    context: Context,
    limits: &EngineConfig,
) -> Result<ValidatedPointSet> {
    match context {
        Context::Metric(metric) => {
            if points.is_empty() {
                return Err(AnalysisError::validation("point set is empty"));
            }
            check_set_size(&points, limits)?;
            check_metric_points(&points, metric, limits, |i| format!("point {}", i))?;
        }
        Context::Chart(chart_type) => {
            if points.is_empty() {
                return Err(AnalysisError::chart_input(format!(
                    "{} chart needs at least one point",
                    chart_type
                )));
            }
            check_set_size(&points, limits)?;
            check_chart_points(&points, chart_type, limits)?;
        }
    }
    Ok(ValidatedPointSet { points })
}

fn check_set_size(points: &[Point], limits: &EngineConfig) -> Result<()> {
    if points.len() > limits.max_points {
        return Err(AnalysisError::validation(format!(
            "point set has {} points, limit is {}",
            points.len(),
            limits.max_points
        )));
    }
    Ok(())
}

fn check_metric_points(
    points: &[Point],
    metric: DistanceType,
    limits: &EngineConfig,
    label: impl Fn(usize) -> String,
) -> Result<()> {
    for (i, point) in points.iter().enumerate() {
        if point.dimension() == 0 {
            return Err(AnalysisError::validation(format!(
                "{} has no coordinates",
                label(i)
            )));
        }
        if point.dimension() > limits.max_dimension {
            return Err(AnalysisError::validation(format!(
                "{} has {} coordinates, limit is {}",
                label(i),
                point.dimension(),
                limits.max_dimension
            )));
        }
    }

    let expected = points[0].dimension();
    if let Some((i, point)) = points
        .iter()
        .enumerate()
        .find(|(_, p)| p.dimension() != expected)
    {
        return Err(AnalysisError::validation(format!(
            "dimension mismatch: {} has {} coordinates, {} has {}",
            label(0),
            expected,
            label(i),
            point.dimension()
        )));
    }

    for (i, point) in points.iter().enumerate() {
        for (k, value) in point.as_slice().iter().enumerate() {
            if metric.requires_finite() && !value.is_finite() {
                return Err(AnalysisError::validation(format!(
                    "{} coordinate {} is not finite ({}), required by {} distance",
                    label(i),
                    k,
                    value,
                    metric
                )));
            }
            if value.is_nan() {
                return Err(AnalysisError::validation(format!(
                    "{} coordinate {} is NaN, which {} distance cannot compare",
                    label(i),
                    k,
                    metric
                )));
            }
        }
    }
    Ok(())
}

fn check_chart_points(points: &[Point], chart_type: ChartType, limits: &EngineConfig) -> Result<()> {
    let required = chart_type.min_dimension();

    for (i, point) in points.iter().enumerate() {
        if point.dimension() < required {
            return Err(AnalysisError::chart_input(format!(
                "{} chart needs at least {} coordinate(s) per point; point {} has {}",
                chart_type,
                required,
                i,
                point.dimension()
            )));
        }
        if point.dimension() > limits.max_dimension {
            return Err(AnalysisError::validation(format!(
                "point {} has {} coordinates, limit is {}",
                i,
                point.dimension(),
                limits.max_dimension
            )));
        }
        if let Some(k) = point.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(AnalysisError::validation(format!(
                "point {} coordinate {} is not finite ({})",
                i,
                k,
                point.as_slice()[k]
            )));
        }
    }

    if chart_type.requires_uniform_rows() {
        let expected = points[0].dimension();
        if let Some((i, point)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| p.dimension() != expected)
        {
            return Err(AnalysisError::chart_input(format!(
                "{} rows must have equal length: row 0 has {}, row {} has {}",
                chart_type,
                expected,
                i,
                point.dimension()
            )));
        }
    }
    Ok(())
}
