//! Point type and parsing

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// A point (vector) in n-dimensional space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Point {
    data: Vec<f64>,
}

impl Point {
    /// Create a new point from its coordinates
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Get the dimension of the point
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get the coordinates as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Compute the L2 norm (magnitude) of the point
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// First two coordinates as an (x, y) pair, if present
    pub fn xy(&self) -> Option<(f64, f64)> {
        match self.data.as_slice() {
            [x, y, ..] => Some((*x, *y)),
            _ => None,
        }
    }

    /// Parse a point from a comma-separated string
    pub fn from_str(s: &str) -> Result<Self> {
        let data: Result<Vec<f64>> = s
            .split(',')
            .map(|x| {
                x.trim().parse::<f64>().map_err(|_| {
                    AnalysisError::validation(format!("invalid coordinate: {:?}", x.trim()))
                })
            })
            .collect();
        Ok(Point::new(data?))
    }
}

impl From<Vec<f64>> for Point {
    fn from(data: Vec<f64>) -> Self {
        Point::new(data)
    }
}

/// Parse a point set where points are separated by `;` and coordinates by `,`
pub fn parse_point_set(s: &str) -> Result<Vec<Point>> {
    s.split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(Point::from_str)
        .collect()
}

/// Convert raw rows (as received over JSON) into points.
pub fn points_from_rows(rows: Vec<Vec<f64>>) -> Vec<Point> {
    rows.into_iter().map(Point::new).collect()
}
