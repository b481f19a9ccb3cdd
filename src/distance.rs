//! Distance metrics between points

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance metrics supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceType {
    /// Euclidean (L2) distance
    Euclidean,
    /// Manhattan (L1) distance
    Manhattan,
    /// Cosine distance (1 - cosine similarity)
    Cosine,
    /// Number of positions that differ
    Hamming,
    /// 1 - |A ∩ B| / |A ∪ B| over the non-zero positions
    Jaccard,
}

impl DistanceType {
    pub const ALL: [DistanceType; 5] = [
        DistanceType::Euclidean,
        DistanceType::Manhattan,
        DistanceType::Cosine,
        DistanceType::Hamming,
        DistanceType::Jaccard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceType::Euclidean => "euclidean",
            DistanceType::Manhattan => "manhattan",
            DistanceType::Cosine => "cosine",
            DistanceType::Hamming => "hamming",
            DistanceType::Jaccard => "jaccard",
        }
    }

    /// Whether every coordinate must be finite for this metric
    pub fn requires_finite(&self) -> bool {
        matches!(
            self,
            DistanceType::Euclidean | DistanceType::Manhattan | DistanceType::Cosine
        )
    }

    /// Compute the distance between two coordinate slices using this metric
    pub fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(AnalysisError::validation(format!(
                "dimension mismatch: {} vs {}",
                a.len(),
                b.len()
            )));
        }

        let distance = match self {
            DistanceType::Euclidean => euclidean_distance(a, b),
            DistanceType::Manhattan => manhattan_distance(a, b),
            DistanceType::Cosine => cosine_distance(a, b)?,
            DistanceType::Hamming => hamming_distance(a, b),
            DistanceType::Jaccard => jaccard_distance(a, b)?,
        };

        if !distance.is_finite() {
            return Err(AnalysisError::validation(format!(
                "{} distance overflowed: coordinates too large to compare",
                self
            )));
        }
        Ok(distance)
    }
}

impl fmt::Display for DistanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        DistanceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                AnalysisError::validation(format!("unsupported calculation type: {}", s))
            })
    }
}

/// Compute Euclidean (L2) distance
///
/// Differences are scaled by the largest one before squaring, so the result
/// is finite whenever every difference is.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    let scale = a
        .iter()
        .zip(b.iter())
        .fold(0.0f64, |m, (x, y)| m.max((x - y).abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| ((x - y) / scale).powi(2))
        .sum();
    scale * sum.sqrt()
}

/// Compute Manhattan (L1) distance
pub fn manhattan_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
}

/// Compute dot product
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// `v` divided by its largest absolute coordinate, or `None` for a zero vector.
fn unit_scaled(v: &[f64]) -> Option<Vec<f64>> {
    let max = v.iter().fold(0.0f64, |m, x| m.max(x.abs()));
    (max > 0.0).then(|| v.iter().map(|x| x / max).collect())
}

/// Compute cosine distance (1 - cosine similarity)
///
/// Both vectors are rescaled so their largest coordinate is 1 before the
/// norms are taken; cosine similarity does not depend on magnitude.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    let (a, b) = match (unit_scaled(a), unit_scaled(b)) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(AnalysisError::degenerate(
                "cosine distance is undefined for a zero-magnitude vector",
            ))
        }
    };

    let similarity = dot_product(&a, &b) / (norm(&a) * norm(&b));
    if !similarity.is_finite() {
        return Err(AnalysisError::validation(
            "cosine similarity is not finite for these coordinates",
        ));
    }

    // Clamp to [-1, 1] to handle floating point errors
    let similarity = similarity.clamp(-1.0, 1.0);

    Ok(1.0 - similarity)
}

/// Count positions where the coordinates differ
pub fn hamming_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count() as f64
}

/// Jaccard distance over the sets of non-zero positions
pub fn jaccard_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    let (intersection, union) =
        a.iter()
            .zip(b.iter())
            .fold((0usize, 0usize), |(inter, uni), (x, y)| {
                let (in_a, in_b) = (*x != 0.0, *y != 0.0);
                (
                    inter + usize::from(in_a && in_b),
                    uni + usize::from(in_a || in_b),
                )
            });

    if union == 0 {
        return Err(AnalysisError::degenerate(
            "jaccard distance is undefined when both vectors are all zero",
        ));
    }

    Ok(1.0 - intersection as f64 / union as f64)
}
