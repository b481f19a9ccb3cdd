//! Distance engine: single-pair and all-pairs computation over validated input.

use crate::config::EngineConfig;
use crate::distance::DistanceType;
use crate::error::Result;
use crate::point::Point;
use crate::validate::{self, Context};
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Symmetric distance matrix indexed by point-set position.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Array2<f64>,
}

/// One unordered pair from a batch, `i < j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationPair {
    pub point_indices: [usize; 2],
    pub distance: f64,
}

impl DistanceMatrix {
    /// Number of points (rows) in the matrix
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get((i, j)).copied()
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    /// The upper triangle as `(i, j, distance)` pairs in row-major order.
    pub fn pairs(&self) -> Vec<CalculationPair> {
        let n = self.len();
        (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .map(|(i, j)| CalculationPair {
                point_indices: [i, j],
                distance: self.values[[i, j]],
            })
            .collect()
    }
}

/// Computes distances between points under the configured limits.
#[derive(Debug, Clone, Default)]
pub struct DistanceEngine {
    config: EngineConfig,
}

impl DistanceEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the distance between two points.
    pub fn compute(&self, a: &Point, b: &Point, metric: DistanceType) -> Result<f64> {
        let pair = validate::validate_pair(a.clone(), b.clone(), metric, &self.config)?;
        let distance = pair
            .metric()
            .distance(pair.a().as_slice(), pair.b().as_slice())?;
        tracing::debug!(%metric, dimension = pair.dimension(), distance, "computed distance");
        Ok(distance)
    }

    /// Compute the full symmetric matrix over every pair in `points`.
    ///
    /// Each unordered pair is evaluated once and mirrored; the diagonal is zero.
    /// If any pair fails, the error for the lowest `(i, j)` is returned and no
    /// matrix is produced.
    pub fn compute_batch(&self, points: &[Point], metric: DistanceType) -> Result<DistanceMatrix> {
        let set = validate::validate(points.to_vec(), Context::Metric(metric), &self.config)?;
        let points = set.points();
        let n = points.len();

        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i + 1..n).map(move |j| (i, j)))
            .collect();

        let evaluate = |&(i, j): &(usize, usize)| {
            metric
                .distance(points[i].as_slice(), points[j].as_slice())
                .map_err(|e| e.at_pair(i, j))
        };

        let results: Vec<Result<f64>> = if n >= self.config.parallel_threshold {
            pairs.par_iter().map(evaluate).collect()
        } else {
            pairs.iter().map(evaluate).collect()
        };

        let mut values = Array2::<f64>::zeros((n, n));
        for (&(i, j), result) in pairs.iter().zip(results) {
            let distance = result?;
            values[[i, j]] = distance;
            values[[j, i]] = distance;
        }

        tracing::debug!(%metric, points = n, pairs = pairs.len(), "computed distance matrix");
        Ok(DistanceMatrix { values })
    }
}
