//! Engine and renderer configuration.
//!
//! Both configs are plain values handed to [`DistanceEngine`](crate::engine::DistanceEngine)
//! and [`Renderer`](crate::chart::Renderer) at construction time.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Limits for the distance engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest point set accepted for batch computation or rendering.
    pub max_points: usize,
    /// Largest number of coordinates accepted per point.
    pub max_dimension: usize,
    /// Batches with at least this many points are computed on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_points: 1024,
            max_dimension: 4096,
            parallel_threshold: 64,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_points == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_points must be at least 1".to_string(),
            ));
        }
        if self.max_dimension == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_dimension must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Largest dot radius a chart may use, in pixels.
pub const MAX_POINT_RADIUS: u32 = 64;

/// Image size and chart layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Blank border around the plot area, in pixels.
    pub margin: u32,
    pub max_width: u32,
    pub max_height: u32,
    /// Nodes of a network chart closer than this (Euclidean, data units) are joined.
    pub network_threshold: f64,
    pub histogram_bins: usize,
    pub point_radius: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: 40,
            max_width: 4096,
            max_height: 4096,
            network_threshold: 0.5,
            histogram_bins: 20,
            point_radius: 5,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > self.max_width || self.height > self.max_height {
            return Err(AnalysisError::InvalidConfig(format!(
                "image size {}x{} exceeds limit {}x{}",
                self.width, self.height, self.max_width, self.max_height
            )));
        }
        let no_plot_area = self
            .margin
            .checked_mul(2)
            .map_or(true, |both| both >= self.width.min(self.height));
        if no_plot_area {
            return Err(AnalysisError::InvalidConfig(format!(
                "margin {} leaves no plot area in a {}x{} image",
                self.margin, self.width, self.height
            )));
        }
        if !self.network_threshold.is_finite() || self.network_threshold < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "network_threshold must be a non-negative finite number, got {}",
                self.network_threshold
            )));
        }
        if self.point_radius > MAX_POINT_RADIUS {
            return Err(AnalysisError::InvalidConfig(format!(
                "point_radius {} exceeds limit {}",
                self.point_radius, MAX_POINT_RADIUS
            )));
        }
        if self.histogram_bins == 0 {
            return Err(AnalysisError::InvalidConfig(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(RenderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_oversized_image_rejected() {
        let config = RenderConfig {
            width: 10_000,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_margin_must_leave_plot_area() {
        let config = RenderConfig {
            width: 60,
            height: 60,
            margin: 30,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_margin_rejected_without_overflow() {
        let config = RenderConfig {
            margin: u32::MAX,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_point_radius_limit() {
        let config: RenderConfig =
            serde_json::from_str(r#"{"point_radius": 4294967295}"#).unwrap();
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfig(_))
        ));
        let config = RenderConfig {
            point_radius: MAX_POINT_RADIUS,
            ..RenderConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{"network_threshold": 2.0}"#).unwrap();
        assert_eq!(config.network_threshold, 2.0);
        assert_eq!(config.width, 800);
    }
}
