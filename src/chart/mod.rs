//! Chart rendering.
//!
//! Rendering happens in two steps: [`scene`] turns a validated point set into
//! pixel-space marks, independent of style, and [`raster`] paints those marks
//! with a [`Theme`] and encodes the result as PNG.

pub mod raster;
pub mod scene;
pub mod theme;

pub use scene::{Align, Histogram, Label, Mark, PixelRect, Role, Scene, TextRole};
pub use theme::Theme;

use crate::config::{EngineConfig, RenderConfig};
use crate::distance::DistanceType;
use crate::engine::DistanceEngine;
use crate::error::{AnalysisError, Result};
use crate::point::Point;
use crate::validate::{self, Context};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Visual encoding for a point set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Scatter,
    Heatmap,
    Network,
    Histogram,
    Line,
}

impl ChartType {
    pub const ALL: [ChartType; 5] = [
        ChartType::Scatter,
        ChartType::Heatmap,
        ChartType::Network,
        ChartType::Histogram,
        ChartType::Line,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Scatter => "scatter",
            ChartType::Heatmap => "heatmap",
            ChartType::Network => "network",
            ChartType::Histogram => "histogram",
            ChartType::Line => "line",
        }
    }

    /// Coordinates each point must have to be drawn
    pub fn min_dimension(&self) -> usize {
        match self {
            ChartType::Scatter | ChartType::Network | ChartType::Line => 2,
            ChartType::Heatmap | ChartType::Histogram => 1,
        }
    }

    /// Whether all points must share a dimensionality
    pub fn requires_uniform_rows(&self) -> bool {
        matches!(self, ChartType::Heatmap)
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AnalysisError::validation(format!("unsupported chart type: {}", s)))
    }
}

/// Cosmetic theme applied to a chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    Default,
    Seaborn,
    Ggplot,
    DarkBackground,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::Default,
        Style::Seaborn,
        Style::Ggplot,
        Style::DarkBackground,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Default => "default",
            Style::Seaborn => "seaborn",
            Style::Ggplot => "ggplot",
            Style::DarkBackground => "dark_background",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        Style::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AnalysisError::validation(format!("unsupported style: {}", s)))
    }
}

/// Chart type and style for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    #[serde(default)]
    pub style: Style,
}

impl ChartSpec {
    pub fn new(chart_type: ChartType, style: Style) -> Self {
        Self { chart_type, style }
    }
}

/// Encoded image format of a rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
        }
    }
}

/// An encoded chart and how it was produced
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub spec: ChartSpec,
    pub point_count: usize,
    pub width: u32,
    pub height: u32,
}

impl RenderedChart {
    /// Write the encoded image to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

/// Renders point sets into PNG charts.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    engine: DistanceEngine,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            config: RenderConfig::default(),
            engine: DistanceEngine::default(),
        }
    }
}

impl Renderer {
    /// Create a renderer. `engine` supplies the point-set limits and the
    /// pairwise distances used to connect network nodes.
    pub fn new(config: RenderConfig, engine: DistanceEngine) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn limits(&self) -> &EngineConfig {
        self.engine.config()
    }

    /// Compute the style-independent geometry of a chart.
    pub fn layout(&self, points: &[Point], chart_type: ChartType) -> Result<Scene> {
        let set = validate::validate(points.to_vec(), Context::Chart(chart_type), self.limits())?;
        let points = set.points();

        let scene = match chart_type {
            ChartType::Scatter => scene::scatter(points, &self.config),
            ChartType::Line => scene::line(points, &self.config),
            ChartType::Heatmap => {
                self.check_heatmap_fits(points)?;
                scene::heatmap(points, &self.config)
            }
            ChartType::Histogram => scene::histogram(points, &self.config),
            ChartType::Network => {
                let edges = self.network_edges(points)?;
                scene::network(points, &edges, &self.config)
            }
        };
        Ok(scene)
    }

    /// Every heatmap cell needs at least one pixel of the plot area.
    fn check_heatmap_fits(&self, points: &[Point]) -> Result<()> {
        let plot_width = self.config.width - 2 * self.config.margin;
        let plot_height = self.config.height - 2 * self.config.margin;
        let rows = points.len();
        let cols = points.first().map_or(0, Point::dimension);

        if rows > plot_height as usize || cols > plot_width as usize {
            return Err(AnalysisError::chart_input(format!(
                "heatmap of {} rows by {} columns does not fit a {}x{} pixel plot area",
                rows, cols, plot_width, plot_height
            )));
        }
        Ok(())
    }

    /// Pairs `(i, j)`, `i < j`, whose 2D positions lie within the network threshold.
    pub fn network_edges(&self, points: &[Point]) -> Result<Vec<(usize, usize)>> {
        let projected: Vec<Point> = points
            .iter()
            .filter_map(|p| p.xy())
            .map(|(x, y)| Point::new(vec![x, y]))
            .collect();
        if projected.len() != points.len() {
            return Err(AnalysisError::chart_input(
                "network chart needs at least 2 coordinates per point",
            ));
        }

        let matrix = self.engine.compute_batch(&projected, DistanceType::Euclidean)?;
        Ok(matrix
            .pairs()
            .into_iter()
            .filter(|p| p.distance <= self.config.network_threshold)
            .map(|p| (p.point_indices[0], p.point_indices[1]))
            .collect())
    }

    /// Render a point set as an encoded image.
    pub fn render(&self, points: &[Point], spec: &ChartSpec) -> Result<RenderedChart> {
        let scene = self.layout(points, spec.chart_type)?;
        let theme = Theme::for_style(spec.style);
        let bytes = raster::paint(&scene, &theme)?;

        tracing::debug!(
            chart_type = %spec.chart_type,
            style = %spec.style,
            points = points.len(),
            marks = scene.marks.len(),
            bytes = bytes.len(),
            "rendered chart"
        );

        Ok(RenderedChart {
            bytes,
            format: ImageFormat::Png,
            spec: *spec,
            point_count: points.len(),
            width: scene.width,
            height: scene.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(rows: &[&[f64]]) -> Vec<Point> {
        rows.iter().map(|r| Point::new(r.to_vec())).collect()
    }

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_parse_names() {
        assert_eq!("heatmap".parse::<ChartType>().unwrap(), ChartType::Heatmap);
        assert_eq!(
            "dark_background".parse::<Style>().unwrap(),
            Style::DarkBackground
        );
        assert!("pie".parse::<ChartType>().is_err());
        assert!("solarized".parse::<Style>().is_err());
    }

    #[test]
    fn test_style_serde_name() {
        let json = serde_json::to_string(&Style::DarkBackground).unwrap();
        assert_eq!(json, "\"dark_background\"");
    }

    #[test]
    fn test_render_every_chart_type() {
        let renderer = Renderer::default();
        let points = pts(&[&[0.0, 0.0], &[0.3, 0.2], &[1.0, 1.5], &[2.0, 0.5]]);

        for chart_type in ChartType::ALL {
            let chart = renderer
                .render(&points, &ChartSpec::new(chart_type, Style::Default))
                .unwrap();
            assert_eq!(&chart.bytes[..8], &PNG_MAGIC, "{}", chart_type);
            assert_eq!(chart.point_count, 4);
            assert_eq!((chart.width, chart.height), (800, 600));
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = Renderer::default();
        let points = pts(&[&[1.0, 2.0], &[3.0, 4.0], &[2.0, 1.0]]);
        let spec = ChartSpec::new(ChartType::Network, Style::Seaborn);
        let first = renderer.render(&points, &spec).unwrap();
        let second = renderer.render(&points, &spec).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_style_changes_pixels_not_geometry() {
        let renderer = Renderer::default();
        let points = pts(&[&[1.0, 2.0], &[3.0, 4.0]]);

        let light = renderer
            .render(&points, &ChartSpec::new(ChartType::Scatter, Style::Default))
            .unwrap();
        let dark = renderer
            .render(&points, &ChartSpec::new(ChartType::Scatter, Style::DarkBackground))
            .unwrap();
        assert_ne!(light.bytes, dark.bytes);

        let scene = renderer.layout(&points, ChartType::Scatter).unwrap();
        assert_eq!(scene.marks.len(), 2);
    }

    #[test]
    fn test_network_edges_use_threshold() {
        let engine = DistanceEngine::default();
        let renderer = Renderer::new(
            RenderConfig {
                network_threshold: 1.5,
                ..RenderConfig::default()
            },
            engine,
        )
        .unwrap();
        let points = pts(&[&[0.0, 0.0, 9.0], &[1.0, 0.0, -9.0], &[5.0, 5.0, 0.0]]);
        assert_eq!(renderer.network_edges(&points).unwrap(), vec![(0, 1)]);
    }

    #[test]
    fn test_heatmap_needs_a_pixel_per_cell() {
        let renderer = Renderer::new(
            RenderConfig {
                width: 100,
                height: 60,
                margin: 10,
                ..RenderConfig::default()
            },
            DistanceEngine::default(),
        )
        .unwrap();

        let tall: Vec<Point> = (0..41).map(|i| Point::new(vec![i as f64])).collect();
        let result = renderer.layout(&tall, ChartType::Heatmap);
        assert!(matches!(result, Err(AnalysisError::ChartInput { .. })));

        let wide = vec![Point::new(vec![1.0; 81])];
        let result = renderer.layout(&wide, ChartType::Heatmap);
        assert!(matches!(result, Err(AnalysisError::ChartInput { .. })));

        let scene = renderer.layout(&tall[..40], ChartType::Heatmap).unwrap();
        for mark in &scene.marks {
            if let Mark::Cell { rect, .. } = mark {
                assert!(rect.bottom >= rect.top && rect.right >= rect.left);
            }
        }
    }

    #[test]
    fn test_renderer_rejects_bad_config() {
        let result = Renderer::new(
            RenderConfig {
                height: 0,
                ..RenderConfig::default()
            },
            DistanceEngine::default(),
        );
        assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))));
    }

    #[test]
    fn test_save_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let chart = Renderer::default()
            .render(
                &pts(&[&[1.0], &[2.0], &[2.5]]),
                &ChartSpec::new(ChartType::Histogram, Style::Ggplot),
            )
            .unwrap();
        chart.save(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), chart.bytes);
    }
}
