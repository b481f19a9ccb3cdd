//! Pixel-space chart geometry.
//!
//! A [`Scene`] is everything a chart draws, positioned in image pixels, with
//! no colors attached. Two renders of the same points and chart type produce
//! equal scenes whatever the style.

use crate::config::RenderConfig;
use crate::point::Point;

pub type Pixel = (i32, i32);

/// Axis-aligned rectangle in pixel coordinates (inclusive corners).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// What a mark represents; the theme picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Point,
    Node,
    Edge,
    Line,
    Mean,
    Median,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Dot { center: Pixel, radius: u32, role: Role },
    Segment { from: Pixel, to: Pixel, role: Role },
    Polyline { points: Vec<Pixel>, role: Role },
    /// Heatmap cell; `intensity` is the value normalized to `[0, 1]`.
    Cell { rect: PixelRect, intensity: f64 },
    Bar { rect: PixelRect },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLine {
    Vertical(i32),
    Horizontal(i32),
}

/// Horizontal placement of a label relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// What a label annotates; the theme picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Axis,
    Point,
    Legend(Role),
}

const TITLE_SIZE: u32 = 16;
const AXIS_SIZE: u32 = 12;
const POINT_LABEL_SIZE: u32 = 10;
const LEGEND_SIZE: u32 = 12;

/// A line of text anchored in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Vertically centered on the anchor; horizontally placed by `align`.
    pub anchor: Pixel,
    pub size: u32,
    pub align: Align,
    /// Rotated a quarter turn counter-clockwise.
    pub vertical: bool,
    pub role: TextRole,
}

impl Label {
    pub fn new(text: impl Into<String>, anchor: Pixel, size: u32, role: TextRole) -> Self {
        Self {
            text: text.into(),
            anchor,
            size,
            align: Align::Center,
            vertical: false,
            role,
        }
    }

    fn aligned(self, align: Align) -> Self {
        Self { align, ..self }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub plot_area: PixelRect,
    pub grid: Vec<GridLine>,
    /// Marks in drawing order.
    pub marks: Vec<Mark>,
    /// Text drawn over the marks.
    pub labels: Vec<Label>,
}

impl Scene {
    fn new(config: &RenderConfig) -> Self {
        let margin = config.margin as i32;
        Self {
            width: config.width,
            height: config.height,
            plot_area: PixelRect {
                left: margin,
                top: margin,
                right: config.width as i32 - margin - 1,
                bottom: config.height as i32 - margin - 1,
            },
            grid: Vec::new(),
            marks: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Title centered in the top margin, axis names in the bottom and left margins.
    fn annotate(&mut self, title: &str, x_label: &str, y_label: &str) {
        let area = self.plot_area;
        let bottom_margin = self.height as i32 - 1 - area.bottom;
        let center = ((area.left + area.right) / 2, (area.top + area.bottom) / 2);

        self.labels.push(Label::new(
            title,
            (self.width as i32 / 2, area.top / 2),
            TITLE_SIZE,
            TextRole::Title,
        ));
        self.labels.push(Label::new(
            x_label,
            (center.0, area.bottom + bottom_margin / 2),
            AXIS_SIZE,
            TextRole::Axis,
        ));
        self.labels.push(Label {
            vertical: true,
            ..Label::new(y_label, (area.left / 2, center.1), AXIS_SIZE, TextRole::Axis)
        });
    }

    /// Text of every label with the given role, in drawing order.
    pub fn label_texts(&self, role: TextRole) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|l| l.role == role)
            .map(|l| l.text.as_str())
            .collect()
    }

    /// Centers of all dots with the given role, in drawing order.
    pub fn dot_centers(&self, role: Role) -> Vec<Pixel> {
        self.marks
            .iter()
            .filter_map(|m| match m {
                Mark::Dot { center, role: r, .. } if *r == role => Some(*center),
                _ => None,
            })
            .collect()
    }
}

/// Data range mapped onto one pixel axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Axis {
    min: f64,
    max: f64,
}

impl Axis {
    /// Range covering `values` with 5% padding on each side.
    fn covering(values: impl IntoIterator<Item = f64>) -> Self {
        let (lo, hi) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        Axis::padded(lo, hi)
    }

    fn padded(lo: f64, hi: f64) -> Self {
        if !(hi > lo) {
            let center = if lo.is_finite() { lo } else { 0.0 };
            return Axis {
                min: center - 1.0,
                max: center + 1.0,
            };
        }
        let pad = (hi - lo) * 0.05;
        Axis {
            min: lo - pad,
            max: hi + pad,
        }
    }

    fn fraction(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    /// Round-numbered tick positions (steps of 1, 2 or 5 × 10^k) inside the range.
    fn ticks(&self) -> Vec<f64> {
        let raw = (self.max - self.min) / 5.0;
        if !(raw > 0.0) || !raw.is_finite() {
            return Vec::new();
        }
        let magnitude = 10f64.powf(raw.log10().floor());
        let step = match raw / magnitude {
            n if n < 1.5 => magnitude,
            n if n < 3.0 => 2.0 * magnitude,
            n if n < 7.0 => 5.0 * magnitude,
            _ => 10.0 * magnitude,
        };

        let first = (self.min / step).ceil() as i64;
        (0..=20)
            .map(|k| (first + k) as f64 * step)
            .take_while(|t| *t <= self.max)
            .collect()
    }
}

/// Mapping from data coordinates to the plot area.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    x: Axis,
    y: Axis,
    area: PixelRect,
}

impl Viewport {
    fn to_pixel(&self, x: f64, y: f64) -> Pixel {
        let px = self.area.left as f64 + self.x.fraction(x) * self.area.width() as f64;
        let py = self.area.bottom as f64 - self.y.fraction(y) * self.area.height() as f64;
        (px.round() as i32, py.round() as i32)
    }

    fn grid(&self) -> Vec<GridLine> {
        let vertical = self
            .x
            .ticks()
            .into_iter()
            .map(|t| GridLine::Vertical(self.to_pixel(t, self.y.min).0));
        let horizontal = self
            .y
            .ticks()
            .into_iter()
            .map(|t| GridLine::Horizontal(self.to_pixel(self.x.min, t).1));
        vertical.chain(horizontal).collect()
    }
}

fn xy_viewport(points: &[Point], area: PixelRect) -> (Viewport, Vec<(f64, f64)>) {
    let coords: Vec<(f64, f64)> = points.iter().filter_map(Point::xy).collect();
    let viewport = Viewport {
        x: Axis::covering(coords.iter().map(|c| c.0)),
        y: Axis::covering(coords.iter().map(|c| c.1)),
        area,
    };
    (viewport, coords)
}

/// One dot per point at its first two coordinates.
pub fn scatter(points: &[Point], config: &RenderConfig) -> Scene {
    let mut scene = Scene::new(config);
    let (viewport, coords) = xy_viewport(points, scene.plot_area);

    let centers: Vec<Pixel> = coords.iter().map(|&(x, y)| viewport.to_pixel(x, y)).collect();
    let offset = config.point_radius as i32 + 2;

    scene.grid = viewport.grid();
    scene.marks = centers
        .iter()
        .map(|&center| Mark::Dot {
            center,
            radius: config.point_radius,
            role: Role::Point,
        })
        .collect();
    scene.labels = centers
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            Label::new(
                format!("P{}", i),
                (x + offset, y - offset),
                POINT_LABEL_SIZE,
                TextRole::Point,
            )
            .aligned(Align::Left)
        })
        .collect();
    scene.annotate(
        "Distance Analysis - Point Distribution",
        "X Coordinate",
        "Y Coordinate",
    );
    scene
}

/// A path through the points in order, with a marker on each vertex.
pub fn line(points: &[Point], config: &RenderConfig) -> Scene {
    let mut scene = Scene::new(config);
    let (viewport, coords) = xy_viewport(points, scene.plot_area);

    let path: Vec<Pixel> = coords.iter().map(|&(x, y)| viewport.to_pixel(x, y)).collect();
    let markers = path.iter().map(|&center| Mark::Dot {
        center,
        radius: config.point_radius,
        role: Role::Point,
    });

    scene.grid = viewport.grid();
    scene.marks = std::iter::once(Mark::Polyline {
        points: path.clone(),
        role: Role::Line,
    })
    .chain(markers)
    .collect();
    scene.annotate("Point Sequence", "X Coordinate", "Y Coordinate");
    scene
}

/// Nodes at their first two coordinates, joined by the given edges.
///
/// Edges are drawn first so nodes sit on top of them.
pub fn network(points: &[Point], edges: &[(usize, usize)], config: &RenderConfig) -> Scene {
    let mut scene = Scene::new(config);
    let (viewport, coords) = xy_viewport(points, scene.plot_area);
    let pixels: Vec<Pixel> = coords.iter().map(|&(x, y)| viewport.to_pixel(x, y)).collect();

    let segments = edges.iter().map(|&(i, j)| Mark::Segment {
        from: pixels[i],
        to: pixels[j],
        role: Role::Edge,
    });
    let nodes = pixels.iter().map(|&center| Mark::Dot {
        center,
        radius: config.point_radius.saturating_add(3),
        role: Role::Node,
    });

    scene.grid = viewport.grid();
    scene.marks = segments.chain(nodes).collect();
    scene.labels = pixels
        .iter()
        .enumerate()
        .map(|(i, &center)| {
            Label::new(format!("P{}", i), center, POINT_LABEL_SIZE, TextRole::Point)
        })
        .collect();
    scene.annotate(
        &format!(
            "Network Plot (Connection Threshold: {})",
            config.network_threshold
        ),
        "X Coordinate",
        "Y Coordinate",
    );
    scene
}

/// One cell per coordinate, one row per point, first point at the top.
pub fn heatmap(points: &[Point], config: &RenderConfig) -> Scene {
    let mut scene = Scene::new(config);
    let area = scene.plot_area;
    let rows = points.len() as i64;
    let cols = points.first().map_or(0, Point::dimension) as i64;

    let (lo, hi) = points
        .iter()
        .flat_map(|p| p.as_slice().iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let normalize = |v: f64| if hi > lo { (v - lo) / (hi - lo) } else { 0.5 };

    let width = area.width() as i64 + 1;
    let height = area.height() as i64 + 1;
    let edge_x = |c: i64| area.left + (c * width / cols) as i32;
    let edge_y = |r: i64| area.top + (r * height / rows) as i32;

    for (r, point) in points.iter().enumerate() {
        let r = r as i64;
        for (c, value) in point.as_slice().iter().enumerate() {
            let c = c as i64;
            scene.marks.push(Mark::Cell {
                rect: PixelRect {
                    left: edge_x(c),
                    top: edge_y(r),
                    right: edge_x(c + 1) - 1,
                    bottom: edge_y(r + 1) - 1,
                },
                intensity: normalize(*value),
            });
        }
    }
    scene.annotate("Point Heatmap", "Coordinate Index", "Point Index");
    scene
}

/// Binned first coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin boundaries, ascending.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub mean: f64,
    pub median: f64,
}

impl Histogram {
    /// Bin `samples` into `bins` equal-width bins spanning their range.
    ///
    /// The last bin is closed on the right so the maximum lands in it. When
    /// every sample is equal the bins span one unit around that value.
    pub fn from_samples(samples: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (lo, hi) = samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, lo + 0.5) };
        let width = (hi - lo) / bins as f64;

        let edges: Vec<f64> = (0..=bins).map(|k| lo + k as f64 * width).collect();
        let mut counts = vec![0usize; bins];
        for &v in samples {
            let k = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[k] += 1;
        }

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Self {
            edges,
            counts,
            mean,
            median,
        }
    }
}

/// Bars for each non-empty bin plus vertical rules at the mean and median.
pub fn histogram(points: &[Point], config: &RenderConfig) -> Scene {
    let mut scene = Scene::new(config);
    let samples: Vec<f64> = points.iter().map(|p| p.as_slice()[0]).collect();
    let hist = Histogram::from_samples(&samples, config.histogram_bins);

    let peak = hist.counts.iter().copied().max().unwrap_or(1) as f64;
    let first = hist.edges[0];
    let last = hist.edges[hist.edges.len() - 1];
    let viewport = Viewport {
        x: Axis::padded(first, last),
        y: Axis {
            min: 0.0,
            max: peak * 1.1,
        },
        area: scene.plot_area,
    };

    let bars = hist
        .counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(k, &count)| {
            let (left, top) = viewport.to_pixel(hist.edges[k], count as f64);
            let (right, bottom) = viewport.to_pixel(hist.edges[k + 1], 0.0);
            Mark::Bar {
                rect: PixelRect {
                    left,
                    top,
                    right,
                    bottom,
                },
            }
        });

    let rule = |value: f64, role: Role| {
        let x = viewport.to_pixel(value, 0.0).0;
        Mark::Segment {
            from: (x, scene.plot_area.top),
            to: (x, scene.plot_area.bottom),
            role,
        }
    };
    let rules = [rule(hist.mean, Role::Mean), rule(hist.median, Role::Median)];

    let legend_x = scene.plot_area.right - 6;
    let legend_y = scene.plot_area.top + LEGEND_SIZE as i32;
    let legend = [
        (format!("Mean: {:.3}", hist.mean), Role::Mean),
        (format!("Median: {:.3}", hist.median), Role::Median),
    ];

    scene.grid = viewport.grid();
    scene.marks = bars.chain(rules).collect();
    scene.labels = legend
        .into_iter()
        .enumerate()
        .map(|(k, (text, role))| {
            let y = legend_y + k as i32 * (LEGEND_SIZE as i32 + 4);
            Label::new(text, (legend_x, y), LEGEND_SIZE, TextRole::Legend(role))
                .aligned(Align::Right)
        })
        .collect();
    scene.annotate("Distribution Histogram", "First Coordinate", "Frequency");
    scene
}
