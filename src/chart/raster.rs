//! Paint a scene into an RGB bitmap and encode it as PNG.
//!
//! Text is set in a font compiled into the binary, so output does not depend
//! on the fonts installed on the host.

use super::scene::{Align, GridLine, Label, Mark, PixelRect, Scene};
use super::theme::{Rgb, Theme};
use crate::error::{AnalysisError, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, DrawingAreaErrorKind};
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle, FontTransform};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Register the bundled font with plotters once per process.
fn register_fonts() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA)
                .map_err(|_| "cannot load bundled font: invalid font data".to_string())
        })
        .clone()
        .map_err(AnalysisError::Render)
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn render_error(err: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Render(err.to_string())
}

/// Paint `scene` with `theme` and return the PNG bytes.
pub fn paint(scene: &Scene, theme: &Theme) -> Result<Vec<u8>> {
    register_fonts()?;
    let (width, height) = (scene.width, scene.height);
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| render_error(format!("image {}x{} is too large", width, height)))?;

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(len)
        .map_err(|e| render_error(format!("cannot allocate {}x{} image: {}", width, height, e)))?;
    pixels.resize(len, 0u8);

    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw(&root, scene, theme).map_err(render_error)?;
        root.present().map_err(render_error)?;
    }

    encode_png(&pixels, width, height)
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    theme: &Theme,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let area = scene.plot_area;

    root.fill(&color(theme.background))?;
    root.draw(&Rectangle::new(
        corners(area),
        color(theme.plot_background).filled(),
    ))?;

    if let Some(grid) = theme.grid {
        let style = color(grid).stroke_width(1);
        for line in &scene.grid {
            let path = match *line {
                GridLine::Vertical(x) => vec![(x, area.top), (x, area.bottom)],
                GridLine::Horizontal(y) => vec![(area.left, y), (area.right, y)],
            };
            root.draw(&PathElement::new(path, style))?;
        }
    }

    for mark in &scene.marks {
        match mark {
            Mark::Dot {
                center,
                radius,
                role,
            } => {
                root.draw(&Circle::new(
                    *center,
                    *radius,
                    color(theme.role_color(*role)).filled(),
                ))?;
                root.draw(&Circle::new(
                    *center,
                    *radius,
                    color(theme.outline).stroke_width(1),
                ))?;
            }
            Mark::Segment { from, to, role } => {
                root.draw(&PathElement::new(
                    vec![*from, *to],
                    color(theme.role_color(*role)).stroke_width(2),
                ))?;
            }
            Mark::Polyline { points, role } => {
                root.draw(&PathElement::new(
                    points.clone(),
                    color(theme.role_color(*role)).stroke_width(2),
                ))?;
            }
            Mark::Cell { rect, intensity } => {
                root.draw(&Rectangle::new(
                    corners(*rect),
                    color(theme.heat(*intensity)).filled(),
                ))?;
            }
            Mark::Bar { rect } => {
                root.draw(&Rectangle::new(corners(*rect), color(theme.bar).filled()))?;
                root.draw(&Rectangle::new(
                    corners(*rect),
                    color(theme.outline).stroke_width(1),
                ))?;
            }
        }
    }

    if let Some(frame) = theme.frame {
        root.draw(&Rectangle::new(corners(area), color(frame).stroke_width(1)))?;
    }

    for label in &scene.labels {
        draw_label(root, label, theme)?;
    }
    Ok(())
}

fn draw_label<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    label: &Label,
    theme: &Theme,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let h_pos = match label.align {
        Align::Left => HPos::Left,
        Align::Center => HPos::Center,
        Align::Right => HPos::Right,
    };
    let style = (FONT_FAMILY, label.size as f64)
        .into_font()
        .color(&color(theme.text_color(label.role)))
        .pos(Pos::new(h_pos, VPos::Center));
    let style = if label.vertical {
        style.transform(FontTransform::Rotate270)
    } else {
        style
    };
    root.draw(&Text::new(label.text.as_str(), label.anchor, style))
}

fn corners(rect: PixelRect) -> [(i32, i32); 2] {
    [(rect.left, rect.top), (rect.right, rect.bottom)]
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(pixels, width, height, ColorType::Rgb8)
        .map_err(render_error)?;
    Ok(bytes)
}
