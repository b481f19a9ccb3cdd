//! Color themes for the named chart styles.

use super::scene::{Role, TextRole};
use super::Style;

pub type Rgb = (u8, u8, u8);

/// Colors used to paint a scene. Nothing here affects geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Rgb,
    pub plot_background: Rgb,
    /// `None` hides the gridlines.
    pub grid: Option<Rgb>,
    pub frame: Option<Rgb>,
    pub point: Rgb,
    pub outline: Rgb,
    pub text: Rgb,
    pub node: Rgb,
    pub edge: Rgb,
    pub line: Rgb,
    pub bar: Rgb,
    pub mean: Rgb,
    pub median: Rgb,
    /// Heatmap gradient: low, middle, high.
    pub colormap: [Rgb; 3],
}

impl Theme {
    pub fn for_style(style: Style) -> Self {
        match style {
            Style::Default => Theme {
                background: (255, 255, 255),
                plot_background: (255, 255, 255),
                grid: Some((223, 223, 223)),
                frame: Some((44, 62, 80)),
                point: (31, 119, 180),
                outline: (44, 62, 80),
                text: (0, 0, 0),
                node: (173, 216, 230),
                edge: (90, 90, 90),
                line: (31, 119, 180),
                bar: (135, 206, 235),
                mean: (214, 39, 40),
                median: (44, 160, 44),
                colormap: [(59, 76, 192), (221, 221, 221), (180, 4, 38)],
            },
            Style::Seaborn => Theme {
                background: (255, 255, 255),
                plot_background: (234, 234, 242),
                grid: Some((255, 255, 255)),
                frame: None,
                point: (76, 114, 176),
                outline: (255, 255, 255),
                text: (36, 36, 36),
                node: (129, 114, 179),
                edge: (85, 85, 85),
                line: (76, 114, 176),
                bar: (85, 168, 104),
                mean: (196, 78, 82),
                median: (221, 132, 82),
                colormap: [(250, 235, 221), (225, 51, 66), (3, 5, 26)],
            },
            Style::Ggplot => Theme {
                background: (255, 255, 255),
                plot_background: (229, 229, 229),
                grid: Some((255, 255, 255)),
                frame: None,
                point: (226, 74, 51),
                outline: (85, 85, 85),
                text: (85, 85, 85),
                node: (251, 193, 94),
                edge: (119, 119, 119),
                line: (52, 138, 189),
                bar: (52, 138, 189),
                mean: (226, 74, 51),
                median: (152, 142, 213),
                colormap: [(19, 43, 67), (51, 102, 153), (86, 177, 247)],
            },
            Style::DarkBackground => Theme {
                background: (0, 0, 0),
                plot_background: (0, 0, 0),
                grid: Some((64, 64, 64)),
                frame: Some((255, 255, 255)),
                point: (142, 186, 229),
                outline: (255, 255, 255),
                text: (255, 255, 255),
                node: (142, 186, 229),
                edge: (190, 190, 190),
                line: (254, 255, 179),
                bar: (141, 211, 199),
                mean: (250, 128, 114),
                median: (179, 222, 105),
                colormap: [(68, 1, 84), (33, 145, 140), (253, 231, 37)],
            },
        }
    }

    /// Color for a mark role.
    pub fn role_color(&self, role: Role) -> Rgb {
        match role {
            Role::Point => self.point,
            Role::Node => self.node,
            Role::Edge => self.edge,
            Role::Line => self.line,
            Role::Mean => self.mean,
            Role::Median => self.median,
        }
    }

    /// Color for a label; legend entries match the mark they describe.
    pub fn text_color(&self, role: TextRole) -> Rgb {
        match role {
            TextRole::Legend(mark) => self.role_color(mark),
            TextRole::Title | TextRole::Axis | TextRole::Point => self.text,
        }
    }

    /// Heatmap color for a normalized value.
    pub fn heat(&self, intensity: f64) -> Rgb {
        let t = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            0.5
        };
        let [low, mid, high] = self.colormap;
        if t < 0.5 {
            lerp(low, mid, t * 2.0)
        } else {
            lerp(mid, high, (t - 0.5) * 2.0)
        }
    }
}

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let channel = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (channel(a.0, b.0), channel(a.1, b.1), channel(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_endpoints() {
        let theme = Theme::for_style(Style::Default);
        assert_eq!(theme.heat(0.0), theme.colormap[0]);
        assert_eq!(theme.heat(0.5), theme.colormap[1]);
        assert_eq!(theme.heat(1.0), theme.colormap[2]);
        assert_eq!(theme.heat(7.0), theme.colormap[2]);
    }

    #[test]
    fn test_styles_differ() {
        let themes: Vec<Theme> = Style::ALL.iter().map(|s| Theme::for_style(*s)).collect();
        for i in 0..themes.len() {
            for j in i + 1..themes.len() {
                assert_ne!(themes[i], themes[j]);
            }
        }
    }

    #[test]
    fn test_dark_background() {
        let theme = Theme::for_style(Style::DarkBackground);
        assert_eq!(theme.background, (0, 0, 0));
        assert_eq!(theme.text_color(TextRole::Title), (255, 255, 255));
    }

    #[test]
    fn test_legend_text_matches_rule() {
        let theme = Theme::for_style(Style::Ggplot);
        assert_eq!(theme.text_color(TextRole::Legend(Role::Median)), theme.median);
    }
}
