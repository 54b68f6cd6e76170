//! Report configuration types.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};

/// Report color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTheme {
    /// Light theme.
    Light,
    /// Dark theme.
    Dark,
    /// Auto-detect from system preference.
    #[default]
    Auto,
}

impl ReportTheme {
    /// Get the CSS class for this theme.
    pub fn css_class(&self) -> &'static str {
        match self {
            ReportTheme::Light => "light",
            ReportTheme::Dark => "dark",
            ReportTheme::Auto => "",
        }
    }
}

/// Plot dimensions and strokes shared by every image of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Space reserved for the title.
    #[serde(default = "default_margin_top")]
    pub margin_top: u32,
    #[serde(default = "default_margin_right")]
    pub margin_right: u32,
    /// Space reserved for x ticks and the x label.
    #[serde(default = "default_margin_bottom")]
    pub margin_bottom: u32,
    /// Space reserved for y ticks and the y label.
    #[serde(default = "default_margin_left")]
    pub margin_left: u32,
    /// Curve stroke width.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Curve colour as `#rgb` or `#rrggbb`.
    #[serde(default = "default_line_color")]
    pub line_color: String,
    /// Opacity of the area under the curve; 0 disables the fill.
    #[serde(default = "default_fill_opacity")]
    pub fill_opacity: f64,
    /// Ticks per axis, endpoints included.
    #[serde(default = "default_ticks")]
    pub ticks: usize,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    320
}

fn default_margin_top() -> u32 {
    36
}

fn default_margin_right() -> u32 {
    24
}

fn default_margin_bottom() -> u32 {
    56
}

fn default_margin_left() -> u32 {
    72
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_line_color() -> String {
    "#1f77b4".to_string()
}

fn default_fill_opacity() -> f64 {
    0.15
}

fn default_ticks() -> usize {
    5
}

fn default_font_size() -> u32 {
    12
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin_top: default_margin_top(),
            margin_right: default_margin_right(),
            margin_bottom: default_margin_bottom(),
            margin_left: default_margin_left(),
            stroke_width: default_stroke_width(),
            line_color: default_line_color(),
            fill_opacity: default_fill_opacity(),
            ticks: default_ticks(),
            font_size: default_font_size(),
        }
    }
}

impl PlotStyle {
    pub fn validate(&self) -> Result<()> {
        let horizontal = self.margin_left.checked_add(self.margin_right);
        if horizontal.map_or(true, |m| m >= self.width) {
            return Err(ReportError::InvalidConfig(format!(
                "plot width {} leaves no room inside margins",
                self.width
            )));
        }
        let vertical = self.margin_top.checked_add(self.margin_bottom);
        if vertical.map_or(true, |m| m >= self.height) {
            return Err(ReportError::InvalidConfig(format!(
                "plot height {} leaves no room inside margins",
                self.height
            )));
        }
        if !(self.stroke_width.is_finite() && self.stroke_width > 0.0) {
            return Err(ReportError::InvalidConfig(
                "stroke_width must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fill_opacity) {
            return Err(ReportError::InvalidConfig(
                "fill_opacity must be within [0, 1]".to_string(),
            ));
        }
        if self.ticks < 2 {
            return Err(ReportError::InvalidConfig(
                "at least two ticks per axis are required".to_string(),
            ));
        }
        let hex = self.line_color.strip_prefix('#').unwrap_or("");
        if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ReportError::InvalidConfig(format!(
                "line_color must be #rgb or #rrggbb, got {:?}",
                self.line_color
            )));
        }
        Ok(())
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Document title.
    #[serde(default = "default_title")]
    pub title: String,
    /// Color theme.
    #[serde(default)]
    pub theme: ReportTheme,
    /// Samples per density curve.
    #[serde(default = "default_curve_points")]
    pub curve_points: usize,
    /// Probability mass of the credible intervals in summary tables.
    #[serde(default = "default_credible_mass")]
    pub credible_mass: f64,
    /// Plot dimensions and strokes.
    #[serde(default)]
    pub plot: PlotStyle,
}

fn default_schema_version() -> String {
    "1.0.0".to_string()
}

fn default_title() -> String {
    "Client Marketing Report".to_string()
}

fn default_curve_points() -> usize {
    crate::density::DEFAULT_CURVE_POINTS
}

fn default_credible_mass() -> f64 {
    0.95
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            title: default_title(),
            theme: ReportTheme::default(),
            curve_points: default_curve_points(),
            credible_mass: default_credible_mass(),
            plot: PlotStyle::default(),
        }
    }
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: ReportTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_curve_points(mut self, points: usize) -> Self {
        self.curve_points = points;
        self
    }

    pub fn with_credible_mass(mut self, mass: f64) -> Self {
        self.credible_mass = mass;
        self
    }

    pub fn with_plot_style(mut self, plot: PlotStyle) -> Self {
        self.plot = plot;
        self
    }

    /// Check every setting the renderer depends on.
    pub fn validate(&self) -> Result<()> {
        if self.curve_points < 2 {
            return Err(ReportError::InvalidConfig(format!(
                "curve_points must be at least 2, got {}",
                self.curve_points
            )));
        }
        if !(self.credible_mass > 0.0 && self.credible_mass < 1.0) {
            return Err(ReportError::InvalidConfig(format!(
                "credible_mass must be in (0, 1), got {}",
                self.credible_mass
            )));
        }
        self.plot.validate()
    }

    /// Load and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
