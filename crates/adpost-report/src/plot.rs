//! SVG rendering of density curves and sample histograms.
//!
//! Images are plain SVG documents built with `format!`, so a plot is a pure
//! function of its inputs and needs no drawing backend or global figure
//! state. Every image of a report shares one [`PlotStyle`] and therefore the
//! same dimensions.

use crate::config::PlotStyle;
use crate::density::{render_curve, DensityCurve, DEFAULT_CURVE_POINTS};
use crate::error::Result;
use crate::html::html_escape;
use adpost_common::Metric;
use adpost_math::{DistributionFamily, PosteriorParams};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Histogram bins used by [`rasterize_histogram`].
pub const HISTOGRAM_BINS: usize = 30;

/// Axis titles for one plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisLabels {
    pub x: String,
    pub y: String,
}

impl AxisLabels {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// Metric-specific x label over a "Density" y axis.
    pub fn for_metric(metric: Metric) -> Self {
        Self::new(metric.axis_label(), "Density")
    }

    /// Generic x label for a family when no metric is known.
    pub fn for_family(family: DistributionFamily) -> Self {
        let x = match family {
            DistributionFamily::Beta => "Rate",
            DistributionFamily::InverseGamma => "Cost",
            DistributionFamily::Gamma => "Ratio",
            DistributionFamily::LogNormal => "Value",
        };
        Self::new(x, "Density")
    }
}

/// Data-to-pixel mapping for one plot area.
struct Frame<'a> {
    style: &'a PlotStyle,
    x_lo: f64,
    x_hi: f64,
    y_hi: f64,
}

impl<'a> Frame<'a> {
    fn new(style: &'a PlotStyle, (x_lo, x_hi): (f64, f64), y_hi: f64) -> Self {
        let x_hi = if x_hi > x_lo { x_hi } else { x_lo + 1.0 };
        let y_hi = if y_hi.is_finite() && y_hi > 0.0 { y_hi * 1.05 } else { 1.0 };
        Self {
            style,
            x_lo,
            x_hi,
            y_hi,
        }
    }

    fn left(&self) -> f64 {
        self.style.margin_left as f64
    }

    fn right(&self) -> f64 {
        self.style.width.saturating_sub(self.style.margin_right) as f64
    }

    fn top(&self) -> f64 {
        self.style.margin_top as f64
    }

    fn bottom(&self) -> f64 {
        self.style.height.saturating_sub(self.style.margin_bottom) as f64
    }

    fn px(&self, x: f64) -> f64 {
        self.left() + (x - self.x_lo) / (self.x_hi - self.x_lo) * (self.right() - self.left())
    }

    fn py(&self, y: f64) -> f64 {
        self.bottom() - (y / self.y_hi).clamp(0.0, 1.0) * (self.bottom() - self.top())
    }

    /// Opening tag, background, title, axes, ticks and axis labels.
    fn open(&self, title: &str, labels: &AxisLabels) -> String {
        let s = self.style;
        let font = s.font_size;
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="{font}">"#,
            w = s.width,
            h = s.height,
        );
        let _ = write!(
            svg,
            r##"<rect width="100%" height="100%" fill="#ffffff"/><text x="{cx:.1}" y="{ty:.1}" text-anchor="middle" font-size="{tf}" font-weight="bold">{title}</text>"##,
            cx = (self.left() + self.right()) / 2.0,
            ty = self.top() / 2.0 + font as f64 / 2.0,
            tf = font + 2,
            title = html_escape(title),
        );
        let _ = write!(
            svg,
            r##"<g stroke="#333333" stroke-width="1"><line class="axis-x" x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}"/><line class="axis-y" x1="{l:.1}" y1="{b:.1}" x2="{l:.1}" y2="{t:.1}"/></g>"##,
            l = self.left(),
            r = self.right(),
            b = self.bottom(),
            t = self.top(),
        );

        let n = s.ticks;
        for i in 0..n {
            let frac = i as f64 / (n - 1) as f64;
            let xv = self.x_lo + frac * (self.x_hi - self.x_lo);
            let x = self.px(xv);
            let _ = write!(
                svg,
                r##"<line class="tick" x1="{x:.1}" y1="{b:.1}" x2="{x:.1}" y2="{b2:.1}" stroke="#333333"/><text x="{x:.1}" y="{ly:.1}" text-anchor="middle">{v}</text>"##,
                b = self.bottom(),
                b2 = self.bottom() + 5.0,
                ly = self.bottom() + 7.0 + font as f64,
                v = format_tick(xv),
            );
            let yv = frac * self.y_hi;
            let y = self.py(yv);
            let _ = write!(
                svg,
                r##"<line class="tick" x1="{l2:.1}" y1="{y:.1}" x2="{l:.1}" y2="{y:.1}" stroke="#333333"/><text x="{lx:.1}" y="{yt:.1}" text-anchor="end">{v}</text>"##,
                l = self.left(),
                l2 = self.left() - 5.0,
                lx = self.left() - 8.0,
                yt = y + font as f64 / 3.0,
                v = format_tick(yv),
            );
        }

        let _ = write!(
            svg,
            r#"<text class="label-x" x="{cx:.1}" y="{y:.1}" text-anchor="middle">{x}</text><text class="label-y" transform="translate({lx:.1},{cy:.1}) rotate(-90)" text-anchor="middle">{ylab}</text>"#,
            cx = (self.left() + self.right()) / 2.0,
            y = s.height as f64 - font as f64 / 2.0,
            x = html_escape(&labels.x),
            lx = font as f64 + 2.0,
            cy = (self.top() + self.bottom()) / 2.0,
            ylab = html_escape(&labels.y),
        );
        svg
    }

    fn curve(&self, svg: &mut String, curve: &DensityCurve) {
        let s = self.style;
        let mut points = String::new();
        for (x, y) in curve.points() {
            if x < self.x_lo || x > self.x_hi {
                continue;
            }
            let _ = write!(points, "{:.2},{:.2} ", self.px(x), self.py(y));
        }
        let points = points.trim_end();
        if points.is_empty() {
            return;
        }
        if s.fill_opacity > 0.0 {
            let (lo, hi) = curve.x_range();
            let _ = write!(
                svg,
                r#"<polygon class="area" points="{x0:.2},{b:.2} {points} {x1:.2},{b:.2}" fill="{c}" fill-opacity="{o}" stroke="none"/>"#,
                x0 = self.px(lo.max(self.x_lo)),
                x1 = self.px(hi.min(self.x_hi)),
                b = self.bottom(),
                c = s.line_color,
                o = s.fill_opacity,
            );
        }
        let _ = write!(
            svg,
            r#"<polyline class="curve" points="{points}" fill="none" stroke="{c}" stroke-width="{w}" stroke-linejoin="round"/>"#,
            c = s.line_color,
            w = s.stroke_width,
        );
    }
}

/// Tick text with about three significant digits.
fn format_tick(v: f64) -> String {
    if v == 0.0 || !v.is_finite() {
        return "0".to_string();
    }
    let digits = (2 - v.abs().log10().floor() as i32).clamp(0, 6) as usize;
    let text = format!("{v:.digits$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Render a density curve as a standalone SVG document.
pub fn rasterize(curve: &DensityCurve, title: &str, labels: &AxisLabels, style: &PlotStyle) -> Vec<u8> {
    let frame = Frame::new(style, curve.x_range(), curve.y_max());
    let mut svg = frame.open(title, labels);
    frame.curve(&mut svg, curve);
    svg.push_str("</svg>\n");
    svg.into_bytes()
}

/// Render sample draws as a density-normalized histogram, optionally with
/// the analytic curve drawn over it.
pub fn rasterize_histogram(
    draws: &[f64],
    overlay: Option<&DensityCurve>,
    title: &str,
    labels: &AxisLabels,
    style: &PlotStyle,
) -> Vec<u8> {
    let finite: Vec<f64> = draws.iter().copied().filter(|d| d.is_finite()).collect();
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (range, heights) = if finite.is_empty() {
        ((0.0, 1.0), Vec::new())
    } else {
        let width = if hi > lo { (hi - lo) / HISTOGRAM_BINS as f64 } else { 1.0 };
        let mut counts = vec![0usize; HISTOGRAM_BINS];
        for d in &finite {
            let bin = (((d - lo) / width) as usize).min(HISTOGRAM_BINS - 1);
            counts[bin] += 1;
        }
        let norm = finite.len() as f64 * width;
        let heights: Vec<f64> = counts.iter().map(|c| *c as f64 / norm).collect();
        ((lo, lo + width * HISTOGRAM_BINS as f64), heights)
    };

    let overlay_max = overlay
        .map(|c| {
            c.points()
                .filter(|(x, _)| *x >= range.0 && *x <= range.1)
                .map(|(_, y)| y)
                .fold(0.0, f64::max)
        })
        .unwrap_or(0.0);
    let y_max = heights.iter().copied().fold(overlay_max, f64::max);

    let frame = Frame::new(style, range, y_max);
    let mut svg = frame.open(title, labels);
    let bin_width = (range.1 - range.0) / HISTOGRAM_BINS as f64;
    for (i, h) in heights.iter().enumerate() {
        let x0 = frame.px(range.0 + bin_width * i as f64);
        let x1 = frame.px(range.0 + bin_width * (i + 1) as f64);
        let top = frame.py(*h);
        let _ = write!(
            svg,
            r##"<rect class="bin" x="{x0:.2}" y="{top:.2}" width="{w:.2}" height="{ht:.2}" fill="#9ecae1" stroke="#ffffff" stroke-width="0.5"/>"##,
            w = (x1 - x0).max(0.0),
            ht = (frame.bottom() - top).max(0.0),
        );
    }
    if let Some(curve) = overlay {
        frame.curve(&mut svg, curve);
    }
    svg.push_str("</svg>\n");
    svg.into_bytes()
}

/// Render a curve and write it to `path`, creating parent directories.
pub fn save_plot(
    curve: &DensityCurve,
    title: &str,
    labels: &AxisLabels,
    style: &PlotStyle,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = rasterize(curve, title, labels, style);
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "Plot saved");
    Ok(())
}

/// Save one posterior plot with default styling and metric axis labels.
pub fn save_posterior_plot(params: &PosteriorParams, label: &str, metric: Metric, path: &Path) -> Result<()> {
    let curve = render_curve(params, DEFAULT_CURVE_POINTS)?;
    let title = format!("{} Posterior for {}", metric.name(), label);
    save_plot(
        &curve,
        &title,
        &AxisLabels::for_metric(metric),
        &PlotStyle::default(),
        path,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svg_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(1300.0), "1300");
        assert_eq!(format_tick(12.345), "12.3");
        assert_eq!(format_tick(0.0012345), "0.00123");
    }

    #[test]
    fn svg_has_title_axes_and_curve() {
        let curve = render_curve(&PosteriorParams::beta(93.0, 909.0).unwrap(), 300).unwrap();
        let svg = svg_text(rasterize(
            &curve,
            "CTR Posterior for Ad <A>",
            &AxisLabels::for_metric(Metric::Ctr),
            &PlotStyle::default(),
        ));
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Ad &lt;A&gt;"));
        assert!(svg.contains(r#"class="axis-x""#));
        assert!(svg.contains(r#"class="axis-y""#));
        assert!(svg.contains(">CTR</text>"));
        assert!(svg.contains(">Density</text>"));
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn dimensions_follow_style() {
        let style = PlotStyle {
            width: 500,
            height: 250,
            ..PlotStyle::default()
        };
        let curve = render_curve(&PosteriorParams::gamma(5.0, 0.4).unwrap(), 50).unwrap();
        let svg = svg_text(rasterize(&curve, "t", &AxisLabels::new("x", "y"), &style));
        assert!(svg.contains(r#"width="500" height="250""#));
    }

    #[test]
    fn rasterize_is_deterministic() {
        let curve = render_curve(&PosteriorParams::inverse_gamma(14.0, 1300.0).unwrap(), 300).unwrap();
        let labels = AxisLabels::for_metric(Metric::Cpa);
        let style = PlotStyle::default();
        assert_eq!(
            rasterize(&curve, "CPA", &labels, &style),
            rasterize(&curve, "CPA", &labels, &style)
        );
    }

    #[test]
    fn histogram_has_one_rect_per_bin() {
        let draws: Vec<f64> = (0..200).map(|i| i as f64 / 200.0).collect();
        let overlay = render_curve(&PosteriorParams::beta(1.0, 1.0).unwrap(), 50).unwrap();
        let svg = svg_text(rasterize_histogram(
            &draws,
            Some(&overlay),
            "Draws",
            &AxisLabels::new("Rate", "Density"),
            &PlotStyle::default(),
        ));
        assert_eq!(svg.matches(r#"class="bin""#).count(), HISTOGRAM_BINS);
        assert_eq!(svg.matches("<polyline").count(), 1);
    }

    #[test]
    fn save_posterior_plot_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots/nested/roas_ad_a.svg");
        let params = PosteriorParams::gamma(14.0, 200.0 / 1300.0).unwrap();
        save_posterior_plot(&params, "Ad A", Metric::Roas, &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("ROAS Posterior for Ad A"));
        assert!(svg.contains("Return on Ad Spend (Revenue/Cost)"));
    }
}
