//! Posterior density curves.
//!
//! A curve is a pure function of the posterior parameters and the sample
//! count: `num_points` evenly spaced x values over a family-specific support
//! window and the density at each of them.
//!
//! | family          | window                                   |
//! |-----------------|------------------------------------------|
//! | `beta`          | `[0, 1]`                                 |
//! | `inverse-gamma` | `[0, 3·mean]`, mean = β/(α−1), or β if α ≤ 1 |
//! | `gamma`         | `[0, 3·shape·scale]`                     |
//! | `lognormal`     | `[0, exp(μ + σ·z₀.₉₉₅)]`                 |

use adpost_math::{
    inv_gamma_mean, std_normal_inv_cdf, DistributionFamily, MathError, PosteriorParams,
    Result as MathResult,
};
use serde::Serialize;

/// Samples per curve unless configured otherwise.
pub const DEFAULT_CURVE_POINTS: usize = 300;

/// Quantile that bounds the log-normal window.
const LOGNORMAL_UPPER_QUANTILE: f64 = 0.995;

/// Sampled density of one posterior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    params: PosteriorParams,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl DensityCurve {
    pub fn params(&self) -> &PosteriorParams {
        &self.params
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// `(x, y)` pairs in ascending x.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// `(first x, last x)`.
    pub fn x_range(&self) -> (f64, f64) {
        match (self.xs.first(), self.xs.last()) {
            (Some(lo), Some(hi)) => (*lo, *hi),
            _ => (0.0, 0.0),
        }
    }

    pub fn y_max(&self) -> f64 {
        self.ys.iter().copied().fold(0.0, f64::max)
    }
}

/// Support window `[lo, hi]` the curve for `params` is drawn over.
pub fn support_window(params: &PosteriorParams) -> MathResult<(f64, f64)> {
    let (p1, p2) = params.params();
    let hi = match params.family() {
        DistributionFamily::Beta => 1.0,
        DistributionFamily::InverseGamma => 3.0 * inv_gamma_mean(p1, p2).unwrap_or(p2),
        DistributionFamily::Gamma => 3.0 * p1 * p2,
        DistributionFamily::LogNormal => (p1 + p2 * std_normal_inv_cdf(LOGNORMAL_UPPER_QUANTILE)).exp(),
    };
    if !(hi.is_finite() && hi > 0.0) {
        return Err(MathError::InvalidParameter {
            name: "params",
            reason: format!("{params} has no finite plotting window (upper bound {hi})"),
        });
    }
    Ok((0.0, hi))
}

/// Sample the density of `params` at `num_points` evenly spaced points.
pub fn render_curve(params: &PosteriorParams, num_points: usize) -> MathResult<DensityCurve> {
    if num_points < 2 {
        return Err(MathError::InvalidParameter {
            name: "num_points",
            reason: format!("a curve needs at least 2 points (got {num_points})"),
        });
    }
    let (lo, hi) = support_window(params)?;
    let step = (hi - lo) / (num_points - 1) as f64;

    let mut xs: Vec<f64> = (0..num_points).map(|i| lo + step * i as f64).collect();
    xs[num_points - 1] = hi;

    let mut ys: Vec<f64> = xs.iter().map(|&x| params.pdf(x)).collect();

    // Densities can diverge at the window edges (Beta with α < 1 at 0).
    let last = num_points - 1;
    if !ys[0].is_finite() {
        ys[0] = ys[1];
    }
    if !ys[last].is_finite() {
        ys[last] = ys[last - 1];
    }
    for y in ys.iter_mut() {
        if !y.is_finite() || *y < 0.0 {
            *y = 0.0;
        }
    }

    Ok(DensityCurve {
        params: *params,
        xs,
        ys,
    })
}

/// [`render_curve`] from a textual family tag.
pub fn render_curve_tagged(tag: &str, p1: f64, p2: f64, num_points: usize) -> MathResult<DensityCurve> {
    let params = PosteriorParams::from_tag(tag, p1, p2)?;
    render_curve(&params, num_points)
}

/// Trapezoid-rule area under the sampled curve.
pub fn trapezoid_area(curve: &DensityCurve) -> f64 {
    curve
        .xs
        .windows(2)
        .zip(curve.ys.windows(2))
        .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn beta_window_is_unit_interval() {
        let curve = render_curve(&PosteriorParams::beta(93.0, 909.0).unwrap(), 300).unwrap();
        assert_eq!(curve.len(), 300);
        assert_eq!(curve.x_range(), (0.0, 1.0));
        assert!(curve.ys().iter().all(|y| y.is_finite() && *y >= 0.0));
    }

    #[test]
    fn inverse_gamma_window_uses_mean() {
        let params = PosteriorParams::inverse_gamma(14.0, 1300.0).unwrap();
        let (lo, hi) = support_window(&params).unwrap();
        assert_eq!(lo, 0.0);
        assert!(approx_eq(hi, 300.0, 1e-9), "hi={hi}");
    }

    #[test]
    fn inverse_gamma_heavy_tail_falls_back_to_scale() {
        let params = PosteriorParams::inverse_gamma(0.5, 100.0).unwrap();
        assert_eq!(support_window(&params).unwrap(), (0.0, 300.0));
        let curve = render_curve(&params, 300).unwrap();
        assert!(curve.ys().iter().all(|y| y.is_finite() && *y >= 0.0));
    }

    #[test]
    fn gamma_window_is_three_means() {
        let params = PosteriorParams::gamma(14.0, 200.0 / 1300.0).unwrap();
        let (_, hi) = support_window(&params).unwrap();
        assert!(approx_eq(hi, 3.0 * 14.0 * 200.0 / 1300.0, 1e-12));
    }

    #[test]
    fn lognormal_window_is_upper_quantile() {
        let params = PosteriorParams::lognormal(0.0, 1.0).unwrap();
        let (_, hi) = support_window(&params).unwrap();
        // z(0.995) ≈ 2.5758
        assert!(approx_eq(hi, 2.575_829_f64.exp(), 1e-3), "hi={hi}");
    }

    #[test]
    fn x_values_are_evenly_spaced_and_inclusive() {
        let curve = render_curve(&PosteriorParams::beta(2.0, 5.0).unwrap(), 11).unwrap();
        for (i, x) in curve.xs().iter().enumerate() {
            assert!(approx_eq(*x, i as f64 / 10.0, 1e-12));
        }
    }

    #[test]
    fn fewer_than_two_points_rejected() {
        let params = PosteriorParams::beta(2.0, 5.0).unwrap();
        for n in [0, 1] {
            assert!(matches!(
                render_curve(&params, n),
                Err(MathError::InvalidParameter { name: "num_points", .. })
            ));
        }
        assert_eq!(render_curve(&params, 2).unwrap().len(), 2);
    }

    #[test]
    fn divergent_endpoint_takes_neighbour() {
        let curve = render_curve(&PosteriorParams::beta(0.5, 0.5).unwrap(), 50).unwrap();
        let ys = curve.ys();
        assert_eq!(ys[0], ys[1]);
        assert_eq!(ys[49], ys[48]);
        assert!(ys.iter().all(|y| y.is_finite()));
    }

    #[test]
    fn unknown_tag_rejected() {
        assert!(matches!(
            render_curve_tagged("weibull", 1.0, 1.0, 10),
            Err(MathError::UnknownDistributionFamily(_))
        ));
        let tagged = render_curve_tagged("lognorm", 0.5, 0.25, 20).unwrap();
        assert_eq!(tagged.params().family(), DistributionFamily::LogNormal);
    }

    #[test]
    fn rendering_is_deterministic() {
        let params = PosteriorParams::gamma(5.0, 0.4).unwrap();
        assert_eq!(render_curve(&params, 300).unwrap(), render_curve(&params, 300).unwrap());
    }

    #[test]
    fn concentrated_curves_integrate_to_one() {
        for params in [
            PosteriorParams::beta(93.0, 909.0).unwrap(),
            PosteriorParams::inverse_gamma(20.0, 500.0).unwrap(),
            PosteriorParams::gamma(14.0, 0.1538).unwrap(),
        ] {
            let area = trapezoid_area(&render_curve(&params, 300).unwrap());
            assert!(approx_eq(area, 1.0, 1e-2), "{params}: area={area}");
        }
    }
}
