//! Inverse-Gamma kernels (shape `α`, scale `β`).
//!
//! CPA posteriors: `f(x) = β^α / Γ(α) · x^(-α-1) · e^(-β/x)` for x > 0.
//! If `X ~ InvGamma(α, β)` then `1/X ~ Gamma(α, rate = β)`, which is how the
//! CDF and quantile are evaluated.

use super::gamma::{gamma_inv_cdf, gamma_p};
use super::stable::{exp_density, ln_gamma};

fn valid(shape: f64, scale: f64) -> bool {
    shape > 0.0 && scale > 0.0 && shape.is_finite() && scale.is_finite()
}

/// ln f(x | α, β).
pub fn inv_gamma_log_pdf(x: f64, shape: f64, scale: f64) -> f64 {
    if x.is_nan() || !valid(shape, scale) {
        return f64::NAN;
    }
    // e^(-β/x) dominates every power of x as x -> 0+.
    if x <= 0.0 {
        return f64::NEG_INFINITY;
    }
    shape * scale.ln() - ln_gamma(shape) - (shape + 1.0) * x.ln() - scale / x
}

/// f(x | α, β).
pub fn inv_gamma_pdf(x: f64, shape: f64, scale: f64) -> f64 {
    exp_density(inv_gamma_log_pdf(x, shape, scale))
}

/// P(X ≤ x) = Q(α, β/x).
pub fn inv_gamma_cdf(x: f64, shape: f64, scale: f64) -> f64 {
    if x.is_nan() || !valid(shape, scale) {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    1.0 - gamma_p(shape, scale / x)
}

/// Quantile: `x_p = β / G⁻¹(1 − p; α, 1)`.
pub fn inv_gamma_inv_cdf(p: f64, shape: f64, scale: f64) -> f64 {
    if p.is_nan() || !valid(shape, scale) {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    scale / gamma_inv_cdf(1.0 - p, shape, 1.0)
}

/// E[X] = β / (α − 1), defined only for α > 1.
pub fn inv_gamma_mean(shape: f64, scale: f64) -> Option<f64> {
    if !valid(shape, scale) || shape <= 1.0 {
        return None;
    }
    Some(scale / (shape - 1.0))
}

/// Mode = β / (α + 1).
pub fn inv_gamma_mode(shape: f64, scale: f64) -> f64 {
    if !valid(shape, scale) {
        return f64::NAN;
    }
    scale / (shape + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        !a.is_nan() && !b.is_nan() && (a - b).abs() <= tol
    }

    #[test]
    fn density_matches_hand_computation() {
        // InvGamma(1, 1) at x = 1: x^-2 e^-1
        assert!(close(inv_gamma_pdf(1.0, 1.0, 1.0), (-1.0f64).exp(), 1e-12));
        // InvGamma(2, 3) at x = 1.5: 9 * 1.5^-3 * e^-2
        let expected = 9.0 * 1.5f64.powi(-3) * (-2.0f64).exp();
        assert!(close(inv_gamma_pdf(1.5, 2.0, 3.0), expected, 1e-12));
    }

    #[test]
    fn density_vanishes_at_and_below_zero() {
        assert_eq!(inv_gamma_pdf(0.0, 0.5, 1.0), 0.0);
        assert_eq!(inv_gamma_pdf(-2.0, 3.0, 1.0), 0.0);
    }

    #[test]
    fn cdf_of_shape_one_is_closed_form() {
        // InvGamma(1, β): F(x) = e^(-β/x)
        assert!(close(inv_gamma_cdf(2.0, 1.0, 3.0), (-1.5f64).exp(), 1e-10));
    }

    #[test]
    fn quantile_inverts_cdf() {
        for p in [0.025, 0.5, 0.975] {
            let q = inv_gamma_inv_cdf(p, 14.0, 1300.0);
            assert!(close(inv_gamma_cdf(q, 14.0, 1300.0), p, 1e-8), "p = {p}");
        }
    }

    #[test]
    fn mean_requires_shape_above_one() {
        assert_eq!(inv_gamma_mean(14.0, 1300.0), Some(100.0));
        assert_eq!(inv_gamma_mean(1.0, 5.0), None);
        assert_eq!(inv_gamma_mean(0.5, 5.0), None);
    }

    #[test]
    fn mode_formula() {
        assert!(close(inv_gamma_mode(3.0, 8.0), 2.0, 1e-12));
    }
}
