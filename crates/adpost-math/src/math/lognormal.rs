//! Log-normal kernels; `μ` and `σ` are the mean and standard deviation of ln X.

use super::normal::{std_normal_cdf, std_normal_inv_cdf};
use super::stable::exp_density;

const LN_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

fn valid(mu: f64, sigma: f64) -> bool {
    mu.is_finite() && sigma.is_finite() && sigma > 0.0
}

/// ln f(x | μ, σ).
pub fn lognormal_log_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if x.is_nan() || !valid(mu, sigma) {
        return f64::NAN;
    }
    if x <= 0.0 {
        return f64::NEG_INFINITY;
    }
    let z = (x.ln() - mu) / sigma;
    -x.ln() - sigma.ln() - LN_SQRT_2PI - 0.5 * z * z
}

/// f(x | μ, σ).
pub fn lognormal_pdf(x: f64, mu: f64, sigma: f64) -> f64 {
    exp_density(lognormal_log_pdf(x, mu, sigma))
}

/// P(X ≤ x) = Φ((ln x − μ) / σ).
pub fn lognormal_cdf(x: f64, mu: f64, sigma: f64) -> f64 {
    if x.is_nan() || !valid(mu, sigma) {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    std_normal_cdf((x.ln() - mu) / sigma)
}

/// Quantile: `exp(μ + σ Φ⁻¹(p))`.
pub fn lognormal_inv_cdf(p: f64, mu: f64, sigma: f64) -> f64 {
    if p.is_nan() || !valid(mu, sigma) {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    (mu + sigma * std_normal_inv_cdf(p)).exp()
}

/// E[X] = exp(μ + σ²/2).
pub fn lognormal_mean(mu: f64, sigma: f64) -> f64 {
    if !valid(mu, sigma) {
        return f64::NAN;
    }
    (mu + 0.5 * sigma * sigma).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        !a.is_nan() && !b.is_nan() && (a - b).abs() <= tol
    }

    #[test]
    fn standard_lognormal_density_at_one() {
        // 1 / sqrt(2π)
        assert!(close(lognormal_pdf(1.0, 0.0, 1.0), 0.398_942_280_401_432_7, 1e-12));
    }

    #[test]
    fn median_is_exp_mu() {
        assert!(close(lognormal_inv_cdf(0.5, 1.2, 0.4), 1.2f64.exp(), 1e-9));
        assert!(close(lognormal_cdf(1.2f64.exp(), 1.2, 0.4), 0.5, 1e-9));
    }

    #[test]
    fn upper_percentile() {
        // z_0.995 = 2.5758293035489
        let q = lognormal_inv_cdf(0.995, 0.0, 0.5);
        assert!(close(q, (0.5 * 2.575_829_303_548_9f64).exp(), 1e-6));
    }

    #[test]
    fn nonpositive_support_is_zero() {
        assert_eq!(lognormal_pdf(0.0, 0.0, 1.0), 0.0);
        assert_eq!(lognormal_cdf(-1.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn mean_formula() {
        assert!(close(lognormal_mean(0.0, 1.0), 0.5f64.exp(), 1e-12));
        assert!(lognormal_mean(0.0, 0.0).is_nan());
    }
}
