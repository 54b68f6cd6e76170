//! Beta distribution kernels.
//!
//! Rates (CTR, CVR) live on [0, 1] and are modelled as `Beta(α, β)`.
//! The CDF is the regularized incomplete beta function evaluated with a
//! modified-Lentz continued fraction.

use super::stable::{bisect_quantile, exp_density, ln_beta_fn};

const CF_MAX_TERMS: usize = 300;
const CF_EPS: f64 = 1.0e-12;
const CF_TINY: f64 = 1.0e-300;

fn valid(alpha: f64, beta: f64) -> bool {
    alpha > 0.0 && beta > 0.0 && alpha.is_finite() && beta.is_finite()
}

/// E[X] = α / (α + β).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if !valid(alpha, beta) {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Var[X] = αβ / ((α + β)² (α + β + 1)).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if !valid(alpha, beta) {
        return f64::NAN;
    }
    let total = alpha + beta;
    alpha * beta / (total * total * (total + 1.0))
}

/// ln f(x | α, β). Outside [0, 1] the density is zero (−∞ in log space).
pub fn beta_log_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || !valid(alpha, beta) {
        return f64::NAN;
    }
    if !(0.0..=1.0).contains(&x) {
        return f64::NEG_INFINITY;
    }
    // Endpoints: the power term is 0^(shape-1).
    let edge = |shape: f64, other_ln: f64| -> f64 {
        match shape.partial_cmp(&1.0) {
            Some(std::cmp::Ordering::Less) => f64::INFINITY,
            Some(std::cmp::Ordering::Greater) => f64::NEG_INFINITY,
            _ => other_ln,
        }
    };
    if x == 0.0 {
        return edge(alpha, -ln_beta_fn(alpha, beta));
    }
    if x == 1.0 {
        return edge(beta, -ln_beta_fn(alpha, beta));
    }
    (alpha - 1.0) * x.ln() + (beta - 1.0) * (-x).ln_1p() - ln_beta_fn(alpha, beta)
}

/// f(x | α, β).
pub fn beta_pdf(x: f64, alpha: f64, beta: f64) -> f64 {
    exp_density(beta_log_pdf(x, alpha, beta))
}

/// P(X ≤ x) = I_x(α, β).
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || !valid(alpha, beta) {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let front =
        (alpha * x.ln() + beta * (-x).ln_1p() - ln_beta_fn(alpha, beta)).exp();
    // The fraction converges fastest on the side of the mode it is expanded around.
    if x < (alpha + 1.0) / (alpha + beta + 2.0) {
        front * incomplete_beta_cf(alpha, beta, x) / alpha
    } else {
        1.0 - front * incomplete_beta_cf(beta, alpha, 1.0 - x) / beta
    }
}

/// Quantile of `Beta(α, β)` by bisection on the CDF.
pub fn beta_inv_cdf(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || !valid(alpha, beta) {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    bisect_quantile(p, 0.0, 1.0, |x| beta_cdf(x, alpha, beta))
}

fn incomplete_beta_cf(a: f64, b: f64, x: f64) -> f64 {
    let guard = |v: f64| if v.abs() < CF_TINY { CF_TINY } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - (a + b) * x / (a + 1.0));
    let mut h = d;

    for m in 1..=CF_MAX_TERMS {
        let m = m as f64;
        let two_m = 2.0 * m;

        // even step
        let num = m * (b - m) * x / ((a - 1.0 + two_m) * (a + two_m));
        d = 1.0 / guard(1.0 + num * d);
        c = guard(1.0 + num / c);
        h *= d * c;

        // odd step
        let num = -(a + m) * (a + b + m) * x / ((a + two_m) * (a + 1.0 + two_m));
        d = 1.0 / guard(1.0 + num * d);
        c = guard(1.0 + num / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < CF_EPS {
            break;
        }
    }
    h
}
