//! Gamma distribution kernels.
//!
//! # Parameterization
//!
//! Kernels here take a **rate** `λ` (density `λ^α / Γ(α) · t^(α-1) · e^(-λt)`).
//! ROAS posteriors are quoted in shape/scale form; callers pass `1 / scale`.

use super::stable::{bisect_quantile, exp_density, ln_gamma};

const SERIES_MAX_TERMS: usize = 500;
const CF_MAX_TERMS: usize = 500;
const INC_EPS: f64 = 1.0e-14;
const CF_TINY: f64 = 1.0e-300;

fn valid(shape: f64, rate: f64) -> bool {
    shape > 0.0 && rate > 0.0 && shape.is_finite() && rate.is_finite()
}

/// ln f(t | α, λ).
pub fn gamma_log_pdf(t: f64, shape: f64, rate: f64) -> f64 {
    if t.is_nan() || !valid(shape, rate) {
        return f64::NAN;
    }
    if t < 0.0 {
        return f64::NEG_INFINITY;
    }
    if t == 0.0 {
        return if shape < 1.0 {
            f64::INFINITY
        } else if shape == 1.0 {
            rate.ln()
        } else {
            f64::NEG_INFINITY
        };
    }
    shape * rate.ln() - ln_gamma(shape) + (shape - 1.0) * t.ln() - rate * t
}

/// f(t | α, λ).
pub fn gamma_pdf(t: f64, shape: f64, rate: f64) -> f64 {
    exp_density(gamma_log_pdf(t, shape, rate))
}

/// Regularized lower incomplete gamma P(a, x).
pub fn gamma_p(a: f64, x: f64) -> f64 {
    if a.is_nan() || x.is_nan() || a <= 0.0 || x < 0.0 {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    if x.is_infinite() {
        return 1.0;
    }
    if x < a + 1.0 {
        lower_series(a, x)
    } else {
        1.0 - upper_fraction(a, x)
    }
}

/// P(T ≤ t) for `Gamma(α, λ)`.
pub fn gamma_cdf(t: f64, shape: f64, rate: f64) -> f64 {
    if t.is_nan() || !valid(shape, rate) {
        return f64::NAN;
    }
    if t <= 0.0 {
        return 0.0;
    }
    gamma_p(shape, rate * t)
}

/// Quantile of `Gamma(α, λ)`.
pub fn gamma_inv_cdf(p: f64, shape: f64, rate: f64) -> f64 {
    if p.is_nan() || !valid(shape, rate) {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    // Grow the upper bracket until it covers p.
    let mut hi = (gamma_mean(shape, rate) + 10.0 * gamma_var(shape, rate).sqrt()).max(1.0 / rate);
    while gamma_cdf(hi, shape, rate) < p {
        hi *= 2.0;
        if !hi.is_finite() {
            return f64::INFINITY;
        }
    }
    bisect_quantile(p, 0.0, hi, |t| gamma_cdf(t, shape, rate))
}

/// E[T] = α / λ.
pub fn gamma_mean(shape: f64, rate: f64) -> f64 {
    if !valid(shape, rate) {
        return f64::NAN;
    }
    shape / rate
}

/// Var[T] = α / λ².
pub fn gamma_var(shape: f64, rate: f64) -> f64 {
    if !valid(shape, rate) {
        return f64::NAN;
    }
    shape / (rate * rate)
}

// P(a, x) = x^a e^-x / Γ(a) · Σ x^n / (a (a+1) ... (a+n))
fn lower_series(a: f64, x: f64) -> f64 {
    let mut term = 1.0 / a;
    let mut sum = term;
    for n in 1..=SERIES_MAX_TERMS {
        term *= x / (a + n as f64);
        sum += term;
        if term.abs() < sum.abs() * INC_EPS {
            break;
        }
    }
    let prefactor = (a * x.ln() - x - ln_gamma(a)).exp();
    (prefactor * sum).clamp(0.0, 1.0)
}

// Q(a, x) by modified Lentz.
fn upper_fraction(a: f64, x: f64) -> f64 {
    let guard = |v: f64| if v.abs() < CF_TINY { CF_TINY } else { v };

    let mut b = x + 1.0 - a;
    let mut c = 1.0 / CF_TINY;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=CF_MAX_TERMS {
        let i = i as f64;
        let an = -i * (i - a);
        b += 2.0;
        d = 1.0 / guard(an * d + b);
        c = guard(b + an / c);
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < INC_EPS {
            break;
        }
    }
    let prefactor = (a * x.ln() - x - ln_gamma(a)).exp();
    (prefactor * h).clamp(0.0, 1.0)
}
