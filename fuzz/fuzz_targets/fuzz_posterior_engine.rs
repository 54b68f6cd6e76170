//! Fuzz target for the conjugate updates and curve rendering.
//!
//! Arbitrary priors and counters either fail validation or produce a
//! posterior whose summary and density curve stay finite.

#![no_main]

use adpost_math::{cpa_posterior, ctr_posterior, roas_from_cpa, PriorSpec};
use adpost_report::render_curve;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    alpha: f64,
    beta: f64,
    clicks: u32,
    impressions: u32,
    conversions: u16,
    cost: f64,
    revenue_per_conversion: f64,
    points: u16,
}

fuzz_target!(|input: Input| {
    let Ok(prior) = PriorSpec::new(input.alpha, input.beta) else {
        return;
    };
    let points = usize::from(input.points % 512);

    if let Ok(ctr) = ctr_posterior(&prior, f64::from(input.clicks), f64::from(input.impressions)) {
        if let Ok(summary) = ctr.summary(0.95) {
            if summary.lower.is_finite() && summary.upper.is_finite() {
                assert!(summary.lower <= summary.upper);
            }
        }
        if let Ok(curve) = render_curve(&ctr, points) {
            assert!(curve.ys().iter().all(|y| y.is_finite() && *y >= 0.0));
        }
    }

    if let Ok(cpa) = cpa_posterior(&prior, f64::from(input.conversions), input.cost) {
        if let Ok(roas) = roas_from_cpa(&cpa, input.revenue_per_conversion) {
            let _ = render_curve(&roas, points);
        }
    }
});
