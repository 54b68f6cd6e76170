//! Plain-language explanations of CTR priors and posteriors.

use crate::error::Result;
use adpost_math::{ctr_posterior, PriorSpec};

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Explain the initial belief a `Beta(α, β)` CTR prior encodes.
pub fn explain_prior_impact(prior: &PriorSpec) -> String {
    let mean = prior.alpha / (prior.alpha + prior.beta);
    format!(
        "A Beta prior with α={} and β={} implies an initial mean estimate of {} for the CTR. \
         Stronger priors (larger α+β) indicate more confidence before seeing new data.",
        prior.alpha,
        prior.beta,
        percent(mean)
    )
}

/// Describe how the CTR mean moved after observing `clicks` out of `impressions`.
pub fn summarize_posterior_changes(prior: &PriorSpec, clicks: f64, impressions: f64) -> Result<String> {
    let posterior = ctr_posterior(prior, clicks, impressions)?;
    let prior_mean = prior.alpha / (prior.alpha + prior.beta);
    let (a, b) = posterior.params();
    let post_mean = a / (a + b);
    let delta = (post_mean - prior_mean) * 100.0;
    let direction = if delta >= 0.0 { "an increase" } else { "a decrease" };
    Ok(format!(
        "After observing {} clicks out of {} impressions, the estimated CTR shifts from {} to {}, \
         {} of {:.2} percentage points.",
        clicks,
        impressions,
        percent(prior_mean),
        percent(post_mean),
        direction,
        delta.abs()
    ))
}
