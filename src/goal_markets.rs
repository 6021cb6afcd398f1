use serde::Serialize;

/// Highest goal count modelled per side. Mass above it is dropped, not lumped
/// into the last bucket, so tails are slightly under-counted.
pub const MAX_GOALS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalMarkets {
    pub btts_pct: f64,
    pub over15_pct: f64,
}

/// BTTS and Over 1.5 probabilities (in percent, 2 decimals) from each side's
/// mean goals, treating the two scorelines as independent Poisson variables.
///
/// Inputs are not validated: NaN or negative means flow straight through the
/// formula.
pub fn estimate(mean_home: f64, mean_away: f64) -> GoalMarkets {
    let pmf_h = poisson_pmf(mean_home);
    let pmf_a = poisson_pmf(mean_away);

    let btts = (1.0 - pmf_h[0]) * (1.0 - pmf_a[0]) * 100.0;

    let nil_nil = pmf_h[0] * pmf_a[0];
    let one_nil = pmf_h[1] * pmf_a[0];
    let nil_one = pmf_h[0] * pmf_a[1];
    let over15 = (1.0 - (nil_nil + one_nil + nil_one)) * 100.0;

    GoalMarkets {
        btts_pct: round2(btts),
        over15_pct: round2(over15),
    }
}

fn poisson_pmf(lambda: f64) -> [f64; MAX_GOALS + 1] {
    let mut out = [0.0; MAX_GOALS + 1];
    out[0] = (-lambda).exp();
    for k in 1..=MAX_GOALS {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
