use serde::Serialize;

/// One row of the league's squad stats table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStatRow {
    pub name: String,
    pub avg_goals_per_match: f64,
}

impl TeamStatRow {
    pub fn new(name: impl Into<String>, avg_goals_per_match: f64) -> Self {
        Self {
            name: name.into(),
            avg_goals_per_match,
        }
    }

    /// A usable Poisson rate: finite and non-negative.
    pub fn has_valid_average(&self) -> bool {
        self.avg_goals_per_match.is_finite() && self.avg_goals_per_match >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEstimate {
    pub home: TeamStatRow,
    pub away: TeamStatRow,
    pub btts_pct: f64,
    pub over15_pct: f64,
}

impl MatchEstimate {
    pub fn combined_average(&self) -> f64 {
        self.home.avg_goals_per_match + self.away.avg_goals_per_match
    }
}
