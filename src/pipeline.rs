use tracing::{info, warn};

use crate::error::{ParseError, PipelineError};
use crate::goal_markets;
use crate::model::{MatchEstimate, TeamStatRow};
use crate::notifier::Notify;
use crate::squad_stats_fetch::SquadStatsSource;

pub const OVER15_ALERT_PCT: f64 = 75.0;
pub const BTTS_ALERT_PCT: f64 = 65.0;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Alerted(MatchEstimate),
    NoAlert(MatchEstimate),
}

impl RunOutcome {
    pub fn estimate(&self) -> &MatchEstimate {
        match self {
            RunOutcome::Alerted(e) | RunOutcome::NoAlert(e) => e,
        }
    }
}

pub struct Pipeline<S, N> {
    source: S,
    notifier: N,
}

impl<S: SquadStatsSource, N: Notify> Pipeline<S, N> {
    pub fn new(source: S, notifier: N) -> Self {
        Self { source, notifier }
    }

    /// Pairs the two top-ranked teams of the league (placeholder for a real
    /// fixture) and alerts when either market clears its threshold.
    pub fn run(&self, league_id: &str) -> Result<RunOutcome, PipelineError> {
        let rows = self.source.fetch_league_averages(league_id)?;
        let (home, away) = top_two(rows)?;
        let estimate = estimate_match(home, away)?;

        info!(
            home = %estimate.home.name,
            away = %estimate.away.name,
            btts_pct = estimate.btts_pct,
            over15_pct = estimate.over15_pct,
            "match estimate"
        );

        if !should_alert(&estimate) {
            info!("thresholds not reached, no alert");
            return Ok(RunOutcome::NoAlert(estimate));
        }

        self.notifier.send(&format_alert(&estimate))?;
        info!("alert sent");
        Ok(RunOutcome::Alerted(estimate))
    }
}

fn top_two(rows: Vec<TeamStatRow>) -> Result<(TeamStatRow, TeamStatRow), ParseError> {
    let found = rows.len();
    let mut it = rows.into_iter();
    match (it.next(), it.next()) {
        (Some(home), Some(away)) => Ok((home, away)),
        _ => Err(ParseError::TooFewRows { needed: 2, found }),
    }
}

pub fn estimate_match(home: TeamStatRow, away: TeamStatRow) -> Result<MatchEstimate, PipelineError> {
    for team in [&home, &away] {
        if !team.has_valid_average() {
            warn!(team = %team.name, value = team.avg_goals_per_match, "unusable goal average");
            return Err(PipelineError::DataQuality {
                team: team.name.clone(),
                value: team.avg_goals_per_match,
            });
        }
    }

    let markets = goal_markets::estimate(home.avg_goals_per_match, away.avg_goals_per_match);
    Ok(MatchEstimate {
        home,
        away,
        btts_pct: markets.btts_pct,
        over15_pct: markets.over15_pct,
    })
}

pub fn should_alert(estimate: &MatchEstimate) -> bool {
    estimate.over15_pct > OVER15_ALERT_PCT || estimate.btts_pct > BTTS_ALERT_PCT
}

pub fn format_alert(estimate: &MatchEstimate) -> String {
    format!(
        "🚨 *VALUE ALERT detected!*\n\n\
         🏟 *Match:* {} x {}\n\
         📈 *Over 1.5 prob.:* {}%\n\
         ⚽ *BTTS prob.:* {}%\n\
         📊 *Combined average:* {:.2} goals",
        escape_markdown(&estimate.home.name),
        escape_markdown(&estimate.away.name),
        estimate.over15_pct,
        estimate.btts_pct,
        estimate.combined_average()
    )
}

/// Backslash-escapes the legacy Telegram Markdown metacharacters.
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
