use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use goal_alert::model::TeamStatRow;
use goal_alert::pipeline::{self, BTTS_ALERT_PCT, OVER15_ALERT_PCT};

#[derive(Debug, Serialize)]
struct EstimateReport {
    home_avg: f64,
    away_avg: f64,
    btts_pct: f64,
    over15_pct: f64,
    would_alert: bool,
}

// Offline check of the goal-market model for a pair of averages, handy when
// eyeballing threshold behaviour without hitting FBref or Telegram.
fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let json = args.iter().any(|a| a == "--json");
    let numbers = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .collect::<Vec<_>>();
    let [home, away] = numbers.as_slice() else {
        return Err(anyhow!("usage: estimate <home_avg> <away_avg> [--json]"));
    };
    let home_avg = home
        .parse::<f64>()
        .with_context(|| format!("home average {home:?} is not a number"))?;
    let away_avg = away
        .parse::<f64>()
        .with_context(|| format!("away average {away:?} is not a number"))?;

    let estimate = pipeline::estimate_match(
        TeamStatRow::new("Home", home_avg),
        TeamStatRow::new("Away", away_avg),
    )?;
    let report = EstimateReport {
        home_avg,
        away_avg,
        btts_pct: estimate.btts_pct,
        over15_pct: estimate.over15_pct,
        would_alert: pipeline::should_alert(&estimate),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("BTTS: {:.2}% (alert above {BTTS_ALERT_PCT:.0}%)", report.btts_pct);
    println!("Over 1.5: {:.2}% (alert above {OVER15_ALERT_PCT:.0}%)", report.over15_pct);
    println!("Would alert: {}", if report.would_alert { "yes" } else { "no" });
    Ok(())
}
