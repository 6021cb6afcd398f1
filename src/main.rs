use anyhow::{Context, Result, anyhow};
use tracing::{error, info};

use goal_alert::config::AppConfig;
use goal_alert::logging;
use goal_alert::notifier::TelegramNotifier;
use goal_alert::pipeline::Pipeline;
use goal_alert::squad_stats_fetch::FbrefSquadStats;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let league_arg = parse_league_arg(&args)?;

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    info!(telegram = ?config.telegram, "credentials loaded");
    if let Some(league_id) = league_arg {
        config.league_id = league_id;
    }

    let pipeline = Pipeline::new(
        FbrefSquadStats::from_config(&config),
        TelegramNotifier::new(config.telegram.clone()),
    );

    match pipeline.run(&config.league_id) {
        Ok(_) => Ok(()),
        Err(err) if err.is_recoverable() => {
            error!(league_id = %config.league_id, "pipeline error: {err}");
            Ok(())
        }
        Err(err) => Err(err).context("pipeline failed"),
    }
}

const USAGE: &str = "usage: goal_alert [--league <id>]";

fn parse_league_arg(args: &[String]) -> Result<Option<String>> {
    let mut league = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let value = if let Some(raw) = arg.strip_prefix("--league=") {
            raw
        } else if arg == "--league" {
            iter.next().map(String::as_str).unwrap_or_default()
        } else {
            return Err(anyhow!("unexpected argument {arg:?}\n{USAGE}"));
        };
        let value = value.trim();
        if value.is_empty() || value.starts_with("--") {
            return Err(anyhow!("--league needs a league id\n{USAGE}"));
        }
        league = Some(value.to_string());
    }
    Ok(league)
}
