use std::thread;
use std::time::Duration;

use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::{FetchError, ParseError, PipelineError};
use crate::http_client::{BROWSER_USER_AGENT, http_client};
use crate::model::TeamStatRow;

pub const TEAM_COLUMN: &str = "Squad";
pub const AVG_GROUP: &str = "Per 90 Minutes";
pub const AVG_COLUMN: &str = "Gls";

struct Selectors {
    table: Selector,
    header_rows: Selector,
    body_rows: Selector,
    header_cells: Selector,
    cells: Selector,
}

impl Selectors {
    fn new() -> Self {
        Self {
            table: selector("table"),
            header_rows: selector("thead tr"),
            body_rows: selector("tbody tr"),
            header_cells: selector("th"),
            cells: selector("th, td"),
        }
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static css selector")
}

pub trait SquadStatsSource {
    /// Teams of one league in page (ranking) order.
    fn fetch_league_averages(&self, league_id: &str) -> Result<Vec<TeamStatRow>, PipelineError>;
}

impl<T: SquadStatsSource + ?Sized> SquadStatsSource for &T {
    fn fetch_league_averages(&self, league_id: &str) -> Result<Vec<TeamStatRow>, PipelineError> {
        (**self).fetch_league_averages(league_id)
    }
}

#[derive(Debug, Clone)]
pub struct FbrefSquadStats {
    base_url: String,
    delay: Duration,
}

impl FbrefSquadStats {
    pub fn new(base_url: impl Into<String>, delay: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            delay,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.fbref_base_url.clone(), config.fetch_delay)
    }

    pub fn squad_stats_url(&self, league_id: &str) -> String {
        format!(
            "{}/en/comps/{}/stats/Squad-Standard-Stats",
            self.base_url,
            league_id.trim()
        )
    }

    fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let client = http_client().map_err(FetchError::Client)?;
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let resp = client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        resp.text().map_err(transport)
    }
}

impl SquadStatsSource for FbrefSquadStats {
    fn fetch_league_averages(&self, league_id: &str) -> Result<Vec<TeamStatRow>, PipelineError> {
        let url = self.squad_stats_url(league_id);
        if !self.delay.is_zero() {
            debug!(delay_secs = self.delay.as_secs_f64(), "waiting before fetch");
            thread::sleep(self.delay);
        }

        info!(%url, "fetching squad stats");
        let html = self.fetch_html(&url)?;
        let rows = parse_squad_stats_html(&html)?;
        info!(league_id, teams = rows.len(), "parsed squad stats table");
        Ok(rows)
    }
}

/// Reads the first table on the page into (team, goals per 90) rows.
///
/// Every named body row is kept in page order; a blank or non-numeric goal
/// cell becomes `NaN` and is rejected later if that team is actually used.
///
/// Columns are located by header name. FBref uses a two-level header: the
/// first row groups columns ("Playing Time", "Per 90 Minutes", ...) via
/// `colspan`, the last row names them.
pub fn parse_squad_stats_html(html: &str) -> Result<Vec<TeamStatRow>, ParseError> {
    let sel = Selectors::new();
    let document = Html::parse_document(html);
    let table = document.select(&sel.table).next().ok_or(ParseError::NoTable)?;

    let columns = header_columns(table, &sel);
    let team_idx = columns
        .iter()
        .position(|(_, name)| name == TEAM_COLUMN)
        .ok_or_else(|| missing_column(TEAM_COLUMN.to_string(), &columns))?;
    let avg_idx = columns
        .iter()
        .position(|(group, name)| group == AVG_GROUP && name == AVG_COLUMN)
        .ok_or_else(|| missing_column(format!("{AVG_GROUP} / {AVG_COLUMN}"), &columns))?;

    let mut rows = Vec::new();
    for tr in table.select(&sel.body_rows) {
        if is_repeated_header(tr) {
            continue;
        }
        let cells = tr.select(&sel.cells).collect::<Vec<_>>();
        let (Some(team_cell), Some(avg_cell)) = (cells.get(team_idx), cells.get(avg_idx)) else {
            debug!(cells = cells.len(), "skipping short table row");
            continue;
        };

        let name = cell_text(*team_cell);
        if name.is_empty() || name == TEAM_COLUMN {
            continue;
        }
        let raw = cell_text(*avg_cell);
        // Unreadable cells stay in place as NaN so row positions keep the ranking.
        let avg = parse_number(&raw).unwrap_or_else(|| {
            warn!(team = %name, raw = %raw, "unreadable goal average");
            f64::NAN
        });
        rows.push(TeamStatRow::new(name, avg));
    }

    Ok(rows)
}

fn header_columns(table: ElementRef<'_>, sel: &Selectors) -> Vec<(String, String)> {
    let header_rows = table.select(&sel.header_rows).collect::<Vec<_>>();
    let Some(leaf_row) = header_rows.last() else {
        return Vec::new();
    };

    let groups = if header_rows.len() > 1 {
        expand_colspans(header_rows[0], sel)
    } else {
        Vec::new()
    };

    expand_colspans(*leaf_row, sel)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| (groups.get(idx).cloned().unwrap_or_default(), name))
        .collect()
}

fn expand_colspans(row: ElementRef<'_>, sel: &Selectors) -> Vec<String> {
    let mut out = Vec::new();
    for th in row.select(&sel.header_cells) {
        let span = th
            .value()
            .attr("colspan")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let label = cell_text(th);
        out.extend(std::iter::repeat_n(label, span));
    }
    out
}

fn is_repeated_header(tr: ElementRef<'_>) -> bool {
    tr.value()
        .classes()
        .any(|c| c == "thead" || c == "over_header" || c == "spacer")
}

fn missing_column(column: String, columns: &[(String, String)]) -> ParseError {
    let available = columns
        .iter()
        .map(|(group, name)| {
            if group.is_empty() {
                name.clone()
            } else {
                format!("{group} / {name}")
            }
        })
        .collect();
    ParseError::MissingColumn { column, available }
}

fn cell_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    s.replace(',', "").parse::<f64>().ok()
}
