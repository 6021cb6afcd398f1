use std::cell::RefCell;

use goal_alert::error::{NotifyError, ParseError, PipelineError};
use goal_alert::model::TeamStatRow;
use goal_alert::notifier::Notify;
use goal_alert::pipeline::{Pipeline, RunOutcome};
use goal_alert::squad_stats_fetch::{SquadStatsSource, parse_squad_stats_html};

struct FixtureSource {
    rows: Vec<TeamStatRow>,
    requested: RefCell<Vec<String>>,
}

impl FixtureSource {
    fn new(rows: &[(&str, f64)]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|(name, avg)| TeamStatRow::new(*name, *avg))
                .collect(),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl SquadStatsSource for FixtureSource {
    fn fetch_league_averages(&self, league_id: &str) -> Result<Vec<TeamStatRow>, PipelineError> {
        self.requested.borrow_mut().push(league_id.to_string());
        Ok(self.rows.clone())
    }
}

struct HtmlSource(&'static str);

impl SquadStatsSource for HtmlSource {
    fn fetch_league_averages(&self, _league_id: &str) -> Result<Vec<TeamStatRow>, PipelineError> {
        Ok(parse_squad_stats_html(self.0)?)
    }
}

const BLANK_LEADER_TABLE: &str = r#"
    <table>
      <thead>
        <tr><th></th><th>Per 90 Minutes</th></tr>
        <tr><th>Squad</th><th>Gls</th></tr>
      </thead>
      <tbody>
        <tr><th>Leader</th><td></td></tr>
        <tr><th>Second</th><td>2.5</td></tr>
        <tr><th>Third</th><td>1.8</td></tr>
      </tbody>
    </table>
"#;

struct BrokenSource;

impl SquadStatsSource for BrokenSource {
    fn fetch_league_averages(&self, _league_id: &str) -> Result<Vec<TeamStatRow>, PipelineError> {
        Err(ParseError::NoTable.into())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: RefCell<Vec<String>>,
}

impl Notify for RecordingNotifier {
    fn send(&self, message: &str) -> Result<(), NotifyError> {
        self.sent.borrow_mut().push(message.to_string());
        Ok(())
    }
}

struct RejectingNotifier;

impl Notify for RejectingNotifier {
    fn send(&self, _message: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
        })
    }
}

#[test]
fn high_scoring_pair_sends_one_alert() {
    let notifier = RecordingNotifier::default();
    let source = FixtureSource::new(&[("Team A", 2.5), ("Team B", 1.8), ("Team C", 0.4)]);
    let pipeline = Pipeline::new(source, &notifier);

    let outcome = pipeline.run("24").expect("run should succeed");

    let estimate = match outcome {
        RunOutcome::Alerted(estimate) => estimate,
        other => panic!("expected an alert, got {other:?}"),
    };
    assert_eq!(estimate.home.name, "Team A");
    assert_eq!(estimate.away.name, "Team B");
    assert_eq!(estimate.btts_pct, 76.62);
    assert_eq!(estimate.over15_pct, 92.81);

    let sent = notifier.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("Team A x Team B"));
}

#[test]
fn low_scoring_pair_stays_quiet() {
    let notifier = RecordingNotifier::default();
    let pipeline = Pipeline::new(FixtureSource::new(&[("Team A", 0.5), ("Team B", 0.4)]), &notifier);

    let outcome = pipeline.run("24").expect("run should succeed");

    assert!(matches!(outcome, RunOutcome::NoAlert(_)));
    assert_eq!(outcome.estimate().btts_pct, 12.97);
    assert_eq!(outcome.estimate().over15_pct, 22.75);
    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn league_id_is_passed_to_source() {
    let notifier = RecordingNotifier::default();
    let source = FixtureSource::new(&[("Team A", 0.5), ("Team B", 0.4)]);
    let pipeline = Pipeline::new(&source, &notifier);

    pipeline.run("9").expect("run should succeed");

    assert_eq!(*source.requested.borrow(), vec!["9".to_string()]);
}

#[test]
fn single_team_table_is_too_few_rows() {
    let notifier = RecordingNotifier::default();
    let pipeline = Pipeline::new(FixtureSource::new(&[("Team A", 2.5)]), &notifier);

    let err = pipeline.run("24").unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Parse(ParseError::TooFewRows { needed: 2, found: 1 })
    ));
    assert!(err.is_recoverable());
    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn negative_average_is_surfaced_not_estimated() {
    let notifier = RecordingNotifier::default();
    let pipeline = Pipeline::new(FixtureSource::new(&[("Team A", 2.5), ("Team B", -1.0)]), &notifier);

    let err = pipeline.run("24").unwrap_err();

    assert!(matches!(err, PipelineError::DataQuality { ref team, .. } if team == "Team B"));
    assert!(notifier.sent.borrow().is_empty());
}

#[test]
fn source_failure_is_recoverable() {
    let notifier = RecordingNotifier::default();
    let err = Pipeline::new(BrokenSource, &notifier).run("24").unwrap_err();
    assert!(err.is_recoverable());
}

#[test]
fn delivery_failure_propagates() {
    let pipeline = Pipeline::new(
        FixtureSource::new(&[("Team A", 2.5), ("Team B", 1.8)]),
        RejectingNotifier,
    );

    let err = pipeline.run("24").unwrap_err();

    assert!(matches!(err, PipelineError::Notify(NotifyError::Status { .. })));
    assert!(!err.is_recoverable());
}

#[test]
fn blank_leader_average_is_data_quality_not_a_shifted_pair() {
    let notifier = RecordingNotifier::default();
    let pipeline = Pipeline::new(HtmlSource(BLANK_LEADER_TABLE), &notifier);

    let err = pipeline.run("24").unwrap_err();

    assert!(matches!(err, PipelineError::DataQuality { ref team, .. } if team == "Leader"));
    assert!(err.is_recoverable());
    assert!(notifier.sent.borrow().is_empty());
}
