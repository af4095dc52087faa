//! Integration tests for grading_runtime.
//!
//! All tests use temporary directories for isolation: one store per test.

use std::fs;
use std::sync::Arc;
use std::thread;

use grading_kernel::validation::ValidationError;

use grading_runtime::csv_codec;
use grading_runtime::form::{FormValues, FormView, Status, TerminalForm, SUCCESS_MESSAGE};
use grading_runtime::grader::{Grader, SharedGrader, SubmitError, SubmitResult};
use grading_runtime::record_store::RecordStore;
use grading_runtime::summary::{summarize, verify_summary};

const HEADER_LINE: &str = "Name,Score 1,Score 2,Score 3,Score 4,Final";

fn temp_grader() -> (tempfile::TempDir, Grader) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = RecordStore::new(dir.path().join("grading_data.csv"));
    (dir, Grader::new(store))
}

fn read_rows(grader: &Grader) -> Vec<Vec<String>> {
    let text = fs::read_to_string(grader.store().path()).expect("read store");
    csv_codec::decode_rows(&text).expect("decode store")
}

/// Scripted view: hands out fixed values and records what it was shown.
struct ScriptedView {
    values: FormValues,
    shown: Vec<Status>,
}

impl ScriptedView {
    fn new(name: &str, attempts: &str, scores: &[&str]) -> Self {
        Self {
            values: FormValues {
                name: name.to_string(),
                attempts: attempts.to_string(),
                scores: scores.iter().map(|s| s.to_string()).collect(),
            },
            shown: Vec::new(),
        }
    }
}

impl FormView for ScriptedView {
    fn get_form_values(&mut self) -> FormValues {
        self.values.clone()
    }

    fn apply_result(&mut self, result: &SubmitResult) {
        let status = Status::from_result(result);
        if !status.is_error() {
            self.values = FormValues::default();
        }
        self.shown.push(status);
    }
}

// ─────────────────────────────────────────────────────────────
// End-to-end scenarios
// ─────────────────────────────────────────────────────────────

#[test]
fn jane_doe_two_attempts_appends_padded_row() {
    let (_dir, grader) = temp_grader();
    grader
        .submit("Jane Doe", "2", &["80", "95"])
        .expect("valid submission");

    let rows = read_rows(&grader);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].join(","), HEADER_LINE);
    assert_eq!(rows[1], vec!["Jane Doe", "80", "95", "", "", "87.5"]);
}

#[test]
fn bob1_is_rejected_without_a_row() {
    let (_dir, grader) = temp_grader();
    grader.submit("Ann", "1", &["90"]).expect("seed row");
    let before = fs::read(grader.store().path()).expect("read");

    let err = grader.submit("Bob1", "1", &["90"]).unwrap_err();
    assert_eq!(err.validation(), Some(ValidationError::InvalidName));

    let after = fs::read(grader.store().path()).expect("read");
    assert_eq!(before, after, "rejected submission must not touch the store");
}

#[test]
fn ann_with_five_attempts_is_rejected() {
    let (_dir, grader) = temp_grader();
    let err = grader
        .submit("Ann", "5", &["1", "2", "3", "4", "5"])
        .unwrap_err();
    assert_eq!(err.validation(), Some(ValidationError::InvalidAttemptCount));
    assert!(!grader.store().path().exists());
}

#[test]
fn lee_second_score_out_of_range() {
    let (_dir, grader) = temp_grader();
    let err = grader.submit("Lee", "3", &["50", "150", "20"]).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(ValidationError::InvalidScoreRange { index: 1 })
    );
    assert!(err.to_string().contains("Score 2"));
    assert!(!grader.store().path().exists());
}

// ─────────────────────────────────────────────────────────────
// Store properties
// ─────────────────────────────────────────────────────────────

#[test]
fn round_trip_matches_submission() {
    let (_dir, grader) = temp_grader();
    let cases: [(&str, &str, &[&str]); 4] = [
        ("  Mary Ann  ", "1", &["100"]),
        ("Bo", "3", &["80", "85", "85"]),
        ("Cy", "4", &["70", "80", "90", "100"]),
        ("Di", "2", &["0", "1"]),
    ];
    for (name, attempts, scores) in cases {
        grader.submit(name, attempts, scores).expect("valid");
    }

    let records = grader.store().load_records().expect("load");
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].fields(), ["Mary Ann", "100", "", "", "", "100.0"]);
    assert_eq!(records[1].fields(), ["Bo", "80", "85", "85", "", "83.33"]);
    assert_eq!(records[2].fields(), ["Cy", "70", "80", "90", "100", "85.0"]);
    assert_eq!(records[3].fields(), ["Di", "0", "1", "", "", "0.5"]);

    for record in &records {
        assert_eq!(record.final_score, RecordStore::average(&record.slots.filled()));
    }
}

#[test]
fn header_written_once_across_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grading_data.csv");

    RecordStore::new(&path).ensure_initialized().expect("ensure");
    RecordStore::new(&path).ensure_initialized().expect("ensure again");
    Grader::new(RecordStore::new(&path))
        .submit("Ann", "1", &["90"])
        .expect("submit");

    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text.matches("Name,Score 1").count(), 1);
    assert_eq!(text, format!("{}\r\nAnn,90,,,,90.0\r\n", HEADER_LINE));
}

#[test]
fn persistence_failure_is_reported_not_swallowed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let grader = Grader::new(RecordStore::new(dir.path()));
    let mut view = ScriptedView::new("Ann", "1", &["90"]);

    let result = grader.handle(&mut view);
    assert!(matches!(result, Err(SubmitError::Persistence(_))));
    assert!(view.shown[0].is_error());
    assert_ne!(view.shown[0].message(), SUCCESS_MESSAGE);
    assert_eq!(view.values.name, "Ann", "failed submission keeps the form");
}

#[test]
fn partial_header_fails_submit_and_leaves_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grading_data.csv");
    fs::write(&path, "Name,Sco").expect("seed");
    let grader = Grader::new(RecordStore::new(&path));
    let mut view = ScriptedView::new("Ann", "1", &["90"]);

    let result = grader.handle(&mut view);
    assert!(matches!(result, Err(SubmitError::Persistence(_))), "{:?}", result);
    assert!(view.shown[0].is_error());
    assert_eq!(fs::read_to_string(&path).expect("read"), "Name,Sco");
}

#[test]
fn empty_store_file_gets_header_before_first_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grading_data.csv");
    fs::write(&path, "").expect("seed");
    let grader = Grader::new(RecordStore::new(&path));

    grader.submit("Ann", "1", &["90"]).expect("submit");
    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text, format!("{}\r\nAnn,90,,,,90.0\r\n", HEADER_LINE));
}

// ─────────────────────────────────────────────────────────────
// Presentation boundary
// ─────────────────────────────────────────────────────────────

#[test]
fn handle_resets_view_on_success() {
    let (_dir, grader) = temp_grader();
    let mut view = ScriptedView::new("Jane Doe", "2", &["80", "95"]);
    grader.handle(&mut view).expect("valid");
    assert_eq!(view.shown, vec![Status::Success("Submitted".into())]);
    assert_eq!(view.values, FormValues::default());
}

#[test]
fn terminal_session_submits_each_form() {
    let (_dir, grader) = temp_grader();
    let input = "Jane Doe\n2\n80\n95\nBob1\n1\n70\nLee\n3\n50\n150\n20\n";
    let mut form = TerminalForm::new(input.as_bytes(), Vec::new());

    let mut outcomes = Vec::new();
    while form.prompt().expect("prompt") {
        outcomes.push(grader.handle(&mut form).is_ok());
    }
    assert_eq!(outcomes, vec![true, false, false]);

    let out = String::from_utf8(form.into_output()).expect("utf8");
    assert!(out.contains("Submitted\n"));
    assert!(out.contains("Enter a valid name (letters only)\n"));
    assert!(out.contains("Score 2 must be between 0 and 100\n"));

    let records = grader.store().load_records().expect("load");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Jane Doe");
}

// ─────────────────────────────────────────────────────────────
// Concurrency and summaries
// ─────────────────────────────────────────────────────────────

#[test]
fn shared_grader_serializes_writers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("grading_data.csv");
    let shared = Arc::new(SharedGrader::new(Grader::new(RecordStore::new(&path))));

    let names = ["Ann", "Bob", "Cy", "Di", "Ed", "Flo", "Gus", "Hal"];
    let handles: Vec<_> = names
        .iter()
        .map(|name| {
            let shared = Arc::clone(&shared);
            let name = name.to_string();
            thread::spawn(move || shared.submit(&name, "2", &["60", "70"]).is_ok())
        })
        .collect();
    for h in handles {
        assert!(h.join().expect("join"));
    }

    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text.matches(HEADER_LINE).count(), 1);
    let records = RecordStore::new(&path).load_records().expect("load");
    assert_eq!(records.len(), names.len());
    for record in &records {
        assert_eq!(record.final_score.to_string(), "65.0");
    }
}

#[test]
fn summary_tracks_appends() {
    let (_dir, grader) = temp_grader();
    grader.submit("Jane Doe", "2", &["80", "95"]).expect("valid");
    grader.submit("Max", "2", &["80", "90"]).expect("valid");

    let summary = summarize(grader.store()).expect("summarize");
    assert_eq!(summary.record_count, 2);
    // (87.5 + 85.0) / 2
    assert_eq!(summary.class_average.to_string(), "86.25");
    assert!(verify_summary(grader.store(), &summary).expect("verify"));

    grader.submit("Ann", "1", &["10"]).expect("valid");
    assert!(!verify_summary(grader.store(), &summary).expect("verify"));

    let json = serde_json::to_string(&summary).expect("json");
    assert!(json.contains("\"class_average\":\"86.25\""));
}
