//! Integration tests for loading, running against, and saving a term's state.
//!
//! The fixture under `fixtures/term` is a small but complete term: a config
//! with a narrowed week range and a shorter consultation limit, and a state
//! snapshot with three students, one tutorial, and one consultation.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tabook_core::{
    Advisory, AttendanceStatus, Command, CommandRunner, Config, Consultation, ErrorKind,
    FixedClock, JsonStore, SlotId, StudentId, TabookError,
};

/// Path to the term fixture directory.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/term")
}

/// Copies the fixture state into a scratch directory and returns its path.
fn scratch_state(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("tabook_integration").join(name);
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    let path = dir.join("state.json");
    std::fs::copy(fixture_path().join("state.json"), &path).expect("Failed to copy fixture");
    path
}

fn load_fixture_config() -> Config {
    let config = Config::load_from_file(&fixture_path().join("tabook.json"))
        .expect("Failed to load fixture config");
    config.validate().expect("Fixture config should be valid");
    config
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}

fn student(id: &str) -> StudentId {
    StudentId::new(id).expect("valid student id")
}

fn t03() -> SlotId {
    SlotId::new("T03").expect("valid slot id")
}

fn runner_over(path: &Path, config: &Config) -> CommandRunner<FixedClock, JsonStore> {
    let store = JsonStore::new(path);
    let model = store.load(config).expect("Failed to load fixture state");
    CommandRunner::new(model, FixedClock(at(1, 9, 0)), store)
}

/// Tests that the fixture config overrides every default.
#[test]
fn test_fixture_config_loads() {
    let config = load_fixture_config();

    assert_eq!(config.term_weeks.first, 2);
    assert_eq!(config.term_weeks.last, 13);
    assert_eq!(config.max_consultation_minutes, 120);
    assert_eq!(config.data_file, "state.json");
}

/// Tests that the fixture state loads into a consistent model.
#[test]
fn test_fixture_state_loads() {
    let config = load_fixture_config();
    let model = JsonStore::new(fixture_path().join("state.json"))
        .load(&config)
        .expect("Failed to load fixture state");

    assert_eq!(model.persons().count(), 3);
    assert_eq!(model.consultations().len(), 1);

    let tutorial = model
        .tutorials()
        .find_by_slot(&t03())
        .expect("T03 should be registered");
    assert!(tutorial.has_student(&student("E1423456")));
    assert!(!tutorial.has_student(&student("E1234567")));

    let summary = tutorial.attendance().summary(2);
    assert_eq!(summary.present, 1);
    assert_eq!(summary.excused, 1);
    assert_eq!(summary.absent, 0);
}

/// Tests that successful commands are written back and survive a reload.
#[test]
fn test_changes_survive_reload() {
    let config = load_fixture_config();
    let path = scratch_state("survive_reload");

    let mut runner = runner_over(&path, &config);
    runner
        .run(&Command::MarkAttendance {
            slot: t03(),
            week: 3,
            student: student("E1423456"),
            status: AttendanceStatus::Absent,
        })
        .expect("mark attendance");
    let result = runner
        .run(&Command::AddConsultation(
            Consultation::new(student("E1234567"), at(10, 14, 0), at(10, 16, 30))
                .expect("valid range"),
        ))
        .expect("add consultation");

    // The fixture lowers the limit to two hours
    assert_eq!(
        result.advisories,
        vec![Advisory::DurationTooLong { limit_minutes: 120 }]
    );

    let reloaded = JsonStore::new(&path)
        .load(&config)
        .expect("Failed to reload state");
    assert_eq!(reloaded.snapshot(), runner.model().snapshot());
    assert_eq!(reloaded.consultations().len(), 2);
    assert_eq!(
        reloaded
            .tutorials()
            .find_by_slot(&t03())
            .and_then(|t| t.attendance().status(3, &student("E1423456"))),
        Some(AttendanceStatus::Absent)
    );

    std::fs::remove_file(&path).ok();
}

/// Tests that rejected commands leave the saved file untouched.
#[test]
fn test_rejections_do_not_touch_the_file() {
    let config = load_fixture_config();
    let path = scratch_state("rejections");
    let before = std::fs::read_to_string(&path).expect("Failed to read scratch state");

    let mut runner = runner_over(&path, &config);

    // Week 1 is before the fixture's first week
    let err = runner
        .run(&Command::MarkAllAttendance {
            slot: t03(),
            week: 1,
            status: AttendanceStatus::Present,
        })
        .expect_err("week 1 is outside the term");
    assert_eq!(err.kind(), ErrorKind::InvalidWeek);

    let err = runner
        .run(&Command::AddConsultation(
            Consultation::new(student("E1234567"), at(10, 13, 30), at(10, 14, 30))
                .expect("valid range"),
        ))
        .expect_err("overlaps the fixture consultation");
    assert_eq!(err.kind(), ErrorKind::TimingOverlap);

    let err = runner
        .run(&Command::EnrollStudent {
            slot: t03(),
            student: student("E1423456"),
        })
        .expect_err("already enrolled");
    assert_eq!(err.kind(), ErrorKind::RosterMismatch);

    let after = std::fs::read_to_string(&path).expect("Failed to read scratch state");
    assert_eq!(before, after);

    std::fs::remove_file(&path).ok();
}

/// Writes `contents` as a scratch state file and returns its path.
fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("tabook_integration").join(name);
    std::fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    let path = dir.join("state.json");
    std::fs::write(&path, contents).expect("Failed to write scratch state");
    path
}

fn assert_refused(path: &Path, config: &Config, expected: &str) {
    let err = JsonStore::new(path)
        .load(config)
        .expect_err("inconsistent snapshot should be refused");
    assert!(
        matches!(&err, TabookError::StateFileCorrupted { message, .. } if message.contains(expected)),
        "Expected StateFileCorrupted mentioning {expected:?}, got: {err:?}"
    );
}

/// Tests that a snapshot giving one owner two consultations is refused.
#[test]
fn test_snapshot_with_two_bookings_for_one_owner_is_refused() {
    let config = load_fixture_config();
    let path = scratch_file(
        "two_bookings",
        r#"{
            "persons": [{ "id": "E1234567", "name": "Alex Yeoh" }],
            "consultations": [
                { "owner": "E1234567", "from": "2025-10-10T13:00:00", "to": "2025-10-10T14:00:00" },
                { "owner": "E1234567", "from": "2025-10-11T13:00:00", "to": "2025-10-11T14:00:00" }
            ]
        }"#,
    );

    assert_refused(&path, &config, "already has a scheduled consultation");
    std::fs::remove_file(&path).ok();
}

/// Tests that a snapshot holding overlapping consultations is refused.
#[test]
fn test_snapshot_with_overlapping_bookings_is_refused() {
    let config = load_fixture_config();
    let path = scratch_file(
        "overlapping",
        r#"{
            "persons": [
                { "id": "E1234567", "name": "Alex Yeoh" },
                { "id": "E7654321", "name": "Charlotte Oliveiro" }
            ],
            "consultations": [
                { "owner": "E1234567", "from": "2025-10-10T13:00:00", "to": "2025-10-10T14:00:00" },
                { "owner": "E7654321", "from": "2025-10-10T13:30:00", "to": "2025-10-10T14:30:00" }
            ]
        }"#,
    );

    assert_refused(&path, &config, "overlaps");
    std::fs::remove_file(&path).ok();
}

/// Tests that dangling references between records are refused.
#[test]
fn test_snapshot_with_dangling_references_is_refused() {
    let config = load_fixture_config();

    // Booking owned by a student who is not in the directory
    let path = scratch_file(
        "unknown_owner",
        r#"{
            "persons": [],
            "consultations": [
                { "owner": "E2222222", "from": "2025-10-10T13:00:00", "to": "2025-10-10T14:00:00" }
            ]
        }"#,
    );
    assert_refused(&path, &config, "Student does not exist: E2222222");
    std::fs::remove_file(&path).ok();

    // Mark for a student who is not on the roster
    let path = scratch_file(
        "unrostered_mark",
        r#"{
            "persons": [{ "id": "E1111111", "name": "Dana Lim" }],
            "tutorials": [
                {
                    "slot": "T03",
                    "roster": [],
                    "attendance": [{ "week": 3, "student": "E1111111", "status": "present" }]
                }
            ]
        }"#,
    );
    assert_refused(&path, &config, "is not in tutorial T03");
    std::fs::remove_file(&path).ok();

    // Mark in a week the configured term does not contain
    let path = scratch_file(
        "week_out_of_term",
        r#"{
            "persons": [{ "id": "E1111111", "name": "Dana Lim" }],
            "tutorials": [
                {
                    "slot": "T03",
                    "roster": ["E1111111"],
                    "attendance": [{ "week": 99, "student": "E1111111", "status": "present" }]
                }
            ]
        }"#,
    );
    assert_refused(&path, &config, "Invalid Week: 99");
    std::fs::remove_file(&path).ok();
}
