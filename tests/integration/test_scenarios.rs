//! End-to-end scenarios for the scheduling and attendance engine.
//!
//! Each test drives a fresh model through the public command interface,
//! the way an embedding application would.

use chrono::{NaiveDate, NaiveDateTime};
use tabook_core::{
    Advisory, AttendanceStatus, Command, CommandRunner, Config, Consultation, ErrorKind,
    FixedClock, Model, NoPersistence, Person, SlotId, StudentId,
};

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}

fn student(id: &str) -> StudentId {
    StudentId::new(id).expect("valid student id")
}

fn slot(id: &str) -> SlotId {
    SlotId::new(id).expect("valid slot id")
}

fn booking(owner: &str, from: NaiveDateTime, to: NaiveDateTime) -> Command {
    Command::AddConsultation(Consultation::new(student(owner), from, to).expect("valid range"))
}

/// A runner whose clock sits well before every booking used here.
fn runner() -> CommandRunner<FixedClock, NoPersistence> {
    let mut model = Model::new(&Config::default());
    model.add_person(Person::new(student("E1234567"), "Alex Yeoh"));
    model.add_person(Person::new(student("E1423456"), "Bernice Yu"));
    model.add_person(Person::new(student("E7654321"), "Charlotte Oliveiro"));
    CommandRunner::new(model, FixedClock(at(1, 9, 0)), NoPersistence)
}

/// Tests marking attendance in a registered tutorial, then reading it back by slot.
#[test]
fn test_mark_attendance_in_registered_tutorial() {
    let mut runner = runner();
    runner
        .run(&Command::RegisterTutorial(slot("T03")))
        .expect("register");
    runner
        .run(&Command::EnrollStudent {
            slot: slot("T03"),
            student: student("E1423456"),
        })
        .expect("enroll");

    let result = runner
        .run(&Command::MarkAttendance {
            slot: slot("T03"),
            week: 3,
            student: student("E1423456"),
            status: AttendanceStatus::Present,
        })
        .expect("mark attendance");
    assert_eq!(
        result.feedback(),
        "Attendance marked: Bernice Yu present on Week 3."
    );

    let tutorial = runner
        .model()
        .tutorials()
        .find_by_slot(&slot("T03"))
        .expect("tutorial is registered");
    assert_eq!(
        tutorial.attendance().status(3, &student("E1423456")),
        Some(AttendanceStatus::Present)
    );
}

/// Tests that a 3h30m consultation succeeds with a duration advisory.
#[test]
fn test_long_consultation_carries_advisory() {
    let mut runner = runner();
    let result = runner
        .run(&booking("E1234567", at(10, 14, 0), at(10, 17, 30)))
        .expect("long booking is still accepted");

    assert_eq!(
        result.advisories,
        vec![Advisory::DurationTooLong { limit_minutes: 180 }]
    );
    assert!(result
        .feedback()
        .contains("Friendly reminder: Consultation duration exceeds 3 hours!"));
    assert_eq!(runner.model().consultations().len(), 1);
}

/// Tests that deleting a missing booking is an ownership conflict, not a lookup failure.
#[test]
fn test_delete_without_booking_is_ownership_conflict() {
    let mut runner = runner();
    let err = runner
        .run(&Command::DeleteConsultation(student("E1234567")))
        .expect_err("nothing to delete");

    assert_eq!(err.kind(), ErrorKind::OwnershipConflict);
    assert_eq!(
        err.to_string(),
        "Student does not have an existing consultation"
    );
}

/// Tests that touching endpoints do not overlap but intersecting intervals do.
#[test]
fn test_overlap_boundaries() {
    let mut runner = runner();
    runner
        .run(&booking("E7654321", at(10, 13, 0), at(10, 14, 0)))
        .expect("first booking");

    runner
        .run(&booking("E1234567", at(10, 14, 0), at(10, 16, 0)))
        .expect("touching booking is accepted");

    let err = runner
        .run(&booking("E1423456", at(10, 13, 30), at(10, 14, 30)))
        .expect_err("overlapping booking is rejected");
    assert_eq!(err.kind(), ErrorKind::TimingOverlap);
    assert_eq!(runner.model().consultations().len(), 2);
}

/// Tests that no stored pair of consultations overlaps after a mixed sequence.
#[test]
fn test_stored_consultations_never_overlap() {
    let mut runner = runner();
    let attempts = [
        booking("E1234567", at(10, 9, 0), at(10, 11, 0)),
        booking("E1423456", at(10, 10, 0), at(10, 12, 0)),
        booking("E1423456", at(10, 11, 0), at(10, 12, 0)),
        booking("E7654321", at(10, 8, 0), at(10, 9, 30)),
        booking("E7654321", at(10, 12, 0), at(10, 13, 0)),
        booking("E1234567", at(11, 9, 0), at(11, 10, 0)),
    ];
    for command in &attempts {
        let _ = runner.run(command);
    }

    let stored: Vec<&Consultation> = runner.model().consultations().iter().collect();
    assert_eq!(stored.len(), 3);
    for (i, a) in stored.iter().enumerate() {
        for b in &stored[i + 1..] {
            assert!(!a.overlaps(b), "{a} overlaps {b}");
        }
    }

    let mut owners: Vec<&str> = stored.iter().map(|c| c.owner().as_str()).collect();
    owners.sort_unstable();
    owners.dedup();
    assert_eq!(owners.len(), stored.len(), "an owner holds two bookings");
}

/// Tests that deleting a just-added booking returns exactly what was added.
#[test]
fn test_add_then_delete_round_trip() {
    let mut runner = runner();
    let added = Consultation::new(student("E1234567"), at(10, 14, 0), at(10, 16, 0))
        .expect("valid range");
    runner
        .run(&Command::AddConsultation(added.clone()))
        .expect("add");

    let result = runner
        .run(&Command::DeleteConsultation(student("E1234567")))
        .expect("delete");
    assert_eq!(result.feedback(), format!("Deleted consultation: {added}"));

    let scheduler = runner.model().consultations();
    assert!(!scheduler.has(&added));
    assert!(scheduler.consultation_of(&student("E1234567")).is_none());
}

/// Tests that marking the same attendance twice leaves one identical entry.
#[test]
fn test_mark_attendance_is_idempotent() {
    let mut runner = runner();
    runner
        .run(&Command::RegisterTutorial(slot("T03")))
        .expect("register");
    runner
        .run(&Command::EnrollStudent {
            slot: slot("T03"),
            student: student("E1423456"),
        })
        .expect("enroll");

    let mark = Command::MarkAttendance {
        slot: slot("T03"),
        week: 3,
        student: student("E1423456"),
        status: AttendanceStatus::Present,
    };
    runner.run(&mark).expect("first mark");
    runner.run(&mark).expect("second mark");

    let sheet = runner
        .model()
        .tutorials()
        .find_by_slot(&slot("T03"))
        .expect("tutorial is registered")
        .attendance();
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.summary(3).present, 1);
}

/// Tests that attendance outside the term or the roster is rejected.
#[test]
fn test_attendance_rejections() {
    let mut runner = runner();
    runner
        .run(&Command::RegisterTutorial(slot("T03")))
        .expect("register");
    runner
        .run(&Command::EnrollStudent {
            slot: slot("T03"),
            student: student("E1423456"),
        })
        .expect("enroll");

    let err = runner
        .run(&Command::MarkAttendance {
            slot: slot("T03"),
            week: 14,
            student: student("E1423456"),
            status: AttendanceStatus::Present,
        })
        .expect_err("week 14 is outside the term");
    assert_eq!(err.kind(), ErrorKind::InvalidWeek);

    let err = runner
        .run(&Command::MarkAttendance {
            slot: slot("T03"),
            week: 3,
            student: student("E1234567"),
            status: AttendanceStatus::Present,
        })
        .expect_err("student is not on the roster");
    assert_eq!(err.kind(), ErrorKind::RosterMismatch);

    let err = runner
        .run(&Command::RegisterTutorial(slot("T03")))
        .expect_err("slot is taken");
    assert_eq!(err.kind(), ErrorKind::DuplicateSlot);

    let tutorial = runner
        .model()
        .tutorials()
        .find_by_slot(&slot("T03"))
        .expect("tutorial is registered");
    assert!(tutorial.attendance().is_empty());
}

/// Tests marking a whole tutorial at once.
#[test]
fn test_mark_all_attendance() {
    let mut runner = runner();
    runner
        .run(&Command::RegisterTutorial(slot("T03")))
        .expect("register");
    for id in ["E1423456", "E7654321"] {
        runner
            .run(&Command::EnrollStudent {
                slot: slot("T03"),
                student: student(id),
            })
            .expect("enroll");
    }

    let result = runner
        .run(&Command::MarkAllAttendance {
            slot: slot("T03"),
            week: 5,
            status: AttendanceStatus::Absent,
        })
        .expect("mark all");
    assert_eq!(
        result.feedback(),
        "Attendance marked: 2 students in T03 absent on Week 5."
    );

    let summary = runner
        .model()
        .tutorials()
        .find_by_slot(&slot("T03"))
        .expect("tutorial is registered")
        .attendance()
        .summary(5);
    assert_eq!(summary.absent, 2);
    assert_eq!(summary.total(), 2);
}
