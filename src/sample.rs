//! Demo-data seeding.
//!
//! Gives a fresh install the same shape of data the portal's sample student
//! ships with: eight months of attendance, one exam per subject, and twenty
//! assignments spanning every punctuality bucket. Deterministic for a given
//! `as_of` day so seeded analytics are reproducible.

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime};

use crate::model::AttendanceStatus;
use crate::store::{ExamDraft, RecordStore};

pub struct SeedCounts {
    pub attendance: usize,
    pub exams: usize,
    pub assignments: usize,
}

const SUBJECTS: [&str; 6] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "English",
    "Computer Science",
];

const ASSIGNMENT_TITLES: [&str; 20] = [
    "Math Assignment 1",
    "Physics Lab Report",
    "Chemistry Project",
    "Biology Essay",
    "English Essay",
    "Programming Assignment",
    "Math Assignment 2",
    "Physics Problem Set",
    "Chemistry Lab",
    "Biology Diagram",
    "English Presentation",
    "Code Review",
    "Statistics Project",
    "Physics Experiment",
    "Organic Chemistry",
    "Genetics Study",
    "Literature Review",
    "Database Design",
    "Calculus Problems",
    "Final Project",
];

/// 22 tracked school days per seeded month.
const TRACKED_DAYS: u32 = 22;

pub fn seed_owner(store: &mut RecordStore, owner_id: &str, as_of: NaiveDate) -> Result<SeedCounts> {
    let mut attendance = 0usize;

    // Last eight months of attendance, oldest first, with a present-day
    // count that varies by month so the chart is not flat.
    for back in (0..8u32).rev() {
        let month_start = as_of
            .with_day(1)
            .and_then(|d| d.checked_sub_months(Months::new(back)))
            .context("seed month out of range")?;
        let present_days = 16 + (month_start.month() * 7) % 6; // 16..=21 of 22
        for day_of_month in 1..=TRACKED_DAYS {
            let date = month_start
                .with_day(day_of_month)
                .context("seed day out of range")?;
            let status = if day_of_month <= present_days {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            store.set_attendance(owner_id, date, status);
            attendance += 1;
        }
    }

    // One exam per subject over the last term, marks spread across 65..=94.
    let as_of_midnight = as_of.and_time(NaiveTime::MIN).and_utc();
    for (i, subject) in SUBJECTS.iter().enumerate() {
        store.create_exam(
            owner_id,
            ExamDraft {
                subject: (*subject).to_string(),
                exam_name: None,
                marks_obtained: 65 + ((i as u32 * 11) % 30),
                max_marks: 100,
                exam_date: as_of_midnight - Duration::days(8 + i as i64 * 9),
            },
        )?;
    }

    // Twenty assignments due over the last twenty days: 15 on time, 3 a day
    // or two late, one badly late, one never submitted.
    for (i, title) in ASSIGNMENT_TITLES.iter().enumerate() {
        let due = as_of_midnight - Duration::days(20 - i as i64) + Duration::hours(17);
        let created = store.create_assignment(
            owner_id,
            (*title).to_string(),
            SUBJECTS[i % SUBJECTS.len()].to_string(),
            due,
        );
        let submitted = match i {
            0..=14 => Some(due - Duration::hours(6 + (i as i64 % 5))),
            15..=17 => Some(due + Duration::days(i as i64 % 2) + Duration::hours(20)),
            18 => Some(due + Duration::days(4)),
            _ => None,
        };
        if let Some(submitted_date) = submitted {
            store.submit_assignment(owner_id, &created.id, submitted_date)?;
        }
    }

    Ok(SeedCounts {
        attendance,
        exams: SUBJECTS.len(),
        assignments: ASSIGNMENT_TITLES.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics;

    #[test]
    fn seeding_is_deterministic_and_covers_every_bucket() {
        let as_of = NaiveDate::parse_from_str("2024-08-31", "%Y-%m-%d").expect("date");

        let mut store = RecordStore::new();
        let counts = seed_owner(&mut store, "demo", as_of).expect("seed");
        assert_eq!(counts.attendance, 8 * 22);
        assert_eq!(counts.exams, 6);
        assert_eq!(counts.assignments, 20);

        let months = analytics::aggregate_attendance(&store.attendance_for_owner("demo"));
        assert_eq!(months.len(), 8);
        for m in &months {
            assert!((0..=100).contains(&m.percentage));
        }

        let scores = analytics::aggregate_scores(&store.exams_for_owner("demo"));
        assert_eq!(scores.len(), 6);

        let punctuality =
            analytics::aggregate_punctuality(&store.assignments_for_owner("demo"));
        assert_eq!(punctuality.total_assignments, 20);
        assert_eq!(punctuality.categories.on_time, 15);
        assert_eq!(punctuality.categories.late_1_to_2, 3);
        assert_eq!(punctuality.categories.late_3_plus, 1);
        assert_eq!(punctuality.categories.not_submitted, 1);

        // Same seed twice only rewrites attendance days; a second run is
        // additive for exams/assignments, so callers seed once per owner.
        let mut second = RecordStore::new();
        seed_owner(&mut second, "demo", as_of).expect("seed");
        assert_eq!(
            analytics::aggregate_attendance(&second.attendance_for_owner("demo")),
            months
        );
    }
}
