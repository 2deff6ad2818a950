//! In-memory record store.
//!
//! All record collections live here behind explicit per-owner query
//! methods. Queries hand out owned snapshots, so the analytics side never
//! observes shared mutable state.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use uuid::Uuid;

use crate::model::{AssignmentRecord, AttendanceRecord, AttendanceStatus, ExamRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    MarksOutOfRange,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::MarksOutOfRange => {
                write!(f, "marksObtained must be between 0 and maxMarks, maxMarks at least 1")
            }
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone)]
pub struct ExamDraft {
    pub subject: String,
    pub exam_name: Option<String>,
    pub marks_obtained: u32,
    pub max_marks: u32,
    pub exam_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ExamPatch {
    pub subject: Option<String>,
    pub exam_name: Option<String>,
    pub marks_obtained: Option<u32>,
    pub max_marks: Option<u32>,
    pub exam_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    attendance: Vec<AttendanceRecord>,
    exams: Vec<ExamRecord>,
    assignments: Vec<AssignmentRecord>,
}

fn valid_marks(marks_obtained: u32, max_marks: u32) -> bool {
    max_marks >= 1 && marks_obtained <= max_marks
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert keyed by (owner, date): at most one record per student-day.
    /// Returns the stored record and whether it was newly created.
    pub fn set_attendance(
        &mut self,
        owner_id: &str,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> (AttendanceRecord, bool) {
        if let Some(existing) = self
            .attendance
            .iter_mut()
            .find(|r| r.owner_id == owner_id && r.date == date)
        {
            existing.status = status;
            existing.updated_at = Some(Utc::now());
            return (existing.clone(), false);
        }

        let record = AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            date,
            status,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.attendance.push(record.clone());
        (record, true)
    }

    pub fn attendance_for_owner(&self, owner_id: &str) -> Vec<AttendanceRecord> {
        let mut out: Vec<AttendanceRecord> = self
            .attendance
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.date);
        out
    }

    pub fn create_exam(
        &mut self,
        owner_id: &str,
        draft: ExamDraft,
    ) -> Result<ExamRecord, StoreError> {
        if !valid_marks(draft.marks_obtained, draft.max_marks) {
            return Err(StoreError::MarksOutOfRange);
        }
        let exam_name = draft
            .exam_name
            .unwrap_or_else(|| format!("{} Exam", draft.subject));
        let record = ExamRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            subject: draft.subject,
            exam_name,
            marks_obtained: draft.marks_obtained,
            max_marks: draft.max_marks,
            exam_date: draft.exam_date,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.exams.push(record.clone());
        Ok(record)
    }

    pub fn update_exam(
        &mut self,
        owner_id: &str,
        exam_id: &str,
        patch: ExamPatch,
    ) -> Result<ExamRecord, StoreError> {
        let record = self
            .exams
            .iter_mut()
            .find(|r| r.owner_id == owner_id && r.id == exam_id)
            .ok_or(StoreError::NotFound)?;

        let marks = patch.marks_obtained.unwrap_or(record.marks_obtained);
        let max = patch.max_marks.unwrap_or(record.max_marks);
        if !valid_marks(marks, max) {
            return Err(StoreError::MarksOutOfRange);
        }

        if let Some(subject) = patch.subject {
            record.subject = subject;
        }
        if let Some(exam_name) = patch.exam_name {
            record.exam_name = exam_name;
        }
        if let Some(exam_date) = patch.exam_date {
            record.exam_date = exam_date;
        }
        record.marks_obtained = marks;
        record.max_marks = max;
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }

    pub fn delete_exam(&mut self, owner_id: &str, exam_id: &str) -> Result<(), StoreError> {
        let before = self.exams.len();
        self.exams
            .retain(|r| !(r.owner_id == owner_id && r.id == exam_id));
        if self.exams.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Creation order. Callers wanting a display order sort the snapshot
    /// themselves; analytics relies on first-seen subject order.
    pub fn exams_for_owner(&self, owner_id: &str) -> Vec<ExamRecord> {
        self.exams
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect()
    }

    pub fn create_assignment(
        &mut self,
        owner_id: &str,
        title: String,
        subject: String,
        due_date: DateTime<Utc>,
    ) -> AssignmentRecord {
        let record = AssignmentRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title,
            subject,
            due_date,
            submitted_date: None,
            created_at: Utc::now(),
        };
        self.assignments.push(record.clone());
        record
    }

    pub fn submit_assignment(
        &mut self,
        owner_id: &str,
        assignment_id: &str,
        submitted_date: DateTime<Utc>,
    ) -> Result<AssignmentRecord, StoreError> {
        let record = self
            .assignments
            .iter_mut()
            .find(|r| r.owner_id == owner_id && r.id == assignment_id)
            .ok_or(StoreError::NotFound)?;
        record.submitted_date = Some(submitted_date);
        Ok(record.clone())
    }

    pub fn delete_assignment(
        &mut self,
        owner_id: &str,
        assignment_id: &str,
    ) -> Result<(), StoreError> {
        let before = self.assignments.len();
        self.assignments
            .retain(|r| !(r.owner_id == owner_id && r.id == assignment_id));
        if self.assignments.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Creation order, like [`RecordStore::exams_for_owner`].
    pub fn assignments_for_owner(&self, owner_id: &str) -> Vec<AssignmentRecord> {
        self.assignments
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("test date")
    }

    #[test]
    fn attendance_upsert_keeps_one_record_per_day() {
        let mut store = RecordStore::new();
        let (_, created) = store.set_attendance("s1", day("2024-05-01"), AttendanceStatus::Present);
        assert!(created);
        let (updated, created) =
            store.set_attendance("s1", day("2024-05-01"), AttendanceStatus::Absent);
        assert!(!created);
        assert_eq!(updated.status, AttendanceStatus::Absent);
        assert!(updated.updated_at.is_some());

        let records = store.attendance_for_owner("s1");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Absent);
    }

    #[test]
    fn owners_are_isolated() {
        let mut store = RecordStore::new();
        store.set_attendance("s1", day("2024-05-01"), AttendanceStatus::Present);
        store.set_attendance("s2", day("2024-05-01"), AttendanceStatus::Absent);
        assert_eq!(store.attendance_for_owner("s1").len(), 1);
        assert_eq!(store.attendance_for_owner("s2").len(), 1);
        assert!(store.attendance_for_owner("s3").is_empty());
    }

    #[test]
    fn exam_write_path_enforces_mark_bounds() {
        let mut store = RecordStore::new();
        let bad = store.create_exam(
            "s1",
            ExamDraft {
                subject: "Math".into(),
                exam_name: None,
                marks_obtained: 110,
                max_marks: 100,
                exam_date: Utc::now(),
            },
        );
        assert_eq!(bad.unwrap_err(), StoreError::MarksOutOfRange);

        let created = store
            .create_exam(
                "s1",
                ExamDraft {
                    subject: "Math".into(),
                    exam_name: None,
                    marks_obtained: 90,
                    max_marks: 100,
                    exam_date: Utc::now(),
                },
            )
            .expect("valid exam");
        assert_eq!(created.exam_name, "Math Exam");

        // A patch may not leave marks above the (possibly patched) maximum.
        let err = store.update_exam(
            "s1",
            &created.id,
            ExamPatch {
                max_marks: Some(80),
                ..ExamPatch::default()
            },
        );
        assert_eq!(err.unwrap_err(), StoreError::MarksOutOfRange);

        let ok = store
            .update_exam(
                "s1",
                &created.id,
                ExamPatch {
                    marks_obtained: Some(75),
                    max_marks: Some(80),
                    ..ExamPatch::default()
                },
            )
            .expect("valid patch");
        assert_eq!(ok.marks_obtained, 75);
        assert_eq!(ok.max_marks, 80);
    }

    #[test]
    fn exam_update_requires_matching_owner() {
        let mut store = RecordStore::new();
        let created = store
            .create_exam(
                "s1",
                ExamDraft {
                    subject: "Math".into(),
                    exam_name: None,
                    marks_obtained: 10,
                    max_marks: 20,
                    exam_date: Utc::now(),
                },
            )
            .expect("valid exam");
        let err = store.update_exam("someone-else", &created.id, ExamPatch::default());
        assert_eq!(err.unwrap_err(), StoreError::NotFound);
    }

    #[test]
    fn assignment_submit_and_delete() {
        let mut store = RecordStore::new();
        let a = store.create_assignment("s1", "Essay".into(), "English".into(), Utc::now());
        assert!(a.submitted_date.is_none());

        let submitted = store
            .submit_assignment("s1", &a.id, Utc::now())
            .expect("submit");
        assert!(submitted.submitted_date.is_some());

        assert_eq!(
            store.submit_assignment("s1", "missing", Utc::now()),
            Err(StoreError::NotFound)
        );
        store.delete_assignment("s1", &a.id).expect("delete");
        assert!(store.assignments_for_owner("s1").is_empty());
    }
}
