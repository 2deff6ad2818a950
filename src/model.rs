use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Outcome recorded for one student on one calendar day.
///
/// `PublicHoliday` and `NotTracked` mark days where attendance was not an
/// outcome at all; the analytics side treats them accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    PublicHoliday,
    NotTracked,
}

impl AttendanceStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            "publicHoliday" => Some(Self::PublicHoliday),
            "notTracked" => Some(Self::NotTracked),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::PublicHoliday => "publicHoliday",
            Self::NotTracked => "notTracked",
        }
    }
}

/// One student-day. At most one record exists per (ownerId, date); the store
/// upserts in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub owner_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One graded exam sitting. Write path guarantees `max_marks >= 1` and
/// `marks_obtained <= max_marks`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    pub id: String,
    pub owner_id: String,
    pub subject: String,
    pub exam_name: String,
    pub marks_obtained: u32,
    pub max_marks: u32,
    pub exam_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One handed-out assignment. A missing `submitted_date` means the student
/// never submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub subject: String,
    pub due_date: DateTime<Utc>,
    pub submitted_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
