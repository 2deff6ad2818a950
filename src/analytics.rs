use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::model::{AssignmentRecord, AttendanceRecord, AttendanceStatus, ExamRecord};

/// Months of history the performance-analytics screen charts at most.
pub const MONTH_WINDOW: usize = 8;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAttendance {
    /// Machine-sortable `YYYY-MM` bucket key.
    pub month_key: String,
    /// Abbreviated month name for chart labels.
    pub month: String,
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectScore {
    pub subject: String,
    pub percentage: i64,
    pub exam_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PunctualityCounts {
    pub on_time: u64,
    #[serde(rename = "late1to2")]
    pub late_1_to_2: u64,
    #[serde(rename = "late3plus")]
    pub late_3_plus: u64,
    pub not_submitted: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PunctualityBreakdown {
    pub on_time: i64,
    #[serde(rename = "late1to2")]
    pub late_1_to_2: i64,
    #[serde(rename = "late3plus")]
    pub late_3_plus: i64,
    pub not_submitted: i64,
    pub total_assignments: usize,
    pub categories: PunctualityCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub avg_attendance: f64,
    pub attendance_trend: TrendDirection,
    pub avg_score: f64,
    pub score_trend: TrendDirection,
    pub punctuality_rate: i64,
    pub has_attendance_data: bool,
    pub has_score_data: bool,
}

/// Half-up integer percentage. 0 when the denominator is empty, so no
/// division-by-zero ever reaches a caller.
fn ratio_percent(part: u64, whole: u64) -> i64 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as i64
}

/// 1-decimal rounding used for the dashboard averages:
/// `round(10*x) / 10`.
pub fn round_to_tenth(x: f64) -> f64 {
    (10.0 * x).round() / 10.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct MonthTally {
    present: u64,
    countable: u64,
}

/// Monthly attendance percentages, oldest month first.
///
/// `publicHoliday` and `notTracked` days are not attendance outcomes and are
/// excluded from both numerator and denominator. A month with no countable
/// day is omitted entirely. At most the [`MONTH_WINDOW`] most recent months
/// are returned, order preserved.
pub fn aggregate_attendance(records: &[AttendanceRecord]) -> Vec<MonthlyAttendance> {
    let mut by_month: BTreeMap<(i32, u32), MonthTally> = BTreeMap::new();
    for r in records {
        let tally = by_month
            .entry((r.date.year(), r.date.month()))
            .or_default();
        match r.status {
            AttendanceStatus::Present => {
                tally.present += 1;
                tally.countable += 1;
            }
            AttendanceStatus::Absent => {
                tally.countable += 1;
            }
            AttendanceStatus::PublicHoliday | AttendanceStatus::NotTracked => {}
        }
    }

    let mut months: Vec<MonthlyAttendance> = by_month
        .into_iter()
        .filter(|(_, tally)| tally.countable > 0)
        .map(|((year, month), tally)| MonthlyAttendance {
            month_key: format!("{year:04}-{month:02}"),
            month: month_abbrev(month).to_string(),
            percentage: ratio_percent(tally.present, tally.countable),
        })
        .collect();
    if months.len() > MONTH_WINDOW {
        months.drain(..months.len() - MONTH_WINDOW);
    }
    months
}

#[derive(Debug, Clone, Copy, Default)]
struct SubjectTally {
    total_marks: u64,
    total_max: u64,
    count: usize,
}

/// Per-subject score percentages, subjects in first-seen order.
///
/// Pooled-ratio semantics: `Σ marks / Σ max` across the subject's exams,
/// never the mean of per-exam percentages. Subject labels group by exact,
/// case-sensitive match. Records violating `marksObtained <= maxMarks` (or
/// carrying a zero `maxMarks`) are skipped so one bad record upstream cannot
/// take the whole chart down.
pub fn aggregate_scores(records: &[ExamRecord]) -> Vec<SubjectScore> {
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, SubjectTally> = HashMap::new();
    for r in records {
        if r.max_marks == 0 || r.marks_obtained > r.max_marks {
            continue;
        }
        if !tallies.contains_key(r.subject.as_str()) {
            order.push(r.subject.as_str());
        }
        let tally = tallies.entry(r.subject.as_str()).or_default();
        tally.total_marks += u64::from(r.marks_obtained);
        tally.total_max += u64::from(r.max_marks);
        tally.count += 1;
    }

    order
        .into_iter()
        .filter_map(|subject| {
            let tally = tallies.get(subject).copied()?;
            if tally.total_max == 0 {
                return None;
            }
            Some(SubjectScore {
                subject: subject.to_string(),
                percentage: ratio_percent(tally.total_marks, tally.total_max),
                exam_count: tally.count,
            })
        })
        .collect()
}

/// Days past due, ceiling at millisecond precision: one millisecond past the
/// due instant already counts as a full day late. Zero or negative means the
/// submission was on time.
fn days_late(due: DateTime<Utc>, submitted: DateTime<Utc>) -> i64 {
    let ms = (submitted - due).num_milliseconds();
    let days = ms / MS_PER_DAY;
    if ms > days * MS_PER_DAY {
        days + 1
    } else {
        days
    }
}

/// Punctuality breakdown over all supplied assignments.
///
/// `total` counts every input record, not-submitted included. With an empty
/// input all four percentages are exactly 0.
pub fn aggregate_punctuality(records: &[AssignmentRecord]) -> PunctualityBreakdown {
    let mut counts = PunctualityCounts::default();
    for r in records {
        match r.submitted_date {
            None => counts.not_submitted += 1,
            Some(submitted) => match days_late(r.due_date, submitted) {
                d if d <= 0 => counts.on_time += 1,
                1 | 2 => counts.late_1_to_2 += 1,
                _ => counts.late_3_plus += 1,
            },
        }
    }

    let total = records.len();
    let whole = total as u64;
    PunctualityBreakdown {
        on_time: ratio_percent(counts.on_time, whole),
        late_1_to_2: ratio_percent(counts.late_1_to_2, whole),
        late_3_plus: ratio_percent(counts.late_3_plus, whole),
        not_submitted: ratio_percent(counts.not_submitted, whole),
        total_assignments: total,
        categories: counts,
    }
}

/// Coarse direction of a percentage series: mean of the first half against
/// mean of the second half, split at `floor(n/2)` (an odd middle element
/// belongs to the second half). Equal means are neutral, not down.
pub fn calculate_trend(series: &[f64]) -> TrendDirection {
    if series.len() < 2 {
        return TrendDirection::Neutral;
    }
    let split = series.len() / 2;
    let first = mean(&series[..split]);
    let second = mean(&series[split..]);
    if second > first {
        TrendDirection::Up
    } else if second < first {
        TrendDirection::Down
    } else {
        TrendDirection::Neutral
    }
}

/// Headline numbers for the analytics screen. Empty series average to 0.0
/// with the matching `has*Data` flag cleared; NaN never escapes.
pub fn summarize(
    attendance: &[MonthlyAttendance],
    scores: &[SubjectScore],
    punctuality: &PunctualityBreakdown,
) -> SummaryStats {
    let attendance_series: Vec<f64> = attendance.iter().map(|m| m.percentage as f64).collect();
    let score_series: Vec<f64> = scores.iter().map(|s| s.percentage as f64).collect();

    SummaryStats {
        avg_attendance: round_to_tenth(mean(&attendance_series)),
        attendance_trend: calculate_trend(&attendance_series),
        avg_score: round_to_tenth(mean(&score_series)),
        score_trend: calculate_trend(&score_series),
        punctuality_rate: punctuality.on_time,
        has_attendance_data: !attendance_series.is_empty(),
        has_score_data: !score_series.is_empty(),
    }
}
