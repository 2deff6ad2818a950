use chrono::{Months, NaiveDate, Utc};
use serde_json::json;

use crate::analytics;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::owner_id;
use crate::ipc::types::{AppState, Request};
use crate::model::{AssignmentRecord, AttendanceRecord, ExamRecord};

/// Reporting window accepted by the analytics endpoints. The aggregation
/// core is period-agnostic; the window is applied here, before records
/// reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Period {
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl Period {
    fn months(self) -> u32 {
        match self {
            Period::ThreeMonths => 3,
            Period::SixMonths => 6,
            Period::OneYear => 12,
        }
    }
}

fn parse_period(req: &Request) -> Result<Period, serde_json::Value> {
    match req.params.get("period") {
        None => Ok(Period::SixMonths),
        Some(v) if v.is_null() => Ok(Period::SixMonths),
        Some(v) => {
            let Some(raw) = v.as_str() else {
                return Err(err(&req.id, "bad_params", "period must be a string", None));
            };
            match raw {
                "3months" => Ok(Period::ThreeMonths),
                "6months" => Ok(Period::SixMonths),
                "1year" => Ok(Period::OneYear),
                other => Err(err(
                    &req.id,
                    "bad_params",
                    "period must be one of: 3months, 6months, 1year",
                    Some(json!({ "period": other })),
                )),
            }
        }
    }
}

/// `asOf` pins the end of the reporting window; it defaults to today so the
/// portal can omit it, while tests and backfills pass it explicitly.
fn parse_as_of(req: &Request) -> Result<NaiveDate, serde_json::Value> {
    match req.params.get("asOf").and_then(|v| v.as_str()) {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| err(&req.id, "bad_params", "asOf must be YYYY-MM-DD", None)),
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    start: NaiveDate,
    end: NaiveDate,
}

impl Window {
    fn resolve(req: &Request) -> Result<Self, serde_json::Value> {
        let period = parse_period(req)?;
        let end = parse_as_of(req)?;
        let start = end
            .checked_sub_months(Months::new(period.months()))
            .unwrap_or(NaiveDate::MIN);
        Ok(Window { start, end })
    }

    fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

fn windowed_attendance(
    state: &AppState,
    owner: &str,
    window: Window,
) -> Vec<AttendanceRecord> {
    state
        .store
        .attendance_for_owner(owner)
        .into_iter()
        .filter(|r| window.contains(r.date))
        .collect()
}

fn windowed_exams(state: &AppState, owner: &str, window: Window) -> Vec<ExamRecord> {
    state
        .store
        .exams_for_owner(owner)
        .into_iter()
        .filter(|r| window.contains(r.exam_date.date_naive()))
        .collect()
}

fn windowed_assignments(
    state: &AppState,
    owner: &str,
    window: Window,
) -> Vec<AssignmentRecord> {
    state
        .store
        .assignments_for_owner(owner)
        .into_iter()
        .filter(|r| window.contains(r.due_date.date_naive()))
        .collect()
}

fn handle_analytics_attendance(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let window = match Window::resolve(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let months = analytics::aggregate_attendance(&windowed_attendance(state, &owner, window));
    ok(&req.id, json!(months))
}

fn handle_analytics_scores(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let window = match Window::resolve(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let scores = analytics::aggregate_scores(&windowed_exams(state, &owner, window));
    ok(&req.id, json!(scores))
}

fn handle_analytics_assignments(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let window = match Window::resolve(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let breakdown =
        analytics::aggregate_punctuality(&windowed_assignments(state, &owner, window));
    ok(&req.id, json!(breakdown))
}

/// The full performance-analytics screen payload: the three data sets plus
/// headline statistics, all over one shared window.
fn handle_analytics_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let window = match Window::resolve(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let months = analytics::aggregate_attendance(&windowed_attendance(state, &owner, window));
    let scores = analytics::aggregate_scores(&windowed_exams(state, &owner, window));
    let punctuality =
        analytics::aggregate_punctuality(&windowed_assignments(state, &owner, window));
    let stats = analytics::summarize(&months, &scores, &punctuality);

    ok(
        &req.id,
        json!({
            "attendance": months,
            "subjectScores": scores,
            "punctuality": punctuality,
            "stats": stats
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.attendance" => Some(handle_analytics_attendance(state, req)),
        "analytics.scores" => Some(handle_analytics_scores(state, req)),
        "analytics.assignments" => Some(handle_analytics_assignments(state, req)),
        "analytics.overview" => Some(handle_analytics_overview(state, req)),
        _ => None,
    }
}
