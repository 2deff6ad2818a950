use chrono::Datelike;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{owner_id, parse_date, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::AttendanceStatus;

/// Calendar view: days keyed by ISO date, optionally narrowed to one
/// year/month.
fn handle_attendance_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let year = req.params.get("year").and_then(|v| v.as_i64());
    let month = req.params.get("month").and_then(|v| v.as_u64());
    if let Some(m) = month {
        if !(1..=12).contains(&m) {
            return err(&req.id, "bad_params", "month must be between 1 and 12", None);
        }
    }

    let mut days = serde_json::Map::new();
    for r in state.store.attendance_for_owner(&owner) {
        if let Some(y) = year {
            if i64::from(r.date.year()) != y {
                continue;
            }
        }
        if let Some(m) = month {
            if u64::from(r.date.month()) != m {
                continue;
            }
        }
        days.insert(
            r.date.format("%Y-%m-%d").to_string(),
            json!(r.status.as_str()),
        );
    }

    ok(&req.id, json!({ "days": days }))
}

fn handle_attendance_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let raw_date = match required_str(req, "date") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let date = match parse_date(req, "date", &raw_date) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let raw_status = match required_str(req, "status") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(status) = AttendanceStatus::parse(&raw_status) else {
        return err(
            &req.id,
            "bad_params",
            "status must be one of: present, absent, publicHoliday, notTracked",
            Some(json!({ "status": raw_status })),
        );
    };

    let (record, created) = state.store.set_attendance(&owner, date, status);
    ok(
        &req.id,
        json!({
            "date": record.date.format("%Y-%m-%d").to_string(),
            "status": record.status.as_str(),
            "created": created
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "attendance.list" => Some(handle_attendance_list(state, req)),
        "attendance.set" => Some(handle_attendance_set(state, req)),
        _ => None,
    }
}
