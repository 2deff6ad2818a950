use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_str, owner_id, parse_date};
use crate::ipc::types::{AppState, Request};
use crate::sample;

fn handle_health(_state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "status": "OK",
            "version": env!("CARGO_PKG_VERSION")
        }),
    )
}

/// Seeds the demo data set for one owner. `asOf` pins the seed window for
/// reproducible output; it defaults to today.
fn handle_sample_seed(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let as_of = match optional_str(req, "asOf") {
        Some(raw) => match parse_date(req, "asOf", &raw) {
            Ok(v) => v,
            Err(resp) => return resp,
        },
        None => Utc::now().date_naive(),
    };

    match sample::seed_owner(&mut state.store, &owner, as_of) {
        Ok(counts) => {
            info!(
                owner_id = %owner,
                attendance = counts.attendance,
                exams = counts.exams,
                assignments = counts.assignments,
                "seeded sample data"
            );
            ok(
                &req.id,
                json!({
                    "attendance": counts.attendance,
                    "exams": counts.exams,
                    "assignments": counts.assignments
                }),
            )
        }
        Err(e) => err(&req.id, "seed_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "sample.seed" => Some(handle_sample_seed(state, req)),
        _ => None,
    }
}
