use chrono::Utc;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_str, owner_id, parse_instant, required_str};
use crate::ipc::types::{AppState, Request};
use crate::store::StoreError;

fn store_error_response(req: &Request, e: StoreError) -> serde_json::Value {
    match e {
        StoreError::NotFound => err(&req.id, "not_found", "assignment record not found", None),
        other => err(&req.id, "store_error", other.to_string(), None),
    }
}

fn handle_assignments_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    // Most recently due first.
    let mut assignments = state.store.assignments_for_owner(&owner);
    assignments.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    ok(&req.id, json!({ "assignments": assignments }))
}

fn handle_assignments_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let title = match required_str(req, "title") {
        Ok(v) => v.trim().to_string(),
        Err(resp) => return resp,
    };
    if title.is_empty() {
        return err(&req.id, "bad_params", "title must not be empty", None);
    }
    let subject = match required_str(req, "subject") {
        Ok(v) => v.trim().to_string(),
        Err(resp) => return resp,
    };
    if subject.is_empty() {
        return err(&req.id, "bad_params", "subject must not be empty", None);
    }
    let raw_due = match required_str(req, "dueDate") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let due_date = match parse_instant(req, "dueDate", &raw_due) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let record = state
        .store
        .create_assignment(&owner, title, subject, due_date);
    ok(&req.id, json!({ "assignment": record }))
}

/// Marks an assignment as handed in. `submittedDate` defaults to now so a
/// student clicking "submit" does not have to supply a timestamp.
fn handle_assignments_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let submitted_date = match optional_str(req, "submittedDate") {
        Some(raw) => match parse_instant(req, "submittedDate", &raw) {
            Ok(v) => v,
            Err(resp) => return resp,
        },
        None => Utc::now(),
    };

    match state
        .store
        .submit_assignment(&owner, &assignment_id, submitted_date)
    {
        Ok(record) => ok(&req.id, json!({ "assignment": record })),
        Err(e) => store_error_response(req, e),
    }
}

fn handle_assignments_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let assignment_id = match required_str(req, "assignmentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.store.delete_assignment(&owner, &assignment_id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_error_response(req, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assignments.list" => Some(handle_assignments_list(state, req)),
        "assignments.create" => Some(handle_assignments_create(state, req)),
        "assignments.submit" => Some(handle_assignments_submit(state, req)),
        "assignments.delete" => Some(handle_assignments_delete(state, req)),
        _ => None,
    }
}
