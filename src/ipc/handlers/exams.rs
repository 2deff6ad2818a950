use serde_json::json;
use tracing::warn;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{
    optional_str, optional_u32, owner_id, parse_instant, required_str, required_u32,
};
use crate::ipc::types::{AppState, Request};
use crate::store::{ExamDraft, ExamPatch, StoreError};

fn store_error_response(req: &Request, e: StoreError) -> serde_json::Value {
    match e {
        StoreError::NotFound => err(&req.id, "not_found", "exam record not found", None),
        StoreError::MarksOutOfRange => err(&req.id, "marks_out_of_range", e.to_string(), None),
    }
}

fn handle_exams_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    // Records screen order: most recent sitting first.
    let mut exams = state.store.exams_for_owner(&owner);
    exams.sort_by(|a, b| b.exam_date.cmp(&a.exam_date));
    ok(&req.id, json!({ "exams": exams }))
}

fn handle_exams_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let subject = match required_str(req, "subject") {
        Ok(v) => v.trim().to_string(),
        Err(resp) => return resp,
    };
    if subject.is_empty() {
        return err(&req.id, "bad_params", "subject must not be empty", None);
    }
    let marks_obtained = match required_u32(req, "marksObtained") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let max_marks = match required_u32(req, "maxMarks") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let raw_exam_date = match required_str(req, "examDate") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let exam_date = match parse_instant(req, "examDate", &raw_exam_date) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let exam_name = optional_str(req, "examName");

    let draft = ExamDraft {
        subject,
        exam_name,
        marks_obtained,
        max_marks,
        exam_date,
    };
    match state.store.create_exam(&owner, draft) {
        Ok(exam) => ok(&req.id, json!({ "exam": exam })),
        Err(e) => {
            warn!(owner_id = %owner, error = %e, "rejected exam record");
            store_error_response(req, e)
        }
    }
}

fn handle_exams_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let exam_id = match required_str(req, "examId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let marks_obtained = match optional_u32(req, "marksObtained") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let max_marks = match optional_u32(req, "maxMarks") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let exam_date = match optional_str(req, "examDate") {
        Some(raw) => match parse_instant(req, "examDate", &raw) {
            Ok(v) => Some(v),
            Err(resp) => return resp,
        },
        None => None,
    };

    let patch = ExamPatch {
        subject: optional_str(req, "subject"),
        exam_name: optional_str(req, "examName"),
        marks_obtained,
        max_marks,
        exam_date,
    };
    match state.store.update_exam(&owner, &exam_id, patch) {
        Ok(exam) => ok(&req.id, json!({ "exam": exam })),
        Err(e) => store_error_response(req, e),
    }
}

fn handle_exams_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let owner = match owner_id(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let exam_id = match required_str(req, "examId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.store.delete_exam(&owner, &exam_id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_error_response(req, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "exams.list" => Some(handle_exams_list(state, req)),
        "exams.create" => Some(handle_exams_create(state, req)),
        "exams.update" => Some(handle_exams_update(state, req)),
        "exams.delete" => Some(handle_exams_delete(state, req)),
        _ => None,
    }
}
