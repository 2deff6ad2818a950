use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::ipc::error::err;
use crate::ipc::types::Request;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
}

pub fn owner_id(req: &Request) -> Result<String, serde_json::Value> {
    let raw = required_str(req, "ownerId")?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(err(&req.id, "bad_params", "ownerId must not be empty", None));
    }
    Ok(trimmed.to_string())
}

pub fn required_u32(req: &Request, key: &str) -> Result<u32, serde_json::Value> {
    let Some(raw) = req.params.get(key).and_then(|v| v.as_u64()) else {
        return Err(err(
            &req.id,
            "bad_params",
            format!("{} must be a non-negative integer", key),
            None,
        ));
    };
    u32::try_from(raw)
        .map_err(|_| err(&req.id, "bad_params", format!("{} out of range", key), None))
}

pub fn optional_u32(req: &Request, key: &str) -> Result<Option<u32>, serde_json::Value> {
    match req.params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(_) => required_u32(req, key).map(Some),
    }
}

/// Calendar day in ISO `YYYY-MM-DD` form.
pub fn parse_date(req: &Request, key: &str, raw: &str) -> Result<NaiveDate, serde_json::Value> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        err(
            &req.id,
            "bad_params",
            format!("{} must be YYYY-MM-DD", key),
            None,
        )
    })
}

/// Instant: RFC 3339, or a bare ISO date taken as midnight UTC.
pub fn parse_instant(
    req: &Request,
    key: &str,
    raw: &str,
) -> Result<DateTime<Utc>, serde_json::Value> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN).and_utc());
    }
    Err(err(
        &req.id,
        "bad_params",
        format!("{} must be RFC 3339 or YYYY-MM-DD", key),
        None,
    ))
}
