mod test_support;

use serde_json::json;
use test_support::{request_ok, spawn_sidecar};

#[test]
fn monthly_percentages_follow_the_canonical_attendance_policy() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let mut next_id = 0u32;
    let mut id = || {
        next_id += 1;
        next_id.to_string()
    };

    // August 2024: 22 tracked days, 18 present.
    for d in 1..=22u32 {
        let status = if d <= 18 { "present" } else { "absent" };
        request_ok(
            &mut stdin,
            &mut reader,
            &id(),
            "attendance.set",
            json!({ "ownerId": "s1", "date": format!("2024-08-{d:02}"), "status": status }),
        );
    }
    // May 2024: 2 present, 1 absent, plus days that are not attendance
    // outcomes and must not dilute the percentage.
    for (d, status) in [
        (1, "present"),
        (2, "present"),
        (3, "absent"),
        (4, "publicHoliday"),
        (6, "notTracked"),
    ] {
        request_ok(
            &mut stdin,
            &mut reader,
            &id(),
            "attendance.set",
            json!({ "ownerId": "s1", "date": format!("2024-05-{d:02}"), "status": status }),
        );
    }
    // April 2024 holds no countable day at all and must be omitted.
    request_ok(
        &mut stdin,
        &mut reader,
        &id(),
        "attendance.set",
        json!({ "ownerId": "s1", "date": "2024-04-10", "status": "publicHoliday" }),
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        &id(),
        "analytics.attendance",
        json!({ "ownerId": "s1", "period": "6months", "asOf": "2024-08-31" }),
    );
    let months = result.as_array().expect("months array").clone();
    assert_eq!(months.len(), 2);

    assert_eq!(months[0].get("monthKey").and_then(|v| v.as_str()), Some("2024-05"));
    assert_eq!(months[0].get("month").and_then(|v| v.as_str()), Some("May"));
    assert_eq!(months[0].get("percentage").and_then(|v| v.as_i64()), Some(67));

    assert_eq!(months[1].get("monthKey").and_then(|v| v.as_str()), Some("2024-08"));
    assert_eq!(months[1].get("month").and_then(|v| v.as_str()), Some("Aug"));
    assert_eq!(months[1].get("percentage").and_then(|v| v.as_i64()), Some(82));
}

#[test]
fn period_window_excludes_months_older_than_the_cutoff() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.set",
        json!({ "ownerId": "s1", "date": "2024-05-02", "status": "present" }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.set",
        json!({ "ownerId": "s1", "date": "2024-08-05", "status": "present" }),
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "analytics.attendance",
        json!({ "ownerId": "s1", "period": "3months", "asOf": "2024-08-31" }),
    );
    let months = result.as_array().expect("months array").clone();
    assert_eq!(months.len(), 1);
    assert_eq!(months[0].get("monthKey").and_then(|v| v.as_str()), Some("2024-08"));
}

#[test]
fn analytics_only_see_the_requested_owner() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "attendance.set",
        json!({ "ownerId": "s1", "date": "2024-08-05", "status": "present" }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "attendance.set",
        json!({ "ownerId": "s2", "date": "2024-08-06", "status": "absent" }),
    );

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "analytics.attendance",
        json!({ "ownerId": "s2", "asOf": "2024-08-31" }),
    );
    let months = result.as_array().expect("months array").clone();
    assert_eq!(months.len(), 1);
    // s2's single absent day: 0 of 1 present.
    assert_eq!(months[0].get("percentage").and_then(|v| v.as_i64()), Some(0));
}
