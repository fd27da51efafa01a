use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::{Severity, Violation};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use uuid::Uuid;

const SCAN_KINDS: [&str; 4] = ["Tardiness", "Attire", "Academic", "Behavior"];

/// The entry form has no severity picker; stored records still carry one.
fn severity_for(kind: &str) -> Severity {
    match kind {
        "Academic" => Severity::High,
        "Behavior" => Severity::Medium,
        _ => Severity::Low,
    }
}

fn handle_identify(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    if !session.is_teacher() {
        return err(&req.id, "forbidden", "scanning requires teacher access", None);
    }

    // Simulated QR read: no camera, just a roster lookup.
    let student_id = req
        .params
        .get("studentId")
        .and_then(|v| v.as_str())
        .unwrap_or(&state.store.scan_target)
        .to_string();
    match state.store.student(&student_id) {
        Some(s) => ok(&req.id, json!({ "student": s })),
        None => err(
            &req.id,
            "not_found",
            format!("unknown student: {}", student_id),
            None,
        ),
    }
}

fn handle_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    if !session.is_teacher() {
        return err(&req.id, "forbidden", "scanning requires teacher access", None);
    }

    let student_id = match req.params.get("studentId").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing studentId", None),
    };
    let kind = match req.params.get("type").and_then(|v| v.as_str()) {
        Some(v) if SCAN_KINDS.contains(&v) => v.to_string(),
        Some(v) => {
            return err(
                &req.id,
                "bad_params",
                format!("unknown incident type: {}", v),
                Some(json!({ "allowed": SCAN_KINDS })),
            )
        }
        None => return err(&req.id, "bad_params", "missing type", None),
    };
    let description = match req.params.get("description").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing description", None),
    };
    let location = match req.params.get("location").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing location", None),
    };

    let Some(student) = state.store.student(&student_id).cloned() else {
        return err(
            &req.id,
            "not_found",
            format!("unknown student: {}", student_id),
            None,
        );
    };

    let record = Violation {
        id: Uuid::new_v4().to_string(),
        student_id: student.id.clone(),
        student_name: student.name.clone(),
        severity: severity_for(&kind),
        kind,
        date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        description,
        location,
    };
    state.store.violations.push(record.clone());
    let counted = state
        .store
        .bump_section_count(&student.grade, &student.section);
    tracing::info!(student = %student.id, kind = %record.kind, "violation recorded");

    ok(&req.id, json!({ "record": record, "sectionCounted": counted }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "scan.identify" => Some(handle_identify(state, req)),
        "scan.submit" => Some(handle_submit(state, req)),
        _ => None,
    }
}
