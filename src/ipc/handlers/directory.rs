use crate::catalog::{Catalog, NavOutcome, View};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request, Session};
use serde_json::json;

/// Full post-operation state; the UI re-renders from this unconditionally,
/// so a mutating response can never leave it stale.
fn directory_state(session: &Session, catalog: &Catalog) -> serde_json::Value {
    let nav = &session.nav;
    let listing = match nav.view() {
        View::Grades => json!(catalog
            .grades
            .iter()
            .map(|g| json!({
                "id": g.id,
                "name": g.name,
                "count": g.sections.len(),
                "countLabel": "Sections",
            }))
            .collect::<Vec<_>>()),
        View::Sections => json!(nav
            .selected_grade(catalog)
            .map(|g| g
                .sections
                .iter()
                .map(|s| json!({
                    "id": s.id,
                    "name": s.name,
                    "count": s.item_count,
                    "countLabel": "Logs",
                }))
                .collect::<Vec<_>>())
            .unwrap_or_default()),
        View::Records => json!([]),
    };
    json!({
        "view": nav.view(),
        "breadcrumb": nav.breadcrumb(catalog),
        "listing": listing,
        "editingId": nav.editing_id(),
        "editBuffer": nav.edit_buffer(),
    })
}

fn respond(
    req: &Request,
    outcome: NavOutcome,
    session: &Session,
    catalog: &Catalog,
    extra: Option<(&str, serde_json::Value)>,
) -> serde_json::Value {
    let mut result = json!({
        "applied": outcome.applied(),
        "state": directory_state(session, catalog),
    });
    if let Some(reason) = outcome.reason() {
        result["reason"] = json!(reason);
        tracing::debug!(method = %req.method, reason, "directory op ignored");
    }
    if let Some((key, value)) = extra {
        result[key] = value;
    }
    ok(&req.id, result)
}

fn require_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

fn handle_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    ok(
        &req.id,
        json!({ "state": directory_state(session, &state.store.catalog) }),
    )
}

fn handle_select_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let grade_id = match require_str(req, "gradeId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let outcome = session.nav.select_grade(&state.store.catalog, grade_id);
    respond(req, outcome, session, &state.store.catalog, None)
}

fn handle_select_section(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let section_id = match require_str(req, "sectionId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let outcome = session.nav.select_section(&state.store.catalog, section_id);
    respond(req, outcome, session, &state.store.catalog, None)
}

fn handle_back(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let outcome = session.nav.go_back();
    respond(req, outcome, session, &state.store.catalog, None)
}

fn handle_begin_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let node_id = match require_str(req, "nodeId") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    // The card passes the displayed name along; fall back to the tree.
    let current_name = req
        .params
        .get("currentName")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .or_else(|| state.store.catalog.node_name(&node_id).map(String::from))
        .unwrap_or_default();
    let outcome = session
        .nav
        .begin_edit(&state.store.catalog, &node_id, &current_name);
    respond(req, outcome, session, &state.store.catalog, None)
}

fn handle_edit_buffer(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let text = match require_str(req, "text") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let outcome = session.nav.update_edit_buffer(text);
    respond(req, outcome, session, &state.store.catalog, None)
}

fn handle_commit_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let outcome = session.nav.commit_edit(&mut state.store.catalog);
    respond(req, outcome, session, &state.store.catalog, None)
}

fn handle_cancel_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let outcome = session.nav.cancel_edit();
    respond(req, outcome, session, &state.store.catalog, None)
}

fn handle_add_node(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let outcome = session.nav.add_node(&mut state.store.catalog);
    // The new node goes straight into edit mode, so its id is the editing id.
    let extra = if outcome.applied() {
        session
            .nav
            .editing_id()
            .map(|id| ("newId", json!(id)))
    } else {
        None
    };
    respond(req, outcome, session, &state.store.catalog, extra)
}

fn handle_records(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let catalog = &state.store.catalog;
    let (Some(grade), Some(section)) = (
        session.nav.selected_grade(catalog),
        session.nav.selected_section(catalog),
    ) else {
        return err(&req.id, "invalid_transition", "no section selected", None);
    };
    let records = state.store.section_records(&grade.name, &section.name);
    ok(
        &req.id,
        json!({ "section": section.name, "records": records }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "directory.open" => Some(handle_open(state, req)),
        "directory.selectGrade" => Some(handle_select_grade(state, req)),
        "directory.selectSection" => Some(handle_select_section(state, req)),
        "directory.back" => Some(handle_back(state, req)),
        "directory.beginEdit" => Some(handle_begin_edit(state, req)),
        "directory.editBuffer" => Some(handle_edit_buffer(state, req)),
        "directory.commitEdit" => Some(handle_commit_edit(state, req)),
        "directory.cancelEdit" => Some(handle_cancel_edit(state, req)),
        "directory.addNode" => Some(handle_add_node(state, req)),
        "directory.records" => Some(handle_records(state, req)),
        _ => None,
    }
}
