use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::Note;
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use uuid::Uuid;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.session.is_none() {
        return err(&req.id, "no_session", "sign in first", None);
    }

    let query = req
        .params
        .get("query")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_lowercase();
    let notes: Vec<&Note> = state
        .store
        .notes
        .iter()
        .rev()
        .filter(|n| {
            query.is_empty()
                || n.title.to_lowercase().contains(&query)
                || n.content.to_lowercase().contains(&query)
                || n.tags.iter().any(|t| t.to_lowercase().contains(&query))
        })
        .collect();
    ok(&req.id, json!({ "notes": notes }))
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    if !session.is_teacher() {
        return err(&req.id, "forbidden", "observations are read-only for students", None);
    }

    let title = match req.params.get("title").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing title", None),
    };
    let content = match req.params.get("content").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing content", None),
    };
    let tags = req
        .params
        .get("tags")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t.as_str())
                .map(|t| t.to_string())
                .collect()
        })
        .unwrap_or_default();

    let note = Note {
        id: Uuid::new_v4().to_string(),
        title,
        content,
        date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        tags,
    };
    state.store.notes.push(note.clone());
    ok(&req.id, json!({ "note": note }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "notes.list" => Some(handle_list(state, req)),
        "notes.create" => Some(handle_create(state, req)),
        _ => None,
    }
}
