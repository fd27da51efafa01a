use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

// Placeholder until the model integration lands; the UI only shows the text.
fn handle_analyze_trend(state: &mut AppState, req: &Request) -> serde_json::Value {
    if state.session.is_none() {
        return err(&req.id, "no_session", "sign in first", None);
    }
    ok(
        &req.id,
        json!({ "analysis": "AI analysis features are ready for integration." }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assist.analyzeTrend" => Some(handle_analyze_trend(state, req)),
        _ => None,
    }
}
