use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::Violation;
use serde_json::json;

fn handle_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return err(&req.id, "no_session", "sign in first", None);
    };

    let recent: Vec<&Violation> = state.store.violations.iter().rev().take(3).collect();

    // Stat tiles are presented figures, not computed ones; analytics stays
    // out of scope.
    ok(
        &req.id,
        json!({
            "user": &session.user,
            "readOnly": !session.is_teacher(),
            "stats": [
                { "label": "Verification", "value": "100%", "trend": "Secure" },
                { "label": "Avg. Time", "value": "2.4s", "trend": "Syncing" },
                { "label": "Logs", "value": "1,204", "trend": "+42 today" },
                { "label": "Nodes", "value": "12", "trend": "Encrypted" },
            ],
            "activity": &state.store.activity,
            "recentViolations": recent,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.summary" => Some(handle_summary(state, req)),
        _ => None,
    }
}
