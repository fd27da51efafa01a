use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request, Session};
use crate::store::{Role, User};
use serde_json::json;

fn parse_role(params: &serde_json::Value) -> Option<Role> {
    match params.get("role").and_then(|v| v.as_str()) {
        Some("teacher") => Some(Role::Teacher),
        Some("student") => Some(Role::Student),
        _ => None,
    }
}

/// Sign-in is simulated: the password is never verified and the identity is
/// derived from the role plus whatever id the caller typed.
fn mock_identity(role: Role, typed_id: &str, name_override: Option<String>) -> User {
    let id = if typed_id.is_empty() {
        match role {
            Role::Teacher => "T-902",
            Role::Student => "S-441",
        }
        .to_string()
    } else {
        typed_id.to_string()
    };
    let name = name_override.unwrap_or_else(|| {
        match role {
            Role::Teacher => "Prof. Sarah Jenkins",
            Role::Student => "Jordan Rivera",
        }
        .to_string()
    });
    let email = if id.contains('@') {
        id.clone()
    } else {
        match role {
            Role::Teacher => "s.jenkins@school.edu",
            Role::Student => "j.rivera@student.edu",
        }
        .to_string()
    };
    let role_tag = match role {
        Role::Teacher => "teacher",
        Role::Student => "student",
    };
    User {
        id: id.clone(),
        name,
        role,
        email,
        avatar_url: Some(format!("https://picsum.photos/seed/{role_tag}-{id}/200/200")),
    }
}

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(role) = parse_role(&req.params) else {
        return err(&req.id, "bad_params", "role must be teacher or student", None);
    };
    let password = req
        .params
        .get("password")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if password.is_empty() {
        return err(&req.id, "bad_params", "missing password", None);
    }

    let typed_id = req.params.get("id").and_then(|v| v.as_str()).unwrap_or("");
    let user = mock_identity(role, typed_id.trim(), None);
    tracing::info!(user = %user.id, role = ?role, "session opened");
    state.session = Some(Session::new(user.clone()));
    ok(&req.id, json!({ "user": user }))
}

fn handle_signup(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(role) = parse_role(&req.params) else {
        return err(&req.id, "bad_params", "role must be teacher or student", None);
    };
    let name = req
        .params
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .unwrap_or("");
    if name.is_empty() {
        return err(&req.id, "bad_params", "full name is required", None);
    }
    let password = req
        .params
        .get("password")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if password.is_empty() {
        return err(&req.id, "bad_params", "missing password", None);
    }
    let confirm = req
        .params
        .get("confirmPassword")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if password != confirm {
        return err(&req.id, "bad_params", "passwords do not match", None);
    }

    let typed_id = req.params.get("id").and_then(|v| v.as_str()).unwrap_or("");
    let user = mock_identity(role, typed_id.trim(), Some(name.to_string()));
    tracing::info!(user = %user.id, role = ?role, "session opened via signup");
    state.session = Some(Session::new(user.clone()));
    ok(&req.id, json!({ "user": user }))
}

fn handle_session(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({ "user": state.session.as_ref().map(|s| &s.user) }),
    )
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    if let Some(s) = state.session.take() {
        tracing::info!(user = %s.user.id, "session closed");
    }
    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.signup" => Some(handle_signup(state, req)),
        "auth.session" => Some(handle_session(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        _ => None,
    }
}
