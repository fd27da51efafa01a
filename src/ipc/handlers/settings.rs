use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request, Session};
use crate::store::Settings;
use serde_json::json;

#[derive(Clone, Copy)]
enum ToggleKey {
    Biometric,
    Haptic,
    Notifications,
    DarkMode,
}

impl ToggleKey {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "biometric" => Some(Self::Biometric),
            "haptic" => Some(Self::Haptic),
            "notifications" => Some(Self::Notifications),
            "darkMode" => Some(Self::DarkMode),
            _ => None,
        }
    }

    fn flip(self, settings: &mut Settings) -> bool {
        let slot = match self {
            Self::Biometric => &mut settings.biometric,
            Self::Haptic => &mut settings.haptic,
            Self::Notifications => &mut settings.notifications,
            Self::DarkMode => &mut settings.dark_mode,
        };
        *slot = !*slot;
        *slot
    }
}

fn settings_json(session: &Session, settings: &Settings) -> serde_json::Value {
    json!({
        "profile": &session.user,
        "toggles": settings,
        "badges": {
            "encryption": "AES-256",
            "accessToken": "Validated",
            "incidentVisibility": if session.is_teacher() { "Full" } else { "Restricted" },
        }
    })
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    ok(&req.id, settings_json(session, &state.store.settings))
}

fn handle_toggle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_ref() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    let key = match req.params.get("key").and_then(|v| v.as_str()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing key", None),
    };
    let Some(toggle) = ToggleKey::parse(key) else {
        return err(
            &req.id,
            "bad_params",
            format!("unknown toggle: {}", key),
            None,
        );
    };
    toggle.flip(&mut state.store.settings);
    ok(&req.id, settings_json(session, &state.store.settings))
}

fn handle_update_profile(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(session) = state.session.as_mut() else {
        return err(&req.id, "no_session", "sign in first", None);
    };
    if let Some(name) = req.params.get("name").and_then(|v| v.as_str()) {
        if name.trim().is_empty() {
            return err(&req.id, "bad_params", "name must not be empty", None);
        }
        session.user.name = name.trim().to_string();
    }
    if let Some(email) = req.params.get("email").and_then(|v| v.as_str()) {
        if email.trim().is_empty() {
            return err(&req.id, "bad_params", "email must not be empty", None);
        }
        session.user.email = email.trim().to_string();
    }
    ok(&req.id, json!({ "user": &session.user }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "settings.get" => Some(handle_get(state, req)),
        "settings.toggle" => Some(handle_toggle(state, req)),
        "settings.updateProfile" => Some(handle_update_profile(state, req)),
        _ => None,
    }
}
