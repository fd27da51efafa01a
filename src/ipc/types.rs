use crate::catalog::Navigator;
use crate::store::{Role, Store, User};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A signed-in principal plus their directory navigator. The navigator's
/// editor capability is fixed here, at session construction.
pub struct Session {
    pub user: User,
    pub nav: Navigator,
}

impl Session {
    pub fn new(user: User) -> Self {
        let editor = user.role == Role::Teacher;
        Self {
            user,
            nav: Navigator::new(editor),
        }
    }

    pub fn is_teacher(&self) -> bool {
        self.user.role == Role::Teacher
    }
}

pub struct AppState {
    pub store: Store,
    pub session: Option<Session>,
}
