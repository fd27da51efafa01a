use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::err;

pub fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    if let Some(resp) = handlers::core::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::auth::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::dashboard::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::scan::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::directory::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::notes::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::assist::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::settings::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
