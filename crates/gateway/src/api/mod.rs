pub mod chat;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/assist/thread-chat", post(chat::thread_chat))
}

/// Liveness probe: the process is up, nothing more.
async fn liveness() -> &'static str {
    "ThreadRelay running (ephemeral sessions, durable external history)"
}
