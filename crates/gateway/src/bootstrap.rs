//! Startup wiring: build the shared [`AppState`] and spawn the
//! background loops that outlive any single request.

use std::sync::Arc;

use tr_completion::OpenAiCompatClient;
use tr_domain::config::Config;
use tr_recordstore::RestRecordStoreClient;
use tr_sessions::SessionStore;

use crate::state::AppState;

/// Construct the production collaborators from config.
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    let completion = OpenAiCompatClient::new(&config.completion)?;
    let records = RestRecordStoreClient::new(&config.record_store)?;

    tracing::info!(
        completion_base_url = %config.completion.base_url,
        record_store_domain = %config.record_store.domain,
        "clients ready"
    );

    Ok(AppState {
        config,
        sessions: Arc::new(SessionStore::new()),
        completion: Arc::new(completion),
        records: Arc::new(records),
    })
}

/// Spawn the periodic session sweep.
///
/// The sweep is the safety net for sessions whose owning request never
/// reached its cleanup step; it runs on a fixed interval regardless of
/// traffic and does bounded, synchronous work per tick.
pub fn spawn_background_tasks(state: &AppState) {
    let sessions = state.sessions.clone();
    let ttl = state.config.sessions.ttl;
    let period = state.config.sessions.sweep_interval;

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            sessions.sweep(chrono::Utc::now(), ttl);
        }
    });
}
