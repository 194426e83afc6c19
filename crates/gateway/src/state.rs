use std::sync::Arc;

use tr_completion::CompletionProvider;
use tr_domain::config::Config;
use tr_recordstore::RecordStore;
use tr_sessions::SessionStore;

/// Shared application state passed to all API handlers.
///
/// Collaborators are stored as trait objects so tests can inject stubs
/// for the completion service and the record store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// The only shared mutable resource in the core.
    pub sessions: Arc<SessionStore>,
    pub completion: Arc<dyn CompletionProvider>,
    pub records: Arc<dyn RecordStore>,
}
