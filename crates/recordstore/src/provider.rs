use tr_domain::chat::{ChatExchange, ChatThread};
use tr_domain::error::Result;

/// The two query forms the relay uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadQuery {
    /// Exact-identifier lookup.
    ById(String),
    /// Most recently created thread, limit one.
    MostRecent,
}

/// Trait the record-store adapter must implement.
///
/// App scope and credentials are process-wide and baked into the client
/// at construction, so callers only deal in queries and thread data.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the threads matching `query`. An empty result is not an
    /// error; absence policy belongs to the caller.
    async fn fetch_threads(&self, query: ThreadQuery) -> Result<Vec<ChatThread>>;

    /// Replace the exchange log of thread `id` with `log`.
    ///
    /// The caller appends to a log it just fetched and writes the whole
    /// sequence back; the store's own semantics decide concurrent-write
    /// ordering.
    async fn update_thread_log(&self, id: &str, log: &[ChatExchange]) -> Result<()>;
}
