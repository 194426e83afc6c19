use tr_domain::chat::ChatTurn;
use tr_domain::error::Result;

/// A provider-agnostic chat completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier, already resolved by the orchestrator.
    pub model: String,
    /// The ordered conversation to send.
    pub turns: Vec<ChatTurn>,
    /// Sampling temperature. `None` lets the provider choose.
    pub temperature: Option<f32>,
}

/// Trait the completion-service adapter must implement.
///
/// Returns the first choice's text content. An upstream call that
/// succeeds but carries no content yields `Ok` with an empty string —
/// the caller decides what stands in for an empty reply. Transport
/// failures, non-success statuses, and malformed response shapes all
/// surface as [`tr_domain::error::Error::Completion`].
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, req: CompletionRequest) -> Result<String>;
}
