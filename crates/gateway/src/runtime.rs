//! The per-request orchestrator.
//!
//! Drives the whole pipeline for one chat request: validate → create
//! session → resolve context → obtain completion → render → persist
//! history → delete session. The session delete runs on every exit
//! path; the store's TTL sweep covers anything that still slips through
//! (e.g. a panic mid-request).
//!
//! Two input modes share this pipeline. ThreadReference mode treats the
//! referenced thread as required context and its history write as part
//! of the contract (fatal on failure). MessageList mode answers from the
//! caller-supplied turns and writes history to the most recent thread on
//! a best-effort basis only.

use serde::Deserialize;

use tr_completion::CompletionRequest;
use tr_domain::chat::{ChatExchange, ChatThread, ChatTurn};
use tr_domain::config::CompletionConfig;
use tr_domain::error::{Error, Result};
use tr_recordstore::ThreadQuery;
use tr_sessions::SessionPayload;

use crate::render::render_reply;
use crate::state::AppState;

/// System instruction used when the referenced thread has no assistant
/// configuration of its own.
pub const DEFAULT_ASSISTANT_INSTRUCTION: &str = "あなたは誠実で丁寧な日本語アシスタントです。";

/// Stand-in reply when the completion call succeeds but carries no
/// content. Never used on an outright upstream failure.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "（返答なし）";

const DEFAULT_TEMPERATURE: f32 = 0.7;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shape & validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Raw request body for `POST /assist/thread-chat`, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatRequest {
    /// ThreadReference mode: identifier of the target thread.
    pub chat_record_id: Option<String>,
    /// ThreadReference mode: the user's message.
    pub message: Option<String>,
    /// MessageList mode: a full conversation, passed through unchanged.
    pub messages: Option<Vec<ChatTurn>>,
    /// Optional model override for either mode.
    pub model: Option<String>,
}

/// Check the request against the two supported input modes and resolve
/// the model. Runs before any session exists, so a rejection here leaves
/// no trace in the store.
///
/// When `chatRecordId` is present the request is ThreadReference mode and
/// `message` must be non-empty; `messages` is only considered otherwise.
pub fn validate(req: ChatRequest, cfg: &CompletionConfig) -> Result<(SessionPayload, String)> {
    if let Some(thread_id) = req.chat_record_id {
        if thread_id.trim().is_empty() {
            return Err(Error::Validation("chatRecordId must not be empty".into()));
        }
        let message = match req.message {
            Some(m) if !m.trim().is_empty() => m,
            _ => {
                return Err(Error::Validation(
                    "chatRecordId requires a non-empty message".into(),
                ))
            }
        };
        let model = req
            .model
            .unwrap_or_else(|| cfg.thread_default_model.clone());
        return Ok((SessionPayload::ThreadReference { thread_id, message }, model));
    }

    if let Some(turns) = req.messages {
        if turns.is_empty() {
            return Err(Error::Validation("messages must not be empty".into()));
        }
        let model = req.model.unwrap_or_else(|| cfg.list_default_model.clone());
        return Ok((SessionPayload::MessageList { turns }, model));
    }

    Err(Error::Validation(
        "request must include chatRecordId and message, or a messages list".into(),
    ))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run one chat request end to end and return the rendered reply.
pub async fn handle_chat(state: &AppState, req: ChatRequest) -> Result<String> {
    let (payload, model) = validate(req, &state.config.completion)?;

    let session_id = state.sessions.create(payload.clone(), model.clone());
    let result = run(state, &payload, &model).await;

    // Unconditional cleanup: whichever branch `run` took, the session is
    // gone before the caller sees a response.
    state.sessions.delete(&session_id);
    result
}

async fn run(state: &AppState, payload: &SessionPayload, model: &str) -> Result<String> {
    match payload {
        SessionPayload::ThreadReference { thread_id, message } => {
            let thread = resolve_thread(state, thread_id).await?;

            let system = thread
                .assistant_config
                .clone()
                .unwrap_or_else(|| DEFAULT_ASSISTANT_INSTRUCTION.to_owned());
            let turns = vec![ChatTurn::system(system), ChatTurn::user(message.clone())];

            let reply = obtain_reply(state, model, turns).await?;
            let html = render_reply(&reply)?;

            // The thread was confirmed to exist, so the caller may rely
            // on durable history: a write failure is fatal here.
            persist_exchange(state, &thread, message, &html).await?;
            Ok(html)
        }
        SessionPayload::MessageList { turns } => {
            let reply = obtain_reply(state, model, turns.clone()).await?;
            let html = render_reply(&reply)?;

            // This mode's contract is "answer the question"; history is a
            // best-effort side effect.
            if let Err(e) = persist_to_latest(state, turns, &html).await {
                tracing::warn!(error = %e, "history write failed; returning reply anyway");
            }
            Ok(html)
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Steps
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn resolve_thread(state: &AppState, thread_id: &str) -> Result<ChatThread> {
    let threads = state
        .records
        .fetch_threads(ThreadQuery::ById(thread_id.to_owned()))
        .await?;

    threads
        .into_iter()
        .next()
        .ok_or_else(|| Error::ThreadNotFound(thread_id.to_owned()))
}

async fn obtain_reply(state: &AppState, model: &str, turns: Vec<ChatTurn>) -> Result<String> {
    let reply = state
        .completion
        .complete(CompletionRequest {
            model: model.to_owned(),
            turns,
            temperature: Some(DEFAULT_TEMPERATURE),
        })
        .await?;

    if reply.is_empty() {
        Ok(EMPTY_REPLY_PLACEHOLDER.to_owned())
    } else {
        Ok(reply)
    }
}

async fn persist_exchange(
    state: &AppState,
    thread: &ChatThread,
    user_message: &str,
    ai_reply: &str,
) -> Result<()> {
    let mut log = thread.log.clone();
    log.push(ChatExchange {
        user_message: user_message.to_owned(),
        ai_reply: ai_reply.to_owned(),
    });
    state.records.update_thread_log(&thread.id, &log).await
}

/// Append the exchange to the most recently created thread, if any.
/// A store with no threads at all is not an error for this mode.
async fn persist_to_latest(state: &AppState, turns: &[ChatTurn], ai_reply: &str) -> Result<()> {
    let threads = state.records.fetch_threads(ThreadQuery::MostRecent).await?;
    let Some(thread) = threads.into_iter().next() else {
        tracing::debug!("no thread to attach history to; skipping write");
        return Ok(());
    };

    // Only the last turn is worth persisting: earlier turns are context
    // the caller already holds.
    let user_message = turns.last().map(|t| t.content.as_str()).unwrap_or_default();
    persist_exchange(state, &thread, user_message, ai_reply).await
}
