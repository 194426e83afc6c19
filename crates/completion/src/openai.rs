//! OpenAI-compatible completion adapter.
//!
//! Speaks `POST {base_url}/chat/completions` with bearer auth. The relay
//! only needs the non-streaming happy path: send the resolved model and
//! turn list, take the first choice's text content.

use serde::Deserialize;

use tr_domain::chat::ChatTurn;
use tr_domain::config::CompletionConfig;
use tr_domain::error::{Error, Result};

use crate::traits::{CompletionProvider, CompletionRequest};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// REST client for any OpenAI-compatible chat completions endpoint.
///
/// Created once at startup and reused; the underlying `reqwest::Client`
/// maintains a connection pool.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompatClient {
    pub fn new(cfg: &CompletionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| Error::Completion(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key: cfg.api_key.clone(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_body(req: &CompletionRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = req.turns.iter().map(turn_to_wire).collect();
        let mut body = serde_json::json!({
            "model": req.model,
            "messages": messages,
        });
        if let Some(temp) = req.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        body
    }
}

fn turn_to_wire(turn: &ChatTurn) -> serde_json::Value {
    serde_json::json!({
        "role": turn.role,
        "content": turn.content,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response shape
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the first choice's content from a raw response body.
///
/// No choices at all is a malformed response; a choice whose content is
/// null or empty is a *successful* empty reply and returns `Ok("")`.
fn parse_reply(body: &str) -> Result<String> {
    let resp: WireResponse = serde_json::from_str(body)
        .map_err(|e| Error::Completion(format!("malformed completion response: {e}")))?;

    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::Completion("completion response has no choices".into()))?;

    Ok(choice.message.content.unwrap_or_default())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl CompletionProvider for OpenAiCompatClient {
    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        let url = self.chat_url();
        let body = Self::build_body(&req);

        tracing::debug!(model = %req.model, turns = req.turns.len(), "requesting completion");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Completion(format!("completion request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Completion(format!("reading completion response: {e}")))?;

        if !status.is_success() {
            return Err(Error::Completion(format!(
                "completion service returned {status}: {text}"
            )));
        }

        parse_reply(&text)
    }
}
