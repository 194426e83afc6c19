//! REST implementation of [`RecordStore`] for the Kintone records API.
//!
//! Wire format:
//! - `GET https://{domain}/k/v1/records.json?app={app}&query={query}` for
//!   reads, with the token in the `X-Cybozu-API-Token` header;
//! - `PUT https://{domain}/k/v1/record.json` with
//!   `{app, id, record: {chat_log: {value: [...]}}}` for writes.
//!
//! Every field in a record is wrapped in a `{value}` envelope; the DTOs
//! below mirror that nesting and convert to the flat domain types.

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

use tr_domain::chat::{ChatExchange, ChatThread};
use tr_domain::config::RecordStoreConfig;
use tr_domain::error::{Error, Result};

use crate::provider::{RecordStore, ThreadQuery};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// REST client for the record store. Created once and reused; the
/// underlying `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct RestRecordStoreClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    api_token: String,
}

impl RestRecordStoreClient {
    pub fn new(cfg: &RecordStoreConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| Error::RecordStore(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("https://{}", cfg.domain.trim_end_matches('/')),
            app_id: cfg.app_id.clone(),
            api_token: cfg.api_token.clone(),
        })
    }

    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("X-Cybozu-API-Token", &self.api_token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute(&self, endpoint: &str, rb: RequestBuilder) -> Result<String> {
        let resp = self
            .decorate(rb)
            .send()
            .await
            .map_err(|e| Error::RecordStore(format!("{endpoint}: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::RecordStore(format!("{endpoint}: reading response: {e}")))?;

        if !status.is_success() {
            return Err(Error::RecordStore(format!(
                "{endpoint} returned {status}: {body}"
            )));
        }
        Ok(body)
    }
}

fn query_string(query: &ThreadQuery) -> String {
    match query {
        ThreadQuery::ById(id) => format!("$id = {id}"),
        ThreadQuery::MostRecent => "order by $id desc limit 1".into(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Wire DTOs
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Serialize, Deserialize)]
struct FieldValue<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<RecordDto>,
}

#[derive(Debug, Deserialize)]
struct RecordDto {
    #[serde(rename = "$id")]
    id: FieldValue<String>,
    #[serde(default)]
    assistant_config: Option<FieldValue<String>>,
    #[serde(default)]
    chat_log: Option<FieldValue<Vec<LogRowDto>>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LogRowDto {
    value: LogRowValue,
}

#[derive(Debug, Serialize, Deserialize)]
struct LogRowValue {
    user_message: FieldValue<String>,
    ai_reply: FieldValue<String>,
}

impl From<RecordDto> for ChatThread {
    fn from(dto: RecordDto) -> Self {
        let assistant_config = dto
            .assistant_config
            .map(|f| f.value)
            .filter(|v| !v.is_empty());
        let log = dto
            .chat_log
            .map(|f| f.value)
            .unwrap_or_default()
            .into_iter()
            .map(|row| ChatExchange {
                user_message: row.value.user_message.value,
                ai_reply: row.value.ai_reply.value,
            })
            .collect();

        ChatThread {
            id: dto.id.value,
            assistant_config,
            log,
        }
    }
}

fn exchange_to_row(exchange: &ChatExchange) -> LogRowDto {
    LogRowDto {
        value: LogRowValue {
            user_message: FieldValue {
                value: exchange.user_message.clone(),
            },
            ai_reply: FieldValue {
                value: exchange.ai_reply.clone(),
            },
        },
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl RecordStore for RestRecordStoreClient {
    async fn fetch_threads(&self, query: ThreadQuery) -> Result<Vec<ChatThread>> {
        let url = self.url("/k/v1/records.json");
        let query = query_string(&query);
        tracing::debug!(query = %query, "fetching chat records");

        let body = self
            .execute(
                "GET /k/v1/records.json",
                self.http
                    .get(&url)
                    .query(&[("app", self.app_id.as_str()), ("query", query.as_str())]),
            )
            .await?;

        let parsed: RecordsResponse = serde_json::from_str(&body).map_err(|e| {
            Error::RecordStore(format!("failed to parse records response: {e}: {body}"))
        })?;

        Ok(parsed.records.into_iter().map(ChatThread::from).collect())
    }

    async fn update_thread_log(&self, id: &str, log: &[ChatExchange]) -> Result<()> {
        let url = self.url("/k/v1/record.json");
        let rows: Vec<LogRowDto> = log.iter().map(exchange_to_row).collect();
        let body = serde_json::json!({
            "app": self.app_id,
            "id": id,
            "record": {
                "chat_log": { "value": rows },
            },
        });

        tracing::debug!(thread_id = %id, rows = log.len(), "writing chat log");

        self.execute("PUT /k/v1/record.json", self.http.put(&url).json(&body))
            .await?;
        Ok(())
    }
}
