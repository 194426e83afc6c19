//! Process-wide configuration, read once from the environment at startup.
//!
//! There is no on-disk config: every knob comes from an environment
//! variable. [`Config::from_env`] reads the real process environment;
//! [`Config::from_lookup`] takes an arbitrary lookup function so tests
//! can build configs without mutating global state.

use std::time::Duration;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    pub record_store: RecordStoreConfig,
    pub sessions: SessionsConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP server
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (`HOST`).
    pub host: String,
    /// Listen port (`PORT`).
    pub port: u16,
    /// Maximum accepted JSON body size in bytes.
    pub max_body_bytes: usize,
    /// Maximum concurrently processed requests.
    pub max_concurrent: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            max_body_bytes: 20 * 1024 * 1024,
            max_concurrent: 256,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion service
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Bearer credential (`OPENAI_API_KEY`).
    pub api_key: String,
    /// API root (`OPENAI_BASE_URL`).
    pub base_url: String,
    /// Default model for ThreadReference-mode requests.
    pub thread_default_model: String,
    /// Default model for MessageList-mode requests.
    pub list_default_model: String,
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".into(),
            thread_default_model: "gpt-5".into(),
            list_default_model: "gpt-4o".into(),
            timeout: Duration::from_secs(120),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Record store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct RecordStoreConfig {
    /// Store hostname (`KINTONE_DOMAIN`), e.g. `example.cybozu.com`.
    pub domain: String,
    /// Application scope (`KINTONE_CHAT_APP_ID`).
    pub app_id: String,
    /// API token (`KINTONE_CHAT_TOKEN`).
    pub api_token: String,
    pub timeout: Duration,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            app_id: String::new(),
            api_token: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Ephemeral sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct SessionsConfig {
    /// Maximum age a session may reach before the sweep evicts it
    /// (`SESSION_TTL_SECS`).
    pub ttl: Duration,
    /// Interval between sweep passes (`SESSION_SWEEP_INTERVAL_SECS`).
    pub sweep_interval: Duration,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Loading
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut server = ServerConfig::default();
        if let Some(host) = lookup("HOST") {
            server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a valid port: {port}")))?;
        }

        let mut completion = CompletionConfig::default();
        completion.api_key = require(&lookup, "OPENAI_API_KEY")?;
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            completion.base_url = url.trim_end_matches('/').to_owned();
        }

        let mut record_store = RecordStoreConfig::default();
        record_store.domain = require(&lookup, "KINTONE_DOMAIN")?;
        record_store.app_id = require(&lookup, "KINTONE_CHAT_APP_ID")?;
        record_store.api_token = require(&lookup, "KINTONE_CHAT_TOKEN")?;

        let mut sessions = SessionsConfig::default();
        if let Some(ttl) = lookup("SESSION_TTL_SECS") {
            sessions.ttl = Duration::from_secs(parse_secs("SESSION_TTL_SECS", &ttl)?);
        }
        if let Some(interval) = lookup("SESSION_SWEEP_INTERVAL_SECS") {
            sessions.sweep_interval =
                Duration::from_secs(parse_secs("SESSION_SWEEP_INTERVAL_SECS", &interval)?);
        }

        Ok(Self {
            server,
            completion,
            record_store,
            sessions,
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::Config(format!("missing required env var {key}"))),
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| Error::Config(format!("{key} is not a valid number of seconds: {raw}")))
}
