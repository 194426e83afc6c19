#![allow(dead_code)]

//! Shared test doubles: a scriptable completion provider and record
//! store, plus `AppState` assembly around them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tr_completion::{CompletionProvider, CompletionRequest};
use tr_domain::chat::{ChatExchange, ChatThread};
use tr_domain::config::Config;
use tr_domain::error::{Error, Result};
use tr_gateway::state::AppState;
use tr_recordstore::{RecordStore, ThreadQuery};
use tr_sessions::SessionStore;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Completion stub
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct StubCompletion {
    /// `None` simulates an upstream failure.
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub last_request: Mutex<Option<CompletionRequest>>,
    /// When set, records how many sessions were live at call time.
    pub watch_sessions: Mutex<Option<Arc<SessionStore>>>,
    pub sessions_seen_in_flight: AtomicUsize,
}

impl StubCompletion {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_owned()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            watch_sessions: Mutex::new(None),
            sessions_seen_in_flight: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            watch_sessions: Mutex::new(None),
            sessions_seen_in_flight: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl CompletionProvider for StubCompletion {
    async fn complete(&self, req: CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(store) = self.watch_sessions.lock().unwrap().as_ref() {
            self.sessions_seen_in_flight
                .store(store.len(), Ordering::SeqCst);
        }
        *self.last_request.lock().unwrap() = Some(req);

        match &self.reply {
            Some(r) => Ok(r.clone()),
            None => Err(Error::Completion("stub upstream failure".into())),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Record store stub
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Default)]
pub struct StubRecords {
    threads: Vec<ChatThread>,
    fail_fetch: bool,
    fail_update: bool,
    pub fetches: AtomicUsize,
    pub updates: Mutex<Vec<(String, Vec<ChatExchange>)>>,
}

impl StubRecords {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_threads(threads: Vec<ChatThread>) -> Arc<Self> {
        Arc::new(Self {
            threads,
            ..Default::default()
        })
    }

    pub fn failing_fetch() -> Arc<Self> {
        Arc::new(Self {
            fail_fetch: true,
            ..Default::default()
        })
    }

    pub fn failing_update(threads: Vec<ChatThread>) -> Arc<Self> {
        Arc::new(Self {
            threads,
            fail_update: true,
            ..Default::default()
        })
    }
}

#[async_trait]
impl RecordStore for StubRecords {
    async fn fetch_threads(&self, query: ThreadQuery) -> Result<Vec<ChatThread>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(Error::RecordStore("stub fetch failure".into()));
        }
        Ok(match query {
            ThreadQuery::ById(id) => self
                .threads
                .iter()
                .filter(|t| t.id == id)
                .cloned()
                .collect(),
            // Newest last in the fixture list.
            ThreadQuery::MostRecent => self.threads.last().cloned().into_iter().collect(),
        })
    }

    async fn update_thread_log(&self, id: &str, log: &[ChatExchange]) -> Result<()> {
        if self.fail_update {
            return Err(Error::RecordStore("stub update failure".into()));
        }
        self.updates
            .lock()
            .unwrap()
            .push((id.to_owned(), log.to_vec()));
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Fixtures
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn test_config() -> Config {
    let env = HashMap::from([
        ("OPENAI_API_KEY", "sk-test"),
        ("KINTONE_DOMAIN", "example.cybozu.com"),
        ("KINTONE_CHAT_APP_ID", "7"),
        ("KINTONE_CHAT_TOKEN", "tok"),
    ]);
    Config::from_lookup(|key| env.get(key).map(|v| v.to_string())).unwrap()
}

pub fn make_state(completion: Arc<StubCompletion>, records: Arc<StubRecords>) -> AppState {
    let sessions = Arc::new(SessionStore::new());
    *completion.watch_sessions.lock().unwrap() = Some(sessions.clone());

    AppState {
        config: Arc::new(test_config()),
        sessions,
        completion,
        records,
    }
}

pub fn thread(id: &str, assistant_config: Option<&str>, log: Vec<ChatExchange>) -> ChatThread {
    ChatThread {
        id: id.to_owned(),
        assistant_config: assistant_config.map(str::to_owned),
        log,
    }
}
