//! `tr-recordstore` — chat-thread record store client for ThreadRelay.
//!
//! Provides the [`RecordStore`] trait that abstracts over the external
//! structured record store holding durable chat history, and a REST
//! implementation ([`RestRecordStoreClient`]) speaking the Kintone-style
//! records API.
//!
//! The client is policy-free: it reports every transport or status
//! failure as [`tr_domain::error::Error::RecordStore`] and leaves the
//! fatal-vs-best-effort decision to the orchestrator. It performs no
//! retries; a single upstream failure is a single reported failure.

pub mod provider;
pub mod rest;

pub use provider::{RecordStore, ThreadQuery};
pub use rest::RestRecordStoreClient;
