//! `tr-sessions` — the ephemeral session store.
//!
//! Every request owns exactly one [`SessionRecord`] for its lifetime.
//! The orchestrator deletes it on every exit path; the periodic TTL
//! [`SessionStore::sweep`] evicts anything a crashed or broken request
//! left behind. Nothing here ever touches disk: transience is the point.

pub mod store;

pub use store::{SessionPayload, SessionRecord, SessionStore};
