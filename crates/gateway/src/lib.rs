//! `tr-gateway` — the ThreadRelay HTTP gateway.
//!
//! Ties the ephemeral session store, the completion client, and the
//! record store client together behind a single chat endpoint. The
//! request orchestrator in [`runtime`] owns the guarantee that every
//! created session is deleted on every exit path.

pub mod api;
pub mod bootstrap;
pub mod render;
pub mod runtime;
pub mod state;
