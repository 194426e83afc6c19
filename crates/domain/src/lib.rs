//! `tr-domain` — shared types for ThreadRelay.
//!
//! Holds the workspace-wide [`error::Error`] type, the chat data model
//! ([`chat::ChatTurn`], [`chat::ChatThread`], [`chat::ChatExchange`]),
//! and the environment-derived process [`config::Config`].

pub mod chat;
pub mod config;
pub mod error;
