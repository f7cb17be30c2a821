//! Read-only dashboard over agent run logs
//!
//! Runs are persisted by the agent framework as one JSON file per run under a
//! storage root. [`store::RunStore`] lists and resolves them; the remaining
//! modules project that data for the CLI and the HTTP API.

pub mod cli;
pub mod config;
pub mod export;
pub mod handlers;
pub mod stats;
pub mod store;
pub mod timeline;

#[cfg(feature = "web")]
pub mod web;
