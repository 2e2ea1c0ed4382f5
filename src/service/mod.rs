//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the bot:
//! - Chat services (e.g., Slack)
//! - LLM services (OpenAI-compatible completion endpoints)
//! - The policy page loader
//!
//! Chat and LLM modules define both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod llm;
pub mod policy;
