//! Library root for `holiday-policy-bot`.
//!
//! Holiday-policy-bot is an LLM-powered Slack assistant that answers employee questions
//! about the company holiday policy:
//! - Scrapes the policy webpage once at startup into plain text
//! - Answers mentions and channel messages using only that text as context
//! - Relays the model's answer (or a readable error) back into the channel
//!
//! The bot integrates with Slack for chat and an OpenAI-compatible completion API for
//! answers. Each service sits behind a trait so it can be swapped or mocked.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the bot runtime:
/// - Initializes the crypto provider
/// - Loads the policy and creates the LLM and chat clients
/// - Starts the main event loop for processing messages
pub async fn start(config: Config) -> Void {
    info!("Starting holiday-policy-bot ...");

    // Start the crypto provider.
    crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install the rustls crypto provider."))?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
