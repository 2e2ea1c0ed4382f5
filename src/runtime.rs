//! Runtime services and shared state for the holiday policy bot.

use tokio::task::JoinHandle;
use tracing::instrument;

use crate::{
    base::{
        config::Config,
        types::{InboundEvent, PolicyText, Res, Void},
    },
    interaction,
    service::{chat::ChatClient, llm::LlmClient, policy},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the policy snapshot, the LLM client, the chat client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The policy text, loaded once before any event is handled.
    pub policy: PolicyText,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The chat client instance.
    pub chat: ChatClient,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// The policy is loaded first; a failed load leaves it empty rather than failing startup.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Load the policy snapshot.
        let policy = policy::load_policy(&config).await;

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config)?;

        // Initialize the slack client.
        let chat = ChatClient::slack(&config, llm.clone(), policy.clone()).await?;

        Ok(Self { config, policy, llm, chat })
    }

    /// Start listening for chat events.
    pub async fn start(&self) -> Void {
        self.chat.start().await
    }

    /// Route one inbound event with this runtime's services.
    pub fn dispatch(&self, event: InboundEvent) -> Option<JoinHandle<()>> {
        interaction::dispatch(event, self.chat.bot_user_id(), &self.policy, &self.llm, &self.chat)
    }
}
