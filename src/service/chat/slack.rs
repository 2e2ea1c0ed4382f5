//! Slack integration for the holiday policy bot.
//!
//! This module connects to Slack over Socket Mode, translates `app_mention` and `message`
//! push events into [`InboundEvent`]s, and posts replies back into the originating
//! channel or thread.

use crate::{
    base::{
        config::Config,
        types::{InboundEvent, MentionEvent, MessageEvent, PolicyText, ReplyTarget, Res, Void},
    },
    interaction,
    service::llm::LlmClient,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, llm: LlmClient, policy: PolicyText) -> Res<Self> {
        let client = SlackChatClient::new(config, llm, policy).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    llm: LlmClient,
    chat: ChatClient,
    policy: PolicyText,
    bot_user_id: String,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    app_token: SlackApiToken,
    bot_token: SlackApiToken,
    bot_user_id: String,
    client: Arc<FullClient>,
    llm: LlmClient,
    policy: PolicyText,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    async fn new(config: &Config, llm: LlmClient, policy: PolicyText) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            client,
            llm,
            policy,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            llm: self.llm.clone(),
            chat: ChatClient::from(self.clone()),
            policy: self.policy.clone(),
            bot_user_id: self.bot_user_id.clone(),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events,
        socket_mode_listener.listen_for(&self.app_token).await?;

        info!("Slack HR assistant is up.");

        // Start WS connections calling Slack API to get WS url for the token,
        // and wait for Ctrl-C to shutdown.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_message(&self, target: &ReplyTarget, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());

        let mut request = SlackApiChatPostMessageRequest::new(SlackChannelId(target.channel_id.clone()), message);

        if let Some(thread_ts) = &target.thread_ts {
            request = request.with_thread_ts(SlackTs(thread_ts.clone()));
        }

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

// Event translation.

fn reply_target(channel: &SlackChannelId, origin: &SlackMessageOrigin) -> ReplyTarget {
    ReplyTarget {
        channel_id: channel.0.clone(),
        thread_ts: origin.thread_ts.as_ref().map(|ts| ts.0.clone()),
    }
}

fn mention_event(event: SlackAppMentionEvent) -> InboundEvent {
    InboundEvent::Mention(MentionEvent {
        target: reply_target(&event.channel, &event.origin),
        text: event.content.text.unwrap_or_default(),
        sender: event.user.0,
    })
}

fn message_event(event: SlackMessageEvent) -> Option<InboundEvent> {
    let channel = event.origin.channel.as_ref()?;
    let target = reply_target(channel, &event.origin);

    let bot_marker = matches!(event.subtype, Some(SlackMessageEventType::BotMessage)) || event.sender.bot_id.is_some();
    let subtype = event
        .subtype
        .as_ref()
        .filter(|subtype| !matches!(subtype, SlackMessageEventType::BotMessage))
        .map(|subtype| serde_json::to_value(subtype).ok().and_then(|v| v.as_str().map(str::to_string)).unwrap_or_else(|| format!("{subtype:?}")));

    Some(InboundEvent::Message(MessageEvent {
        text: event.content.and_then(|content| content.text),
        sender: event.sender.user.map(|user| user.0),
        bot_marker,
        subtype,
        target,
    }))
}

// Socket mode listener callbacks for Slack.

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let event = event_callback.event;
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    let inbound = match event {
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            info!("Received app mention event ...");
            mention_event(slack_app_mention_event)
        }
        SlackEventCallbackBody::Message(slack_message_event) => {
            debug!("Received message event ...");

            let Some(inbound) = message_event(slack_message_event) else {
                warn!("Skipping message event without a channel.");
                return Ok(());
            };

            inbound
        }
        _ => {
            debug!("Received unhandled push event.");
            return Ok(());
        }
    };

    // The answer is produced on its own task, so the event is acknowledged right away.
    let _ = interaction::dispatch(inbound, &user_state.bot_user_id, &user_state.policy, &user_state.llm, &user_state.chat);

    Ok(())
}
