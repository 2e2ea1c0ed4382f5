//! Event handling and user interactions for the holiday policy bot.
//!
//! This module routes chat events to the question-answering pipeline:
//! - `app_mention` events are always answered, with the mention token stripped.
//! - Plain `message` events are answered unless they come from a bot (this one included),
//!   or address the bot directly, in which case the mention handler already owns them.
//! - Every accepted question gets exactly one reply.

pub mod app_mention;
pub mod message;
pub mod question;

use tokio::task::JoinHandle;

use crate::{
    base::types::{InboundEvent, PolicyText},
    service::{chat::ChatClient, llm::LlmClient},
};

/// Route an inbound event and, if it carries a question, answer it on a new task.
///
/// Returns `None` when the event was filtered out; no reply is sent in that case.
pub fn dispatch(event: InboundEvent, bot_user_id: &str, policy: &PolicyText, llm: &LlmClient, chat: &ChatClient) -> Option<JoinHandle<()>> {
    let question = match event {
        InboundEvent::Mention(mention) => app_mention::question_from_mention(mention),
        InboundEvent::Message(message) => message::question_from_message(message, bot_user_id)?,
    };

    Some(question::handle_question(question, policy.clone(), llm.clone(), chat.clone()))
}
