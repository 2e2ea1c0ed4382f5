//! Answering a question and relaying the result back into chat.

use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, instrument};

use crate::{
    base::{
        prompts,
        types::{PolicyText, Question, Void},
    },
    service::{chat::ChatClient, llm::LlmClient},
};

/// Answer a question on its own task.
///
/// Exactly one reply is posted: the answer, or a message describing the failure.
#[instrument(skip_all)]
pub fn handle_question(question: Question, policy: PolicyText, llm: LlmClient, chat: ChatClient) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the question.
            let result = handle_question_internal(question, &policy, &llm, &chat).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {err:#}");
            }
        }
        .in_current_span(),
    )
}

#[instrument(skip_all, fields(channel = %question.target.channel_id))]
async fn handle_question_internal(question: Question, policy: &PolicyText, llm: &LlmClient, chat: &ChatClient) -> Void {
    let reply = reply_for(&question, policy, llm).await;

    chat.send_message(&question.target, &reply).await
}

/// Produce the reply text for a question.
pub async fn reply_for(question: &Question, policy: &PolicyText, llm: &LlmClient) -> String {
    if question.text.is_empty() {
        return prompts::EMPTY_QUESTION_REPLY.to_string();
    }

    info!("Answering question ...");

    match llm.answer(policy, &question.text).await {
        Ok(answer) => answer,
        Err(err) => {
            error!("Error when querying AI: {err:#}");
            prompts::build_error_reply(&err.to_string())
        }
    }
}
