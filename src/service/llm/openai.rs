//! Integration with OpenAI-compatible chat-completion services.
//!
//! The request is assembled with the typed `async-openai` builders and sent with `reqwest`,
//! which keeps the raw response body in hand.  Providers such as OpenRouter do not always
//! answer in the canonical shape, so the answer is pulled out by an ordered list of
//! extractors rather than by strict deserialization.
//!
//! Each question results in exactly one request.  There are no retries.

use std::{sync::Arc, time::Duration};

use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::base::{
    config::Config,
    prompts,
    types::{PolicyText, Res},
};

use super::{GenericLlmClient, LlmClient};

/// Answer returned when the response carries none of the recognized shapes.
pub const NO_RESPONSE: &str = "No response from model";

/// Error message used when neither the remote API nor the transport says anything useful.
pub const UNKNOWN_ERROR: &str = "Unknown completion API error";

type AnswerExtractor = fn(&Value) -> Option<&str>;

/// Response shapes to try, in order.
const ANSWER_EXTRACTORS: [AnswerExtractor; 3] = [first_choice_message_content, first_choice_text, output_text];

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Res<Self> {
        let client = OpenAiLlmClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// OpenAI-compatible LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    http: reqwest::Client,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI-compatible LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(config.completion_timeout_secs)).build()?;

        Ok(Self { http, config: config.clone() })
    }

    /// Build the system/user message pair for a question.
    #[allow(deprecated)]
    fn build_request(&self, policy: &PolicyText, question: &str) -> Res<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default().content(self.config.system_directive.clone()).build()?.into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompts::build_user_message(policy, question))
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.completion_model)
            .messages(messages)
            .max_tokens(self.config.completion_max_tokens)
            .temperature(self.config.completion_temperature)
            .build()?;

        Ok(request)
    }

    /// Send one request to the completion endpoint and return the parsed payload.
    async fn call_completion_api(&self, request: &CreateChatCompletionRequest) -> Res<Value> {
        let response = self
            .http
            .post(&self.config.completion_endpoint)
            .bearer_auth(&self.config.openai_api_key)
            .header("HTTP-Referer", &self.config.completion_referer)
            .header("X-Title", &self.config.completion_title)
            .json(request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!(failure_message("", &e.without_url().to_string())))?;

        let status = response.status();
        let body = response.text().await;

        // The endpoint URL stays out of anything that ends up in chat.
        if !status.is_success() {
            let body = body.unwrap_or_default();
            error!("Completion API returned {status}: {body}");
            return Err(anyhow::anyhow!(failure_message(&body, &format!("Completion API returned {status}"))));
        }

        let body = body.map_err(|e| anyhow::anyhow!(failure_message("", &e.without_url().to_string())))?;

        // A success status with an unreadable body degrades to the sentinel answer.
        let payload = serde_json::from_str::<Value>(&body).unwrap_or_else(|e| {
            warn!("Completion API returned a non-JSON body: {e}");
            Value::Null
        });

        if let Some(message) = embedded_error_message(&payload) {
            warn!("Completion API reported an error with a success status: {message}");
        }

        Ok(payload)
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    #[instrument(name = "OpenAiLlmClient::answer", skip_all)]
    async fn answer(&self, policy: &PolicyText, question: &str) -> Res<String> {
        if policy.is_empty() {
            warn!("Answering without policy context.");
        }

        let request = self.build_request(policy, question)?;
        let payload = self.call_completion_api(&request).await?;

        info!("Completion API call succeeded.");

        Ok(extract_answer(&payload))
    }
}

// Helpers.

fn first_choice_message_content(payload: &Value) -> Option<&str> {
    payload.pointer("/choices/0/message/content")?.as_str()
}

fn first_choice_text(payload: &Value) -> Option<&str> {
    payload.pointer("/choices/0/text")?.as_str()
}

fn output_text(payload: &Value) -> Option<&str> {
    payload.get("output_text")?.as_str()
}

/// Pull the answer out of a success payload, falling back to [`NO_RESPONSE`].
///
/// Empty strings do not count as a match.
pub fn extract_answer(payload: &Value) -> String {
    ANSWER_EXTRACTORS
        .iter()
        .find_map(|extract| extract(payload).filter(|answer| !answer.is_empty()))
        .unwrap_or(NO_RESPONSE)
        .trim()
        .to_string()
}

fn embedded_error_message(payload: &Value) -> Option<&str> {
    payload.pointer("/error/message")?.as_str().filter(|message| !message.is_empty())
}

/// Choose the user-facing message for a failed call.
///
/// Prefers the remote API's `error.message`, then the transport error, then [`UNKNOWN_ERROR`].
pub fn failure_message(body: &str, transport: &str) -> String {
    let payload = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);

    if let Some(message) = embedded_error_message(&payload) {
        return message.to_string();
    }

    if !transport.is_empty() {
        return transport.to_string();
    }

    UNKNOWN_ERROR.to_string()
}

// Tests.
