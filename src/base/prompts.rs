//! Prompt templates for the completion API.

/// System directive sent with every question.
pub const SYSTEM_DIRECTIVE: &str = "You are a helpful HR assistant. Use ONLY the provided company policy. If the answer is not found, say you cannot find it.";

/// Label placed in front of the policy text in the user message.
pub const POLICY_LABEL: &str = "Company Policy:";

/// Label placed in front of the user's question in the user message.
pub const QUESTION_LABEL: &str = "User question:";

/// Reply sent when the bot is mentioned without a question.
pub const EMPTY_QUESTION_REPLY: &str = "Please ask me a question about the company holiday policy.";

/// Prefix for replies describing a failed completion call.
pub const ERROR_REPLY_PREFIX: &str = "Error when querying AI:";

/// Build the user message that carries the policy context and the question.
pub fn build_user_message(policy: &str, question: &str) -> String {
    format!("{POLICY_LABEL} {policy}\n\n{QUESTION_LABEL} {question}")
}

/// Build the reply posted when answering a question fails.
pub fn build_error_reply(message: &str) -> String {
    format!("{ERROR_REPLY_PREFIX} {message}")
}
