//! Question extraction for `app_mention` events.

use std::sync::LazyLock;

use regex::Regex;

use crate::base::types::{MentionEvent, Question};

static MENTION_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<@[^>]+>").expect("mention pattern is valid"));

/// Remove the first mention token and surrounding whitespace.
///
/// Later mentions (e.g. of a colleague) are part of the question and stay.
pub fn strip_mention(text: &str) -> String {
    MENTION_TOKEN_RE.replace(text, "").trim().to_string()
}

/// Mentions are always answered; an empty question is handled downstream.
pub fn question_from_mention(event: MentionEvent) -> Question {
    Question {
        text: strip_mention(&event.text),
        target: event.target,
    }
}
