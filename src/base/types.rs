//! Shared result aliases and the domain values that flow between services.

use std::{fmt, ops::Deref, sync::Arc};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// The cleaned plain-text rendering of the policy page.
///
/// Built once at startup and never mutated afterwards.  Cloning is cheap, so every
/// handler gets its own handle to the same snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyText {
    inner: Arc<str>,
}

impl PolicyText {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self { inner: text.into() }
    }

    /// The degraded snapshot used when the policy page could not be loaded.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Deref for PolicyText {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl fmt::Display for PolicyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner)
    }
}

/// Where a reply to an inbound event should be posted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyTarget {
    pub channel_id: String,
    /// Set when the originating message lives in a thread.
    pub thread_ts: Option<String>,
}

/// A chat event that may carry a question for the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// The bot was explicitly addressed.
    Mention(MentionEvent),
    /// Any message observed in a channel the bot is a member of.
    Message(MessageEvent),
}

/// An `app_mention` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MentionEvent {
    /// Raw text, including the mention token.
    pub text: String,
    pub sender: String,
    pub target: ReplyTarget,
}

/// A plain `message` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageEvent {
    pub text: Option<String>,
    pub sender: Option<String>,
    /// Set when the platform flags the message as bot-authored.
    pub bot_marker: bool,
    /// Platform subtype (`message_changed`, `channel_join`, ...), other than the bot marker.
    pub subtype: Option<String>,
    pub target: ReplyTarget,
}

/// A question extracted from an inbound event, ready to be answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    pub target: ReplyTarget,
}
