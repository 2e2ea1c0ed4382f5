//! Question extraction and filtering for plain `message` events.

use tracing::debug;

use crate::base::types::{MessageEvent, Question};

/// Subtypes that still carry a fresh message written by a person.
const HUMAN_SUBTYPES: [&str; 2] = ["file_share", "thread_broadcast"];

/// Why a plain message is not treated as a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Flagged by the platform as bot-authored.
    BotMessage,
    /// Sent by this bot.
    OwnMessage,
    /// No human sender on the event.
    NoSender,
    /// Edits, deletions, joins and the like.
    Subtype(String),
    /// Addresses the bot, so the mention handler answers it.
    MentionsBot,
    /// Nothing to ask.
    Empty,
}

/// Decide whether a plain message should be answered.
pub fn skip_reason(event: &MessageEvent, bot_user_id: &str) -> Option<SkipReason> {
    if event.bot_marker {
        return Some(SkipReason::BotMessage);
    }

    let Some(sender) = event.sender.as_deref() else {
        return Some(SkipReason::NoSender);
    };

    if sender == bot_user_id {
        return Some(SkipReason::OwnMessage);
    }

    if let Some(subtype) = event.subtype.as_deref()
        && !HUMAN_SUBTYPES.contains(&subtype)
    {
        return Some(SkipReason::Subtype(subtype.to_string()));
    }

    let text = event.text.as_deref().unwrap_or_default();

    // Slack sends no `app_mention` for direct messages, so those stay on this path.
    if !is_direct_message(&event.target.channel_id) && mentions_user(text, bot_user_id) {
        return Some(SkipReason::MentionsBot);
    }

    if text.trim().is_empty() {
        return Some(SkipReason::Empty);
    }

    None
}

/// Whether `text` contains a full mention token (`<@ID>` or `<@ID|label>`) for `user_id`.
pub fn mentions_user(text: &str, user_id: &str) -> bool {
    text.contains(&format!("<@{user_id}>")) || text.contains(&format!("<@{user_id}|"))
}

/// Direct-message channel ids start with `D`.
fn is_direct_message(channel_id: &str) -> bool {
    channel_id.starts_with('D')
}

/// Turn a plain message into a question, unless it must be ignored.
pub fn question_from_message(event: MessageEvent, bot_user_id: &str) -> Option<Question> {
    if let Some(reason) = skip_reason(&event, bot_user_id) {
        debug!("Skipping message event: {reason:?}");
        return None;
    }

    Some(Question {
        text: event.text.unwrap_or_default().trim().to_string(),
        target: event.target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::base::types::ReplyTarget;

    const BOT: &str = "UBOT";

    fn message(text: &str) -> MessageEvent {
        MessageEvent {
            text: Some(text.to_string()),
            sender: Some("U42".to_string()),
            bot_marker: false,
            subtype: None,
            target: ReplyTarget {
                channel_id: "C1".to_string(),
                thread_ts: None,
            },
        }
    }

    #[test]
    fn human_message_becomes_trimmed_question() {
        let question = question_from_message(message("  How many sick days?\n"), BOT).unwrap();

        assert_eq!(question.text, "How many sick days?");
        assert_eq!(question.target.channel_id, "C1");
    }

    #[test]
    fn bot_marker_is_skipped() {
        let mut event = message("I am a bot");
        event.bot_marker = true;

        assert_eq!(skip_reason(&event, BOT), Some(SkipReason::BotMessage));
        assert!(question_from_message(event, BOT).is_none());
    }

    #[test]
    fn own_message_is_skipped() {
        let mut event = message("Here is your answer");
        event.sender = Some(BOT.to_string());

        assert_eq!(skip_reason(&event, BOT), Some(SkipReason::OwnMessage));
    }

    #[test]
    fn missing_sender_is_skipped() {
        let mut event = message("orphan");
        event.sender = None;

        assert_eq!(skip_reason(&event, BOT), Some(SkipReason::NoSender));
    }

    #[test]
    fn edits_are_skipped_but_file_shares_are_not() {
        let mut edited = message("changed");
        edited.subtype = Some("message_changed".to_string());

        let mut shared = message("Is this form right?");
        shared.subtype = Some("file_share".to_string());

        assert_eq!(skip_reason(&edited, BOT), Some(SkipReason::Subtype("message_changed".to_string())));
        assert_eq!(skip_reason(&shared, BOT), None);
    }

    #[test]
    fn messages_mentioning_the_bot_are_left_to_the_mention_handler() {
        assert_eq!(skip_reason(&message("<@UBOT> when is the office closed?"), BOT), Some(SkipReason::MentionsBot));
        assert_eq!(skip_reason(&message("ask <@UOTHER> instead"), BOT), None);
    }

    #[test]
    fn labelled_mention_of_the_bot_is_left_to_the_mention_handler() {
        assert_eq!(skip_reason(&message("<@UBOT|hr-bot> is Easter Monday off?"), BOT), Some(SkipReason::MentionsBot));
    }

    #[test]
    fn other_user_whose_id_extends_the_bot_id_is_not_a_mention() {
        let event = message("should I ask <@UBOTANY> about holidays?");

        assert_eq!(skip_reason(&event, BOT), None);
        assert_eq!(question_from_message(event, BOT).unwrap().text, "should I ask <@UBOTANY> about holidays?");
    }

    #[test]
    fn direct_message_mentioning_the_bot_is_answered_here() {
        let mut event = message("<@UBOT> how many personal days do I have?");
        event.target.channel_id = "D024BE91L".to_string();

        assert_eq!(skip_reason(&event, BOT), None);
        assert_eq!(question_from_message(event, BOT).unwrap().text, "<@UBOT> how many personal days do I have?");
    }

    #[test]
    fn blank_messages_are_skipped() {
        assert_eq!(skip_reason(&message(" \n "), BOT), Some(SkipReason::Empty));

        let mut no_text = message("");
        no_text.text = None;
        assert_eq!(skip_reason(&no_text, BOT), Some(SkipReason::Empty));
    }
}
