//! Outbound messages.

use serde::{Deserialize, Serialize};

use crate::content::Content;
use crate::event::{Event, SourceKind, default_bot_id};

/// A message ready to be delivered by an adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSend {
    pub bot_id: String,
    pub bot_self_id: String,
    /// Id of the message being answered, if any.
    pub msg_id: String,
    pub target_type: Option<SourceKind>,
    pub target_id: Option<String>,
    pub content: Vec<Content>,
}

impl Default for MessageSend {
    fn default() -> Self {
        Self {
            bot_id: default_bot_id(),
            bot_self_id: String::new(),
            msg_id: String::new(),
            target_type: None,
            target_id: None,
            content: Vec::new(),
        }
    }
}

impl MessageSend {
    /// Builds a reply to `event`.
    ///
    /// Group and channel messages are answered in the group; direct
    /// messages (and shared sources lacking a group id) go to the sender.
    pub fn reply_to(event: &Event, content: Vec<Content>) -> Self {
        let target_id = match (&event.group_id, event.user_type.is_shared()) {
            (Some(group_id), true) => group_id.clone(),
            _ => event.user_id.clone(),
        };

        Self {
            bot_id: event.bot_id.clone(),
            bot_self_id: event.bot_self_id.clone(),
            msg_id: event.msg_id.clone(),
            target_type: Some(event.user_type),
            target_id: Some(target_id),
            content,
        }
    }

    /// Appends a content (builder pattern).
    pub fn with(mut self, content: Content) -> Self {
        self.content.push(content);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bot_id_matches_event() {
        assert_eq!(MessageSend::default().bot_id, Event::default().bot_id);
        assert_eq!(MessageSend::default().bot_id, "Bot");
    }

    #[test]
    fn test_reply_to_group() {
        let event = Event {
            msg_id: "7".into(),
            user_id: "10001".into(),
            group_id: Some("20002".into()),
            ..Default::default()
        };

        let reply = MessageSend::reply_to(&event, vec![Content::text("ok")]);

        assert_eq!(reply.target_type, Some(SourceKind::Group));
        assert_eq!(reply.target_id.as_deref(), Some("20002"));
        assert_eq!(reply.msg_id, "7");
    }

    #[test]
    fn test_reply_to_direct() {
        let event = Event {
            user_id: "10001".into(),
            user_type: SourceKind::Direct,
            group_id: Some("ignored".into()),
            ..Default::default()
        };

        let reply = MessageSend::reply_to(&event, Vec::new()).with(Content::text("hi"));

        assert_eq!(reply.target_id.as_deref(), Some("10001"));
        assert_eq!(reply.content, vec![Content::text("hi")]);
    }
}
