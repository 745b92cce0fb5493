//! Inbound events.
//!
//! Adapters turn platform payloads into a [`MessageReceive`] (or build an
//! [`Event`] directly) and hand the resulting [`Event`] to the router.
//!
//! ```rust,ignore
//! use xiuxian_core::{Content, Event, MessageReceive, SourceKind};
//!
//! let receive = MessageReceive {
//!     user_id: "10001".into(),
//!     user_type: SourceKind::Direct,
//!     content: vec![Content::text("/help")],
//!     ..Default::default()
//! };
//! let event = Event::from_receive(receive).to_me(true);
//! assert_eq!(event.raw_text, "/help");
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::content::{Content, MediaSource};

/// Where a message was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Group,
    Direct,
    Channel,
    SubChannel,
}

impl SourceKind {
    /// Returns true for sources that carry a group (or channel) id.
    pub fn is_shared(&self) -> bool {
        !matches!(self, Self::Direct)
    }
}

/// How an attached file payload is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileEncoding {
    Url,
    Base64,
}

/// The payload of a received file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    pub encoding: FileEncoding,
    pub data: String,
}

impl FilePayload {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            encoding: FileEncoding::Url,
            data: url.into(),
        }
    }

    pub fn base64(data: impl Into<String>) -> Self {
        Self {
            encoding: FileEncoding::Base64,
            data: data.into(),
        }
    }

    /// An empty payload counts as no file at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<MediaSource> for FilePayload {
    fn from(source: MediaSource) -> Self {
        match source {
            MediaSource::Url(url) => Self::url(url),
            MediaSource::Base64(data) => Self::base64(data),
        }
    }
}

// ============================================================================
// MessageReceive
// ============================================================================

/// The platform-agnostic shape of a received message, before text parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageReceive {
    pub bot_id: String,
    pub bot_self_id: String,
    pub msg_id: String,
    pub user_type: SourceKind,
    pub user_id: String,
    /// Permission level of the sender; lower is more privileged.
    pub user_pm: i32,
    pub group_id: Option<String>,
    pub content: Vec<Content>,
}

impl Default for MessageReceive {
    fn default() -> Self {
        Self {
            bot_id: default_bot_id(),
            bot_self_id: String::new(),
            msg_id: String::new(),
            user_type: SourceKind::default(),
            user_id: String::new(),
            user_pm: DEFAULT_USER_PM,
            group_id: None,
            content: Vec::new(),
        }
    }
}

const DEFAULT_USER_PM: i32 = 3;

pub(crate) fn default_bot_id() -> String {
    "Bot".to_string()
}

// ============================================================================
// Event
// ============================================================================

/// A normalized inbound message, ready for rule evaluation.
///
/// `command` and `text` stay empty until a rule matches; the router fills
/// them on its own copy of the event, never on the adapter's original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    pub bot_id: String,
    pub bot_self_id: String,
    pub msg_id: String,
    pub user_type: SourceKind,
    pub user_id: String,
    pub user_pm: i32,
    pub group_id: Option<String>,
    pub content: Vec<Content>,

    /// The message text as the platform delivered it.
    pub raw_text: String,
    /// The part of `raw_text` the matching rule consumed.
    pub command: String,
    /// What remains of `raw_text` after the command is removed.
    pub text: String,

    /// The first image in the message.
    pub image: Option<String>,
    /// The first mentioned user.
    pub at: Option<String>,
    pub image_list: Vec<String>,
    pub at_list: Vec<String>,

    /// Whether the message explicitly targets the bot (mention, reply, DM).
    pub is_tome: bool,
    /// Id of the quoted message, if any.
    pub reply: Option<String>,

    pub file_name: Option<String>,
    pub file: Option<FilePayload>,
}

impl Default for Event {
    fn default() -> Self {
        Self::from_receive(MessageReceive::default())
    }
}

impl Event {
    /// Builds an event from a received message.
    ///
    /// `raw_text` is the concatenation of every text content; images,
    /// mentions and the first file are lifted into their own fields.
    /// Addressing and reply information is not part of the content and must
    /// be set by the adapter.
    pub fn from_receive(receive: MessageReceive) -> Self {
        let mut raw_text = String::new();
        let mut image_list = Vec::new();
        let mut at_list = Vec::new();
        let mut file = None;

        for content in &receive.content {
            match content {
                Content::Text(text) => raw_text.push_str(text),
                Content::Image(source) => image_list.push(source.reference()),
                Content::At(id) => at_list.push(id.clone()),
                Content::File(data) if file.is_none() => {
                    file = Some((data.name.clone(), FilePayload::from(data.source.clone())));
                }
                _ => {}
            }
        }

        trace!(
            msg_id = %receive.msg_id,
            images = image_list.len(),
            mentions = at_list.len(),
            has_file = file.is_some(),
            "Normalized received message"
        );

        let (file_name, file) = file.unzip();

        Self {
            bot_id: receive.bot_id,
            bot_self_id: receive.bot_self_id,
            msg_id: receive.msg_id,
            user_type: receive.user_type,
            user_id: receive.user_id,
            user_pm: receive.user_pm,
            group_id: receive.group_id,
            content: receive.content,
            raw_text,
            command: String::new(),
            text: String::new(),
            image: image_list.first().cloned(),
            at: at_list.first().cloned(),
            image_list,
            at_list,
            is_tome: false,
            reply: None,
            file_name,
            file,
        }
    }

    /// Sets the raw text.
    pub fn with_raw_text(mut self, raw_text: impl Into<String>) -> Self {
        self.raw_text = raw_text.into();
        self
    }

    /// Marks whether the message is addressed to the bot.
    pub fn to_me(mut self, is_tome: bool) -> Self {
        self.is_tome = is_tome;
        self
    }

    /// Attaches a file.
    pub fn with_file(mut self, name: impl Into<String>, payload: FilePayload) -> Self {
        self.file_name = Some(name.into());
        self.file = Some(payload);
        self
    }

    /// Sets the quoted message id.
    pub fn with_reply(mut self, msg_id: impl Into<String>) -> Self {
        self.reply = Some(msg_id.into());
        self
    }

    /// Returns the attached file payload, treating an empty payload as absent.
    pub fn file_payload(&self) -> Option<&FilePayload> {
        self.file.as_ref().filter(|payload| !payload.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_receive_extracts_fields() {
        let receive = MessageReceive {
            msg_id: "m1".into(),
            user_id: "10001".into(),
            group_id: Some("20002".into()),
            content: vec![
                Content::at("bot"),
                Content::text("draw "),
                Content::image(MediaSource::url("http://img/1.png")),
                Content::text("please"),
                Content::image(MediaSource::base64("aGk=")),
                Content::at("30003"),
            ],
            ..Default::default()
        };

        let event = Event::from_receive(receive);

        assert_eq!(event.raw_text, "draw please");
        assert_eq!(event.image.as_deref(), Some("http://img/1.png"));
        assert_eq!(event.image_list, vec!["http://img/1.png", "base64://aGk="]);
        assert_eq!(event.at.as_deref(), Some("bot"));
        assert_eq!(event.at_list, vec!["bot", "30003"]);
        assert!(event.command.is_empty());
        assert!(event.text.is_empty());
        assert!(!event.is_tome);
    }

    #[test]
    fn test_from_receive_takes_first_file() {
        let receive = MessageReceive {
            content: vec![
                Content::file("a.zip", MediaSource::url("http://f/a.zip")),
                Content::file("b.txt", MediaSource::base64("Yg==")),
            ],
            ..Default::default()
        };

        let event = Event::from_receive(receive);

        assert_eq!(event.file_name.as_deref(), Some("a.zip"));
        assert_eq!(event.file, Some(FilePayload::url("http://f/a.zip")));
    }

    #[test]
    fn test_defaults() {
        let event = Event::default();
        assert_eq!(event.bot_id, "Bot");
        assert_eq!(event.user_pm, 3);
        assert_eq!(event.user_type, SourceKind::Group);
        assert!(event.file_name.is_none());
        assert!(event.file.is_none());
    }

    #[test]
    fn test_empty_file_payload_is_absent() {
        let event = Event::default().with_file("a.txt", FilePayload::base64(""));
        assert!(event.file_payload().is_none());

        let event = Event::default().with_file("a.txt", FilePayload::base64("YQ=="));
        assert!(event.file_payload().is_some());
    }

    #[test]
    fn test_deserialize_partial_event() {
        let event: Event = serde_json::from_value(json!({
            "user_id": "42",
            "user_type": "sub_channel",
            "raw_text": "hello",
            "is_tome": true,
            "file_name": "x.png",
            "file": {"encoding": "url", "data": "http://f/x.png"}
        }))
        .unwrap();

        assert_eq!(event.user_type, SourceKind::SubChannel);
        assert_eq!(event.raw_text, "hello");
        assert!(event.is_tome);
        assert_eq!(event.file, Some(FilePayload::url("http://f/x.png")));
        assert_eq!(event.bot_id, "Bot");
    }
}
