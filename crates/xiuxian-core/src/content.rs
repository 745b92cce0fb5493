//! Message payload units.
//!
//! A [`Content`] is the smallest unit of a message, either received from a
//! platform or built for sending. Values are normalized on construction:
//! media is always a remote URL or an inline base64 blob, never a local path.
//!
//! # Wire shape
//!
//! Every content serializes as `{"type": ..., "data": ...}`:
//!
//! ```text
//! {"type": "text",  "data": "hello"}
//! {"type": "image", "data": "link://https://example.com/a.png"}
//! {"type": "file",  "data": {"name": "a.txt", "source": "base64://aGk="}}
//! {"type": "log",   "data": {"level": "WARNING", "text": "low disk"}}
//! ```

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};

const LINK_SCHEME: &str = "link://";
const BASE64_SCHEME: &str = "base64://";

// ============================================================================
// Media Source
// ============================================================================

/// Where the bytes of an image, voice record or file live.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MediaSource {
    /// A remote URL.
    Url(String),
    /// Inline base64 data, without the `base64://` scheme.
    Base64(String),
}

impl MediaSource {
    /// Normalizes a string reference into a media source.
    ///
    /// Accepts `base64://<blob>`, `link://<url>` and bare `http(s)` URLs.
    pub fn parse(reference: &str) -> ContentResult<Self> {
        if let Some(blob) = reference.strip_prefix(BASE64_SCHEME) {
            Ok(Self::Base64(blob.to_string()))
        } else if let Some(url) = reference.strip_prefix(LINK_SCHEME) {
            Ok(Self::Url(url.to_string()))
        } else if reference.starts_with("http") {
            Ok(Self::Url(reference.to_string()))
        } else {
            Err(ContentError::UnsupportedSource(reference.to_string()))
        }
    }

    /// Creates a URL source.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    /// Creates an inline base64 source from already-encoded data.
    pub fn base64(data: impl Into<String>) -> Self {
        Self::Base64(data.into())
    }

    /// Returns the reference handlers usually want: the bare URL, or the
    /// `base64://` form for inline data.
    pub fn reference(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Base64(data) => format!("{BASE64_SCHEME}{data}"),
        }
    }

    /// Returns the payload without any scheme.
    pub fn data(&self) -> &str {
        match self {
            Self::Url(s) | Self::Base64(s) => s,
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, Self::Url(_))
    }
}

impl Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{LINK_SCHEME}{url}"),
            Self::Base64(data) => write!(f, "{BASE64_SCHEME}{data}"),
        }
    }
}

impl TryFrom<String> for MediaSource {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MediaSource> for String {
    fn from(source: MediaSource) -> Self {
        source.to_string()
    }
}

// ============================================================================
// Payload Structs
// ============================================================================

/// A named file attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileData {
    pub name: String,
    pub source: MediaSource,
}

/// Severity of a [`Content::Log`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }
}

/// A log line delivered to the platform instead of (or alongside) chat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub text: String,
}

// ============================================================================
// Content
// ============================================================================

/// Fieldless discriminant of [`Content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Image,
    At,
    Node,
    Record,
    File,
    Log,
}

/// One unit of message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Content {
    /// Plain text.
    Text(String),
    /// An image.
    Image(MediaSource),
    /// A mention of a user id.
    At(String),
    /// A forward node holding already-normalized contents.
    Node(Vec<Content>),
    /// A voice record.
    Record(MediaSource),
    /// A file attachment.
    File(FileData),
    /// A log line.
    Log(LogEntry),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn at(user_id: impl Into<String>) -> Self {
        Self::At(user_id.into())
    }

    pub fn image(source: MediaSource) -> Self {
        Self::Image(source)
    }

    pub fn record(source: MediaSource) -> Self {
        Self::Record(source)
    }

    pub fn file(name: impl Into<String>, source: MediaSource) -> Self {
        Self::File(FileData {
            name: name.into(),
            source,
        })
    }

    pub fn log(level: LogLevel, text: impl Into<String>) -> Self {
        Self::Log(LogEntry {
            level,
            text: text.into(),
        })
    }

    /// Creates a forward node from contents that are already normalized.
    pub fn node(items: Vec<Content>) -> Self {
        Self::Node(items)
    }

    /// Creates a forward node from a mix of contents and raw strings.
    ///
    /// Raw strings that look like media references become images, every
    /// other raw string is kept as text.
    pub fn node_from<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeItem>,
    {
        let contents = items
            .into_iter()
            .map(|item| match item.into() {
                NodeItem::Content(content) => content,
                NodeItem::Raw(raw) => match MediaSource::parse(&raw) {
                    Ok(source) => Self::Image(source),
                    Err(_) => Self::Text(raw),
                },
            })
            .collect();
        Self::Node(contents)
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Text(_) => ContentKind::Text,
            Self::Image(_) => ContentKind::Image,
            Self::At(_) => ContentKind::At,
            Self::Node(_) => ContentKind::Node,
            Self::Record(_) => ContentKind::Record,
            Self::File(_) => ContentKind::File,
            Self::Log(_) => ContentKind::Log,
        }
    }

    /// Returns the text if this is a text content.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Image(source) => write!(f, "[image:{}]", source.reference()),
            Self::At(id) => write!(f, "@{id}"),
            Self::Node(items) => write!(f, "[node:{} items]", items.len()),
            Self::Record(source) => write!(f, "[record:{}]", source.reference()),
            Self::File(file) => write!(f, "[file:{}]", file.name),
            Self::Log(entry) => write!(f, "[{}] {}", entry.level.as_str(), entry.text),
        }
    }
}

/// Input accepted by [`Content::node_from`].
#[derive(Debug, Clone)]
pub enum NodeItem {
    Content(Content),
    Raw(String),
}

impl From<Content> for NodeItem {
    fn from(content: Content) -> Self {
        Self::Content(content)
    }
}

impl From<String> for NodeItem {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<&str> for NodeItem {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_media_sources() {
        assert_eq!(
            MediaSource::parse("https://example.com/a.png").unwrap(),
            MediaSource::url("https://example.com/a.png")
        );
        assert_eq!(
            MediaSource::parse("link://https://example.com/a.png").unwrap(),
            MediaSource::url("https://example.com/a.png")
        );
        assert_eq!(
            MediaSource::parse("base64://aGVsbG8=").unwrap(),
            MediaSource::base64("aGVsbG8=")
        );
    }

    #[test]
    fn test_parse_rejects_local_paths() {
        let err = MediaSource::parse("/tmp/a.png").unwrap_err();
        assert_eq!(err, ContentError::UnsupportedSource("/tmp/a.png".into()));
    }

    #[test]
    fn test_reference_strips_link_scheme_only() {
        assert_eq!(MediaSource::url("http://x/y").reference(), "http://x/y");
        assert_eq!(MediaSource::base64("abc").reference(), "base64://abc");
        assert_eq!(MediaSource::url("http://x/y").to_string(), "link://http://x/y");
    }

    #[test]
    fn test_node_from_keeps_plain_strings_as_text() {
        let node = Content::node_from(vec![
            NodeItem::from("hello"),
            NodeItem::from("base64://aGk="),
            NodeItem::from("http://example.com/p.jpg"),
            NodeItem::from(Content::at("42")),
        ]);

        let Content::Node(items) = node else {
            panic!("expected node");
        };
        assert_eq!(
            items,
            vec![
                Content::text("hello"),
                Content::image(MediaSource::base64("aGk=")),
                Content::image(MediaSource::url("http://example.com/p.jpg")),
                Content::at("42"),
            ]
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(Content::text("a").kind(), ContentKind::Text);
        assert_eq!(Content::node(vec![]).kind(), ContentKind::Node);
        assert_eq!(
            Content::log(LogLevel::Success, "ok").kind(),
            ContentKind::Log
        );
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(Content::image(MediaSource::url("http://a/b.png"))).unwrap();
        assert_eq!(value, json!({"type": "image", "data": "link://http://a/b.png"}));

        let value = serde_json::to_value(Content::file("a.txt", MediaSource::base64("aGk="))).unwrap();
        assert_eq!(
            value,
            json!({"type": "file", "data": {"name": "a.txt", "source": "base64://aGk="}})
        );

        let value = serde_json::to_value(Content::log(LogLevel::Warning, "low disk")).unwrap();
        assert_eq!(
            value,
            json!({"type": "log", "data": {"level": "WARNING", "text": "low disk"}})
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_media() {
        let result: Result<Content, _> =
            serde_json::from_value(json!({"type": "record", "data": "C:/voice.silk"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_nested_node() {
        let content: Content = serde_json::from_value(json!({
            "type": "node",
            "data": [
                {"type": "text", "data": "hi"},
                {"type": "at", "data": "10086"}
            ]
        }))
        .unwrap();
        assert_eq!(
            content,
            Content::node(vec![Content::text("hi"), Content::at("10086")])
        );
    }
}
