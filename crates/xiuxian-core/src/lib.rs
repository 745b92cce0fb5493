//! # Xiuxian Core
//!
//! The data model of the Xiuxian bot framework.
//!
//! - [`Content`]: one unit of message payload (text, image, mention, node,
//!   voice record, file, log)
//! - [`MessageReceive`] / [`Event`]: an inbound message before and after
//!   text normalization
//! - [`MessageSend`]: an outbound message for an adapter to deliver
//!
//! ```text
//! ┌─────────────┐  MessageReceive  ┌─────────┐   Event   ┌────────┐
//! │   Adapter   │─────────────────▶│  Event  │──────────▶│ Router │
//! └─────────────┘                  └─────────┘           └────────┘
//! ```

pub mod content;
pub mod error;
pub mod event;
pub mod message;

pub use content::{Content, ContentKind, FileData, LogEntry, LogLevel, MediaSource, NodeItem};
pub use error::{ContentError, ContentResult};
pub use event::{Event, FileEncoding, FilePayload, MessageReceive, SourceKind};
pub use message::MessageSend;
