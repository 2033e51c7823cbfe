//! Messaging provider abstraction.
//!
//! The bot never talks to a network client directly. A provider exposes the
//! inbound message stream, direct-conversation lookup and outbound sends;
//! [`local::LocalProvider`] is the in-process implementation used by tests
//! and the console front end.

pub mod error;
pub mod local;
pub mod provider;
pub mod types;

pub use {
    error::{Error, Result},
    local::{LocalProvider, SentMessage},
    provider::{MessageOutbound, MessageStream, MessagingProvider},
    types::{ContentType, ConversationId, InboundMessage, InboxId},
};
