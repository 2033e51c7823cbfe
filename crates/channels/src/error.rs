use std::error::Error as StdError;

/// Crate-wide result type for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed provider errors shared across the messaging traits.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An outbound send was rejected by the transport.
    #[error("send to conversation {conversation} failed: {reason}")]
    SendFailed {
        conversation: String,
        reason: String,
    },

    /// A conversation handle does not refer to a known conversation.
    #[error("unknown conversation: {conversation}")]
    ConversationNotFound { conversation: String },

    /// The inbound stream can no longer be opened or has been taken already.
    #[error("message stream closed")]
    StreamClosed,

    /// Operation is currently unavailable (not connected/ready).
    #[error("provider operation unavailable: {message}")]
    Unavailable { message: String },

    /// Wrapped source error from the underlying client.
    #[error("provider operation failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn send_failed(conversation: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::SendFailed {
            conversation: conversation.to_string(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn conversation_not_found(conversation: impl std::fmt::Display) -> Self {
        Self::ConversationNotFound {
            conversation: conversation.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
