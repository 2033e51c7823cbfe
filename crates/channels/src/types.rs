use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// Stable identity of a messaging participant.
///
/// Inbox ids are case-insensitive; the value is lower-cased on construction so
/// equality and hashing operate on the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct InboxId(String);

impl InboxId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for InboxId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for InboxId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<InboxId> for String {
    fn from(value: InboxId) -> Self {
        value.0
    }
}

impl std::fmt::Display for InboxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider handle of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Content type discriminator of an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type_id", content = "other", rename_all = "snake_case")]
pub enum ContentType {
    Text,
    /// Anything that is not plain text (reactions, attachments, receipts...).
    Other(String),
}

impl ContentType {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

/// A message received from the provider's stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: String,
    /// Author of the message. Absent for system messages.
    pub sender_inbox_id: Option<InboxId>,
    /// Text body; `None` when the content is not textual.
    pub content: Option<String>,
    pub content_type: ContentType,
    /// Conversation the message arrived in.
    pub conversation_id: ConversationId,
    pub sent_at: DateTime<Utc>,
}

impl InboundMessage {
    /// Build a plain text message.
    pub fn text(
        id: impl Into<String>,
        sender: impl Into<InboxId>,
        conversation_id: ConversationId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender_inbox_id: Some(sender.into()),
            content: Some(content.into()),
            content_type: ContentType::Text,
            conversation_id,
            sent_at: Utc::now(),
        }
    }

    /// Lower-cased text content, if the message is textual.
    pub fn lowercase_content(&self) -> Option<String> {
        self.content.as_deref().map(str::to_lowercase)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbox_id_is_case_insensitive() {
        assert_eq!(InboxId::new("AbC123"), InboxId::new("abc123"));
        assert_eq!(InboxId::new("  ABC ").as_str(), "abc");
    }

    #[test]
    fn inbox_id_deserializes_normalized() {
        let id: InboxId = serde_json::from_str("\"DEADbeef\"").unwrap();
        assert_eq!(id.as_str(), "deadbeef");
    }

    #[test]
    fn content_type_text() {
        assert!(ContentType::Text.is_text());
        assert!(!ContentType::Other("reaction".into()).is_text());
    }

    #[test]
    fn lowercase_content() {
        let msg = InboundMessage::text("1", "alice", ConversationId::new("c1"), "/CHAOS Stop");
        assert_eq!(msg.lowercase_content().as_deref(), Some("/chaos stop"));
    }
}
