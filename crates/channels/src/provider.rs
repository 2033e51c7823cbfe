use std::sync::Arc;

use {async_trait::async_trait, futures::stream::BoxStream};

use crate::{
    Result,
    types::{ConversationId, InboundMessage, InboxId},
};

/// Stream of every message the client can see, across all conversations.
pub type MessageStream = BoxStream<'static, InboundMessage>;

/// Send messages to a conversation.
#[async_trait]
pub trait MessageOutbound: Send + Sync {
    async fn send_text(&self, conversation: &ConversationId, text: &str) -> Result<()>;
}

/// Connected messaging client. Each transport implements this.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Inbox id of the bot itself, used to ignore its own messages.
    fn inbox_id(&self) -> &InboxId;

    /// Public address the bot can be reached at.
    fn address(&self) -> &str;

    /// Shared outbound sender, usable outside the provider.
    fn outbound(&self) -> Arc<dyn MessageOutbound>;

    /// Pull conversations from the network into the local store.
    async fn sync_conversations(&self) -> Result<()>;

    /// Open the stream of all inbound messages.
    async fn stream_all_messages(&self) -> Result<MessageStream>;

    /// Find the direct conversation with `inbox_id`, if one exists.
    async fn dm_by_inbox_id(&self, inbox_id: &InboxId) -> Result<Option<ConversationId>>;
}
