//! In-process provider backed by channels. No network; for tests and the
//! console front end.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    futures::StreamExt,
    tokio::sync::mpsc,
    tokio_stream::wrappers::UnboundedReceiverStream,
    tracing::debug,
};

use crate::{
    Error, Result,
    provider::{MessageOutbound, MessageStream, MessagingProvider},
    types::{ContentType, ConversationId, InboundMessage, InboxId},
};

/// A message delivered through [`LocalProvider`]'s outbound side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub conversation: ConversationId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Outbound half of [`LocalProvider`]: records every accepted send.
#[derive(Default)]
pub struct LocalOutbound {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<HashSet<ConversationId>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SentMessage>>>,
}

impl LocalOutbound {
    fn record(&self, message: SentMessage) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        subscribers.retain(|tx| tx.send(message.clone()).is_ok());
        drop(subscribers);
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message);
    }
}

#[async_trait]
impl MessageOutbound for LocalOutbound {
    async fn send_text(&self, conversation: &ConversationId, text: &str) -> Result<()> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(conversation);
        if failing {
            return Err(Error::send_failed(conversation, "delivery refused"));
        }
        debug!(conversation = %conversation, text_len = text.len(), "local outbound send");
        self.record(SentMessage {
            conversation: conversation.clone(),
            text: text.to_string(),
            sent_at: Utc::now(),
        });
        Ok(())
    }
}

/// Provider that keeps everything in memory.
///
/// Inbound messages are pushed with [`LocalProvider::inject`]; direct
/// conversations must be registered with [`LocalProvider::register_dm`] before
/// the bot can answer a sender.
pub struct LocalProvider {
    inbox_id: InboxId,
    address: String,
    inbound_tx: mpsc::UnboundedSender<InboundMessage>,
    inbound_rx: Mutex<Option<mpsc::UnboundedReceiver<InboundMessage>>>,
    dms: Mutex<HashMap<InboxId, ConversationId>>,
    outbound: Arc<LocalOutbound>,
    synced: AtomicBool,
    next_message_id: AtomicU64,
}

impl LocalProvider {
    pub fn new(inbox_id: impl Into<InboxId>) -> Self {
        let inbox_id = inbox_id.into();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        Self {
            address: inbox_id.to_string(),
            inbox_id,
            inbound_tx,
            inbound_rx: Mutex::new(Some(inbound_rx)),
            dms: Mutex::new(HashMap::new()),
            outbound: Arc::new(LocalOutbound::default()),
            synced: AtomicBool::new(false),
            next_message_id: AtomicU64::new(1),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Create (or return the existing) direct conversation with `inbox_id`.
    pub fn register_dm(&self, inbox_id: impl Into<InboxId>) -> ConversationId {
        let inbox_id = inbox_id.into();
        let mut dms = self.dms.lock().unwrap_or_else(|e| e.into_inner());
        dms.entry(inbox_id.clone())
            .or_insert_with(|| ConversationId::new(format!("dm:{inbox_id}")))
            .clone()
    }

    /// Push a message into the inbound stream.
    pub fn inject(&self, message: InboundMessage) -> Result<()> {
        self.inbound_tx
            .send(message)
            .map_err(|_| Error::StreamClosed)
    }

    /// Push a text message from `sender`, delivered in its direct conversation
    /// when one is registered.
    pub fn inject_text(&self, sender: impl Into<InboxId>, text: impl Into<String>) -> Result<()> {
        let sender = sender.into();
        let conversation = self
            .dms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&sender)
            .cloned()
            .unwrap_or_else(|| ConversationId::new(format!("group:{sender}")));
        let id = self.next_message_id.fetch_add(1, Ordering::Relaxed);
        self.inject(InboundMessage::text(
            id.to_string(),
            sender,
            conversation,
            text,
        ))
    }

    /// Push a non-text message (e.g. a reaction) from `sender`.
    pub fn inject_other(&self, sender: impl Into<InboxId>, type_id: impl Into<String>) -> Result<()> {
        let sender = sender.into();
        let id = self.next_message_id.fetch_add(1, Ordering::Relaxed);
        self.inject(InboundMessage {
            id: id.to_string(),
            conversation_id: ConversationId::new(format!("dm:{sender}")),
            sender_inbox_id: Some(sender),
            content: None,
            content_type: ContentType::Other(type_id.into()),
            sent_at: Utc::now(),
        })
    }

    /// Make every future send to `conversation` fail.
    pub fn fail_sends_to(&self, conversation: &ConversationId) {
        self.outbound
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(conversation.clone());
    }

    /// Undo [`LocalProvider::fail_sends_to`].
    pub fn restore_sends_to(&self, conversation: &ConversationId) {
        self.outbound
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(conversation);
    }

    /// Receive every message accepted from now on.
    pub fn subscribe_outbound(&self) -> mpsc::UnboundedReceiver<SentMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outbound
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }

    /// All messages sent so far, in send order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.outbound
            .sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Texts sent to one conversation, in send order.
    pub fn sent_to(&self, conversation: &ConversationId) -> Vec<String> {
        self.outbound
            .sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|m| &m.conversation == conversation)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn is_synced(&self) -> bool {
        self.synced.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagingProvider for LocalProvider {
    fn inbox_id(&self) -> &InboxId {
        &self.inbox_id
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn outbound(&self) -> Arc<dyn MessageOutbound> {
        Arc::clone(&self.outbound) as Arc<dyn MessageOutbound>
    }

    async fn sync_conversations(&self) -> Result<()> {
        self.synced.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stream_all_messages(&self) -> Result<MessageStream> {
        let rx = self
            .inbound_rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or(Error::StreamClosed)?;
        Ok(UnboundedReceiverStream::new(rx).boxed())
    }

    async fn dm_by_inbox_id(&self, inbox_id: &InboxId) -> Result<Option<ConversationId>> {
        let dms = self.dms.lock().unwrap_or_else(|e| e.into_inner());
        Ok(dms.get(inbox_id).cloned())
    }
}
