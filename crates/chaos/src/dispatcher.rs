//! Inbound stream consumer: filters messages and routes chaos commands.

use std::sync::Arc;

use {
    chaosbot_channels::{InboundMessage, MessagingProvider},
    chaosbot_config::BotConfig,
    futures::StreamExt,
    tracing::{debug, error, info, warn},
};

use crate::{
    Result,
    command::{ChaosCommand, ChaosParams, is_chaos_command, parse_command},
    manager::ChaosManager,
    sentence::{RandomSentences, SentenceSource},
};

/// Why an inbound message was not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NoSender,
    OwnMessage,
    NotText,
    NotCommand,
}

/// What handling one inbound message resulted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored(IgnoreReason),
    /// The sender has no direct conversation with the bot.
    NoConversation,
    Started(ChaosParams),
    Stopped,
    /// The command was understood but a provider call failed.
    Failed,
}

/// The chaos bot: one provider, one loop manager.
pub struct ChaosBot {
    config: BotConfig,
    provider: Arc<dyn MessagingProvider>,
    manager: ChaosManager,
}

impl ChaosBot {
    pub fn new(config: BotConfig, provider: Arc<dyn MessagingProvider>) -> Self {
        Self::with_sentences(config, provider, Arc::new(RandomSentences))
    }

    pub fn with_sentences(
        config: BotConfig,
        provider: Arc<dyn MessagingProvider>,
        sentences: Arc<dyn SentenceSource>,
    ) -> Self {
        let manager = ChaosManager::new(provider.outbound(), sentences);
        Self {
            config,
            provider,
            manager,
        }
    }

    pub fn manager(&self) -> &ChaosManager {
        &self.manager
    }

    /// Sync, then consume the inbound stream until it ends.
    ///
    /// Only failing to sync or to open the stream is an error; problems with
    /// individual messages are logged and skipped.
    pub async fn run(&self) -> Result<()> {
        info!(env = %self.config.env, "syncing conversations");
        self.provider.sync_conversations().await?;

        let address = self.provider.address();
        info!(
            inbox_id = %self.provider.inbox_id(),
            address,
            url = %self.config.dm_url(address),
            "agent initialized"
        );

        let mut stream = self.provider.stream_all_messages().await?;
        info!("waiting for messages");
        while let Some(message) = stream.next().await {
            self.handle_message(&message).await;
        }

        info!("message stream ended");
        Ok(())
    }

    /// Handle one inbound message.
    pub async fn handle_message(&self, message: &InboundMessage) -> Outcome {
        let Some(sender) = message.sender_inbox_id.as_ref().filter(|s| !s.is_empty()) else {
            return Outcome::Ignored(IgnoreReason::NoSender);
        };
        if sender == self.provider.inbox_id() {
            return Outcome::Ignored(IgnoreReason::OwnMessage);
        }
        let content = match (&message.content, message.content_type.is_text()) {
            (Some(content), true) => content,
            _ => return Outcome::Ignored(IgnoreReason::NotText),
        };
        if !is_chaos_command(content) {
            return Outcome::Ignored(IgnoreReason::NotCommand);
        }

        info!(sender = %sender, message_id = %message.id, content = %content, "received chaos command");

        let conversation = match self.provider.dm_by_inbox_id(sender).await {
            Ok(Some(conversation)) => conversation,
            Ok(None) => {
                warn!(sender = %sender, "unable to find conversation, skipping");
                return Outcome::NoConversation;
            },
            Err(e) => {
                warn!(sender = %sender, error = %e, "conversation lookup failed, skipping");
                return Outcome::NoConversation;
            },
        };

        let Some(command) = parse_command(content, true) else {
            return Outcome::Ignored(IgnoreReason::NotCommand);
        };
        debug!(sender = %sender, ?command, "dispatching chaos command");

        match command {
            ChaosCommand::Stop => match self.manager.stop(sender, &conversation).await {
                Ok(()) => Outcome::Stopped,
                Err(e) => {
                    error!(sender = %sender, error = %e, "failed to stop chaos");
                    Outcome::Failed
                },
            },
            ChaosCommand::Start(params) => {
                match self.manager.start(sender, &conversation, params).await {
                    Ok(()) => Outcome::Started(params),
                    Err(e) => {
                        error!(sender = %sender, error = %e, "failed to start chaos");
                        Outcome::Failed
                    },
                }
            },
        }
    }

    /// Cancel all running loops.
    pub async fn shutdown(&self) {
        self.manager.shutdown().await;
    }
}
