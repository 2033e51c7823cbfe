//! Per-sender chaos loops: registry, timer tasks and their lifecycle.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, AtomicU64, Ordering},
    },
    time::Duration,
};

use {
    chaosbot_channels::{ConversationId, InboxId, MessageOutbound},
    tokio::{
        task::JoinHandle,
        time::{Instant, MissedTickBehavior},
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use crate::{Result, command::ChaosParams, sentence::SentenceSource};

pub const STOPPED_TEXT: &str = "Chaos stopped.";
pub const NOT_RUNNING_TEXT: &str = "No chaos in progress.";
pub const COMPLETE_TEXT: &str = "Chaos complete.";

type Registry = Arc<Mutex<HashMap<InboxId, LoopHandle>>>;

/// Read-only view of a running loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaosLoopInfo {
    pub sender: InboxId,
    pub conversation: ConversationId,
    pub params: ChaosParams,
    pub sent: u32,
}

struct LoopState {
    sender: InboxId,
    conversation: ConversationId,
    params: ChaosParams,
    sent: AtomicU32,
}

impl LoopState {
    fn info(&self) -> ChaosLoopInfo {
        ChaosLoopInfo {
            sender: self.sender.clone(),
            conversation: self.conversation.clone(),
            params: self.params,
            sent: self.sent.load(Ordering::SeqCst),
        }
    }
}

struct LoopHandle {
    generation: u64,
    cancel: CancellationToken,
    task: JoinHandle<()>,
    state: Arc<LoopState>,
}

impl LoopHandle {
    /// Cancel the loop and wait until its task has exited.
    async fn cancel_and_wait(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await
            && e.is_panic()
        {
            error!(sender = %self.state.sender, error = %e, "chaos loop task panicked");
        }
    }
}

/// Owns every active chaos loop, at most one per sender.
pub struct ChaosManager {
    outbound: Arc<dyn MessageOutbound>,
    sentences: Arc<dyn SentenceSource>,
    loops: Registry,
    next_generation: AtomicU64,
}

impl ChaosManager {
    pub fn new(outbound: Arc<dyn MessageOutbound>, sentences: Arc<dyn SentenceSource>) -> Self {
        Self {
            outbound,
            sentences,
            loops: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Start a loop for `sender`, replacing any loop it already has.
    ///
    /// The confirmation is sent before the loop is registered; if it cannot
    /// be delivered no loop is started and the send error is returned.
    pub async fn start(
        &self,
        sender: &InboxId,
        conversation: &ConversationId,
        params: ChaosParams,
    ) -> Result<()> {
        if let Some(previous) = self.take(sender) {
            info!(sender = %sender, "replacing active chaos loop");
            previous.cancel_and_wait().await;
        }

        self.outbound
            .send_text(conversation, &params.confirmation())
            .await?;

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let cancel = CancellationToken::new();
        let state = Arc::new(LoopState {
            sender: sender.clone(),
            conversation: conversation.clone(),
            params,
            sent: AtomicU32::new(0),
        });
        let ctx = LoopContext {
            generation,
            cancel: cancel.clone(),
            state: Arc::clone(&state),
            outbound: Arc::clone(&self.outbound),
            sentences: Arc::clone(&self.sentences),
            loops: Arc::clone(&self.loops),
        };

        let displaced = {
            let mut loops = self.lock();
            let task = tokio::spawn(ctx.run());
            loops.insert(sender.clone(), LoopHandle {
                generation,
                cancel,
                task,
                state,
            })
        };
        if let Some(displaced) = displaced {
            // A concurrent start won the race; its loop must not keep firing.
            displaced.cancel.cancel();
        }

        info!(
            sender = %sender,
            conversation = %conversation,
            interval_secs = params.interval_secs,
            count = params.count,
            generation,
            "chaos loop started"
        );
        Ok(())
    }

    /// Stop the loop for `sender` and acknowledge in `conversation`.
    ///
    /// The acknowledgment is only sent once the loop's task has exited, so
    /// nothing from the loop can follow it.
    pub async fn stop(&self, sender: &InboxId, conversation: &ConversationId) -> Result<()> {
        match self.take(sender) {
            Some(handle) => {
                let sent = handle.state.sent.load(Ordering::SeqCst);
                handle.cancel_and_wait().await;
                info!(sender = %sender, sent, "chaos loop stopped");
                self.outbound.send_text(conversation, STOPPED_TEXT).await?;
            },
            None => {
                debug!(sender = %sender, "stop requested with no active loop");
                self.outbound
                    .send_text(conversation, NOT_RUNNING_TEXT)
                    .await?;
            },
        }
        Ok(())
    }

    pub fn is_active(&self, sender: &InboxId) -> bool {
        self.lock().contains_key(sender)
    }

    pub fn active_count(&self) -> usize {
        self.lock().len()
    }

    pub fn snapshot(&self, sender: &InboxId) -> Option<ChaosLoopInfo> {
        self.lock().get(sender).map(|h| h.state.info())
    }

    /// Snapshots of every running loop, ordered by sender.
    pub fn list(&self) -> Vec<ChaosLoopInfo> {
        let mut all: Vec<_> = self.lock().values().map(|h| h.state.info()).collect();
        all.sort_by(|a, b| a.sender.cmp(&b.sender));
        all
    }

    /// Cancel every loop and wait for all of them to exit.
    pub async fn shutdown(&self) {
        let handles: Vec<LoopHandle> = self.lock().drain().map(|(_, h)| h).collect();
        if handles.is_empty() {
            return;
        }
        info!(count = handles.len(), "stopping all chaos loops");
        for handle in &handles {
            handle.cancel.cancel();
        }
        for handle in handles {
            handle.cancel_and_wait().await;
        }
    }

    fn take(&self, sender: &InboxId) -> Option<LoopHandle> {
        self.lock().remove(sender)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<InboxId, LoopHandle>> {
        self.loops.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Everything a loop task needs; owned by the task.
struct LoopContext {
    generation: u64,
    cancel: CancellationToken,
    state: Arc<LoopState>,
    outbound: Arc<dyn MessageOutbound>,
    sentences: Arc<dyn SentenceSource>,
    loops: Registry,
}

impl LoopContext {
    async fn run(self) {
        let period = Duration::from_secs(self.state.params.interval_secs);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let sender = &self.state.sender;
        let conversation = &self.state.conversation;
        let count = self.state.params.count;

        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    debug!(sender = %sender, "chaos loop cancelled");
                    return;
                },
                _ = ticker.tick() => {},
            }

            let sent = self.state.sent.load(Ordering::SeqCst);
            if sent >= count {
                if !self.release() {
                    return;
                }
                info!(sender = %sender, sent, "chaos complete");
                if let Err(e) = self.outbound.send_text(conversation, COMPLETE_TEXT).await {
                    warn!(sender = %sender, error = %e, "failed to send chaos completion");
                }
                return;
            }

            let text = format!("{}: {}", sent + 1, self.sentences.sentence());
            if let Err(e) = self.outbound.send_text(conversation, &text).await {
                error!(
                    sender = %sender,
                    conversation = %conversation,
                    sent,
                    error = %e,
                    "error sending chaos message, stopping loop"
                );
                self.release();
                return;
            }
            self.state.sent.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Remove this loop's registry entry.
    ///
    /// Returns `false` if the entry already belongs to someone else (the loop
    /// was stopped or replaced), in which case nothing is removed.
    fn release(&self) -> bool {
        self.cancel.cancel();
        let mut loops = self.loops.lock().unwrap_or_else(|e| e.into_inner());
        match loops.get(&self.state.sender) {
            Some(handle) if handle.generation == self.generation => {
                loops.remove(&self.state.sender);
                true
            },
            _ => false,
        }
    }
}
