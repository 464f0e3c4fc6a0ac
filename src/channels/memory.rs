//! In-memory Host
//!
//! A [`PollHost`] that keeps posted messages in memory and records every
//! call. Used for tests and dry runs without a chat platform.

use super::components::{
    ChannelId, Embed, InteractionContext, MessageEdit, MessageId, MessageRef, OutgoingMessage,
    SelectMenu, UserId,
};
use super::host::{HostError, HostResult, PollHost};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A call received by [`MemoryHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Send {
        channel_id: ChannelId,
        message: OutgoingMessage,
    },
    Ephemeral {
        user_id: UserId,
        embed: Embed,
    },
    Edit {
        message_id: MessageId,
        edit: MessageEdit,
    },
    RemoveReaction {
        message_id: MessageId,
        emoji: String,
        user_id: UserId,
    },
    Acknowledge {
        interaction_id: String,
    },
}

/// Stored state of a posted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub channel_id: ChannelId,
    pub embeds: Vec<Embed>,
    pub select_menu: Option<SelectMenu>,
}

/// Recording in-memory host
#[derive(Debug)]
pub struct MemoryHost {
    next_id: AtomicU64,
    calls: Mutex<Vec<HostCall>>,
    messages: Mutex<HashMap<MessageId, StoredMessage>>,
    fail_edits: AtomicBool,
    fail_ephemeral: AtomicBool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            calls: Mutex::new(Vec::new()),
            messages: Mutex::new(HashMap::new()),
            fail_edits: AtomicBool::new(false),
            fail_ephemeral: AtomicBool::new(false),
        }
    }

    /// Make every following edit fail with an API error
    pub fn fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }

    /// Make every following ephemeral reply fail with a network error
    pub fn fail_ephemeral(&self, fail: bool) {
        self.fail_ephemeral.store(fail, Ordering::SeqCst);
    }

    /// All calls so far, oldest first
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Number of edits applied so far
    pub fn edit_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, HostCall::Edit { .. }))
            .count()
    }

    /// Current state of a posted message
    pub fn message(&self, id: MessageId) -> Option<StoredMessage> {
        self.messages.lock().get(&id).cloned()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl PollHost for MemoryHost {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: OutgoingMessage,
    ) -> HostResult<MessageRef> {
        let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.record(HostCall::Send {
            channel_id,
            message: message.clone(),
        });
        self.messages.lock().insert(
            id,
            StoredMessage {
                channel_id,
                embeds: message.embeds.clone(),
                select_menu: message.select_menu,
            },
        );
        Ok(MessageRef {
            id,
            channel_id,
            embeds: message.embeds,
        })
    }

    async fn send_ephemeral(&self, ctx: &InteractionContext, embed: Embed) -> HostResult<()> {
        if self.fail_ephemeral.load(Ordering::SeqCst) {
            return Err(HostError::Network("interaction token expired".to_string()));
        }
        self.record(HostCall::Ephemeral {
            user_id: ctx.user_id,
            embed,
        });
        Ok(())
    }

    async fn edit_message(&self, message: &MessageRef, edit: MessageEdit) -> HostResult<MessageRef> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(HostError::Api {
                status: 500,
                body: "edit rejected".to_string(),
            });
        }
        self.record(HostCall::Edit {
            message_id: message.id,
            edit: edit.clone(),
        });

        let mut messages = self.messages.lock();
        let stored = messages
            .get_mut(&message.id)
            .ok_or_else(|| HostError::NotFound(format!("message {}", message.id)))?;
        if let Some(embeds) = edit.embeds {
            stored.embeds = embeds;
        }
        if let Some(menu) = edit.select_menu {
            stored.select_menu = menu;
        }

        Ok(MessageRef {
            id: message.id,
            channel_id: stored.channel_id,
            embeds: stored.embeds.clone(),
        })
    }

    async fn remove_reaction(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
        user_id: UserId,
    ) -> HostResult<()> {
        self.record(HostCall::RemoveReaction {
            message_id,
            emoji: emoji.to_string(),
            user_id,
        });
        Ok(())
    }

    async fn acknowledge_component(&self, ctx: &InteractionContext) -> HostResult<()> {
        self.record(HostCall::Acknowledge {
            interaction_id: ctx.interaction_id.clone(),
        });
        Ok(())
    }
}
