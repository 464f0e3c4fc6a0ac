//! Host Trait
//!
//! The messaging operations a poll needs from the chat platform it runs on.

use super::components::{
    ChannelId, Embed, InteractionContext, MessageEdit, MessageId, MessageRef, OutgoingMessage,
    UserId,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for host operations
pub type HostResult<T> = Result<T, HostError>;

/// Errors returned by a host
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Host error: {0}")]
    Other(String),
}

/// Messaging surface of the host framework
#[async_trait]
pub trait PollHost: Send + Sync {
    /// Post a message in a channel
    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: OutgoingMessage,
    ) -> HostResult<MessageRef>;

    /// Reply to an interaction with a message only the invoker can see
    async fn send_ephemeral(&self, ctx: &InteractionContext, embed: Embed) -> HostResult<()>;

    /// Edit a posted message
    async fn edit_message(&self, message: &MessageRef, edit: MessageEdit) -> HostResult<MessageRef>;

    /// Remove one user's reaction from a message
    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
        user_id: UserId,
    ) -> HostResult<()>;

    /// Answer a component interaction that has already been handled
    async fn acknowledge_component(&self, _ctx: &InteractionContext) -> HostResult<()> {
        Ok(())
    }
}

/// Type-erased host for storage
pub type DynHost = Arc<dyn PollHost>;
