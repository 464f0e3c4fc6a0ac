//! Channels Module
//!
//! Message model and host adapters the poll engine talks through.

pub mod components;
pub mod discord;
pub mod host;
pub mod memory;

pub use components::{
    ChannelId, ComponentInteraction, Embed, EmbedField, EmbedFooter, Emoji, InteractionContext,
    MessageEdit, MessageId, MessageRef, OutgoingMessage, ReactionAdd, SelectMenu, SelectOption,
    UserId,
};
pub use discord::{DiscordConfig, DiscordHost};
pub use host::{DynHost, HostError, HostResult, PollHost};
pub use memory::{HostCall, MemoryHost};
