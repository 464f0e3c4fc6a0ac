//! interaction-polls library
//!
//! Single-choice polls for chat bots: a poll is posted as an embed with a
//! select menu, every vote re-renders live percentage bars, and the poll's
//! owner closes it by reacting with a designated emoji.
//!
//! The bot process owns the gateway connection. It forwards select-menu
//! and reaction-added events to an [`events::EventRouter`], which routes
//! them to the polls that registered for them.

pub mod channels;
pub mod events;
pub mod logging;
pub mod polls;

pub use channels::{DiscordConfig, DiscordHost, DynHost, MemoryHost, PollHost};
pub use events::EventRouter;
pub use polls::{LivePoll, Poll, PollError, PollSettings};
