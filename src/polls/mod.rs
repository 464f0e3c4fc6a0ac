//! Polling Module
//!
//! Single-choice polls posted as a message with a select menu. Votes update
//! live percentage bars; the owner closes the poll with a reaction.

pub mod config;
pub mod error;
pub mod hook;
pub mod live;
pub mod option_id;
pub mod poll;
pub mod render;

pub use config::{PollSettings, SettingsError};
pub use error::{HookError, PollError, PollResult};
pub use hook::{hook_fn, DynVoteHook, FnHook, VoteHook};
pub use live::{CloseOutcome, IgnoreReason, LivePoll, PollSnapshot, PollStatus};
pub use option_id::PollId;
pub use poll::{Poll, MIN_CHOICES};
pub use render::{render_embed, Tally};
