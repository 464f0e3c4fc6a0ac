//! Poll Errors

use crate::channels::HostError;

/// Error returned by a post-vote hook
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by poll operations
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// Fewer than two choices when showing
    #[error("Poll needs at least 2 choices to be shown, has {count}")]
    NotEnoughChoices { count: usize },

    /// Choice count would exceed the cap
    #[error("Poll cannot have more than {max} choices")]
    TooManyChoices { max: usize },

    #[error("Poll is closed")]
    Closed,

    #[error("Invalid option identifier: {0}")]
    InvalidOptionId(String),

    #[error("Component interaction carried no selected option")]
    NoSelection,

    #[error("Choice {index} out of range for a poll with {count} choices")]
    ChoiceOutOfRange { index: usize, count: usize },

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Vote hook failed: {0}")]
    Hook(HookError),
}

/// Result type for poll operations
pub type PollResult<T> = Result<T, PollError>;
