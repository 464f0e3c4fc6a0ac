//! Post-vote Hooks

use super::error::HookError;
use super::live::PollSnapshot;
use crate::channels::{InteractionContext, UserId};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Called after every recorded vote
#[async_trait]
pub trait VoteHook: Send + Sync {
    async fn after_vote(
        &self,
        poll: &PollSnapshot,
        ctx: &InteractionContext,
        voter: UserId,
        choice: usize,
    ) -> Result<(), HookError>;
}

/// Shared hook handle
pub type DynVoteHook = Arc<dyn VoteHook>;

/// Hook built from a closure, see [`hook_fn`]
#[derive(Clone)]
pub struct FnHook<F> {
    f: F,
}

/// Build a [`VoteHook`] from a closure returning a future.
///
/// A synchronous body is a closure returning `async move { .. }`.
pub fn hook_fn<F, Fut>(f: F) -> FnHook<F>
where
    F: Fn(PollSnapshot, InteractionContext, UserId, usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    FnHook { f }
}

#[async_trait]
impl<F, Fut> VoteHook for FnHook<F>
where
    F: Fn(PollSnapshot, InteractionContext, UserId, usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    async fn after_vote(
        &self,
        poll: &PollSnapshot,
        ctx: &InteractionContext,
        voter: UserId,
        choice: usize,
    ) -> Result<(), HookError> {
        (self.f)(poll.clone(), ctx.clone(), voter, choice).await
    }
}
