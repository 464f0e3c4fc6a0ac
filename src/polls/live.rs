//! Live Polls
//!
//! A shown poll. Votes arrive through its select menu, and its owner closes
//! it by reacting with the close emoji. All state changes and the message
//! edit that renders them happen under one per-poll lock, so the rendered
//! message always reflects the latest recorded tally.

use super::config::PollSettings;
use super::error::{PollError, PollResult};
use super::hook::DynVoteHook;
use super::option_id::{self, PollId};
use super::render::{render_embed, Tally};
use crate::channels::{
    ChannelId, ComponentInteraction, DynHost, InteractionContext, MessageEdit, MessageId,
    MessageRef, ReactionAdd, UserId,
};
use crate::events::{ComponentHandler, ReactionHandler, Registration};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Poll status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    Open,
    Closed,
}

/// Why a reaction did not close the poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    WrongEmoji,
    OtherMessage,
    AlreadyClosed,
    /// The poll has no owner and can never be closed by reaction
    NoOwner,
    NotOwner,
}

/// Result of handling a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    Ignored(IgnoreReason),
}

/// Point-in-time copy of a poll
#[derive(Debug, Clone, Serialize)]
pub struct PollSnapshot {
    pub id: PollId,
    pub title: String,
    pub choices: Vec<String>,
    /// Voter -> choice index
    pub votes: HashMap<UserId, usize>,
    pub owner: Option<UserId>,
    pub status: PollStatus,
    pub message: MessageRef,
}

struct PollState {
    votes: HashMap<UserId, usize>,
    message: MessageRef,
    status: PollStatus,
}

/// A poll that has been posted and is receiving events
pub struct LivePoll {
    id: PollId,
    title: String,
    choices: Vec<String>,
    owner: Option<UserId>,
    hook: Option<DynVoteHook>,
    settings: Arc<PollSettings>,
    host: DynHost,
    /// Fixed once posted; reactions are filtered on it without locking
    channel_id: ChannelId,
    message_id: MessageId,
    state: Mutex<PollState>,
    registrations: parking_lot::Mutex<Vec<Registration>>,
}

impl std::fmt::Debug for LivePoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LivePoll")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("choices", &self.choices)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

impl LivePoll {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        id: PollId,
        title: String,
        choices: Vec<String>,
        owner: Option<UserId>,
        hook: Option<DynVoteHook>,
        settings: Arc<PollSettings>,
        host: DynHost,
        message: MessageRef,
    ) -> Self {
        Self {
            id,
            title,
            choices,
            owner,
            hook,
            settings,
            host,
            channel_id: message.channel_id,
            message_id: message.id,
            state: Mutex::new(PollState {
                votes: HashMap::new(),
                message,
                status: PollStatus::Open,
            }),
            registrations: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub(super) fn attach(&self, registrations: Vec<Registration>) {
        self.registrations.lock().extend(registrations);
    }

    pub fn id(&self) -> PollId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    pub async fn status(&self) -> PollStatus {
        self.state.lock().await.status
    }

    /// The posted message as last edited
    pub async fn message(&self) -> MessageRef {
        self.state.lock().await.message.clone()
    }

    pub async fn tally(&self) -> Tally {
        Tally::count(self.choices.len(), &self.state.lock().await.votes)
    }

    pub async fn snapshot(&self) -> PollSnapshot {
        let state = self.state.lock().await;
        self.snapshot_of(&state)
    }

    fn snapshot_of(&self, state: &PollState) -> PollSnapshot {
        PollSnapshot {
            id: self.id,
            title: self.title.clone(),
            choices: self.choices.clone(),
            votes: state.votes.clone(),
            owner: self.owner,
            status: state.status,
            message: state.message.clone(),
        }
    }

    /// Whether the poll still receives routed events
    pub fn is_registered(&self) -> bool {
        !self.registrations.lock().is_empty()
    }

    /// Stop routing events to this poll without closing it
    pub fn discard(&self) {
        let registrations = std::mem::take(&mut *self.registrations.lock());
        if !registrations.is_empty() {
            debug!(poll = %self.id, "poll handlers released");
        }
        drop(registrations);
    }

    /// Handle a select-menu response: answer the interaction, record the
    /// vote, then run the post-vote hook.
    ///
    /// The interaction is answered before anything else, so rejected
    /// selections are answered too and the answer never waits on the poll
    /// lock.
    pub async fn handle_select(&self, interaction: &ComponentInteraction) -> PollResult<()> {
        self.host
            .acknowledge_component(&interaction.context)
            .await?;

        let value = interaction.values.first().ok_or(PollError::NoSelection)?;
        let (poll_id, index) = option_id::parse(value)?;
        if poll_id != self.id {
            return Err(PollError::InvalidOptionId(value.clone()));
        }

        let snapshot = self.apply_vote(interaction.context.user_id, index).await?;
        self.run_hook(&snapshot, &interaction.context, index).await
    }

    /// Record a vote for the invoking user and run the post-vote hook
    pub async fn record_vote(&self, ctx: &InteractionContext, index: usize) -> PollResult<()> {
        let snapshot = self.apply_vote(ctx.user_id, index).await?;
        self.run_hook(&snapshot, ctx, index).await
    }

    /// Record `voter`'s choice, replacing any earlier one, and re-render
    async fn apply_vote(&self, voter: UserId, index: usize) -> PollResult<PollSnapshot> {
        let mut state = self.state.lock().await;
        if state.status == PollStatus::Closed {
            return Err(PollError::Closed);
        }
        if index >= self.choices.len() {
            return Err(PollError::ChoiceOutOfRange {
                index,
                count: self.choices.len(),
            });
        }

        let previous = state.votes.insert(voter, index);
        debug!(poll = %self.id, voter = %voter, choice = index, ?previous, "vote recorded");

        let embed = render_embed(&self.title, &self.choices, &state.votes, &self.settings);
        state.message = self
            .host
            .edit_message(
                &state.message,
                MessageEdit {
                    embeds: Some(vec![embed]),
                    select_menu: None,
                },
            )
            .await?;

        Ok(self.snapshot_of(&state))
    }

    async fn run_hook(
        &self,
        snapshot: &PollSnapshot,
        ctx: &InteractionContext,
        index: usize,
    ) -> PollResult<()> {
        match &self.hook {
            Some(hook) => hook
                .after_vote(snapshot, ctx, ctx.user_id, index)
                .await
                .map_err(PollError::Hook),
            None => Ok(()),
        }
    }

    /// Handle a reaction-added event; closes the poll when its owner
    /// reacts to the poll message with the close emoji.
    pub async fn handle_reaction_add(&self, reaction: &ReactionAdd) -> PollResult<CloseOutcome> {
        if reaction.emoji.name != self.settings.close_emoji {
            return Ok(CloseOutcome::Ignored(IgnoreReason::WrongEmoji));
        }

        if reaction.message_id != self.message_id {
            return Ok(CloseOutcome::Ignored(IgnoreReason::OtherMessage));
        }

        let mut state = self.state.lock().await;
        if state.status == PollStatus::Closed {
            return Ok(CloseOutcome::Ignored(IgnoreReason::AlreadyClosed));
        }
        // TODO: fall back to a manage-channel permission check once the host exposes member permissions
        let Some(owner) = self.owner else {
            debug!(poll = %self.id, user = %reaction.user_id, "close ignored, poll has no owner");
            return Ok(CloseOutcome::Ignored(IgnoreReason::NoOwner));
        };
        if reaction.user_id != owner {
            debug!(poll = %self.id, user = %reaction.user_id, "close ignored, not the owner");
            return Ok(CloseOutcome::Ignored(IgnoreReason::NotOwner));
        }

        let mut embed = match state.message.embeds.first() {
            Some(embed) => embed.clone(),
            None => render_embed(&self.title, &self.choices, &state.votes, &self.settings),
        };
        embed.set_footer(self.settings.closed_footer.clone());

        state.message = self
            .host
            .edit_message(
                &state.message,
                MessageEdit {
                    embeds: Some(vec![embed]),
                    select_menu: Some(None),
                },
            )
            .await?;
        state.status = PollStatus::Closed;
        drop(state);

        self.discard();
        info!(poll = %self.id, "poll closed");

        self.host
            .remove_reaction(
                self.channel_id,
                self.message_id,
                &self.settings.close_emoji,
                reaction.user_id,
            )
            .await?;
        Ok(CloseOutcome::Closed)
    }
}

#[async_trait]
impl ComponentHandler for LivePoll {
    async fn handle_component(&self, interaction: &ComponentInteraction) -> PollResult<()> {
        self.handle_select(interaction).await
    }
}

#[async_trait]
impl ReactionHandler for LivePoll {
    async fn handle_reaction(&self, reaction: &ReactionAdd) -> PollResult<()> {
        self.handle_reaction_add(reaction).await.map(|_| ())
    }
}
