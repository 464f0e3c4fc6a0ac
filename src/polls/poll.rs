//! Poll Construction
//!
//! A [`Poll`] is built in memory, may grow up to the choice cap and is then
//! shown, which posts it and turns it into a [`LivePoll`].

use super::config::PollSettings;
use super::error::{PollError, PollResult};
use super::hook::{DynVoteHook, VoteHook};
use super::live::LivePoll;
use super::option_id::{self, PollId};
use super::render::render_embed;
use crate::channels::{
    DynHost, Embed, Emoji, InteractionContext, OutgoingMessage, SelectMenu, SelectOption, UserId,
};
use crate::events::EventRouter;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Minimum number of choices to show a poll
pub const MIN_CHOICES: usize = 2;

/// A poll that has not been shown yet
pub struct Poll {
    id: PollId,
    title: String,
    choices: Vec<String>,
    owner: Option<UserId>,
    hook: Option<DynVoteHook>,
    settings: Arc<PollSettings>,
}

impl std::fmt::Debug for Poll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poll")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("choices", &self.choices)
            .field("owner", &self.owner)
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

impl Poll {
    /// Create a poll with the default settings
    pub fn new(title: impl Into<String>, choices: Vec<String>) -> PollResult<Self> {
        Self::with_settings(title, choices, Arc::new(PollSettings::default()))
    }

    /// Create a poll with shared settings
    pub fn with_settings(
        title: impl Into<String>,
        choices: Vec<String>,
        settings: Arc<PollSettings>,
    ) -> PollResult<Self> {
        let max = settings.max_choices();
        if choices.len() > max {
            return Err(PollError::TooManyChoices { max });
        }

        let poll = Self {
            id: PollId::new(),
            title: title.into(),
            choices,
            owner: None,
            hook: None,
            settings,
        };

        info!(poll = %poll.id, title = %poll.title, "poll created");
        for choice in &poll.choices {
            info!(poll = %poll.id, choice = %choice, "choice added");
        }
        Ok(poll)
    }

    /// Allow this user to close the poll by reaction
    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Run a hook after every vote
    pub fn with_hook(mut self, hook: impl VoteHook + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Append a choice. Duplicate texts are allowed.
    pub fn add_choice(&mut self, choice: impl Into<String>) -> PollResult<()> {
        let max = self.settings.max_choices();
        if self.choices.len() >= max {
            return Err(PollError::TooManyChoices { max });
        }

        let choice = choice.into();
        info!(poll = %self.id, choice = %choice, "choice added");
        self.choices.push(choice);
        Ok(())
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

    /// The voting control: one option per choice
    pub fn select_menu(&self) -> SelectMenu {
        SelectMenu {
            custom_id: option_id::menu_id(self.id),
            options: self
                .choices
                .iter()
                .enumerate()
                .map(|(index, choice)| SelectOption {
                    label: choice.clone(),
                    value: option_id::encode(self.id, index),
                    description: None,
                    emoji: Some(Emoji::unicode(self.settings.marker(index))),
                })
                .collect(),
            placeholder: Some(self.title.clone()),
        }
    }

    /// Embed with no votes recorded
    pub fn render(&self) -> Embed {
        render_embed(&self.title, &self.choices, &HashMap::new(), &self.settings)
    }

    /// Post the poll in the invoking channel, register its vote and close
    /// handlers with `router`, then confirm to the invoker.
    ///
    /// Handlers are registered as soon as the message exists, so the posted
    /// menu is always routed. A failed confirmation is logged and does not
    /// fail the show.
    pub async fn show(
        self,
        ctx: &InteractionContext,
        host: DynHost,
        router: &EventRouter,
    ) -> PollResult<Arc<LivePoll>> {
        if self.choices.len() < MIN_CHOICES {
            return Err(PollError::NotEnoughChoices {
                count: self.choices.len(),
            });
        }

        let menu = self.select_menu();
        let message = host
            .send_message(
                ctx.channel_id,
                OutgoingMessage {
                    embeds: vec![self.render()],
                    select_menu: Some(menu.clone()),
                },
            )
            .await?;
        let acknowledgement = Embed::described(self.settings.acknowledgement_for(&self.title));

        let live = Arc::new(LivePoll::new(
            self.id,
            self.title,
            self.choices,
            self.owner,
            self.hook,
            self.settings,
            host.clone(),
            message,
        ));

        let registrations = vec![
            router.register_component(menu.custom_id, live.clone()),
            router.register_reaction(live.clone()),
        ];
        live.attach(registrations);
        info!(poll = %live.id(), channel = %ctx.channel_id, "poll shown");

        if let Err(e) = host.send_ephemeral(ctx, acknowledgement).await {
            warn!(poll = %live.id(), error = %e, "failed to confirm poll to its creator");
        }
        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("choice {i}")).collect()
    }

    #[test]
    fn test_new_enforces_cap() {
        for n in 0..=9 {
            assert!(Poll::new("t", choices(n)).is_ok(), "{n} choices rejected");
        }
        for n in [10, 12] {
            assert!(matches!(
                Poll::new("t", choices(n)),
                Err(PollError::TooManyChoices { max: 9 })
            ));
        }
    }

    #[test]
    fn test_add_choice_up_to_cap() {
        let mut poll = Poll::new("t", vec![]).unwrap();
        for i in 0..9 {
            poll.add_choice(format!("c{i}")).unwrap();
        }
        assert!(matches!(
            poll.add_choice("one too many"),
            Err(PollError::TooManyChoices { max: 9 })
        ));
        assert_eq!(poll.choices().len(), 9);
    }

    #[test]
    fn test_add_choice_allows_duplicates() {
        let mut poll = Poll::new("t", vec!["same".to_string()]).unwrap();
        poll.add_choice("same").unwrap();
        assert_eq!(poll.choices(), ["same", "same"]);
    }

    #[test]
    fn test_cap_follows_settings() {
        let settings = Arc::new(PollSettings {
            number_emojis: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            ..PollSettings::default()
        });
        let mut poll = Poll::with_settings("t", choices(3), settings).unwrap();
        assert!(matches!(
            poll.add_choice("d"),
            Err(PollError::TooManyChoices { max: 3 })
        ));
    }

    #[test]
    fn test_select_menu() {
        let poll = Poll::new("Lunch?", vec!["Pizza".into(), "Sushi".into()]).unwrap();
        let menu = poll.select_menu();

        assert_eq!(menu.custom_id, format!("polls_{}", poll.id()));
        assert_eq!(menu.placeholder.as_deref(), Some("Lunch?"));
        assert_eq!(menu.options.len(), 2);
        assert_eq!(menu.options[1].label, "Sushi");
        assert_eq!(menu.options[1].emoji, Some(Emoji::unicode("2️⃣")));
        assert_eq!(
            option_id::parse(&menu.options[1].value).unwrap(),
            (poll.id(), 1)
        );
    }

    #[test]
    fn test_ids_differ() {
        let a = Poll::new("a", vec![]).unwrap();
        let b = Poll::new("b", vec![]).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
