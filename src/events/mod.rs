//! Event Router
//!
//! Routes host-delivered interaction events to registered handlers.
//! Component handlers are keyed by the component's custom id; reaction
//! handlers all receive every reaction-added event.
//!
//! Every registration returns a [`Registration`] guard. Dropping the guard
//! removes the handler, so a handler lives exactly as long as its owner
//! keeps the guard.

use crate::channels::{ComponentInteraction, PollHost, ReactionAdd};
use crate::polls::PollResult;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Handler for select-menu responses
#[async_trait]
pub trait ComponentHandler: Send + Sync {
    async fn handle_component(&self, interaction: &ComponentInteraction) -> PollResult<()>;
}

/// Handler for reaction-added events
#[async_trait]
pub trait ReactionHandler: Send + Sync {
    async fn handle_reaction(&self, reaction: &ReactionAdd) -> PollResult<()>;
}

#[derive(Default)]
struct RouterInner {
    /// custom id -> (registration token, handler)
    components: RwLock<HashMap<String, (u64, Arc<dyn ComponentHandler>)>>,
    /// registration token -> handler
    reactions: RwLock<HashMap<u64, Arc<dyn ReactionHandler>>>,
    next_token: AtomicU64,
}

impl RouterInner {
    fn token(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::Relaxed)
    }
}

/// Event router shared between the bot process and its polls
#[derive(Clone, Default)]
pub struct EventRouter {
    inner: Arc<RouterInner>,
}

impl EventRouter {
    /// Create an empty router
    pub fn new() -> Self {
        Self::default()
    }

    /// Route component events with this custom id to `handler`.
    ///
    /// A later registration for the same custom id replaces the earlier one.
    pub fn register_component(
        &self,
        custom_id: impl Into<String>,
        handler: Arc<dyn ComponentHandler>,
    ) -> Registration {
        let custom_id = custom_id.into();
        let token = self.inner.token();
        let previous = self
            .inner
            .components
            .write()
            .insert(custom_id.clone(), (token, handler));
        if previous.is_some() {
            warn!(custom_id = %custom_id, "component handler replaced");
        }

        Registration {
            router: Arc::downgrade(&self.inner),
            kind: RegistrationKind::Component { custom_id, token },
        }
    }

    /// Deliver every reaction-added event to `handler`
    pub fn register_reaction(&self, handler: Arc<dyn ReactionHandler>) -> Registration {
        let token = self.inner.token();
        self.inner.reactions.write().insert(token, handler);

        Registration {
            router: Arc::downgrade(&self.inner),
            kind: RegistrationKind::Reaction { token },
        }
    }

    /// Dispatch a component event. Returns `false` when nothing is
    /// registered for its custom id.
    pub async fn dispatch_component(&self, interaction: &ComponentInteraction) -> PollResult<bool> {
        let handler = self
            .inner
            .components
            .read()
            .get(&interaction.custom_id)
            .map(|(_, handler)| Arc::clone(handler));

        match handler {
            Some(handler) => {
                handler.handle_component(interaction).await?;
                Ok(true)
            }
            None => {
                debug!(custom_id = %interaction.custom_id, "no component handler registered");
                Ok(false)
            }
        }
    }

    /// Dispatch a component event, answering it through `host` when
    /// nothing is registered for its custom id. Menus left on closed or
    /// discarded polls then still get a reply.
    pub async fn dispatch_component_or_ack(
        &self,
        interaction: &ComponentInteraction,
        host: &dyn PollHost,
    ) -> PollResult<bool> {
        let routed = self.dispatch_component(interaction).await?;
        if !routed {
            host.acknowledge_component(&interaction.context).await?;
        }
        Ok(routed)
    }

    /// Dispatch a reaction-added event to every reaction handler.
    ///
    /// All handlers run; the first error is returned afterwards.
    pub async fn dispatch_reaction_add(&self, reaction: &ReactionAdd) -> PollResult<()> {
        let handlers: Vec<Arc<dyn ReactionHandler>> =
            self.inner.reactions.read().values().cloned().collect();

        let mut first_error = None;
        for handler in handlers {
            if let Err(e) = handler.handle_reaction(reaction).await {
                if first_error.is_none() {
                    first_error = Some(e);
                } else {
                    warn!(error = %e, "reaction handler failed");
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Number of registered component handlers
    pub fn component_count(&self) -> usize {
        self.inner.components.read().len()
    }

    /// Number of registered reaction handlers
    pub fn reaction_count(&self) -> usize {
        self.inner.reactions.read().len()
    }
}

enum RegistrationKind {
    Component { custom_id: String, token: u64 },
    Reaction { token: u64 },
}

/// Handler registration; dropping it deregisters the handler
pub struct Registration {
    router: Weak<RouterInner>,
    kind: RegistrationKind,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            RegistrationKind::Component { custom_id, token } => f
                .debug_struct("Registration")
                .field("custom_id", custom_id)
                .field("token", token)
                .finish(),
            RegistrationKind::Reaction { token } => f
                .debug_struct("Registration")
                .field("reaction", token)
                .finish(),
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let Some(router) = self.router.upgrade() else {
            return;
        };
        match &self.kind {
            RegistrationKind::Component { custom_id, token } => {
                let mut components = router.components.write();
                // Only remove our own entry, not a replacement
                if components.get(custom_id).map(|(t, _)| t) == Some(token) {
                    components.remove(custom_id);
                }
            }
            RegistrationKind::Reaction { token } => {
                router.reactions.write().remove(token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{
        ChannelId, Emoji, HostCall, InteractionContext, MemoryHost, MessageId, UserId,
    };
    use crate::polls::PollError;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Counter {
        hits: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ComponentHandler for Counter {
        async fn handle_component(&self, _: &ComponentInteraction) -> PollResult<()> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PollError::NoSelection);
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ReactionHandler for Counter {
        async fn handle_reaction(&self, _: &ReactionAdd) -> PollResult<()> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PollError::Closed);
            }
            Ok(())
        }
    }

    fn component(custom_id: &str) -> ComponentInteraction {
        ComponentInteraction {
            context: InteractionContext {
                interaction_id: "1".to_string(),
                token: "t".to_string(),
                channel_id: ChannelId(1),
                user_id: UserId(1),
            },
            custom_id: custom_id.to_string(),
            values: vec![],
        }
    }

    fn reaction() -> ReactionAdd {
        ReactionAdd {
            user_id: UserId(1),
            channel_id: ChannelId(1),
            message_id: MessageId(1),
            emoji: Emoji::unicode("🔴"),
        }
    }

    #[tokio::test]
    async fn test_component_routing_and_deregistration() {
        let router = EventRouter::new();
        let handler = Arc::new(Counter::default());
        let registration = router.register_component("polls_a", handler.clone());

        assert!(router.dispatch_component(&component("polls_a")).await.unwrap());
        assert!(!router.dispatch_component(&component("polls_b")).await.unwrap());
        assert_eq!(handler.hits.load(Ordering::SeqCst), 1);

        drop(registration);
        assert_eq!(router.component_count(), 0);
        assert!(!router.dispatch_component(&component("polls_a")).await.unwrap());
    }

    #[tokio::test]
    async fn test_unrouted_component_is_acknowledged() {
        let router = EventRouter::new();
        let host = MemoryHost::new();
        let handler = Arc::new(Counter::default());
        let _r = router.register_component("polls_a", handler.clone());

        assert!(router
            .dispatch_component_or_ack(&component("polls_a"), &host)
            .await
            .unwrap());
        assert!(host.calls().is_empty());

        assert!(!router
            .dispatch_component_or_ack(&component("polls_b"), &host)
            .await
            .unwrap());
        assert_eq!(
            host.calls(),
            vec![HostCall::Acknowledge {
                interaction_id: "1".to_string()
            }]
        );
        assert_eq!(handler.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_replaced_component_survives_old_guard() {
        let router = EventRouter::new();
        let old = router.register_component("polls_a", Arc::new(Counter::default()));
        let newer = Arc::new(Counter::default());
        let _new = router.register_component("polls_a", newer.clone());

        drop(old);
        assert!(router.dispatch_component(&component("polls_a")).await.unwrap());
        assert_eq!(newer.hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_component_error_propagates() {
        let router = EventRouter::new();
        let _r = router.register_component(
            "polls_a",
            Arc::new(Counter {
                fail: true,
                ..Counter::default()
            }),
        );
        let result = router.dispatch_component(&component("polls_a")).await;
        assert!(matches!(result, Err(PollError::NoSelection)));
    }

    #[tokio::test]
    async fn test_reaction_fan_out_runs_all_handlers() {
        let router = EventRouter::new();
        let failing = Arc::new(Counter {
            fail: true,
            ..Counter::default()
        });
        let ok = Arc::new(Counter::default());
        let _a = router.register_reaction(failing.clone());
        let _b = router.register_reaction(ok.clone());

        let result = router.dispatch_reaction_add(&reaction()).await;
        assert!(matches!(result, Err(PollError::Closed)));
        assert_eq!(failing.hits.load(Ordering::SeqCst), 1);
        assert_eq!(ok.hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_outliving_router() {
        let router = EventRouter::new();
        let registration = router.register_reaction(Arc::new(Counter::default()));
        assert_eq!(router.reaction_count(), 1);
        drop(router);
        drop(registration);
    }
}
