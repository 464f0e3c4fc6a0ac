//! End-to-end poll flow through the event router
//!
//! Drives show -> votes -> close the way a bot process would: every event
//! enters through `EventRouter`, and the in-memory host records what the
//! platform would have received.

use interaction_polls::channels::{
    ChannelId, ComponentInteraction, Emoji, HostCall, InteractionContext, MemoryHost, MessageId,
    ReactionAdd, UserId,
};
use interaction_polls::events::EventRouter;
use interaction_polls::polls::{option_id, LivePoll, Poll, PollError, PollSettings, PollStatus};
use std::sync::Arc;

const CHANNEL: ChannelId = ChannelId(500);
const OWNER: UserId = UserId(42);

fn ctx(user: UserId) -> InteractionContext {
    InteractionContext {
        interaction_id: format!("i-{}", user),
        token: "tok".to_string(),
        channel_id: CHANNEL,
        user_id: user,
    }
}

fn vote(poll: &LivePoll, user: u64, index: usize) -> ComponentInteraction {
    ComponentInteraction {
        context: ctx(UserId(user)),
        custom_id: option_id::menu_id(poll.id()),
        values: vec![option_id::encode(poll.id(), index)],
    }
}

fn react(message_id: MessageId, user: UserId, emoji: &str) -> ReactionAdd {
    ReactionAdd {
        user_id: user,
        channel_id: CHANNEL,
        message_id,
        emoji: Emoji::unicode(emoji),
    }
}

async fn show(router: &EventRouter, host: &Arc<MemoryHost>, title: &str) -> Arc<LivePoll> {
    Poll::new(title, vec!["A".to_string(), "B".to_string()])
        .unwrap()
        .with_owner(OWNER)
        .show(&ctx(OWNER), host.clone(), router)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_full_flow_through_router() {
    let router = EventRouter::new();
    let host = Arc::new(MemoryHost::new());
    let poll = show(&router, &host, "Best letter?").await;
    let message_id = poll.message().await.id;

    for (user, index) in [(1, 0), (2, 0), (3, 1)] {
        assert!(router.dispatch_component(&vote(&poll, user, index)).await.unwrap());
    }

    let stored = host.message(message_id).unwrap();
    let fields = &stored.embeds[0].fields;
    assert_eq!(fields[0].name, "1️⃣ A");
    assert_eq!(fields[0].value, "███████ **67%** (2)");
    assert_eq!(fields[1].name, "2️⃣ B");
    assert_eq!(fields[1].value, "███ **33%** (1)");

    // A stranger's close reaction changes nothing
    router
        .dispatch_reaction_add(&react(message_id, UserId(3), "🔴"))
        .await
        .unwrap();
    assert_eq!(poll.status().await, PollStatus::Open);

    let edits_before = host.edit_count();
    router
        .dispatch_reaction_add(&react(message_id, OWNER, "🔴"))
        .await
        .unwrap();
    assert_eq!(poll.status().await, PollStatus::Closed);
    assert_eq!(host.edit_count(), edits_before + 1);

    let stored = host.message(message_id).unwrap();
    assert!(stored.select_menu.is_none());
    assert_eq!(stored.embeds[0].footer.as_ref().unwrap().text, "Poll closed.");
    assert_eq!(stored.embeds[0].fields[0].value, "███████ **67%** (2)");
    assert!(host.calls().contains(&HostCall::RemoveReaction {
        message_id,
        emoji: "🔴".to_string(),
        user_id: OWNER,
    }));

    // Late votes from a stale menu are no longer routed, only answered
    assert!(!router.dispatch_component(&vote(&poll, 4, 1)).await.unwrap());
    assert!(!router
        .dispatch_component_or_ack(&vote(&poll, 5, 1), host.as_ref())
        .await
        .unwrap());
    assert!(host.calls().contains(&HostCall::Acknowledge {
        interaction_id: "i-5".to_string()
    }));
    assert_eq!(poll.tally().await.counts, vec![2, 1]);
    assert_eq!(router.component_count(), 0);
    assert_eq!(router.reaction_count(), 0);
}

#[tokio::test]
async fn test_polls_are_routed_independently() {
    let router = EventRouter::new();
    let host = Arc::new(MemoryHost::new());
    let first = show(&router, &host, "first").await;
    let second = show(&router, &host, "second").await;
    assert_ne!(first.id(), second.id());

    router.dispatch_component(&vote(&first, 1, 1)).await.unwrap();
    router.dispatch_component(&vote(&second, 1, 0)).await.unwrap();
    router.dispatch_component(&vote(&second, 2, 0)).await.unwrap();

    assert_eq!(first.tally().await.counts, vec![0, 1]);
    assert_eq!(second.tally().await.counts, vec![2, 0]);

    // Closing one leaves the other routed
    let first_message = first.message().await.id;
    router
        .dispatch_reaction_add(&react(first_message, OWNER, "🔴"))
        .await
        .unwrap();
    assert_eq!(first.status().await, PollStatus::Closed);
    assert_eq!(second.status().await, PollStatus::Open);
    assert_eq!(router.component_count(), 1);
    assert!(router.dispatch_component(&vote(&second, 3, 1)).await.unwrap());
}

#[tokio::test]
async fn test_vote_on_closed_poll_is_rejected() {
    let router = EventRouter::new();
    let host = Arc::new(MemoryHost::new());
    let poll = show(&router, &host, "t").await;
    let message_id = poll.message().await.id;
    router
        .dispatch_reaction_add(&react(message_id, OWNER, "🔴"))
        .await
        .unwrap();

    // Driving the poll directly, bypassing the router
    let result = poll.handle_select(&vote(&poll, 9, 0)).await;
    assert!(matches!(result, Err(PollError::Closed)));
}

#[tokio::test]
async fn test_custom_settings_change_glyphs() {
    let settings = Arc::new(
        PollSettings::from_json5(
            r##"{ numberEmojis: ["🅰️", "🅱️"], closeEmoji: "🛑", barGlyph: "#", barWidth: 4 }"##,
        )
        .unwrap(),
    );
    let router = EventRouter::new();
    let host = Arc::new(MemoryHost::new());
    let poll = Poll::with_settings("t", vec!["x".into(), "y".into()], settings)
        .unwrap()
        .with_owner(OWNER)
        .show(&ctx(OWNER), host.clone(), &router)
        .await
        .unwrap();
    let message_id = poll.message().await.id;

    router.dispatch_component(&vote(&poll, 1, 1)).await.unwrap();
    let stored = host.message(message_id).unwrap();
    assert_eq!(stored.embeds[0].fields[1].name, "🅱️ y");
    assert_eq!(stored.embeds[0].fields[1].value, "#### **100%** (1)");

    // Default close emoji does nothing under these settings
    router
        .dispatch_reaction_add(&react(message_id, OWNER, "🔴"))
        .await
        .unwrap();
    assert_eq!(poll.status().await, PollStatus::Open);
    router
        .dispatch_reaction_add(&react(message_id, OWNER, "🛑"))
        .await
        .unwrap();
    assert_eq!(poll.status().await, PollStatus::Closed);
}
