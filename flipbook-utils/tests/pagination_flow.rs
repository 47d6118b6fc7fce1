//! End-to-end pagination sessions driven through the fake messenger.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use twilight_model::channel::message::embed::Embed;

use common::{FakeMessenger, SELF_ID, channel, settle};
use flipbook_utils::embed::{PageSet, build_page_embed};
use flipbook_utils::messenger::Messenger;
use flipbook_utils::pagination::{
    NavAction, PaginatorOptions, SessionTarget, open_paginator,
};
use flipbook_utils::symbol::{BACK_SYMBOL, DISCARD_SYMBOL, FORWARD_SYMBOL};

const USER: u64 = 7;
const BUDGET: Duration = Duration::from_secs(30);

fn pages(count: usize) -> PageSet {
    let rendered = (0..count)
        .map(|index| build_page_embed("Title", format!("page-{index}")).expect("embed builds"))
        .collect();
    PageSet::Rendered(rendered)
}

fn options() -> PaginatorOptions {
    PaginatorOptions {
        time_budget: BUDGET,
        ..PaginatorOptions::default()
    }
}

fn description(embed: &Embed) -> &str {
    embed.description.as_deref().unwrap_or_default()
}

fn footer(embed: &Embed) -> Option<&str> {
    embed.footer.as_ref().map(|footer| footer.text.as_str())
}

/// Clicks by one user must sit outside the removal dedupe window.
async fn pace() {
    sleep(Duration::from_secs(1)).await;
}

#[tokio::test(start_paused = true)]
async fn forward_twice_lands_on_the_third_page() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let handle = open_paginator(messenger, SessionTarget::Channel(channel()), pages(3), options())
        .await
        .expect("paginator opens");
    settle().await;

    let sends = fake.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(description(&sends[0]), "page-0");
    assert_eq!(footer(&sends[0]), Some("Page 1/3"));

    fake.publish_reaction(handle.message, USER, FORWARD_SYMBOL);
    pace().await;
    fake.publish_reaction(handle.message, USER, FORWARD_SYMBOL);
    pace().await;

    let edits = fake.edits();
    assert_eq!(edits.len(), 2, "exactly two edits besides the initial send");
    assert_eq!(description(&edits[0]), "page-1");
    assert_eq!(description(&edits[1]), "page-2");
    assert_eq!(footer(&edits[1]), Some("Page 3/3"));

    // Let the budget elapse: the loop ends on the page it was showing and
    // strips the transient footer with one final edit.
    sleep(BUDGET + Duration::from_secs(5)).await;
    let terminal = handle.terminal.await.expect("terminal task joins");
    assert_eq!(terminal, Some(2));

    let edits = fake.edits();
    assert_eq!(edits.len(), 3);
    assert_eq!(description(&edits[2]), "page-2");
    assert_eq!(footer(&edits[2]), None);
}

#[tokio::test(start_paused = true)]
async fn navigation_wraps_at_both_ends() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let handle = open_paginator(messenger, SessionTarget::Channel(channel()), pages(3), options())
        .await
        .expect("paginator opens");
    settle().await;

    // backward from the first page wraps to the last
    fake.publish_reaction(handle.message, USER, BACK_SYMBOL);
    pace().await;
    let edits = fake.edits();
    assert_eq!(description(&edits[0]), "page-2");

    // forward from the last page wraps to the first
    fake.publish_reaction(handle.message, USER, FORWARD_SYMBOL);
    pace().await;
    let edits = fake.edits();
    assert_eq!(description(&edits[1]), "page-0");

    sleep(BUDGET + Duration::from_secs(5)).await;
    assert_eq!(handle.terminal.await.expect("terminal task joins"), Some(0));
}

#[tokio::test(start_paused = true)]
async fn affordances_attach_in_order_and_self_reactions_are_ignored() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let handle = open_paginator(
        messenger,
        SessionTarget::Channel(channel()),
        pages(3),
        PaginatorOptions {
            nav: vec![NavAction::Back, NavAction::Forward, NavAction::Reroll],
            ..options()
        },
    )
    .await
    .expect("paginator opens");
    settle().await;

    let attached: Vec<Option<String>> = fake
        .reacted_symbols()
        .iter()
        .map(|symbol| symbol.name().map(ToOwned::to_owned))
        .collect();
    assert_eq!(
        attached,
        vec![
            Some(BACK_SYMBOL.to_owned()),
            Some(FORWARD_SYMBOL.to_owned()),
            Some("🎲".to_owned()),
        ]
    );

    // the bot's own reaction must never navigate
    fake.publish_reaction(handle.message, SELF_ID, FORWARD_SYMBOL);
    settle().await;
    assert!(fake.edits().is_empty());

    sleep(BUDGET + Duration::from_secs(5)).await;
    assert_eq!(handle.terminal.await.expect("terminal task joins"), Some(0));
}

#[tokio::test(start_paused = true)]
async fn accepted_reactions_are_queued_for_removal_once() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let handle = open_paginator(messenger, SessionTarget::Channel(channel()), pages(3), options())
        .await
        .expect("paginator opens");
    settle().await;

    // a double-click: the same pair twice, well inside the dedupe window
    fake.publish_reaction(handle.message, USER, FORWARD_SYMBOL);
    settle().await;
    fake.publish_reaction(handle.message, USER, FORWARD_SYMBOL);
    settle().await;

    let removals = fake.removals();
    assert_eq!(removals.len(), 1, "duplicate click must not enqueue twice");
    assert_eq!(removals[0].1.get(), USER);
    assert_eq!(fake.edits().len(), 1);

    sleep(BUDGET + Duration::from_secs(5)).await;
    assert_eq!(handle.terminal.await.expect("terminal task joins"), Some(1));
}

#[tokio::test(start_paused = true)]
async fn timeout_with_no_input_strips_the_footer_once() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let handle = open_paginator(messenger, SessionTarget::Channel(channel()), pages(3), options())
        .await
        .expect("paginator opens");
    settle().await;

    sleep(BUDGET + Duration::from_secs(5)).await;
    let terminal = handle.terminal.await.expect("terminal task joins");
    assert_eq!(terminal, Some(0));

    let edits = fake.edits();
    assert_eq!(edits.len(), 1, "exactly one cleanup edit");
    assert_eq!(footer(&edits[0]), None);
}

#[tokio::test(start_paused = true)]
async fn deleted_message_ends_the_session_without_edits() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let handle = open_paginator(messenger, SessionTarget::Channel(channel()), pages(3), options())
        .await
        .expect("paginator opens");
    settle().await;

    fake.set_gone();
    fake.broker().publish_message_deleted(handle.message.message_id);
    settle().await;

    let terminal = handle.terminal.await.expect("terminal task joins");
    assert_eq!(terminal, None);
    assert!(fake.edits().is_empty(), "no edits after the message is gone");
}

#[tokio::test(start_paused = true)]
async fn abort_stops_the_loop_without_further_writes() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let opts = options();
    let abort = opts.abort.clone();
    let handle = open_paginator(messenger, SessionTarget::Channel(channel()), pages(3), opts)
        .await
        .expect("paginator opens");
    settle().await;

    abort.cancel();
    settle().await;

    let terminal = handle.terminal.await.expect("terminal task joins");
    assert_eq!(terminal, None);
    assert!(fake.edits().is_empty());
}

#[tokio::test(start_paused = true)]
async fn consume_on_advance_shrinks_the_pool_to_a_discard_endgame() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let handle = open_paginator(
        messenger,
        SessionTarget::Channel(channel()),
        pages(3),
        PaginatorOptions {
            consume_on_advance: true,
            ..options()
        },
    )
    .await
    .expect("paginator opens");
    settle().await;

    // leaving page-0 removes it; two pages remain
    fake.publish_reaction(handle.message, USER, FORWARD_SYMBOL);
    pace().await;
    let edits = fake.edits();
    assert_eq!(description(&edits[0]), "page-1");
    assert_eq!(footer(&edits[0]), Some("Page 1/2"));

    // leaving page-1 removes it too; the lone survivor flips to discard mode
    fake.publish_reaction(handle.message, USER, FORWARD_SYMBOL);
    pace().await;
    let edits = fake.edits();
    assert_eq!(description(&edits[1]), "page-2");
    assert_eq!(footer(&edits[1]), None);
    assert_eq!(fake.clear_count(), 1);
    let attached = fake.reacted_symbols();
    assert_eq!(
        attached.last().and_then(|symbol| symbol.name()).map(ToOwned::to_owned),
        Some(DISCARD_SYMBOL.to_owned())
    );

    // consumed pages never come back
    for edit in &edits[1..] {
        assert_ne!(description(edit), "page-0");
    }

    // discarding the last page ends the loop
    fake.publish_reaction(handle.message, USER, DISCARD_SYMBOL);
    settle().await;
    let terminal = handle.terminal.await.expect("terminal task joins");
    assert_eq!(terminal, Some(0));
}

#[tokio::test(start_paused = true)]
async fn configuration_errors_fail_before_any_remote_call() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let empty = open_paginator(
        Arc::clone(&messenger),
        SessionTarget::Channel(channel()),
        PageSet::Rendered(Vec::new()),
        options(),
    )
    .await;
    assert!(empty.is_err());

    let out_of_range = open_paginator(
        Arc::clone(&messenger),
        SessionTarget::Channel(channel()),
        pages(2),
        PaginatorOptions {
            start_page: 5,
            ..options()
        },
    )
    .await;
    assert!(out_of_range.is_err());

    let no_nav = open_paginator(
        Arc::clone(&messenger),
        SessionTarget::Channel(channel()),
        pages(2),
        PaginatorOptions {
            nav: Vec::new(),
            ..options()
        },
    )
    .await;
    assert!(no_nav.is_err());

    let duplicate_nav = open_paginator(
        messenger,
        SessionTarget::Channel(channel()),
        pages(2),
        PaginatorOptions {
            nav: vec![NavAction::Forward, NavAction::Forward],
            ..options()
        },
    )
    .await;
    assert!(duplicate_nav.is_err());

    assert!(fake.calls.lock().is_empty(), "nothing was sent remotely");
}

#[tokio::test(start_paused = true)]
async fn an_existing_message_is_rerendered_in_place() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    // a message the caller already owns
    let existing = fake
        .send_renderable(
            channel(),
            &build_page_embed("Title", "placeholder").expect("embed builds"),
        )
        .await
        .expect("send succeeds");

    let handle = open_paginator(
        messenger,
        SessionTarget::Existing(existing),
        pages(3),
        options(),
    )
    .await
    .expect("paginator opens");
    assert_eq!(handle.message, existing);
    settle().await;

    // the initial render is an edit, not a fresh send
    assert_eq!(fake.sends().len(), 1);
    let edits = fake.edits();
    assert_eq!(edits.len(), 1);
    assert_eq!(description(&edits[0]), "page-0");
    assert_eq!(footer(&edits[0]), Some("Page 1/3"));

    fake.publish_reaction(existing, USER, FORWARD_SYMBOL);
    pace().await;
    assert_eq!(description(&fake.edits()[1]), "page-1");

    sleep(BUDGET + Duration::from_secs(5)).await;
    assert_eq!(handle.terminal.await.expect("terminal task joins"), Some(1));
}

#[tokio::test(start_paused = true)]
async fn single_page_sessions_resolve_without_affordances() {
    let fake = Arc::new(FakeMessenger::new());
    let messenger: Arc<dyn Messenger> = fake.clone();

    let handle = open_paginator(messenger, SessionTarget::Channel(channel()), pages(1), options())
        .await
        .expect("paginator opens");

    let terminal = handle.terminal.await.expect("terminal task joins");
    assert_eq!(terminal, Some(0));

    let sends = fake.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(footer(&sends[0]), None);
    assert!(fake.reacted_symbols().is_empty());
}
