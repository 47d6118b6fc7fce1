//! Delete-on-reaction cleanup guard for finished interactive messages.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use twilight_model::id::{Id, marker::UserMarker};

use crate::broker::{MessageRef, SubscribeOptions};
use crate::messenger::Messenger;
use crate::reaction::{ReactionConstraint, ReactionFilter};
use crate::symbol::{CANCEL_SYMBOL, DISCARD_SYMBOL, Symbol};

/// How long the guard waits for a qualifying delete reaction.
pub const TRASH_TIMEOUT: Duration = Duration::from_secs(300);

/// The symbols accepted as a delete request.
pub fn delete_symbols() -> Vec<Symbol> {
    vec![
        Symbol::unicode(DISCARD_SYMBOL),
        Symbol::unicode(CANCEL_SYMBOL),
    ]
}

/// Watch a message and delete it when a qualifying delete reaction arrives.
///
/// With `allowed_deleters` set, only those actors qualify; otherwise anyone
/// does. Fire-and-forget: every failure is logged and swallowed, and racing
/// a message that is already gone is a silent no-op.
pub async fn guard_trashable(
    messenger: Arc<dyn Messenger>,
    target: MessageRef,
    allowed_deleters: Option<Vec<Id<UserMarker>>>,
) {
    if let Err(source) = messenger
        .react_with(target, &Symbol::unicode(DISCARD_SYMBOL))
        .await
    {
        debug!(?source, "failed to attach the delete affordance");
    }

    let filter = ReactionFilter::new(ReactionConstraint {
        allow_users: allowed_deleters,
        deny_users: Some(vec![messenger.self_actor()]),
        allow_emoji: Some(delete_symbols()),
        deny_emoji: None,
    });

    let mut subscription = messenger.subscribe_reactions(
        target,
        filter,
        SubscribeOptions {
            max_count: Some(1),
            time_budget: TRASH_TIMEOUT,
        },
    );

    if subscription.next().await.is_none() {
        return;
    }

    if let Err(source) = messenger.delete_message(target).await {
        warn!(?source, "failed to delete trashable message");
    }
}
