//! Cancellable single-reaction consumption with paced removal cleanup.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use twilight_model::id::{Id, marker::UserMarker};

use crate::broker::{MessageRef, ReactionEvent, SubscribeOptions};
use crate::messenger::Messenger;
use crate::reaction::filter::{ReactionConstraint, ReactionFilter};
use crate::symbol::Symbol;

/// Steady-state pacing between remote reaction removals in one session.
pub const REMOVAL_PACE: Duration = Duration::from_millis(800);

/// One live consumption session over a single target message.
///
/// Every accepted reaction is scheduled for removal from the remote message
/// through a FIFO queue drained by a single worker, so at most one removal
/// is in flight at a time. A `(symbol, actor)` pair stays in the in-flight
/// set from acceptance until its removal settles, which both absorbs
/// double-clicks and prevents re-processing a reaction whose removal is
/// still queued.
pub struct ConsumptionSession {
    messenger: Arc<dyn Messenger>,
    target: MessageRef,
    constraint: ReactionConstraint,
    cancel: CancellationToken,
    target_gone: AtomicBool,
    inflight: Arc<Mutex<HashSet<String>>>,
    removal_tx: mpsc::UnboundedSender<(Symbol, Id<UserMarker>)>,
    removal_worker: JoinHandle<()>,
}

impl ConsumptionSession {
    /// Open a session with the caller's constraints.
    ///
    /// The bot's own actor identity is always denied in addition to whatever
    /// the caller asked for.
    pub fn new(
        messenger: Arc<dyn Messenger>,
        target: MessageRef,
        mut constraint: ReactionConstraint,
        cancel: CancellationToken,
    ) -> Self {
        constraint
            .deny_users
            .get_or_insert_with(Vec::new)
            .push(messenger.self_actor());

        let inflight = Arc::new(Mutex::new(HashSet::new()));
        let (removal_tx, removal_rx) = mpsc::unbounded_channel();
        let removal_worker = tokio::spawn(run_removal_queue(
            Arc::clone(&messenger),
            target,
            removal_rx,
            Arc::clone(&inflight),
        ));

        Self {
            messenger,
            target,
            constraint,
            cancel,
            target_gone: AtomicBool::new(false),
            inflight,
            removal_tx,
            removal_worker,
        }
    }

    /// Replace the allowed symbol set for subsequent waits.
    ///
    /// Used when a pagination session switches from navigation to the
    /// single-discard endgame.
    pub fn set_allowed_symbols(&mut self, symbols: Vec<Symbol>) {
        self.constraint.allow_emoji = Some(symbols);
    }

    /// Consume at most one matching reaction within `budget`.
    ///
    /// The accepted reaction is queued for removal before this returns.
    /// Yields `None` on budget exhaustion, cancellation, or when the target
    /// message went away; backend failures degrade to `None` as well so
    /// interactive loops wind down instead of crashing.
    pub async fn consume_one(&self, budget: Duration) -> Option<ReactionEvent> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let mut subscription = self.messenger.subscribe_reactions(
            self.target,
            ReactionFilter::new(self.constraint.clone()),
            SubscribeOptions {
                max_count: None,
                time_budget: budget,
            },
        );

        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => return None,
                event = subscription.next() => match event {
                    Some(event) => event,
                    None => {
                        if subscription.source_closed() {
                            self.target_gone.store(true, Ordering::Relaxed);
                        }
                        return None;
                    }
                },
            };

            let key = event.symbol.removal_key(event.actor.get());
            if !self.inflight.lock().insert(key) {
                // removal for this pair is still pending; a double-click
                continue;
            }

            if self
                .removal_tx
                .send((event.symbol.clone(), event.actor))
                .is_err()
            {
                debug!(symbol = %event.symbol, "removal queue is gone");
            }

            return Some(event);
        }
    }

    /// Whether the watched message was observed to be deleted.
    pub fn target_gone(&self) -> bool {
        self.target_gone.load(Ordering::Relaxed)
    }

    /// Stop the session without waiting for another event.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ConsumptionSession {
    fn drop(&mut self) {
        self.removal_worker.abort();
    }
}

/// Drain the removal queue one entry at a time with soft pacing.
async fn run_removal_queue(
    messenger: Arc<dyn Messenger>,
    target: MessageRef,
    mut queue: mpsc::UnboundedReceiver<(Symbol, Id<UserMarker>)>,
    inflight: Arc<Mutex<HashSet<String>>>,
) {
    while let Some((symbol, actor)) = queue.recv().await {
        if let Err(source) = messenger.remove_reaction(target, &symbol, actor).await {
            debug!(?source, %symbol, actor = actor.get(), "reaction removal failed");
        }
        tokio::time::sleep(REMOVAL_PACE).await;
        inflight.lock().remove(&symbol.removal_key(actor.get()));
    }
}
