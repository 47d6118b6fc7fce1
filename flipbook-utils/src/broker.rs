//! Gateway-fed fan-out of reaction and message events to subscriptions.
//!
//! The broker is the bridge between the shard event loop and the interactive
//! engines: the loop feeds every raw event into [`EventBroker::handle_event`],
//! and engines register filtered, cancellable subscriptions against specific
//! messages or channels. A subscription closes when its delivery limit is
//! reached, when it is stopped or dropped, or when the watched message is
//! deleted, so consumers observe deletion as a normal end of input.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use twilight_model::gateway::event::Event;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, MessageMarker, UserMarker},
};

use crate::reaction::ReactionFilter;
use crate::symbol::Symbol;

/// Handle to a posted (or observed) message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub channel_id: Id<ChannelMarker>,
    pub message_id: Id<MessageMarker>,
}

/// A reaction applied to a watched message.
#[derive(Debug, Clone)]
pub struct ReactionEvent {
    pub message: MessageRef,
    pub actor: Id<UserMarker>,
    pub symbol: Symbol,
}

/// A text message observed in a watched channel.
#[derive(Debug, Clone)]
pub struct TextEvent {
    pub message: MessageRef,
    pub author: Id<UserMarker>,
    pub content: String,
}

/// Predicate deciding whether a text event is delivered to a waiter.
pub type TextPredicate = Arc<dyn Fn(&TextEvent) -> bool + Send + Sync>;

/// Delivery limits for one subscription.
#[derive(Debug, Clone, Copy)]
pub struct SubscribeOptions {
    /// Deliver at most this many matches, then auto-close. `None` delivers
    /// until the subscription is stopped or its source goes away.
    pub max_count: Option<usize>,
    /// Budget applied to each individual wait, not to the whole lifetime.
    pub time_budget: Duration,
}

struct ReactionWaiter {
    id: u64,
    target: Id<MessageMarker>,
    filter: ReactionFilter,
    remaining: Option<usize>,
    tx: mpsc::UnboundedSender<ReactionEvent>,
}

struct TextWaiter {
    id: u64,
    channel: Id<ChannelMarker>,
    predicate: TextPredicate,
    remaining: Option<usize>,
    tx: mpsc::UnboundedSender<TextEvent>,
}

#[derive(Default)]
struct BrokerInner {
    next_id: u64,
    reaction_waiters: Vec<ReactionWaiter>,
    text_waiters: Vec<TextWaiter>,
}

/// Owned, cloneable fan-out registry. Constructed once at startup and handed
/// to the gateway loop and the messenger.
#[derive(Clone, Default)]
pub struct EventBroker {
    inner: Arc<Mutex<BrokerInner>>,
}

impl EventBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw gateway event through the fan-out.
    pub fn handle_event(&self, event: &Event) {
        match event {
            Event::ReactionAdd(added) => self.publish_reaction(ReactionEvent {
                message: MessageRef {
                    channel_id: added.channel_id,
                    message_id: added.message_id,
                },
                actor: added.user_id,
                symbol: Symbol::from_reaction(&added.emoji),
            }),
            Event::MessageCreate(created) => self.publish_text(TextEvent {
                message: MessageRef {
                    channel_id: created.channel_id,
                    message_id: created.id,
                },
                author: created.author.id,
                content: created.content.clone(),
            }),
            Event::MessageDelete(deleted) => self.publish_message_deleted(deleted.id),
            _ => {}
        }
    }

    /// Deliver a reaction event to every matching waiter.
    pub fn publish_reaction(&self, event: ReactionEvent) {
        let mut inner = self.inner.lock();
        inner.reaction_waiters.retain_mut(|waiter| {
            if waiter.target != event.message.message_id {
                return true;
            }
            if !waiter.filter.matches(event.actor, &event.symbol) {
                return true;
            }
            if waiter.tx.send(event.clone()).is_err() {
                return false;
            }
            match waiter.remaining.as_mut() {
                Some(left) => {
                    *left = left.saturating_sub(1);
                    *left > 0
                }
                None => true,
            }
        });
    }

    /// Deliver a text event to every matching waiter.
    pub fn publish_text(&self, event: TextEvent) {
        let mut inner = self.inner.lock();
        inner.text_waiters.retain_mut(|waiter| {
            if waiter.channel != event.message.channel_id {
                return true;
            }
            if !(waiter.predicate)(&event) {
                return true;
            }
            if waiter.tx.send(event.clone()).is_err() {
                return false;
            }
            match waiter.remaining.as_mut() {
                Some(left) => {
                    *left = left.saturating_sub(1);
                    *left > 0
                }
                None => true,
            }
        });
    }

    /// Close every reaction waiter watching a message that no longer exists.
    pub fn publish_message_deleted(&self, message_id: Id<MessageMarker>) {
        let mut inner = self.inner.lock();
        inner
            .reaction_waiters
            .retain(|waiter| waiter.target != message_id);
    }

    /// Register a reaction waiter on one message.
    pub fn subscribe_reactions(
        &self,
        target: MessageRef,
        filter: ReactionFilter,
        options: SubscribeOptions,
    ) -> ReactionSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.reaction_waiters.push(ReactionWaiter {
                id,
                target: target.message_id,
                filter,
                remaining: options.max_count,
                tx,
            });
            id
        };

        ReactionSubscription {
            broker: self.clone(),
            id,
            rx,
            time_budget: options.time_budget,
            closed: false,
            source_closed: false,
        }
    }

    /// Register a text waiter on one channel.
    pub fn await_text_messages(
        &self,
        channel: Id<ChannelMarker>,
        predicate: TextPredicate,
        options: SubscribeOptions,
    ) -> TextSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.text_waiters.push(TextWaiter {
                id,
                channel,
                predicate,
                remaining: options.max_count,
                tx,
            });
            id
        };

        TextSubscription {
            broker: self.clone(),
            id,
            rx,
            time_budget: options.time_budget,
            closed: false,
        }
    }

    fn deregister_reaction(&self, id: u64) {
        let mut inner = self.inner.lock();
        inner.reaction_waiters.retain(|waiter| waiter.id != id);
    }

    fn deregister_text(&self, id: u64) {
        let mut inner = self.inner.lock();
        inner.text_waiters.retain(|waiter| waiter.id != id);
    }
}

/// Live reaction subscription; deregisters on stop and on drop.
pub struct ReactionSubscription {
    broker: EventBroker,
    id: u64,
    rx: mpsc::UnboundedReceiver<ReactionEvent>,
    time_budget: Duration,
    closed: bool,
    source_closed: bool,
}

impl ReactionSubscription {
    /// Wait for the next matching event within the per-wait budget.
    ///
    /// Returns `None` when the budget elapses, when the delivery limit has
    /// been served, or when the watched message went away.
    pub async fn next(&mut self) -> Option<ReactionEvent> {
        if self.closed {
            return None;
        }
        match tokio::time::timeout(self.time_budget, self.rx.recv()).await {
            Ok(Some(event)) => Some(event),
            Ok(None) => {
                self.closed = true;
                self.source_closed = true;
                None
            }
            Err(_elapsed) => None,
        }
    }

    /// Whether the broker side closed this subscription (delivery limit
    /// served, or the watched message was deleted).
    pub fn source_closed(&self) -> bool {
        self.source_closed
    }

    /// Stop receiving and deregister without waiting for another event.
    pub fn stop(&mut self) {
        self.closed = true;
        self.broker.deregister_reaction(self.id);
    }
}

impl Drop for ReactionSubscription {
    fn drop(&mut self) {
        self.broker.deregister_reaction(self.id);
    }
}

/// Live text subscription; deregisters on stop and on drop.
pub struct TextSubscription {
    broker: EventBroker,
    id: u64,
    rx: mpsc::UnboundedReceiver<TextEvent>,
    time_budget: Duration,
    closed: bool,
}

impl TextSubscription {
    /// Wait for the next matching message within the per-wait budget.
    pub async fn next(&mut self) -> Option<TextEvent> {
        if self.closed {
            return None;
        }
        match tokio::time::timeout(self.time_budget, self.rx.recv()).await {
            Ok(Some(event)) => Some(event),
            Ok(None) => {
                self.closed = true;
                None
            }
            Err(_elapsed) => None,
        }
    }

    /// Stop receiving and deregister without waiting for another message.
    pub fn stop(&mut self) {
        self.closed = true;
        self.broker.deregister_text(self.id);
    }
}

impl Drop for TextSubscription {
    fn drop(&mut self) {
        self.broker.deregister_text(self.id);
    }
}
