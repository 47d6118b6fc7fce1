//! Fake messenger shared by the engine integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, UserMarker},
};

use flipbook_utils::broker::{
    EventBroker, MessageRef, ReactionEvent, ReactionSubscription, SubscribeOptions, TextEvent,
    TextPredicate, TextSubscription,
};
use flipbook_utils::messenger::{Messenger, MessengerError, MessengerResult};
use flipbook_utils::reaction::ReactionFilter;
use flipbook_utils::symbol::Symbol;

/// The bot's own user id in tests.
pub const SELF_ID: u64 = 999;

/// The channel every test session runs in.
pub fn channel() -> Id<ChannelMarker> {
    Id::new(100)
}

/// Let spawned sessions run to their next suspension point.
///
/// Under a paused clock the sleep only fires once every ready task has been
/// polled, so remote calls recorded by the fake are visible afterwards.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

/// One recorded remote operation.
#[derive(Debug, Clone)]
pub enum Call {
    Send {
        message: MessageRef,
        embed: Embed,
    },
    Edit {
        message: MessageRef,
        embed: Embed,
    },
    Delete {
        message: MessageRef,
    },
    React {
        message: MessageRef,
        symbol: Symbol,
    },
    RemoveReaction {
        message: MessageRef,
        symbol: Symbol,
        actor: Id<UserMarker>,
    },
    Clear {
        message: MessageRef,
    },
}

/// In-memory messenger recording every remote operation.
pub struct FakeMessenger {
    broker: EventBroker,
    next_message_id: AtomicU64,
    gone: AtomicBool,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self {
            broker: EventBroker::new(),
            next_message_id: AtomicU64::new(1000),
            gone: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn broker(&self) -> EventBroker {
        self.broker.clone()
    }

    /// Make subsequent sends/edits fail as if the message were deleted.
    pub fn set_gone(&self) {
        self.gone.store(true, Ordering::Relaxed);
    }

    pub fn publish_reaction(&self, target: MessageRef, actor: u64, symbol: &str) {
        self.broker.publish_reaction(ReactionEvent {
            message: target,
            actor: Id::new(actor),
            symbol: Symbol::unicode(symbol),
        });
    }

    pub fn publish_text(&self, author: u64, content: &str, message_id: u64) {
        self.broker.publish_text(TextEvent {
            message: MessageRef {
                channel_id: channel(),
                message_id: Id::new(message_id),
            },
            author: Id::new(author),
            content: content.to_owned(),
        });
    }

    pub fn edits(&self) -> Vec<Embed> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Edit { embed, .. } => Some(embed.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn sends(&self) -> Vec<Embed> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Send { embed, .. } => Some(embed.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<MessageRef> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Delete { message } => Some(*message),
                _ => None,
            })
            .collect()
    }

    pub fn reacted_symbols(&self) -> Vec<Symbol> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::React { symbol, .. } => Some(symbol.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn removals(&self) -> Vec<(Symbol, Id<UserMarker>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::RemoveReaction { symbol, actor, .. } => Some((symbol.clone(), *actor)),
                _ => None,
            })
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, Call::Clear { .. }))
            .count()
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    fn self_actor(&self) -> Id<UserMarker> {
        Id::new(SELF_ID)
    }

    async fn send_renderable(
        &self,
        channel_id: Id<ChannelMarker>,
        embed: &Embed,
    ) -> MessengerResult<MessageRef> {
        let message = MessageRef {
            channel_id,
            message_id: Id::new(self.next_message_id.fetch_add(1, Ordering::Relaxed)),
        };
        self.calls.lock().push(Call::Send {
            message,
            embed: embed.clone(),
        });
        Ok(message)
    }

    async fn edit_renderable(&self, target: MessageRef, embed: &Embed) -> MessengerResult<()> {
        if self.gone.load(Ordering::Relaxed) {
            return Err(MessengerError::Gone);
        }
        self.calls.lock().push(Call::Edit {
            message: target,
            embed: embed.clone(),
        });
        Ok(())
    }

    async fn delete_message(&self, target: MessageRef) -> MessengerResult<()> {
        self.calls.lock().push(Call::Delete { message: target });
        Ok(())
    }

    async fn react_with(&self, target: MessageRef, symbol: &Symbol) -> MessengerResult<()> {
        self.calls.lock().push(Call::React {
            message: target,
            symbol: symbol.clone(),
        });
        Ok(())
    }

    async fn remove_reaction(
        &self,
        target: MessageRef,
        symbol: &Symbol,
        actor: Id<UserMarker>,
    ) -> MessengerResult<()> {
        self.calls.lock().push(Call::RemoveReaction {
            message: target,
            symbol: symbol.clone(),
            actor,
        });
        Ok(())
    }

    async fn clear_reactions(&self, target: MessageRef) -> MessengerResult<()> {
        self.calls.lock().push(Call::Clear { message: target });
        Ok(())
    }

    fn subscribe_reactions(
        &self,
        target: MessageRef,
        filter: ReactionFilter,
        options: SubscribeOptions,
    ) -> ReactionSubscription {
        self.broker.subscribe_reactions(target, filter, options)
    }

    fn await_text_messages(
        &self,
        channel_id: Id<ChannelMarker>,
        predicate: TextPredicate,
        options: SubscribeOptions,
    ) -> TextSubscription {
        self.broker.await_text_messages(channel_id, predicate, options)
    }
}
