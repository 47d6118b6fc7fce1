//! Messaging contract between interactive engines and the chat backend.
//!
//! Engines only ever talk to [`Messenger`], never to the HTTP client
//! directly, so tests can drive them with a fake backend and the production
//! wiring stays in one place.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, UserMarker},
};

use crate::broker::{
    EventBroker, MessageRef, ReactionSubscription, SubscribeOptions, TextPredicate,
    TextSubscription,
};
use crate::reaction::ReactionFilter;
use crate::symbol::Symbol;

/// Error from a remote messaging operation.
///
/// `Gone` is a normal terminal condition for interactive sessions; anything
/// else is transient from the engines' perspective.
#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    #[error("target message no longer exists")]
    Gone,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type MessengerResult<T> = Result<T, MessengerError>;

/// Narrow messaging surface consumed by the engines.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// The bot's own user id; always denied as a reaction actor.
    fn self_actor(&self) -> Id<UserMarker>;

    /// Post an embed to a channel, returning a handle to the new message.
    async fn send_renderable(
        &self,
        channel_id: Id<ChannelMarker>,
        embed: &Embed,
    ) -> MessengerResult<MessageRef>;

    /// Replace a message's embed in place.
    async fn edit_renderable(&self, target: MessageRef, embed: &Embed) -> MessengerResult<()>;

    /// Delete a message. Deleting an already-gone message is a no-op.
    async fn delete_message(&self, target: MessageRef) -> MessengerResult<()>;

    /// Attach a reaction as the bot. Best-effort.
    async fn react_with(&self, target: MessageRef, symbol: &Symbol) -> MessengerResult<()>;

    /// Remove one actor's reaction. Best-effort.
    async fn remove_reaction(
        &self,
        target: MessageRef,
        symbol: &Symbol,
        actor: Id<UserMarker>,
    ) -> MessengerResult<()>;

    /// Remove every reaction on a message. Best-effort.
    async fn clear_reactions(&self, target: MessageRef) -> MessengerResult<()>;

    /// Subscribe to filtered reaction-add events on a message.
    fn subscribe_reactions(
        &self,
        target: MessageRef,
        filter: ReactionFilter,
        options: SubscribeOptions,
    ) -> ReactionSubscription;

    /// Subscribe to predicate-matching text messages in a channel.
    fn await_text_messages(
        &self,
        channel_id: Id<ChannelMarker>,
        predicate: TextPredicate,
        options: SubscribeOptions,
    ) -> TextSubscription;
}

/// Production messenger backed by the twilight HTTP client and the broker.
pub struct TwilightMessenger {
    http: Arc<Client>,
    broker: EventBroker,
    self_id: Id<UserMarker>,
}

impl TwilightMessenger {
    pub fn new(http: Arc<Client>, broker: EventBroker, self_id: Id<UserMarker>) -> Self {
        Self {
            http,
            broker,
            self_id,
        }
    }
}

/// Classify an HTTP failure, separating unknown-message responses.
fn classify(source: twilight_http::Error) -> MessengerError {
    if let twilight_http::error::ErrorType::Response { status, .. } = source.kind()
        && status.get() == 404
    {
        return MessengerError::Gone;
    }
    MessengerError::Other(anyhow::Error::new(source))
}

#[async_trait]
impl Messenger for TwilightMessenger {
    fn self_actor(&self) -> Id<UserMarker> {
        self.self_id
    }

    async fn send_renderable(
        &self,
        channel_id: Id<ChannelMarker>,
        embed: &Embed,
    ) -> MessengerResult<MessageRef> {
        let created = self
            .http
            .create_message(channel_id)
            .embeds(std::slice::from_ref(embed))
            .await
            .map_err(classify)?
            .model()
            .await
            .map_err(|source| MessengerError::Other(anyhow::Error::new(source)))?;

        Ok(MessageRef {
            channel_id: created.channel_id,
            message_id: created.id,
        })
    }

    async fn edit_renderable(&self, target: MessageRef, embed: &Embed) -> MessengerResult<()> {
        self.http
            .update_message(target.channel_id, target.message_id)
            .embeds(Some(std::slice::from_ref(embed)))
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn delete_message(&self, target: MessageRef) -> MessengerResult<()> {
        match self
            .http
            .delete_message(target.channel_id, target.message_id)
            .await
        {
            Ok(_) => Ok(()),
            Err(source) => match classify(source) {
                MessengerError::Gone => Ok(()),
                other => Err(other),
            },
        }
    }

    async fn react_with(&self, target: MessageRef, symbol: &Symbol) -> MessengerResult<()> {
        self.http
            .create_reaction(target.channel_id, target.message_id, &symbol.request_type())
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn remove_reaction(
        &self,
        target: MessageRef,
        symbol: &Symbol,
        actor: Id<UserMarker>,
    ) -> MessengerResult<()> {
        self.http
            .delete_reaction(
                target.channel_id,
                target.message_id,
                &symbol.request_type(),
                actor,
            )
            .await
            .map_err(classify)?;

        Ok(())
    }

    async fn clear_reactions(&self, target: MessageRef) -> MessengerResult<()> {
        self.http
            .delete_all_reactions(target.channel_id, target.message_id)
            .await
            .map_err(classify)?;

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
