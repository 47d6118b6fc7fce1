//! Reaction-driven pagination sessions.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{Id, marker::ChannelMarker};

use crate::broker::MessageRef;
use crate::embed::{PageSet, with_page_footer};
use crate::messenger::{Messenger, MessengerError};
use crate::reaction::{ConsumptionSession, ReactionConstraint, SerialReactionMonitor};
use crate::symbol::{BACK_SYMBOL, DISCARD_SYMBOL, FORWARD_SYMBOL, REROLL_SYMBOL, Symbol};

use super::DEFAULT_TIMEOUT_SECS;
use super::page::{index_after_removal, wrap_backward, wrap_forward};

/// Navigation affordances, attached to the message in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Back,
    Forward,
    Reroll,
}

impl NavAction {
    /// The reaction symbol representing this affordance.
    pub fn symbol(self) -> Symbol {
        match self {
            Self::Back => Symbol::unicode(BACK_SYMBOL),
            Self::Forward => Symbol::unicode(FORWARD_SYMBOL),
            Self::Reroll => Symbol::unicode(REROLL_SYMBOL),
        }
    }

    fn from_symbol(symbol: &Symbol) -> Option<Self> {
        [Self::Back, Self::Forward, Self::Reroll]
            .into_iter()
            .find(|action| action.symbol().matches(symbol))
    }
}

/// Where the initial render goes.
#[derive(Debug, Clone, Copy)]
pub enum SessionTarget {
    /// Post a fresh message into this channel.
    Channel(Id<ChannelMarker>),
    /// Re-render a message the caller already owns.
    Existing(MessageRef),
}

/// Tunables for one pagination session.
#[derive(Clone)]
pub struct PaginatorOptions {
    /// Affordances to attach, in order. Must be non-empty and free of
    /// duplicates.
    pub nav: Vec<NavAction>,
    /// 0-based starting page.
    pub start_page: usize,
    /// Remove each page from the pool once it is navigated away from.
    pub consume_on_advance: bool,
    /// Budget for each individual wait, not for the whole session.
    pub time_budget: Duration,
    /// Shared abort flag; checked before every wait and every remote write.
    pub abort: CancellationToken,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        Self {
            nav: vec![NavAction::Back, NavAction::Forward],
            start_page: 0,
            consume_on_advance: false,
            time_budget: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            abort: CancellationToken::new(),
        }
    }
}

/// A live pagination session.
pub struct PaginatorHandle {
    /// The rendered message driving the session.
    pub message: MessageRef,
    /// Resolves to the final page index on clean termination, or `None` when
    /// the message went away or the session was aborted.
    pub terminal: JoinHandle<Option<usize>>,
}

/// Open a pagination session over the given pages.
///
/// Validates the configuration, posts (or re-renders) the initial page,
/// attaches the navigation affordances in order, and drives the navigation
/// loop in a background task. Configuration problems fail here, before any
/// remote call is made.
pub async fn open_paginator(
    messenger: Arc<dyn Messenger>,
    target: SessionTarget,
    pages: PageSet,
    options: PaginatorOptions,
) -> anyhow::Result<PaginatorHandle> {
    if pages.is_empty() {
        anyhow::bail!("pagination requires at least one page");
    }
    if options.start_page >= pages.len() {
        anyhow::bail!(
            "start page {} out of range for {} pages",
            options.start_page,
            pages.len()
        );
    }
    if options.nav.is_empty() {
        anyhow::bail!("pagination requires at least one navigation affordance");
    }
    for (position, action) in options.nav.iter().enumerate() {
        if options.nav[..position].contains(action) {
            anyhow::bail!("duplicate navigation affordance");
        }
    }

    let pages = pages.resolve();
    let total = pages.len();

    let initial = with_page_footer(&pages[options.start_page], options.start_page, total);
    let message = match target {
        SessionTarget::Channel(channel_id) => {
            messenger.send_renderable(channel_id, &initial).await?
        }
        SessionTarget::Existing(existing) => {
            messenger.edit_renderable(existing, &initial).await?;
            existing
        }
    };

    // A lone page with nowhere to go needs no affordances or loop.
    if total == 1 && !options.consume_on_advance {
        let index = options.start_page;
        let terminal = tokio::spawn(async move { Some(index) });
        return Ok(PaginatorHandle { message, terminal });
    }

    let discard_only = options.consume_on_advance && total == 1;
    let symbols: Vec<Symbol> = if discard_only {
        vec![Symbol::unicode(DISCARD_SYMBOL)]
    } else {
        options.nav.iter().map(|action| action.symbol()).collect()
    };

    for symbol in &symbols {
        if let Err(source) = messenger.react_with(message, symbol).await {
            warn!(?source, %symbol, "failed to attach navigation reaction");
        }
    }

    let terminal = tokio::spawn(run_paginator(
        messenger,
        message,
        pages,
        options,
        symbols,
        discard_only,
    ));

    Ok(PaginatorHandle { message, terminal })
}

async fn run_paginator(
    messenger: Arc<dyn Messenger>,
    message: MessageRef,
    mut pages: Vec<Embed>,
    options: PaginatorOptions,
    initial_symbols: Vec<Symbol>,
    mut discard_mode: bool,
) -> Option<usize> {
    let mut index = options.start_page;
    let mut message_gone = false;

    let session = ConsumptionSession::new(
        Arc::clone(&messenger),
        message,
        ReactionConstraint {
            allow_emoji: Some(initial_symbols),
            ..ReactionConstraint::default()
        },
        options.abort.child_token(),
    );
    let mut monitor = SerialReactionMonitor::new(session, options.time_budget, None);

    loop {
        if options.abort.is_cancelled() {
            return None;
        }

        let Some(event) = monitor.next().await else {
            if monitor.target_gone() {
                message_gone = true;
            }
            break;
        };

        if options.abort.is_cancelled() {
            return None;
        }

        if discard_mode {
            if Symbol::unicode(DISCARD_SYMBOL).matches(&event.symbol) {
                break;
            }
            continue;
        }

        let Some(action) = NavAction::from_symbol(&event.symbol) else {
            continue;
        };

        let departed = index;
        index = match action {
            NavAction::Forward => wrap_forward(index, pages.len()),
            NavAction::Back => wrap_backward(index, pages.len()),
            NavAction::Reroll => rand::thread_rng().gen_range(0..pages.len()),
        };

        if options.consume_on_advance && index != departed {
            pages.remove(departed);
            index = index_after_removal(index, departed);

            if pages.len() == 1 {
                // endgame: a single page left, only discarding remains
                discard_mode = true;
                monitor
                    .session_mut()
                    .set_allowed_symbols(vec![Symbol::unicode(DISCARD_SYMBOL)]);

                if let Err(source) = messenger.clear_reactions(message).await {
                    warn!(?source, "failed to clear navigation reactions");
                }
                if let Err(source) = messenger
                    .react_with(message, &Symbol::unicode(DISCARD_SYMBOL))
                    .await
                {
                    warn!(?source, "failed to attach discard reaction");
                }
            }
        }

        if options.abort.is_cancelled() {
            return None;
        }

        let rendered = with_page_footer(&pages[index], index, pages.len());
        match messenger.edit_renderable(message, &rendered).await {
            Ok(()) => {}
            Err(MessengerError::Gone) => {
                message_gone = true;
                break;
            }
            Err(source) => {
                warn!(?source, "page edit failed mid-session");
            }
        }
    }

    if message_gone || options.abort.is_cancelled() {
        return None;
    }

    // Strip the transient page-position footer with one final edit.
    match messenger.edit_renderable(message, &pages[index]).await {
        Ok(()) => {}
        Err(MessengerError::Gone) => return None,
        Err(source) => {
            warn!(?source, "final cleanup edit failed");
        }
    }

    Some(index)
}
