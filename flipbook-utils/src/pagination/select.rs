//! Raced selection sessions: option pagination against a typed numeric choice.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::{
    Id,
    marker::{ChannelMarker, UserMarker},
};

use crate::broker::{MessageRef, SubscribeOptions, TextPredicate};
use crate::embed::{PageSet, build_option_page};
use crate::messenger::Messenger;

use super::DEFAULT_TIMEOUT_SECS;
use super::engine::{NavAction, PaginatorOptions, SessionTarget, open_paginator};
use super::page::{numbered_window_lines, page_window, parse_choice, total_pages};

/// Grace period between resolution and clearing reactions, so an in-flight
/// removal is not raced.
const RESOLVE_GRACE: Duration = Duration::from_secs(1);

/// Renderer turning one option into its list line; the first argument is the
/// option's 1-based global number.
pub type LineRenderer = Arc<dyn Fn(usize, &str) -> String + Send + Sync>;

/// Renderer producing the final, non-interactive embed once a choice lands;
/// the arguments are the chosen 0-based index and the chosen item.
pub type ResultRenderer = Arc<dyn Fn(usize, &str) -> Embed + Send + Sync>;

/// Tunables for one selection session.
#[derive(Clone)]
pub struct SelectorOptions {
    /// Title shown on every option page.
    pub title: String,
    /// Options rendered per page. Must be positive.
    pub items_per_page: usize,
    /// When set, only this actor's typed choice counts.
    pub actor: Option<Id<UserMarker>>,
    /// Budget for each individual wait, not for the whole session.
    pub time_budget: Duration,
    /// Clear all reactions once a choice lands.
    pub clear_reactions_on_resolve: bool,
    /// Shared abort flag; checked before every wait and every remote write.
    pub abort: CancellationToken,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            title: "Pick one".to_owned(),
            items_per_page: 10,
            actor: None,
            time_budget: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            clear_reactions_on_resolve: true,
            abort: CancellationToken::new(),
        }
    }
}

/// A live selection session.
pub struct SelectorHandle {
    /// The option-list message, when one was posted.
    pub message: Option<MessageRef>,
    /// Resolves to the chosen 0-based index, `None` on abandonment. Failures
    /// while applying the result renderer surface here, since they occur
    /// after the interactive portion is over.
    pub chosen: JoinHandle<anyhow::Result<Option<usize>>>,
}

/// Open a selection session over the given items.
///
/// Two input channels race until one lands a terminal choice: a navigation
/// loop flipping through the option pages, and a typed-choice detector
/// waiting for the constraining actor to send a bare list number.
pub async fn open_selector(
    messenger: Arc<dyn Messenger>,
    channel_id: Id<ChannelMarker>,
    items: Vec<String>,
    line_render: Option<LineRenderer>,
    result_render: Option<ResultRenderer>,
    options: SelectorOptions,
) -> anyhow::Result<SelectorHandle> {
    if items.is_empty() {
        anyhow::bail!("selection requires at least one item");
    }
    if options.items_per_page == 0 {
        anyhow::bail!("items per page must be positive");
    }

    // A single candidate needs no interaction at all.
    if items.len() == 1 {
        let message = match result_render.as_ref() {
            Some(render) => {
                let embed = render(0, &items[0]);
                Some(messenger.send_renderable(channel_id, &embed).await?)
            }
            None => None,
        };
        let chosen = tokio::spawn(async { Ok(Some(0)) });
        return Ok(SelectorHandle { message, chosen });
    }

    let option_page_count = total_pages(items.len(), options.items_per_page);
    let mut pages = Vec::with_capacity(option_page_count);
    for page_index in 0..option_page_count {
        let lines = match &line_render {
            Some(render) => {
                let (start, end) = page_window(items.len(), options.items_per_page, page_index);
                items[start..end]
                    .iter()
                    .enumerate()
                    .map(|(offset, item)| render(start + offset + 1, item))
                    .collect()
            }
            None => numbered_window_lines(&items, options.items_per_page, page_index),
        };
        pages.push(build_option_page(&options.title, &lines)?);
    }

    // The navigation loop only changes which option page is visible; it can
    // never resolve the choice, so it gets its own child abort.
    let nav_abort = options.abort.child_token();
    let paginator = open_paginator(
        Arc::clone(&messenger),
        SessionTarget::Channel(channel_id),
        PageSet::Rendered(pages),
        PaginatorOptions {
            nav: vec![NavAction::Back, NavAction::Forward],
            start_page: 0,
            consume_on_advance: false,
            time_budget: options.time_budget,
            abort: nav_abort.clone(),
        },
    )
    .await?;

    let message = paginator.message;
    let chosen = tokio::spawn(run_selector(
        messenger,
        channel_id,
        message,
        items,
        result_render,
        options,
        nav_abort,
        paginator.terminal,
    ));

    Ok(SelectorHandle {
        message: Some(message),
        chosen,
    })
}

#[allow(clippy::too_many_arguments)]
async fn run_selector(
    messenger: Arc<dyn Messenger>,
    channel_id: Id<ChannelMarker>,
    message: MessageRef,
    items: Vec<String>,
    result_render: Option<ResultRenderer>,
    options: SelectorOptions,
    nav_abort: CancellationToken,
    nav_terminal: JoinHandle<Option<usize>>,
) -> anyhow::Result<Option<usize>> {
    let max = items.len();
    let actor = options.actor;
    let predicate: TextPredicate = Arc::new(move |event| {
        if let Some(expected) = actor
            && event.author != expected
        {
            return false;
        }
        parse_choice(&event.content, max).is_some()
    });

    let mut choices = messenger.await_text_messages(
        channel_id,
        predicate,
        SubscribeOptions {
            max_count: Some(1),
            time_budget: options.time_budget,
        },
    );

    // Abandonment needs both channels exhausted: a numeric wait that comes
    // up empty re-arms for as long as the reaction loop is still alive.
    let mut nav_terminal = nav_terminal;
    let outcome = loop {
        tokio::select! {
            _ = options.abort.cancelled() => {
                nav_abort.cancel();
                let _ = nav_terminal.await;
                return Ok(None);
            }
            outcome = choices.next() => match outcome {
                Some(event) => break Some(event),
                None if nav_terminal.is_finished() => break None,
                None => {}
            },
        }
    };

    // Whatever happened, the navigation loop is over; wind it down before
    // touching the message again.
    nav_abort.cancel();
    let _ = nav_terminal.await;

    let Some(event) = outcome else {
        // Abandonment: the message stays in its last-rendered state.
        return Ok(None);
    };
    let Some(chosen_index) = parse_choice(&event.content, max) else {
        return Ok(None);
    };

    // The typed choice served its purpose; clean it out of the channel.
    if let Err(source) = messenger.delete_message(event.message).await {
        warn!(?source, "failed to delete the typed choice");
    }

    if options.clear_reactions_on_resolve {
        tokio::time::sleep(RESOLVE_GRACE).await;
        if let Err(source) = messenger.clear_reactions(message).await {
            warn!(?source, "failed to clear reactions on resolve");
        }
    }

    if let Some(render) = result_render {
        let embed = render(chosen_index, &items[chosen_index]);
        messenger.edit_renderable(message, &embed).await?;
    }

    Ok(Some(chosen_index))
}
