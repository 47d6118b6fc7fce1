use std::sync::Arc;

use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandRegistry;
use flipbook_core::Context;
use flipbook_utils::embed::{PageSet, build_page_embed};
use flipbook_utils::pagination::{NavAction, PaginatorOptions, SessionTarget, open_paginator};

pub const META: crate::CommandMeta = crate::CommandMeta {
    name: "deal",
    desc: "Deal a hand of cards; each card is gone once you move on.",
    category: "interactive",
    usage: "!deal",
};

/// Open a consume-on-advance session: visited cards leave the pool, and the
/// last remaining card offers only the discard affordance.
pub async fn run(
    ctx: Context,
    _registry: Arc<CommandRegistry>,
    msg: Box<MessageCreate>,
    _arg: Option<String>,
) -> anyhow::Result<()> {
    let mut pages = Vec::new();
    for card in ["Ace of Cups", "The Tower", "Seven of Swords", "The Moon", "The Star"] {
        pages.push(build_page_embed("Your Draw", card)?);
    }

    open_paginator(
        Arc::clone(&ctx.messenger),
        SessionTarget::Channel(msg.channel_id),
        PageSet::Rendered(pages),
        PaginatorOptions {
            nav: vec![NavAction::Back, NavAction::Forward],
            consume_on_advance: true,
            ..PaginatorOptions::default()
        },
    )
    .await?;

    Ok(())
}
