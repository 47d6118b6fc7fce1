use std::sync::Arc;

use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandRegistry;
use flipbook_core::Context;
use flipbook_utils::embed::{PageSet, build_page_embed};
use flipbook_utils::pagination::{NavAction, PaginatorOptions, SessionTarget, open_paginator};

pub const META: crate::CommandMeta = crate::CommandMeta {
    name: "roll",
    desc: "Reroll a random entry from the trivia pool.",
    category: "interactive",
    usage: "!roll",
};

/// Open a reroll-only session: the die reaction jumps to a uniformly random
/// entry, the current one included.
pub async fn run(
    ctx: Context,
    _registry: Arc<CommandRegistry>,
    msg: Box<MessageCreate>,
    _arg: Option<String>,
) -> anyhow::Result<()> {
    let mut pages = Vec::new();
    for fact in [
        "Honey never spoils.",
        "Octopuses have three hearts.",
        "A group of flamingos is a flamboyance.",
        "Bananas are berries; strawberries are not.",
        "Wombat droppings are cube shaped.",
        "The Eiffel Tower grows in summer.",
    ] {
        pages.push(build_page_embed("Trivia", fact)?);
    }

    open_paginator(
        Arc::clone(&ctx.messenger),
        SessionTarget::Channel(msg.channel_id),
        PageSet::Rendered(pages),
        PaginatorOptions {
            nav: vec![NavAction::Reroll],
            ..PaginatorOptions::default()
        },
    )
    .await?;

    Ok(())
}
