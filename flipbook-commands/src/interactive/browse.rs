use std::sync::Arc;

use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandRegistry;
use flipbook_core::Context;
use flipbook_utils::embed::{DEFAULT_EMBED_COLOR, PageRenderer, PageSet};
use flipbook_utils::pagination::{open_paginator, PaginatorOptions, SessionTarget};
use flipbook_utils::trash::guard_trashable;
use twilight_util::builder::embed::EmbedBuilder;

pub const META: crate::CommandMeta = crate::CommandMeta {
    name: "browse",
    desc: "Browse the sample gallery page by page.",
    category: "interactive",
    usage: "!browse",
};

/// Open a cyclic pagination session over the sample gallery.
pub async fn run(
    ctx: Context,
    _registry: Arc<CommandRegistry>,
    msg: Box<MessageCreate>,
    _arg: Option<String>,
) -> anyhow::Result<()> {
    let render: PageRenderer = Arc::new(|item| {
        EmbedBuilder::new()
            .title("Gallery")
            .color(DEFAULT_EMBED_COLOR)
            .description(item.to_owned())
            .build()
    });

    let handle = open_paginator(
        Arc::clone(&ctx.messenger),
        SessionTarget::Channel(msg.channel_id),
        PageSet::Items {
            items: gallery_items(),
            render,
        },
        PaginatorOptions::default(),
    )
    .await?;

    tokio::spawn(guard_trashable(
        Arc::clone(&ctx.messenger),
        handle.message,
        Some(vec![msg.author.id]),
    ));

    Ok(())
}

fn gallery_items() -> Vec<String> {
    (1..=12)
        .map(|index| format!("Sample gallery exhibit #{index}"))
        .collect()
}
