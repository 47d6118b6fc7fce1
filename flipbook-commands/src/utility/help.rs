use std::sync::Arc;

use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandRegistry;
use flipbook_core::Context;
use flipbook_utils::embed::{PageSet, build_page_embed};
use flipbook_utils::pagination::{
    NavAction, PaginatorOptions, SessionTarget, open_paginator, page_window, total_pages,
};
use flipbook_utils::trash::guard_trashable;

pub const META: crate::CommandMeta = crate::CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help",
};

const HELP_COMMANDS_PER_PAGE: usize = 6;

/// Render the command catalog as a reaction-paginated embed.
///
/// The invoking user can also trash the catalog message once they are done
/// with it.
pub async fn run(
    ctx: Context,
    registry: Arc<CommandRegistry>,
    msg: Box<MessageCreate>,
    _arg: Option<String>,
) -> anyhow::Result<()> {
    let mut lines: Vec<String> = registry
        .metas()
        .map(|meta| format!("**{}**: {}\n`{}`", meta.name, meta.desc, meta.usage))
        .collect();
    lines.sort_unstable();

    let total = total_pages(lines.len(), HELP_COMMANDS_PER_PAGE);
    let mut pages = Vec::with_capacity(total);
    for page_index in 0..total {
        let (start, end) = page_window(lines.len(), HELP_COMMANDS_PER_PAGE, page_index);
        pages.push(build_page_embed(
            "Available Commands",
            lines[start..end].join("\n"),
        )?);
    }

    let handle = open_paginator(
        Arc::clone(&ctx.messenger),
        SessionTarget::Channel(msg.channel_id),
        PageSet::Rendered(pages),
        PaginatorOptions {
            nav: vec![NavAction::Back, NavAction::Forward],
            ..PaginatorOptions::default()
        },
    )
    .await?;

    tokio::spawn(guard_trashable(
        Arc::clone(&ctx.messenger),
        handle.message,
        Some(vec![msg.author.id]),
    ));

    Ok(())
}
