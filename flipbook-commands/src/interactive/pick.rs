use std::sync::Arc;

use tracing::error;
use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandRegistry;
use flipbook_core::Context;
use flipbook_utils::embed::DEFAULT_EMBED_COLOR;
use flipbook_utils::pagination::{ResultRenderer, SelectorOptions, open_selector};
use twilight_util::builder::embed::EmbedBuilder;

pub const META: crate::CommandMeta = crate::CommandMeta {
    name: "pick",
    desc: "Pick one snack from the menu by typing its number.",
    category: "interactive",
    usage: "!pick",
};

const MENU_ITEMS_PER_PAGE: usize = 4;

/// Open a selection session over the snack menu, restricted to the invoker.
pub async fn run(
    ctx: Context,
    _registry: Arc<CommandRegistry>,
    msg: Box<MessageCreate>,
    _arg: Option<String>,
) -> anyhow::Result<()> {
    let menu: Vec<String> = [
        "Stroopwafel",
        "Onigiri",
        "Churros",
        "Pretzel",
        "Mochi",
        "Empanada",
        "Baklava",
    ]
    .iter()
    .map(|s| (*s).to_owned())
    .collect();

    let result_render: ResultRenderer = Arc::new(|_, item| {
        EmbedBuilder::new()
            .title("Enjoy!")
            .color(DEFAULT_EMBED_COLOR)
            .description(format!("You picked **{item}**."))
            .build()
    });

    let handle = open_selector(
        Arc::clone(&ctx.messenger),
        msg.channel_id,
        menu,
        None,
        Some(result_render),
        SelectorOptions {
            title: "Snack Menu".to_owned(),
            items_per_page: MENU_ITEMS_PER_PAGE,
            actor: Some(msg.author.id),
            ..SelectorOptions::default()
        },
    )
    .await?;

    // Result-renderer failures surface after the race settles; log them
    // instead of letting the task result vanish.
    tokio::spawn(async move {
        match handle.chosen.await {
            Ok(Ok(_)) | Err(_) => {}
            Ok(Err(source)) => error!(?source, "selection finalization failed"),
        }
    });

    Ok(())
}
