//! Embed builders and page rendering helpers for interactive views.

use std::sync::Arc;

use twilight_model::channel::message::embed::{Embed, EmbedFooter};
use twilight_util::builder::embed::EmbedBuilder;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x2E_86_AB;

/// Renderer turning one source item into a page embed.
pub type PageRenderer = Arc<dyn Fn(&str) -> Embed + Send + Sync>;

/// Ordered source of pages for an interactive session.
///
/// Resolved exactly once when the session opens; the resolved pages are
/// immutable afterwards and only the cursor moves. The page-position footer
/// is a render-time overlay, never part of the base page.
pub enum PageSet {
    /// Pages already rendered by the caller.
    Rendered(Vec<Embed>),
    /// Source items plus the renderer producing one embed per item.
    Items {
        items: Vec<String>,
        render: PageRenderer,
    },
}

impl PageSet {
    pub fn len(&self) -> usize {
        match self {
            Self::Rendered(pages) => pages.len(),
            Self::Items { items, .. } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve into the final ordered page list.
    pub fn resolve(self) -> Vec<Embed> {
        match self {
            Self::Rendered(pages) => pages,
            Self::Items { items, render } => items.iter().map(|item| render(item)).collect(),
        }
    }
}

/// Overlay the transient page-position footer onto a base page.
///
/// Single-page views carry no footer, matching the initial render rule that
/// the position indicator only appears when there is somewhere to go.
pub fn with_page_footer(base: &Embed, page_index: usize, total_pages: usize) -> Embed {
    let mut rendered = base.clone();
    if total_pages > 1 {
        rendered.footer = Some(EmbedFooter {
            icon_url: None,
            proxy_icon_url: None,
            text: format!("Page {}/{}", page_index + 1, total_pages),
        });
    }
    rendered
}

/// Build a standard embed in the house style.
pub fn build_page_embed(title: &str, description: impl Into<String>) -> anyhow::Result<Embed> {
    let embed = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
        .validate()?
        .build();

    Ok(embed)
}

/// Build one option-list page from pre-rendered lines.
pub fn build_option_page(title: &str, lines: &[String]) -> anyhow::Result<Embed> {
    build_page_embed(title, lines.join("\n"))
}
