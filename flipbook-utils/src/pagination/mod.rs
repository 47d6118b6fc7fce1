//! Stable facade for the interactive pagination and selection engines.

/// Default per-wait time budget for interactive sessions.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

mod engine;
mod page;
mod select;

pub use engine::{NavAction, PaginatorHandle, PaginatorOptions, SessionTarget, open_paginator};
pub use page::{
    index_after_removal, numbered_window_lines, page_window, parse_choice, total_pages,
    wrap_backward, wrap_forward,
};
pub use select::{LineRenderer, ResultRenderer, SelectorHandle, SelectorOptions, open_selector};
