//! Pure cursor math for reaction-driven pagination.

/// Number of option pages needed for a paginated list.
pub fn total_pages(item_count: usize, per_page: usize) -> usize {
    item_count.div_ceil(per_page.max(1))
}

/// Advance one page forward, wrapping from the last page to the first.
pub fn wrap_forward(index: usize, page_count: usize) -> usize {
    if page_count == 0 {
        return 0;
    }
    (index + 1) % page_count
}

/// Step one page backward, wrapping from the first page to the last.
pub fn wrap_backward(index: usize, page_count: usize) -> usize {
    if page_count == 0 {
        0
    } else if index == 0 {
        page_count - 1
    } else {
        index - 1
    }
}

/// Start/end item indices of one 0-based page window.
pub fn page_window(total_items: usize, per_page: usize, page_index: usize) -> (usize, usize) {
    let safe_per_page = per_page.max(1);
    let start = page_index.saturating_mul(safe_per_page);
    let end = (start + safe_per_page).min(total_items);
    (start.min(total_items), end)
}

/// Cursor position of `destination` after removing position `removed`.
///
/// The same rule applies to both travel directions: the destination is
/// chosen first, the departed page is removed, and the cursor shifts down by
/// one exactly when the removed position precedes the destination.
pub fn index_after_removal(destination: usize, removed: usize) -> usize {
    if removed < destination {
        destination - 1
    } else {
        destination
    }
}

/// Parse a typed 1-based numeric choice against a list length.
///
/// Only trimmed, exact base-10 integer strings in `[1, max]` match; the
/// returned index is 0-based. Anything else, including numerals with extra
/// characters, is `None`.
pub fn parse_choice(raw: &str, max: usize) -> Option<usize> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let value = trimmed.parse::<usize>().ok()?;
    (value >= 1 && value <= max).then(|| value - 1)
}

/// Render one option page window as globally-numbered lines.
pub fn numbered_window_lines(items: &[String], per_page: usize, page_index: usize) -> Vec<String> {
    let (start, end) = page_window(items.len(), per_page, page_index);
    items[start..end]
        .iter()
        .enumerate()
        .map(|(offset, item)| format!("`{}.` {}", start + offset + 1, item))
        .collect()
}
