/// Token used whenever normalization leaves nothing behind.
pub const FALLBACK_SLUG: &str = "work";

/// Normalize text into a lowercase, hyphen-separated slug.
///
/// Any run of characters outside `[a-z0-9]` collapses to a single `-`, and
/// leading/trailing separators are stripped. Never returns an empty string.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// First `limit` whitespace-separated words of `text`, joined by single spaces.
pub fn first_words(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}
