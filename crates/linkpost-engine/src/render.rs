// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of broadcast and moderation messages.
//!
//! HTML formatting is used throughout (safer around entities than Markdown
//! escaping); every interpolated value goes through [`escape_html`].

use linkpost_core::types::ContentItem;

/// Series value treated as "no series": the source uses it for standalone
/// works, and repeating it in every post is noise.
pub const UNCATEGORIZED_SERIES: &str = "Original works";

/// Escape the characters HTML parse mode treats specially.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Normalize a tag for display: trim, lowercase, inner whitespace to `_`.
pub fn normalize_tag(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    trimmed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Compose the message text for an enriched item.
///
/// The title links to the published page; the series line is suppressed when
/// empty or equal to [`UNCATEGORIZED_SERIES`]; tags are `#`-prefixed and
/// comma-separated. `subscribe_url` appends an optional footer link.
pub fn build_message_text(
    item: &ContentItem,
    subscribe_url: Option<&str>,
    subscribe_label: &str,
) -> String {
    let mut b = String::new();

    if !item.name.is_empty() && !item.page_url.is_empty() {
        b.push_str(&format!(
            "<a href=\"{}\">{}</a>\n\n",
            escape_html(&item.page_url),
            escape_html(&item.name)
        ));
    }
    if !item.series.is_empty() && item.series != UNCATEGORIZED_SERIES {
        b.push_str(&format!("<b>Series:</b> {}\n", escape_html(&item.series)));
    }
    if !item.author.is_empty() {
        b.push_str(&format!("<b>Author:</b> {}\n", escape_html(&item.author)));
    }
    if !item.translator.is_empty() {
        b.push_str(&format!(
            "<b>Translator:</b> {}\n",
            escape_html(&item.translator)
        ));
    }

    let tags: Vec<String> = item
        .tags
        .iter()
        .map(|t| normalize_tag(t))
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{}", escape_html(&t)))
        .collect();
    if !tags.is_empty() {
        b.push_str(&format!("<b>Tags:</b> {}\n", tags.join(", ")));
    }

    if let Some(url) = subscribe_url {
        b.push_str(&format!(
            "\n<a href=\"{}\">{}</a>",
            escape_html(url),
            escape_html(subscribe_label)
        ));
    }

    b
}
