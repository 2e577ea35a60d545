// SPDX-FileCopyrightText: 2026 Linkpost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure extraction heuristics over fetched HTML.
//!
//! Regex-based on purpose: the source pages are not well-formed enough for a
//! strict parser, and the heuristics degrade gracefully (each extractor has a
//! fallback chain ending in "empty").

use std::sync::LazyLock;

use regex::Regex;

static RE_H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("static regex"));

static RE_JSON_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)["']name["']\s*:\s*["']([^"']+)["']"#).expect("static regex")
});

static RE_TAG_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<li\s+class=["']tag["'][^>]*>(.*?)</li>"#).expect("static regex")
});

static RE_ANCHOR_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a[^>]*>([^<]+)</a>").expect("static regex"));

static RE_IMAGE_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)["']images["']\s*:\s*\[(.*?)\]"#).expect("static regex")
});

static RE_TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\]").expect("static regex"));

static RE_IMG_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img[^>]+(?:data-src|src)=["']([^"']+\.(?:jpe?g|png|webp))(?:\?[^"']*)?["']"#)
        .expect("static regex")
});

static RE_QUOTED_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)"(https?://[^"]+\.(?:jpe?g|png|webp))(?:\?[^"]*)?""#)
        .expect("static regex")
});

/// Title from the metadata page: `<h1>` first, embedded JSON `name` second.
pub fn extract_title(html: &str) -> String {
    if let Some(m) = RE_H1.captures(html) {
        let title = strip_html(&m[1]).trim().to_string();
        if !title.is_empty() {
            return title;
        }
    }
    extract_json_name(html)
}

/// `"name": "..."` from an embedded JSON blob.
pub fn extract_json_name(html: &str) -> String {
    RE_JSON_NAME
        .captures(html)
        .map(|m| m[1].trim().to_string())
        .unwrap_or_default()
}

/// A labelled metadata field: `<div class="item">Label</div>` followed by an
/// `<h2>` value block.
pub fn extract_labeled_field(html: &str, label: &str) -> String {
    let pattern = format!(
        r#"(?is)<div\s+class=["']item["']>\s*{}\s*</div>\s*<div\s+class=["']item2["']>\s*<h2>(.*?)</h2>"#,
        regex::escape(label)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return String::new();
    };
    re.captures(html)
        .map(|m| strip_html(&m[1]).trim().to_string())
        .unwrap_or_default()
}

/// Tag names from the side list, first meaningful anchor per item,
/// deduplicated preserving order. "+" / "-" voting anchors are skipped.
pub fn extract_tags(html: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for item in RE_TAG_ITEM.captures_iter(html) {
        for anchor in RE_ANCHOR_TEXT.captures_iter(&item[1]) {
            let text = strip_html(&anchor[1]).trim().to_string();
            if text.is_empty() || text == "+" || text == "-" {
                continue;
            }
            tags.push(text);
            break;
        }
    }
    dedupe_preserving_order(tags)
}

/// Image URLs from the reader page's embedded `"images": [...]` array.
pub fn extract_image_array(html: &str) -> Vec<String> {
    let Some(m) = RE_IMAGE_ARRAY.captures(html) else {
        return Vec::new();
    };
    // The page embeds a JS literal, not strict JSON: single quotes and a
    // trailing comma are common.
    let mut arr = format!("[{}]", &m[1]);
    arr = arr.replace('\'', "\"");
    arr = RE_TRAILING_COMMA.replace_all(&arr, "]").into_owned();
    serde_json::from_str(&arr).unwrap_or_default()
}

/// Image URLs from `<img src>`/`<img data-src>` attributes.
pub fn extract_img_tags(html: &str) -> Vec<String> {
    RE_IMG_TAG
        .captures_iter(html)
        .map(|m| m[1].trim().to_string())
        .collect()
}

/// Last-resort sweep: any quoted absolute image URL in the page source.
pub fn extract_any_quoted_images(html: &str) -> Vec<String> {
    RE_QUOTED_IMAGE
        .captures_iter(html)
        .map(|m| m[1].trim().to_string())
        .collect()
}

/// Resolve relative URLs against the page URL and deduplicate preserving
/// order. Unparseable entries are kept verbatim.
pub fn normalize_urls(base_url: &str, urls: Vec<String>) -> Vec<String> {
    let base = url::Url::parse(base_url).ok();
    let resolved = urls
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .map(|u| match &base {
            Some(base) => base.join(&u).map(|r| r.to_string()).unwrap_or(u),
            None => u,
        })
        .collect();
    dedupe_preserving_order(resolved)
}

/// Remove HTML tags; simplistic but adequate for titles and field values.
pub fn strip_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn dedupe_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_prefers_h1_over_json_name() {
        let html = r#"<h1 class="title"> The <b>Quiet</b> Garden </h1>
                      <script>{"name": "Fallback Name"}</script>"#;
        assert_eq!(extract_title(html), "The Quiet Garden");
    }

    #[test]
    fn title_falls_back_to_json_name() {
        let html = r#"<h1>   </h1><script>var meta = {"name": "From Meta"};</script>"#;
        assert_eq!(extract_title(html), "From Meta");
        assert_eq!(extract_title("<p>nothing here</p>"), "");
    }

    #[test]
    fn labeled_field_is_extracted_and_stripped() {
        let html = r#"
            <div class="item">Series</div>
            <div class="item2"><h2><a href="/s/1">Seasons</a></h2></div>
            <div class="item">Author</div>
            <div class="item2"><h2>A. Writer</h2></div>"#;
        assert_eq!(extract_labeled_field(html, "Series"), "Seasons");
        assert_eq!(extract_labeled_field(html, "Author"), "A. Writer");
        assert_eq!(extract_labeled_field(html, "Translator"), "");
    }

    #[test]
    fn tags_skip_voting_anchors_and_dedupe() {
        let html = r##"
            <li class="tag"><a href="#">+</a><a href="/t/1">romance</a></li>
            <li class="tag"><a href="/t/2">drama</a></li>
            <li class="tag"><a href="/t/1">romance</a></li>
            <li class="tag"><a href="#">-</a></li>"##;
        assert_eq!(extract_tags(html), vec!["romance", "drama"]);
    }

    #[test]
    fn image_array_tolerates_js_literal_syntax() {
        let html = r#"var reader = {"images": ['/img/1.jpg', '/img/2.jpg', ]};"#;
        assert_eq!(extract_image_array(html), vec!["/img/1.jpg", "/img/2.jpg"]);
    }

    #[test]
    fn image_array_absent_yields_empty() {
        assert!(extract_image_array("<html></html>").is_empty());
    }

    #[test]
    fn img_tags_match_src_and_data_src_with_query_strings() {
        let html = r#"
            <img src="https://cdn.test/a.jpg?v=2">
            <img data-src="/local/b.png" class="lazy">
            <img src="https://cdn.test/not-an-image.svg">"#;
        assert_eq!(
            extract_img_tags(html),
            vec!["https://cdn.test/a.jpg", "/local/b.png"]
        );
    }

    #[test]
    fn quoted_image_sweep_finds_absolute_urls_only() {
        let html = r#"preload("https://cdn.test/c.webp"); other("/relative/d.jpg")"#;
        assert_eq!(extract_any_quoted_images(html), vec!["https://cdn.test/c.webp"]);
    }

    #[test]
    fn normalize_resolves_relative_against_base_and_dedupes() {
        let urls = vec![
            "/img/1.jpg".to_string(),
            "https://cdn.test/2.jpg".to_string(),
            "/img/1.jpg".to_string(),
            "  ".to_string(),
        ];
        let normalized = normalize_urls("https://example.test/online/abc", urls);
        assert_eq!(
            normalized,
            vec!["https://example.test/img/1.jpg", "https://cdn.test/2.jpg"]
        );
    }

    #[test]
    fn strip_html_removes_nested_tags() {
        assert_eq!(strip_html("a <b>bold <i>and</i></b> plain"), "a bold and plain");
    }
}
