//! HTML signal extraction
//!
//! Pure functions over one HTML document: the page summarizer and the
//! internal link extractor. Malformed markup degrades to empty/zero values;
//! nothing here returns an error.

use crate::url_utils::{origin_of, strip_fragment};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Structural and content signals of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSummary {
    pub title: Option<String>,
    pub has_meta_description: bool,
    pub has_canonical: bool,
    pub h1_count: usize,
    pub h2_count: usize,
    pub has_json_ld: bool,
    pub text: String,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid static selector")
}

static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static META: Lazy<Selector> = Lazy::new(|| selector("meta[name]"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("link[rel]"));
static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static H2: Lazy<Selector> = Lazy::new(|| selector("h2"));
static SCRIPT: Lazy<Selector> = Lazy::new(|| selector("script[type]"));
static BODY: Lazy<Selector> = Lazy::new(|| selector("body"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

/// Elements whose text never renders
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Summarize one HTML document, keeping at most `text_cap` characters of
/// visible body text.
pub fn summarize_page(html: &str, text_cap: usize) -> PageSummary {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string());

    let has_meta_description = document.select(&META).any(|meta| {
        let el = meta.value();
        el.attr("name")
            .is_some_and(|n| n.trim().eq_ignore_ascii_case("description"))
            && el.attr("content").is_some_and(|c| !c.trim().is_empty())
    });

    let has_canonical = document.select(&LINK).any(|link| {
        let el = link.value();
        el.attr("rel").is_some_and(|rel| {
            rel.split_ascii_whitespace()
                .any(|r| r.eq_ignore_ascii_case("canonical"))
        }) && el.attr("href").is_some_and(|h| !h.trim().is_empty())
    });

    PageSummary {
        title,
        has_meta_description,
        has_canonical,
        h1_count: document.select(&H1).count(),
        h2_count: document.select(&H2).count(),
        has_json_ld: has_json_ld(&document),
        text: document
            .select(&BODY)
            .next()
            .map(|body| visible_text(body, text_cap))
            .unwrap_or_default(),
    }
}

/// Whether any `<script>` declares a JSON-LD type.
///
/// `contains` catches variations like `application/ld+json; charset=utf-8`.
fn has_json_ld(document: &Html) -> bool {
    document.select(&SCRIPT).any(|script| {
        script
            .value()
            .attr("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .is_some_and(|t| t.contains("ld+json"))
    })
}

/// Rendered text under `root` with whitespace runs collapsed, truncated to
/// `cap` characters.
fn visible_text(root: ElementRef<'_>, cap: usize) -> String {
    let mut raw = String::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            raw.push_str(text);
            raw.push(' ');
        }
    }

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, cap)
}

/// First `cap` characters of `text`
pub fn truncate_chars(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Same-origin anchor targets, resolved against `origin`, without fragments
/// and deduplicated in document order.
pub fn extract_internal_links(html: &str, origin: &str) -> Vec<String> {
    let Ok(base) = Url::parse(origin) else {
        return Vec::new();
    };
    let base_origin = origin_of(&base);
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|resolved| origin_of(resolved) == base_origin)
        .map(|resolved| strip_fragment(resolved).to_string())
        .filter(|link| seen.insert(link.clone()))
        .collect()
}
