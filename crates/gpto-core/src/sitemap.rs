//! Sitemap discovery
//!
//! Fetches `/sitemap.xml` at the audited origin and turns its `<urlset>` into
//! a bounded list of same-origin page URLs. Absence, HTTP errors and markup
//! that is not a urlset all mean "no sitemap"; nothing here is an error.

use crate::fetch::Fetcher;
use crate::url_utils::same_origin_url;
use ::sitemap::reader::{SiteMapEntity, SiteMapReader};
use ::sitemap::structs::Location;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fetch `{origin}/sitemap.xml` and return up to `max_pages` in-origin URLs.
///
/// Returns `None` when the sitemap is missing, errors, cannot be parsed, or
/// lists no URL at `origin`.
pub async fn discover_sitemap<F: Fetcher + ?Sized>(
    fetcher: &F,
    origin: &str,
    max_pages: usize,
    timeout: Duration,
) -> Option<Vec<String>> {
    let sitemap_url = format!("{}/sitemap.xml", origin.trim_end_matches('/'));
    let response = fetcher.fetch_text(&sitemap_url, timeout).await;

    if response.status == 0 || response.status >= 400 {
        debug!("No sitemap at {} (status {})", sitemap_url, response.status);
        return None;
    }

    let urls = filter_sitemap_urls(parse_urlset_locs(&response.body), origin, max_pages);
    if urls.is_empty() {
        debug!("Sitemap at {} lists no usable URLs", sitemap_url);
        return None;
    }

    info!("Using sitemap {} with {} URLs", sitemap_url, urls.len());
    Some(urls)
}

/// Extract every `<urlset><url><loc>` value.
///
/// A urlset with one entry and one with many both yield a plain sequence;
/// documents that are not a urlset yield an empty one. Parsing stops at the
/// first XML error, keeping the entries read so far.
pub fn parse_urlset_locs(content: &str) -> Vec<String> {
    let mut locs = Vec::new();

    for entity in SiteMapReader::new(content.as_bytes()) {
        match entity {
            SiteMapEntity::Url(entry) => {
                if let Location::Url(url) = entry.loc {
                    locs.push(url.to_string());
                }
            }
            // nested sitemaps are not followed
            SiteMapEntity::SiteMap(_) => {}
            SiteMapEntity::Err(err) => {
                warn!("Malformed sitemap: {}", err);
                break;
            }
        }
    }

    locs
}

/// Keep URLs belonging to `origin`, without fragments or duplicates, truncated
/// to `max_pages`.
pub fn filter_sitemap_urls(locs: Vec<String>, origin: &str, max_pages: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    locs.into_iter()
        .filter_map(|loc| same_origin_url(&loc, origin))
        .filter(|url| seen.insert(url.clone()))
        .take(max_pages)
        .collect()
}
