//! Default values for configuration

/// Default hard cap on pages fetched per audit
pub fn default_crawl_max_pages() -> usize {
    20
}

/// Default link-following depth when no sitemap is found
pub fn default_crawl_max_depth() -> u32 {
    2
}

/// Default number of fetches in flight per batch
pub fn default_crawl_concurrency() -> usize {
    8
}

/// Default per-request timeout in milliseconds
pub fn default_crawl_fetch_timeout_ms() -> u64 {
    6_000
}

/// Default wall-clock budget for one crawl in milliseconds
pub fn default_crawl_budget_ms() -> u64 {
    20_000
}

/// Default cap on stored visible text per page, in characters
pub fn default_crawl_text_cap() -> usize {
    20_000
}

/// Seen-set cap expressed as a multiple of `max_pages`
pub fn default_crawl_seen_cap_factor() -> usize {
    3
}

/// Default user agent sent with every request
pub fn default_crawl_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; gpto-audit/{}; +https://gpto.ai)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Fraction of pages a dimension must cover to earn its full share
pub fn default_answerability_target() -> f64 {
    0.35
}

/// Characters of title plus body text scanned per page
pub fn default_answerability_text_cap() -> usize {
    12_000
}

/// Points added per homepage dimension match (WHAT, HOW)
pub fn default_homepage_bonus() -> u32 {
    3
}
