//! Breadth-first, time- and count-bounded crawling
//!
//! The crawler:
//! - prefers `/sitemap.xml` and, when it lists in-origin URLs, crawls exactly
//!   those without following links
//! - otherwise starts at the seed and follows same-origin links up to
//!   `max_depth`
//! - fetches in batches of at most `concurrency` requests and waits for the
//!   whole batch before drawing the next one
//! - stops at `max_pages`, at the wall-clock budget, or when the queue empties
//!
//! Failed fetches are recorded as dead pages and never retried.

use crate::config::CrawlConfig;
use crate::fetch::{FetchResult, Fetcher};
use crate::parser::{extract_internal_links, summarize_page};
use crate::sitemap::discover_sitemap;
use crate::types::{CrawlScope, PageRecord, is_ok_status};
use crate::url_utils::origin_of;
use futures::future::join_all;
use std::collections::{HashSet, VecDeque};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Everything one crawl produced
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub pages: Vec<PageRecord>,
    pub scope: CrawlScope,
    pub origin: String,
}

/// Crawler over any `Fetcher`
pub struct Crawler<F> {
    fetcher: F,
    config: CrawlConfig,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    /// Crawl starting from `seed`
    pub async fn crawl(&self, seed: &Url) -> CrawlOutcome {
        let started = Instant::now();
        let deadline = started + self.config.budget();
        let max_pages = self.config.max_pages;
        let seen_cap = self.config.seen_cap();
        // a zero window would never fetch
        let concurrency = self.config.concurrency.max(1);
        let timeout = self.config.fetch_timeout();

        let origin = origin_of(seed);
        let mut seed = seed.clone();
        seed.set_fragment(None);

        let mut queue: VecDeque<(String, u32)> = VecDeque::new();
        let mut seen: HashSet<String> = HashSet::new();

        let sitemap_urls = discover_sitemap(&self.fetcher, &origin, max_pages, timeout).await;
        let used_sitemap = sitemap_urls.is_some();
        let follow_links = !used_sitemap;

        match sitemap_urls {
            Some(urls) => {
                for url in urls {
                    if seen.insert(url.clone()) {
                        queue.push_back((url, 0));
                    }
                }
            }
            None => {
                seen.insert(seed.to_string());
                queue.push_back((seed.to_string(), 0));
            }
        }

        let mut pages: Vec<PageRecord> = Vec::new();

        while !queue.is_empty() && pages.len() < max_pages {
            if Instant::now() >= deadline {
                info!(
                    "Crawl budget of {}ms exhausted after {} pages",
                    self.config.budget_ms,
                    pages.len()
                );
                break;
            }

            let batch_size = concurrency.min(max_pages - pages.len());
            let batch: Vec<(String, u32)> =
                queue.drain(..batch_size.min(queue.len())).collect();

            let results = join_all(
                batch
                    .iter()
                    .map(|(url, _)| self.fetcher.fetch_text(url, timeout)),
            )
            .await;

            for ((url, depth), result) in batch.into_iter().zip(results) {
                if follow_links && depth < self.config.max_depth && is_ok_status(result.status) {
                    for link in extract_internal_links(&result.body, &origin) {
                        if seen.len() >= seen_cap {
                            break;
                        }
                        if seen.insert(link.clone()) {
                            queue.push_back((link, depth + 1));
                        }
                    }
                }
                pages.push(self.record(url, result));
            }
        }

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            "Crawled {} pages from {} in {}ms (sitemap: {})",
            pages.len(),
            origin,
            duration_ms,
            used_sitemap
        );

        CrawlOutcome {
            scope: CrawlScope {
                max_pages,
                scanned_pages: pages.len(),
                used_sitemap,
                duration_ms,
            },
            pages,
            origin,
        }
    }

    fn record(&self, url: String, result: FetchResult) -> PageRecord {
        if !is_ok_status(result.status) {
            warn!("Dead page {} (status {})", url, result.status);
            return PageRecord::dead(url, result.status);
        }

        debug!("Summarizing {} ({} bytes)", url, result.body.len());
        let summary = summarize_page(&result.body, self.config.text_cap);
        PageRecord {
            url,
            status: result.status,
            title: summary.title,
            has_meta_description: summary.has_meta_description,
            has_canonical: summary.has_canonical,
            h1_count: summary.h1_count,
            h2_count: summary.h2_count,
            has_json_ld: summary.has_json_ld,
            text: summary.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpFetcher;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// In-memory site; unknown URLs are 404s
    #[derive(Default)]
    struct StaticSite {
        pages: HashMap<String, FetchResult>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticSite {
        fn page(mut self, url: &str, status: u16, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                FetchResult {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for StaticSite {
        async fn fetch_text(&self, url: &str, _timeout: Duration) -> FetchResult {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().unwrap_or(FetchResult {
                status: 404,
                body: String::new(),
            })
        }
    }

    fn config(max_pages: usize) -> CrawlConfig {
        CrawlConfig {
            max_pages,
            ..CrawlConfig::default()
        }
    }

    fn seed(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[tokio::test]
    async fn follows_links_to_max_depth_without_sitemap() {
        let site = StaticSite::default()
            .page("https://a.test/", 200, r#"<a href="/one">1</a>"#)
            .page("https://a.test/one", 200, r#"<a href="/two">2</a>"#)
            .page("https://a.test/two", 200, r#"<a href="/three">3</a>"#)
            .page("https://a.test/three", 200, "<p>too deep</p>");

        let crawler = Crawler::new(site, config(20));
        let outcome = crawler.crawl(&seed("https://a.test/")).await;

        let urls: Vec<_> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.test/", "https://a.test/one", "https://a.test/two"]);
        assert!(!outcome.scope.used_sitemap);
        assert_eq!(outcome.scope.scanned_pages, 3);
        assert_eq!(outcome.origin, "https://a.test");
    }

    #[tokio::test]
    async fn sitemap_urls_are_crawled_without_link_expansion() {
        let sitemap = "<urlset>\
            <url><loc>https://a.test/x</loc></url>\
            <url><loc>https://a.test/y</loc></url>\
            </urlset>";
        let site = StaticSite::default()
            .page("https://a.test/sitemap.xml", 200, sitemap)
            .page("https://a.test/x", 200, r#"<a href="/not-listed">n</a>"#)
            .page("https://a.test/y", 200, "<p>y</p>");

        let crawler = Crawler::new(site, config(20));
        let outcome = crawler.crawl(&seed("https://a.test/")).await;

        let urls: Vec<_> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.test/x", "https://a.test/y"]);
        assert!(outcome.scope.used_sitemap);
        assert!(
            !crawler
                .fetcher
                .requested()
                .contains(&"https://a.test/not-listed".to_string())
        );
    }

    #[tokio::test]
    async fn empty_sitemap_falls_back_to_seed() {
        let site = StaticSite::default()
            .page("https://a.test/sitemap.xml", 200, "<urlset/>")
            .page("https://a.test/start", 200, "<h1>hi</h1>");

        let crawler = Crawler::new(site, config(20));
        let outcome = crawler.crawl(&seed("https://a.test/start#frag")).await;

        assert!(!outcome.scope.used_sitemap);
        assert_eq!(outcome.pages.len(), 1);
        assert_eq!(outcome.pages[0].url, "https://a.test/start");
        assert_eq!(outcome.pages[0].h1_count, 1);
    }

    #[tokio::test]
    async fn dead_pages_are_recorded_not_retried() {
        let site = StaticSite::default()
            .page("https://a.test/", 200, r#"<a href="/gone">g</a><a href="/down">d</a>"#)
            .page("https://a.test/down", 0, "");

        let crawler = Crawler::new(site, config(20));
        let outcome = crawler.crawl(&seed("https://a.test/")).await;

        let statuses: Vec<_> = outcome.pages.iter().map(|p| (p.url.as_str(), p.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("https://a.test/", 200),
                ("https://a.test/gone", 404),
                ("https://a.test/down", 0),
            ]
        );
        assert_eq!(outcome.pages[1], PageRecord::dead("https://a.test/gone", 404));

        let requested = crawler.fetcher.requested();
        let gone_hits = requested.iter().filter(|u| u.ends_with("/gone")).count();
        assert_eq!(gone_hits, 1);
    }

    #[tokio::test]
    async fn scanned_pages_never_exceed_max_pages() {
        let links: String = (0..30).map(|i| format!(r#"<a href="/p{i}">p</a>"#)).collect();
        let mut site = StaticSite::default().page("https://a.test/", 200, &links);
        for i in 0..30 {
            site = site.page(&format!("https://a.test/p{i}"), 200, "<p>leaf</p>");
        }

        let crawler = Crawler::new(site, config(5));
        let outcome = crawler.crawl(&seed("https://a.test/")).await;

        assert_eq!(outcome.scope.max_pages, 5);
        assert_eq!(outcome.scope.scanned_pages, 5);
        assert_eq!(outcome.pages.len(), 5);
    }

    #[tokio::test]
    async fn seen_set_is_capped() {
        let links: String = (0..30).map(|i| format!(r#"<a href="/p{i}">p</a>"#)).collect();
        let site = StaticSite::default().page("https://a.test/", 200, &links);

        let crawler = Crawler::new(site, config(2));
        crawler.crawl(&seed("https://a.test/")).await;

        // seed plus p0..p4 fill the cap of 3 * 2
        let requested = crawler.fetcher.requested();
        assert!(requested.iter().all(|u| {
            !u.starts_with("https://a.test/p") || u["https://a.test/p".len()..].parse::<u32>().unwrap() < 5
        }));
    }

    #[tokio::test]
    async fn exhausted_budget_stops_before_fetching_pages() {
        let site = StaticSite::default().page("https://a.test/", 200, "<p>hi</p>");
        let crawler = Crawler::new(
            site,
            CrawlConfig {
                budget_ms: 0,
                ..CrawlConfig::default()
            },
        );
        let outcome = crawler.crawl(&seed("https://a.test/")).await;

        assert_eq!(outcome.scope.scanned_pages, 0);
        assert!(outcome.pages.is_empty());
    }

    /// Counts fetches in flight and snapshots completed fetches at each start
    #[derive(Default)]
    struct SlowSite {
        site: StaticSite,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        done: AtomicUsize,
        done_at_start: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Fetcher for SlowSite {
        async fn fetch_text(&self, url: &str, timeout: Duration) -> FetchResult {
            self.done_at_start
                .lock()
                .unwrap()
                .push(self.done.load(Ordering::SeqCst));
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(20)).await;
            let result = self.site.fetch_text(url, timeout).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.done.fetch_add(1, Ordering::SeqCst);
            result
        }
    }

    #[tokio::test]
    async fn fetches_in_bounded_batches() {
        let locs: String = (0..20)
            .map(|i| format!("<url><loc>https://a.test/p{i}</loc></url>"))
            .collect();
        let mut site = StaticSite::default().page(
            "https://a.test/sitemap.xml",
            200,
            &format!("<urlset>{locs}</urlset>"),
        );
        for i in 0..20 {
            site = site.page(&format!("https://a.test/p{i}"), 200, "<p>page</p>");
        }
        let slow = SlowSite {
            site,
            ..SlowSite::default()
        };

        let crawler = Crawler::new(slow, config(20));
        let outcome = crawler.crawl(&seed("https://a.test/")).await;

        assert_eq!(outcome.scope.scanned_pages, 20);
        assert_eq!(crawler.fetcher.peak.load(Ordering::SeqCst), 8);

        // sitemap alone, then batches of 8, 8 and 4 that each wait for the previous one
        let mut expected = vec![0];
        expected.extend([1; 8]);
        expected.extend([9; 8]);
        expected.extend([17; 4]);
        assert_eq!(*crawler.fetcher.done_at_start.lock().unwrap(), expected);
    }

    #[tokio::test]
    async fn zero_concurrency_still_fetches() {
        let site = StaticSite::default().page("https://a.test/", 200, "<p>home</p>");
        let crawler = Crawler::new(
            site,
            CrawlConfig {
                concurrency: 0,
                ..CrawlConfig::default()
            },
        );
        let outcome = crawler.crawl(&seed("https://a.test/")).await;

        assert_eq!(outcome.scope.scanned_pages, 1);
        assert!(outcome.pages[0].is_ok());
    }

    #[tokio::test]
    async fn crawls_a_live_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<html><head><title>Home</title></head><body><a href="/a">a</a><a href="/b">b</a></body></html>"#,
                "text/html",
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(r"^/(a|b)$"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&CrawlConfig::default()).unwrap();
        let crawler = Crawler::new(fetcher, CrawlConfig::default());
        let outcome = crawler.crawl(&seed(&format!("{}/", server.uri()))).await;

        assert_eq!(outcome.scope.scanned_pages, 3);
        assert_eq!(outcome.pages[0].title.as_deref(), Some("Home"));
        assert_eq!(outcome.pages.iter().filter(|p| p.status == 500).count(), 2);
    }
}
