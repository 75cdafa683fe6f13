//! End-to-end audit: validate, crawl, score

use crate::answerability::{AnswerabilityAnalyzer, PhraseSets};
use crate::config::AuditConfig;
use crate::crawl::Crawler;
use crate::error::Result;
use crate::fetch::{Fetcher, HttpFetcher};
use crate::rules::RuleEngine;
use crate::score::{ScoreReport, Scorer};
use crate::types::CrawlScope;
use crate::url_utils::normalize_seed_url;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Body of an audit request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub url: String,
}

impl AuditRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Successful audit response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Normalized seed URL
    pub url: String,
    pub scope: CrawlScope,
    #[serde(flatten)]
    pub report: ScoreReport,
}

/// Failure response, `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl ToString) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Runs audits. Holds no per-request state, so one instance can serve
/// concurrent requests.
pub struct Auditor<F = HttpFetcher> {
    crawler: Crawler<F>,
    scorer: Scorer,
}

impl Auditor<HttpFetcher> {
    /// Auditor over real HTTP with default phrase sets and rules
    pub fn new(config: AuditConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config.crawl)?;
        Ok(Self::with_fetcher(fetcher, config))
    }
}

impl<F: Fetcher> Auditor<F> {
    pub fn with_fetcher(fetcher: F, config: AuditConfig) -> Self {
        let scorer = Scorer::new(
            AnswerabilityAnalyzer::new(PhraseSets::default(), &config.scoring),
            RuleEngine::default(),
        );
        Self::with_parts(fetcher, config, scorer)
    }

    pub fn with_parts(fetcher: F, config: AuditConfig, scorer: Scorer) -> Self {
        Self {
            crawler: Crawler::new(fetcher, config.crawl),
            scorer,
        }
    }

    /// Run one audit. Only input validation errors are returned; crawl
    /// failures end up in the report.
    pub async fn run(&self, request: &AuditRequest) -> Result<AuditReport> {
        let seed = normalize_seed_url(&request.url)?;
        info!("Auditing {}", seed);

        let outcome = self.crawler.crawl(&seed).await;
        let report = self.scorer.score(
            &outcome.pages,
            &seed,
            &outcome.origin,
            outcome.scope.used_sitemap,
        );

        info!(
            url = %seed,
            overall = %report.grades.overall,
            tier = %report.tier,
            scanned = outcome.scope.scanned_pages,
            sitemap = outcome.scope.used_sitemap,
            duration_ms = outcome.scope.duration_ms,
            "Audit complete"
        );

        Ok(AuditReport {
            url: seed.to_string(),
            scope: outcome.scope,
            report,
        })
    }
}
