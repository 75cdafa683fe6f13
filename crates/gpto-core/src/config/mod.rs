//! Configuration for the audit engine
//!
//! Handles loading configuration from TOML files. Every field has a default,
//! so a partial file (or no file at all) yields a working configuration.

mod defaults;

pub use defaults::*;

use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Crawl limits
    #[serde(default)]
    pub crawl: CrawlConfig,

    /// Scoring knobs
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Crawl limits and HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Hard cap on pages fetched per audit
    #[serde(default = "default_crawl_max_pages")]
    pub max_pages: usize,

    /// Maximum link depth from the seed URL (ignored for sitemap crawls)
    #[serde(default = "default_crawl_max_depth")]
    pub max_depth: u32,

    /// Fetches in flight per batch
    #[serde(default = "default_crawl_concurrency")]
    pub concurrency: usize,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_crawl_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Wall-clock budget for the whole crawl in milliseconds
    #[serde(default = "default_crawl_budget_ms")]
    pub budget_ms: u64,

    /// Maximum characters of visible text kept per page
    #[serde(default = "default_crawl_text_cap")]
    pub text_cap: usize,

    /// The seen set stops growing at `seen_cap_factor * max_pages` URLs
    #[serde(default = "default_crawl_seen_cap_factor")]
    pub seen_cap_factor: usize,

    /// User agent string
    #[serde(default = "default_crawl_user_agent")]
    pub user_agent: String,
}

/// Answerability scoring knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Coverage fraction at which a dimension earns its full 25 points
    #[serde(default = "default_answerability_target")]
    pub answerability_target: f64,

    /// Characters of title plus body text scanned per page
    #[serde(default = "default_answerability_text_cap")]
    pub answerability_text_cap: usize,

    /// Bonus per WHAT/HOW match on the homepage
    #[serde(default = "default_homepage_bonus")]
    pub homepage_bonus: u32,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: default_crawl_max_pages(),
            max_depth: default_crawl_max_depth(),
            concurrency: default_crawl_concurrency(),
            fetch_timeout_ms: default_crawl_fetch_timeout_ms(),
            budget_ms: default_crawl_budget_ms(),
            text_cap: default_crawl_text_cap(),
            seen_cap_factor: default_crawl_seen_cap_factor(),
            user_agent: default_crawl_user_agent(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            answerability_target: default_answerability_target(),
            answerability_text_cap: default_answerability_text_cap(),
            homepage_bonus: default_homepage_bonus(),
        }
    }
}

impl CrawlConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }

    /// Upper bound on distinct URLs remembered during one crawl
    pub fn seen_cap(&self) -> usize {
        self.max_pages.saturating_mul(self.seen_cap_factor)
    }
}

impl AuditConfig {
    /// Load configuration from a TOML file
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);
        let content = std::fs::read_to_string(config_path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AuditConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.crawl.max_pages == 0 {
            return Err(AuditError::Config("crawl.max_pages must be > 0".to_string()));
        }
        if self.crawl.concurrency == 0 {
            return Err(AuditError::Config("crawl.concurrency must be > 0".to_string()));
        }
        if self.crawl.seen_cap_factor == 0 {
            return Err(AuditError::Config(
                "crawl.seen_cap_factor must be > 0".to_string(),
            ));
        }
        if !(self.scoring.answerability_target > 0.0 && self.scoring.answerability_target <= 1.0)
        {
            return Err(AuditError::Config(
                "scoring.answerability_target must be in (0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}
