//! # gpto-core
//!
//! Audit engine that grades how well a website answers the questions an AI
//! assistant would ask about a business.
//!
//! This library provides:
//! - A bounded breadth-first crawler that prefers `/sitemap.xml`
//! - Per-page signal extraction (title, meta description, headings, JSON-LD)
//! - Answerability scoring over WHAT / WHO / HOW / TRUST phrase sets
//! - Category grades, a tier recommendation and prioritized recommendations
//!
//! ## Example
//!
//! ```no_run
//! use gpto_core::{AuditConfig, AuditRequest, Auditor};
//!
//! # async fn example() -> gpto_core::Result<()> {
//! let auditor = Auditor::new(AuditConfig::default())?;
//! let report = auditor.run(&AuditRequest::new("example.com")).await?;
//! println!("{} / {}", report.report.grades.overall, report.report.tier);
//! # Ok(())
//! # }
//! ```

pub mod answerability;
pub mod audit;
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod rules;
pub mod score;
pub mod sitemap;
pub mod types;
pub mod url_utils;

// Re-export commonly used types
pub use answerability::{AnswerabilityAnalyzer, PhraseSets};
pub use audit::{AuditReport, AuditRequest, Auditor, ErrorBody};
pub use config::AuditConfig;
pub use error::{AuditError, Result};
pub use fetch::{FetchResult, Fetcher, HttpFetcher};
pub use rules::{Recommendation, RuleEngine, Signals};
pub use score::{ScoreReport, Scorer};
pub use types::{Category, CrawlScope, Grade, PageRecord, Priority, Tier};
