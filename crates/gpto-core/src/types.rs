//! Common types used across the audit engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// One crawled URL's observation.
///
/// Dead pages (`status == 0` or `status >= 400`) carry only `url` and `status`;
/// every other field stays at its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: String,
    /// HTTP status code, `0` for network failure or timeout
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub has_meta_description: bool,
    pub has_canonical: bool,
    pub h1_count: usize,
    pub h2_count: usize,
    pub has_json_ld: bool,
    pub text: String,
}

impl PageRecord {
    /// Record for a page that failed or returned an error status
    pub fn dead(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            ..Default::default()
        }
    }

    /// Reachable and not an error: status in (0, 400)
    pub fn is_ok(&self) -> bool {
        is_ok_status(self.status)
    }
}

/// Status in (0, 400)
pub fn is_ok_status(status: u16) -> bool {
    status > 0 && status < 400
}

/// Metadata about one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlScope {
    pub max_pages: usize,
    pub scanned_pages: usize,
    pub used_sitemap: bool,
    pub duration_ms: u64,
}

/// Letter grade shared by every category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Map a 0-100 score onto a letter: >=85 A, >=70 B, >=50 C, else D
    pub fn from_score(score: u32) -> Self {
        if score >= 85 {
            Grade::A
        } else if score >= 70 {
            Grade::B
        } else if score >= 50 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended subscription package, ordered Bronze < Silver < Gold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
        };
        f.write_str(name)
    }
}

/// Recommendation priority. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Scored category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    AiReadiness,
    Structure,
    ContentDepth,
    TechnicalReadiness,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::AiReadiness,
        Category::Structure,
        Category::ContentDepth,
        Category::TechnicalReadiness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::AiReadiness => "AI readiness",
            Category::Structure => "Structure",
            Category::ContentDepth => "Content depth",
            Category::TechnicalReadiness => "Technical readiness",
        }
    }
}
