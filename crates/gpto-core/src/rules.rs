//! Recommendation rules
//!
//! A rule is a pure predicate over aggregate [`Signals`] plus the text shown
//! when it fires. The engine evaluates every rule in declaration order and
//! stable-sorts the fired ones by priority, so equal-priority items keep the
//! order in which their rules were declared.

use crate::types::{Category, Priority};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate rates a rule can look at
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
    pub ok_pages: usize,
    pub scanned_pages: usize,
    pub used_sitemap: bool,
    pub title_rate: f64,
    pub h1_rate: f64,
    pub meta_rate: f64,
    pub json_ld_rate: f64,
    pub canonical_rate: f64,
    pub error_rate: f64,
    pub avg_text_len: f64,
    pub avg_h2: f64,
    pub what_rate: f64,
    pub who_rate: f64,
    pub how_rate: f64,
    pub trust_rate: f64,
}

/// One declarative recommendation rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: &'static str,
    pub category: Category,
    pub priority: Priority,
    pub applies: fn(&Signals) -> bool,
    pub title: &'static str,
    pub why: fn(&Signals) -> String,
    pub how: &'static str,
    /// Names looked up in the [`SourceTable`]
    pub sources: &'static [&'static str],
}

/// A fired rule, ready to show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub category: Category,
    pub priority: Priority,
    pub title: String,
    pub why: String,
    pub how: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

/// Reference name to URL lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable(HashMap<&'static str, &'static str>);

impl SourceTable {
    pub fn new(entries: &[(&'static str, &'static str)]) -> Self {
        Self(entries.iter().copied().collect())
    }

    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.0.get(name).copied()
    }

    /// URLs for `names`, silently skipping unknown names
    pub fn resolve(&self, names: &[&str]) -> Vec<String> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .map(str::to_string)
            .collect()
    }
}

impl Default for SourceTable {
    fn default() -> Self {
        Self::new(&[
            ("schema-org", "https://schema.org/docs/gs.html"),
            (
                "google-structured-data",
                "https://developers.google.com/search/docs/appearance/structured-data/intro-structured-data",
            ),
            (
                "google-title-links",
                "https://developers.google.com/search/docs/appearance/title-link",
            ),
            (
                "google-snippets",
                "https://developers.google.com/search/docs/appearance/snippet",
            ),
            (
                "google-canonical",
                "https://developers.google.com/search/docs/crawling-indexing/consolidate-duplicate-urls",
            ),
            (
                "google-helpful-content",
                "https://developers.google.com/search/docs/fundamentals/creating-helpful-content",
            ),
            ("sitemaps-protocol", "https://www.sitemaps.org/protocol.html"),
            (
                "mdn-headings",
                "https://developer.mozilla.org/en-US/docs/Web/HTML/Element/Heading_Elements",
            ),
        ])
    }
}

fn pct(rate: f64) -> u32 {
    (rate * 100.0).round() as u32
}

/// The stock rule list, in declaration order
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            id: "ai-what-clarity",
            category: Category::AiReadiness,
            priority: Priority::High,
            applies: |s| s.what_rate < 0.35,
            title: "State plainly what you offer",
            why: |s| {
                format!(
                    "Only {}% of scanned pages say in plain words what you do; answer engines quote explicit statements.",
                    pct(s.what_rate)
                )
            },
            how: "Open key pages with one sentence such as \"We provide X for Y\" and repeat it on service pages.",
            sources: &["google-helpful-content"],
        },
        Rule {
            id: "ai-trust-signals",
            category: Category::AiReadiness,
            priority: Priority::High,
            applies: |s| s.trust_rate < 0.2,
            title: "Add visible trust signals",
            why: |s| {
                format!(
                    "Trust evidence (reviews, case studies, certifications) appears on {}% of pages.",
                    pct(s.trust_rate)
                )
            },
            how: "Publish testimonials, case studies and credentials on service and about pages.",
            sources: &["google-helpful-content"],
        },
        Rule {
            id: "structure-titles",
            category: Category::Structure,
            priority: Priority::High,
            applies: |s| s.title_rate < 0.9,
            title: "Give every page a descriptive title",
            why: |s| format!("{}% of pages have a usable <title>.", pct(s.title_rate)),
            how: "Write a unique, specific <title> for each page that names the topic and the brand.",
            sources: &["google-title-links"],
        },
        Rule {
            id: "tech-json-ld",
            category: Category::TechnicalReadiness,
            priority: Priority::High,
            applies: |s| s.json_ld_rate < 0.5,
            title: "Add JSON-LD structured data",
            why: |s| {
                format!(
                    "Only {}% of pages carry JSON-LD, so machines must guess what entities the site describes.",
                    pct(s.json_ld_rate)
                )
            },
            how: "Add Organization, Service or Product markup in <script type=\"application/ld+json\"> blocks.",
            sources: &["schema-org", "google-structured-data"],
        },
        Rule {
            id: "tech-broken-pages",
            category: Category::TechnicalReadiness,
            priority: Priority::High,
            applies: |s| s.error_rate > 0.05,
            title: "Fix broken pages",
            why: |s| {
                format!(
                    "{}% of crawled URLs failed or returned an error status.",
                    pct(s.error_rate)
                )
            },
            how: "Repair or redirect failing URLs and remove links that point at them.",
            sources: &[],
        },
        Rule {
            id: "ai-who-audience",
            category: Category::AiReadiness,
            priority: Priority::Medium,
            applies: |s| s.who_rate < 0.35,
            title: "Say who you serve",
            why: |s| {
                format!(
                    "Audience statements appear on {}% of pages.",
                    pct(s.who_rate)
                )
            },
            how: "Name your ideal customers explicitly, e.g. \"built for dental practices in Ohio\".",
            sources: &["google-helpful-content"],
        },
        Rule {
            id: "ai-how-process",
            category: Category::AiReadiness,
            priority: Priority::Medium,
            applies: |s| s.how_rate < 0.35,
            title: "Explain how working with you works",
            why: |s| {
                format!(
                    "Process or next-step language appears on {}% of pages.",
                    pct(s.how_rate)
                )
            },
            how: "Add a short \"How it works\" section with numbered steps and a clear call to action.",
            sources: &[],
        },
        Rule {
            id: "structure-h1",
            category: Category::Structure,
            priority: Priority::Medium,
            applies: |s| s.h1_rate < 0.8,
            title: "Use one clear H1 per page",
            why: |s| format!("{}% of pages have an <h1>.", pct(s.h1_rate)),
            how: "Give each page a single <h1> that states the page topic.",
            sources: &["mdn-headings"],
        },
        Rule {
            id: "structure-meta-description",
            category: Category::Structure,
            priority: Priority::Medium,
            applies: |s| s.meta_rate < 0.7,
            title: "Write meta descriptions",
            why: |s| format!("{}% of pages have a meta description.", pct(s.meta_rate)),
            how: "Add a one or two sentence <meta name=\"description\"> summary to every page.",
            sources: &["google-snippets"],
        },
        Rule {
            id: "content-depth",
            category: Category::ContentDepth,
            priority: Priority::Medium,
            applies: |s| s.avg_text_len < 2500.0 || s.avg_h2 < 3.0,
            title: "Deepen page content",
            why: |s| {
                format!(
                    "Pages average {} characters of text and {:.1} H2 sections.",
                    s.avg_text_len.round() as u64,
                    s.avg_h2
                )
            },
            how: "Expand core pages with sectioned answers to common customer questions under descriptive H2s.",
            sources: &["google-helpful-content", "mdn-headings"],
        },
        Rule {
            id: "tech-canonical",
            category: Category::TechnicalReadiness,
            priority: Priority::Low,
            applies: |s| s.canonical_rate < 0.8,
            title: "Declare canonical URLs",
            why: |s| format!("{}% of pages declare a canonical URL.", pct(s.canonical_rate)),
            how: "Add <link rel=\"canonical\"> pointing at the preferred URL of each page.",
            sources: &["google-canonical"],
        },
        Rule {
            id: "tech-sitemap",
            category: Category::TechnicalReadiness,
            priority: Priority::Low,
            applies: |s| !s.used_sitemap,
            title: "Publish a sitemap.xml",
            why: |_| "No usable /sitemap.xml was found, so crawlers must discover pages through links.".to_string(),
            how: "Generate /sitemap.xml listing every canonical page and reference it from robots.txt.",
            sources: &["sitemaps-protocol"],
        },
    ]
}

/// Evaluates an injected rule list against signals
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    sources: SourceTable,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(default_rules(), SourceTable::default())
    }
}

impl RuleEngine {
    pub fn new(rules: Vec<Rule>, sources: SourceTable) -> Self {
        Self { rules, sources }
    }

    /// Fire every applicable rule once, high priority first
    pub fn build_recommendations(&self, signals: &Signals) -> Vec<Recommendation> {
        let mut fired: Vec<Recommendation> = self
            .rules
            .iter()
            .filter(|rule| (rule.applies)(signals))
            .map(|rule| {
                let sources = self.sources.resolve(rule.sources);
                Recommendation {
                    id: rule.id.to_string(),
                    category: rule.category,
                    priority: rule.priority,
                    title: rule.title.to_string(),
                    why: (rule.why)(signals),
                    how: rule.how.to_string(),
                    sources: if sources.is_empty() { None } else { Some(sources) },
                }
            })
            .collect();

        // sort_by_key is stable
        fired.sort_by_key(|r| r.priority);
        fired
    }
}
