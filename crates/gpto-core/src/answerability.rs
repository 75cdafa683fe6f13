//! Answerability heuristics
//!
//! Checks whether page text plainly states what a business does, who it
//! serves, how it works and why it can be trusted. Each dimension is a list
//! of lowercase phrases; a page covers a dimension when any phrase appears in
//! its title plus body text. This is a heuristic over wording, not a measure
//! of how an AI system would actually answer questions about the site.

use crate::config::ScoringConfig;
use crate::parser::truncate_chars;
use crate::types::PageRecord;
use serde::{Deserialize, Serialize};
use url::Url;

/// Points each dimension can contribute
const DIMENSION_POINTS: f64 = 25.0;

/// The four answerability dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    What,
    Who,
    How,
    Trust,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::What,
        Dimension::Who,
        Dimension::How,
        Dimension::Trust,
    ];
}

/// Phrase lists per dimension, all lowercase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseSets {
    pub what: Vec<String>,
    pub who: Vec<String>,
    pub how: Vec<String>,
    pub trust: Vec<String>,
}

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|p| p.to_string()).collect()
}

impl Default for PhraseSets {
    fn default() -> Self {
        Self {
            what: phrases(&[
                "we offer",
                "we provide",
                "we help",
                "we specialize",
                "we specialise",
                "what we do",
                "our services",
                "our products",
                "services include",
                "solutions for",
                "we build",
                "we deliver",
            ]),
            who: phrases(&[
                "for businesses",
                "for small business",
                "for teams",
                "for companies",
                "for homeowners",
                "for families",
                "our clients",
                "our customers",
                "who we serve",
                "who we help",
                "designed for",
                "built for",
                "ideal for",
            ]),
            how: phrases(&[
                "how it works",
                "how we work",
                "our process",
                "step 1",
                "step one",
                "getting started",
                "get started",
                "the process",
                "book a call",
                "request a quote",
            ]),
            trust: phrases(&[
                "testimonial",
                "case study",
                "case studies",
                "reviews",
                "trusted by",
                "certified",
                "accredited",
                "award",
                "years of experience",
                "guarantee",
                "licensed",
                "insured",
            ]),
        }
    }
}

impl PhraseSets {
    pub fn get(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::What => &self.what,
            Dimension::Who => &self.who,
            Dimension::How => &self.how,
            Dimension::Trust => &self.trust,
        }
    }

    /// Whether lowercased `text` contains any phrase of `dimension`
    pub fn matches(&self, dimension: Dimension, text: &str) -> bool {
        self.get(dimension).iter().any(|p| text.contains(p.as_str()))
    }
}

/// Pages covering a dimension out of all OK pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub count: usize,
    pub total: usize,
}

impl Coverage {
    pub fn rate(&self) -> f64 {
        self.count as f64 / self.total.max(1) as f64
    }
}

/// Coverage of every dimension; `total` is identical across all four
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCoverage {
    pub what: Coverage,
    pub who: Coverage,
    pub how: Coverage,
    pub trust: Coverage,
}

impl DimensionCoverage {
    pub fn get(&self, dimension: Dimension) -> Coverage {
        match dimension {
            Dimension::What => self.what,
            Dimension::Who => self.who,
            Dimension::How => self.how,
            Dimension::Trust => self.trust,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerabilityResult {
    /// Composite score in 0..=100
    pub score: u32,
    pub per_dim: DimensionCoverage,
}

/// Scores answerability over a set of OK pages
#[derive(Debug, Clone)]
pub struct AnswerabilityAnalyzer {
    phrases: PhraseSets,
    target: f64,
    text_cap: usize,
    homepage_bonus: u32,
}

impl Default for AnswerabilityAnalyzer {
    fn default() -> Self {
        Self::new(PhraseSets::default(), &ScoringConfig::default())
    }
}

impl AnswerabilityAnalyzer {
    pub fn new(phrases: PhraseSets, config: &ScoringConfig) -> Self {
        Self {
            phrases,
            target: config.answerability_target,
            text_cap: config.answerability_text_cap,
            homepage_bonus: config.homepage_bonus,
        }
    }

    /// Points one dimension earns at coverage `rate`:
    /// `round(25 * min(1, rate / target))`
    pub fn dimension_score(&self, rate: f64) -> u32 {
        let normalized = (rate / self.target).min(1.0);
        (DIMENSION_POINTS * normalized).round() as u32
    }

    /// Lowercased title plus body text, capped
    fn page_text(&self, page: &PageRecord) -> String {
        let combined = match &page.title {
            Some(title) => format!("{} {}", title, page.text),
            None => page.text.clone(),
        };
        truncate_chars(&combined, self.text_cap).to_lowercase()
    }

    /// Score `ok_pages` for the audit of `seed` at `origin`
    pub fn compute(&self, ok_pages: &[&PageRecord], seed: &Url, origin: &str) -> AnswerabilityResult {
        let total = ok_pages.len().max(1);
        let texts: Vec<String> = ok_pages.iter().map(|p| self.page_text(p)).collect();

        let coverage = |dimension: Dimension| Coverage {
            count: texts
                .iter()
                .filter(|t| self.phrases.matches(dimension, t))
                .count(),
            total,
        };
        let per_dim = DimensionCoverage {
            what: coverage(Dimension::What),
            who: coverage(Dimension::Who),
            how: coverage(Dimension::How),
            trust: coverage(Dimension::Trust),
        };

        let base: u32 = Dimension::ALL
            .iter()
            .map(|d| self.dimension_score(per_dim.get(*d).rate()))
            .sum();

        let bonus = self.homepage_bonus(ok_pages, &texts, seed, origin);

        AnswerabilityResult {
            score: (base + bonus).min(100),
            per_dim,
        }
    }

    /// Bonus for a homepage that states WHAT and/or HOW
    fn homepage_bonus(&self, ok_pages: &[&PageRecord], texts: &[String], seed: &Url, origin: &str) -> u32 {
        let candidates = [
            seed.as_str().to_string(),
            origin.to_string(),
            format!("{origin}/"),
            format!("{origin}/home"),
        ];

        let Some(index) = ok_pages
            .iter()
            .position(|p| candidates.iter().any(|c| c == &p.url))
        else {
            return 0;
        };

        let text = &texts[index];
        [Dimension::What, Dimension::How]
            .iter()
            .filter(|d| self.phrases.matches(**d, text))
            .count() as u32
            * self.homepage_bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, text: &str) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            status: 200,
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn seed() -> Url {
        Url::parse("https://acme.test/").unwrap()
    }

    #[test]
    fn dimension_score_formula() {
        let analyzer = AnswerabilityAnalyzer::default();
        assert_eq!(analyzer.dimension_score(0.0), 0);
        assert_eq!(analyzer.dimension_score(0.35), 25);
        assert_eq!(analyzer.dimension_score(1.0), 25);
        // 0.1 / 0.35 * 25 = 7.14
        assert_eq!(analyzer.dimension_score(0.1), 7);
        // 0.2 / 0.35 * 25 = 14.29
        assert_eq!(analyzer.dimension_score(0.2), 14);
    }

    #[test]
    fn only_what_matches_on_ten_pages() {
        let pages: Vec<PageRecord> = (0..10)
            .map(|i| page(&format!("https://acme.test/p{i}"), "We offer plumbing."))
            .collect();
        let refs: Vec<&PageRecord> = pages.iter().collect();

        let result = AnswerabilityAnalyzer::default().compute(&refs, &seed(), "https://acme.test");

        assert_eq!(result.per_dim.what, Coverage { count: 10, total: 10 });
        assert_eq!(result.per_dim.who.count, 0);
        assert_eq!(result.per_dim.how.count, 0);
        assert_eq!(result.per_dim.trust.count, 0);
        assert_eq!(result.score, 25);
    }

    #[test]
    fn homepage_bonus_for_what_and_how() {
        let pages = [
            page("https://acme.test/", "We offer plumbing. How it works: call us."),
            page("https://acme.test/about", "About the team."),
        ];
        let refs: Vec<&PageRecord> = pages.iter().collect();

        let result = AnswerabilityAnalyzer::default().compute(&refs, &seed(), "https://acme.test");

        // what 1/2 and how 1/2 both exceed the target: 25 + 25, plus 3 + 3
        assert_eq!(result.score, 56);
    }

    #[test]
    fn homepage_bonus_matches_home_path() {
        let pages = [page("https://acme.test/home", "We offer plumbing.")];
        let refs: Vec<&PageRecord> = pages.iter().collect();
        let other_seed = Url::parse("https://acme.test/landing").unwrap();

        let result =
            AnswerabilityAnalyzer::default().compute(&refs, &other_seed, "https://acme.test");
        assert_eq!(result.score, 28);
    }

    #[test]
    fn score_is_capped_at_100() {
        let text = "we offer x for businesses. how it works. trusted by many.";
        let pages = [page("https://acme.test/", text)];
        let refs: Vec<&PageRecord> = pages.iter().collect();

        let result = AnswerabilityAnalyzer::default().compute(&refs, &seed(), "https://acme.test");
        assert_eq!(result.score, 100);
    }

    #[test]
    fn no_pages_gives_zero_with_nonzero_total() {
        let result = AnswerabilityAnalyzer::default().compute(&[], &seed(), "https://acme.test");
        assert_eq!(result.score, 0);
        assert_eq!(result.per_dim.what.total, 1);
        assert_eq!(result.per_dim.trust.total, 1);
    }

    #[test]
    fn title_counts_and_matching_is_case_insensitive() {
        let mut p = page("https://acme.test/x", "nothing here");
        p.title = Some("Case Study: Big Win".to_string());
        let refs = vec![&p];

        let result = AnswerabilityAnalyzer::default().compute(&refs, &seed(), "https://acme.test");
        assert_eq!(result.per_dim.trust.count, 1);
    }

    #[test]
    fn text_beyond_cap_is_ignored() {
        let config = ScoringConfig {
            answerability_text_cap: 20,
            ..ScoringConfig::default()
        };
        let analyzer = AnswerabilityAnalyzer::new(PhraseSets::default(), &config);
        let text = format!("{} we offer", "x".repeat(30));
        let pages = [page("https://acme.test/x", &text)];
        let refs: Vec<&PageRecord> = pages.iter().collect();

        let result = analyzer.compute(&refs, &seed(), "https://acme.test");
        assert_eq!(result.per_dim.what.count, 0);
    }

    #[test]
    fn injected_phrase_sets_are_used() {
        let phrases = PhraseSets {
            what: vec!["widgets".to_string()],
            who: vec![],
            how: vec![],
            trust: vec![],
        };
        let analyzer = AnswerabilityAnalyzer::new(phrases, &ScoringConfig::default());
        let pages = [page("https://acme.test/x", "Widgets galore")];
        let refs: Vec<&PageRecord> = pages.iter().collect();

        let result = analyzer.compute(&refs, &seed(), "https://acme.test");
        assert_eq!(result.per_dim.what.count, 1);
        assert_eq!(result.score, 25);
    }
}
