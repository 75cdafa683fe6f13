//! Category scoring, grades and tier recommendation
//!
//! Structure, content and technical scores come from rates over OK pages
//! (status in (0, 400)); only the technical error rate looks at dead pages.
//! AI readiness is the answerability score. The overall grade is the AI
//! readiness grade, not an average of the four categories.

use crate::answerability::{AnswerabilityAnalyzer, AnswerabilityResult, Dimension, DimensionCoverage};
use crate::rules::{Recommendation, RuleEngine, Signals};
use crate::types::{Category, Grade, PageRecord, Tier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Average visible text length (chars) to base content points, first match wins
pub const CONTENT_TEXT_STEPS: [(f64, u32); 3] = [(6000.0, 70), (2500.0, 55), (1200.0, 40)];
/// Base content points below every text step
pub const CONTENT_TEXT_FLOOR: u32 = 20;
/// Average H2 count to bonus content points, first match wins
pub const CONTENT_H2_STEPS: [(f64, u32); 3] = [(6.0, 25), (3.0, 15), (1.0, 5)];

/// A title must be longer than this many characters to count
const MIN_TITLE_CHARS: usize = 2;

/// Answerability coverage at or above which a dimension is a strength
const DIMENSION_STRENGTH: f64 = 0.35;
/// Answerability coverage below which a dimension is a gap
const DIMENSION_GAP: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grades {
    pub ai_readiness: Grade,
    pub structure: Grade,
    pub content_depth: Grade,
    pub technical_readiness: Grade,
    /// Always equal to `ai_readiness`
    pub overall: Grade,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryExplanation {
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanations {
    pub tier_why: Vec<String>,
    pub per_category: BTreeMap<Category, CategoryExplanation>,
}

/// Raw scores behind the grades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugScores {
    pub ai_readiness_score: u32,
    pub structure_score: u32,
    pub content_score: u32,
    pub technical_score: u32,
    pub answerability_dims: DimensionCoverage,
}

/// The engine's final output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub grades: Grades,
    pub tier: Tier,
    pub explanations: Explanations,
    pub recommendations: Vec<Recommendation>,
    #[serde(rename = "_debug")]
    pub debug: DebugScores,
}

/// Rates over a crawl, computed once and shared by scores, explanations and rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRates {
    pub ok_pages: usize,
    pub total_pages: usize,
    pub title_rate: f64,
    pub h1_rate: f64,
    pub meta_rate: f64,
    pub json_ld_rate: f64,
    pub canonical_rate: f64,
    pub error_rate: f64,
    pub avg_text_len: f64,
    pub avg_h2: f64,
}

impl PageRates {
    pub fn from_pages(pages: &[PageRecord]) -> Self {
        let ok: Vec<&PageRecord> = pages.iter().filter(|p| p.is_ok()).collect();
        let n = ok.len().max(1) as f64;
        let rate = |pred: fn(&PageRecord) -> bool| ok.iter().filter(|p| pred(**p)).count() as f64 / n;

        let dead = pages.len() - ok.len();

        Self {
            ok_pages: ok.len(),
            total_pages: pages.len(),
            title_rate: rate(|p| {
                p.title
                    .as_deref()
                    .is_some_and(|t| t.chars().count() > MIN_TITLE_CHARS)
            }),
            h1_rate: rate(|p| p.h1_count >= 1),
            meta_rate: rate(|p| p.has_meta_description),
            json_ld_rate: rate(|p| p.has_json_ld),
            canonical_rate: rate(|p| p.has_canonical),
            error_rate: dead as f64 / pages.len().max(1) as f64,
            avg_text_len: ok.iter().map(|p| p.text.chars().count()).sum::<usize>() as f64 / n,
            avg_h2: ok.iter().map(|p| p.h2_count).sum::<usize>() as f64 / n,
        }
    }

    /// `round(40 * title + 35 * h1 + 25 * meta)`
    pub fn structure_score(&self) -> u32 {
        clamp_score(40.0 * self.title_rate + 35.0 * self.h1_rate + 25.0 * self.meta_rate)
    }

    /// Text-length step plus H2 step
    pub fn content_score(&self) -> u32 {
        let base = step(&CONTENT_TEXT_STEPS, self.avg_text_len).unwrap_or(CONTENT_TEXT_FLOOR);
        let bonus = step(&CONTENT_H2_STEPS, self.avg_h2).unwrap_or(0);
        (base + bonus).min(100)
    }

    /// `round(45 * json_ld + 30 * canonical + 25 * (1 - error_rate))`
    pub fn technical_score(&self) -> u32 {
        clamp_score(
            45.0 * self.json_ld_rate + 30.0 * self.canonical_rate + 25.0 * (1.0 - self.error_rate),
        )
    }
}

fn step(table: &[(f64, u32)], value: f64) -> Option<u32> {
    table
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, points)| *points)
}

fn clamp_score(raw: f64) -> u32 {
    raw.round().clamp(0.0, 100.0) as u32
}

fn pct(rate: f64) -> u32 {
    (rate * 100.0).round() as u32
}

/// Tier from grades: Gold for an A overall, or a B overall backed by non-D
/// technical and content grades; Silver for any other B or a C; else Bronze.
pub fn decide_tier(overall: Grade, technical: Grade, content: Grade) -> Tier {
    match overall {
        Grade::A => Tier::Gold,
        Grade::B if technical != Grade::D && content != Grade::D => Tier::Gold,
        Grade::B | Grade::C => Tier::Silver,
        Grade::D => Tier::Bronze,
    }
}

/// Turns crawl output into a [`ScoreReport`]
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    answerability: AnswerabilityAnalyzer,
    rules: RuleEngine,
}

impl Scorer {
    pub fn new(answerability: AnswerabilityAnalyzer, rules: RuleEngine) -> Self {
        Self { answerability, rules }
    }

    pub fn score(&self, pages: &[PageRecord], seed: &Url, origin: &str, used_sitemap: bool) -> ScoreReport {
        let rates = PageRates::from_pages(pages);
        let ok: Vec<&PageRecord> = pages.iter().filter(|p| p.is_ok()).collect();
        let answerability = self.answerability.compute(&ok, seed, origin);

        let structure_score = rates.structure_score();
        let content_score = rates.content_score();
        let technical_score = rates.technical_score();
        let ai_readiness_score = answerability.score.min(100);

        let ai_grade = Grade::from_score(ai_readiness_score);
        let grades = Grades {
            ai_readiness: ai_grade,
            structure: Grade::from_score(structure_score),
            content_depth: Grade::from_score(content_score),
            technical_readiness: Grade::from_score(technical_score),
            overall: ai_grade,
        };
        let tier = decide_tier(grades.overall, grades.technical_readiness, grades.content_depth);

        let signals = build_signals(&rates, &answerability, pages.len(), used_sitemap);

        ScoreReport {
            grades,
            tier,
            explanations: Explanations {
                tier_why: tier_why(&grades, tier),
                per_category: explain(&rates, &answerability.per_dim),
            },
            recommendations: self.rules.build_recommendations(&signals),
            debug: DebugScores {
                ai_readiness_score,
                structure_score,
                content_score,
                technical_score,
                answerability_dims: answerability.per_dim,
            },
        }
    }
}

pub fn build_signals(
    rates: &PageRates,
    answerability: &AnswerabilityResult,
    scanned_pages: usize,
    used_sitemap: bool,
) -> Signals {
    let dims = &answerability.per_dim;
    Signals {
        ok_pages: rates.ok_pages,
        scanned_pages,
        used_sitemap,
        title_rate: rates.title_rate,
        h1_rate: rates.h1_rate,
        meta_rate: rates.meta_rate,
        json_ld_rate: rates.json_ld_rate,
        canonical_rate: rates.canonical_rate,
        error_rate: rates.error_rate,
        avg_text_len: rates.avg_text_len,
        avg_h2: rates.avg_h2,
        what_rate: dims.what.rate(),
        who_rate: dims.who.rate(),
        how_rate: dims.how.rate(),
        trust_rate: dims.trust.rate(),
    }
}

fn tier_why(grades: &Grades, tier: Tier) -> Vec<String> {
    let mut why = vec![format!(
        "Overall grade {} follows the AI readiness grade.",
        grades.overall
    )];
    match (tier, grades.overall) {
        (Tier::Gold, Grade::A) => {
            why.push("An A in AI readiness qualifies for Gold.".to_string())
        }
        (Tier::Gold, _) => why.push(format!(
            "A B overall with technical readiness {} and content depth {} (neither D) qualifies for Gold.",
            grades.technical_readiness, grades.content_depth
        )),
        (Tier::Silver, Grade::B) => why.push(format!(
            "A B overall qualifies for Silver; Gold needs technical readiness and content depth above D (currently {} and {}).",
            grades.technical_readiness, grades.content_depth
        )),
        (Tier::Silver, _) => {
            why.push("A C overall fits Silver: the foundations exist but need ongoing work.".to_string())
        }
        (Tier::Bronze, _) => why.push(
            "A D overall points to Bronze: start with the high-priority fixes.".to_string(),
        ),
    }
    why
}

fn explain(rates: &PageRates, dims: &DimensionCoverage) -> BTreeMap<Category, CategoryExplanation> {
    let mut map = BTreeMap::new();
    map.insert(Category::AiReadiness, explain_ai(dims));
    map.insert(Category::Structure, explain_structure(rates));
    map.insert(Category::ContentDepth, explain_content(rates));
    map.insert(Category::TechnicalReadiness, explain_technical(rates));
    map
}

fn dimension_copy(dimension: Dimension) -> (&'static str, &'static str) {
    match dimension {
        Dimension::What => (
            "what you offer",
            "Lead key pages with a one-sentence statement of what you provide.",
        ),
        Dimension::Who => (
            "who you serve",
            "Name the customers you serve on service and landing pages.",
        ),
        Dimension::How => (
            "how it works",
            "Describe your process in numbered steps with a clear next action.",
        ),
        Dimension::Trust => (
            "why you can be trusted",
            "Show reviews, case studies and credentials near your offers.",
        ),
    }
}

fn explain_ai(dims: &DimensionCoverage) -> CategoryExplanation {
    let mut out = CategoryExplanation::default();
    for dimension in Dimension::ALL {
        let rate = dims.get(dimension).rate();
        let (topic, fix) = dimension_copy(dimension);
        if rate >= DIMENSION_STRENGTH {
            out.strengths
                .push(format!("{}% of pages state {}.", pct(rate), topic));
        } else if rate < DIMENSION_GAP {
            out.gaps
                .push(format!("Only {}% of pages state {}.", pct(rate), topic));
            out.improvements.push(fix.to_string());
        }
    }
    if out.improvements.is_empty() {
        out.improvements
            .push("Keep answers explicit and consistent as new pages are added.".to_string());
    }
    out
}

fn explain_structure(rates: &PageRates) -> CategoryExplanation {
    let mut out = CategoryExplanation::default();
    let checks = [
        (
            rates.title_rate,
            "pages have a descriptive title",
            "Write a unique <title> for every page.",
        ),
        (
            rates.h1_rate,
            "pages have an H1",
            "Give each page exactly one <h1> naming its topic.",
        ),
        (
            rates.meta_rate,
            "pages have a meta description",
            "Add a short meta description summarizing each page.",
        ),
    ];
    for (rate, what, fix) in checks {
        if rate >= 0.9 {
            out.strengths.push(format!("{}% of {}.", pct(rate), what));
        } else if rate < 0.6 {
            out.gaps.push(format!("Only {}% of {}.", pct(rate), what));
            out.improvements.push(fix.to_string());
        }
    }
    if out.improvements.is_empty() {
        out.improvements
            .push("Keep titles, headings and descriptions unique per page.".to_string());
    }
    out
}

fn explain_content(rates: &PageRates) -> CategoryExplanation {
    let mut out = CategoryExplanation::default();
    let avg_len = rates.avg_text_len.round() as u64;

    if rates.avg_text_len >= 2500.0 {
        out.strengths
            .push(format!("Pages average {avg_len} characters of text."));
    } else if rates.avg_text_len < 1200.0 {
        out.gaps
            .push(format!("Pages average only {avg_len} characters of text."));
        out.improvements
            .push("Expand thin pages with concrete answers to customer questions.".to_string());
    }

    if rates.avg_h2 >= 3.0 {
        out.strengths
            .push(format!("Pages average {:.1} H2 sections.", rates.avg_h2));
    } else if rates.avg_h2 < 1.0 {
        out.gaps
            .push("Most pages have no H2 sections.".to_string());
        out.improvements
            .push("Break long content into sections under descriptive H2 headings.".to_string());
    }

    if out.improvements.is_empty() {
        out.improvements
            .push("Add FAQ-style sections to the pages customers visit most.".to_string());
    }
    out
}

fn explain_technical(rates: &PageRates) -> CategoryExplanation {
    let mut out = CategoryExplanation::default();

    if rates.json_ld_rate >= 0.5 {
        out.strengths
            .push(format!("{}% of pages carry JSON-LD.", pct(rates.json_ld_rate)));
    } else if rates.json_ld_rate < 0.2 {
        out.gaps
            .push(format!("Only {}% of pages carry JSON-LD.", pct(rates.json_ld_rate)));
        out.improvements
            .push("Add Organization and Service structured data.".to_string());
    }

    if rates.canonical_rate >= 0.8 {
        out.strengths.push(format!(
            "{}% of pages declare a canonical URL.",
            pct(rates.canonical_rate)
        ));
    } else if rates.canonical_rate < 0.5 {
        out.gaps.push(format!(
            "Only {}% of pages declare a canonical URL.",
            pct(rates.canonical_rate)
        ));
        out.improvements
            .push("Add rel=\"canonical\" links to every page.".to_string());
    }

    if rates.total_pages > 0 && rates.error_rate == 0.0 {
        out.strengths
            .push("Every crawled URL responded without errors.".to_string());
    } else if rates.error_rate > 0.1 {
        out.gaps.push(format!(
            "{}% of crawled URLs failed or returned errors.",
            pct(rates.error_rate)
        ));
        out.improvements
            .push("Fix or redirect broken URLs and update links to them.".to_string());
    }

    if out.improvements.is_empty() {
        out.improvements
            .push("Validate structured data whenever templates change.".to_string());
    }
    out
}
