//! Keyword rubric: the deterministic scorer.
//!
//! Pure and total: no I/O, never fails, handles the empty answer.
//!
//! Dimensions (each normalized from 0–100 onto 0–5):
//! - accuracy: share of required concepts fuzzily present
//! - completeness: 70% concept coverage + 10 per bonus term (max 3)
//! - clarity: 12 per sentence, floored at 1.2 for any non-empty answer
//! - depth: 20 per advanced-feature keyword literally present

use crate::models::question::QuestionRecord;
use crate::models::score::{round2, Rationale, ScoreResult, ScoringWeights, MAX_SCORE};
use crate::scoring::fuzzy::keyword_hit;

/// Advanced spreadsheet features that earn depth credit.
pub const MODERN_FEATURES: &[&str] = &[
    "xlookup",
    "dynamic array",
    "filter",
    "unique",
    "power query",
    "lambda",
    "let",
    "sumifs",
    "dax",
    "power pivot",
];

pub const DEFAULT_HIT_THRESHOLD: f64 = 68.0;
const MAX_BONUS_TERMS: usize = 3;
const NON_EMPTY_CLARITY_FLOOR: f64 = 1.2;
/// Fuzzy matching is quadratic in the answer length; text past this point is
/// not scored.
pub const MAX_SCORED_CHARS: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Fuzzy similarity (0–100) a concept needs to count as present.
    pub hit_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            hit_threshold: DEFAULT_HIT_THRESHOLD,
        }
    }
}

/// Maps a 0–100 raw value onto the 0–5 scale, rounded to 2 decimals.
fn normalize(raw: f64) -> f64 {
    round2(raw.clamp(0.0, 100.0) / 100.0 * MAX_SCORE)
}

pub fn score_keyword(answer: &str, question: &QuestionRecord, config: &ScoringConfig) -> ScoreResult {
    let ans: String = answer
        .trim()
        .to_lowercase()
        .chars()
        .take(MAX_SCORED_CHARS)
        .collect();

    let hits = question
        .concepts_required
        .iter()
        .filter(|term| keyword_hit(&ans, term, config.hit_threshold))
        .count();
    let required = question.concepts_required.len().max(1);
    let coverage = hits as f64 / required as f64;
    let accuracy = normalize(coverage * 100.0);

    let bonus_hits = question
        .acceptable_terms
        .iter()
        .filter(|term| keyword_hit(&ans, term, config.hit_threshold))
        .count();
    let completeness =
        normalize((coverage * 70.0 + (bonus_hits.min(MAX_BONUS_TERMS) * 10) as f64).min(100.0));

    let sentences = count_sentences(&ans);
    let mut clarity = normalize((sentences as f64 * 12.0).min(100.0));
    if !ans.is_empty() {
        clarity = clarity.max(NON_EMPTY_CLARITY_FLOOR);
    }

    let modern_hits = MODERN_FEATURES.iter().filter(|m| ans.contains(*m)).count();
    let depth = normalize((modern_hits as f64 * 20.0).min(100.0));

    let mut result = ScoreResult {
        accuracy,
        completeness,
        clarity,
        depth,
        total: 0.0,
        rationale: Rationale::RuleBased,
        corrections: Vec::new(),
    };
    result.total = result.weighted_total(&config.weights).clamp(0.0, MAX_SCORE);
    result
}

/// Non-empty segments split on `.`, `!` and `?`; at least 1 for any
/// non-empty answer, 0 for the empty answer.
fn count_sentences(ans: &str) -> usize {
    if ans.is_empty() {
        return 0;
    }
    ans.split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::Level;

    fn make_question(concepts: &[&str], terms: &[&str]) -> QuestionRecord {
        QuestionRecord {
            id: "T-1".to_string(),
            level: Level::Intermediate,
            prompt: "Explain a lookup.".to_string(),
            concepts_required: concepts.iter().map(|s| s.to_string()).collect(),
            acceptable_terms: terms.iter().map(|s| s.to_string()).collect(),
            model_answer: "Reference.".to_string(),
        }
    }

    fn assert_consistent(r: &ScoreResult, weights: &ScoringWeights) {
        for v in [r.accuracy, r.completeness, r.clarity, r.depth, r.total] {
            assert!((0.0..=5.0).contains(&v), "out of range: {v}");
        }
        assert!(
            (r.total - r.weighted_total(weights)).abs() < 0.011,
            "total {} != weighted {}",
            r.total,
            r.weighted_total(weights)
        );
    }

    #[test]
    fn test_empty_answer_scores_all_zero() {
        let q = make_question(&["index", "match"], &[]);
        let r = score_keyword("", &q, &ScoringConfig::default());
        assert_eq!(r.accuracy, 0.0);
        assert_eq!(r.completeness, 0.0);
        assert_eq!(r.clarity, 0.0);
        assert_eq!(r.depth, 0.0);
        assert_eq!(r.total, 0.0);
        assert_eq!(r.rationale, Rationale::RuleBased);
    }

    #[test]
    fn test_whitespace_only_answer_counts_as_empty() {
        let q = make_question(&["index"], &[]);
        let r = score_keyword("   \n ", &q, &ScoringConfig::default());
        assert_eq!(r.total, 0.0);
    }

    #[test]
    fn test_all_concepts_verbatim_with_modern_feature() {
        let q = make_question(&["exact match", "left lookup"], &[]);
        let r = score_keyword(
            "XLOOKUP does a left lookup and defaults to exact match.",
            &q,
            &ScoringConfig::default(),
        );
        assert_eq!(r.accuracy, 5.0);
        assert!(r.depth >= 1.0, "depth was {}", r.depth);
        assert_eq!(r.total, r.weighted_total(&ScoringWeights::default()));
    }

    #[test]
    fn test_accuracy_with_no_listed_concepts_is_zero_not_nan() {
        let q = make_question(&[], &[]);
        let r = score_keyword("Some answer.", &q, &ScoringConfig::default());
        assert_eq!(r.accuracy, 0.0);
        assert!(r.total.is_finite());
    }

    #[test]
    fn test_partial_concept_coverage() {
        let q = make_question(&["sumifs", "criteria range"], &[]);
        let r = score_keyword("I would use sumifs.", &q, &ScoringConfig::default());
        assert_eq!(r.accuracy, 2.5);
        // 0.5 * 70 = 35 → 1.75
        assert_eq!(r.completeness, 1.75);
    }

    #[test]
    fn test_bonus_terms_capped_at_three() {
        let q = make_question(&["pivot"], &["rows", "columns", "values", "slicer"]);
        let r = score_keyword(
            "pivot with rows, columns, values and a slicer",
            &q,
            &ScoringConfig::default(),
        );
        // 70 + 3*10 = 100
        assert_eq!(r.completeness, 5.0);
    }

    #[test]
    fn test_clarity_floor_for_short_answer() {
        let q = make_question(&[], &[]);
        let r = score_keyword("ok", &q, &ScoringConfig::default());
        // one sentence = 12 → 0.6, floored to 1.2
        assert_eq!(r.clarity, 1.2);
    }

    #[test]
    fn test_clarity_grows_with_sentences() {
        let q = make_question(&[], &[]);
        let r = score_keyword(
            "One. Two! Three? Four. Five. Six. Seven. Eight. Nine. Ten.",
            &q,
            &ScoringConfig::default(),
        );
        // 10 * 12 = 120 → capped at 100 → 5.0
        assert_eq!(r.clarity, 5.0);
    }

    #[test]
    fn test_depth_counts_distinct_features() {
        let q = make_question(&[], &[]);
        let r = score_keyword(
            "Power Query to load, then XLOOKUP and a DAX measure.",
            &q,
            &ScoringConfig::default(),
        );
        // power query, xlookup, dax → 60 → 3.0
        assert_eq!(r.depth, 3.0);
    }

    #[test]
    fn test_custom_threshold_is_respected() {
        let q = make_question(&["xlookup"], &[]);
        let strict = ScoringConfig {
            hit_threshold: 100.0,
            ..ScoringConfig::default()
        };
        assert_eq!(score_keyword("xlookip", &q, &strict).accuracy, 0.0);
        assert_eq!(
            score_keyword("xlookip", &q, &ScoringConfig::default()).accuracy,
            5.0
        );
    }

    #[test]
    fn test_scores_bounded_and_total_recomputable() {
        let q = make_question(&["index", "match", "left lookup"], &["exact match", "two-way"]);
        let weights = ScoringWeights::default();
        let answers = [
            "",
            "index",
            "INDEX MATCH allows a left lookup. Use 0 for exact match! It is a two-way lookup?",
            "Use LET and LAMBDA with FILTER and UNIQUE; SUMIFS and XLOOKUP in Power Query and Power Pivot with DAX over a dynamic array.",
        ];
        for a in answers {
            assert_consistent(&score_keyword(a, &q, &ScoringConfig::default()), &weights);
        }
    }

    #[test]
    fn test_text_past_cap_is_not_scored() {
        let q = make_question(&["xlookup"], &[]);
        let padded = format!("{} xlookup", "a".repeat(MAX_SCORED_CHARS));
        assert_eq!(score_keyword(&padded, &q, &ScoringConfig::default()).accuracy, 0.0);

        let early = format!("xlookup {}", "a".repeat(MAX_SCORED_CHARS * 5));
        assert_eq!(score_keyword(&early, &q, &ScoringConfig::default()).accuracy, 5.0);
    }
}
