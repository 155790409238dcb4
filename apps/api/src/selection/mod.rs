//! Question Selector: decides the next question's level and instance.
//!
//! Two strategies: the deterministic bank lookup below, and the
//! generator-backed path in `generator`, which the session falls back from
//! onto the bank on any failure.

pub mod generator;
pub mod pool;
pub mod prompts;

use std::collections::HashSet;

use rand::Rng;
use tracing::warn;

use crate::bank::QuestionBank;
use crate::models::question::{Level, QuestionRecord};

const ADVANCED_THRESHOLD: f64 = 3.8;
const INTERMEDIATE_THRESHOLD: f64 = 2.8;

/// Level for the next question, driven by the most recent total only.
pub fn choose_level(scores: &[f64]) -> Level {
    match scores.last() {
        None => Level::Basic,
        Some(&last) if last >= ADVANCED_THRESHOLD => Level::Advanced,
        Some(&last) if last >= INTERMEDIATE_THRESHOLD => Level::Intermediate,
        Some(_) => Level::Basic,
    }
}

/// Deterministic bank pick:
/// 1. first unused question at the chosen level, in bank order
/// 2. else first unused question at any level
/// 3. else a uniformly random bank question (a repeat)
pub fn next_from_bank(
    bank: &QuestionBank,
    used_ids: &HashSet<String>,
    scores: &[f64],
) -> QuestionRecord {
    let level = choose_level(scores);
    let unused = || bank.questions().iter().filter(|q| !used_ids.contains(&q.id));

    if let Some(q) = unused().find(|q| q.level == level) {
        return q.clone();
    }
    if let Some(q) = unused().next() {
        return q.clone();
    }

    // Bank is never empty (QuestionBank::from_records rejects that).
    warn!(
        "Question bank exhausted after {} questions; repeating a random one",
        used_ids.len()
    );
    let idx = rand::thread_rng().gen_range(0..bank.len());
    bank.questions()[idx].clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: &str, level: Level) -> QuestionRecord {
        QuestionRecord {
            id: id.to_string(),
            level,
            prompt: format!("Prompt {id}"),
            concepts_required: vec![],
            acceptable_terms: vec![],
            model_answer: "m".to_string(),
        }
    }

    fn make_bank() -> QuestionBank {
        QuestionBank::from_records(vec![
            q("B1", Level::Basic),
            q("I1", Level::Intermediate),
            q("A1", Level::Advanced),
            q("B2", Level::Basic),
            q("A2", Level::Advanced),
        ])
        .unwrap()
    }

    fn used(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_choose_level_table() {
        assert_eq!(choose_level(&[]), Level::Basic);
        assert_eq!(choose_level(&[3.9]), Level::Advanced);
        assert_eq!(choose_level(&[2.9]), Level::Intermediate);
        assert_eq!(choose_level(&[1.0]), Level::Basic);
    }

    #[test]
    fn test_choose_level_boundaries() {
        assert_eq!(choose_level(&[3.8]), Level::Advanced);
        assert_eq!(choose_level(&[2.8]), Level::Intermediate);
        assert_eq!(choose_level(&[2.79]), Level::Basic);
    }

    #[test]
    fn test_choose_level_uses_only_last_score() {
        assert_eq!(choose_level(&[5.0, 5.0, 0.5]), Level::Basic);
        assert_eq!(choose_level(&[0.0, 0.0, 4.0]), Level::Advanced);
    }

    #[test]
    fn test_next_from_bank_first_at_level_in_bank_order() {
        let bank = make_bank();
        assert_eq!(next_from_bank(&bank, &used(&[]), &[]).id, "B1");
        assert_eq!(next_from_bank(&bank, &used(&["B1"]), &[]).id, "B2");
    }

    #[test]
    fn test_next_from_bank_after_strong_scores_picks_advanced() {
        let bank = make_bank();
        assert_eq!(choose_level(&[4.0, 4.5]), Level::Advanced);
        assert_eq!(next_from_bank(&bank, &used(&["B1"]), &[4.0, 4.5]).id, "A1");
        assert_eq!(
            next_from_bank(&bank, &used(&["B1", "A1"]), &[4.0, 4.5]).id,
            "A2"
        );
    }

    #[test]
    fn test_next_from_bank_falls_back_to_any_unused_level() {
        let bank = make_bank();
        let picked = next_from_bank(&bank, &used(&["A1", "A2"]), &[4.0, 4.5]);
        assert_eq!(picked.id, "B1");
    }

    #[test]
    fn test_next_from_bank_never_repeats_until_exhausted() {
        let bank = make_bank();
        let mut seen = HashSet::new();
        for _ in 0..bank.len() {
            let picked = next_from_bank(&bank, &seen, &[2.9]);
            assert!(!seen.contains(&picked.id), "repeated {}", picked.id);
            seen.insert(picked.id);
        }
        assert_eq!(seen.len(), bank.len());
    }

    #[test]
    fn test_next_from_bank_exhausted_repeats_from_bank() {
        let bank = make_bank();
        let all = used(&["B1", "I1", "A1", "B2", "A2"]);
        let picked = next_from_bank(&bank, &all, &[]);
        assert!(all.contains(&picked.id));
    }
}
