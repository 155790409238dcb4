//! Built-in fallback prompts, used when a generated question is missing or
//! repeats something already asked. ASCII only.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::question::{Level, QuestionRecord};

pub const GENERIC_CONCEPTS: [&str; 3] = ["keywords", "core idea", "best practice"];
pub const GENERIC_TERMS: [&str; 2] = ["synonyms", "alternatives"];
pub const GENERIC_MODEL_ANSWER: &str =
    "A concise, correct explanation with a short formula or steps.";

const SLUG_MAX_LEN: usize = 24;

const BASIC_POOL: &[&str] = &[
    "Explain absolute vs relative references with an example.",
    "What does the $ symbol do in a formula? Give a short example.",
    "How would you freeze top row and first column? Why is it useful?",
];

const INTERMEDIATE_POOL: &[&str] = &[
    "When would you use SUMIFS vs COUNTIFS? Give a short example.",
    "Conditional formatting: highlight duplicates across two columns with a formula.",
    "Create a data validation dropdown that spills UNIQUE values from a table column.",
];

const ADVANCED_POOL: &[&str] = &[
    "When would you use INDEX-MATCH instead of VLOOKUP? Give a short formula.",
    "Explain XLOOKUP advantages over VLOOKUP and show an example.",
    "Use LET and LAMBDA to create a reusable CleanText function (trim+lower+remove spaces).",
];

const SCENARIO_POOL: &[&str] = &[
    "You get a messy monthly CSV: outline Power Query steps to clean and normalize it.",
    "Dataset Orders(Id, Date, Region, Product, Qty, Price): find top 3 regions by revenue YTD and explain refresh.",
];

pub fn pool_for(level: Level) -> &'static [&'static str] {
    match level {
        Level::Basic => BASIC_POOL,
        Level::Intermediate => INTERMEDIATE_POOL,
        Level::Advanced => ADVANCED_POOL,
        Level::Scenario => SCENARIO_POOL,
    }
}

/// Case- and surrounding-whitespace-insensitive form used for prompt de-dup.
pub fn normalize_prompt(prompt: &str) -> String {
    prompt.trim().to_lowercase()
}

pub fn normalized_set(prompts: &[String]) -> HashSet<String> {
    prompts.iter().map(|p| normalize_prompt(p)).collect()
}

/// Lowercase, runs of non-alphanumerics collapsed to `-`, at most 24 chars,
/// `q` when nothing is left.
pub fn slug(s: &str) -> String {
    let mut out = String::new();
    for c in s.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed: String = out.trim_matches('-').chars().take(SLUG_MAX_LEN).collect();
    if trimmed.is_empty() {
        "q".to_string()
    } else {
        trimmed
    }
}

pub fn make_id(prompt: &str) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(100..=999);
    format!("LLM-{}-{}", slug(prompt), suffix)
}

/// First pool prompt for the level not yet asked; a random pool prompt once
/// the level's pool is used up.
pub fn fallback_prompt(level: Level, recent: &HashSet<String>) -> &'static str {
    let pool = pool_for(level);
    pool.iter()
        .copied()
        .find(|p| !recent.contains(&normalize_prompt(p)))
        .or_else(|| pool.choose(&mut rand::thread_rng()).copied())
        .unwrap_or(BASIC_POOL[0])
}

/// A fresh, self-contained record built from the fallback pool.
pub fn fallback_alt(level: Level, recent: &HashSet<String>) -> QuestionRecord {
    let prompt = fallback_prompt(level, recent);
    QuestionRecord {
        id: make_id(prompt),
        level,
        prompt: prompt.to_string(),
        concepts_required: GENERIC_CONCEPTS.iter().map(|s| s.to_string()).collect(),
        acceptable_terms: GENERIC_TERMS.iter().map(|s| s.to_string()).collect(),
        model_answer: GENERIC_MODEL_ANSWER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_level_has_a_pool() {
        for level in Level::ALL {
            assert!(!pool_for(level).is_empty());
            assert!(pool_for(level).iter().all(|p| p.is_ascii()));
        }
    }

    #[test]
    fn test_slug_collapses_and_truncates() {
        assert_eq!(slug("When would you use INDEX-MATCH?"), "when-would-you-use-index");
        assert_eq!(slug("  $$ "), "q");
        assert_eq!(slug("SUMIFS vs COUNTIFS"), "sumifs-vs-countifs");
    }

    #[test]
    fn test_make_id_shape() {
        let id = make_id("Explain XLOOKUP");
        assert!(id.starts_with("LLM-explain-xlookup-"), "got {id}");
        let suffix: u16 = id.rsplit('-').next().unwrap().parse().unwrap();
        assert!((100..=999).contains(&suffix));
    }

    #[test]
    fn test_fallback_prompt_cycles_past_recent() {
        let recent = normalized_set(&[format!("  {}  ", BASIC_POOL[0].to_uppercase())]);
        assert_eq!(fallback_prompt(Level::Basic, &recent), BASIC_POOL[1]);
    }

    #[test]
    fn test_fallback_prompt_random_when_pool_exhausted() {
        let recent = normalized_set(
            &SCENARIO_POOL.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        );
        let p = fallback_prompt(Level::Scenario, &recent);
        assert!(SCENARIO_POOL.contains(&p));
    }

    #[test]
    fn test_fallback_alt_uses_generic_fields() {
        let q = fallback_alt(Level::Advanced, &HashSet::new());
        assert_eq!(q.level, Level::Advanced);
        assert_eq!(q.prompt, ADVANCED_POOL[0]);
        assert_eq!(q.concepts_required, vec!["keywords", "core idea", "best practice"]);
        assert_eq!(q.model_answer, GENERIC_MODEL_ANSWER);
        assert!(q.id.starts_with("LLM-"));
    }
}
