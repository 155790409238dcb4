//! Fuzzy containment ratios on a 0–100 scale, built on normalized Levenshtein
//! similarity. Both ratios are 0 when either side is empty.

use std::collections::BTreeSet;

/// Whole-string similarity.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best similarity of the shorter string against every equally long window of
/// the longer one. An exact substring scores 100.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    if short.is_empty() {
        return 0.0;
    }
    if long.contains(short) {
        return 100.0;
    }

    let width = short.chars().count();
    // Byte offset of every char boundary, so windows are borrowed slices.
    let bounds: Vec<usize> = long
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(long.len()))
        .collect();
    if bounds.len() - 1 == width {
        return ratio(short, long);
    }

    bounds
        .windows(width + 1)
        .map(|w| ratio(short, &long[w[0]..w[width]]))
        .fold(0.0_f64, f64::max)
}

/// Word-order-insensitive similarity over whitespace tokens. When one token
/// set contains the other the ratio is 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = join(tokens_a.intersection(&tokens_b));
    let diff_ab = join(tokens_a.difference(&tokens_b));
    let diff_ba = join(tokens_b.difference(&tokens_a));

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let combined_ab = join_nonempty(&intersection, &diff_ab);
    let combined_ba = join_nonempty(&intersection, &diff_ba);

    ratio(&intersection, &combined_ab)
        .max(ratio(&intersection, &combined_ba))
        .max(ratio(&combined_ab, &combined_ba))
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// A term is "hit" when either ratio reaches the threshold.
pub fn keyword_hit(answer: &str, term: &str, threshold: f64) -> bool {
    let term = term.to_lowercase();
    partial_ratio(answer, &term).max(token_set_ratio(answer, &term)) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical_is_100() {
        assert_eq!(ratio("xlookup", "xlookup"), 100.0);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(ratio("", "abc"), 0.0);
        assert_eq!(partial_ratio("", "abc"), 0.0);
        assert_eq!(partial_ratio("abc", ""), 0.0);
        assert_eq!(token_set_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_partial_ratio_exact_substring_is_100() {
        assert_eq!(
            partial_ratio("i would use index match here", "index match"),
            100.0
        );
    }

    #[test]
    fn test_partial_ratio_tolerates_typo() {
        // one substitution in 7 chars → ~85.7
        let score = partial_ratio("try xlookip for that", "xlookup");
        assert!(score > 80.0 && score < 100.0, "got {score}");
    }

    #[test]
    fn test_partial_ratio_unrelated_is_low() {
        assert!(partial_ratio("pivot tables summarize", "xlookup") < 68.0);
    }

    #[test]
    fn test_partial_ratio_windows_respect_multibyte_chars() {
        let score = partial_ratio("déjà vu with xlookip", "xlookup");
        assert!(score > 80.0 && score < 100.0, "got {score}");
    }

    #[test]
    fn test_partial_ratio_on_long_answer_finds_late_match() {
        let answer = format!("{} xlookip", "filler text ".repeat(500));
        let score = partial_ratio(&answer, "xlookup");
        assert!(score > 80.0 && score < 100.0, "got {score}");
    }

    #[test]
    fn test_token_set_ratio_subset_is_100() {
        assert_eq!(token_set_ratio("match index exact", "exact match"), 100.0);
    }

    #[test]
    fn test_token_set_ratio_disjoint_is_low() {
        assert!(token_set_ratio("alpha beta", "gamma delta") < 68.0);
    }

    #[test]
    fn test_keyword_hit_lowercases_term() {
        assert!(keyword_hit("wrap it in iferror", "IFERROR", 68.0));
        assert!(!keyword_hit("", "IFERROR", 68.0));
    }
}
