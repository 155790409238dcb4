use crate::models::score::{round2, Rationale, ScoreResult};

/// Combines the keyword score with an optional external grade.
///
/// - no external grade → keyword result unchanged
/// - external total of 0 against a positive keyword total is read as a failed
///   grading → keyword result, rationale `rule-based-fallback`
/// - otherwise per-dimension mean, rationale `hybrid`, external corrections kept
pub fn merge(keyword: ScoreResult, external: Option<ScoreResult>) -> ScoreResult {
    let Some(external) = external else {
        return keyword;
    };

    if external.total == 0.0 && keyword.total > 0.0 {
        return ScoreResult {
            rationale: Rationale::RuleBasedFallback,
            ..keyword
        };
    }

    let mean = |a: f64, b: f64| round2((a + b) / 2.0);
    ScoreResult {
        accuracy: mean(keyword.accuracy, external.accuracy),
        completeness: mean(keyword.completeness, external.completeness),
        clarity: mean(keyword.clarity, external.clarity),
        depth: mean(keyword.depth, external.depth),
        total: mean(keyword.total, external.total),
        rationale: Rationale::Hybrid,
        corrections: external.corrections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::score::ScoringWeights;

    fn make_score(dims: [f64; 4], total: f64, rationale: Rationale) -> ScoreResult {
        ScoreResult {
            accuracy: dims[0],
            completeness: dims[1],
            clarity: dims[2],
            depth: dims[3],
            total,
            rationale,
            corrections: vec![],
        }
    }

    #[test]
    fn test_merge_without_external_is_identity() {
        let k = make_score([2.5, 1.75, 1.2, 1.0], 1.83, Rationale::RuleBased);
        assert_eq!(merge(k.clone(), None), k);
    }

    #[test]
    fn test_zero_external_total_falls_back_to_keyword() {
        let k = make_score([2.5, 1.75, 1.2, 1.0], 1.83, Rationale::RuleBased);
        let l = make_score([0.0; 4], 0.0, Rationale::Llm);
        let merged = merge(k.clone(), Some(l));
        assert_eq!(merged.rationale, Rationale::RuleBasedFallback);
        assert_eq!(merged.total, k.total);
        assert_eq!(merged.accuracy, k.accuracy);
    }

    #[test]
    fn test_both_zero_is_hybrid_zero() {
        let k = make_score([0.0; 4], 0.0, Rationale::RuleBased);
        let l = make_score([0.0; 4], 0.0, Rationale::Llm);
        let merged = merge(k, Some(l));
        assert_eq!(merged.rationale, Rationale::Hybrid);
        assert_eq!(merged.total, 0.0);
    }

    #[test]
    fn test_hybrid_is_rounded_mean_with_external_corrections() {
        let k = make_score([5.0, 3.5, 1.5, 1.0], 3.36, Rationale::RuleBased);
        let mut l = make_score([4.0, 4.0, 4.0, 4.0], 4.0, Rationale::Llm);
        l.corrections = vec!["Mention IFERROR.".to_string()];

        let merged = merge(k, Some(l));
        assert_eq!(merged.rationale, Rationale::Hybrid);
        assert_eq!(merged.accuracy, 4.5);
        assert_eq!(merged.completeness, 3.75);
        assert_eq!(merged.clarity, 2.75);
        assert_eq!(merged.depth, 2.5);
        assert_eq!(merged.total, 3.68);
        assert_eq!(merged.weighted_total(&ScoringWeights::default()), merged.total);
        assert_eq!(merged.corrections, vec!["Mention IFERROR.".to_string()]);
    }
}
