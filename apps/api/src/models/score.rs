use serde::{Deserialize, Serialize};

/// Upper bound of every rubric dimension and of the total.
pub const MAX_SCORE: f64 = 5.0;

/// Where a score came from. Serialized in the kebab-case form reports show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rationale {
    RuleBased,
    Llm,
    Hybrid,
    RuleBasedFallback,
}

/// Per-dimension weights for the rubric total. Expected to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub accuracy: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub depth: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            accuracy: 0.38,
            completeness: 0.30,
            clarity: 0.18,
            depth: 0.14,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.accuracy + self.completeness + self.clarity + self.depth
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub accuracy: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub depth: f64,
    pub total: f64,
    pub rationale: Rationale,
    #[serde(default)]
    pub corrections: Vec<String>,
}

impl ScoreResult {
    /// Weighted sum of the four dimensions, rounded to 2 decimals.
    pub fn weighted_total(&self, weights: &ScoringWeights) -> f64 {
        round2(
            self.accuracy * weights.accuracy
                + self.completeness * weights.completeness
                + self.clarity * weights.clarity
                + self.depth * weights.depth,
        )
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoringWeights::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rationale_serializes_kebab_case() {
        let json = serde_json::to_string(&Rationale::RuleBasedFallback).unwrap();
        assert_eq!(json, r#""rule-based-fallback""#);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(2.005_1), 2.01);
    }

    #[test]
    fn test_weighted_total_uses_all_dimensions() {
        let r = ScoreResult {
            accuracy: 5.0,
            completeness: 5.0,
            clarity: 5.0,
            depth: 5.0,
            total: 0.0,
            rationale: Rationale::RuleBased,
            corrections: vec![],
        };
        assert_eq!(r.weighted_total(&ScoringWeights::default()), 5.0);
    }
}
