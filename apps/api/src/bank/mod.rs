//! Question Bank: the static, loaded-once question source.
//!
//! Records are sanitized and given their defaults while being built, then
//! never touched again. The session shares the bank as `Arc<QuestionBank>`.

pub mod sanitize;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::question::{Level, QuestionRecord};
use sanitize::{sanitize, sanitize_all};

const DEFAULT_MODEL_ANSWER: &str = "A concise, correct explanation of the concept.";

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank contains no usable questions")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct BankFile {
    #[serde(default)]
    questions: Vec<RawBankQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawBankQuestion {
    #[serde(default)]
    id: String,
    #[serde(default)]
    level: Level,
    #[serde(default)]
    prompt: String,
    #[serde(default)]
    concepts_required: Vec<String>,
    #[serde(default)]
    acceptable_terms: Vec<String>,
    #[serde(default)]
    model_answer: Option<String>,
}

impl RawBankQuestion {
    fn into_record(self) -> QuestionRecord {
        let model_answer = self
            .model_answer
            .map(|a| sanitize(&a))
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_ANSWER.to_string());
        QuestionRecord {
            id: self.id.trim().to_string(),
            level: self.level,
            prompt: sanitize(&self.prompt),
            concepts_required: sanitize_all(&self.concepts_required),
            acceptable_terms: sanitize_all(&self.acceptable_terms),
            model_answer,
        }
    }
}

/// Ordered, immutable question collection. Bank order is significant: the
/// deterministic selector always takes the first eligible record.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<QuestionRecord>,
}

impl QuestionBank {
    /// Loads and sanitizes the bank from a `{"questions": [...]}` JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let bank = Self::from_json(&raw)?;
        let per_level: Vec<String> = Level::ALL
            .iter()
            .map(|l| format!("{}={}", l.as_str(), bank.count_at(*l)))
            .collect();
        info!(
            "Loaded {} questions from {} ({})",
            bank.len(),
            path.display(),
            per_level.join(", ")
        );
        Ok(bank)
    }

    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let file: BankFile = serde_json::from_str(raw)?;
        Self::from_records(file.questions.into_iter().map(RawBankQuestion::into_record))
    }

    /// Builds a bank, dropping records without an id or prompt and keeping
    /// only the first record for each id.
    pub fn from_records(
        records: impl IntoIterator<Item = QuestionRecord>,
    ) -> Result<Self, BankError> {
        let mut seen = HashSet::new();
        let mut questions = Vec::new();
        for q in records {
            if q.id.is_empty() || q.prompt.is_empty() {
                warn!("Skipping bank question without id or prompt: {:?}", q.id);
                continue;
            }
            if !seen.insert(q.id.clone()) {
                warn!("Skipping duplicate bank question id {}", q.id);
                continue;
            }
            questions.push(q);
        }
        if questions.is_empty() {
            return Err(BankError::Empty);
        }
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.questions.iter().filter(|q| q.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK_JSON: &str = r#"{
        "questions": [
            {
                "id": "B1",
                "level": "basic",
                "prompt": "Explain   relative vs absolute references.",
                "concepts_required": ["relative", "absolute", "$"],
                "acceptable_terms": ["F4"],
                "model_answer": "A1 shifts; $A$1 does not."
            },
            {
                "id": "I1",
                "level": "intermediate",
                "prompt": "When would you use SUMIFS?",
                "concepts_required": ["multiple criteria"]
            },
            {
                "id": "B1",
                "level": "advanced",
                "prompt": "Duplicate id, should be dropped."
            },
            {
                "id": "",
                "level": "basic",
                "prompt": "No id, should be dropped."
            }
        ]
    }"#;

    #[test]
    fn test_from_json_sanitizes_and_dedups() {
        let bank = QuestionBank::from_json(BANK_JSON).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(
            bank.questions()[0].prompt,
            "Explain relative vs absolute references."
        );
        assert_eq!(bank.questions()[0].level, Level::Basic);
    }

    #[test]
    fn test_missing_model_answer_gets_default() {
        let bank = QuestionBank::from_json(BANK_JSON).unwrap();
        assert_eq!(bank.questions()[1].model_answer, DEFAULT_MODEL_ANSWER);
        assert!(bank.questions()[1].acceptable_terms.is_empty());
    }

    #[test]
    fn test_empty_bank_is_error() {
        let result = QuestionBank::from_json(r#"{"questions": []}"#);
        assert!(matches!(result, Err(BankError::Empty)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = QuestionBank::from_json("not json");
        assert!(matches!(result, Err(BankError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = QuestionBank::load("/definitely/not/here/bank.json");
        assert!(matches!(result, Err(BankError::Io { .. })));
    }

    #[test]
    fn test_bundled_bank_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/question_bank.json");
        let bank = QuestionBank::load(path).unwrap();
        for level in Level::ALL {
            assert!(bank.count_at(level) > 0, "no {} questions", level.as_str());
        }
    }
}
