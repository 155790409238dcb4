use serde::{Deserialize, Serialize};

/// Difficulty band a question belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[default]
    Basic,
    Intermediate,
    Advanced,
    Scenario,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Basic,
        Level::Intermediate,
        Level::Advanced,
        Level::Scenario,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Basic => "basic",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
            Level::Scenario => "scenario",
        }
    }

    /// Lenient parse used for externally generated payloads.
    pub fn parse(raw: &str) -> Option<Level> {
        Level::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// A single interview question. Immutable once constructed; bank records are
/// shared read-only and the session keeps its own clone of the one in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub level: Level,
    pub prompt: String,
    #[serde(default)]
    pub concepts_required: Vec<String>,
    #[serde(default)]
    pub acceptable_terms: Vec<String>,
    pub model_answer: String,
}
