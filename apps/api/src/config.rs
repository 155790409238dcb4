use std::str::FromStr;

use anyhow::{Context, Result};

use crate::models::score::ScoringWeights;

/// Application configuration loaded from environment variables.
/// Only the network address and logging have hard requirements; every
/// interview knob has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub num_questions: usize,
    pub weights: ScoringWeights,
    pub keyword_hit_threshold: f64,
    pub deterministic_only: bool,
    /// Absent key means no external assistant is wired in.
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub question_bank_path: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let weights = ScoringWeights {
            accuracy: parse_env("W_ACC", 0.38)?,
            completeness: parse_env("W_COMP", 0.30)?,
            clarity: parse_env("W_CLAR", 0.18)?,
            depth: parse_env("W_DEPTH", 0.14)?,
        };
        if (weights.sum() - 1.0).abs() > 0.01 {
            tracing::warn!(
                "Scoring weights sum to {:.2}, expected 1.0; totals will be skewed",
                weights.sum()
            );
        }

        let num_questions: usize = parse_env("NUM_QUESTIONS", 7)?;
        if num_questions == 0 {
            anyhow::bail!("NUM_QUESTIONS must be at least 1");
        }

        Ok(Config {
            app_name: std::env::var("APP_NAME")
                .unwrap_or_else(|_| "Excel Mock Interviewer".to_string()),
            num_questions,
            weights,
            keyword_hit_threshold: parse_env("KW_HIT_THRESHOLD", 68.0)?,
            deterministic_only: std::env::var("DETERMINISTIC_ONLY")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            llm_model: std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| crate::llm_client::DEFAULT_MODEL.to_string()),
            question_bank_path: std::env::var("QUESTION_BANK_PATH")
                .unwrap_or_else(|_| "data/question_bank.json".to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
