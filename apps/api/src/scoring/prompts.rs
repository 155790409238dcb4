/// Grading task, joined with the persona and the JSON-only rule.
pub const GRADE_TASK: &str = "Grade the candidate's answer on a 0-5 scale for accuracy, \
    completeness, clarity and depth, plus an overall total on the same scale. \
    Keep totals reasonable.";

/// Grading prompt template. Replace `{payload_json}` before sending.
pub const GRADE_PROMPT_TEMPLATE: &str = r#"Grade this interview answer.

{payload_json}

Return a JSON object with this EXACT schema:
{
  "accuracy": 0.0,
  "completeness": 0.0,
  "clarity": 0.0,
  "depth": 0.0,
  "total": 0.0,
  "corrections": ["short, concrete improvement"]
}"#;
