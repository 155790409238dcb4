// Answer scoring: deterministic keyword rubric, optional external grade,
// and the merge policy between them.
// External grading goes through the AnswerGrader trait; no LlmClient calls here.

pub mod fuzzy;
pub mod grader;
pub mod merge;
pub mod prompts;
pub mod rubric;
