//! Test-result matching: from a completed answer set to the single result it earns.
//!
//! Answers are aggregated into a score and a ranked code tally, the candidate results are
//! narrowed by gender targeting, and the [`ResultMatcher`] walks its strategies in a fixed
//! order (dominant code, exact and reversed combinations, superset, partial overlap, score
//! range) before falling back to the first candidate. Only an empty result set yields nothing.

pub mod catalog;
pub(crate) mod condition;
pub mod domain;
pub(crate) mod engine;
pub(crate) mod matcher;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod tally;

#[cfg(test)]
mod tests;

pub use condition::{evaluate, MatchCondition};
pub use domain::{
    Answer, AnswerError, Choice, ChoiceId, Gender, Question, QuestionId, ResultId, TargetGender,
    TestDefinition, TestId, TestResult,
};
pub use engine::{resolve_result, MatchOutcome, ResultMatchingEngine};
pub use matcher::{gender_candidates, MatchSignals, MatchStrategy, MatchedResult, ResultMatcher};
pub use repository::{RepositoryError, ResultRepository};
pub use router::result_router;
pub use service::{
    AnswerSummary, ResolvedResult, ResultService, ResultServiceError, ResultSubmission, ResultView,
};
pub use tally::{aggregate_score, code_sequence, tally_codes, CodeCount};
