use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Answer, Gender, TestDefinition, TestResult};
use super::matcher::{
    gender_candidates, unrecognized_conditions, MatchSignals, MatchStrategy, ResultMatcher,
};
use super::tally::{aggregate_score, CodeCount};

/// Stateless facade wiring score aggregation, code tally and the matcher together.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultMatchingEngine {
    matcher: ResultMatcher,
}

impl ResultMatchingEngine {
    pub fn new() -> Self {
        Self {
            matcher: ResultMatcher::new(),
        }
    }

    /// Resolves the one result a completed answer set earns.
    ///
    /// Returns `None` only when `results` is empty.
    pub fn resolve(
        &self,
        results: &[TestResult],
        answers: &[Answer],
        gender: Option<Gender>,
    ) -> Option<MatchOutcome> {
        let candidates = gender_candidates(results, gender);
        let unrecognized = unrecognized_conditions(&candidates);
        if unrecognized > 0 {
            warn!(unrecognized, "candidate results carry match conditions that can never match");
        }

        let total_score = aggregate_score(answers);
        let signals = MatchSignals::new(total_score, answers);
        let matched = self.matcher.select(results, &candidates, &signals)?;

        debug!(
            result = %matched.result.id,
            strategy = matched.strategy.label(),
            total_score,
            answers = answers.len(),
            "matched test result"
        );

        Some(MatchOutcome {
            result: matched.result.clone(),
            strategy: matched.strategy,
            total_score,
            dominant_codes: signals.dominant_codes,
        })
    }
}

/// Resolves a result for `test`, the entry point for the test-taking flow.
pub fn resolve_result(
    test: &TestDefinition,
    answers: &[Answer],
    gender: Option<Gender>,
) -> Option<MatchOutcome> {
    ResultMatchingEngine::new().resolve(&test.results, answers, gender)
}

/// Engine output with the trail that led to the chosen result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub result: TestResult,
    pub strategy: MatchStrategy,
    pub total_score: i64,
    pub dominant_codes: Vec<CodeCount>,
}
