use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{blank_gender_as_none, Answer, AnswerError, Gender, ResultId, TestId};
use super::engine::{MatchOutcome, ResultMatchingEngine};
use super::matcher::MatchStrategy;
use super::repository::{RepositoryError, ResultRepository};
use super::tally::{aggregate_score, code_sequence, tally_codes, CodeCount};

/// Completed answer set posted by the test-taking flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSubmission {
    pub answers: Vec<Answer>,
    #[serde(default, deserialize_with = "blank_gender_as_none")]
    pub gender: Option<Gender>,
}

/// Outcome of one resolution, stamped for the caller's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedResult {
    pub test_id: TestId,
    pub outcome: MatchOutcome,
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedResult {
    pub fn view(&self) -> ResultView {
        let result = &self.outcome.result;
        ResultView {
            test_id: self.test_id.clone(),
            result_id: result.id.clone(),
            name: result.name.clone(),
            description: result.description.clone(),
            image_url: result.image_url.clone(),
            strategy: self.outcome.strategy,
            total_score: self.outcome.total_score,
            dominant_codes: self.outcome.dominant_codes.clone(),
            resolved_at: self.resolved_at,
        }
    }
}

/// Public representation of a resolved result.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub test_id: TestId,
    pub result_id: ResultId,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub strategy: MatchStrategy,
    pub total_score: i64,
    pub dominant_codes: Vec<CodeCount>,
    pub resolved_at: DateTime<Utc>,
}

/// Score and code figures for reporting, without choosing a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSummary {
    pub test_id: TestId,
    pub answered: usize,
    pub total_score: i64,
    pub code_sequence: Vec<String>,
    pub dominant_codes: Vec<CodeCount>,
}

/// Service composing the repository and the matching engine.
pub struct ResultService<R> {
    repository: Arc<R>,
    engine: Arc<ResultMatchingEngine>,
}

impl<R> ResultService<R>
where
    R: ResultRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            engine: Arc::new(ResultMatchingEngine::new()),
        }
    }

    /// Fetch the test, hydrate the answers and resolve exactly one result.
    pub fn resolve(
        &self,
        test_id: &TestId,
        submission: ResultSubmission,
    ) -> Result<ResolvedResult, ResultServiceError> {
        let test = self
            .repository
            .test(test_id)?
            .ok_or_else(|| ResultServiceError::NotFound(test_id.clone()))?;
        let answers = test.hydrate(submission.answers)?;

        let outcome = self
            .engine
            .resolve(&test.results, &answers, submission.gender)
            .ok_or_else(|| ResultServiceError::NoOutcomes(test_id.clone()))?;

        info!(
            test = %test_id,
            result = %outcome.result.id,
            strategy = outcome.strategy.label(),
            "resolved test result"
        );

        Ok(ResolvedResult {
            test_id: test_id.clone(),
            outcome,
            resolved_at: Utc::now(),
        })
    }

    /// Aggregate the answers without matching, for analytics callers.
    pub fn summarize(
        &self,
        test_id: &TestId,
        answers: Vec<Answer>,
    ) -> Result<AnswerSummary, ResultServiceError> {
        let test = self
            .repository
            .test(test_id)?
            .ok_or_else(|| ResultServiceError::NotFound(test_id.clone()))?;
        let answers = test.hydrate(answers)?;

        Ok(AnswerSummary {
            test_id: test_id.clone(),
            answered: answers.len(),
            total_score: aggregate_score(&answers),
            code_sequence: code_sequence(&answers),
            dominant_codes: tally_codes(&answers),
        })
    }
}

/// Error raised by the result service.
#[derive(Debug, thiserror::Error)]
pub enum ResultServiceError {
    #[error("test {0} not found")]
    NotFound(TestId),
    #[error("test {0} has no defined outcomes")]
    NoOutcomes(TestId),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
