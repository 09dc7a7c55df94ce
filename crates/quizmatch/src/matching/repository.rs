use super::domain::{TestDefinition, TestId, TestResult};

/// Read-only access to stored tests so the service can be exercised without a live backend.
pub trait ResultRepository: Send + Sync {
    fn test(&self, id: &TestId) -> Result<Option<TestDefinition>, RepositoryError>;

    /// Candidate results for a test in authored order.
    fn results_for_test(&self, id: &TestId) -> Result<Vec<TestResult>, RepositoryError> {
        self.test(id)?
            .map(|test| test.results)
            .ok_or(RepositoryError::NotFound)
    }
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("test not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
