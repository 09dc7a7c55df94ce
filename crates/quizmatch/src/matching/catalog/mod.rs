//! Loading test definitions and answer sheets from files exported by the backing store.

mod answer_sheet;

pub use answer_sheet::parse_answer_sheet;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use super::domain::{Answer, TestDefinition, TestId};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog source: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid answer sheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("test {0} is defined more than once")]
    DuplicateTest(TestId),
}

/// Ordered set of test definitions with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tests: Vec<TestDefinition>,
}

impl Catalog {
    pub fn new(tests: Vec<TestDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for test in &tests {
            if !seen.insert(&test.id) {
                return Err(CatalogError::DuplicateTest(test.id.clone()));
            }
        }

        Ok(Self { tests })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads a JSON array of tests.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let tests: Vec<TestDefinition> = serde_json::from_reader(reader)?;
        Self::new(tests)
    }

    pub fn get(&self, id: &TestId) -> Option<&TestDefinition> {
        self.tests.iter().find(|test| &test.id == id)
    }

    pub fn tests(&self) -> &[TestDefinition] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn into_tests(self) -> Vec<TestDefinition> {
        self.tests
    }
}

/// Reads an answer sheet CSV from disk.
pub fn answers_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Answer>, CatalogError> {
    let file = std::fs::File::open(path)?;
    Ok(parse_answer_sheet(file)?)
}
