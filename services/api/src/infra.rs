use metrics_exporter_prometheus::PrometheusHandle;
use quizmatch::error::AppError;
use quizmatch::matching::catalog::Catalog;
use quizmatch::matching::{
    Gender, RepositoryError, ResultRepository, TestDefinition, TestId,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryResultRepository {
    tests: Arc<Mutex<HashMap<TestId, TestDefinition>>>,
}

impl InMemoryResultRepository {
    pub(crate) fn from_catalog(catalog: Catalog) -> Self {
        let repository = Self::default();
        for test in catalog.into_tests() {
            repository.insert(test);
        }
        repository
    }

    pub(crate) fn insert(&self, test: TestDefinition) {
        let mut guard = self.tests.lock().expect("repository mutex poisoned");
        guard.insert(test.id.clone(), test);
    }

    pub(crate) fn test_ids(&self) -> Vec<TestId> {
        let guard = self.tests.lock().expect("repository mutex poisoned");
        let mut ids: Vec<TestId> = guard.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl ResultRepository for InMemoryResultRepository {
    fn test(&self, id: &TestId) -> Result<Option<TestDefinition>, RepositoryError> {
        let guard = self.tests.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn sample_catalog() -> Result<Catalog, AppError> {
    Ok(Catalog::from_reader(SAMPLE_CATALOG.as_bytes())?)
}

/// Loads the catalog at `path`, or the bundled sample when none is configured.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Catalog, AppError> {
    let catalog = match path {
        Some(path) => Catalog::from_path(path)?,
        None => sample_catalog()?,
    };

    let source = path.map_or_else(
        || "bundled sample".to_string(),
        |path| path.display().to_string(),
    );
    info!(tests = catalog.len(), %source, "loaded test catalog");
    Ok(catalog)
}

pub(crate) fn parse_gender(raw: &str) -> Result<Gender, String> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_seeds_the_repository() {
        let repository =
            InMemoryResultRepository::from_catalog(sample_catalog().expect("sample parses"));

        assert_eq!(
            repository.test_ids(),
            vec![TestId::from("energy"), TestId::from("temperament")]
        );
        let results = repository
            .results_for_test(&TestId::from("temperament"))
            .expect("results load");
        assert_eq!(results.len(), 4);
        assert!(results
            .iter()
            .all(|result| result.match_condition.is_some()));
    }

    #[test]
    fn parse_gender_accepts_short_forms_and_other_labels() {
        assert_eq!(parse_gender("F"), Ok(Gender::Female));
        assert_eq!(parse_gender(" male "), Ok(Gender::Male));
        assert_eq!(parse_gender("Robot"), Ok(Gender::Other("robot".to_string())));
        assert!(parse_gender("  ").is_err());
    }
}
