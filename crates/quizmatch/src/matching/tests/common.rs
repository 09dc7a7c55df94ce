use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::matching::domain::{
    Answer, Choice, ChoiceId, Question, QuestionId, TargetGender, TestDefinition, TestId,
    TestResult,
};
use crate::matching::repository::{RepositoryError, ResultRepository};
use crate::matching::{result_router, MatchCondition, ResultService};

/// One answer per code, numbered q1.. in order.
pub(super) fn coded(codes: &[&str]) -> Vec<Answer> {
    codes
        .iter()
        .enumerate()
        .map(|(index, code)| Answer::new(format!("q{}", index + 1), "c").with_code(*code))
        .collect()
}

/// One answer per score, numbered q1.. in order.
pub(super) fn scored(scores: &[i64]) -> Vec<Answer> {
    scores
        .iter()
        .enumerate()
        .map(|(index, score)| Answer::new(format!("q{}", index + 1), "c").with_score(*score))
        .collect()
}

pub(super) fn code_result(id: &str, codes: &[&str]) -> TestResult {
    TestResult::new(id, id.to_uppercase()).with_condition(MatchCondition::codes(codes.to_vec()))
}

pub(super) fn score_result(id: &str, min: i64, max: Option<i64>) -> TestResult {
    TestResult::new(id, id.to_uppercase()).with_condition(MatchCondition::score(min, max))
}

pub(super) fn plain_result(id: &str) -> TestResult {
    TestResult::new(id, id.to_uppercase())
}

pub(super) fn ids(results: &[&TestResult]) -> Vec<String> {
    results.iter().map(|result| result.id.0.clone()).collect()
}

fn choice(id: &str, score: i64, code: &str) -> Choice {
    Choice {
        id: ChoiceId(id.to_string()),
        label: format!("choice {id}"),
        score: Some(score),
        code: Some(code.to_string()),
    }
}

/// Three two-choice questions; choice `a` leans extravert, `b` introvert.
pub(super) fn temperament_test() -> TestDefinition {
    let questions = (1..=3)
        .map(|index| Question {
            id: QuestionId(format!("q{index}")),
            text: format!("question {index}"),
            choices: vec![choice("a", 3, "E"), choice("b", 1, "I")],
        })
        .collect();

    TestDefinition {
        id: TestId::from("temperament"),
        title: "Temperament".to_string(),
        questions,
        results: vec![
            code_result("extravert", &["E"]),
            code_result("introvert", &["I"]).targeting(TargetGender::All),
            score_result("balanced", 0, Some(20)),
        ],
    }
}

pub(super) fn empty_test() -> TestDefinition {
    TestDefinition::new("unfinished", Vec::new())
}

pub(super) fn selections(choices: &[&str]) -> Vec<Answer> {
    choices
        .iter()
        .enumerate()
        .map(|(index, choice)| Answer::new(format!("q{}", index + 1), *choice))
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) tests: Arc<Mutex<HashMap<TestId, TestDefinition>>>,
}

impl MemoryRepository {
    pub(super) fn with_tests(tests: Vec<TestDefinition>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.tests.lock().expect("repository mutex poisoned");
            for test in tests {
                guard.insert(test.id.clone(), test);
            }
        }
        repository
    }
}

impl ResultRepository for MemoryRepository {
    fn test(&self, id: &TestId) -> Result<Option<TestDefinition>, RepositoryError> {
        let guard = self.tests.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl ResultRepository for UnavailableRepository {
    fn test(&self, _id: &TestId) -> Result<Option<TestDefinition>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (ResultService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::with_tests(vec![
        temperament_test(),
        empty_test(),
    ]));
    let service = ResultService::new(repository.clone());
    (service, repository)
}

pub(super) fn result_router_with_service(
    service: ResultService<MemoryRepository>,
) -> axum::Router {
    result_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
