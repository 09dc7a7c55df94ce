use super::common::*;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::matching::router::resolve_handler;
use crate::matching::{ResultService, ResultSubmission};

async fn post_json(router: axum::Router, uri: &str, body: Value) -> axum::response::Response {
    router
        .oneshot(
            axum::http::Request::post(uri)
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .expect("route executes")
}

#[tokio::test]
async fn result_route_resolves_selections() {
    let (service, _) = build_service();
    let router = result_router_with_service(service);

    let response = post_json(
        router,
        "/api/v1/tests/temperament/result",
        json!({
            "answers": [
                { "question_id": "q1", "choice_id": "a" },
                { "question_id": "q2", "choice_id": "a" },
                { "question_id": "q3", "choice_id": "b" }
            ],
            "gender": "female"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result_id"], "extravert");
    assert_eq!(payload["strategy"], "single_code");
    assert_eq!(payload["total_score"], 7);
    assert_eq!(payload["dominant_codes"][0]["code"], "E");
    assert!(payload.get("resolved_at").is_some());
}

#[tokio::test]
async fn result_route_maps_unknown_tests_to_not_found() {
    let (service, _) = build_service();
    let router = result_router_with_service(service);

    let response = post_json(
        router,
        "/api/v1/tests/nope/result",
        json!({ "answers": [] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["test_id"], "nope");
}

#[tokio::test]
async fn result_route_rejects_unknown_choices() {
    let (service, _) = build_service();
    let router = result_router_with_service(service);

    let response = post_json(
        router,
        "/api/v1/tests/temperament/result",
        json!({ "answers": [{ "question_id": "q1", "choice_id": "zz" }] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn result_route_resolves_unlisted_genders() {
    let (service, _) = build_service();
    let router = result_router_with_service(service);

    let response = post_json(
        router,
        "/api/v1/tests/temperament/result",
        json!({ "answers": [{ "question_id": "q1", "choice_id": "a" }], "gender": "other" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result_id"], "extravert");
    assert_eq!(payload["strategy"], "single_code");
}

#[tokio::test]
async fn result_route_treats_blank_gender_as_absent() {
    for gender in [json!(""), json!("  "), json!(null), json!("Female")] {
        let (service, _) = build_service();
        let router = result_router_with_service(service);

        let response = post_json(
            router,
            "/api/v1/tests/temperament/result",
            json!({ "answers": [{ "question_id": "q1", "choice_id": "b" }], "gender": gender }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK, "gender {gender}");
        let payload = read_json_body(response).await;
        assert_eq!(payload["result_id"], "introvert");
    }
}

#[tokio::test]
async fn result_route_reports_tests_without_outcomes_as_conflict() {
    let (service, _) = build_service();
    let router = result_router_with_service(service);

    let response = post_json(
        router,
        "/api/v1/tests/unfinished/result",
        json!({ "answers": [{ "question_id": "q1", "choice_id": "a", "score": 1 }] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "test unfinished has no defined outcomes");
}

#[tokio::test]
async fn resolve_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(ResultService::new(Arc::new(UnavailableRepository)));

    let response = resolve_handler::<UnavailableRepository>(
        State(service),
        Path("temperament".to_string()),
        axum::Json(ResultSubmission {
            answers: Vec::new(),
            gender: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn summary_route_returns_tally() {
    let (service, _) = build_service();
    let router = result_router_with_service(service);

    let response = post_json(
        router,
        "/api/v1/tests/temperament/summary",
        json!({ "answers": [
            { "question_id": "q1", "choice_id": "b" },
            { "question_id": "q2", "choice_id": "a" }
        ] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_score"], 4);
    assert_eq!(payload["code_sequence"], json!(["I", "E"]));
    assert_eq!(payload["dominant_codes"][0]["code"], "I");
}
