// Integration tests for the API gateway against a mock REST backend

mod common;

use common::RecordingInvalidator;
use folio_admin::gateway::{ApiGateway, ApiRequest, Outcome};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gateway(server: &MockServer) -> (ApiGateway, Arc<RecordingInvalidator>) {
    let invalidator = Arc::new(RecordingInvalidator::default());
    let gateway = ApiGateway::new(
        &format!("{}/api", server.uri()),
        Duration::from_secs(5),
        invalidator.clone(),
    )
    .unwrap();
    (gateway, invalidator)
}

#[tokio::test]
async fn test_outcome_is_ok_only_for_2xx() {
    let server = MockServer::start().await;
    let (gateway, _) = gateway(&server).await;

    for status in [200u16, 201, 202, 204, 300, 404, 500] {
        Mock::given(method("GET"))
            .and(path(format!("/api/status/{}", status)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let outcome = gateway.get(format!("status/{}", status)).await;
        assert_eq!(outcome.is_ok(), (200..300).contains(&status), "status {}", status);
        if !outcome.is_ok() {
            assert_eq!(outcome.status(), Some(status));
        }
    }
}

#[tokio::test]
async fn test_get_returns_json_data_without_invalidation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"_id": "42"}])))
        .expect(1)
        .mount(&server)
        .await;
    let (gateway, invalidator) = gateway(&server).await;

    let outcome = gateway.call(ApiRequest::get("/projects")).await;

    assert_eq!(outcome, Outcome::Ok { data: json!([{"_id": "42"}]) });
    assert!(invalidator.paths().is_empty());
}

#[tokio::test]
async fn test_successful_mutations_invalidate_once() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/projects/42"))
        .and(body_json(json!({"company": "Acme"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "43"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/projects/42"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let (gateway, invalidator) = gateway(&server).await;

    assert!(gateway.call(ApiRequest::patch("projects/42", json!({"company": "Acme"}))).await.is_ok());
    assert_eq!(invalidator.paths(), vec!["/admin/projects/42"]);

    assert!(gateway.call(ApiRequest::post("projects", json!({}))).await.is_ok());
    assert!(gateway.call(ApiRequest::delete("projects/42")).await.is_ok());
    assert_eq!(
        invalidator.paths(),
        vec!["/admin/projects/42", "/admin/projects", "/admin/projects/42"]
    );
}

#[tokio::test]
async fn test_failed_mutation_reports_body_and_skips_invalidation() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/blog/7"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "Slug taken"})))
        .mount(&server)
        .await;
    let (gateway, invalidator) = gateway(&server).await;

    let outcome = gateway.call(ApiRequest::patch("/blog/7", json!({"title": "x"}))).await;

    assert_eq!(outcome.status(), Some(422));
    assert_eq!(outcome.error_message().as_deref(), Some("Slug taken"));
    assert!(invalidator.paths().is_empty());
}

#[tokio::test]
async fn test_transport_failure_defaults_to_400() {
    let invalidator = Arc::new(RecordingInvalidator::default());
    // Nothing listens on the discard port.
    let gateway = ApiGateway::new("http://127.0.0.1:9/api", Duration::from_secs(2), invalidator.clone()).unwrap();

    let outcome = gateway.call(ApiRequest::delete("projects/42")).await;

    match outcome {
        Outcome::Error { status, error } => {
            assert_eq!(status, 400);
            assert!(error.is_string());
        }
        other => panic!("expected error outcome, got {:?}", other),
    }
    assert!(invalidator.paths().is_empty());
}
