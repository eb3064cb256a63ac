//! HTTP submitter and fetcher against a mock backend

use geoproj_backend::{HttpFetcher, HttpProjectSubmitter};
use geoproj_core::error::GeoprojError;
use geoproj_core::models::{ResourceLocator, SubmissionPayload, GENERIC_SUBMISSION_FAILURE};
use geoproj_core::ports::{ProjectSubmitter, ResourceFetcher};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload() -> SubmissionPayload {
    SubmissionPayload {
        name: "Reforestation".to_string(),
        location: "Brazil".to_string(),
        state: "Parana".to_string(),
        climate_zone: "Warm Temperate Moist".to_string(),
        ecological_zone: "unknown".to_string(),
        start_period: "2026-01-01".to_string(),
        end_period: "2030-01-01".to_string(),
    }
}

fn submission_message(err: GeoprojError) -> String {
    match err {
        GeoprojError::Submission { message } => message,
        other => panic!("expected a submission error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_posts_camel_case_body_and_returns_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project"))
        .and(body_json(json!({
            "name": "Reforestation",
            "location": "Brazil",
            "state": "Parana",
            "climateZone": "Warm Temperate Moist",
            "ecologicalZone": "unknown",
            "startPeriod": "2026-01-01",
            "endPeriod": "2030-01-01"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 7 })))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = HttpProjectSubmitter::new(format!("{}/project", server.uri()));
    let body = submitter.submit(&payload()).await.unwrap();

    assert_eq!(body, json!({ "id": 7 }));
    server.verify().await;
}

#[tokio::test]
async fn test_server_error_message_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/project"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Database unavailable" })),
        )
        .mount(&server)
        .await;

    let submitter = HttpProjectSubmitter::new(format!("{}/project", server.uri()));
    let err = submitter.submit(&payload()).await.unwrap_err();

    assert_eq!(submission_message(err), "Database unavailable");
}

#[tokio::test]
async fn test_error_field_and_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conflict"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "error": "Project exists" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/gateway"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let conflict = HttpProjectSubmitter::new(format!("{}/conflict", server.uri()));
    assert_eq!(submission_message(conflict.submit(&payload()).await.unwrap_err()), "Project exists");

    let gateway = HttpProjectSubmitter::new(format!("{}/gateway", server.uri()));
    assert_eq!(submission_message(gateway.submit(&payload()).await.unwrap_err()), "Bad Gateway");
}

#[tokio::test]
async fn test_empty_error_body_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let submitter = HttpProjectSubmitter::new(format!("{}/project", server.uri()));
    let err = submitter.submit(&payload()).await.unwrap_err();

    assert_eq!(submission_message(err), GENERIC_SUBMISSION_FAILURE);
}

#[tokio::test]
async fn test_non_json_success_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let submitter = HttpProjectSubmitter::new(format!("{}/project", server.uri()));
    assert!(submitter.submit(&payload()).await.is_err());
}

#[tokio::test]
async fn test_fetcher_reads_remote_dataset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gez.geojson"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"type":"FeatureCollection","features":[]}"#),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new();
    let content = fetcher
        .fetch(&ResourceLocator::Url(format!("{}/gez.geojson", server.uri())))
        .await
        .unwrap();
    assert!(content.contains("FeatureCollection"));

    let missing = fetcher
        .fetch(&ResourceLocator::Url(format!("{}/missing.geojson", server.uri())))
        .await
        .unwrap_err();
    assert!(matches!(missing, GeoprojError::DatasetLoad { .. }));
}
