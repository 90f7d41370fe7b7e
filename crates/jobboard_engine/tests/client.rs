use std::time::Duration;

use jobboard_core::{FilterCriteria, JobType};
use jobboard_engine::{ApiConfig, ApiErrorKind, ErrorCategory, JobApi, ReqwestJobApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn job_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "job_title": title,
        "job_type": "hybrid",
        "required_skills": "Rust, SQL",
        "company_name": "Acme",
        "salary_currency": null,
        "user": { "id": 3, "name": "Grace" }
    })
}

fn api_for(server: &MockServer) -> ReqwestJobApi {
    let config = ApiConfig::from_var(Some(&server.uri())).expect("config");
    ReqwestJobApi::new(config).expect("client")
}

#[tokio::test]
async fn fetch_jobs_posts_criteria_and_decodes_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get-jobs-open/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "search_term": "engineer",
            "job_type": "full-time",
            "location": "Lagos",
            "skills": ["rust", "go"]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([job_json("1", "Engineer"), job_json("2", "Lead")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let criteria = FilterCriteria {
        search_term: "engineer".into(),
        job_type: JobType::FullTime,
        location: "Lagos".into(),
        skills: vec!["rust".into(), "go".into()],
    };
    let jobs = api_for(&server).fetch_jobs(&criteria).await.expect("jobs");

    let titles: Vec<_> = jobs.iter().map(|j| j.job_title.as_str()).collect();
    assert_eq!(titles, vec!["Engineer", "Lead"]);
    assert_eq!(jobs[0].skills(), vec!["Rust", "SQL"]);
}

#[tokio::test]
async fn fetch_jobs_sends_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get-jobs-open/"))
        .and(body_json(json!({
            "search_term": "",
            "job_type": "hybrid",
            "location": "",
            "skills": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = api_for(&server)
        .fetch_jobs(&FilterCriteria::default())
        .await
        .expect("jobs");
    assert!(jobs.is_empty());
}

#[tokio::test]
async fn fetch_job_gets_single_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/get-job-item/abc123/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(job_json("abc123", "Engineer")))
        .mount(&server)
        .await;

    let job = api_for(&server).fetch_job("abc123").await.expect("job");
    assert_eq!(job.id, "abc123");
    assert_eq!(job.user.map(|u| u.id), Some("3".to_string()));
}

#[tokio::test]
async fn malformed_job_payload_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/get-job-item/abc123/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).fetch_job("abc123").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Parse);
    assert_eq!(err.category(), ErrorCategory::Parse);
    assert!(!err.message.is_empty());
}

#[tokio::test]
async fn unexpected_shape_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get-jobs-open/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "detail": "nope" })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_jobs(&FilterCriteria::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Parse);
}

#[tokio::test]
async fn server_error_is_network_category() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get-jobs-open/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_jobs(&FilterCriteria::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::HttpStatus(500));
    assert_eq!(err.category(), ErrorCategory::Network);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/job/get-job-item/slow/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(job_json("slow", "Slow")),
        )
        .mount(&server)
        .await;

    let mut config = ApiConfig::from_var(Some(&server.uri())).unwrap();
    config.request_timeout = Duration::from_millis(50);
    let api = ReqwestJobApi::new(config).unwrap();

    let err = api.fetch_job("slow").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Timeout);
    assert_eq!(err.category(), ErrorCategory::Network);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/job/get-jobs-open/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[                ]"))
        .mount(&server)
        .await;

    let mut config = ApiConfig::from_var(Some(&server.uri())).unwrap();
    config.max_bytes = 10;
    let api = ReqwestJobApi::new(config).unwrap();

    let err = api
        .fetch_jobs(&FilterCriteria::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ApiErrorKind::TooLarge { max_bytes: 10, .. }
    ));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let config = ApiConfig::from_var(Some("http://127.0.0.1:1")).unwrap();
    let api = ReqwestJobApi::new(config).unwrap();

    let err = api.fetch_job("abc123").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Network);
    assert!(!err.message.is_empty());
}
