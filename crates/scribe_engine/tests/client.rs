use pretty_assertions::assert_eq;
use scribe_engine::{
    ClientSettings, FailureKind, HttpTranscribeService, RemoteStatus, TranscribeService,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer) -> HttpTranscribeService {
    HttpTranscribeService::new(&server.uri(), ClientSettings::default()).expect("client")
}

#[tokio::test]
async fn submit_posts_url_and_format_and_returns_the_task_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .and(body_json(json!({
            "url": "https://example.com/clip",
            "format": "plain",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "task_id": "abc123" })))
        .mount(&server)
        .await;

    let task_id = service(&server)
        .submit("https://example.com/clip", "plain")
        .await
        .expect("submit ok");
    assert_eq!(task_id, "abc123");
}

#[tokio::test]
async fn submit_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(ResponseTemplate::new(500).set_body_string("downstream exploded"))
        .mount(&server)
        .await;

    let err = service(&server)
        .submit("https://example.com/clip", "plain")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert!(err.message.contains("downstream exploded"));
}

#[tokio::test]
async fn malformed_submit_response_is_reported_as_such() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = service(&server)
        .submit("https://example.com/clip", "plain")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn invalid_base_url_is_rejected_at_construction() {
    let err = HttpTranscribeService::new("not a url", ClientSettings::default()).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidBaseUrl);
}

#[tokio::test]
async fn status_variants_decode() {
    let cases = [
        (json!({ "status": "pending" }), RemoteStatus::Pending),
        (json!({ "status": "started" }), RemoteStatus::Started),
        (
            json!({ "status": "processing", "progress": 45 }),
            RemoteStatus::Processing { progress: 45 },
        ),
        (
            json!({ "status": "completed", "transcript": "hello world" }),
            RemoteStatus::Completed {
                transcript: "hello world".to_string(),
            },
        ),
        (
            json!({ "status": "error", "error": "unsupported source" }),
            RemoteStatus::Error {
                message: "unsupported source".to_string(),
            },
        ),
    ];

    for (body, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/result/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let status = service(&server)
            .fetch_status("abc123")
            .await
            .expect("status ok");
        assert_eq!(status, expected, "body {body}");
    }
}

#[tokio::test]
async fn unknown_status_strings_are_tolerated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/result/abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "warming_up_gpu" })),
        )
        .mount(&server)
        .await;

    let status = service(&server)
        .fetch_status("abc123")
        .await
        .expect("status ok");
    assert_eq!(
        status,
        RemoteStatus::Unrecognized {
            status: "warming_up_gpu".to_string(),
        }
    );
}

#[tokio::test]
async fn missing_progress_defaults_to_zero_and_out_of_range_clamps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/result/no-progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "processing" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/result/overshoot"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "processing", "progress": 250.0 })),
        )
        .mount(&server)
        .await;

    let client = service(&server);
    assert_eq!(
        client.fetch_status("no-progress").await.expect("status ok"),
        RemoteStatus::Processing { progress: 0 }
    );
    assert_eq!(
        client.fetch_status("overshoot").await.expect("status ok"),
        RemoteStatus::Processing { progress: 100 }
    );
}

#[tokio::test]
async fn error_status_without_a_message_gets_the_generic_one() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/result/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "error" })))
        .mount(&server)
        .await;

    let status = service(&server)
        .fetch_status("abc123")
        .await
        .expect("status ok");
    assert_eq!(
        status,
        RemoteStatus::Error {
            message: "Transcription failed on the backend.".to_string(),
        }
    );
}

#[tokio::test]
async fn non_success_poll_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/result/abc123"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = service(&server).fetch_status("abc123").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}
