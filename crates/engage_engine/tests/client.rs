use std::time::Duration;

use bytes::Bytes;
use engage_engine::{
    AnalysisBackend, ClientSettings, ExtractionReply, FailureKind, ReqwestBackend, UploadFile,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ClientSettings {
    ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    }
}

fn photo() -> UploadFile {
    UploadFile {
        name: "post.png".to_string(),
        media_type: "image/png".to_string(),
        bytes: Bytes::from_static(b"fake-png-bytes"),
    }
}

#[tokio::test]
async fn extract_posts_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"post.png\""))
        .and(body_string_contains("fake-png-bytes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"filename": "post.png", "text": "hello world"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(settings_for(&server)).unwrap();
    let reply = backend.extract(&photo()).await.expect("extract ok");

    assert_eq!(
        reply,
        ExtractionReply::Extracted {
            text: Some("hello world".to_string()),
            filename: Some("post.png".to_string()),
        }
    );
}

#[tokio::test]
async fn extract_reports_missing_text_as_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"filename": "a.png"})))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(settings_for(&server)).unwrap();
    let reply = backend.extract(&photo()).await.unwrap();

    assert_eq!(
        reply,
        ExtractionReply::Extracted {
            text: None,
            filename: Some("a.png".to_string()),
        }
    );
}

#[tokio::test]
async fn extract_failure_status_surfaces_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "unsupported file"})))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(settings_for(&server)).unwrap();
    let reply = backend.extract(&photo()).await.unwrap();

    assert_eq!(
        reply,
        ExtractionReply::Rejected {
            status: 400,
            payload: json!({"error": "unsupported file"}),
        }
    );
}

#[tokio::test]
async fn extract_failure_with_plain_body_becomes_string_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(413).set_body_string("Request Entity Too Large"))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(settings_for(&server)).unwrap();
    let reply = backend.extract(&photo()).await.unwrap();

    assert_eq!(
        reply,
        ExtractionReply::Rejected {
            status: 413,
            payload: json!("Request Entity Too Large"),
        }
    );
}

#[tokio::test]
async fn extract_success_with_invalid_json_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(settings_for(&server)).unwrap();
    let err = backend.extract(&photo()).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidBody);
}

#[tokio::test]
async fn oversized_upload_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_upload_bytes: 4,
        ..settings_for(&server)
    };
    let backend = ReqwestBackend::new(settings).unwrap();
    let err = backend.extract(&photo()).await.unwrap_err();

    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 4,
            actual: Some(14),
        }
    );
}

#[tokio::test]
async fn recommend_posts_text_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"text": "hello world"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "source": "local-fallback",
            "recommendations": ["Post more often"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(settings_for(&server)).unwrap();
    let payload = backend.recommend("hello world").await.unwrap();

    assert_eq!(payload["source"], "local-fallback");
}

#[tokio::test]
async fn recommend_returns_body_regardless_of_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "No text provided"})))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(settings_for(&server)).unwrap();
    let payload = backend.recommend("").await.unwrap();

    assert_eq!(payload, json!({"error": "No text provided"}));
}

#[tokio::test]
async fn recommend_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"source": "error"})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Some(Duration::from_millis(50)),
        ..settings_for(&server)
    };
    let backend = ReqwestBackend::new(settings).unwrap();
    let err = backend.recommend("slow").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn response_over_limit_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_response_bytes: 10,
        ..settings_for(&server)
    };
    let backend = ReqwestBackend::new(settings).unwrap();
    let err = backend.recommend("text").await.unwrap_err();

    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11),
        }
    );
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let settings = ClientSettings {
        base_url: format!("http://127.0.0.1:{port}"),
        ..ClientSettings::default()
    };
    let backend = ReqwestBackend::new(settings).unwrap();
    let err = backend.recommend("text").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::Network);
    assert!(err.to_string().starts_with("network error: "));
}

#[test]
fn invalid_base_url_is_rejected() {
    let settings = ClientSettings {
        base_url: "::not-a-url::".to_string(),
        ..ClientSettings::default()
    };
    let err = ReqwestBackend::new(settings).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
