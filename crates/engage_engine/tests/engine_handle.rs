use std::sync::{mpsc, Arc};
use std::time::Duration;

use bytes::Bytes;
use engage_engine::{
    AnalysisBackend, EngineEvent, EngineHandle, ExtractionReply, FailureKind, TransportError,
    UploadFile,
};
use serde_json::{json, Value};

/// Backend that answers from fixed data and panics on request.
struct ScriptedBackend;

#[async_trait::async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn extract(&self, file: &UploadFile) -> Result<ExtractionReply, TransportError> {
        if file.name == "explode.png" {
            panic!("scripted panic");
        }
        Ok(ExtractionReply::Extracted {
            text: Some(format!("text of {}", file.name)),
            filename: Some(file.name.clone()),
        })
    }

    async fn recommend(&self, text: &str) -> Result<Value, TransportError> {
        if text == "explode" {
            panic!("scripted panic");
        }
        Ok(json!({"source": "local-fallback", "recommendations": [text]}))
    }
}

fn upload(name: &str) -> UploadFile {
    UploadFile {
        name: name.to_string(),
        media_type: "image/png".to_string(),
        bytes: Bytes::from_static(b"img"),
    }
}

fn start() -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    engage_logging::initialize_for_tests();
    let (tx, rx) = mpsc::channel();
    let handle = EngineHandle::with_backend(Arc::new(ScriptedBackend), tx).expect("engine");
    (handle, rx)
}

fn next_event(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    rx.recv_timeout(Duration::from_secs(5)).expect("engine event")
}

#[test]
fn extract_command_reports_completion() {
    let (engine, rx) = start();
    engine.extract(4, upload("post.png"));

    assert_eq!(
        next_event(&rx),
        EngineEvent::ExtractionCompleted {
            cycle: 4,
            result: Ok(ExtractionReply::Extracted {
                text: Some("text of post.png".to_string()),
                filename: Some("post.png".to_string()),
            }),
        }
    );
}

#[test]
fn recommend_command_reports_completion() {
    let (engine, rx) = start();
    engine.recommend(2, "hello");

    assert_eq!(
        next_event(&rx),
        EngineEvent::RecommendationCompleted {
            cycle: 2,
            result: Ok(json!({"source": "local-fallback", "recommendations": ["hello"]})),
        }
    );
}

#[test]
fn panicking_request_still_reports_back() {
    let (engine, rx) = start();
    engine.extract(1, upload("explode.png"));
    match next_event(&rx) {
        EngineEvent::ExtractionCompleted { cycle, result } => {
            assert_eq!(cycle, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::Aborted);
        }
        other => panic!("unexpected event {other:?}"),
    }

    engine.recommend(1, "explode");
    match next_event(&rx) {
        EngineEvent::RecommendationCompleted { cycle, result } => {
            assert_eq!(cycle, 1);
            assert_eq!(result.unwrap_err().kind, FailureKind::Aborted);
        }
        other => panic!("unexpected event {other:?}"),
    }
}
