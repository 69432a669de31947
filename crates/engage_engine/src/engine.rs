use std::sync::{mpsc, Arc};
use std::thread;

use engage_logging::{engage_debug, engage_error};

use crate::client::{AnalysisBackend, ClientSettings, ReqwestBackend};
use crate::{CycleId, EngineEvent, FailureKind, TransportError, UploadFile};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("invalid client settings: {0}")]
    Client(#[from] TransportError),
}

enum EngineCommand {
    Extract { cycle: CycleId, file: UploadFile },
    Recommend { cycle: CycleId, text: String },
}

/// Runs backend requests on a background runtime. Every accepted command
/// produces exactly one [`EngineEvent`] on the events channel.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        settings: ClientSettings,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let backend = Arc::new(ReqwestBackend::new(settings)?);
        Self::with_backend(backend, events)
    }

    pub fn with_backend(
        backend: Arc<dyn AnalysisBackend>,
        events: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("engage-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let events = events.clone();
                    runtime.spawn(async move {
                        handle_command(backend.as_ref(), command, events).await;
                    });
                }
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn extract(&self, cycle: CycleId, file: UploadFile) {
        let _ = self.cmd_tx.send(EngineCommand::Extract { cycle, file });
    }

    pub fn recommend(&self, cycle: CycleId, text: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Recommend {
            cycle,
            text: text.into(),
        });
    }
}

async fn handle_command(
    backend: &dyn AnalysisBackend,
    command: EngineCommand,
    events: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Extract { cycle, file } => {
            let guard = CompletionGuard::new(
                events,
                EngineEvent::ExtractionCompleted {
                    cycle,
                    result: Err(aborted()),
                },
            );
            engage_debug!("Cycle {} uploading {}", cycle, file.name);
            let result = backend.extract(&file).await;
            guard.complete(EngineEvent::ExtractionCompleted { cycle, result });
        }
        EngineCommand::Recommend { cycle, text } => {
            let guard = CompletionGuard::new(
                events,
                EngineEvent::RecommendationCompleted {
                    cycle,
                    result: Err(aborted()),
                },
            );
            engage_debug!("Cycle {} requesting recommendations", cycle);
            let result = backend.recommend(&text).await;
            guard.complete(EngineEvent::RecommendationCompleted { cycle, result });
        }
    }
}

fn aborted() -> TransportError {
    TransportError::new(FailureKind::Aborted, "request task ended without a result")
}

/// Sends the fallback event when dropped without [`CompletionGuard::complete`],
/// so a panicking or cancelled request still reports back.
struct CompletionGuard {
    events: mpsc::Sender<EngineEvent>,
    fallback: Option<EngineEvent>,
}

impl CompletionGuard {
    fn new(events: mpsc::Sender<EngineEvent>, fallback: EngineEvent) -> Self {
        Self {
            events,
            fallback: Some(fallback),
        }
    }

    fn complete(mut self, event: EngineEvent) {
        self.fallback = None;
        let _ = self.events.send(event);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(event) = self.fallback.take() {
            engage_error!("Request task ended early; reporting {:?}", event);
            let _ = self.events.send(event);
        }
    }
}
