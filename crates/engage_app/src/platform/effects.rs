use std::path::Path;
use std::sync::mpsc;
use std::thread;

use engage_core::{
    Effect, ExtractionOutcome, Msg, PreviewHandle, RecommendationOutcome, SelectedFile,
};
use engage_engine::{
    ClientSettings, EngineError, EngineEvent, EngineHandle, ExtractionReply, PreviewStore,
    UploadFile,
};
use engage_logging::{engage_info, engage_warn};

use super::app::UiEvent;

/// Executes core effects: previews locally, requests through the engine.
pub struct EffectRunner {
    engine: EngineHandle,
    previews: PreviewStore,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings, ui_tx: mpsc::Sender<UiEvent>) -> Result<Self, EngineError> {
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle::new(settings, event_tx)?;
        spawn_event_loop(event_rx, ui_tx);
        Ok(Self {
            engine,
            previews: PreviewStore::new(),
        })
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CreatePreview { handle, kind, file } => {
                    match self.previews.create(handle.0, &to_upload(&file)) {
                        Ok(location) => {
                            engage_info!("{:?} preview #{} at {:?}", kind, handle.0, location)
                        }
                        Err(err) => engage_warn!(
                            "Could not create preview #{} for {}: {}",
                            handle.0,
                            file.name(),
                            err
                        ),
                    }
                }
                Effect::RevokePreview { handle } => {
                    self.previews.revoke(handle.0);
                }
                Effect::ExtractText { cycle, file } => {
                    engage_info!(
                        "ExtractText cycle={} name={} bytes={}",
                        cycle,
                        file.name(),
                        file.len()
                    );
                    self.engine.extract(cycle, to_upload(&file));
                }
                Effect::RequestRecommendations { cycle, text } => {
                    engage_info!("RequestRecommendations cycle={} chars={}", cycle, text.len());
                    self.engine.recommend(cycle, text);
                }
            }
        }
    }

    pub fn preview_location(&self, handle: PreviewHandle) -> Option<&Path> {
        self.previews.location(handle.0)
    }
}

fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, ui_tx: mpsc::Sender<UiEvent>) {
    thread::spawn(move || {
        for event in event_rx {
            if ui_tx.send(UiEvent::Core(map_event(event))).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ExtractionCompleted { cycle, result } => Msg::ExtractionFinished {
            cycle,
            outcome: match result {
                Ok(ExtractionReply::Extracted { text, .. }) => ExtractionOutcome::Extracted { text },
                Ok(ExtractionReply::Rejected { status, payload }) => {
                    engage_warn!("Upload rejected with status {}", status);
                    ExtractionOutcome::Rejected { payload }
                }
                Err(err) => ExtractionOutcome::Failed {
                    reason: err.to_string(),
                },
            },
        },
        EngineEvent::RecommendationCompleted { cycle, result } => Msg::RecommendationFinished {
            cycle,
            outcome: match result {
                Ok(payload) => RecommendationOutcome::Received(payload),
                Err(err) => RecommendationOutcome::Failed {
                    reason: err.to_string(),
                },
            },
        },
    }
}

fn to_upload(file: &SelectedFile) -> UploadFile {
    UploadFile {
        name: file.name().to_string(),
        media_type: file.media_type().to_string(),
        bytes: file.content().clone(),
    }
}
