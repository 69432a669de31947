//! Engage engine: backend requests, effect execution and preview storage.
mod client;
mod engine;
mod preview;
mod types;

pub use client::{AnalysisBackend, ClientSettings, ReqwestBackend};
pub use engine::{EngineError, EngineHandle};
pub use preview::{PreviewError, PreviewStore};
pub use types::{
    CycleId, EngineEvent, ExtractionReply, FailureKind, TransportError, UploadFile,
};
