use std::fmt;

use bytes::Bytes;
use serde_json::Value;

pub type CycleId = u64;

/// File content handed to the extraction endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionReply {
    /// Success status. `text` is `None` when the body had no string `text` field.
    Extracted {
        text: Option<String>,
        filename: Option<String>,
    },
    /// Failure status with the server's diagnostic body. Bodies that are not
    /// JSON arrive as a JSON string.
    Rejected { status: u16, payload: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ExtractionCompleted {
        cycle: CycleId,
        result: Result<ExtractionReply, TransportError>,
    },
    RecommendationCompleted {
        cycle: CycleId,
        result: Result<Value, TransportError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    InvalidBody,
    /// The request task ended without reporting, e.g. it panicked.
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "payload too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::InvalidBody => write!(f, "invalid response body"),
            FailureKind::Aborted => write!(f, "request aborted"),
        }
    }
}
