use serde_json::Value;

use crate::{CycleId, DragGesture, SelectedFile};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// File picker changed; the first file (if any) becomes the selection.
    FilesPicked(Vec<SelectedFile>),
    /// Gesture over the drop region.
    Drag(DragGesture),
    /// User submitted the current selection for analysis.
    SubmitClicked,
    /// Engine result of the extraction request.
    ExtractionFinished {
        cycle: CycleId,
        outcome: ExtractionOutcome,
    },
    /// Engine result of the recommendation request.
    RecommendationFinished {
        cycle: CycleId,
        outcome: RecommendationOutcome,
    },
    /// User acknowledged the current notice.
    NoticeDismissed,
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// Success status; `text` is absent when the server sent none.
    Extracted { text: Option<String> },
    /// Failure status with the server's diagnostic payload.
    Rejected { payload: Value },
    /// The request never produced a usable response.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    /// Response body, whatever the HTTP status.
    Received(Value),
    Failed { reason: String },
}
