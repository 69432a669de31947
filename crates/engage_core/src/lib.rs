//! Engage core: pure state machine for the upload, analyze and render cycle.
mod drop_zone;
mod effect;
mod file;
mod msg;
mod preview;
mod recommendation;
mod render;
mod state;
mod update;
mod view_model;

pub use drop_zone::{DragGesture, DropZone};
pub use effect::Effect;
pub use file::SelectedFile;
pub use msg::{ExtractionOutcome, Msg, RecommendationOutcome};
pub use preview::{PreviewHandle, PreviewKind, PreviewState, PreviewView};
pub use recommendation::{EngagementMetrics, RecommendationEntry, RecommendationResult};
pub use render::{pretty_dump, render, Fragment, Inline, ListItem, Node, ERROR_PREFIX, UNKNOWN_ERROR};
pub use state::{Activity, AppState, CycleId, CycleStep};
pub use update::{update, MISSING_FILE_NOTICE, NO_TEXT_PLACEHOLDER, UPLOAD_ERROR_PREFIX};
pub use view_model::AppViewModel;
