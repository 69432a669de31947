use crate::{CycleId, PreviewHandle, PreviewKind, SelectedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Materialize a local reference to the file's bytes for previewing.
    CreatePreview {
        handle: PreviewHandle,
        kind: PreviewKind,
        file: SelectedFile,
    },
    /// Release a reference superseded by a newer selection.
    RevokePreview { handle: PreviewHandle },
    /// Upload the file to the extraction endpoint.
    ExtractText { cycle: CycleId, file: SelectedFile },
    /// Ask for recommendations on the extracted text.
    RequestRecommendations { cycle: CycleId, text: String },
}
