//! Local preview of the selected file.
//!
//! Previews never touch the network. Each image or document preview is
//! backed by a revocable reference owned by the front-end; selecting another
//! file always revokes the previous one.
use crate::{Effect, SelectedFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PreviewHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Document,
    Unsupported,
}

impl PreviewKind {
    /// Categorizes a declared media type: `image/*` and `application/pdf`
    /// get a visual preview, everything else does not.
    pub fn classify(media_type: &str) -> Self {
        let media_type = media_type.trim().to_ascii_lowercase();
        if media_type.starts_with("image/") {
            PreviewKind::Image
        } else if media_type == "application/pdf" {
            PreviewKind::Document
        } else {
            PreviewKind::Unsupported
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewState {
    file_name: Option<String>,
    kind: Option<PreviewKind>,
    handle: Option<PreviewHandle>,
    next_handle: u64,
}

impl PreviewState {
    pub(crate) fn select(&mut self, file: &SelectedFile) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if let Some(handle) = self.handle.take() {
            effects.push(Effect::RevokePreview { handle });
        }

        let kind = PreviewKind::classify(file.media_type());
        if kind != PreviewKind::Unsupported {
            self.next_handle += 1;
            let handle = PreviewHandle(self.next_handle);
            self.handle = Some(handle);
            effects.push(Effect::CreatePreview {
                handle,
                kind,
                file: file.clone(),
            });
        }

        self.file_name = Some(file.name().to_string());
        self.kind = Some(kind);
        effects
    }

    pub fn kind(&self) -> Option<PreviewKind> {
        self.kind
    }

    pub fn handle(&self) -> Option<PreviewHandle> {
        self.handle
    }

    pub fn view(&self) -> PreviewView {
        PreviewView {
            file_name: self.file_name.clone(),
            handle: self.handle,
            image_visible: self.kind == Some(PreviewKind::Image),
            document_visible: self.kind == Some(PreviewKind::Document),
            message_visible: self.kind.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewView {
    pub file_name: Option<String>,
    pub handle: Option<PreviewHandle>,
    pub image_visible: bool,
    pub document_visible: bool,
    pub message_visible: bool,
}
