use crate::SelectedFile;

/// Pointer gestures over the drop region.
///
/// The drop zone consumes all four; none reach the host's default handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragGesture {
    Enter,
    Over,
    Leave,
    Drop(Vec<SelectedFile>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DropZone {
    active: bool,
}

impl DropZone {
    /// Applies a gesture to the "active" affordance and returns the file a
    /// drop installs, if the drop carried any.
    pub fn handle(&mut self, gesture: DragGesture) -> Option<SelectedFile> {
        match gesture {
            DragGesture::Enter | DragGesture::Over => {
                self.active = true;
                None
            }
            DragGesture::Leave => {
                self.active = false;
                None
            }
            DragGesture::Drop(files) => {
                self.active = false;
                files.into_iter().next()
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
