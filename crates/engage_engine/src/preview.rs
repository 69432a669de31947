use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use engage_logging::engage_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::UploadFile;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Local, revocable copies of selected files for previewing.
///
/// Each handle is backed by a temporary file that keeps the original
/// extension so external viewers recognise it. Revoking a handle, or dropping
/// the store, deletes the file.
#[derive(Debug, Default)]
pub struct PreviewStore {
    entries: HashMap<u64, NamedTempFile>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `file` under `handle`, replacing anything already stored there.
    pub fn create(&mut self, handle: u64, file: &UploadFile) -> Result<&Path, PreviewError> {
        let suffix = Path::new(&file.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        let mut tmp = tempfile::Builder::new()
            .prefix("engage-preview-")
            .suffix(&suffix)
            .tempfile()?;
        tmp.write_all(&file.bytes)?;
        tmp.flush()?;

        engage_debug!("Preview {} stored at {:?}", handle, tmp.path());
        self.entries.insert(handle, tmp);
        Ok(self.entries[&handle].path())
    }

    /// Deletes the preview for `handle`. Returns `false` if none was stored.
    pub fn revoke(&mut self, handle: u64) -> bool {
        match self.entries.remove(&handle) {
            Some(tmp) => {
                engage_debug!("Preview {} revoked", handle);
                drop(tmp);
                true
            }
            None => false,
        }
    }

    pub fn location(&self, handle: u64) -> Option<&Path> {
        self.entries.get(&handle).map(NamedTempFile::path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
