use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use engage_core::{DragGesture, Msg, SelectedFile};

use super::constants::*;
use crate::platform::app::UiEvent;

/// Turns one line of terminal input into UI events.
pub(crate) fn parse_line(line: &str) -> Vec<UiEvent> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        CMD_HELP | "?" => vec![UiEvent::Help],
        CMD_QUIT | "exit" => vec![UiEvent::Quit],
        CMD_SUBMIT => vec![UiEvent::Core(Msg::SubmitClicked)],
        CMD_DISMISS => vec![UiEvent::Core(Msg::NoticeDismissed)],
        CMD_HOVER => vec![UiEvent::Core(Msg::Drag(DragGesture::Enter))],
        CMD_LEAVE => vec![UiEvent::Core(Msg::Drag(DragGesture::Leave))],
        CMD_OPEN => match split_paths(rest).into_iter().next() {
            Some(path) => match load_file(&path) {
                Ok(file) => vec![UiEvent::Core(Msg::FilesPicked(vec![file]))],
                Err(err) => vec![unreadable(&path, &err)],
            },
            None => vec![UiEvent::Invalid(format!("Usage: {CMD_OPEN} <path>"))],
        },
        CMD_DROP => drop_events(split_paths(rest)),
        _ => {
            // Terminals paste the path of a file dragged onto them.
            let paths = split_paths(line);
            if !paths.is_empty() && paths.iter().all(|path| path.is_file()) {
                drop_events(paths)
            } else {
                vec![UiEvent::Invalid(format!(
                    "Unknown command: {line} (type `{CMD_HELP}`)"
                ))]
            }
        }
    }
}

fn drop_events(paths: Vec<PathBuf>) -> Vec<UiEvent> {
    let mut events = vec![
        UiEvent::Core(Msg::Drag(DragGesture::Enter)),
        UiEvent::Core(Msg::Drag(DragGesture::Over)),
    ];
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match load_file(&path) {
            Ok(file) => files.push(file),
            Err(err) => events.push(unreadable(&path, &err)),
        }
    }
    events.push(UiEvent::Core(Msg::Drag(DragGesture::Drop(files))));
    events
}

fn unreadable(path: &Path, err: &io::Error) -> UiEvent {
    UiEvent::Invalid(format!("Cannot read {}: {}", path.display(), err))
}

/// Splits shell-style path arguments: quotes group, backslash escapes the next char.
fn split_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    in_token = true;
                }
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        paths.push(PathBuf::from(std::mem::take(&mut current)));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if in_token {
        paths.push(PathBuf::from(current));
    }
    paths
}

pub(crate) fn load_file(path: &Path) -> io::Result<SelectedFile> {
    let content = fs::read(path)?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SelectedFile::new(name, media_type_for(path), content))
}

/// Declared media type of a local file, from its extension.
pub(crate) fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
