use std::path::Path;

use engage_core::{AppViewModel, CycleStep, EngagementMetrics};

const MISSING: &str = "-";

/// Draws the whole screen as plain text.
pub fn render(view: &AppViewModel, preview_location: Option<&Path>) -> String {
    let status_text = match (view.busy, view.step) {
        (true, Some(step)) => format!("Status: Busy ({})", step_label(step)),
        (true, None) => "Status: Busy".to_string(),
        (false, _) => "Status: Idle".to_string(),
    };
    let submit_text = if view.submit_enabled {
        "submit ready"
    } else {
        "submit disabled"
    };

    let mut lines = vec![format!("{status_text} | {submit_text}")];

    let file_text = view.selected_file.as_deref().unwrap_or("(none)");
    lines.push(format!("File: {file_text}"));
    if let Some(preview) = preview_line(view, preview_location) {
        lines.push(preview);
    }
    if view.drop_active {
        lines.push("Drop zone: release to select".to_string());
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("! {notice}"));
    }

    if !view.extracted_text.is_empty() {
        lines.push(String::new());
        lines.push("Extracted text:".to_string());
        lines.extend(view.extracted_text.lines().map(|line| format!("  {line}")));
    }

    if let Some(metrics) = &view.metrics {
        lines.push(String::new());
        lines.push(format_metrics(metrics));
    }

    if !view.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("Recommendations:".to_string());
        lines.extend(
            view.recommendations
                .to_text()
                .lines()
                .map(|line| format!("  {line}")),
        );
    }

    lines.join("\n")
}

fn preview_line(view: &AppViewModel, location: Option<&Path>) -> Option<String> {
    let preview = &view.preview;
    let label = if preview.image_visible {
        "image"
    } else if preview.document_visible {
        "document"
    } else if preview.message_visible {
        return Some("Preview: not available for this file type".to_string());
    } else {
        return None;
    };
    Some(match location {
        Some(path) => format!("Preview ({label}): {}", path.display()),
        None => format!("Preview ({label}): unavailable"),
    })
}

fn step_label(step: CycleStep) -> &'static str {
    match step {
        CycleStep::Extracting => "extracting text",
        CycleStep::Recommending => "fetching recommendations",
    }
}

fn format_metrics(metrics: &EngagementMetrics) -> String {
    format!(
        "Likes: {} -> {} | Comments: {} -> {}",
        count(metrics.likes),
        count(metrics.updated_likes),
        count(metrics.comments),
        count(metrics.updated_comments)
    )
}

fn count(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use engage_core::{
        AppViewModel, CycleStep, EngagementMetrics, Fragment, Inline, ListItem, Node,
        PreviewHandle, PreviewView,
    };

    use super::render;

    #[test]
    fn idle_screen_without_selection() {
        let text = render(&AppViewModel::default(), None);
        assert_eq!(text, "Status: Idle | submit disabled\nFile: (none)");
    }

    #[test]
    fn busy_screen_names_the_step() {
        let view = AppViewModel {
            busy: true,
            step: Some(CycleStep::Recommending),
            selected_file: Some("post.png".to_string()),
            ..AppViewModel::default()
        };
        let text = render(&view, None);
        assert!(text.starts_with("Status: Busy (fetching recommendations) | submit disabled"));
    }

    #[test]
    fn image_preview_shows_location() {
        let view = AppViewModel {
            submit_enabled: true,
            selected_file: Some("post.png".to_string()),
            preview: PreviewView {
                file_name: Some("post.png".to_string()),
                handle: Some(PreviewHandle(1)),
                image_visible: true,
                document_visible: false,
                message_visible: true,
            },
            ..AppViewModel::default()
        };
        let text = render(&view, Some(Path::new("/tmp/engage-preview-1.png")));
        assert!(text.contains("Preview (image): /tmp/engage-preview-1.png"));
    }

    #[test]
    fn unsupported_file_shows_message_only() {
        let view = AppViewModel {
            selected_file: Some("notes.txt".to_string()),
            preview: PreviewView {
                file_name: Some("notes.txt".to_string()),
                handle: None,
                image_visible: false,
                document_visible: false,
                message_visible: true,
            },
            ..AppViewModel::default()
        };
        let text = render(&view, None);
        assert!(text.contains("Preview: not available for this file type"));
    }

    #[test]
    fn results_sections_render_in_order() {
        let view = AppViewModel {
            extracted_text: "hello\nworld".to_string(),
            metrics: Some(EngagementMetrics {
                likes: Some(10),
                comments: None,
                updated_likes: Some(15),
                updated_comments: Some(3),
            }),
            recommendations: Fragment {
                nodes: vec![Node::List(vec![ListItem {
                    spans: vec![
                        Inline::Strong("Tone:".to_string()),
                        Inline::Text(" Be more casual".to_string()),
                    ],
                }])],
            },
            notice: Some("Please select a file.".to_string()),
            ..AppViewModel::default()
        };
        let text = render(&view, None);
        let expected_tail = "\
! Please select a file.

Extracted text:
  hello
  world

Likes: 10 -> 15 | Comments: - -> 3

Recommendations:
  - **Tone:** Be more casual";
        assert!(text.ends_with(expected_tail), "{text}");
    }
}
