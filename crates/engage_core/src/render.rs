//! Maps recommendation payloads to a display fragment.
//!
//! Rendering is total: every [`RecommendationResult`] yields visible output.
use serde_json::Value;

use crate::{RecommendationEntry, RecommendationResult};

pub const ERROR_PREFIX: &str = "AI call error: ";
pub const UNKNOWN_ERROR: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    List(Vec<ListItem>),
    Line(String),
    /// Formatted JSON dump, shown with whitespace preserved.
    Preformatted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub spans: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Strong(String),
    Text(String),
}

impl ListItem {
    fn text(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Inline::Text(text.into())],
        }
    }

    /// Concatenated text of all spans, without markup.
    pub fn plain_text(&self) -> String {
        self.spans
            .iter()
            .map(|span| match span {
                Inline::Strong(text) | Inline::Text(text) => text.as_str(),
            })
            .collect()
    }
}

impl Fragment {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Escaped HTML for embedding in a page.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::List(items) => {
                    out.push_str("<ul>");
                    for item in items {
                        out.push_str("<li>");
                        for span in &item.spans {
                            match span {
                                Inline::Strong(text) => {
                                    out.push_str("<b>");
                                    out.push_str(&escape_html(text));
                                    out.push_str("</b>");
                                }
                                Inline::Text(text) => out.push_str(&escape_html(text)),
                            }
                        }
                        out.push_str("</li>");
                    }
                    out.push_str("</ul>");
                }
                Node::Line(text) => {
                    out.push_str("<p>");
                    out.push_str(&escape_html(text));
                    out.push_str("</p>");
                }
                Node::Preformatted(text) => {
                    out.push_str("<pre>");
                    out.push_str(&escape_html(text));
                    out.push_str("</pre>");
                }
            }
        }
        out
    }

    /// Terminal rendering: bullets for list items, `**bold**` for strong spans.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        for node in &self.nodes {
            match node {
                Node::List(items) => {
                    for item in items {
                        let body: String = item
                            .spans
                            .iter()
                            .map(|span| match span {
                                Inline::Strong(text) => format!("**{text}**"),
                                Inline::Text(text) => text.clone(),
                            })
                            .collect();
                        lines.push(format!("- {body}"));
                    }
                }
                Node::Line(text) | Node::Preformatted(text) => lines.push(text.clone()),
            }
        }
        lines.join("\n")
    }
}

/// Renders a recommendation payload. Each call produces a complete fragment
/// that replaces whatever the display region showed before.
pub fn render(result: &RecommendationResult) -> Fragment {
    let nodes = match result {
        RecommendationResult::Gemini { entries, raw } => match raw {
            Some(raw) if entries.is_empty() => vec![Node::Preformatted(pretty_dump(raw))],
            _ => vec![Node::List(entries.iter().map(render_entry).collect())],
        },
        RecommendationResult::LocalFallback { entries, note } => {
            let mut nodes = vec![Node::List(entries.iter().map(ListItem::text).collect())];
            if let Some(note) = note {
                nodes.push(Node::Line(note.clone()));
            }
            nodes
        }
        RecommendationResult::Error { message } => vec![Node::Line(format!(
            "{ERROR_PREFIX}{}",
            message.as_deref().unwrap_or(UNKNOWN_ERROR)
        ))],
        RecommendationResult::Unrecognized(payload) => {
            vec![Node::Preformatted(pretty_dump(payload))]
        }
    };
    Fragment { nodes }
}

fn render_entry(entry: &RecommendationEntry) -> ListItem {
    match entry {
        RecommendationEntry::Structured { aspect, suggestion } => ListItem {
            spans: vec![
                Inline::Strong(format!("{aspect}:")),
                Inline::Text(format!(" {suggestion}")),
            ],
        },
        RecommendationEntry::Plain(text) => ListItem::text(text.as_str()),
        RecommendationEntry::Other(value) => ListItem::text(value.to_string()),
    }
}

/// Two-space indented JSON, the format used for every verbatim dump.
pub fn pretty_dump(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{escape_html, pretty_dump, render, Fragment, Inline, ListItem, Node};
    use crate::RecommendationResult;

    fn render_value(value: serde_json::Value) -> Fragment {
        render(&RecommendationResult::from_value(value))
    }

    #[test]
    fn local_fallback_keeps_order_and_count() {
        let fragment = render_value(json!({
            "source": "local-fallback",
            "recommendations": ["Post more often", "Use hashtags", "Ask a question"]
        }));
        let Node::List(items) = &fragment.nodes[0] else {
            panic!("expected a list, got {:?}", fragment.nodes);
        };
        let texts: Vec<_> = items.iter().map(ListItem::plain_text).collect();
        assert_eq!(texts, vec!["Post more often", "Use hashtags", "Ask a question"]);
        assert_eq!(fragment.nodes.len(), 1);
    }

    #[test]
    fn local_fallback_note_trails_the_list() {
        let fragment = render_value(json!({
            "source": "local-fallback",
            "recommendations": ["Use hashtags"],
            "note": "Set GEMINI_API_KEY"
        }));
        assert_eq!(fragment.nodes.len(), 2);
        assert_eq!(fragment.nodes[1], Node::Line("Set GEMINI_API_KEY".to_string()));
    }

    #[test]
    fn structured_entry_bolds_aspect() {
        let fragment = render_value(json!({
            "source": "gemini",
            "recommendations": [{"aspect": "Tone", "suggestion": "Be more casual"}]
        }));
        assert_eq!(
            fragment.nodes,
            vec![Node::List(vec![ListItem {
                spans: vec![
                    Inline::Strong("Tone:".to_string()),
                    Inline::Text(" Be more casual".to_string()),
                ],
            }])]
        );
        assert_eq!(fragment.to_html(), "<ul><li><b>Tone:</b> Be more casual</li></ul>");
        assert_eq!(fragment.to_text(), "- **Tone:** Be more casual");
    }

    #[test]
    fn gemini_raw_payload_is_dumped() {
        let fragment = render_value(json!({"source": "gemini", "raw": {"text": "hi"}}));
        assert_eq!(
            fragment.nodes,
            vec![Node::Preformatted("{\n  \"text\": \"hi\"\n}".to_string())]
        );
    }

    #[test]
    fn error_renders_single_line() {
        assert_eq!(
            render_value(json!({"source": "error", "error": "quota exceeded"})).nodes,
            vec![Node::Line("AI call error: quota exceeded".to_string())]
        );
        assert_eq!(
            render_value(json!({"source": "error"})).nodes,
            vec![Node::Line("AI call error: unknown".to_string())]
        );
    }

    #[test]
    fn unrecognized_payload_is_dumped_verbatim() {
        let payload = json!({"status": "queued", "id": 7});
        let fragment = render_value(payload.clone());
        assert_eq!(fragment.nodes, vec![Node::Preformatted(pretty_dump(&payload))]);
        assert!(!fragment.to_text().is_empty());
    }

    #[test]
    fn rendering_is_idempotent() {
        let result = RecommendationResult::from_value(json!({"source": "gemini", "recommendations": ["a"]}));
        assert_eq!(render(&result), render(&result));
    }

    #[test]
    fn html_output_is_escaped() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
        let fragment = render_value(json!({"source": "local-fallback", "recommendations": ["<script>"]}));
        assert_eq!(fragment.to_html(), "<ul><li>&lt;script&gt;</li></ul>");
    }
}
