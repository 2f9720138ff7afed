//! Offline generator that renders a deterministic HTML fragment from the request context.

use desktop_app_contract::GenerationRequest;
use futures::stream::{self, StreamExt};

use super::service::{ContentGenerator, ContentStream};

const DEFAULT_CHUNK_CHARS: usize = 32;

#[derive(Debug, Clone, Copy)]
/// Generator used when no remote content service is configured.
///
/// It echoes the request context (current interaction, recent history, user) as markup built from
/// the shared `llm-*` classes and streams it in fixed-size chunks, so the runtime exercises the
/// same progressive path it would against a real service.
pub struct PreviewContentGenerator {
    chunk_chars: usize,
}

impl Default for PreviewContentGenerator {
    fn default() -> Self {
        Self {
            chunk_chars: DEFAULT_CHUNK_CHARS,
        }
    }
}

impl PreviewContentGenerator {
    /// Creates a generator that emits chunks of at most `chunk_chars` characters.
    pub fn new(chunk_chars: usize) -> Self {
        Self {
            chunk_chars: chunk_chars.max(1),
        }
    }

    /// Renders the complete fragment for `request`.
    pub fn render(&self, request: &GenerationRequest) -> String {
        let Some(current) = request.current_interaction() else {
            return r#"<div class="llm-container"><p class="llm-text">Nothing to show.</p></div>"#
                .to_string();
        };
        let app = current.app_context.as_deref().unwrap_or(&current.id);
        let greeting = if request.user.is_signed_in {
            format!("Welcome, {}", escape_html(&request.user.name))
        } else {
            "Browsing as Guest".to_string()
        };

        let mut html = String::from(r#"<div class="llm-container">"#);
        html.push_str(&format!(
            r#"<p class="llm-title">{}</p><p class="llm-text">{greeting}</p>"#,
            escape_html(app)
        ));
        html.push_str(&format!(
            r#"<p class="llm-text">Last action: {} ({})</p>"#,
            escape_html(&current.id),
            escape_html(&current.kind)
        ));
        if request.history.len() > 1 {
            html.push_str(r#"<ul class="llm-container">"#);
            for earlier in request.history.iter().skip(1) {
                html.push_str(&format!(
                    r#"<li class="llm-text">{}</li>"#,
                    escape_html(&earlier.id)
                ));
            }
            html.push_str("</ul>");
        }
        html.push_str(&format!(
            r#"<div class="llm-row"><button class="llm-button" data-interaction-id="{}_refresh">Refresh</button></div>"#,
            escape_html(app)
        ));
        html.push_str("</div>");
        html
    }
}

impl ContentGenerator for PreviewContentGenerator {
    fn generate(&self, request: &GenerationRequest) -> ContentStream {
        let chars: Vec<char> = self.render(request).chars().collect();
        let chunks: Vec<_> = chars
            .chunks(self.chunk_chars)
            .map(|chunk| Ok(chunk.iter().collect::<String>()))
            .collect();
        stream::iter(chunks).boxed_local()
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
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
