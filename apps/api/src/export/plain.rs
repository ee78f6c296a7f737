use crate::structure::strip_markdown;

/// Plain-text export: markdown stripped, list markers canonicalized to `- `.
pub fn render_text(content: &str) -> Vec<u8> {
    strip_markdown(content).into_bytes()
}

/// Markdown export: the content as given.
pub fn render_markdown(content: &str) -> Vec<u8> {
    content.as_bytes().to_vec()
}
