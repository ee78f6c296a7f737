//! RTF export.
//!
//! Markdown is stripped first; heading lines are wrapped in a bold group and all
//! other lines are written as-is, one `\par` per line.

use crate::structure::{strip_markdown, LineClassifier, LineKind};

const RTF_HEADER: &str = "{\\rtf1\\ansi\\ansicpg1252\\deff0\\deflang1033\
{\\fonttbl{\\f0\\fswiss\\fcharset0 Arial;}}\
{\\pard\\fs24 ";
const RTF_FOOTER: &str = "}}";

pub fn render_rtf(content: &str, classifier: &LineClassifier) -> Vec<u8> {
    let stripped = strip_markdown(content);

    let body: Vec<String> = classifier
        .classify_document(&stripped)
        .into_iter()
        .map(|line| {
            let escaped = escape_rtf(line.text);
            if line.kind == LineKind::Heading {
                format!("{{\\b {escaped}}}")
            } else {
                escaped
            }
        })
        .collect();

    let mut out = String::with_capacity(stripped.len() + RTF_HEADER.len() + 64);
    out.push_str(RTF_HEADER);
    out.push_str(&body.join("\\par "));
    out.push_str(RTF_FOOTER);
    out.into_bytes()
}

/// Escapes text for an RTF body. Non-ASCII characters become `\uN?` with `N` the
/// signed 16-bit UTF-16 unit, as RTF readers expect.
pub fn escape_rtf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\t' => out.push_str("\\tab "),
            c if c.is_ascii_control() => {}
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}
