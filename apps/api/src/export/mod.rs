//! Multi-format export of resume text.
//!
//! Content is plain text with light markdown (headings, lists, emphasis). Each
//! format gets its own renderer; [`Exporter`] picks one and wraps the bytes in an
//! [`ExportArtifact`] with the right MIME type and a download filename.

pub mod docx;
pub mod handlers;
pub mod layout;
pub mod pdf;
pub mod plain;
pub mod rtf;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::structure::LineClassifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Text,
    Markdown,
    Docx,
    Rtf,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Text,
        ExportFormat::Markdown,
        ExportFormat::Docx,
        ExportFormat::Rtf,
        ExportFormat::Pdf,
    ];

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Rtf => "application/rtf",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Markdown => "md",
            ExportFormat::Docx => "docx",
            ExportFormat::Rtf => "rtf",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(ExportFormat::Text),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "docx" | "word" => Ok(ExportFormat::Docx),
            "rtf" => Ok(ExportFormat::Rtf),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to generate DOCX: {0}")]
    Docx(String),

    #[error("Failed to generate PDF: {0}")]
    Pdf(String),
}

/// A rendered download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub filename: String,
}

impl ExportArtifact {
    fn new(bytes: Vec<u8>, format: ExportFormat, filename: &str) -> Self {
        Self {
            bytes,
            mime_type: format.mime_type(),
            filename: suggested_filename(filename, format),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Exporter
// ────────────────────────────────────────────────────────────────────────────

/// Renders content into any [`ExportFormat`]. Holds the line classifier so every
/// format agrees on what a heading is.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    classifier: LineClassifier,
}

impl Exporter {
    pub fn new(classifier: LineClassifier) -> Self {
        Self { classifier }
    }

    pub fn export(
        &self,
        content: &str,
        filename: &str,
        format: ExportFormat,
    ) -> Result<ExportArtifact, ExportError> {
        match format {
            ExportFormat::Text => Ok(self.export_text(content, filename)),
            ExportFormat::Markdown => Ok(self.export_markdown(content, filename)),
            ExportFormat::Docx => self.export_docx(content, filename),
            ExportFormat::Rtf => Ok(self.export_rtf(content, filename)),
            ExportFormat::Pdf => self.export_pdf(content, filename),
        }
    }

    /// Plain text, markdown stripped.
    pub fn export_text(&self, content: &str, filename: &str) -> ExportArtifact {
        ExportArtifact::new(plain::render_text(content), ExportFormat::Text, filename)
    }

    /// Markdown, content unchanged.
    pub fn export_markdown(&self, content: &str, filename: &str) -> ExportArtifact {
        ExportArtifact::new(
            plain::render_markdown(content),
            ExportFormat::Markdown,
            filename,
        )
    }

    pub fn export_docx(&self, content: &str, filename: &str) -> Result<ExportArtifact, ExportError> {
        let bytes = docx::render_docx(content, &self.classifier)?;
        Ok(ExportArtifact::new(bytes, ExportFormat::Docx, filename))
    }

    pub fn export_rtf(&self, content: &str, filename: &str) -> ExportArtifact {
        ExportArtifact::new(
            rtf::render_rtf(content, &self.classifier),
            ExportFormat::Rtf,
            filename,
        )
    }

    pub fn export_pdf(&self, content: &str, filename: &str) -> Result<ExportArtifact, ExportError> {
        let bytes = pdf::render_pdf(content, &self.classifier)?;
        Ok(ExportArtifact::new(bytes, ExportFormat::Pdf, filename))
    }
}

/// Download name for `requested`: quotes, backslashes and control characters are
/// removed, an empty name becomes `resume`, and the format's extension is appended
/// unless already present.
pub fn suggested_filename(requested: &str, format: ExportFormat) -> String {
    let cleaned: String = requested
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    let cleaned = cleaned.trim();
    let stem = if cleaned.is_empty() { "resume" } else { cleaned };

    let ext = format.extension();
    let has_ext = stem
        .rsplit_once('.')
        .is_some_and(|(_, e)| e.eq_ignore_ascii_case(ext));

    if has_ext {
        stem.to_string()
    } else {
        format!("{stem}.{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Jane Doe\njane@doe.dev\n\n## EXPERIENCE\n- Built **fast** parsers\n";

    #[test]
    fn test_every_format_carries_its_mime_type() {
        let exporter = Exporter::default();
        let expected = [
            (ExportFormat::Text, "text/plain"),
            (ExportFormat::Markdown, "text/markdown"),
            (
                ExportFormat::Docx,
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ),
            (ExportFormat::Rtf, "application/rtf"),
            (ExportFormat::Pdf, "application/pdf"),
        ];
        for (format, mime) in expected {
            let artifact = exporter.export(SAMPLE, "resume", format).unwrap();
            assert_eq!(artifact.mime_type, mime, "{format}");
            assert!(!artifact.bytes.is_empty(), "{format} produced no bytes");
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!(matches!(
            "odt".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(f)) if f == "odt"
        ));
        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename("", ExportFormat::Pdf), "resume.pdf");
        assert_eq!(suggested_filename("cv", ExportFormat::Docx), "cv.docx");
        assert_eq!(suggested_filename("cv.DOCX", ExportFormat::Docx), "cv.DOCX");
        assert_eq!(suggested_filename("cv.txt", ExportFormat::Rtf), "cv.txt.rtf");
        assert_eq!(
            suggested_filename("my \"best\"\r\nresume", ExportFormat::Markdown),
            "my bestresume.md"
        );
    }

    #[test]
    fn test_markdown_export_is_unchanged() {
        let artifact = Exporter::default().export_markdown(SAMPLE, "r");
        assert_eq!(artifact.bytes, SAMPLE.as_bytes());
        assert_eq!(artifact.filename, "r.md");
    }

    #[test]
    fn test_text_export_is_stripped() {
        let artifact = Exporter::default().export_text(SAMPLE, "r");
        assert_eq!(
            String::from_utf8(artifact.bytes).unwrap(),
            "Jane Doe\njane@doe.dev\n\nEXPERIENCE\n- Built fast parsers"
        );
    }
}
