//! Text extraction subsystem.
//!
//! Raw upload bytes plus a declared media type go in, normalized plain text comes out.
//! [`parse_file`] is the only entry point the rest of the service uses: it routes to a
//! per-format [`TextExtractor`], catches every failure (including panics inside
//! third-party readers), and always returns a string.

pub mod handlers;
pub mod pdf;
pub mod rtf;
pub mod text;
pub mod word;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::{debug, error};

use crate::extraction::pdf::PdfExtractor;
use crate::extraction::rtf::RtfExtractor;
use crate::extraction::text::PlainTextExtractor;
use crate::extraction::word::WordExtractor;

// ────────────────────────────────────────────────────────────────────────────
// Media types
// ────────────────────────────────────────────────────────────────────────────

/// Media types accepted by the upload endpoint.
pub const ACCEPTED_MEDIA_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "application/rtf",
    "text/rtf",
];

/// Declared media type of an upload, normalized for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    MsWord,
    Docx,
    PlainText,
    /// `application/rtf` or `text/rtf`.
    Rtf,
    /// Anything else, kept verbatim (lowercased, parameters removed) for diagnostics.
    Other(String),
}

impl MediaType {
    /// Parses a declared content type. Parameters such as `; charset=utf-8` are
    /// dropped and the comparison is case-insensitive.
    pub fn parse(declared: &str) -> Self {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "application/pdf" => MediaType::Pdf,
            "application/msword" => MediaType::MsWord,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                MediaType::Docx
            }
            "text/plain" => MediaType::PlainText,
            "application/rtf" | "text/rtf" => MediaType::Rtf,
            _ => MediaType::Other(essence),
        }
    }

    /// Infers a media type from a file name's extension (`.pdf .doc .docx .txt .rtf`).
    pub fn from_extension(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(MediaType::Pdf),
            "doc" => Some(MediaType::MsWord),
            "docx" => Some(MediaType::Docx),
            "txt" => Some(MediaType::PlainText),
            "rtf" => Some(MediaType::Rtf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::MsWord => "application/msword",
            MediaType::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            MediaType::PlainText => "text/plain",
            MediaType::Rtf => "application/rtf",
            MediaType::Other(raw) => raw,
        }
    }

    pub fn is_accepted(&self) -> bool {
        !matches!(self, MediaType::Other(_))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor seam
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to parse PDF file: {0}")]
    Pdf(String),

    #[error("Failed to parse Word document: {0}")]
    Word(String),

    #[error("{reader} reader panicked: {message}")]
    ReaderPanicked {
        reader: &'static str,
        message: String,
    },
}

/// One per-format adapter. Implementations are stateless and synchronous; callers
/// run them on the blocking pool.
pub trait TextExtractor: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Extracts text, or returns a fixed placeholder when the document has none.
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Routes to the extractor for `media_type`. Unrecognized types get a best-effort
/// UTF-8 decode.
pub fn extract_by_media_type(
    bytes: &[u8],
    media_type: &MediaType,
) -> Result<String, ExtractionError> {
    let extractor: &dyn TextExtractor = match media_type {
        MediaType::Pdf => &PdfExtractor,
        MediaType::MsWord | MediaType::Docx => &WordExtractor,
        MediaType::Rtf => &RtfExtractor,
        MediaType::PlainText => &PlainTextExtractor,
        MediaType::Other(raw) => return Ok(text::decode_unrecognized(bytes, raw)),
    };

    debug!(
        extractor = extractor.name(),
        bytes = bytes.len(),
        "Extracting text"
    );
    extractor.extract(bytes)
}

/// Public extraction contract: never fails, never panics.
///
/// Extractor errors and panics become `"Error processing file: <reason>"`.
/// Successful output is normalized (see [`normalize_extracted`]).
pub fn parse_file(bytes: &[u8], declared_media_type: &str) -> String {
    let media_type = MediaType::parse(declared_media_type);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        extract_by_media_type(bytes, &media_type)
    }))
    .unwrap_or_else(|payload| {
        Err(ExtractionError::ReaderPanicked {
            reader: "document",
            message: panic_message(payload.as_ref()),
        })
    });

    match outcome {
        Ok(text) => normalize_extracted(&text),
        Err(e) => {
            error!(media_type = %media_type, error = %e, "Text extraction failed");
            format!("Error processing file: {e}")
        }
    }
}

/// Best-effort rendering of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Brings extractor output to the shape every consumer expects: `\n` line breaks,
/// no trailing whitespace, no run of two or more spaces, at most one blank line
/// between paragraphs, trimmed.
pub fn normalize_extracted(text: &str) -> String {
    let unified = text
        .replace("\r\n", "\n")
        .replace(['\r', '\u{000c}'], "\n");

    let mut out = String::with_capacity(unified.len());
    let mut blank_run = 0usize;

    for line in unified.split('\n') {
        let line = collapse_spaces(line.trim_end());
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(&line);
        out.push('\n');
    }

    out.trim().to_string()
}

fn collapse_spaces(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut prev_space = false;
    for c in line.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(c);
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}
