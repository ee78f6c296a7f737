//! PDF extraction: text layer first, structural summary as the fallback.
//!
//! Scanned or image-only PDFs have no text layer; for those the caller still gets a
//! useful string (page count and page sizes) instead of an empty result.

use std::fmt::Write as _;
use std::panic::{self, AssertUnwindSafe};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

use crate::extraction::{panic_message, ExtractionError, TextExtractor};

/// US Letter, used when neither a page nor any ancestor declares a MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Guards against cyclic `/Parent` chains in hostile files.
const MAX_PARENT_DEPTH: usize = 32;

const STRUCTURE_NOTE: &str = "(For full text extraction, PDF content needs to be processed \
    with a dedicated PDF parser. The PDF format is designed for visual presentation, \
    not for text extraction.)";

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        match read_text_layer(bytes) {
            Ok(text) if !text.trim().is_empty() => {
                debug!(chars = text.len(), "Extracted PDF text layer");
                return Ok(text);
            }
            Ok(_) => debug!("PDF text layer is empty, falling back to structure"),
            Err(e) => warn!(error = %e, "PDF text layer unreadable, falling back to structure"),
        }

        describe_structure(bytes)
    }
}

/// Runs the text-layer reader. It is known to panic on some malformed inputs, so the
/// panic is contained here and reported as an error.
fn read_text_layer(bytes: &[u8]) -> Result<String, ExtractionError> {
    panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
        .map_err(|payload| ExtractionError::ReaderPanicked {
            reader: "pdf text layer",
            message: panic_message(payload.as_ref()),
        })?
        .map_err(|e| ExtractionError::Pdf(e.to_string()))
}

/// Summarizes a PDF as its page count and the width×height of each page.
/// A file that cannot be loaded at all is an error.
pub fn describe_structure(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    let pages = doc.get_pages();

    let mut info = format!("PDF document with {} pages.\n\n", pages.len());
    for (number, page_id) in &pages {
        let (width, height) = page_size(&doc, *page_id);
        // Writing to a String cannot fail.
        let _ = writeln!(info, "Page {number}: {width:.1}×{height:.1}");
    }
    info.push('\n');
    info.push_str(STRUCTURE_NOTE);

    Ok(info)
}

/// Resolves a page's MediaBox, walking up the page tree since it is inheritable.
fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let mut current = Some(page_id);

    for _ in 0..MAX_PARENT_DEPTH {
        let Some(dict) = current.and_then(|id| doc.get_object(id).ok()).and_then(|o| o.as_dict().ok())
        else {
            break;
        };

        if let Some(size) = media_box(doc, dict) {
            return size;
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }

    DEFAULT_PAGE_SIZE
}

fn media_box(doc: &Document, dict: &Dictionary) -> Option<(f32, f32)> {
    let object = resolve(doc, dict.get(b"MediaBox").ok()?)?;
    let coords: Vec<f32> = object
        .as_array()
        .ok()?
        .iter()
        .filter_map(|o| number(resolve(doc, o)?))
        .collect();

    match coords.as_slice() {
        [x1, y1, x2, y2] => Some(((x2 - x1).abs(), (y2 - y1).abs())),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
