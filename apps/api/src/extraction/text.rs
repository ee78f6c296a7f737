use crate::extraction::{ExtractionError, TextExtractor};

pub const NO_PLAIN_TEXT: &str = "No text content extracted";

/// `text/plain` passthrough. Invalid UTF-8 sequences are replaced rather than
/// rejected; a leading byte-order mark is dropped.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = String::from_utf8_lossy(bytes);
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        if text.is_empty() {
            Ok(NO_PLAIN_TEXT.to_string())
        } else {
            Ok(text.to_string())
        }
    }
}

/// Best-effort decode for media types no extractor claims. Strict UTF-8: a file
/// that is not text gets a placeholder naming its type.
pub fn decode_unrecognized(bytes: &[u8], media_type: &str) -> String {
    match std::str::from_utf8(bytes) {
        Ok("") => format!("Parsed content from file ({media_type})"),
        Ok(text) => text.to_string(),
        Err(_) => format!("Could not extract text from file of type {media_type}"),
    }
}
