//! RTF lexer: turns raw RTF source into plain text.
//!
//! A single left-to-right scan over the characters with an explicit group-depth
//! counter. There is no grammar and no recursion: control words are consumed as
//! they are met, and only `\par`, `\line` and `\tab` produce output.
//!
//! Literal text is emitted only inside a group (`depth > 0`). Destination groups
//! that never carry document text (`{\*...}`, `\fonttbl`, `\colortbl`, ...) are
//! skipped until their closing brace.

use encoding_rs::WINDOWS_1252;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::{ExtractionError, TextExtractor};

/// Returned by [`RtfExtractor`] when the document yields no visible text.
pub const NO_RTF_TEXT: &str = "No text content extracted from RTF";

/// Header destinations whose whole group is metadata, not document text.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "listtable",
    "listoverridetable",
    "revtbl",
    "rsidtbl",
    "info",
    "pict",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "xmlnstbl",
    "generator",
    "filetbl",
];

static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("valid regex"));
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Extractor for `application/rtf` and `text/rtf` uploads.
pub struct RtfExtractor;

impl TextExtractor for RtfExtractor {
    fn name(&self) -> &'static str {
        "rtf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = extract_rtf_text(&decode_rtf_source(bytes));
        if text.is_empty() {
            Ok(NO_RTF_TEXT.to_string())
        } else {
            Ok(text)
        }
    }
}

/// Decodes RTF bytes one byte per character (ISO-8859-1), which never fails and
/// keeps every ASCII control sequence intact. Non-ASCII literals are dropped by
/// the lexer anyway; real 8-bit text arrives through `\'hh` escapes.
pub fn decode_rtf_source(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Extracts the visible text from RTF source.
///
/// Output keeps paragraph breaks (`\par`, `\line` → `\n`) and tabs (`\tab` → `\t`),
/// collapses runs of spaces, keeps at most one blank line, and is trimmed.
pub fn extract_rtf_text(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut lexer = RtfLexer::new(&chars);
    lexer.run();
    finish(&lexer.out)
}

struct RtfLexer<'a> {
    chars: &'a [char],
    pos: usize,
    depth: i64,
    /// While set, output is suppressed until the group opened at this depth closes.
    skip_from_depth: Option<i64>,
    /// True between a `{` and the first token of its group.
    at_group_start: bool,
    /// High half of a surrogate pair waiting for its `\uN` partner.
    pending_high: Option<u16>,
    out: String,
}

impl<'a> RtfLexer<'a> {
    fn new(chars: &'a [char]) -> Self {
        Self {
            chars,
            pos: 0,
            depth: 0,
            skip_from_depth: None,
            at_group_start: false,
            pending_high: None,
            out: String::with_capacity(chars.len() / 2),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn emitting(&self) -> bool {
        self.depth > 0 && self.skip_from_depth.is_none()
    }

    fn emit(&mut self, c: char) {
        self.pending_high = None;
        if self.emitting() {
            self.out.push(c);
        }
    }

    fn run(&mut self) {
        while let Some(c) = self.peek(0) {
            match c {
                '{' => {
                    self.depth += 1;
                    self.at_group_start = true;
                    self.pos += 1;
                }
                '}' => {
                    self.depth -= 1;
                    if self.skip_from_depth.is_some_and(|d| self.depth < d) {
                        self.skip_from_depth = None;
                    }
                    self.at_group_start = false;
                    self.pos += 1;
                }
                '\\' => {
                    let group_start = std::mem::take(&mut self.at_group_start);
                    self.backslash(group_start);
                }
                '\r' | '\n' => self.pos += 1,
                _ => {
                    self.at_group_start = false;
                    if (32..=126).contains(&(c as u32)) {
                        self.emit(c);
                    }
                    self.pos += 1;
                }
            }
        }
    }

    /// Handles the token starting at a backslash. `self.pos` points at the `\`.
    fn backslash(&mut self, group_start: bool) {
        match self.peek(1) {
            Some(escaped @ ('{' | '}' | '\\')) => {
                self.emit(escaped);
                self.pos += 2;
            }
            Some('u') if self.unicode_digits_follow() => self.unicode_escape(),
            Some('\'') => self.hex_escape(),
            Some('*') if group_start => {
                self.skip_destination();
                self.pos += 2;
            }
            Some(letter) if letter.is_ascii_alphabetic() => self.control_word(group_start),
            Some(_) => self.pos += 2,
            None => self.pos += 1,
        }
    }

    fn unicode_digits_follow(&self) -> bool {
        match self.peek(2) {
            Some(d) if d.is_ascii_digit() => true,
            Some('-') => self.peek(3).is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        }
    }

    /// `\uN?`: decimal code point, negative values wrap as signed 16-bit.
    /// Characters above U+FFFF arrive as two escapes, high surrogate first; an
    /// unpaired surrogate is dropped.
    fn unicode_escape(&mut self) {
        self.pos += 2;
        let negative = self.peek(0) == Some('-');
        if negative {
            self.pos += 1;
        }
        let digits = self.take_while(|c| c.is_ascii_digit());
        let value = digits.parse::<i64>().ok().map(|v| if negative { -v } else { v });
        let code_point = match value {
            Some(v) if v < 0 => Some(v + 65_536),
            other => other,
        };
        match code_point.and_then(|v| u32::try_from(v).ok()) {
            Some(high @ 0xD800..=0xDBFF) => self.pending_high = Some(high as u16),
            Some(low @ 0xDC00..=0xDFFF) => {
                if let Some(high) = self.pending_high.take() {
                    if let Some(Ok(ch)) = char::decode_utf16([high, low as u16]).next() {
                        self.emit(ch);
                    }
                }
            }
            Some(code) => {
                if let Some(ch) = char::from_u32(code) {
                    self.emit(ch);
                }
            }
            None => {}
        }
        // ASCII fallback glyph for readers without Unicode support.
        if self.peek(0) == Some('?') {
            self.pos += 1;
        } else if self.peek(0) == Some('\\') && self.peek(1) == Some('\'') {
            self.pos += 4.min(self.chars.len() - self.pos);
        }
    }

    /// `\'hh`: one Windows-1252 byte in hex. Malformed escapes skip the `\'`.
    fn hex_escape(&mut self) {
        let hex: String = [self.peek(2), self.peek(3)].iter().flatten().collect();
        match u8::from_str_radix(&hex, 16) {
            Ok(byte) if hex.len() == 2 => {
                let buf = [byte];
                let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(&buf);
                for ch in decoded.chars().filter(|c| !c.is_control()) {
                    self.emit(ch);
                }
                self.pos += 4;
            }
            _ => self.pos += 2,
        }
    }

    /// Control word, optional signed numeric parameter, optional delimiter space.
    fn control_word(&mut self, group_start: bool) {
        self.pos += 1;
        let word = self.take_while(|c| c.is_ascii_alphabetic());
        if self.peek(0) == Some('-') && self.peek(1).is_some_and(|d| d.is_ascii_digit()) {
            self.pos += 1;
        }
        self.take_while(|c| c.is_ascii_digit());
        if self.peek(0) == Some(' ') {
            self.pos += 1;
        }

        match word.as_str() {
            "par" | "line" => self.emit('\n'),
            "tab" => self.emit('\t'),
            w if group_start && SKIPPED_DESTINATIONS.contains(&w) => self.skip_destination(),
            _ => {}
        }
    }

    fn skip_destination(&mut self) {
        if self.skip_from_depth.is_none() {
            self.skip_from_depth = Some(self.depth);
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.peek(0).is_some_and(&pred) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

fn finish(raw: &str) -> String {
    let text = MULTI_SPACE.replace_all(raw, " ");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
