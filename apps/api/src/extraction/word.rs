//! Word document extraction.
//!
//! Handles both containers behind the Word media types:
//! - OOXML (`.docx`): a zip archive; text lives in `word/document.xml`.
//! - Legacy binary (`.doc`): an OLE compound file. The `WordDocument` stream holds
//!   the characters and the table stream (`0Table`/`1Table`) holds the piece table
//!   mapping them; each piece is either 8-bit Windows-1252 or UTF-16LE. Files whose
//!   structure cannot be read fall back to scanning the raw bytes for text runs.

use std::io::{Cursor, Read, Seek};

use cfb::CompoundFile;
use encoding_rs::WINDOWS_1252;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::extraction::{ExtractionError, TextExtractor};

pub const NO_WORD_TEXT: &str = "No text content extracted from Word document";

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Upper bound on the decompressed size of `word/document.xml`.
const MAX_DOCUMENT_XML_BYTES: u64 = 32 * 1024 * 1024;

/// Upper bound on any stream read out of an OLE container.
const MAX_OLE_STREAM_BYTES: u64 = 64 * 1024 * 1024;

/// Shortest run kept by the raw-byte scans.
const MIN_RUN_UNITS: usize = 4;

const FIB_IDENT: u16 = 0xA5EC;
/// `fWhichTblStm`: the piece table lives in `1Table` rather than `0Table`.
const FIB_WHICH_TABLE: u16 = 0x0200;
/// Position of the `fcClx`/`lcbClx` pair in `FibRgFcLcb`.
const FIB_CLX_INDEX: usize = 33;
const CLXT_PRC: u8 = 0x01;
const CLXT_PCDT: u8 = 0x02;
const FC_COMPRESSED: u32 = 0x4000_0000;
const FC_MASK: u32 = 0x3FFF_FFFF;

// Special characters in the document text stream.
const CELL_MARK: char = '\u{0007}';
const FIELD_BEGIN: char = '\u{0013}';
const FIELD_SEPARATOR: char = '\u{0014}';
const FIELD_END: char = '\u{0015}';
const NON_BREAKING_HYPHEN: char = '\u{001e}';

/// Directory entry names that show up as UTF-16 text in every OLE file.
const OLE_STREAM_NAMES: &[&str] = &[
    "Root Entry",
    "WordDocument",
    "SummaryInformation",
    "DocumentSummaryInformation",
    "CompObj",
    "ObjectPool",
    "1Table",
    "0Table",
    "Data",
];

pub struct WordExtractor;

impl TextExtractor for WordExtractor {
    fn name(&self) -> &'static str {
        "word"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = if bytes.starts_with(ZIP_MAGIC) {
            extract_docx(bytes)?
        } else if bytes.starts_with(OLE_MAGIC) {
            extract_doc(bytes)
        } else {
            return Err(ExtractionError::Word(
                "unrecognized container (neither OOXML nor OLE)".to_string(),
            ));
        };

        if text.trim().is_empty() {
            Ok(NO_WORD_TEXT.to_string())
        } else {
            Ok(text)
        }
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Word(e.to_string()))?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractionError::Word(format!("word/document.xml: {e}")))?;

    let mut xml = String::new();
    entry
        .take(MAX_DOCUMENT_XML_BYTES)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Word(e.to_string()))?;

    document_xml_text(&xml)
}

/// Pulls the visible text out of a WordprocessingML body.
///
/// Text comes only from `<w:t>`. Tabs and breaks count only inside runs (`<w:r>`),
/// so paragraph tab-stop definitions (`<w:tabs><w:tab .../></w:tabs>`) are ignored.
/// Every paragraph ends with a newline.
pub fn document_xml_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::with_capacity(xml.len() / 4);
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if run_depth > 0 => out.push('\t'),
                b"br" | b"cr" if run_depth > 0 => out.push('\n'),
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Word(e.to_string()))?;
                out.push_str(&text);
            }
            Ok(Event::CData(t)) if in_text => {
                out.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractionError::Word(format!(
                    "malformed document.xml at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(out)
}

/// Legacy `.doc`: piece table first, then the raw UTF-16 scan, then the raw
/// 8-bit scan.
fn extract_doc(bytes: &[u8]) -> String {
    match piece_table_text(bytes) {
        Ok(text) if !text.trim().is_empty() => return text,
        Ok(_) => debug!("Word piece table holds no text, scanning raw bytes"),
        Err(e) => debug!(error = %e, "Word binary structure unreadable, scanning raw bytes"),
    }

    let text = scan_utf16_runs(bytes);
    if !text.trim().is_empty() {
        return text;
    }
    scan_ansi_runs(bytes)
}

/// Reads the main document text of a Word 97+ binary through its piece table.
pub fn piece_table_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut ole = CompoundFile::open(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Word(format!("compound file: {e}")))?;
    let word_stream = read_ole_stream(&mut ole, "WordDocument")?;
    let fib = Fib::parse(&word_stream)?;
    let table_stream = read_ole_stream(&mut ole, fib.table_stream_name())?;
    let pieces = parse_piece_table(&table_stream, &fib)?;
    debug!(pieces = pieces.len(), ccp_text = fib.ccp_text, "Decoding Word piece table");

    Ok(clean_word_text(&decode_pieces(&word_stream, &pieces, fib.ccp_text)))
}

fn read_ole_stream<F: Read + Seek>(
    ole: &mut CompoundFile<F>,
    name: &str,
) -> Result<Vec<u8>, ExtractionError> {
    let stream = ole
        .open_stream(name)
        .map_err(|e| ExtractionError::Word(format!("{name} stream: {e}")))?;
    let mut data = Vec::new();
    stream
        .take(MAX_OLE_STREAM_BYTES)
        .read_to_end(&mut data)
        .map_err(|e| ExtractionError::Word(format!("{name} stream: {e}")))?;
    Ok(data)
}

/// The parts of the File Information Block needed to find the text.
#[derive(Debug)]
struct Fib {
    table_one: bool,
    /// Characters in the main document; later pieces hold headers, notes, etc.
    ccp_text: u32,
    fc_clx: u32,
    lcb_clx: u32,
}

impl Fib {
    fn parse(stream: &[u8]) -> Result<Self, ExtractionError> {
        let truncated = || ExtractionError::Word("truncated FIB".to_string());

        if le_u16(stream, 0) != Some(FIB_IDENT) {
            return Err(ExtractionError::Word(
                "WordDocument stream does not start with a FIB".to_string(),
            ));
        }
        let flags = le_u16(stream, 0x0A).ok_or_else(truncated)?;

        // FibBase is 32 bytes, followed by three counted arrays.
        let mut pos = 32;
        let csw = usize::from(le_u16(stream, pos).ok_or_else(truncated)?);
        pos += 2 + csw * 2;
        let cslw = usize::from(le_u16(stream, pos).ok_or_else(truncated)?);
        let rg_lw = pos + 2;
        pos = rg_lw + cslw * 4;
        let ccp_text = if cslw > 3 {
            le_u32(stream, rg_lw + 12).ok_or_else(truncated)?
        } else {
            0
        };
        let cb_rg_fc_lcb = usize::from(le_u16(stream, pos).ok_or_else(truncated)?);
        pos += 2;
        if cb_rg_fc_lcb <= FIB_CLX_INDEX {
            return Err(ExtractionError::Word("FIB has no piece table entry".to_string()));
        }
        let entry = pos + FIB_CLX_INDEX * 8;

        Ok(Fib {
            table_one: flags & FIB_WHICH_TABLE != 0,
            ccp_text,
            fc_clx: le_u32(stream, entry).ok_or_else(truncated)?,
            lcb_clx: le_u32(stream, entry + 4).ok_or_else(truncated)?,
        })
    }

    fn table_stream_name(&self) -> &'static str {
        if self.table_one {
            "1Table"
        } else {
            "0Table"
        }
    }
}

/// A contiguous run of characters stored at `offset` in the WordDocument stream.
#[derive(Debug, PartialEq, Eq)]
struct Piece {
    cp_start: u32,
    cp_end: u32,
    offset: usize,
    compressed: bool,
}

/// Walks the CLX: skips `Prc` property entries, then reads the `PlcPcd`.
fn parse_piece_table(table: &[u8], fib: &Fib) -> Result<Vec<Piece>, ExtractionError> {
    let start = fib.fc_clx as usize;
    let clx = start
        .checked_add(fib.lcb_clx as usize)
        .and_then(|end| table.get(start..end))
        .ok_or_else(|| ExtractionError::Word("piece table lies outside the table stream".to_string()))?;

    let mut pos = 0;
    while let Some(&kind) = clx.get(pos) {
        match kind {
            CLXT_PRC => {
                let cb = le_u16(clx, pos + 1)
                    .ok_or_else(|| ExtractionError::Word("truncated CLX".to_string()))?;
                pos += 3 + usize::from(cb);
            }
            CLXT_PCDT => {
                let lcb = le_u32(clx, pos + 1)
                    .ok_or_else(|| ExtractionError::Word("truncated CLX".to_string()))?;
                let plc = clx
                    .get(pos + 5..pos + 5 + lcb as usize)
                    .ok_or_else(|| ExtractionError::Word("truncated piece table".to_string()))?;
                return Ok(plc_pieces(plc));
            }
            other => {
                return Err(ExtractionError::Word(format!(
                    "unexpected CLX entry 0x{other:02x}"
                )))
            }
        }
    }

    Err(ExtractionError::Word("CLX has no piece table".to_string()))
}

/// `PlcPcd`: `n + 1` character positions followed by `n` 8-byte piece descriptors.
fn plc_pieces(plc: &[u8]) -> Vec<Piece> {
    let count = plc.len().saturating_sub(4) / 12;
    let descriptors = (count + 1) * 4;

    (0..count)
        .filter_map(|i| {
            let cp_start = le_u32(plc, i * 4)?;
            let cp_end = le_u32(plc, (i + 1) * 4)?;
            let fc = le_u32(plc, descriptors + i * 8 + 2)?;
            let compressed = fc & FC_COMPRESSED != 0;
            let fc = fc & FC_MASK;
            Some(Piece {
                cp_start,
                cp_end,
                offset: if compressed { fc as usize / 2 } else { fc as usize },
                compressed,
            })
        })
        .collect()
}

/// Concatenates the pieces, stopping at `ccp_text` characters when it is known.
fn decode_pieces(word_stream: &[u8], pieces: &[Piece], ccp_text: u32) -> String {
    let mut out = String::new();

    for piece in pieces {
        let cp_end = if ccp_text > 0 {
            piece.cp_end.min(ccp_text)
        } else {
            piece.cp_end
        };
        if cp_end <= piece.cp_start {
            continue;
        }
        let chars = (cp_end - piece.cp_start) as usize;
        let len = if piece.compressed { chars } else { chars * 2 };
        let Some(raw) = word_stream.get(piece.offset..piece.offset + len) else {
            warn!(offset = piece.offset, len, "Word piece lies outside the document stream");
            continue;
        };

        if piece.compressed {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(raw);
            out.push_str(&text);
        } else {
            let units = raw.chunks_exact(2).map(|p| u16::from_le_bytes([p[0], p[1]]));
            out.extend(char::decode_utf16(units).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)));
        }
    }

    out
}

/// Maps Word's in-band control characters to plain text. Paragraph, line and page
/// marks become `\n`; a cell mark becomes `\t`, or `\n` when it closes a row; field
/// instructions are dropped and only the field result is kept.
fn clean_word_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    // One entry per open field; true while still inside its instruction part.
    let mut fields: Vec<bool> = Vec::new();
    let mut prev = '\0';

    for c in raw.chars() {
        match c {
            FIELD_BEGIN => fields.push(true),
            FIELD_SEPARATOR => {
                if let Some(in_instruction) = fields.last_mut() {
                    *in_instruction = false;
                }
            }
            FIELD_END => {
                fields.pop();
            }
            _ if fields.iter().any(|&in_instruction| in_instruction) => {}
            '\r' | '\u{000b}' | '\u{000c}' => out.push('\n'),
            CELL_MARK if prev == CELL_MARK => out.push('\n'),
            CELL_MARK => out.push('\t'),
            NON_BREAKING_HYPHEN => out.push('-'),
            '\t' | '\n' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
        prev = c;
    }

    out
}

fn le_u16(data: &[u8], at: usize) -> Option<u16> {
    data.get(at..at + 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn le_u32(data: &[u8], at: usize) -> Option<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Recovers text from a binary `.doc` by collecting UTF-16LE runs of printable
/// Latin characters. Runs shorter than [`MIN_RUN_UNITS`] or without a letter are
/// treated as noise, as are OLE stream names.
pub fn scan_utf16_runs(bytes: &[u8]) -> String {
    collect_runs(bytes.chunks_exact(2).map(|pair| {
        char::from_u32(u32::from(u16::from_le_bytes([pair[0], pair[1]]))).unwrap_or('\0')
    }))
}

/// The 8-bit counterpart of [`scan_utf16_runs`]: every byte is read as one
/// Windows-1252 character.
pub fn scan_ansi_runs(bytes: &[u8]) -> String {
    let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    collect_runs(decoded.chars())
}

fn collect_runs(chars: impl Iterator<Item = char>) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut units = 0usize;

    let mut flush = |current: &mut String, units: &mut usize| {
        let trimmed = current.trim();
        if *units >= MIN_RUN_UNITS
            && trimmed.chars().any(char::is_alphabetic)
            && !OLE_STREAM_NAMES.contains(&trimmed)
        {
            runs.push(trimmed.to_string());
        }
        current.clear();
        *units = 0;
    };

    for c in chars {
        match c {
            '\r' | '\n' | '\u{000b}' => {
                current.push('\n');
                units += 1;
            }
            c if is_document_char(c) => {
                current.push(c);
                units += 1;
            }
            _ => flush(&mut current, &mut units),
        }
    }
    flush(&mut current, &mut units);

    runs.join("\n")
}

fn is_document_char(c: char) -> bool {
    let code = c as u32;
    c == '\t'
        || (0x20..=0x7e).contains(&code)
        || (0xa0..=0x024f).contains(&code)
        || (0x2010..=0x2027).contains(&code)
        || c == '\u{20ac}'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs_tabs_and_breaks() {
        let body = concat!(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>"#,
            r#"<w:r><w:t>Jane</w:t></w:r><w:r><w:t xml:space="preserve"> Doe</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:t>Role</w:t><w:tab/><w:t>2020 &amp; 2021</w:t><w:br/><w:t>Next</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p><w:r><w:t>End</w:t></w:r></w:p>"#,
        );
        let text = WordExtractor.extract(&docx_with_body(body)).unwrap();
        assert_eq!(text, "Jane Doe\nRole\t2020 & 2021\nNext\n\nEnd\n");
    }

    #[test]
    fn test_docx_without_text_gets_placeholder() {
        let text = WordExtractor
            .extract(&docx_with_body("<w:p/><w:p></w:p>"))
            .unwrap();
        assert_eq!(text, NO_WORD_TEXT);
    }

    #[test]
    fn test_zip_without_document_xml_is_an_error() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.txt", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"x").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let err = WordExtractor.extract(&bytes).unwrap_err();
        assert!(matches!(err, ExtractionError::Word(_)));
    }

    #[test]
    fn test_unknown_container_is_an_error() {
        let err = WordExtractor.extract(b"plain bytes").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse Word document"));
    }

    #[test]
    fn test_legacy_doc_utf16_scan() {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 24]);
        bytes.extend("Root Entry".encode_utf16().flat_map(u16::to_le_bytes));
        bytes.extend_from_slice(&[0u8; 4]);
        bytes.extend(
            "Jane Doe\rSoftware Engineer"
                .encode_utf16()
                .flat_map(u16::to_le_bytes),
        );
        bytes.extend_from_slice(&[0u8; 8]);
        // Too short to count.
        bytes.extend("ab".encode_utf16().flat_map(u16::to_le_bytes));
        bytes.extend_from_slice(&[0u8; 8]);

        let text = WordExtractor.extract(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\nSoftware Engineer");
    }

    #[test]
    fn test_legacy_doc_without_text_gets_placeholder() {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        assert_eq!(WordExtractor.extract(&bytes).unwrap(), NO_WORD_TEXT);
    }

    /// Raw bytes of one piece in a synthetic Word binary.
    struct TestPiece {
        bytes: Vec<u8>,
        compressed: bool,
        chars: u32,
    }

    fn ansi_piece(bytes: &[u8]) -> TestPiece {
        TestPiece {
            bytes: bytes.to_vec(),
            compressed: true,
            chars: bytes.len() as u32,
        }
    }

    fn unicode_piece(text: &str) -> TestPiece {
        let units: Vec<u16> = text.encode_utf16().collect();
        TestPiece {
            bytes: units.iter().flat_map(|u| u.to_le_bytes()).collect(),
            compressed: false,
            chars: units.len() as u32,
        }
    }

    /// Builds a compound file with a minimal FIB, a piece table and the piece text.
    fn word_binary(pieces: &[TestPiece], ccp_text: u32, table_one: bool) -> Vec<u8> {
        const TEXT_START: usize = 1024;
        const CLX_OFFSET: usize = 16;

        let mut word = vec![0u8; TEXT_START];
        word[0..2].copy_from_slice(&FIB_IDENT.to_le_bytes());
        if table_one {
            word[0x0A..0x0C].copy_from_slice(&FIB_WHICH_TABLE.to_le_bytes());
        }
        word[32..34].copy_from_slice(&14u16.to_le_bytes()); // csw
        word[62..64].copy_from_slice(&22u16.to_le_bytes()); // cslw
        word[76..80].copy_from_slice(&ccp_text.to_le_bytes()); // ccpText
        word[152..154].copy_from_slice(&93u16.to_le_bytes()); // cbRgFcLcb
        let clx_entry = 154 + FIB_CLX_INDEX * 8;

        let mut cps = vec![0u32];
        let mut descriptors = Vec::new();
        for piece in pieces {
            let offset = word.len() as u32;
            word.extend_from_slice(&piece.bytes);
            cps.push(cps[cps.len() - 1] + piece.chars);
            let fc = if piece.compressed {
                (offset * 2) | FC_COMPRESSED
            } else {
                offset
            };
            descriptors.extend_from_slice(&[0, 0]);
            descriptors.extend_from_slice(&fc.to_le_bytes());
            descriptors.extend_from_slice(&[0, 0]);
        }
        let mut plc: Vec<u8> = cps.iter().flat_map(|cp| cp.to_le_bytes()).collect();
        plc.extend_from_slice(&descriptors);

        // A property entry ahead of the piece table must be skipped.
        let mut clx = vec![CLXT_PRC, 2, 0, 0xAA, 0xBB, CLXT_PCDT];
        clx.extend_from_slice(&(plc.len() as u32).to_le_bytes());
        clx.extend_from_slice(&plc);

        let mut table = vec![0u8; CLX_OFFSET];
        table.extend_from_slice(&clx);
        word[clx_entry..clx_entry + 4].copy_from_slice(&(CLX_OFFSET as u32).to_le_bytes());
        word[clx_entry + 4..clx_entry + 8].copy_from_slice(&(clx.len() as u32).to_le_bytes());

        let table_name = if table_one { "1Table" } else { "0Table" };
        let mut ole = CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        for (name, data) in [("WordDocument", &word), (table_name, &table)] {
            let mut stream = ole.create_stream(name).unwrap();
            stream.write_all(data).unwrap();
            stream.flush().unwrap();
        }
        ole.flush().unwrap();
        ole.into_inner().into_inner()
    }

    #[test]
    fn test_legacy_doc_mixes_8bit_and_utf16_pieces() {
        let pieces = [
            ansi_piece(b"Jane Doe\rSenior Software Engineer\rR\xe9sum\xe9 \x93draft\x94\r"),
            unicode_piece("Z\u{fc}rich \u{2013} Remote\r"),
        ];
        let total = pieces.iter().map(|p| p.chars).sum();
        let bytes = word_binary(&pieces, total, false);

        assert!(bytes.starts_with(OLE_MAGIC));
        let text = WordExtractor.extract(&bytes).unwrap();
        assert_eq!(
            text,
            "Jane Doe\nSenior Software Engineer\nR\u{e9}sum\u{e9} \u{201c}draft\u{201d}\nZ\u{fc}rich \u{2013} Remote\n"
        );
    }

    #[test]
    fn test_legacy_doc_stops_at_main_document_end() {
        let pieces = [ansi_piece(b"Body text\r"), ansi_piece(b"Header text\r")];
        let bytes = word_binary(&pieces, 10, true);
        assert_eq!(piece_table_text(&bytes).unwrap(), "Body text\n");
    }

    #[test]
    fn test_word_control_characters() {
        let raw = "Visit \u{13} HYPERLINK \"https://x.dev\" \u{14}site\u{15} now\r\
                   A\u{7}B\u{7}\u{7}co\u{1e}op\u{1f}\u{b}end";
        assert_eq!(clean_word_text(raw), "Visit site now\nA\tB\t\nco-op\nend");
    }

    #[test]
    fn test_fib_rejects_foreign_stream() {
        assert!(Fib::parse(&[0u8; 512]).is_err());
        assert!(Fib::parse(&FIB_IDENT.to_le_bytes()).is_err());
    }

    #[test]
    fn test_8bit_text_in_unreadable_container_is_recovered() {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 504]);
        bytes.extend_from_slice(b"Jane Doe\rSenior Software Engineer\rEXPERIENCE\rBuilt parsers\r");

        let text = WordExtractor.extract(&bytes).unwrap();
        assert_eq!(
            text,
            "Jane Doe\nSenior Software Engineer\nEXPERIENCE\nBuilt parsers"
        );
    }
}
