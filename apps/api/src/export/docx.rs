//! DOCX export.
//!
//! Writes a minimal WordprocessingML package by hand: content types, package
//! relationships, a two-style stylesheet and the document body. Lines map to
//! paragraphs:
//! - blank lines become empty paragraphs;
//! - headings, and any non-blank line among the first three (name and contact
//!   block), become bold `Heading2` paragraphs with leading `#` markers removed;
//! - everything else becomes a body paragraph of styled runs.

use std::io::{Cursor, Write};

use once_cell::sync::Lazy;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::export::ExportError;
use crate::structure::{parse_runs, LineClassifier, LineKind, RunStyle, StyledRun};

const WORDPROCESSING_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const HEADING_STYLE: &str = "Heading2";
const MONOSPACE_FONT: &str = "Courier New";
/// Lines at these indexes are treated as the header block.
const HEADER_BLOCK_LINES: usize = 3;

static HEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s+").expect("valid regex"));

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="80"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style></w:styles>"#;

pub fn render_docx(content: &str, classifier: &LineClassifier) -> Result<Vec<u8>, ExportError> {
    let document = document_xml(content, classifier)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/document.xml", &document),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, part_options())
            .map_err(|e| ExportError::Docx(e.to_string()))?;
        zip.write_all(bytes)
            .map_err(|e| ExportError::Docx(e.to_string()))?;
    }

    let cursor = zip.finish().map_err(|e| ExportError::Docx(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn part_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// Builds `word/document.xml` for `content`.
pub fn document_xml(content: &str, classifier: &LineClassifier) -> Result<Vec<u8>, ExportError> {
    let mut w = BodyWriter::new();
    w.decl()?;
    w.start("w:document", &[("xmlns:w", WORDPROCESSING_NS)])?;
    w.start("w:body", &[])?;

    for line in classifier.classify_document(content) {
        let header_block = line.index < HEADER_BLOCK_LINES && line.kind != LineKind::Blank;
        if line.kind == LineKind::Blank {
            w.empty("w:p", &[])?;
        } else if line.kind == LineKind::Heading || header_block {
            let cleaned = HEADING_MARKER.replace(line.text.trim(), "");
            let text: String = parse_runs(&cleaned).into_iter().map(|r| r.text).collect();
            w.heading_paragraph(&text)?;
        } else {
            w.body_paragraph(&parse_runs(line.text))?;
        }
    }

    w.start("w:sectPr", &[])?;
    w.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    w.empty(
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    w.end("w:sectPr")?;

    w.end("w:body")?;
    w.end("w:document")?;
    Ok(w.into_inner())
}

// ────────────────────────────────────────────────────────────────────────────
// XML writing
// ────────────────────────────────────────────────────────────────────────────

struct BodyWriter {
    xml: Writer<Vec<u8>>,
}

impl BodyWriter {
    fn new() -> Self {
        Self {
            xml: Writer::new(Vec::new()),
        }
    }

    fn into_inner(self) -> Vec<u8> {
        self.xml.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), ExportError> {
        self.xml
            .write_event(event)
            .map_err(|e| ExportError::Docx(e.to_string()))
    }

    fn decl(&mut self) -> Result<(), ExportError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        self.write(Event::Start(
            BytesStart::new(name).with_attributes(attrs.iter().copied()),
        ))
    }

    fn end(&mut self, name: &str) -> Result<(), ExportError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
        self.write(Event::Empty(
            BytesStart::new(name).with_attributes(attrs.iter().copied()),
        ))
    }

    fn heading_paragraph(&mut self, text: &str) -> Result<(), ExportError> {
        self.start("w:p", &[])?;
        self.start("w:pPr", &[])?;
        self.empty("w:pStyle", &[("w:val", HEADING_STYLE)])?;
        self.end("w:pPr")?;
        self.run(text, RunStyle::BOLD)?;
        self.end("w:p")
    }

    fn body_paragraph(&mut self, runs: &[StyledRun]) -> Result<(), ExportError> {
        self.start("w:p", &[])?;
        for run in runs.iter().filter(|r| !r.text.is_empty()) {
            self.run(&run.text, run.style)?;
        }
        self.end("w:p")
    }

    /// One `<w:r>`. Tabs inside the text become `<w:tab/>` elements.
    fn run(&mut self, text: &str, style: RunStyle) -> Result<(), ExportError> {
        self.start("w:r", &[])?;

        if !style.is_empty() {
            self.start("w:rPr", &[])?;
            if style.contains(RunStyle::MONOSPACE) {
                self.empty(
                    "w:rFonts",
                    &[("w:ascii", MONOSPACE_FONT), ("w:hAnsi", MONOSPACE_FONT)],
                )?;
            }
            if style.contains(RunStyle::BOLD) {
                self.empty("w:b", &[])?;
            }
            if style.contains(RunStyle::ITALIC) {
                self.empty("w:i", &[])?;
            }
            self.end("w:rPr")?;
        }

        let text: String = text.chars().filter(|&c| is_xml_char(c)).collect();
        for (i, piece) in text.split('\t').enumerate() {
            if i > 0 {
                self.empty("w:tab", &[])?;
            }
            if !piece.is_empty() {
                self.start("w:t", &[("xml:space", "preserve")])?;
                self.write(Event::Text(BytesText::new(piece)))?;
                self.end("w:t")?;
            }
        }

        self.end("w:r")
    }
}

/// Characters XML 1.0 allows in text content.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}
