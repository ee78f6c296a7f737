//! PDF export.
//!
//! Stripped lines are classified, wrapped and paginated by [`super::layout`], then
//! written as a plain lopdf document using the built-in Helvetica faces, so no font
//! files are embedded.

use encoding_rs::WINDOWS_1252;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, StringFormat, Stream};
use tracing::debug;

use crate::export::layout::{layout_lines, LayoutInput, PageGeometry, PlacedLine};
use crate::export::ExportError;
use crate::structure::{strip_markdown, LineClassifier, LineKind};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

pub fn render_pdf(content: &str, classifier: &LineClassifier) -> Result<Vec<u8>, ExportError> {
    render_pdf_with(content, classifier, &PageGeometry::a4())
}

pub fn render_pdf_with(
    content: &str,
    classifier: &LineClassifier,
    geometry: &PageGeometry,
) -> Result<Vec<u8>, ExportError> {
    let stripped = strip_markdown(content);
    let classified = classifier.classify_document(&stripped);
    let inputs: Vec<LayoutInput<'_>> = classified
        .iter()
        .map(|line| LayoutInput {
            text: line.text.trim(),
            heading: line.kind == LineKind::Heading,
        })
        .collect();
    let pages = layout_lines(&inputs, geometry);
    debug!(pages = pages.len(), lines = inputs.len(), "Laid out PDF export");

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(type1_font("Helvetica"));
    let bold_id = doc.add_object(type1_font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR_FONT => regular_id,
            BOLD_FONT => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for page in &pages {
        let stream = page_content(page, geometry)
            .encode()
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, stream));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(geometry.page_width_pt),
                Object::Real(geometry.page_height_pt),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(buf)
}

fn type1_font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn page_content(lines: &[PlacedLine], geometry: &PageGeometry) -> Content {
    let x = geometry.x_pt();
    let mut operations = Vec::with_capacity(lines.len() * 5);

    for line in lines {
        let (font, size) = if line.heading {
            (BOLD_FONT, geometry.heading_font_pt)
        } else {
            (REGULAR_FONT, geometry.body_font_pt)
        };
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec![font.into(), Object::Real(size)]));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(x), Object::Real(geometry.y_pt(line.y_mm))],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&line.text), StringFormat::Literal)],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}

/// Encodes for the standard fonts' WinAnsi encoding. Characters outside it print as `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        let (bytes, _, unmappable) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if unmappable {
            out.push(b'?');
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}
