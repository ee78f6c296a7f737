//! Text layout for the PDF exporter: static Helvetica metrics, greedy word wrap and
//! pagination.
//!
//! Character widths are the standard-14 AFM advance widths in em units (1/1000 of
//! the AFM value). Both tables cover ASCII 0x20..=0x7E (95 printable characters);
//! index = (char as usize) - 32. Anything else is measured with the table's
//! average width, which is close enough for Latin-1 accents.
//!
//! Positions are kept in millimetres from the top-left corner, matching how the
//! page geometry is specified; [`PageGeometry`] converts to PDF points.

// ────────────────────────────────────────────────────────────────────────────
// Font metrics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    pub fn metrics(self) -> &'static FontMetricTable {
        match self {
            FontFace::Regular => &HELVETICA,
            FontFace::Bold => &HELVETICA_BOLD,
        }
    }
}

/// Static character-width table for one face.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside printable ASCII.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Width of `s` in points at `font_size_pt`.
    pub fn width_pt(&self, s: &str, font_size_pt: f32) -> f32 {
        self.measure_str(s) * font_size_pt
    }
}

static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.590,
    space_width: 0.278,
};

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Page size, margins and leading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_left_mm: f32,
    pub margin_right_mm: f32,
    /// Baseline of the first line on each page.
    pub top_mm: f32,
    /// A new page starts once the cursor passes this point.
    pub bottom_limit_mm: f32,
    pub line_height_mm: f32,
    /// Extra space inserted above a heading.
    pub heading_gap_mm: f32,
    pub body_font_pt: f32,
    pub heading_font_pt: f32,
}

impl PageGeometry {
    /// A4 portrait, 10 mm left and right margins, 6 mm leading, 10/14 pt type.
    pub fn a4() -> Self {
        Self {
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            margin_left_mm: 10.0,
            margin_right_mm: 10.0,
            top_mm: 10.0,
            bottom_limit_mm: 280.0,
            line_height_mm: 6.0,
            heading_gap_mm: 5.0,
            body_font_pt: 10.0,
            heading_font_pt: 14.0,
        }
    }

    /// Usable line width in points.
    pub fn text_width_pt(&self) -> f32 {
        self.page_width_pt - (self.margin_left_mm + self.margin_right_mm) * MM_TO_PT
    }

    pub fn x_pt(&self) -> f32 {
        self.margin_left_mm * MM_TO_PT
    }

    /// Converts a top-down position in mm to a PDF (bottom-up) y coordinate.
    pub fn y_pt(&self, y_mm: f32) -> f32 {
        self.page_height_pt - y_mm * MM_TO_PT
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping and pagination
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word wrap. Words wider than a full line are split by character.
/// Returns no segments for a whitespace-only line.
pub fn wrap_line(
    text: &str,
    metrics: &FontMetricTable,
    font_size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let space_w = metrics.space_width * font_size_pt;
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = metrics.width_pt(word, font_size_pt);

        if word_w > max_width_pt {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = split_word(word, metrics, font_size_pt, max_width_pt);
            // The tail of a split word can still share its line with what follows.
            current = pieces.pop().unwrap_or_default();
            current_w = metrics.width_pt(&current, font_size_pt);
            lines.extend(pieces);
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_w = word_w;
        } else if current_w + space_w + word_w > max_width_pt {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_w = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_w += space_w + word_w;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn split_word(
    word: &str,
    metrics: &FontMetricTable,
    font_size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_w = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let c_w = metrics.width_pt(c.encode_utf8(&mut buf), font_size_pt);
        if !piece.is_empty() && piece_w + c_w > max_width_pt {
            pieces.push(std::mem::take(&mut piece));
            piece_w = 0.0;
        }
        piece.push(c);
        piece_w += c_w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// A source line ready for layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInput<'a> {
    pub text: &'a str,
    pub heading: bool,
}

/// One wrapped segment at its final position on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub y_mm: f32,
    pub heading: bool,
}

/// Lays lines out top to bottom. Headings get the heading gap above them and the
/// heading font; every segment advances the cursor by one line height; a new page
/// begins whenever the cursor has passed the bottom limit. Blank lines take up
/// space but produce no segment. Always returns at least one (possibly empty) page.
pub fn layout_lines(lines: &[LayoutInput<'_>], geometry: &PageGeometry) -> Vec<Vec<PlacedLine>> {
    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut y = geometry.top_mm;
    let max_width = geometry.text_width_pt();

    for line in lines {
        let (face, size) = if line.heading {
            (FontFace::Bold, geometry.heading_font_pt)
        } else {
            (FontFace::Regular, geometry.body_font_pt)
        };

        let mut segments = wrap_line(line.text, face.metrics(), size, max_width);
        if segments.is_empty() {
            // Blank line: keeps its vertical space.
            segments.push(String::new());
        }

        for (i, segment) in segments.into_iter().enumerate() {
            if y > geometry.bottom_limit_mm {
                pages.push(Vec::new());
                y = geometry.top_mm;
            }
            if line.heading && i == 0 {
                y += geometry.heading_gap_mm;
            }
            if !segment.is_empty() {
                if let Some(page) = pages.last_mut() {
                    page.push(PlacedLine {
                        text: segment,
                        y_mm: y,
                        heading: line.heading,
                    });
                }
            }
            y += geometry.line_height_mm;
        }
    }

    // Trailing blank lines can open a page that never receives text.
    while pages.len() > 1 && pages.last().is_some_and(Vec::is_empty) {
        pages.pop();
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(text: &str) -> LayoutInput<'_> {
        LayoutInput {
            text,
            heading: false,
        }
    }

    #[test]
    fn test_measure_known_widths() {
        let m = FontFace::Regular.metrics();
        assert!((m.measure_str("Hi") - (0.722 + 0.222)).abs() < 1e-6);
        assert!((m.measure_str("é") - m.average_char_width).abs() < 1e-6);
        assert!(
            FontFace::Bold.metrics().measure_str("resume") > m.measure_str("resume"),
            "bold should be wider"
        );
    }

    #[test]
    fn test_a4_text_width() {
        let g = PageGeometry::a4();
        // 210 mm page minus 20 mm of margins ≈ 538.6 pt.
        assert!((g.text_width_pt() - 538.58).abs() < 0.1, "{}", g.text_width_pt());
        assert!((g.y_pt(0.0) - 841.89).abs() < 1e-3);
    }

    #[test]
    fn test_wrap_short_line_untouched() {
        let lines = wrap_line("Senior Engineer", FontFace::Regular.metrics(), 10.0, 500.0);
        assert_eq!(lines, vec!["Senior Engineer".to_string()]);
    }

    #[test]
    fn test_wrap_respects_width() {
        let m = FontFace::Regular.metrics();
        let text = "word ".repeat(200);
        let lines = wrap_line(&text, m, 10.0, 200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(m.width_pt(line, 10.0) <= 200.0, "too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn test_wrap_splits_oversized_word() {
        let m = FontFace::Regular.metrics();
        let url = "https://example.com/".repeat(10);
        let lines = wrap_line(&format!("see {url} now"), m, 10.0, 100.0);
        assert_eq!(lines.first().map(String::as_str), Some("see"));
        for line in &lines {
            assert!(m.width_pt(line, 10.0) <= 100.0, "too wide: {line}");
        }
        assert_eq!(lines.concat().replace(' ', ""), format!("see{url}now"));
    }

    #[test]
    fn test_wrap_blank_line_has_no_segments() {
        assert!(wrap_line("   ", FontFace::Regular.metrics(), 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_pagination_of_body_lines() {
        let texts: Vec<String> = (0..100).map(|i| format!("Line {i}")).collect();
        let inputs: Vec<LayoutInput<'_>> = texts.iter().map(|t| body(t)).collect();
        let pages = layout_lines(&inputs, &PageGeometry::a4());

        // Baselines 10, 16, ..., 280: 46 lines fit on a page.
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].len(), 46);
        assert_eq!(pages[1].len(), 46);
        assert_eq!(pages[2].len(), 8);
        assert_eq!(pages[1][0].text, "Line 46");
        assert!((pages[1][0].y_mm - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_heading_gets_extra_leading() {
        let inputs = [
            body("Jane Doe"),
            LayoutInput {
                text: "EXPERIENCE",
                heading: true,
            },
            body("Built things"),
        ];
        let pages = layout_lines(&inputs, &PageGeometry::a4());
        let ys: Vec<f32> = pages[0].iter().map(|l| l.y_mm).collect();
        assert_eq!(ys, vec![10.0, 21.0, 27.0]);
        assert!(pages[0][1].heading);
    }

    #[test]
    fn test_blank_lines_take_space_only() {
        let pages = layout_lines(&[body("a"), body(""), body("b")], &PageGeometry::a4());
        assert_eq!(pages[0].len(), 2);
        assert!((pages[0][1].y_mm - 22.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_input_yields_one_empty_page() {
        let pages = layout_lines(&[], &PageGeometry::a4());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }
}
