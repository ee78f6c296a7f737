//! Line classifier: decides whether a resume line is a heading, contact line, name
//! line, bullet, blank or body text.
//!
//! Purely heuristic and deterministic. The result depends only on the line text, its
//! zero-based position in the document, and the [`HeadingPolicy`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static MARKDOWN_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s+").expect("valid regex"));

/// Glyphs accepted as bullet markers besides `-`.
const BULLET_GLYPHS: &[char] = &['•', '●', '◦', '▪', '■', '‣', '○', '►'];

/// Contact lines are only recognised near the top of the document.
const CONTACT_WINDOW: usize = 5;
/// Name lines are only recognised on the first two lines.
const NAME_WINDOW: usize = 2;
const MAX_NAME_TOKENS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Heading,
    ContactLine,
    NameLine,
    BulletItem,
    Blank,
    Body,
}

// ────────────────────────────────────────────────────────────────────────────
// Heading policy
// ────────────────────────────────────────────────────────────────────────────

/// Thresholds for keyword-based heading detection.
///
/// A non-markdown line is a heading when it is shorter than `max_heading_len`
/// characters, all uppercase, has no `:`, and contains one of `keywords`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingPolicy {
    pub max_heading_len: usize,
    pub keywords: Vec<String>,
}

const SECTION_KEYWORDS: &[&str] = &[
    "SUMMARY",
    "EXPERIENCE",
    "EDUCATION",
    "SKILLS",
    "PROJECTS",
    "CERTIFICATIONS",
    "OBJECTIVE",
    "PROFILE",
];

impl HeadingPolicy {
    /// 50 characters, all eight section keywords. The default.
    pub fn extended() -> Self {
        Self {
            max_heading_len: 50,
            keywords: SECTION_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// 30 characters, the six core section keywords.
    pub fn compact() -> Self {
        Self {
            max_heading_len: 30,
            keywords: SECTION_KEYWORDS[..6].iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Looks a policy up by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "extended" => Some(Self::extended()),
            "compact" => Some(Self::compact()),
            _ => None,
        }
    }

    fn is_keyword_heading(&self, trimmed: &str) -> bool {
        trimmed.chars().count() < self.max_heading_len
            && trimmed == trimmed.to_uppercase()
            && !trimmed.contains(':')
            && self.keywords.iter().any(|k| trimmed.contains(k.as_str()))
    }
}

impl Default for HeadingPolicy {
    fn default() -> Self {
        Self::extended()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Classifier
// ────────────────────────────────────────────────────────────────────────────

/// A line together with its position and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub text: &'a str,
    pub index: usize,
    pub kind: LineKind,
}

#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    policy: HeadingPolicy,
}

impl LineClassifier {
    pub fn new(policy: HeadingPolicy) -> Self {
        Self { policy }
    }

    /// Classifies one line. First matching rule wins:
    /// blank, heading, contact line, name line, bullet, body.
    pub fn classify(&self, line: &str, index: usize) -> LineKind {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if MARKDOWN_HEADING.is_match(trimmed) || self.policy.is_keyword_heading(trimmed) {
            return LineKind::Heading;
        }
        if index < CONTACT_WINDOW && is_contact(line) {
            return LineKind::ContactLine;
        }
        if index < NAME_WINDOW
            && !trimmed.contains(':')
            && trimmed.split_whitespace().count() <= MAX_NAME_TOKENS
        {
            return LineKind::NameLine;
        }
        if is_bullet(trimmed) {
            return LineKind::BulletItem;
        }
        LineKind::Body
    }

    /// Classifies every `\n`-separated line of `text`.
    pub fn classify_document<'a>(&self, text: &'a str) -> Vec<ClassifiedLine<'a>> {
        text.split('\n')
            .enumerate()
            .map(|(index, line)| {
                let line = line.strip_suffix('\r').unwrap_or(line);
                ClassifiedLine {
                    text: line,
                    index,
                    kind: self.classify(line, index),
                }
            })
            .collect()
    }
}

static DEFAULT_CLASSIFIER: Lazy<LineClassifier> = Lazy::new(LineClassifier::default);

/// Classifies with the default (extended) heading policy.
pub fn classify(line: &str, index: usize) -> LineKind {
    DEFAULT_CLASSIFIER.classify(line, index)
}

fn is_contact(line: &str) -> bool {
    line.contains('@') || line.contains("LinkedIn") || line.contains("GitHub") || line.contains("http")
}

fn is_bullet(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    match chars.next() {
        Some('-') => true,
        Some(c) if BULLET_GLYPHS.contains(&c) => true,
        Some('*' | '+') => chars.next().is_some_and(char::is_whitespace),
        _ => false,
    }
}
