//! Markdown-run parser: splits one line into styled runs.
//!
//! Recognised markup: `**x**` / `__x__` (bold), `*x*` / `_x_` (italic) and `` `x` ``
//! (monospace). Every family is searched independently and matches are consumed
//! left to right: the match that starts first wins, and on an exact tie the family
//! listed first in [`MARKUP`] wins. Bold and italic content is parsed again so the
//! styles nest; code spans are literal.

use bitflags::bitflags;
use once_cell::sync::Lazy;
use regex::Regex;

bitflags! {
    /// Independent style flags of a run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RunStyle: u8 {
        const BOLD = 1;
        const ITALIC = 1 << 1;
        const MONOSPACE = 1 << 2;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::empty(),
        }
    }
}

struct Markup {
    pattern: Regex,
    style: RunStyle,
    /// Whether the captured content may itself contain markup.
    nests: bool,
}

/// Markup families in tie-break priority order.
static MARKUP: Lazy<Vec<Markup>> = Lazy::new(|| {
    let family = |pattern: &str, style: RunStyle, nests: bool| Markup {
        pattern: Regex::new(pattern).expect("valid regex"),
        style,
        nests,
    };
    vec![
        family(r"\*\*(.+?)\*\*", RunStyle::BOLD, true),
        family(r"__(.+?)__", RunStyle::BOLD, true),
        family(r"\*([^*]+)\*", RunStyle::ITALIC, true),
        family(r"_([^_]+)_", RunStyle::ITALIC, true),
        family(r"`([^`]+)`", RunStyle::MONOSPACE, false),
    ]
});

#[derive(Debug, Clone, Copy)]
struct Found {
    start: usize,
    end: usize,
    inner_start: usize,
    inner_end: usize,
}

fn find(markup: &Markup, text: &str, from: usize) -> Option<Found> {
    let caps = markup.pattern.captures_at(text, from)?;
    let whole = caps.get(0)?;
    let inner = caps.get(1)?;
    Some(Found {
        start: whole.start(),
        end: whole.end(),
        inner_start: inner.start(),
        inner_end: inner.end(),
    })
}

/// Decomposes `line` into ordered runs. Concatenating the run texts gives the line
/// with markup tokens removed. A line without markup is a single plain run.
pub fn parse_runs(line: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    parse_into(line, RunStyle::empty(), &mut runs);
    if runs.is_empty() {
        runs.push(StyledRun::plain(line));
    }
    runs
}

fn parse_into(text: &str, base: RunStyle, out: &mut Vec<StyledRun>) {
    let mut next: Vec<Option<Found>> = MARKUP.iter().map(|m| find(m, text, 0)).collect();
    let mut cursor = 0;

    loop {
        // Matches overlapping already-consumed text are searched again from the cursor.
        for (slot, markup) in next.iter_mut().zip(MARKUP.iter()) {
            if slot.is_some_and(|f| f.start < cursor) {
                *slot = find(markup, text, cursor);
            }
        }

        let Some((family, found)) = next
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.map(|f| (i, f)))
            .min_by_key(|(i, f)| (f.start, *i))
        else {
            break;
        };

        push_run(out, &text[cursor..found.start], base);
        let markup = &MARKUP[family];
        let inner = &text[found.inner_start..found.inner_end];
        if markup.nests {
            parse_into(inner, base | markup.style, out);
        } else {
            push_run(out, inner, base | markup.style);
        }
        cursor = found.end;
    }

    push_run(out, &text[cursor..], base);
}

fn push_run(out: &mut Vec<StyledRun>, text: &str, style: RunStyle) {
    if !text.is_empty() {
        out.push(StyledRun {
            text: text.to_string(),
            style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, style: RunStyle) -> StyledRun {
        StyledRun {
            text: text.to_string(),
            style,
        }
    }

    fn joined(runs: &[StyledRun]) -> String {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_bold_and_italic_runs() {
        let runs = parse_runs("This is **bold** and *italic*");
        assert_eq!(joined(&runs), "This is bold and italic");
        assert_eq!(
            runs,
            vec![
                StyledRun::plain("This is "),
                run("bold", RunStyle::BOLD),
                StyledRun::plain(" and "),
                run("italic", RunStyle::ITALIC),
            ]
        );
    }

    #[test]
    fn test_underscore_variants_and_code() {
        let runs = parse_runs("__Rust__ with _serde_ and `cargo`");
        assert_eq!(
            runs,
            vec![
                run("Rust", RunStyle::BOLD),
                StyledRun::plain(" with "),
                run("serde", RunStyle::ITALIC),
                StyledRun::plain(" and "),
                run("cargo", RunStyle::MONOSPACE),
            ]
        );
    }

    #[test]
    fn test_no_markup_is_single_plain_run() {
        assert_eq!(parse_runs("Plain line"), vec![StyledRun::plain("Plain line")]);
        assert_eq!(parse_runs(""), vec![StyledRun::plain("")]);
    }

    #[test]
    fn test_bold_content_nests_italic() {
        let runs = parse_runs("**bold _and italic_**");
        assert_eq!(
            runs,
            vec![
                run("bold ", RunStyle::BOLD),
                run("and italic", RunStyle::BOLD | RunStyle::ITALIC),
            ]
        );
    }

    #[test]
    fn test_code_span_is_literal() {
        let runs = parse_runs("`a *b* c`");
        assert_eq!(runs, vec![run("a *b* c", RunStyle::MONOSPACE)]);
    }

    #[test]
    fn test_earlier_start_wins_on_overlap() {
        // The italic span opens before the code span and swallows its first backtick.
        let runs = parse_runs("*a `b* c`");
        assert_eq!(
            runs,
            vec![run("a `b", RunStyle::ITALIC), StyledRun::plain(" c`")]
        );
    }

    #[test]
    fn test_adjacent_spans_do_not_share_delimiters() {
        let runs = parse_runs("*one* *two*");
        assert_eq!(
            runs,
            vec![
                run("one", RunStyle::ITALIC),
                StyledRun::plain(" "),
                run("two", RunStyle::ITALIC),
            ]
        );
    }

    #[test]
    fn test_unclosed_markup_stays_literal() {
        assert_eq!(parse_runs("5 * 3 = 15"), vec![StyledRun::plain("5 * 3 = 15")]);
        assert_eq!(parse_runs("**open"), vec![StyledRun::plain("**open")]);
    }
}
