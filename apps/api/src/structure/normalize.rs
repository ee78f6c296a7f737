//! Markdown-stripping normalizer.
//!
//! Removes markup tokens so plain-text, RTF and PDF exports read cleanly. List
//! prefixes are kept but canonicalized to `- `. The transform is idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("valid regex"),
        replacement,
    }
}

/// Applied in order; each rule sees the output of the previous one.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        // Fence lines go, the code between them stays.
        rule(r"(?m)^[ \t]*(?:```|~~~)[^\n]*\n?", ""),
        rule(r"`([^`\n]*)`", "$1"),
        rule(r"\*\*([^*\n]+)\*\*", "$1"),
        rule(r"__([^_\n]+)__", "$1"),
        rule(r"\*([^*\s][^*\n]*)\*", "$1"),
        rule(r"(^|[^\w])_([^_\s][^_\n]*)_", "${1}${2}"),
        rule(r"~~([^~\n]+)~~", "$1"),
        rule(r"(?m)^[ \t]*#{1,6}[ \t]+", ""),
        rule(
            r"(?m)^[ \t]*(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$",
            "",
        ),
        rule(r"(?m)^[ \t]*>[ \t]?", ""),
        rule(r"(?m)^[ \t]*(?:[-*+•●◦▪]|\d{1,3}[.)])[ \t]+", "- "),
        rule(r"!\[([^\]\n]*)\]\([^)\n]*\)", "$1"),
        rule(r"\[([^\]\n]+)\]\([^)\n]*\)", "$1"),
        rule(r"\[([^\]\n]+)\]\[[^\]\n]*\]", "$1"),
        rule(r"\n{3,}", "\n\n"),
    ]
});

/// Strips markdown from `text`. `strip_markdown(strip_markdown(s)) == strip_markdown(s)`.
pub fn strip_markdown(text: &str) -> String {
    let mut current = strip_once(text);
    // One pass can expose new markup (`***x***` loses one layer per pass). Each pass
    // either shortens the text or leaves it unchanged, so this terminates.
    loop {
        let next = strip_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_once(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n");
    for rule in RULES.iter() {
        if rule.pattern.is_match(&out) {
            out = rule
                .pattern
                .replace_all(&out, rule.replacement)
                .into_owned();
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotent_on_tricky_inputs() {
        let samples = [
            "# Title\n\n**bold** and *it* and `code`",
            "***triple*** emphasis",
            "* * *\n- a\n+ b\n1. c\n  2) d",
            "> quote with [link](http://x.y) and ![img](a.png)",
            "```rust\nfn main() {}\n```\n\n\n\nafter",
            "__a__ _b_ snake_case_name ~~gone~~",
            "[ref][1] and [bare]",
            "- - - -\n***\n___",
            "",
        ];
        for s in samples {
            let once = strip_markdown(s);
            assert_eq!(strip_markdown(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_headings_and_emphasis() {
        assert_eq!(
            strip_markdown("## Experience\n**Senior** *Rust* Engineer"),
            "Experience\nSenior Rust Engineer"
        );
    }

    #[test]
    fn test_nested_emphasis_fully_removed() {
        assert_eq!(strip_markdown("***very*** important"), "very important");
    }

    #[test]
    fn test_list_markers_canonicalized() {
        assert_eq!(
            strip_markdown("* one\n+ two\n• three\n1. four\n  10) five"),
            "- one\n- two\n- three\n- four\n- five"
        );
    }

    #[test]
    fn test_code_fences_dropped_content_kept() {
        assert_eq!(
            strip_markdown("Intro\n```bash\ncargo build\n```\nOutro"),
            "Intro\ncargo build\nOutro"
        );
        assert_eq!(strip_markdown("Run `make test` now"), "Run make test now");
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            strip_markdown("See [my site](https://jane.dev) and [docs][2] ![logo](l.png)"),
            "See my site and docs logo"
        );
    }

    #[test]
    fn test_rules_quotes_and_strikethrough() {
        assert_eq!(
            strip_markdown("Above\n---\n> Quoted ~~old~~ text\nBelow"),
            "Above\n\nQuoted old text\nBelow"
        );
    }

    #[test]
    fn test_snake_case_survives() {
        assert_eq!(strip_markdown("uses snake_case_names"), "uses snake_case_names");
        assert_eq!(strip_markdown("an _italic_ word"), "an italic word");
    }

    #[test]
    fn test_blank_lines_collapsed_and_trimmed() {
        assert_eq!(strip_markdown("\n\na\n\n\n\n\nb\n\n"), "a\n\nb");
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(strip_markdown("# A\r\n- b\r\n"), "A\n- b");
    }
}
