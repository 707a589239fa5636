//! Plain-text rendering of a glossary page
//!
//! Text is wrapped by display width so CJK and accented terms line up.

use crate::glossary::{PageView, TermRecord};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Message shown instead of rows when nothing matches
pub const NO_RESULTS: &str = "No terms match the search.";

/// Indent for the detail lines under each term
const INDENT: &str = "     ";

/// Word-wrap `text` to lines of at most `width` display columns
///
/// Words longer than `width` are split by character.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if line.is_empty() { word_width } else { line_width + 1 + word_width };

        if needed <= width {
            if !line.is_empty() {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }

        if word_width <= width {
            line.push_str(word);
            line_width = word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if line_width + ch_width > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            line.push(ch);
            line_width += ch_width;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn push_wrapped(out: &mut String, prefix: &str, text: &str, width: usize) {
    let available = width.saturating_sub(INDENT.width() + prefix.width());
    for (i, line) in wrap(text, available).into_iter().enumerate() {
        out.push_str(INDENT);
        if i == 0 {
            out.push_str(prefix);
        } else {
            out.push_str(&" ".repeat(prefix.width()));
        }
        out.push_str(&line);
        out.push('\n');
    }
}

/// Render one term as a numbered block
pub fn render_term(row: usize, term: &TermRecord, width: usize) -> String {
    let mut out = format!("{:>3}. {}", row, term.term);
    if let Some(pron) = term.pronunciation.as_deref().filter(|p| !p.trim().is_empty()) {
        out.push_str(&format!("  /{}/", pron.trim()));
    }
    out.push('\n');

    push_wrapped(&mut out, "", &term.definition, width);
    if let Some(translation) = &term.translation {
        push_wrapped(&mut out, "Translation: ", translation, width);
    }
    if let Some(example) = &term.example {
        push_wrapped(&mut out, "Example: ", example, width);
    }
    out
}

/// Pagination footer: "Page X of Y" and which controls are enabled
pub fn render_footer(view: &PageView<'_>) -> String {
    let prev = if view.has_prev { "[p] previous" } else { "(previous)" };
    let next = if view.has_next { "[n] next" } else { "(next)" };
    format!("{}   {}   {}", view.label(), prev, next)
}

/// Render the visible page, including header and footer
pub fn render_page(view: &PageView<'_>, query: &str, width: usize) -> String {
    let mut out = String::new();

    let query = query.trim();
    if !query.is_empty() {
        out.push_str(&format!("Search: {}\n", query));
    }
    out.push_str(&"-".repeat(width.clamp(10, 80)));
    out.push('\n');

    if view.no_results {
        out.push_str(NO_RESULTS);
        out.push('\n');
    } else {
        for (i, term) in view.items.iter().enumerate() {
            out.push_str(&render_term(i + 1, term, width));
        }
    }

    out.push_str(&"-".repeat(width.clamp(10, 80)));
    out.push('\n');
    out.push_str(&render_footer(view));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glossary::Pager;

    #[test]
    fn test_wrap_by_words() {
        assert_eq!(wrap("one two three four", 9), vec!["one two", "three", "four"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("  spaced   out  ", 80), vec!["spaced out"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_uses_display_width() {
        // Each CJK character is two columns wide
        let lines = wrap("日本語 テキスト", 6);
        assert_eq!(lines, vec!["日本語", "テキス", "ト"]);
        for line in lines {
            assert!(line.width() <= 6);
        }
    }

    #[test]
    fn test_render_term_fields() {
        let term = TermRecord::new("API", "Application Programming Interface")
            .with_pronunciation("ei-pi-ai")
            .with_translation("Interfaz de programación")
            .with_example("Call the API.");
        let out = render_term(1, &term, 80);
        assert!(out.starts_with("  1. API  /ei-pi-ai/\n"));
        assert!(out.contains("Application Programming Interface"));
        assert!(out.contains("Translation: Interfaz de programación"));
        assert!(out.contains("Example: Call the API."));
    }

    #[test]
    fn test_render_no_results() {
        let items: Vec<TermRecord> = Vec::new();
        let pager = Pager::new();
        let out = render_page(&pager.view(&items), "zzz", 40);
        assert!(out.contains("Search: zzz"));
        assert!(out.contains(NO_RESULTS));
        assert!(out.contains("Page 1 of 1   (previous)   (next)"));
    }

    #[test]
    fn test_footer_controls() {
        let items: Vec<TermRecord> = (0..7)
            .map(|i| TermRecord::new(format!("t{}", i), "d"))
            .collect();
        let mut pager = Pager::new();
        assert_eq!(
            render_footer(&pager.view(&items)),
            "Page 1 of 2   (previous)   [n] next"
        );
        pager.next(items.len());
        assert_eq!(
            render_footer(&pager.view(&items)),
            "Page 2 of 2   [p] previous   (next)"
        );
    }
}
