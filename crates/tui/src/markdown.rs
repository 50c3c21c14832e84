//! Markdown → styled-line rendering for chat answers and summaries.
//!
//! Pure and deterministic: the same input always produces the same lines,
//! so re-rendering the visible prefix on every reveal increment is safe.
//! Supports headings, bullet/numbered lists, tables, blockquotes, links,
//! inline code and fenced code blocks with language-aware keyword colors.

use ratatui::prelude::*;
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    // Language of the currently open fence, if any.
    let mut fence: Option<String> = None;
    let mut table: Vec<Vec<String>> = Vec::new();

    for raw in content.lines() {
        let trimmed = raw.trim_start();

        if let Some(rest) = trimmed.strip_prefix("```") {
            flush_table(&mut table, &mut lines);
            match fence.take() {
                Some(_) => {}
                None => fence = Some(rest.trim().to_ascii_lowercase()),
            }
            continue;
        }
        if let Some(lang) = &fence {
            lines.push(highlight_code_line(lang, raw));
            continue;
        }

        if is_table_row(trimmed) {
            table.push(split_table_row(trimmed));
            continue;
        }
        flush_table(&mut table, &mut lines);

        if trimmed.is_empty() {
            lines.push(Line::raw(""));
        } else if let Some((level, text)) = heading(trimmed) {
            lines.push(heading_line(level, text));
        } else if let Some(rest) = blockquote(trimmed) {
            lines.push(blockquote_line(rest));
        } else if let Some(rest) = bullet_item(trimmed) {
            let indent = " ".repeat(raw.len() - trimmed.len());
            let mut spans = vec![Span::styled(
                format!("{indent}• "),
                Style::new().fg(Theme::MD_BULLET),
            )];
            spans.extend(parse_inline(rest));
            lines.push(Line::from(spans));
        } else if let Some((number, rest)) = ordered_item(trimmed) {
            let indent = " ".repeat(raw.len() - trimmed.len());
            let mut spans = vec![Span::styled(
                format!("{indent}{number}. "),
                Style::new().fg(Theme::MD_BULLET),
            )];
            spans.extend(parse_inline(rest));
            lines.push(Line::from(spans));
        } else {
            lines.push(Line::from(parse_inline(trimmed)));
        }
    }
    flush_table(&mut table, &mut lines);
    lines
}

// ── Block elements ──────────────────────────────────────────────────────

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..]
        .strip_prefix(' ')
        .map(|text| (level, text.trim_end()))
}

fn heading_line(level: usize, text: &str) -> Line<'static> {
    let mut style = Style::new().fg(Theme::MD_HEADING).bold();
    if level == 1 {
        style = style.underlined();
    }
    Line::from(Span::styled(text.to_string(), style))
}

fn blockquote(line: &str) -> Option<&str> {
    line.strip_prefix('>').map(|rest| rest.trim_start())
}

fn blockquote_line(text: &str) -> Line<'static> {
    let mut spans = vec![Span::styled("▌ ", Style::new().fg(Theme::MD_QUOTE))];
    for mut span in parse_inline(text) {
        span.style = span.style.italic();
        spans.push(span);
    }
    Line::from(spans)
}

fn bullet_item(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
}

fn ordered_item(line: &str) -> Option<(&str, &str)> {
    let dot = line.find(". ")?;
    let number = &line[..dot];
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((number, &line[dot + 2..]))
}

// ── Tables ──────────────────────────────────────────────────────────────

fn is_table_row(line: &str) -> bool {
    line.starts_with('|') && line.matches('|').count() >= 2
}

fn split_table_row(line: &str) -> Vec<String> {
    line.trim()
        .trim_start_matches('|')
        .trim_end_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn is_separator_row(row: &[String]) -> bool {
    !row.is_empty()
        && row.iter().all(|cell| {
            !cell.is_empty() && cell.chars().all(|c| matches!(c, '-' | ':'))
        })
}

fn flush_table(rows: &mut Vec<Vec<String>>, lines: &mut Vec<Line<'static>>) {
    if rows.is_empty() {
        return;
    }
    let rows = std::mem::take(rows);
    let has_separator = rows.iter().any(|row| is_separator_row(row));

    let mut widths: Vec<usize> = Vec::new();
    for row in rows.iter().filter(|row| !is_separator_row(row)) {
        for (i, cell) in row.iter().enumerate() {
            let w = cell.width();
            if i >= widths.len() {
                widths.push(w);
            } else {
                widths[i] = widths[i].max(w);
            }
        }
    }

    let mut seen_content_row = false;
    for row in &rows {
        if is_separator_row(row) {
            let rule = widths
                .iter()
                .map(|w| "─".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("┼");
            lines.push(Line::from(Span::styled(
                rule,
                Style::new().fg(Theme::BORDER_NORMAL),
            )));
            continue;
        }
        let is_header = has_separator && !seen_content_row;
        seen_content_row = true;
        let style = if is_header {
            Style::new().fg(Theme::TEXT_PRIMARY).bold()
        } else {
            Style::new().fg(Theme::TEXT_CONTENT)
        };
        let mut spans = Vec::new();
        for (i, cell) in row.iter().enumerate() {
            let w = widths.get(i).copied().unwrap_or_else(|| cell.width());
            let pad = " ".repeat(w.saturating_sub(cell.width()));
            spans.push(Span::styled(format!(" {cell}{pad} "), style));
            if i + 1 < row.len() {
                spans.push(Span::styled("│", Style::new().fg(Theme::BORDER_NORMAL)));
            }
        }
        lines.push(Line::from(spans));
    }
}

// ── Inline elements ─────────────────────────────────────────────────────

fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '`' => {
                if let Some(end) = find_char(&chars, i + 1, '`') {
                    flush_plain(&mut plain, &mut spans);
                    let code: String = chars[i + 1..end].iter().collect();
                    spans.push(Span::styled(code, Style::new().fg(Theme::MD_CODE)));
                    i = end + 1;
                    continue;
                }
            }
            '*' if i + 1 < chars.len() && chars[i + 1] == '*' => {
                if let Some(end) = find_marker(&chars, i + 2) {
                    flush_plain(&mut plain, &mut spans);
                    let bold: String = chars[i + 2..end].iter().collect();
                    spans.push(Span::styled(
                        bold,
                        Style::new().fg(Theme::TEXT_PRIMARY).bold(),
                    ));
                    i = end + 2;
                    continue;
                }
            }
            '*' => {
                if let Some(end) = find_char(&chars, i + 1, '*') {
                    flush_plain(&mut plain, &mut spans);
                    let italic: String = chars[i + 1..end].iter().collect();
                    spans.push(Span::styled(
                        italic,
                        Style::new().fg(Theme::TEXT_CONTENT).italic(),
                    ));
                    i = end + 1;
                    continue;
                }
            }
            '[' => {
                if let Some((label, url, next)) = parse_link(&chars, i) {
                    flush_plain(&mut plain, &mut spans);
                    spans.push(Span::styled(
                        label,
                        Style::new().fg(Theme::MD_LINK).underlined(),
                    ));
                    spans.push(Span::styled(
                        format!(" ({url})"),
                        Style::new().fg(Theme::TEXT_MUTED),
                    ));
                    i = next;
                    continue;
                }
            }
            _ => {}
        }
        plain.push(chars[i]);
        i += 1;
    }
    flush_plain(&mut plain, &mut spans);
    spans
}

fn flush_plain(plain: &mut String, spans: &mut Vec<Span<'static>>) {
    if !plain.is_empty() {
        spans.push(Span::styled(
            std::mem::take(plain),
            Style::new().fg(Theme::TEXT_CONTENT),
        ));
    }
}

fn find_char(chars: &[char], from: usize, needle: char) -> Option<usize> {
    (from..chars.len()).find(|&i| chars[i] == needle)
}

/// Position of the next `**` marker at or after `from`.
fn find_marker(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1)).find(|&i| chars[i] == '*' && chars[i + 1] == '*')
}

/// Parse `[label](url)` starting at `open`. Returns (label, url, next index).
fn parse_link(chars: &[char], open: usize) -> Option<(String, String, usize)> {
    let close_label = find_char(chars, open + 1, ']')?;
    if chars.get(close_label + 1) != Some(&'(') {
        return None;
    }
    let close_url = find_char(chars, close_label + 2, ')')?;
    let label: String = chars[open + 1..close_label].iter().collect();
    let url: String = chars[close_label + 2..close_url].iter().collect();
    Some((label, url, close_url + 1))
}

// ── Fenced code ─────────────────────────────────────────────────────────

fn keywords(lang: &str) -> &'static [&'static str] {
    match lang {
        "rust" | "rs" => &[
            "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
            "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
            "ref", "return", "self", "Self", "static", "struct", "trait", "type", "use", "where",
            "while",
        ],
        "python" | "py" => &[
            "False", "None", "True", "and", "as", "async", "await", "break", "class", "continue",
            "def", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
            "in", "is", "lambda", "not", "or", "pass", "raise", "return", "try", "while", "with",
            "yield",
        ],
        "javascript" | "js" | "typescript" | "ts" => &[
            "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
            "else", "export", "false", "finally", "for", "from", "function", "if", "import",
            "instanceof", "let", "new", "null", "return", "switch", "throw", "true", "try",
            "typeof", "undefined", "var", "while",
        ],
        "go" => &[
            "break", "case", "chan", "const", "continue", "defer", "else", "false", "for", "func",
            "go", "if", "import", "interface", "map", "nil", "package", "range", "return",
            "select", "struct", "switch", "true", "type", "var",
        ],
        "json" => &["true", "false", "null"],
        _ => &[],
    }
}

fn line_comment(lang: &str, trimmed: &str) -> bool {
    match lang {
        "python" | "py" | "sh" | "bash" | "yaml" | "toml" => trimmed.starts_with('#'),
        "rust" | "rs" | "go" | "javascript" | "js" | "typescript" | "ts" => {
            trimmed.starts_with("//")
        }
        _ => trimmed.starts_with("//") || trimmed.starts_with('#'),
    }
}

fn highlight_code_line(lang: &str, line: &str) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    if line_comment(lang, line.trim_start()) {
        spans.push(Span::styled(
            line.to_string(),
            Style::new().fg(Theme::CODE_COMMENT),
        ));
        return Line::from(spans);
    }

    let kw = keywords(lang);
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;
    let mut run = String::new();
    while i < chars.len() {
        let c = chars[i];
        if c == '"' || c == '\'' {
            push_code_text(&mut run, kw, &mut spans);
            let mut literal = String::from(c);
            i += 1;
            while i < chars.len() {
                literal.push(chars[i]);
                if chars[i] == c {
                    i += 1;
                    break;
                }
                i += 1;
            }
            spans.push(Span::styled(literal, Style::new().fg(Theme::CODE_STRING)));
            continue;
        }
        run.push(c);
        i += 1;
    }
    push_code_text(&mut run, kw, &mut spans);
    Line::from(spans)
}

/// Split a run of code into word tokens, coloring keywords and numbers.
fn push_code_text(run: &mut String, kw: &[&str], spans: &mut Vec<Span<'static>>) {
    if run.is_empty() {
        return;
    }
    let text = std::mem::take(run);
    let mut word = String::new();
    let mut other = String::new();

    let flush_word = |word: &mut String, other: &mut String, spans: &mut Vec<Span<'static>>| {
        if !other.is_empty() {
            spans.push(Span::styled(
                std::mem::take(other),
                Style::new().fg(Theme::CODE_TEXT),
            ));
        }
        if word.is_empty() {
            return;
        }
        let token = std::mem::take(word);
        let style = if kw.contains(&token.as_str()) {
            Style::new().fg(Theme::CODE_KEYWORD)
        } else if token.chars().all(|c| c.is_ascii_digit()) {
            Style::new().fg(Theme::CODE_NUMBER)
        } else {
            Style::new().fg(Theme::CODE_TEXT)
        };
        spans.push(Span::styled(token, style));
    };

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            if !other.is_empty() {
                spans.push(Span::styled(
                    std::mem::take(&mut other),
                    Style::new().fg(Theme::CODE_TEXT),
                ));
            }
            word.push(c);
        } else {
            if !word.is_empty() {
                flush_word(&mut word, &mut other, spans);
            }
            other.push(c);
        }
    }
    flush_word(&mut word, &mut other, spans);
}

#[cfg(test)]
mod tests {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn rendering_is_deterministic_and_idempotent() {
        let content = "# Title\n\nSome **bold** and `code`.\n\n- item\n\n```rust\nlet x = 1;\n```";
        let first = render_markdown(content);
        let second = render_markdown(content);
        assert_eq!(first, second);
    }

    #[test]
    fn headings_are_styled_without_hash_marks() {
        let lines = render_markdown("## Overview");
        assert_eq!(line_text(&lines[0]), "Overview");
        assert_eq!(lines[0].spans[0].style.fg, Some(Theme::MD_HEADING));
    }

    #[test]
    fn bullets_use_a_dot_marker() {
        let lines = render_markdown("- first\n* second\n+ third");
        assert!(line_text(&lines[0]).starts_with("• first"));
        assert!(line_text(&lines[1]).starts_with("• second"));
        assert!(line_text(&lines[2]).starts_with("• third"));
    }

    #[test]
    fn ordered_items_keep_their_numbers() {
        let lines = render_markdown("1. one\n2. two");
        assert!(line_text(&lines[0]).starts_with("1. one"));
        assert!(line_text(&lines[1]).starts_with("2. two"));
    }

    #[test]
    fn inline_code_and_links_get_their_own_spans() {
        let lines = render_markdown("see `retry` in [docs](https://example.com) now");
        let line = &lines[0];
        assert!(line
            .spans
            .iter()
            .any(|s| s.content == "retry" && s.style.fg == Some(Theme::MD_CODE)));
        assert!(line
            .spans
            .iter()
            .any(|s| s.content == "docs" && s.style.fg == Some(Theme::MD_LINK)));
        assert!(line.spans.iter().any(|s| s.content == " (https://example.com)"));
    }

    #[test]
    fn fenced_code_highlights_keywords() {
        let lines = render_markdown("```rust\nlet answer = 42;\n```");
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(line
            .spans
            .iter()
            .any(|s| s.content == "let" && s.style.fg == Some(Theme::CODE_KEYWORD)));
        assert!(line
            .spans
            .iter()
            .any(|s| s.content == "42" && s.style.fg == Some(Theme::CODE_NUMBER)));
    }

    #[test]
    fn code_strings_and_comments_are_colored() {
        let lines = render_markdown("```python\n# setup\nname = 'vid'\n```");
        assert!(lines[0]
            .spans
            .iter()
            .any(|s| s.style.fg == Some(Theme::CODE_COMMENT)));
        assert!(lines[1]
            .spans
            .iter()
            .any(|s| s.content == "'vid'" && s.style.fg == Some(Theme::CODE_STRING)));
    }

    #[test]
    fn unterminated_fence_still_renders() {
        let lines = render_markdown("```rust\nlet x = 1;");
        assert_eq!(lines.len(), 1);
        assert!(line_text(&lines[0]).contains("let x = 1;"));
    }

    #[test]
    fn table_columns_are_padded_to_equal_width() {
        let lines = render_markdown("| name | value |\n| --- | --- |\n| a | long-value |\n| bbbb | c |");
        // header + rule + 2 rows
        assert_eq!(lines.len(), 4);
        let row_a = line_text(&lines[2]);
        let row_b = line_text(&lines[3]);
        assert_eq!(row_a.width(), row_b.width());
        assert!(row_a.contains('│'));
    }

    #[test]
    fn blockquotes_are_marked_and_italic() {
        let lines = render_markdown("> quoted words");
        let line = &lines[0];
        assert_eq!(line.spans[0].content, "▌ ");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn unmatched_markers_fall_back_to_plain_text() {
        let lines = render_markdown("a * lone asterisk and `tick");
        assert_eq!(line_text(&lines[0]), "a * lone asterisk and `tick");
    }
}
