//! Syntax coloring for the editor view.
//!
//! Highlighting is stateful across lines (block comments, strings), so each
//! call parses a bounded context above the visible window and only keeps
//! the window itself. Constructs opened further up than the context are
//! not seen; that trade keeps a redraw cheap at the end of a large file.

use std::sync::LazyLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";

/// Lines parsed above the window for multi-line constructs.
const CONTEXT_LINES: usize = 200;

/// Upper bound on text handed to syntect per call.
const MAX_PARSE_BYTES: usize = 256 * 1024;

/// First line to parse for the window `start..end`, or `None` when even the
/// window alone is over the byte cap.
fn parse_origin(lines: &[String], start: usize, end: usize) -> Option<usize> {
    let window: usize = lines[start..end].iter().map(|l| l.len() + 1).sum();
    if window > MAX_PARSE_BYTES {
        return None;
    }
    let mut origin = start;
    let mut budget = MAX_PARSE_BYTES - window;
    let floor = start.saturating_sub(CONTEXT_LINES);
    while origin > floor {
        let cost = lines[origin - 1].len() + 1;
        if cost > budget {
            break;
        }
        budget -= cost;
        origin -= 1;
    }
    Some(origin)
}

fn syntax_for(language: &str) -> Option<&'static SyntaxReference> {
    SYNTAX_SET
        .find_syntax_by_token(language)
        .filter(|s| s.name != "Plain Text")
}

/// Colored spans for `lines[start..start + count]`. Unknown languages (and
/// "text") come back as unstyled lines.
pub fn highlight_window(lines: &[String], start: usize, count: usize, language: &str) -> Vec<Line<'static>> {
    let end = (start + count).min(lines.len());
    if start >= end {
        return Vec::new();
    }

    let plain = || -> Vec<Line<'static>> {
        lines[start..end].iter().map(|l| Line::from(l.clone())).collect()
    };
    let (Some(syntax), Some(theme)) = (syntax_for(language), THEME_SET.themes.get(THEME)) else {
        return plain();
    };
    let Some(origin) = parse_origin(lines, start, end) else {
        log::debug!("Window {}..{} too large to highlight", start, end);
        return plain();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut out = Vec::with_capacity(end - start);
    for (index, line) in lines.iter().enumerate().take(end).skip(origin) {
        // The newline-aware syntax set expects each line to end in '\n'
        let with_newline = format!("{line}\n");
        let ranges = match highlighter.highlight_line(&with_newline, &SYNTAX_SET) {
            Ok(ranges) => ranges,
            Err(e) => {
                log::debug!("Highlighting stopped at line {}: {}", index + 1, e);
                out.extend(lines[index.max(start)..end].iter().map(|l| Line::from(l.clone())));
                return out;
            }
        };
        if index < start {
            continue;
        }
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(style, fragment)| {
                let content = fragment.trim_end_matches('\n');
                if content.is_empty() {
                    return None;
                }
                let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                Some(Span::styled(content.to_string(), Style::default().fg(fg)))
            })
            .collect();
        out.push(Line::from(spans));
    }
    out
}

/// Drop the first `skip` chars of a line and expand tabs, keeping styles.
pub fn shift_line(line: Line<'static>, skip: usize, tab_width: usize) -> Line<'static> {
    let mut remaining = skip;
    let mut spans = Vec::with_capacity(line.spans.len());
    for span in line.spans {
        let count = span.content.chars().count();
        if remaining >= count {
            remaining -= count;
            continue;
        }
        let visible: String = span.content.chars().skip(remaining).collect();
        remaining = 0;
        let visible = if visible.contains('\t') {
            visible.replace('\t', &" ".repeat(tab_width))
        } else {
            visible
        };
        spans.push(Span::styled(visible, span.style));
    }
    Line::from(spans)
}
