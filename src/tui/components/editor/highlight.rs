//! Syntax highlighting for the editor via syntect.
//!
//! Highlighting is stateful across lines (strings, block comments), so the
//! whole buffer is highlighted at once and cached by the editor until the
//! next edit.

use std::sync::LazyLock;

use log::warn;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::lines::{TAB_WIDTH, line_count};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const FALLBACK_THEME: &str = "base16-ocean.dark";

fn theme(name: &str) -> &'static Theme {
    THEME_SET.themes.get(name).unwrap_or_else(|| {
        warn!("Unknown theme '{}', using {}", name, FALLBACK_THEME);
        &THEME_SET.themes[FALLBACK_THEME]
    })
}

/// Highlights `source` as `language`. Returns exactly one `Line` per editor
/// line; unknown languages come back as plain text.
pub(super) fn highlight(source: &str, language: &str, theme_name: &str) -> Vec<Line<'static>> {
    let tab = " ".repeat(TAB_WIDTH);
    let mut lines: Vec<Line<'static>> = match SYNTAX_SET.find_syntax_by_token(language) {
        Some(syntax) => {
            let mut hl = HighlightLines::new(syntax, theme(theme_name));
            LinesWithEndings::from(source)
                .map(|line| match hl.highlight_line(line, &SYNTAX_SET) {
                    Ok(ranges) => Line::from(
                        ranges
                            .into_iter()
                            .filter_map(|(style, frag)| {
                                let content = frag.trim_end_matches('\n').replace('\t', &tab);
                                if content.is_empty() {
                                    return None;
                                }
                                let fg = Color::Rgb(
                                    style.foreground.r,
                                    style.foreground.g,
                                    style.foreground.b,
                                );
                                Some(Span::styled(content, Style::default().fg(fg)))
                            })
                            .collect::<Vec<_>>(),
                    ),
                    Err(_) => plain(line, &tab),
                })
                .collect()
        }
        None => source.split('\n').map(|line| plain(line, &tab)).collect(),
    };

    // LinesWithEndings has no entry for the empty line after a trailing newline
    lines.resize_with(line_count(source), Line::default);
    lines
}

fn plain(line: &str, tab: &str) -> Line<'static> {
    Line::from(line.trim_end_matches('\n').replace('\t', tab))
}
