//! Source pane rendering with command highlighting
//!
//! Commands are colored by kind and comments are dimmed. The line holding the
//! next command gets the current-line background, and the command itself is
//! drawn inverted so the reader can follow single steps inside a line.

use crate::parser::ast::SourceLocation;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn command_style(c: char) -> Style {
    match c {
        '[' | ']' => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        '+' | '-' => Style::default().fg(DEFAULT_THEME.number),
        '<' | '>' => Style::default().fg(DEFAULT_THEME.function),
        '.' | ',' => Style::default().fg(DEFAULT_THEME.string),
        _ => Style::default().fg(DEFAULT_THEME.comment), // Comments
    }
}

/// Highlight one source line; `marker` is the 1-based column to invert
fn highlight_source_line(line: &str, marker: Option<usize>, marker_style: Style) -> Line<'_> {
    let spans: Vec<Span> = line
        .chars()
        .enumerate()
        .map(|(idx, c)| {
            let style = if marker == Some(idx + 1) {
                marker_style
            } else {
                command_style(c)
            };
            Span::styled(c.to_string(), style)
        })
        .collect();

    Line::from(spans)
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

impl SourceScrollState {
    pub fn new() -> Self {
        SourceScrollState {
            offset: 0,
            target_line_row: None, // Will be set to center on first render
        }
    }
}

impl Default for SourceScrollState {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current: Option<SourceLocation>,
    is_error: bool,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let current_line = current.map_or(0, |loc| loc.line);

    // Calculate visible range
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    // Get the target row, centering it on first render and clamping to stay within visible area
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Calculate scroll offset to keep current line at target visual row
    if current_line > 0 && current_line <= total_lines {
        let target_line_idx = current_line - 1; // Convert to 0-based
        scroll_state.offset = target_line_idx.saturating_sub(target_row);
    }

    // Clamp scroll offset to valid range
    if total_lines > visible_height {
        let max_scroll = total_lines - visible_height;
        scroll_state.offset = scroll_state.offset.min(max_scroll);
    } else {
        scroll_state.offset = 0;
    }

    let marker_style = if is_error {
        Style::default()
            .bg(DEFAULT_THEME.error)
            .fg(Color::White) // White text on red for visibility
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(DEFAULT_THEME.secondary)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    };

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;
            let line_num_str = format!("{:4} ", line_num);

            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment) // Line numbers
            };

            let marker = current.filter(|_| is_current).map(|loc| loc.column);
            let mut content_line = highlight_source_line(line, marker, marker_style);

            if is_current {
                // For current line, just apply background to everything but the marker
                for (col, span) in content_line.spans.iter_mut().enumerate() {
                    if marker != Some(col + 1) {
                        span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                    }
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
