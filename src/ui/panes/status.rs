//! Status bar: run state and history position on the left, key hints on the right

use crate::interpreter::engine::Interpreter;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Key, description
const KEY_HINTS: &[(&str, &str)] = &[
    ("←/→", "step"),
    ("1-9", "step n"),
    ("⎵", "play"),
    ("↵/⌫", "end/start"),
    ("Tab", "focus"),
    ("q", "quit"),
];

/// Label and colour of the badge summarising where the run stands
fn run_badge(interpreter: &Interpreter, is_playing: bool) -> Option<(&'static str, Color)> {
    if interpreter.error().is_some() {
        Some((" ✗ FAILED ", DEFAULT_THEME.error))
    } else if is_playing {
        Some((" ▶ PLAYING ", DEFAULT_THEME.secondary))
    } else if interpreter.is_finished() {
        Some((" DONE ", DEFAULT_THEME.success))
    } else if !interpreter.is_latest() {
        Some((" HISTORY ", DEFAULT_THEME.keyword))
    } else {
        None
    }
}

/// Render the status bar at the bottom
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    interpreter: &Interpreter,
    message: &str,
    is_playing: bool,
) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let bar = Style::default().bg(DEFAULT_THEME.current_line_bg);
    let is_error = interpreter.error().is_some();

    let position = format!(
        " {}/{} ",
        interpreter.history_position(),
        interpreter.total_snapshots().saturating_sub(1)
    );
    let left = vec![
        Span::styled(
            position,
            Style::default()
                .bg(if is_error {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} ", message),
            bar.fg(if is_error {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            }),
        ),
    ];
    frame.render_widget(
        Paragraph::new(Line::from(left))
            .style(bar)
            .alignment(Alignment::Left),
        halves[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let mut right: Vec<Span> = Vec::with_capacity(KEY_HINTS.len() * 2 + 2);
    for (key, desc) in KEY_HINTS {
        right.push(Span::styled(format!(" {} ", key), key_style));
        right.push(Span::styled(format!(" {} ", desc), bar.fg(DEFAULT_THEME.fg)));
    }
    if let Some((label, color)) = run_badge(interpreter, is_playing) {
        right.push(Span::styled(
            label,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(right))
            .style(bar)
            .alignment(Alignment::Right),
        halves[1],
    );
}
