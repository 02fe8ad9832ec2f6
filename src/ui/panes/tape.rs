//! Tape pane rendering
//!
//! Cells are laid out in rows as wide as the pane allows, each row prefixed
//! with the index of its first cell. The cell under the data pointer is
//! highlighted, and non-zero cells stand out from the zero background.

use crate::interpreter::constants::TAPE_SIZE;
use crate::interpreter::machine::Machine;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width of the row label, e.g. `" 2990 "`
const LABEL_WIDTH: usize = 6;

/// Width of one cell, e.g. `" 255"`
const CELL_WIDTH: usize = 4;

/// How many cells fit in one row of a pane `content_width` columns wide
pub fn cells_per_row(content_width: usize) -> usize {
    (content_width.saturating_sub(LABEL_WIDTH) / CELL_WIDTH).max(1)
}

/// Render the tape pane.
///
/// With `follow_pointer` set, `scroll_offset` (in rows) is adjusted so the
/// pointer's row is visible.
pub fn render_tape_pane(
    frame: &mut Frame,
    area: Rect,
    machine: &Machine,
    is_error: bool,
    is_focused: bool,
    follow_pointer: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let pointer = machine.pointer();
    let title = format!(
        " Tape  ptr {} = {}  depth {} ",
        pointer,
        machine.current_cell(),
        machine.depth()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let content_width = area.width.saturating_sub(2) as usize; // borders
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let per_row = cells_per_row(content_width);
    let total_rows = TAPE_SIZE.div_ceil(per_row);

    let pointer_row = pointer / per_row;
    if follow_pointer {
        if pointer_row < *scroll_offset {
            *scroll_offset = pointer_row;
        } else if pointer_row >= *scroll_offset + visible_height {
            *scroll_offset = pointer_row + 1 - visible_height;
        }
    }
    *scroll_offset = (*scroll_offset).min(total_rows.saturating_sub(visible_height));

    let pointer_style = Style::default()
        .bg(if is_error {
            DEFAULT_THEME.error
        } else {
            DEFAULT_THEME.type_name
        })
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);

    let cells = machine.tape();
    let lines: Vec<Line> = (*scroll_offset..total_rows)
        .take(visible_height)
        .map(|row| {
            let start = row * per_row;
            let end = (start + per_row).min(cells.len());

            let mut spans = vec![Span::styled(
                format!("{:5} ", start),
                Style::default().fg(DEFAULT_THEME.comment),
            )];
            for (offset, value) in cells[start..end].iter().enumerate() {
                let style = if start + offset == pointer {
                    pointer_style
                } else if *value != 0 {
                    Style::default().fg(DEFAULT_THEME.fg)
                } else {
                    Style::default().fg(DEFAULT_THEME.border_normal)
                };
                spans.push(Span::styled(format!("{:>4}", value), style));
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
