// Modal UI components.
// The edit dialog drawn over the workouts table.

use ratatui::{prelude::*, widgets::*};

use super::forms::field_line;
use crate::state::EditDraft;

/// Draw the edit-workout modal on top of the current view.
pub fn draw_edit_modal(frame: &mut Frame, edit: &EditDraft, saving: bool) {
    let area = frame.area();

    // Create centered modal
    let modal_width = 56.min(area.width);
    let modal_height = 7.min(area.height);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Fields
            Constraint::Length(1), // Instructions
        ])
        .split(modal_area);

    let lines: Vec<Line> = edit
        .form
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field.label, &field.value, i == edit.form.focus()))
        .collect();

    let title = if saving {
        " Saving... ".to_string()
    } else {
        format!(" Edit Workout {} ", edit.id)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let instructions = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" = Save  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::styled(" = Next field  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" = Cancel ", Style::default().fg(Color::DarkGray)),
    ]);

    let instructions_widget = Paragraph::new(instructions)
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(instructions_widget, chunks[1]);
}
