// Workouts view: the add form above the table of the user's workouts.
// Handles loading, error and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use super::forms::field_line;
use crate::api::Workout;
use crate::state::{WorkoutsController, WorkoutsFocus, WorkoutsPhase};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("{}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(error.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Draw the whole workouts view.
pub fn draw_workouts(frame: &mut Frame, view: &mut WorkoutsController, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Add form
            Constraint::Length(1), // Error line
            Constraint::Min(1),    // Table
        ])
        .split(area);

    draw_add_form(frame, view, chunks[0]);

    if let Some(error) = view.error() {
        render_error(frame, chunks[1], error);
    } else if let Some(notice) = view.notice() {
        let text = Paragraph::new(notice.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        frame.render_widget(text, chunks[1]);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" My Workouts ({}) ", view.workouts().len()));
    let inner = block.inner(chunks[2]);
    frame.render_widget(block, chunks[2]);

    if view.workouts().is_empty() {
        match view.phase() {
            WorkoutsPhase::Loading => render_loading(frame, inner, "Loading workouts"),
            WorkoutsPhase::Unauthenticated => {}
            _ => render_empty(frame, inner, "No workouts found. Start adding some!"),
        }
        return;
    }

    render_table(frame, view, inner);
}

fn draw_add_form(frame: &mut Frame, view: &WorkoutsController, area: Rect) {
    let focused = view.focus == WorkoutsFocus::AddForm && view.edit.is_none();
    let form = &view.new_workout;

    let mut lines: Vec<Line> = form
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field.label, &field.value, focused && i == form.focus()))
        .collect();

    if !focused {
        lines.push(Line::from(Span::styled(
            "Press a to add a workout",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let title = if focused && view.is_in_flight() {
        " Adding... "
    } else {
        " Add New Workout "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn status_cell(workout: &Workout) -> Cell<'static> {
    if workout.completed {
        Cell::from(Span::styled("Done", Style::default().fg(Color::Green)))
    } else {
        Cell::from(Span::styled(
            "[ Mark as Done ]",
            Style::default().fg(Color::Yellow),
        ))
    }
}

fn render_table(frame: &mut Frame, view: &mut WorkoutsController, area: Rect) {
    let header = Row::new(["#", "Name", "Duration", "Added", "Status", "Actions"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = view
        .workouts()
        .iter()
        .enumerate()
        .map(|(i, workout)| {
            let added = workout
                .added_at
                .as_ref()
                .map(format_relative_time)
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(workout.name.clone()),
                Cell::from(workout.duration.clone()),
                Cell::from(Span::styled(added, Style::default().fg(Color::DarkGray))),
                status_cell(workout),
                Cell::from(Span::styled(
                    "e Edit  x Delete",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(12),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(17),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut view.table_state);
}
