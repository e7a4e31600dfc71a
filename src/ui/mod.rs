// UI module for rendering the TUI.
// Navbar on top, the current screen in the middle, key hints at the bottom.

mod forms;
mod modal;
mod navbar;
mod workouts;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Screen};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navbar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    navbar::draw_navbar(frame, app, chunks[0]);

    match &mut app.screen {
        Screen::Login(login) => forms::draw_login(frame, login, chunks[1]),
        Screen::Register(register) => forms::draw_register(frame, register, chunks[1]),
        Screen::Workouts(view) => workouts::draw_workouts(frame, view, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);

    // Edit modal (rendered last, on top of everything)
    if let Screen::Workouts(view) = &app.screen {
        if let Some(edit) = &view.edit {
            modal::draw_edit_modal(frame, edit, view.is_in_flight());
        }
    }
}

fn hint(key: &'static str, action: &'static str) -> [Span<'static>; 2] {
    [
        Span::raw(format!(" {} ", key)),
        Span::styled(format!("{} ", action), Style::default().fg(Color::DarkGray)),
    ]
}

/// Draw the status bar with keybinding hints for the current screen.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let pairs: &[(&'static str, &'static str)] = match &app.screen {
        Screen::Login(_) => &[
            ("Tab", "Next field"),
            ("↵", "Login"),
            ("^R", "Register"),
            ("^C", "Quit"),
        ],
        Screen::Register(_) => &[
            ("Tab", "Next field"),
            ("↵", "Register"),
            ("^L", "Login"),
            ("^C", "Quit"),
        ],
        Screen::Workouts(view) if view.edit.is_some() => {
            &[("Tab", "Next field"), ("↵", "Save"), ("Esc", "Cancel")]
        }
        Screen::Workouts(view) if view.focus == crate::state::WorkoutsFocus::AddForm => {
            &[("Tab", "Next field"), ("↵", "Add"), ("Esc", "Back")]
        }
        Screen::Workouts(_) => &[
            ("↑↓", "Navigate"),
            ("a", "Add"),
            ("e", "Edit"),
            ("d", "Done"),
            ("x", "Delete"),
            ("r", "Refresh"),
            ("o", "Logout"),
            ("q", "Quit"),
        ],
    };

    let spans: Vec<Span> = pairs
        .iter()
        .flat_map(|&(key, action)| hint(key, action))
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
