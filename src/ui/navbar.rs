// Navigation bar.
// Shows the app name, the reachable views and who is signed in.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Screen};
use crate::state::Route;

/// Draw the navigation bar at the top of the screen.
pub fn draw_navbar(frame: &mut Frame, app: &App, area: Rect) {
    let authenticated = app.session.is_authenticated();
    let items = if authenticated {
        [Route::Workouts.title(), "Logout (o)"]
    } else {
        [Route::Login.title(), Route::Register.title()]
    };

    let selected_index = match app.route() {
        Route::Login | Route::Workouts => 0,
        Route::Register => 1,
    };

    let titles: Vec<Line> = items
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let style = if i == selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(*title, style))
        })
        .collect();

    let mut block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" fitlog ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    if let Screen::Workouts(workouts) = &app.screen {
        block = block.title(
            Line::from(Span::styled(
                format!(" Welcome, {} ", workouts.display_name()),
                Style::default().fg(Color::Green),
            ))
            .right_aligned(),
        );
    }

    let tabs_widget = Tabs::new(titles)
        .block(block)
        .select(selected_index)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
