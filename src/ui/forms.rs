// Login and registration forms.

use ratatui::{prelude::*, widgets::*};

use crate::state::{Form, LoginController, RegisterController};

const FORM_WIDTH: u16 = 50;

pub fn draw_login(frame: &mut Frame, login: &LoginController, area: Rect) {
    let status = if let Some(error) = login.error() {
        Some(Span::styled(error.to_string(), Style::default().fg(Color::Red)))
    } else {
        login
            .notice()
            .map(|notice| Span::styled(notice.to_string(), Style::default().fg(Color::Green)))
    };
    let submit = if login.is_loading() {
        "Logging in..."
    } else {
        "Login"
    };

    draw_form(
        frame,
        area,
        " Login ",
        &login.form,
        status,
        submit,
        "No account? Ctrl-R to register",
    );
}

pub fn draw_register(frame: &mut Frame, register: &RegisterController, area: Rect) {
    let status = register
        .error()
        .map(|error| Span::styled(error.to_string(), Style::default().fg(Color::Red)));
    let submit = if register.is_loading() {
        "Registering..."
    } else {
        "Register"
    };

    draw_form(
        frame,
        area,
        " Register ",
        &register.form,
        status,
        submit,
        "Have an account? Ctrl-L to log in",
    );
}

/// Render a centered box with one line per field, a status line and a submit hint.
pub fn draw_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &Form,
    status: Option<Span>,
    submit: &str,
    footer: &str,
) {
    let height = form.fields().len() as u16 + 6;
    let width = FORM_WIDTH.min(area.width);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let form_area = Rect::new(x, y, width, height.min(area.height));

    let mut lines: Vec<Line> = form
        .fields()
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(field.label, &field.display(), i == form.focus()))
        .collect();

    lines.push(Line::from(""));
    lines.push(status.map(Line::from).unwrap_or_default());
    lines.push(Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(format!(" = {}", submit), Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(Span::styled(
        footer.to_string(),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title.to_string());

    frame.render_widget(Clear, form_area);
    frame.render_widget(Paragraph::new(lines).block(block), form_area);
}

/// One `Label: value` row; the focused row gets a cursor.
pub fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut spans = vec![
        Span::styled(format!("{}: ", label), label_style),
        Span::raw(value.to_string()),
    ];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn rendered(draw: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 14)).unwrap();
        terminal.draw(draw).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_login_masks_password() {
        let mut login = LoginController::new();
        login.form.input('a');
        login.form.focus_next();
        for c in "secret".chars() {
            login.form.input(c);
        }

        let text = rendered(|frame| {
            let area = frame.area();
            draw_login(frame, &login, area)
        });
        assert!(text.contains("Email: a"));
        assert!(text.contains("••••••"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_login_shows_notice() {
        let login = LoginController::with_notice("Registered Successfully");
        let text = rendered(|frame| {
            let area = frame.area();
            draw_login(frame, &login, area)
        });
        assert!(text.contains("Registered Successfully"));
    }

    #[test]
    fn test_register_shows_validation_error() {
        let mut register = RegisterController::new();
        assert!(register.begin().is_none());

        let text = rendered(|frame| {
            let area = frame.area();
            draw_register(frame, &register, area)
        });
        assert!(text.contains(register.error().unwrap()));
        assert!(text.contains("Confirm"));
    }
}
