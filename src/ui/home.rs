//! Landing page.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::AppState;

const FEATURES: [(&str, &str); 4] = [
    (
        "User Management",
        "View user data with search across name, email, username and company",
    ),
    (
        "Data Tables",
        "Sortable columns, adjustable page size and pagination",
    ),
    (
        "API Integration",
        "Records are fetched from a public REST endpoint on demand",
    ),
    (
        "Keyboard Driven",
        "Every action has a configurable key binding (keybinds.conf)",
    ),
];

pub fn render_home(f: &mut Frame, area: Rect, app: &AppState) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Welcome to the User Dashboard",
            bold.fg(app.theme.title),
        )),
        Line::raw("A dashboard to view the user list fetched from a public API."),
        Line::raw(""),
        Line::from(Span::styled("Features", bold)),
    ];
    for (title, description) in FEATURES {
        lines.push(Line::from(vec![
            Span::styled(format!("  {title}: "), bold),
            Span::raw(description),
        ]));
    }

    let loaded = if app.users.users().is_empty() {
        "not loaded yet".to_string()
    } else {
        app.users.users().len().to_string()
    };
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Stats", bold)));
    for (label, value) in [
        ("Total users", loaded),
        ("API endpoints", "1".to_string()),
        ("Source", app.api_url.clone()),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label}: ")),
            Span::styled(value, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to view the user list",
        Style::default().fg(app.theme.highlight_fg),
    )));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Home")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
