use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::api::User;
use crate::app::AppState;
use crate::app::state::SortField;
use crate::view::{PAGE_WINDOW, UsersView, derive_view, page_window};

/// Table columns and the sort selector behind each header.
const COLUMNS: [(&str, SortField); 6] = [
    ("ID", SortField::Id),
    ("Name", SortField::Name),
    ("Username", SortField::Username),
    ("Email", SortField::Email),
    ("Phone", SortField::Phone),
    ("Company", SortField::Company),
];

pub fn render_data_page(f: &mut Frame, area: Rect, app: &AppState) {
    let users = &app.users;
    let has_error = users.error().is_some();

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(if has_error { 3 } else { 0 }),
                Constraint::Min(5),
            ]
            .as_ref(),
        )
        .split(area);

    if let Some(message) = users.error() {
        render_error_banner(f, sections[0], app, message);
    }

    let body = sections[1];
    if users.users().is_empty() {
        if users.loading() {
            render_centered_note(f, body, app, "Loading user data...");
        } else if !has_error {
            render_centered_note(
                f,
                body,
                app,
                "No Data Available\nPlease make sure that data is available! (r: fetch)",
            );
        }
        return;
    }

    let view = derive_view(users);
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(if view.total_pages > 1 { 1 } else { 0 }),
                Constraint::Length(8),
            ]
            .as_ref(),
        )
        .split(body);

    render_results_info(f, parts[0], app, &view);
    render_users_table(f, parts[1], app, &view);
    if view.total_pages > 1 {
        render_pagination(f, parts[2], app, &view);
    }
    render_user_details(f, parts[3], app, view.visible.get(app.selected_row).copied());
}

fn render_error_banner(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let p = Paragraph::new(format!("{message}   (r: retry, x: dismiss)"))
        .style(Style::default().fg(app.theme.error_fg))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Error")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.error_fg)),
        );
    f.render_widget(p, area);
}

fn render_centered_note(f: &mut Frame, area: Rect, app: &AppState, text: &str) {
    let inner_pad = area.height.saturating_sub(4) / 2;
    let mut body = "\n".repeat(inner_pad as usize);
    body.push_str(text);
    let p = Paragraph::new(body)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

/// "Showing X to Y of Z results", plus the unfiltered total while searching.
pub fn results_summary(view: &UsersView<'_>, search_term: &str) -> String {
    let mut text = format!(
        "Showing {} to {} of {} results",
        view.first_shown(),
        view.last_shown(),
        view.result_count
    );
    if !search_term.is_empty() {
        text.push_str(&format!(" (filtered from {} total)", view.total_count));
    }
    text
}

fn render_results_info(f: &mut Frame, area: Rect, app: &AppState, view: &UsersView<'_>) {
    let users = &app.users;
    let sort = match users.sort_field() {
        Some(field) => format!("  sort: {} {}", field.label(), users.sort_order().arrow()),
        None => String::new(),
    };
    let search = if users.search_term().is_empty() {
        String::new()
    } else {
        format!("  search: \"{}\"", users.search_term())
    };
    let line = Line::from(vec![
        Span::raw(results_summary(view, users.search_term())),
        Span::styled(
            format!("  show: {}{sort}{search}", users.items_per_page()),
            Style::default().fg(app.theme.muted),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn header_label(app: &AppState, label: &str, field: SortField) -> String {
    match app.users.sort_field() {
        Some(active) if active == field => format!("{label} {}", app.users.sort_order().arrow()),
        _ => label.to_string(),
    }
}

fn render_users_table(f: &mut Frame, area: Rect, app: &AppState, view: &UsersView<'_>) {
    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(20),
        Constraint::Percentage(14),
        Constraint::Percentage(24),
        Constraint::Percentage(20),
        Constraint::Percentage(22),
    ];
    let header = Row::new(
        COLUMNS
            .iter()
            .map(|(label, field)| Cell::from(header_label(app, label, *field)))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if view.visible.is_empty() {
        let p = Paragraph::new("No users found matching your search criteria")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let rows = view.visible.iter().enumerate().map(|(i, u)| {
        let style = if i == app.selected_row {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.username.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.phone.clone()),
            Cell::from(u.company.name.clone()),
        ])
        .style(style)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_pagination(f: &mut Frame, area: Rect, app: &AppState, view: &UsersView<'_>) {
    let enabled = Style::default().fg(app.theme.text);
    let disabled = Style::default().fg(app.theme.muted);
    let mut spans = vec![Span::styled(
        "◀ Previous ",
        if view.is_first_page() { disabled } else { enabled },
    )];
    for page in page_window(view.current_page, view.total_pages, PAGE_WINDOW) {
        if page as i64 == view.current_page {
            spans.push(Span::styled(
                format!("[{page}]"),
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(format!(" {page} "), enabled));
        }
    }
    spans.push(Span::styled(
        " Next ▶",
        if view.is_last_page() { disabled } else { enabled },
    ));
    spans.push(Span::styled(
        format!("   page {} of {}", view.current_page, view.total_pages),
        disabled,
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_user_details(f: &mut Frame, area: Rect, app: &AppState, user: Option<&User>) {
    let text = match user {
        Some(u) => format!(
            "Name: {}  ({})\nEmail: {}   Phone: {}\nWebsite: {}\nAddress: {}, {}, {} {}\nCompany: {}\n  \"{}\" / {}",
            u.name,
            u.username,
            u.email,
            u.phone,
            u.website,
            u.address.street,
            u.address.suite,
            u.address.city,
            u.address.zipcode,
            u.company.name,
            u.company.catch_phrase,
            u.company.bs,
        ),
        None => String::new(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
