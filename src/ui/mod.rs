pub mod components;
pub mod home;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState, Page};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let tabs = match app.page {
        Page::Home => "[Home]  Data",
        Page::Data => "Home  [Data]",
    };
    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}_", app.users.search_term()),
        InputMode::Normal | InputMode::Modal => String::new(),
    };
    let p = Paragraph::new(format!(
        "{tabs}{prompt}  | Tab: switch page; /: search; ?: help; K: keys; q: quit"
    ))
    .block(
        Block::default()
            .title("user-dashboard")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, root[0]);

    let body = if app.show_keybinds {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)].as_ref())
            .split(root[1]);
        components::render_keybinds_panel(f, cols[1], app);
        cols[0]
    } else {
        root[1]
    };

    match app.page {
        Page::Home => home::render_home(f, body, app),
        Page::Data => users::render_data_page(f, body, app),
    }

    components::render_status_bar(f, root[2], app);

    match &app.modal {
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, f.area(), app, *scroll),
        Some(ModalState::PageSize { selected }) => {
            components::render_page_size_modal(f, f.area(), app, *selected)
        }
        None => {}
    }
}
