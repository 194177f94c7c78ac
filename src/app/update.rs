use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::fetch::FetchDispatcher;
use crate::app::keymap::KeyAction;
use crate::app::state::ITEMS_PER_PAGE_OPTIONS;
use crate::app::{AppState, InputMode, ModalState, Page};
use crate::ui;
use crate::view::{derive_view, total_pages};

/// Side effects requested by key handling, carried out by the event loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Fetch,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    fetcher: &mut FetchDispatcher,
) -> Result<()> {
    if let Some(Command::Fetch) = enter_page(app, app.page) {
        fetcher.start(&mut app.users);
    }

    loop {
        if fetcher.drain(&mut app.users) > 0 {
            clamp_selection(app);
        }

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(app, key) {
                        Some(Command::Quit) => break,
                        Some(Command::Fetch) => {
                            fetcher.start(&mut app.users);
                        }
                        None => {}
                    }
                }
            }
        }
    }

    tracing::info!(
        uptime_secs = app.started_at.elapsed().as_secs(),
        pending_fetches = fetcher.in_flight(),
        "leaving event loop"
    );
    Ok(())
}

/// Switch to `page`. Opening the data page with nothing loaded asks for a fetch.
pub fn enter_page(app: &mut AppState, page: Page) -> Option<Command> {
    app.page = page;
    app.selected_row = 0;
    if page == Page::Data && app.users.users().is_empty() && !app.users.loading() {
        Some(Command::Fetch)
    } else {
        None
    }
}

/// Route one key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Option<Command> {
    match app.input_mode {
        InputMode::Modal => {
            handle_modal_key(app, key.code);
            None
        }
        InputMode::Search => {
            handle_search_key(app, key);
            None
        }
        InputMode::Normal => {
            let action = app.keymap.resolve(&key)?;
            handle_action(app, action)
        }
    }
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.users.set_search_term("");
            app.selected_row = 0;
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            let mut term = app.users.search_term().to_string();
            if term.pop().is_some() {
                app.users.set_search_term(term);
                app.selected_row = 0;
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut term = app.users.search_term().to_string();
            term.push(c);
            app.users.set_search_term(term);
            app.selected_row = 0;
        }
        _ => {}
    }
}

pub fn handle_action(app: &mut AppState, action: KeyAction) -> Option<Command> {
    match action {
        KeyAction::Quit => return Some(Command::Quit),
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => open_modal(app, ModalState::Help { scroll: 0 }),
        KeyAction::ToggleKeybindsPane => app.show_keybinds = !app.show_keybinds,
        KeyAction::SwitchPage => {
            let next = match app.page {
                Page::Home => Page::Data,
                Page::Data => Page::Home,
            };
            return enter_page(app, next);
        }
        KeyAction::EnterAction => {
            if app.page == Page::Home {
                return enter_page(app, Page::Data);
            }
        }
        _ if app.page != Page::Data => {}
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::MoveUp => app.selected_row = app.selected_row.saturating_sub(1),
        KeyAction::MoveDown => {
            let visible = derive_view(&app.users).visible.len();
            if app.selected_row + 1 < visible {
                app.selected_row += 1;
            }
        }
        KeyAction::PrevPage => {
            let page = app.users.current_page();
            let last = last_page(app);
            if page > last && last > 0 {
                go_to_page(app, last);
            } else if page > 1 {
                go_to_page(app, page - 1);
            }
        }
        KeyAction::NextPage => {
            let page = app.users.current_page();
            if page < last_page(app) {
                go_to_page(app, page + 1);
            }
        }
        KeyAction::FirstPage => {
            if last_page(app) > 0 {
                go_to_page(app, 1);
            }
        }
        KeyAction::LastPage => {
            let last = last_page(app);
            if last > 0 {
                go_to_page(app, last);
            }
        }
        KeyAction::SortBy(field) => app.users.set_sort_field(Some(field)),
        KeyAction::ClearSort => {
            if app.users.sort_field().is_some() {
                app.users.set_sort_field(None);
            }
        }
        KeyAction::OpenPageSizeMenu => {
            let selected = ITEMS_PER_PAGE_OPTIONS
                .iter()
                .position(|n| *n == app.users.items_per_page())
                .unwrap_or(0);
            open_modal(app, ModalState::PageSize { selected });
        }
        KeyAction::Retry => return Some(Command::Fetch),
        KeyAction::DismissError => app.users.clear_error(),
    }
    None
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    let Some(modal) = app.modal.clone() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match modal {
        ModalState::Help { scroll } => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                close_modal(app)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.modal = Some(ModalState::Help {
                    scroll: scroll.saturating_sub(1),
                })
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.modal = Some(ModalState::Help {
                    scroll: scroll.saturating_add(1),
                })
            }
            _ => {}
        },
        ModalState::PageSize { selected } => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Up | KeyCode::Char('k') => {
                app.modal = Some(ModalState::PageSize {
                    selected: selected.saturating_sub(1),
                })
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = ITEMS_PER_PAGE_OPTIONS.len() - 1;
                app.modal = Some(ModalState::PageSize {
                    selected: (selected + 1).min(last),
                })
            }
            KeyCode::Enter => {
                if let Some(&n) = ITEMS_PER_PAGE_OPTIONS.get(selected) {
                    app.users.set_items_per_page(n);
                    app.selected_row = 0;
                }
                close_modal(app);
            }
            _ => {}
        },
    }
}

fn open_modal(app: &mut AppState, modal: ModalState) {
    app.modal = Some(modal);
    app.input_mode = InputMode::Modal;
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

fn last_page(app: &AppState) -> i64 {
    let count = derive_view(&app.users).result_count;
    total_pages(count, app.users.items_per_page()) as i64
}

fn go_to_page(app: &mut AppState, page: i64) {
    app.users.set_current_page(page);
    app.selected_row = 0;
}

/// Keep the highlighted row inside the visible page after the data changed.
pub fn clamp_selection(app: &mut AppState) {
    let visible = derive_view(&app.users).visible.len();
    app.selected_row = app.selected_row.min(visible.saturating_sub(1));
}
