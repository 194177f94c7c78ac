//! Shared UI components (status bar, keybindings panel, modals).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use std::collections::{BTreeMap, BTreeSet};

use crossterm::event::{KeyCode, KeyModifiers};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::state::ITEMS_PER_PAGE_OPTIONS;
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, fetch state and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let users = &app.users;
    let fetch = if users.loading() {
        "loading"
    } else if users.error().is_some() {
        "error"
    } else {
        "idle"
    };
    let msg = format!(
        "mode: {mode}  fetch: {fetch}  users:{}  page:{}  rows/page:{}",
        users.users().len(),
        users.current_page(),
        users.items_per_page(),
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

fn action_label(action: KeyAction) -> Option<(&'static str, String)> {
    let (section, label) = match action {
        KeyAction::Quit => ("General", "Quit".to_string()),
        KeyAction::SwitchPage => ("General", "Switch page".to_string()),
        KeyAction::EnterAction => ("General", "Open data page".to_string()),
        KeyAction::OpenHelp => ("General", "Help".to_string()),
        KeyAction::ToggleKeybindsPane => ("General", "Toggle keybindings".to_string()),
        KeyAction::StartSearch => ("Data", "Search".to_string()),
        KeyAction::Retry => ("Data", "Retry fetch".to_string()),
        KeyAction::DismissError => ("Data", "Dismiss error".to_string()),
        KeyAction::OpenPageSizeMenu => ("Data", "Rows per page".to_string()),
        KeyAction::ClearSort => ("Data", "Clear sort".to_string()),
        KeyAction::SortBy(field) => ("Sort", format!("Sort by {}", field.label())),
        KeyAction::MoveUp => ("Navigation", "Move up".to_string()),
        KeyAction::MoveDown => ("Navigation", "Move down".to_string()),
        KeyAction::PrevPage => ("Navigation", "Previous page".to_string()),
        KeyAction::NextPage => ("Navigation", "Next page".to_string()),
        KeyAction::FirstPage => ("Navigation", "First page".to_string()),
        KeyAction::LastPage => ("Navigation", "Last page".to_string()),
        KeyAction::Ignore => return None,
    };
    Some((section, label))
}

/// Render the right-side keybinds viewer with grouped sections.
pub fn render_keybinds_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .title("Keybindings")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);

    let mut sections: BTreeMap<&'static str, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();
    for ((mods, code), action) in app.keymap.all_bindings() {
        let Some((section, label)) = action_label(action) else {
            continue;
        };
        let key = match code {
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Char(c) if mods.contains(KeyModifiers::SHIFT) && c.is_ascii_uppercase() => {
                c.to_string()
            }
            _ => Keymap::format_key(mods, code),
        };
        sections
            .entry(section)
            .or_default()
            .entry(label)
            .or_default()
            .insert(key);
    }

    let mut lines: Vec<Line> = Vec::new();
    for (section, entries) in &sections {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            format!("{section}:"),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (label, keys) in entries {
            let joined = keys.iter().cloned().collect::<Vec<_>>().join(", ");
            lines.push(Line::from(vec![
                Span::raw(format!("  {label}: ")),
                Span::styled(joined, Style::default().add_modifier(Modifier::ITALIC)),
            ]));
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(block, area);
    f.render_widget(p, inner);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal with usage information and key tips.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Help", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for (label, keys, note) in [
        ("Switch page: ", "Tab", ""),
        ("Open user list: ", "Enter", " (from Home)"),
        ("Search: ", "/", " type to filter live; Enter keeps, Esc clears"),
        ("Pages: ", "Left/Right, h/l, PageUp/PageDown", ""),
        ("First / last page: ", "g / G", ""),
        ("Highlight row: ", "Up/Down, j/k", ""),
        ("Sort: ", "i n u e p w c a", " id, name, username, email, phone, website, company, city"),
        ("Flip sort direction: ", "same key again", ""),
        ("Clear sort: ", "s", ""),
        ("Rows per page: ", "o", ""),
        ("Retry fetch / dismiss error: ", "r / x", ""),
        ("Keybindings panel: ", "K", " (toggle)"),
        ("Quit: ", "q", ""),
    ] {
        lines.push(Line::from(vec![
            Span::raw(label),
            Span::styled(keys, italic),
            Span::raw(note),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Close help: "),
        Span::styled("Esc / Enter", italic),
    ]));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the rows-per-page selector.
pub fn render_page_size_modal(f: &mut Frame, area: Rect, app: &AppState, selected: usize) {
    let rect = centered_rect(30, ITEMS_PER_PAGE_OPTIONS.len() as u16 + 4, area);
    let mut text = String::new();
    for (idx, n) in ITEMS_PER_PAGE_OPTIONS.iter().enumerate() {
        let marker = if idx == selected { "▶" } else { " " };
        let current = if *n == app.users.items_per_page() { " (current)" } else { "" };
        text.push_str(&format!("{marker} {n}{current}\n"));
    }
    let p = Paragraph::new(text).block(
        Block::default()
            .title("Show rows")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
