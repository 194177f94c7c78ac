//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! This module manages keyboard shortcuts for the dashboard. It supports:
//! - Loading custom keybindings from a config file (`keybinds.conf`)
//! - Providing defaults if no config is present
//! - Resolving key presses (with modifiers) to semantic actions
//! - Exporting the current keymap back to a file for reference or customization

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::Path;

use crate::app::state::SortField;

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Several keys may map to the same action (e.g. both `j` and Down move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help reference.
    OpenHelp,
    /// Enter search mode on the data page.
    StartSearch,
    /// Switch between the Home and Data pages.
    SwitchPage,
    /// Open the data page from Home.
    EnterAction,
    /// Move the highlighted row up.
    MoveUp,
    /// Move the highlighted row down.
    MoveDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    /// Sort by a column; pressing again flips the direction.
    SortBy(SortField),
    ClearSort,
    /// Open the rows-per-page menu.
    OpenPageSizeMenu,
    /// Re-issue the users request.
    Retry,
    /// Dismiss the current error banner.
    DismissError,
    /// Toggle the keybindings panel on the right.
    ToggleKeybindsPane,
    /// Ignore this key.
    Ignore,
}

/// Mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    ///
    /// Includes arrow keys and vim-style keys for navigation, one letter per
    /// sortable column, and Page Up/Down for paging.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Tab), KeyAction::SwitchPage);
        bindings.insert((M::NONE, BackTab), KeyAction::SwitchPage);
        bindings.insert((M::SHIFT, BackTab), KeyAction::SwitchPage);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);
        bindings.insert((M::NONE, Char('g')), KeyAction::FirstPage);
        // Shift+g arrives as 'G' with or without SHIFT depending on the terminal
        bindings.insert((M::NONE, Char('G')), KeyAction::LastPage);
        bindings.insert((M::SHIFT, Char('G')), KeyAction::LastPage);

        for (c, field) in [
            ('i', SortField::Id),
            ('n', SortField::Name),
            ('u', SortField::Username),
            ('e', SortField::Email),
            ('p', SortField::Phone),
            ('w', SortField::Website),
            ('c', SortField::Company),
            ('a', SortField::Address),
        ] {
            bindings.insert((M::NONE, Char(c)), KeyAction::SortBy(field));
        }
        bindings.insert((M::NONE, Char('s')), KeyAction::ClearSort);
        bindings.insert((M::NONE, Char('o')), KeyAction::OpenPageSizeMenu);
        bindings.insert((M::NONE, Char('r')), KeyAction::Retry);
        bindings.insert((M::NONE, Char('x')), KeyAction::DismissError);

        bindings.insert((M::SHIFT, Char('K')), KeyAction::ToggleKeybindsPane);
        bindings.insert((M::NONE, Char('K')), KeyAction::ToggleKeybindsPane);

        Self { bindings }
    }

    /// Load a keymap from `path`, or write the defaults there if it does not exist.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not write default keybinds");
        }
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// The file uses `<Action> = <KeySpec>` lines. The method starts from
    /// defaults and overrides with user-specified bindings; unknown actions or
    /// keys are skipped.
    ///
    /// # Returns
    ///
    /// `Some(keymap)` if the file is readable; `None` otherwise.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::from_config_str(&contents))
    }

    pub fn from_config_str(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::debug!(line, "ignoring keybind line"),
            }
        }
        map
    }

    /// Write a readable subset of the current bindings to a configuration file.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-dashboard keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, BackTab, Up, Down, Left, Right, PageUp, PageDown, Home, End, /\n");
        buf.push_str("# Actions: Quit, OpenHelp, StartSearch, SwitchPage, EnterAction, MoveUp, MoveDown, PrevPage, NextPage, FirstPage, LastPage, SortBy:<field>, ClearSort, OpenPageSizeMenu, Retry, DismissError, ToggleKeybindsPane, Ignore\n");
        buf.push_str("# Sort fields: id, name, username, email, phone, website, company, address\n\n");

        let mut entries: Vec<(String, String)> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a != KeyAction::Ignore)
            .map(|((mods, code), action)| (format_action(*action), Self::format_key(*mods, *code)))
            .collect();
        entries.sort();
        entries.dedup();
        for (action, key) in entries {
            let _ = writeln!(&mut buf, "{} = {}", action, key);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its action, if bound.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Format a key into a spec like "Ctrl+q" or "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Home" => Home,
        "End" => End,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    if let Some(field) = s.strip_prefix("SortBy:") {
        return SortField::parse(field).map(KeyAction::SortBy);
    }
    match s {
        "Quit" => Some(KeyAction::Quit),
        "OpenHelp" => Some(KeyAction::OpenHelp),
        "StartSearch" => Some(KeyAction::StartSearch),
        "SwitchPage" => Some(KeyAction::SwitchPage),
        "EnterAction" => Some(KeyAction::EnterAction),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PrevPage" => Some(KeyAction::PrevPage),
        "NextPage" => Some(KeyAction::NextPage),
        "FirstPage" => Some(KeyAction::FirstPage),
        "LastPage" => Some(KeyAction::LastPage),
        "ClearSort" => Some(KeyAction::ClearSort),
        "OpenPageSizeMenu" => Some(KeyAction::OpenPageSizeMenu),
        "Retry" => Some(KeyAction::Retry),
        "DismissError" => Some(KeyAction::DismissError),
        "ToggleKeybindsPane" => Some(KeyAction::ToggleKeybindsPane),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> String {
    let name = match a {
        KeyAction::SortBy(field) => return format!("SortBy:{}", field.label()),
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::SwitchPage => "SwitchPage",
        KeyAction::EnterAction => "EnterAction",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PrevPage => "PrevPage",
        KeyAction::NextPage => "NextPage",
        KeyAction::FirstPage => "FirstPage",
        KeyAction::LastPage => "LastPage",
        KeyAction::ClearSort => "ClearSort",
        KeyAction::OpenPageSizeMenu => "OpenPageSizeMenu",
        KeyAction::Retry => "Retry",
        KeyAction::DismissError => "DismissError",
        KeyAction::ToggleKeybindsPane => "ToggleKeybindsPane",
        KeyAction::Ignore => "Ignore",
    };
    name.to_string()
}
