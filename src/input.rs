//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `draw_status_bar` in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::storage::Storage;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event<S: Storage>(app: &mut App<S>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('w') => app.open_wishlist(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('f') | KeyCode::Char(' ') => app.toggle_favorite(),
        KeyCode::Right | KeyCode::Char('l') => app.next_page(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_page(),
        KeyCode::Char(c @ '1'..='9') => app.go_to_page(c as usize - '0' as usize),
        _ => {}
    }
}
