//! Translation of terminal events into widget actions.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::sound_bank::TriggerKey;
use crate::ui::layout::{Hit, Layout};

/// Slider steps moved by the coarse volume keys.
pub const COARSE_VOLUME_STEPS: i32 = 10;

/// Something the user asked the widget to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// A key-down of a printable character, handed to the keyboard binding as is.
    KeyDown(char),
    /// Pointer press on a pad.
    ClickPad(TriggerKey),
    TogglePower,
    SetVolume(f32),
    /// Move the slider by this many steps.
    NudgeVolume(i32),
    /// The terminal changed size.
    Resize { cols: u16, rows: u16 },
    Quit,
}

fn key_action(key: &KeyEvent) -> Option<Action> {
    // Browsers fire keydown again on auto-repeat; releases are not key-downs.
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(Action::KeyDown(c))
        }
        KeyCode::Tab => Some(Action::TogglePower),
        KeyCode::Left => Some(Action::NudgeVolume(-1)),
        KeyCode::Right => Some(Action::NudgeVolume(1)),
        KeyCode::Down => Some(Action::NudgeVolume(-COARSE_VOLUME_STEPS)),
        KeyCode::Up => Some(Action::NudgeVolume(COARSE_VOLUME_STEPS)),
        KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

fn mouse_action(mouse: &MouseEvent, layout: &Layout) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {}
        _ => return None,
    }

    match layout.hit(mouse.column, mouse.row)? {
        Hit::Pad(key) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(Action::ClickPad(key))
        }
        Hit::Power if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(Action::TogglePower)
        }
        // Dragging along the track moves the slider like a range input.
        Hit::Volume(fraction) => Some(Action::SetVolume(fraction)),
        _ => None,
    }
}

/// Maps a terminal event to an action, or `None` if the widget ignores it.
pub fn translate(event: &Event, layout: &Layout) -> Option<Action> {
    match event {
        Event::Key(key) => key_action(key),
        Event::Mouse(mouse) => mouse_action(mouse, layout),
        Event::Resize(cols, rows) => Some(Action::Resize {
            cols: *cols,
            rows: *rows,
        }),
        _ => None,
    }
}
