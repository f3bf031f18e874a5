//! Terminal front end of the drum machine.
//!
//! - [`layout`]: widget geometry, hit testing and rendering to text lines
//! - [`input`]: terminal events to [`Action`]s
//! - [`terminal`]: raw-mode session the widget is drawn into
//!
//! [`run`] mounts the widget and feeds every action through [`apply`] until
//! the user quits.

use std::io;

use crossterm::event;

use crate::machine::{Clip, DrumMachine};

pub mod input;
pub mod layout;
pub mod terminal;

pub use input::Action;
use layout::Layout;
use terminal::TerminalSession;

/// Whether the event loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies one action to the machine.
pub fn apply<C: Clip>(machine: &mut DrumMachine<C>, action: Action) -> Flow {
    match action {
        Action::KeyDown(c) => {
            machine.key_down(c);
        }
        Action::ClickPad(key) => {
            machine.trigger(key);
        }
        Action::TogglePower => {
            machine.toggle_power();
        }
        Action::SetVolume(value) => {
            machine.set_volume(value);
        }
        Action::NudgeVolume(steps) => {
            machine.nudge_volume(steps);
        }
        Action::Resize { .. } => {}
        Action::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Mounts the widget and runs it until the user quits.
pub fn run<C: Clip>(machine: &mut DrumMachine<C>) -> io::Result<()> {
    let mut session = TerminalSession::mount()?;
    let (cols, rows) = session.size()?;
    let mut layout = Layout::centered(cols, rows);
    session.draw(&layout, &layout::render(machine), machine.is_on())?;

    loop {
        let event = event::read()?;
        let Some(action) = input::translate(&event, &layout) else {
            continue;
        };

        if let Action::Resize { cols, rows } = action {
            layout = Layout::centered(cols, rows);
        }
        if apply(machine, action) == Flow::Quit {
            break;
        }

        session.draw(&layout, &layout::render(machine), machine.is_on())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::tests::machine;
    use crate::machine::{POWER_OFF_MESSAGE, Power, READY_MESSAGE};
    use crate::sound_bank::TriggerKey;

    #[test]
    fn test_key_down_and_click_reach_same_pad() {
        let mut machine = machine();
        let key = TriggerKey::from_char('d').unwrap();

        assert_eq!(apply(&mut machine, Action::KeyDown('d')), Flow::Continue);
        assert_eq!(apply(&mut machine, Action::ClickPad(key)), Flow::Continue);

        assert_eq!(machine.clip(key).unwrap().plays, 2);
        assert_eq!(machine.display().text(), key.entry().title);
    }

    #[test]
    fn test_power_and_volume_actions() {
        let mut machine = machine();

        apply(&mut machine, Action::TogglePower);
        assert_eq!(machine.power(), Power::Off);
        assert_eq!(machine.display().text(), POWER_OFF_MESSAGE);

        apply(&mut machine, Action::KeyDown('q'));
        let q = TriggerKey::from_char('q').unwrap();
        apply(&mut machine, Action::ClickPad(q));
        assert_eq!(machine.clip(q).unwrap().plays, 0);
        assert_eq!(machine.display().text(), POWER_OFF_MESSAGE);

        apply(&mut machine, Action::SetVolume(0.8));
        apply(&mut machine, Action::NudgeVolume(-3));
        assert_eq!(machine.volume().percent(), 77);

        apply(&mut machine, Action::TogglePower);
        assert_eq!(machine.display().text(), READY_MESSAGE);
    }

    #[test]
    fn test_quit_and_resize() {
        let mut machine = machine();
        assert_eq!(
            apply(&mut machine, Action::Resize { cols: 80, rows: 24 }),
            Flow::Continue
        );
        assert_eq!(apply(&mut machine, Action::Quit), Flow::Quit);
    }
}
