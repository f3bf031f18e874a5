//! The drum machine widget state and its handlers.
//!
//! [`DrumMachine`] owns the power flag, the volume setting, the display label
//! and one playable [`Clip`] per pad. Every input (pad click, key-down, power
//! switch, volume slider) ends up in one of its methods, which read the
//! current state at call time.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;

use crate::audio_engine::constants::{DEFAULT_VOLUME, VOLUME_MAX, VOLUME_MIN, VOLUME_STEP};
use crate::audio_engine::errors::EngineError;
use crate::sound_bank::{SOUND_BANK, SoundEntry, TriggerKey};

/// Text shown while powered on before any pad has been triggered.
pub const READY_MESSAGE: &str = "Drum Machine";

/// Text shown while powered off.
pub const POWER_OFF_MESSAGE: &str = "Power Off";

/// An owned, playable audio resource behind one pad.
pub trait Clip {
    /// Sets the volume used by the next playback.
    fn set_volume(&mut self, volume: f32);

    /// Starts playback from time zero, cutting off any playback in progress.
    fn play_from_start(&mut self) -> Result<(), EngineError>;
}

/// Global power flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    On,
    Off,
}

impl Power {
    pub fn toggled(self) -> Self {
        match self {
            Power::On => Power::Off,
            Power::Off => Power::On,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Power::On => "On",
            Power::Off => "Off",
        }
    }
}

/// A volume level, always within [0, 1] and on the 0.01 grid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    /// Clamps and quantizes `value`. Non-finite input yields `None`.
    pub fn new(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // Divide by the step count rather than multiply by the step so that
        // e.g. 0.3 comes back as exactly 0.3.
        let steps_per_unit = (1.0 / VOLUME_STEP).round();
        let steps = (value.clamp(VOLUME_MIN, VOLUME_MAX) * steps_per_unit).round();
        Some(Self(steps / steps_per_unit))
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Whole percent, as shown next to the slider.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    /// Moves by `steps` slider steps, saturating at the ends.
    pub fn nudged(self, steps: i32) -> Self {
        Self::new(self.0 + steps as f32 * VOLUME_STEP).unwrap_or(self)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

/// The label area's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Ready,
    PowerOff,
    Sound(&'static str),
}

impl Display {
    pub fn text(self) -> &'static str {
        match self {
            Display::Ready => READY_MESSAGE,
            Display::PowerOff => POWER_OFF_MESSAGE,
            Display::Sound(title) => title,
        }
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// The drum machine: power, volume, display and the pads' clips.
pub struct DrumMachine<C> {
    power: Power,
    volume: Volume,
    display: Display,
    pads: HashMap<TriggerKey, C>,
}

impl<C: Clip> DrumMachine<C> {
    /// Builds a machine with one clip per sound entry, powered on at the default volume.
    pub fn from_fn(mut make_clip: impl FnMut(&'static SoundEntry) -> C) -> Self {
        match Self::try_from_fn(|entry| Ok::<_, Infallible>(make_clip(entry))) {
            Ok(machine) => machine,
            Err(never) => match never {},
        }
    }

    /// Like [`from_fn`](Self::from_fn), stopping at the first clip that cannot be created.
    pub fn try_from_fn<E>(
        mut make_clip: impl FnMut(&'static SoundEntry) -> Result<C, E>,
    ) -> Result<Self, E> {
        let mut pads = HashMap::with_capacity(SOUND_BANK.len());
        for entry in &SOUND_BANK {
            pads.insert(entry.key, make_clip(entry)?);
        }

        Ok(Self {
            power: Power::On,
            volume: Volume::default(),
            display: Display::Ready,
            pads,
        })
    }

    /// Trigger handler shared by pad clicks and key-downs.
    ///
    /// Returns true if the pad fired. While powered off this is a no-op.
    pub fn trigger(&mut self, key: TriggerKey) -> bool {
        if self.power == Power::Off {
            return false;
        }

        let Some(clip) = self.pads.get_mut(&key) else {
            return false;
        };

        let entry = key.entry();
        self.display = Display::Sound(entry.title);
        clip.set_volume(self.volume.get());
        if let Err(err) = clip.play_from_start() {
            log::warn!("Pad {key} ({}) failed to play: {err}", entry.id);
        }
        log::debug!("Triggered {key} ({}) at volume {:.2}", entry.id, self.volume.get());

        true
    }

    /// Keyboard binding: uppercases `c` and triggers the bound pad, if any.
    pub fn key_down(&mut self, c: char) -> Option<TriggerKey> {
        let key = TriggerKey::from_char(c)?;
        self.trigger(key);
        Some(key)
    }

    /// Flips the power flag and resets the display accordingly.
    pub fn toggle_power(&mut self) -> Power {
        self.power = self.power.toggled();
        self.display = match self.power {
            Power::On => Display::Ready,
            Power::Off => Display::PowerOff,
        };
        log::info!("Power {}", self.power.label());
        self.power
    }

    /// Volume slider input. Out-of-range values are clamped, non-finite ones ignored.
    pub fn set_volume(&mut self, value: f32) -> Volume {
        if let Some(volume) = Volume::new(value) {
            self.volume = volume;
        }
        self.volume
    }

    /// Moves the volume slider by `steps` steps of 0.01.
    pub fn nudge_volume(&mut self, steps: i32) -> Volume {
        self.volume = self.volume.nudged(steps);
        self.volume
    }

    pub fn power(&self) -> Power {
        self.power
    }

    pub fn is_on(&self) -> bool {
        self.power == Power::On
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn display(&self) -> Display {
        self.display
    }

    /// Pads are interactive only while powered on.
    pub fn pads_enabled(&self) -> bool {
        self.is_on()
    }

    pub fn clip(&self, key: TriggerKey) -> Option<&C> {
        self.pads.get(&key)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records what the machine asked of a pad.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingClip {
        pub volume: Option<f32>,
        pub plays: usize,
        /// Volume in effect at each playback start.
        pub played_at: Vec<f32>,
    }

    impl Clip for RecordingClip {
        fn set_volume(&mut self, volume: f32) {
            self.volume = Some(volume);
        }

        fn play_from_start(&mut self) -> Result<(), EngineError> {
            self.plays += 1;
            self.played_at.push(self.volume.unwrap_or(f32::NAN));
            Ok(())
        }
    }

    struct FailingClip;

    impl Clip for FailingClip {
        fn set_volume(&mut self, _volume: f32) {}

        fn play_from_start(&mut self) -> Result<(), EngineError> {
            Err(EngineError::NotRunning)
        }
    }

    pub(crate) fn machine() -> DrumMachine<RecordingClip> {
        DrumMachine::from_fn(|_| RecordingClip::default())
    }

    fn key(c: char) -> TriggerKey {
        TriggerKey::from_char(c).unwrap()
    }

    fn total_plays(machine: &DrumMachine<RecordingClip>) -> usize {
        SOUND_BANK
            .iter()
            .map(|e| machine.clip(e.key).unwrap().plays)
            .sum()
    }

    #[test]
    fn test_initial_state() {
        let machine = machine();
        assert_eq!(machine.power(), Power::On);
        assert_eq!(machine.volume().get(), DEFAULT_VOLUME);
        assert_eq!(machine.display().text(), READY_MESSAGE);
        assert!(machine.pads_enabled());
    }

    #[test]
    fn test_every_pad_shows_title_and_plays() {
        let mut machine = machine();
        for entry in &SOUND_BANK {
            assert!(machine.trigger(entry.key));
            assert_eq!(machine.display().text(), entry.title);

            let clip = machine.clip(entry.key).unwrap();
            assert_eq!(clip.plays, 1);
            assert_eq!(clip.volume, Some(DEFAULT_VOLUME));
        }
    }

    #[test]
    fn test_power_off_is_a_no_op() {
        let mut machine = machine();
        machine.toggle_power();

        for entry in &SOUND_BANK {
            assert!(!machine.trigger(entry.key));
            assert_eq!(machine.key_down(entry.key.as_char()), Some(entry.key));
        }

        assert_eq!(machine.display(), Display::PowerOff);
        assert_eq!(total_plays(&machine), 0);
        assert!(!machine.pads_enabled());
    }

    #[test]
    fn test_power_toggle_display() {
        let mut machine = machine();
        machine.trigger(key('D'));
        assert_eq!(machine.display().text(), "Open HH");

        assert_eq!(machine.toggle_power(), Power::Off);
        assert_eq!(machine.display().text(), POWER_OFF_MESSAGE);

        assert_eq!(machine.toggle_power(), Power::On);
        assert_eq!(machine.display().text(), READY_MESSAGE);
    }

    #[test]
    fn test_volume_applies_to_next_trigger() {
        let mut machine = machine();
        machine.set_volume(0.3);
        machine.trigger(key('X'));

        let clip = machine.clip(key('X')).unwrap();
        assert_eq!(clip.played_at, vec![0.3]);
    }

    #[test]
    fn test_volume_change_is_not_retroactive() {
        let mut machine = machine();
        machine.trigger(key('Z'));
        machine.set_volume(0.9);

        let clip = machine.clip(key('Z')).unwrap();
        assert_eq!(clip.played_at, vec![DEFAULT_VOLUME]);
        assert_eq!(clip.volume, Some(DEFAULT_VOLUME));
    }

    #[test]
    fn test_lowercase_key_triggers_same_pad() {
        let mut machine = machine();
        assert_eq!(machine.key_down('q'), Some(key('Q')));
        assert_eq!(machine.key_down('Q'), Some(key('Q')));

        assert_eq!(machine.clip(key('Q')).unwrap().plays, 2);
        assert_eq!(machine.display().text(), "Heater 1");
    }

    #[test]
    fn test_unbound_key_has_no_effect() {
        let mut machine = machine();
        for c in ['r', 'P', '5', ' ', 'm'] {
            assert_eq!(machine.key_down(c), None);
        }

        assert_eq!(machine.display(), Display::Ready);
        assert_eq!(total_plays(&machine), 0);
    }

    #[test]
    fn test_rapid_retrigger_restarts_each_time() {
        let mut machine = machine();
        for _ in 0..5 {
            machine.key_down('s');
        }
        assert_eq!(machine.clip(key('S')).unwrap().plays, 5);
    }

    #[test]
    fn test_volume_clamped_and_quantized() {
        let mut machine = machine();
        assert_eq!(machine.set_volume(1.7).get(), 1.0);
        assert_eq!(machine.set_volume(-0.2).get(), 0.0);
        assert!((machine.set_volume(0.333).get() - 0.33).abs() < 1e-6);

        let before = machine.volume();
        assert_eq!(machine.set_volume(f32::NAN), before);
        assert_eq!(machine.set_volume(f32::INFINITY), before);
    }

    #[test]
    fn test_nudge_volume() {
        let mut machine = machine();
        assert_eq!(machine.nudge_volume(1).percent(), 51);
        assert_eq!(machine.nudge_volume(-10).percent(), 41);
        assert_eq!(machine.nudge_volume(1000).get(), 1.0);
        assert_eq!(machine.nudge_volume(-1000).get(), 0.0);
    }

    #[test]
    fn test_playback_failure_still_updates_display() {
        let mut machine = DrumMachine::from_fn(|_| FailingClip);
        assert!(machine.trigger(key('E')));
        assert_eq!(machine.display().text(), "Heater 3");
    }

    #[test]
    fn test_try_from_fn_propagates_error() {
        let result =
            DrumMachine::<RecordingClip>::try_from_fn(|entry| match entry.key.as_char() {
                'A' => Err(entry.id),
                _ => Ok(RecordingClip::default()),
            });
        assert_eq!(result.err(), Some("heater_4"));
    }

    #[test]
    fn test_every_slider_step_is_exact() {
        let mut machine = machine();
        for k in 0..=100u8 {
            let value = f32::from(k) / 100.0;
            assert_eq!(machine.set_volume(value).get(), value);
        }
    }

    #[test]
    fn test_non_ascii_keys_are_ignored() {
        let mut machine = machine();
        for c in ['1', '\u{e9}', '\u{130}', '\u{131}'] {
            assert_eq!(machine.key_down(c), None);
        }
        assert_eq!(total_plays(&machine), 0);
        assert_eq!(machine.display().text(), READY_MESSAGE);
    }
}
