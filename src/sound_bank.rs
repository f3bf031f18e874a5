//! The fixed table of pads: trigger key, display title, identifier and audio resource.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::audio_engine::constants::NUM_PADS;

/// A keyboard character bound to one pad.
///
/// Only the nine configured letters can be represented; construction
/// normalizes to uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerKey(char);

impl TriggerKey {
    /// Normalizes `c` to uppercase and returns the key if a pad is bound to it.
    pub fn from_char(c: char) -> Option<Self> {
        let mut upper = c.to_uppercase();
        let (Some(key), None) = (upper.next(), upper.next()) else {
            return None;
        };
        SOUND_BANK
            .iter()
            .map(|entry| entry.key)
            .find(|candidate| candidate.0 == key)
    }

    pub fn as_char(self) -> char {
        self.0
    }

    /// Position of the pad in grid order (row-major).
    pub fn pad_index(self) -> usize {
        SOUND_BANK
            .iter()
            .position(|entry| entry.key == self)
            .unwrap_or_default()
    }

    /// The sound entry bound to this key.
    pub fn entry(self) -> &'static SoundEntry {
        &SOUND_BANK[self.pad_index()]
    }
}

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable metadata for one pad.
#[derive(Debug, PartialEq, Eq)]
pub struct SoundEntry {
    pub key: TriggerKey,
    pub title: &'static str,
    pub id: &'static str,
    pub source: &'static str,
}

/// Extensions tried, in order, when the listed file is not on disk.
const FALLBACK_EXTENSIONS: [&str; 3] = ["wav", "flac", "ogg"];

impl SoundEntry {
    /// Final path segment of the resource location, e.g. `Heater-1.mp3`.
    pub fn file_name(&self) -> &'static str {
        self.source.rsplit('/').next().unwrap_or(self.source)
    }

    /// Finds this entry's sample inside `dir`.
    ///
    /// The resource's own file name wins; otherwise a file with the same stem
    /// and a common lossless or open extension is accepted.
    pub fn resolve_in(&self, dir: &Path) -> Option<PathBuf> {
        let exact = dir.join(self.file_name());
        if exact.is_file() {
            return Some(exact);
        }

        FALLBACK_EXTENSIONS
            .iter()
            .map(|ext| exact.with_extension(ext))
            .find(|candidate| candidate.is_file())
    }
}

/// All pads, in grid order.
pub static SOUND_BANK: [SoundEntry; NUM_PADS] = [
    SoundEntry {
        key: TriggerKey('Q'),
        title: "Heater 1",
        id: "heater_1",
        source: "https://s3.amazonaws.com/freecodecamp/drums/Heater-1.mp3",
    },
    SoundEntry {
        key: TriggerKey('W'),
        title: "Heater 2",
        id: "heater_2",
        source: "https://s3.amazonaws.com/freecodecamp/drums/Heater-2.mp3",
    },
    SoundEntry {
        key: TriggerKey('E'),
        title: "Heater 3",
        id: "heater_3",
        source: "https://s3.amazonaws.com/freecodecamp/drums/Heater-3.mp3",
    },
    SoundEntry {
        key: TriggerKey('A'),
        title: "Heater 4",
        id: "heater_4",
        source: "https://s3.amazonaws.com/freecodecamp/drums/Heater-4_1.mp3",
    },
    SoundEntry {
        key: TriggerKey('S'),
        title: "Heater 6",
        id: "heater_6",
        source: "https://s3.amazonaws.com/freecodecamp/drums/Heater-6.mp3",
    },
    SoundEntry {
        key: TriggerKey('D'),
        title: "Open HH",
        id: "open_hh",
        source: "https://s3.amazonaws.com/freecodecamp/drums/Dsc_Oh.mp3",
    },
    SoundEntry {
        key: TriggerKey('Z'),
        title: "Kick n Hat",
        id: "kick_in_hat",
        source: "https://s3.amazonaws.com/freecodecamp/drums/Kick_n_Hat.mp3",
    },
    SoundEntry {
        key: TriggerKey('X'),
        title: "Kick",
        id: "kick",
        source: "https://s3.amazonaws.com/freecodecamp/drums/RP4_KICK_1.mp3",
    },
    SoundEntry {
        key: TriggerKey('C'),
        title: "Closed HH",
        id: "closed_hh",
        source: "https://s3.amazonaws.com/freecodecamp/drums/Cev_H2.mp3",
    },
];
