//! Screen geometry of the widget and a plain-text rendering of it.
//!
//! Everything here is pure so the picture and the pointer hit testing can be
//! checked without a terminal.

use crate::audio_engine::constants::GRID_SIZE;
use crate::machine::{Clip, DrumMachine, Power};
use crate::sound_bank::{SOUND_BANK, TriggerKey};

/// Total width of the widget in cells.
pub const WIDTH: u16 = 40;

/// Total height of the widget in rows.
pub const HEIGHT: u16 = 21;

const MARGIN: u16 = 2;

const TITLE_ROW: u16 = 0;
const POWER_ROW: u16 = 2;
const POWER_WIDTH: u16 = 14;
const DISPLAY_ROW: u16 = 4;
const DISPLAY_WIDTH: u16 = WIDTH - 2 * MARGIN;
const VOLUME_ROW: u16 = 8;
const VOLUME_LABEL: &str = "Volume [";
const SLIDER_X: u16 = MARGIN + VOLUME_LABEL.len() as u16;
const SLIDER_WIDTH: u16 = 21;
const PADS_ROW: u16 = 10;
const PAD_WIDTH: u16 = 7;
const PAD_HEIGHT: u16 = 3;
const PAD_GAP: u16 = 3;
const PADS_X: u16 = (WIDTH - (GRID_SIZE as u16 * PAD_WIDTH + (GRID_SIZE as u16 - 1) * PAD_GAP)) / 2;
const HELP_ROW: u16 = HEIGHT - 1;
const HELP_TEXT: &str = "Tab power  \u{2190}\u{2192} volume  Esc quit";

/// An axis-aligned block of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// What a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Pad(TriggerKey),
    Power,
    /// Slider position as a fraction of the track.
    Volume(f32),
}

/// Placement of the widget inside the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    pub origin_x: u16,
    pub origin_y: u16,
}

impl Layout {
    /// Centers the widget in a terminal of `cols` x `rows`; pinned to the top
    /// left corner when the terminal is too small.
    pub fn centered(cols: u16, rows: u16) -> Self {
        Self {
            origin_x: cols.saturating_sub(WIDTH) / 2,
            origin_y: rows.saturating_sub(HEIGHT) / 2,
        }
    }

    /// Widget-relative rectangle of pad number `index` (grid order).
    pub fn pad_rect(index: usize) -> Rect {
        let row = (index / GRID_SIZE) as u16;
        let col = (index % GRID_SIZE) as u16;
        Rect {
            x: PADS_X + col * (PAD_WIDTH + PAD_GAP),
            y: PADS_ROW + row * PAD_HEIGHT,
            width: PAD_WIDTH,
            height: PAD_HEIGHT,
        }
    }

    pub fn power_rect() -> Rect {
        Rect {
            x: MARGIN,
            y: POWER_ROW,
            width: POWER_WIDTH,
            height: 1,
        }
    }

    pub fn slider_rect() -> Rect {
        Rect {
            x: SLIDER_X,
            y: VOLUME_ROW,
            width: SLIDER_WIDTH,
            height: 1,
        }
    }

    /// True for rows occupied by the pad grid (widget-relative).
    pub fn is_pad_row(row: u16) -> bool {
        (PADS_ROW..PADS_ROW + GRID_SIZE as u16 * PAD_HEIGHT).contains(&row)
    }

    /// Maps a terminal cell to the control under it.
    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        let x = column.checked_sub(self.origin_x)?;
        let y = row.checked_sub(self.origin_y)?;

        if Self::power_rect().contains(x, y) {
            return Some(Hit::Power);
        }

        let slider = Self::slider_rect();
        if slider.contains(x, y) {
            let fraction = f32::from(x - slider.x) / f32::from(slider.width - 1);
            return Some(Hit::Volume(fraction));
        }

        SOUND_BANK
            .iter()
            .enumerate()
            .find(|(index, _)| Self::pad_rect(*index).contains(x, y))
            .map(|(_, entry)| Hit::Pad(entry.key))
    }
}

fn centered(text: &str, width: usize) -> String {
    let len = text.chars().count().min(width);
    let left = (width - len) / 2;
    let right = width - len - left;
    let text: String = text.chars().take(len).collect();
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn put(line: &mut Vec<char>, x: u16, text: &str) {
    for (offset, c) in text.chars().enumerate() {
        let at = x as usize + offset;
        if at >= line.len() {
            line.resize(at + 1, ' ');
        }
        line[at] = c;
    }
}

fn slider(volume: f32) -> String {
    let last = usize::from(SLIDER_WIDTH - 1);
    let knob = (volume * last as f32).round() as usize;
    (0..=last)
        .map(|i| match i.cmp(&knob) {
            std::cmp::Ordering::Less => '\u{2501}',
            std::cmp::Ordering::Equal => '\u{25CF}',
            std::cmp::Ordering::Greater => '\u{2500}',
        })
        .collect()
}

/// Draws the widget as `HEIGHT` lines of plain text.
pub fn render<C: Clip>(machine: &DrumMachine<C>) -> Vec<String> {
    let mut lines: Vec<Vec<char>> = vec![vec![' '; WIDTH as usize]; HEIGHT as usize];

    put(
        &mut lines[TITLE_ROW as usize],
        0,
        &centered("Drum Machine", WIDTH as usize),
    );

    let power = machine.power();
    let switch = match power {
        Power::On => "[ \u{25CF}]",
        Power::Off => "[\u{25CF} ]",
    };
    put(
        &mut lines[POWER_ROW as usize],
        MARGIN,
        &format!("Power {switch} {}", power.label()),
    );

    let inner = usize::from(DISPLAY_WIDTH - 2);
    let rule = "\u{2500}".repeat(inner);
    put(
        &mut lines[DISPLAY_ROW as usize],
        MARGIN,
        &format!("\u{250C}{rule}\u{2510}"),
    );
    put(
        &mut lines[DISPLAY_ROW as usize + 1],
        MARGIN,
        &format!("\u{2502}{}\u{2502}", centered(machine.display().text(), inner)),
    );
    put(
        &mut lines[DISPLAY_ROW as usize + 2],
        MARGIN,
        &format!("\u{2514}{rule}\u{2518}"),
    );

    let volume = machine.volume();
    put(
        &mut lines[VOLUME_ROW as usize],
        MARGIN,
        &format!("{VOLUME_LABEL}{}] {:>3}%", slider(volume.get()), volume.percent()),
    );

    let (horizontal, vertical) = if machine.pads_enabled() {
        ("\u{2500}", "\u{2502}")
    } else {
        ("\u{2504}", "\u{2506}")
    };
    let pad_rule = horizontal.repeat(usize::from(PAD_WIDTH - 2));
    for (index, entry) in SOUND_BANK.iter().enumerate() {
        let rect = Layout::pad_rect(index);
        let y = rect.y as usize;
        put(&mut lines[y], rect.x, &format!("\u{250C}{pad_rule}\u{2510}"));
        put(
            &mut lines[y + 1],
            rect.x,
            &format!(
                "{vertical}{}{vertical}",
                centered(&entry.key.to_string(), usize::from(PAD_WIDTH - 2))
            ),
        );
        put(&mut lines[y + 2], rect.x, &format!("\u{2514}{pad_rule}\u{2518}"));
    }

    put(
        &mut lines[HELP_ROW as usize],
        0,
        &centered(HELP_TEXT, WIDTH as usize),
    );

    lines
        .into_iter()
        .map(|line| line.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}
