//! A nine-pad drum machine.
//!
//! The widget state lives in [`machine`], the pad sounds in [`sound_bank`],
//! playback in [`audio_engine`] and the terminal front end in [`ui`].

pub mod audio_engine;
pub mod logging;
pub mod machine;
pub mod messages;
pub mod sound_bank;
pub mod ui;
