use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, crate_version};

use drum_machine::audio_engine::AudioEngine;
use drum_machine::audio_engine::constants::DEFAULT_VOLUME;
use drum_machine::logging::setup_logger;
use drum_machine::machine::DrumMachine;
use drum_machine::sound_bank::SOUND_BANK;
use drum_machine::ui;

#[derive(Parser)]
#[clap(
    version = crate_version!(),
    about = "A nine-pad drum machine for the terminal."
)]
struct Cli {
    /// Directory holding the pad samples.
    #[clap(long, default_value = "samples")]
    samples_dir: PathBuf,

    /// Initial volume, between 0 and 1.
    #[clap(long, default_value_t = DEFAULT_VOLUME)]
    volume: f32,

    /// Append log records to this file instead of stderr.
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    setup_logger(cli.log_file.as_deref())?;

    let mut engine = AudioEngine::new();
    engine.run()?;
    if let Some((channels, sample_rate)) = engine.output_format() {
        log::info!("Output stream: {channels} channels at {sample_rate} Hz");
    }

    let loaded = engine.load_sound_bank(&cli.samples_dir)?;
    if loaded == 0 {
        log::warn!(
            "No samples found in {}, pads will be silent",
            cli.samples_dir.display()
        );
    }

    let mut machine = DrumMachine::try_from_fn(|entry| engine.clip(entry.key.pad_index()))?;
    machine.set_volume(cli.volume);
    for entry in &SOUND_BANK {
        if let Some(clip) = machine.clip(entry.key) {
            log::debug!("Key {} -> pad {} ({})", entry.key, clip.pad_id(), entry.title);
        }
    }

    let result = ui::run(&mut machine);

    if let Err(err) = engine.stop_all() {
        log::warn!("Failed to stop pads: {err}");
    }
    engine.shut_down();

    Ok(result?)
}
