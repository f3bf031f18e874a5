//! Drum machine configuration constants and limits.

/// Size of the pad grid (GRID_SIZE x GRID_SIZE).
pub const GRID_SIZE: usize = 3;

/// Total number of pads in the grid.
pub const NUM_PADS: usize = GRID_SIZE.pow(2);

/// Minimum volume level (silence).
pub const VOLUME_MIN: f32 = 0.0;

/// Maximum volume level (100%).
pub const VOLUME_MAX: f32 = 1.0;

/// Granularity of the volume slider.
pub const VOLUME_STEP: f32 = 0.01;

/// Volume the machine starts with.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Capacity of the control ring buffer feeding the audio thread.
pub const COMMAND_QUEUE_CAPACITY: usize = 256;

/// Fixed output buffer size requested from the device, in frames.
pub const OUTPUT_BUFFER_FRAMES: u32 = 512;

/// Input block size used when resampling decoded samples.
pub const RESAMPLE_CHUNK_FRAMES: usize = 1024;
