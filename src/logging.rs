//! Logger setup.

use env_logger::{Builder, Env, Target};
use std::fs::File;
use std::io;
use std::path::Path;

/// Filter used when `RUST_LOG` is unset.
///
/// The widget owns the terminal, so only problems are printed by default.
pub const DEFAULT_FILTER: &str = "warn";

/// Setup and configure the logger.
///
/// With `log_file` set, records are appended to that file instead of stderr.
/// Users can override the level via `RUST_LOG`, e.g. `RUST_LOG=debug`.
pub fn setup_logger(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER));
    builder.format_timestamp(None);

    if let Some(path) = log_file {
        let file = File::options().create(true).append(true).open(path)?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    // Ignore initialization errors
    builder.try_init().unwrap_or(());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_setup() {
        // Multiple calls should be safe (though only the first takes effect)
        setup_logger(None).unwrap();
        setup_logger(None).unwrap();
    }

    #[test]
    fn test_logger_setup_creates_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("drum-machine.log");

        setup_logger(Some(&path)).unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn test_logger_setup_bad_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("drum-machine.log");

        assert!(setup_logger(Some(&path)).is_err());
    }
}
