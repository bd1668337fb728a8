mod config;

pub use config::{Config, CountdownSound, DisplayConfig, PlaybackConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/intervalroom[-dev]/` based on INTERVALROOM_ENV.
///
/// Set INTERVALROOM_ENV=dev to use the development data directory, or
/// INTERVALROOM_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("INTERVALROOM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("INTERVALROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("intervalroom-dev")
            } else {
                base_dir.join("intervalroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
