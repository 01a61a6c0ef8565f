use std::path::{Path, PathBuf};

use crate::errors::StoreError;

/// File name used when no explicit path is supplied.
pub const CONFIG_FILE_NAME: &str = ".fleetconfig";

/// Resolve the configuration file path.
///
/// An explicit path always wins; otherwise the fixed file name inside the
/// user's home directory is used.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, StoreError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or(StoreError::NoHome),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
