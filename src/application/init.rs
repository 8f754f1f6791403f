//! Initialize site use case

use crate::error::{Result, TagtreeError};
use crate::infrastructure::{Config, SiteRepository};
use std::fs;
use std::path::{Path, PathBuf};

/// Write a default `tagtree.toml` at `path`, creating the directory if needed.
///
/// Returns the path of the written config file.
pub fn init(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = SiteRepository::new(path.to_path_buf());
    if repo.is_initialized() {
        return Err(TagtreeError::AlreadyInitialized(path.to_path_buf()));
    }

    repo.save_config(&Config::default())?;
    tracing::info!("Initialized tagtree site at {}", path.display());

    Ok(Config::path_in(path))
}
