pub mod create;
pub mod init;
pub mod list;
pub mod show;
pub mod take;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::config::load_config_from;
use quizforge_core::{QuizId, QuizStore};

/// Open the store named by `--store`, or by the loaded config.
pub fn open_store(config_path: Option<PathBuf>, store_path: Option<PathBuf>) -> Result<QuizStore> {
    let config = load_config_from(config_path.as_deref())?;
    let path = store_path.unwrap_or(config.store_path);
    Ok(QuizStore::open_file(path).with_pretty(config.pretty))
}

pub fn parse_id(id: &str) -> Result<QuizId> {
    id.parse().map_err(|e: String| anyhow::anyhow!(e))
}
