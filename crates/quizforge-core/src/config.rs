//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizforge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    /// JSON file holding committed quizzes.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Indent the stored JSON.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./quizforge-data/quizzes.json")
}

fn default_true() -> bool {
    true
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            pretty: true,
        }
    }
}

/// Expand `${VAR_NAME}` references. Unset variables expand to nothing.
///
/// Expanded values are copied verbatim and never scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// `QUIZFORGE_STORE` overrides the store path.
pub fn load_config() -> Result<QuizforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizforge.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => QuizforgeConfig::default(),
    };

    if let Ok(store) = std::env::var("QUIZFORGE_STORE") {
        config.store_path = PathBuf::from(store);
    }
    config.store_path = PathBuf::from(resolve_env_vars(&config.store_path.to_string_lossy()));

    tracing::debug!(
        "config from {}: store at {}",
        config_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".into()),
        config.store_path.display()
    );
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<QuizforgeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}
