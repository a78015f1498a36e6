use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Built-in storage location, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data/tasks.txt";

pub const CONFIG_FILENAME: &str = ".taskline.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlannerConfig {
    /// Storage file path, relative to the config root unless absolute.
    pub data_file: Option<String>,
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILENAME)
}

pub fn load_config(root: &Path) -> Option<PlannerConfig> {
    let path = config_path(root);
    if !path.is_file() {
        return None;
    }
    let text = fs::read_to_string(path).ok()?;
    toml::from_str::<PlannerConfig>(&text).ok()
}

/// Resolves the storage file path: config override first, built-in default
/// otherwise. An absolute override is used as-is.
pub fn data_file_path(root: &Path, config: Option<&PlannerConfig>) -> PathBuf {
    let raw = config
        .and_then(|config| config.data_file.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_DATA_FILE);
    let candidate = Path::new(raw);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}
