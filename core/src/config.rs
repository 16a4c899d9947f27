// User configuration, read from `~/.todolist/config.toml`. Every key is
// optional, e.g. `data_file = "~/Documents/tasks.json"`, `due_soon_days = 3`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TaskError};
use crate::model::task::DUE_SOON_DAYS;

const APP_DIR: &str = ".todolist";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_FILE_NAME: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_file: PathBuf,
    pub due_soon_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: app_dir().join(DEFAULT_FILE_NAME),
            due_soon_days: DUE_SOON_DAYS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&app_dir().join(CONFIG_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| TaskError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| TaskError::Config(format!("{}: {}", path.display(), e)))?;
        if config.due_soon_days < 0 {
            return Err(TaskError::Config(format!(
                "{}: due_soon_days must not be negative",
                path.display()
            )));
        }
        config.data_file = expand_home(&config.data_file);
        debug!(path = %path.display(), data_file = %config.data_file.display(), "loaded config");
        Ok(config)
    }
}

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
