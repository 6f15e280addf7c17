use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::controller::{
    SpinDuration, SpinSettings, DEFAULT_DRIFT_DEGREES_PER_TICK, DEFAULT_DURATION_MAX_MS,
    DEFAULT_DURATION_MIN_MS,
};
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Fixed spin length; when unset each spin picks a length in the min/max range.
    pub spin_duration_ms: Option<u64>,
    pub duration_min_ms: u64,
    pub duration_max_ms: u64,
    pub speed_multiplier: f64,
    pub drift_degrees_per_tick: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spin_duration_ms: None,
            duration_min_ms: DEFAULT_DURATION_MIN_MS,
            duration_max_ms: DEFAULT_DURATION_MAX_MS,
            speed_multiplier: 1.0,
            drift_degrees_per_tick: DEFAULT_DRIFT_DEGREES_PER_TICK,
        }
    }
}

impl Config {
    pub fn spin_settings(&self) -> Result<SpinSettings> {
        let duration = match self.spin_duration_ms {
            Some(ms) => SpinDuration::Fixed(ms),
            None => SpinDuration::Between {
                min_ms: self.duration_min_ms,
                max_ms: self.duration_max_ms,
            },
        };
        SpinSettings::new(duration, self.speed_multiplier, self.drift_degrees_per_tick)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "spinwheel") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("spinwheel_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), error = %err, "ignoring malformed config")
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
