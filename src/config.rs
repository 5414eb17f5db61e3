use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::error::{SimError, SimResult};
use crate::silhouette::{Silhouette, DEFAULT_SCREEN_SIZE, DEFAULT_SILHOUETTE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Side of the square screen in cells.
    pub screen_size: i32,
    /// Window pixels per cell.
    pub scale: u32,
    /// Rows of grains seeded above the neck.
    pub seed_rows: usize,
    pub pass_delay_ms: u64,
    pub redraw_every: u32,
    /// Target length of a timed run, used by calibration.
    pub timer_secs: u64,
    /// Hourglass image (BMP or PNG). The built-in shape is used when unset.
    pub silhouette: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_size: DEFAULT_SCREEN_SIZE,
            scale: 2,
            seed_rows: 32,
            pass_delay_ms: 0,
            redraw_every: 1,
            timer_secs: 60,
            silhouette: None,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> SimResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reads `path` if it exists, otherwise falls back to the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!(path = %path.display(), "loading configuration");
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.screen_size <= 0 {
            return Err(SimError::InvalidConfig("screen_size must be positive".to_string()));
        }
        if self.scale == 0 {
            return Err(SimError::InvalidConfig("scale must be at least 1".to_string()));
        }
        if self.seed_rows == 0 {
            return Err(SimError::InvalidConfig("seed_rows must be at least 1".to_string()));
        }
        if self.seed_rows > self.screen_size as usize {
            return Err(SimError::InvalidConfig("seed_rows cannot exceed screen_size".to_string()));
        }
        if self.redraw_every == 0 {
            return Err(SimError::InvalidConfig("redraw_every must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            redraw_every: self.redraw_every,
            pass_delay: Duration::from_millis(self.pass_delay_ms),
        }
    }

    pub fn timer(&self) -> Duration {
        Duration::from_secs(self.timer_secs)
    }

    pub fn load_silhouette(&self) -> SimResult<Silhouette> {
        match &self.silhouette {
            Some(path) => Silhouette::open(path),
            None if self.screen_size == DEFAULT_SCREEN_SIZE => Ok(DEFAULT_SILHOUETTE.clone()),
            None => Ok(Silhouette::hourglass(self.screen_size, self.screen_size)),
        }
    }
}
