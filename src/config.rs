use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::Error;

pub const DEFAULT_MARGIN_SECS: i64 = 60;
pub const DEFAULT_REVIEW_ROOT: &str = "./logs";

/// Closed interval of plausible years. Dates outside it are treated as garbage,
/// both in file names, folder names and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBounds {
    min: i32,
    max: i32,
}

impl YearBounds {
    pub fn new(min: i32, max: i32) -> Result<Self, Error> {
        if min > max {
            return Err(Error::Other(format!(
                "Invalid year bounds: {} is greater than {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

impl Default for YearBounds {
    fn default() -> Self {
        Self {
            min: 1800,
            max: 2300,
        }
    }
}

impl fmt::Display for YearBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.min, self.max)
    }
}

/// Settings that are not exposed on the command line. Read from the
/// environment (`DIN_KEEPER_*`), which `.env` files can populate.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvSettings {
    pub margin_secs: i64,
    pub review_root: String,
}

pub fn load_env_settings() -> Result<EnvSettings, ConfigError> {
    let builder = Config::builder()
        .set_default("margin_secs", DEFAULT_MARGIN_SECS)?
        .set_default("review_root", DEFAULT_REVIEW_ROOT)?
        .add_source(Environment::with_prefix("DIN_KEEPER"))
        .build()?;
    builder.try_deserialize::<EnvSettings>()
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub root_path: PathBuf,
    pub folder_patterns: Vec<String>,
    pub year_bounds: YearBounds,
    pub margin_secs: i64,
    /// Directory that receives the "Files to review" folder.
    pub review_root: PathBuf,
}

impl AppConfig {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            folder_patterns: Vec::new(),
            year_bounds: YearBounds::default(),
            margin_secs: DEFAULT_MARGIN_SECS,
            review_root: PathBuf::from(DEFAULT_REVIEW_ROOT),
        }
    }

    pub fn with_env_settings(mut self, settings: &EnvSettings) -> Self {
        self.margin_secs = settings.margin_secs;
        self.review_root = PathBuf::from(&settings.review_root);
        self
    }
}
