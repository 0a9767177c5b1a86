use std::path::{Path, PathBuf};

use ard_inspect::render::{TreeStyle, DEFAULT_INDENT};
use ard_log::{warn, InitError, LevelFilter};
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fuzzy::{FuzzyMatchStrategy, DEFAULT_MAX_LENGTH_DIFFERENCE};

pub const DEFAULT_SETTINGS_PATH: &str = "./explorer.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("unable to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSettings {
    /// Horizontal space per tree level, in points.
    pub indent: f32,
    /// Largest side of inline thumbnails, in points.
    pub thumbnail_size: u32,
    pub log_dir: PathBuf,
    pub log_level: LevelFilter,
    pub fuzzy_strategy: FuzzyMatchStrategy,
    pub fuzzy_max_length_difference: usize,
    /// Where favourite entity queries are kept.
    pub favourites_path: PathBuf,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            thumbnail_size: 256,
            log_dir: PathBuf::from("./logs"),
            log_level: LevelFilter::Info,
            fuzzy_strategy: FuzzyMatchStrategy::default(),
            fuzzy_max_length_difference: DEFAULT_MAX_LENGTH_DIFFERENCE,
            favourites_path: PathBuf::from("./explorer_favourites.ron"),
        }
    }
}

impl ExplorerSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(ron::de::from_reader(reader)?)
    }

    /// Loads the settings, falling back to the defaults if the file is missing or malformed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(SettingsError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                warn!("unable to load `{}`, using defaults: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        ron::ser::to_writer_pretty(writer, self, PrettyConfig::default())?;
        Ok(())
    }

    /// Installs the global logger with the configured level, writing into `log_dir`.
    pub fn init_logging(&self) -> Result<(), InitError> {
        ard_log::init(self.log_level, &self.log_dir)
    }

    pub fn tree_style(&self) -> TreeStyle {
        TreeStyle {
            indent: self.indent,
            max_image_size: self.thumbnail_size as f32,
        }
    }
}
