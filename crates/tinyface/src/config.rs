//! Recognizer configuration.
//!
//! [`Settings`] is the plain-data part, loadable from `TINYFACE_*` environment
//! variables or a TOML file. [`RecognizerConfig`] adds the optional storage
//! strategies. Defaults are always merged in: setting one option never resets
//! another.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tinyface_core::{DetectorMode, SampleLoader, SampleSaver};

pub const DEFAULT_TOLERANCE: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the engine's model files. Required.
    pub model_path: Option<PathBuf>,
    /// Maximum descriptor distance accepted as a match.
    pub tolerance: f32,
    /// Run the slower CNN detector; also grayscales images before ingestion.
    pub use_cnn: bool,
    /// Grayscale images before recognition and classification.
    pub use_gray: bool,
    /// Where temporary grayscale copies go. System temp dir when unset.
    pub temp_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: None,
            tolerance: DEFAULT_TOLERANCE,
            use_cnn: false,
            use_gray: true,
            temp_dir: None,
        }
    }
}

impl Settings {
    /// Load from `TINYFACE_*` environment variables with defaults.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parsed = |key: &str| var(key).and_then(|v| v.trim().parse().ok());
        let flag = |key: &str, default: bool| var(key).and_then(|v| parse_flag(&v)).unwrap_or(default);

        Self {
            model_path: var("TINYFACE_MODEL_DIR").filter(|v| !v.is_empty()).map(PathBuf::from),
            tolerance: parsed("TINYFACE_TOLERANCE").unwrap_or(defaults.tolerance),
            use_cnn: flag("TINYFACE_USE_CNN", defaults.use_cnn),
            use_gray: flag("TINYFACE_USE_GRAY", defaults.use_gray),
            temp_dir: var("TINYFACE_TEMP_DIR").filter(|v| !v.is_empty()).map(PathBuf::from),
        }
    }

    /// Parse a TOML settings file. Missing fields take their default.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let settings: Settings =
            toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::Config(format!(
                "tolerance must be a finite, non-negative distance, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    pub fn detector_mode(&self) -> DetectorMode {
        if self.use_cnn {
            DetectorMode::Cnn
        } else {
            DetectorMode::Standard
        }
    }

    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Everything a [`Recognizer`](crate::Recognizer) is built from.
#[derive(Default)]
pub struct RecognizerConfig {
    pub settings: Settings,
    pub loader: Option<Box<dyn SampleLoader>>,
    pub saver: Option<Box<dyn SampleSaver>>,
}

impl std::fmt::Debug for RecognizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerConfig")
            .field("settings", &self.settings)
            .field("loader", &self.loader.is_some())
            .field("saver", &self.saver.is_some())
            .finish()
    }
}

impl RecognizerConfig {
    pub fn builder() -> RecognizerConfigBuilder {
        RecognizerConfigBuilder::default()
    }
}

impl From<Settings> for RecognizerConfig {
    fn from(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }
}

#[derive(Default)]
pub struct RecognizerConfigBuilder {
    config: RecognizerConfig,
}

impl RecognizerConfigBuilder {
    /// Start from existing settings instead of the defaults.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.config.settings = settings;
        self
    }

    pub fn model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.settings.model_path = Some(path.into());
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.config.settings.tolerance = tolerance;
        self
    }

    pub fn use_cnn(mut self, use_cnn: bool) -> Self {
        self.config.settings.use_cnn = use_cnn;
        self
    }

    pub fn use_gray(mut self, use_gray: bool) -> Self {
        self.config.settings.use_gray = use_gray;
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.settings.temp_dir = Some(dir.into());
        self
    }

    pub fn loader(mut self, loader: impl SampleLoader + 'static) -> Self {
        self.config.loader = Some(Box::new(loader));
        self
    }

    pub fn saver(mut self, saver: impl SampleSaver + 'static) -> Self {
        self.config.saver = Some(Box::new(saver));
        self
    }

    pub fn build(self) -> RecognizerConfig {
        self.config
    }
}
