//! Application settings and their persistence.
//!
//! Settings live in one JSON file under the platform config directory. The
//! orchestrator receives them as an immutable snapshot per run; nothing
//! re-reads the file mid-analysis.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SrefkitError};

/// How an analysis run picks its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Always use the remote API.
    Remote,
    /// Always use the local engine.
    Local,
    /// Prefer remote when a credential is present, otherwise local.
    Auto,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Remote => f.write_str("remote"),
            AnalysisMode::Local => f.write_str("local"),
            AnalysisMode::Auto => f.write_str("auto"),
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = SrefkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(AnalysisMode::Remote),
            "local" => Ok(AnalysisMode::Local),
            "auto" => Ok(AnalysisMode::Auto),
            other => Err(SrefkitError::Settings(format!(
                "unknown analysis mode \"{other}\" (expected remote, local, or auto)"
            ))),
        }
    }
}

/// Local model variants the engine can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    /// 2B parameter model (fastest)
    #[serde(rename = "2b")]
    Qwen2Vl2B,
    /// 7B parameter model (balanced)
    #[serde(rename = "7b")]
    Qwen2Vl7B,
    /// 72B parameter model (highest quality)
    #[serde(rename = "72b")]
    Qwen2Vl72B,
}

impl ModelVariant {
    /// All variants, smallest first. Used by status listings.
    pub const ALL: [ModelVariant; 3] = [
        ModelVariant::Qwen2Vl2B,
        ModelVariant::Qwen2Vl7B,
        ModelVariant::Qwen2Vl72B,
    ];

    /// Directory name this variant's artifacts are cached under.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ModelVariant::Qwen2Vl2B => "qwen2-vl-2b",
            ModelVariant::Qwen2Vl7B => "qwen2-vl-7b",
            ModelVariant::Qwen2Vl72B => "qwen2-vl-72b",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ModelVariant {
    type Err = SrefkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "2b" => Ok(ModelVariant::Qwen2Vl2B),
            "7b" => Ok(ModelVariant::Qwen2Vl7B),
            "72b" => Ok(ModelVariant::Qwen2Vl72B),
            other => Err(SrefkitError::Settings(format!(
                "unknown model variant \"{other}\" (expected 2b, 7b, or 72b)"
            ))),
        }
    }
}

/// Application settings for analysis runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Current analysis mode.
    pub mode: AnalysisMode,
    /// Selected local model variant.
    pub local_variant: ModelVariant,
    /// Whether a remote failure falls back to the local engine.
    pub fallback_enabled: bool,
    /// Optional custom directory for the model cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_cache_dir: Option<PathBuf>,
    /// Optional custom endpoint for the local inference server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_endpoint: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Auto,
            local_variant: ModelVariant::Qwen2Vl2B,
            fallback_enabled: true,
            model_cache_dir: None,
            local_endpoint: None,
        }
    }
}

/// Loads and saves [`Settings`] as JSON in a config directory.
pub struct SettingsStore {
    config_dir: PathBuf,
}

impl SettingsStore {
    const FILE_NAME: &'static str = "settings.json";

    /// Store under the platform config directory (`<config>/srefkit/`).
    pub fn open() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SrefkitError::Config("Failed to get config directory".to_string()))?
            .join("srefkit");
        Ok(Self::at(config_dir))
    }

    /// Store rooted at an explicit directory.
    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Path of the settings file.
    pub fn path(&self) -> PathBuf {
        self.config_dir.join(Self::FILE_NAME)
    }

    /// Load settings, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<Settings> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&content).map_err(|e| {
            SrefkitError::Settings(format!("{} is not valid settings JSON: {e}", path.display()))
        })?;
        Ok(settings)
    }

    /// Save settings, creating the config directory if needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(self.path(), json)?;
        debug!(path = %self.path().display(), "settings saved");
        Ok(())
    }
}
