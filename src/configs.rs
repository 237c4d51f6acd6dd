use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::generator::DEFAULT_SOURCE_LANG;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub translation: TranslationConfig,
    pub output: OutputConfig,
    pub service: ServiceConfig,
    pub overrides: Vec<OverrideEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
    pub language: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("en.json"),
            language: DEFAULT_SOURCE_LANG.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct TranslationConfig {
    pub target_languages: Vec<String>,
    /// Append every code the service supports after `target_languages`.
    pub include_supported: bool,
    pub delay_ms: u64,
    pub builtin_overrides: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_languages: vec!["ru".to_string()],
            include_supported: true,
            delay_ms: 500,
            builtin_overrides: true,
        }
    }
}

impl TranslationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct OutputConfig {
    /// Defaults to the directory holding the source file.
    pub primary_dir: Option<PathBuf>,
    pub secondary_dir: Option<PathBuf>,
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            primary_dir: None,
            secondary_dir: None,
            indent: 2,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct OverrideEntry {
    pub source: String,
    pub target: String,
    pub text: String,
    pub translation: String,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::parse(&config_str)
            .with_context(|| format!("Invalid config '{}'", path.display()))
    }

    pub fn parse(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Resolved paths, relative to `base_dir` unless absolute.
    pub fn source_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.source.path)
    }

    pub fn primary_dir(&self, base_dir: &Path) -> PathBuf {
        match &self.output.primary_dir {
            Some(dir) => base_dir.join(dir),
            None => self
                .source_path(base_dir)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base_dir.to_path_buf()),
        }
    }

    pub fn secondary_dir(&self, base_dir: &Path) -> Option<PathBuf> {
        self.output.secondary_dir.as_ref().map(|dir| base_dir.join(dir))
    }
}
