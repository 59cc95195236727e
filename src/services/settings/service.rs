use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::AppSettings;

const SETTINGS_FILE: &str = "settings.toml";
const DATABASE_FILE: &str = "tasks.db";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service pointing at `settings.toml` in the platform config directory.
    pub fn from_project_dirs() -> Result<Self> {
        let dirs = project_dirs()?;
        Ok(Self::new(dirs.config_dir().join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings, falling back to defaults when the file does not exist yet.
    pub fn load(&self) -> Result<AppSettings> {
        if !self.path.exists() {
            log::info!("no settings at {}, using defaults", self.path.display());
            return Ok(AppSettings::default());
        }

        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read settings from {}", self.path.display()))?;
        let settings: AppSettings = toml::from_str(&data)
            .with_context(|| format!("failed to parse settings in {}", self.path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {}: {}", self.path.display(), e))?;
        Ok(settings)
    }

    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create dir {}", parent.display()))?;
        }
        let data = toml::to_string_pretty(settings).context("failed to serialize settings")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write settings to {}", self.path.display()))?;
        Ok(())
    }

    /// Reset the file to defaults.
    pub fn reset(&self) -> Result<AppSettings> {
        let defaults = AppSettings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "TaskTimeline", "TaskTimeline")
        .ok_or_else(|| anyhow!("could not determine the home directory"))
}

/// Database file to use: the configured path, or `tasks.db` in the platform data directory.
pub fn resolve_database_path(settings: &AppSettings) -> Result<PathBuf> {
    if let Some(path) = &settings.database_path {
        return Ok(path.clone());
    }
    let dirs = project_dirs()?;
    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create dir {}", data_dir.display()))?;
    Ok(data_dir.join(DATABASE_FILE))
}
