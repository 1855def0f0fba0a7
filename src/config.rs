use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// Runtime settings read from `~/.datalayers/rc`
///
/// The rc file is a plain list of `key=value` lines:
///
/// ```text
/// # where the database lives (relative paths resolve next to the rc file)
/// data.location=./datalayers.db
/// # license assigned to a project's dataset when it is first created
/// dataset.license=1
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_location: PathBuf,
    pub default_license: Option<i64>,
}

impl Settings {
    /// Directory holding the rc file and, by default, the database
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".datalayers"))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("rc"))
    }

    /// Load settings from the rc file, falling back to defaults when it
    /// does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
            Self::parse(&content, &config_path)
        } else {
            Ok(Self::defaults(&Self::config_dir()?))
        }
    }

    fn defaults(config_dir: &Path) -> Self {
        Self {
            data_location: config_dir.join("datalayers.db"),
            default_license: None,
        }
    }

    /// Parse rc file content. Unknown keys are ignored.
    pub fn parse(content: &str, config_path: &Path) -> Result<Self> {
        let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
        let mut settings = Self::defaults(config_dir);

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "data.location" => {
                    let path = PathBuf::from(value);
                    // If path is relative, resolve relative to config file directory
                    settings.data_location = if path.is_relative() {
                        config_dir.join(path)
                    } else {
                        path
                    };
                }
                "dataset.license" => {
                    let id = value.parse::<i64>().ok().filter(|id| *id > 0).with_context(|| {
                        format!(
                            "Invalid dataset.license '{}' in {}. License ID must be a positive number.",
                            value,
                            config_path.display()
                        )
                    })?;
                    settings.default_license = Some(id);
                }
                _ => {}
            }
        }

        Ok(settings)
    }
}
