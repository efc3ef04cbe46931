use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use progress_core::RangeType;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Review log to read, an anki collection or a json export.
    pub source: Option<PathBuf>,
    /// Hour of the day when a new day starts.
    pub cutoff_hour: u32,
    pub range: RangeType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            cutoff_hour: 4,
            range: RangeType::Month,
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("progress-stats").join("config.toml"))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).wrap_err_with(|| format!("creating {dir:?}"))?;
        }
        let toml = toml::to_string(&self)?;
        fs::write(path, toml).wrap_err_with(|| format!("writing config to {path:?}"))?;
        Ok(())
    }

    /// Loads the config, writing out the default one if there is none.
    ///
    /// A config that can't be parsed is moved out of the way and replaced.
    pub fn load(path: &Path) -> Result<Config> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let contents =
            fs::read_to_string(path).wrap_err_with(|| format!("reading config at {path:?}"))?;

        match toml::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(e) => {
                let invalid = path.with_file_name("invalid_config.toml");
                warn!("invalid config at {path:?}, moving it to {invalid:?}: {e}");
                fs::rename(path, &invalid)
                    .wrap_err_with(|| format!("moving invalid config to {invalid:?}"))?;
                let config = Self::default();
                config.save(path)?;
                Ok(config)
            }
        }
    }
}
