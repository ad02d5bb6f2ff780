//! Configuration handling
use std::{
    fs::{create_dir_all, read_to_string, File},
    io::Write,
    path::{Path, PathBuf},
};

use home::home_dir;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    cli::MirrorMoverCli,
    errors::{MirrorMoverError, MirrorMoverErrorKind},
    github::config::GithubConfig,
    gitlab::config::GitlabConfig,
};

/// Configuration data
#[derive(Default, Clone, Debug)]
pub struct MirrorMoverConfig {
    /// path to the configuration file
    pub config_path: PathBuf,

    /// actual configuration data
    pub config_data: ConfigData,

    /// CLI arguments
    pub cli_args: MirrorMoverCli,
}

/// Content of the configuration file
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq, Eq)]
pub struct ConfigData {
    /// Gitlab configuration
    pub gitlab: Option<GitlabConfig>,

    /// Github configuration
    pub github: Option<GithubConfig>,
}

impl MirrorMoverConfig {
    /// Create a new Config object from the path given on the command line, or the default path
    /// # Errors
    /// Error if the config file can't be opened or parsed
    pub fn try_new(cli_args: MirrorMoverCli) -> Result<Self, MirrorMoverError> {
        let config_path = match cli_args.config.clone() {
            Some(p) => p,
            None => Self::get_config_path()?,
        };
        let config_data = Self::load(&config_path)?;
        Ok(MirrorMoverConfig {
            config_path,
            cli_args,
            config_data,
        })
    }

    /// Read and parse a config file
    /// # Errors
    /// Error if the file can't be read or isn't valid TOML
    pub fn load(path: &Path) -> Result<ConfigData, MirrorMoverError> {
        let contents = read_to_string(path).map_err(|e| {
            MirrorMoverError::new(MirrorMoverErrorKind::Config)
                .with_text(&format!("Unable to open {}: {e}", path.display()))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save the config data to the config file
    /// # Errors
    /// Error if the config file can't be created or written to
    pub fn save(&self) -> Result<(), MirrorMoverError> {
        let config_str = toml::to_string(&self.config_data)
            .map_err(|e| MirrorMoverError::new_with_source("Unable to serialize config", e))?;
        let mut file = File::create(&self.config_path)
            .map_err(|e| MirrorMoverError::new_with_source("Unable to create config file", e))?;
        file.write_all(config_str.as_bytes())
            .map_err(|e| MirrorMoverError::new_with_source("Unable to write to config file", e))
    }

    /// Get the path to the config file, creating an empty one if needed
    /// # Errors
    /// Error if the home directory can't be found
    pub fn get_config_path() -> Result<PathBuf, MirrorMoverError> {
        let home_dir = match home_dir() {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => return Err("Unable to get your home dir! home::home_dir() isn't working".into()),
        };
        let config_directory = home_dir.join(".config").join(".mirror-mover");
        let config_path = config_directory.join("config.toml");
        create_dir_all(config_directory)
            .map_err(|e| MirrorMoverError::new_with_source("Unable to create config dir", e))?;
        if !config_path.exists() {
            File::create(&config_path)
                .map_err(|e| MirrorMoverError::new_with_source("Unable to create config file", e))?;
        }
        Ok(config_path)
    }

    /// Update the config data and save it to the config file
    /// # Errors
    /// Error if fail to save config
    pub fn update(
        &mut self,
        updater_fn: impl FnOnce(&mut ConfigData),
    ) -> Result<(), MirrorMoverError> {
        updater_fn(&mut self.config_data);
        self.save()?;
        Ok(())
    }
}

/// Value given on the command line, else the one from the config file
pub(crate) fn pick_value(cli: &Option<String>, file: &Option<String>) -> Option<String> {
    cli.clone().or_else(|| file.clone())
}

/// Check that `url` is an http(s) URL and return it without trailing slash
/// # Errors
/// Error if the URL can't be parsed or isn't http(s)
pub(crate) fn validate_url(url: &str) -> Result<String, MirrorMoverError> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(url.trim_end_matches('/').to_string()),
        scheme => Err(MirrorMoverError::new(MirrorMoverErrorKind::Config)
            .with_text(&format!("Unsupported scheme '{scheme}' in {url}"))),
    }
}
