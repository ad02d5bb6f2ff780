//! Gitlab configuration
use super::{platform::GitlabPlatform, GITLAB_PER_PAGE, GITLAB_URL};
use crate::{
    config::{pick_value, validate_url, MirrorMoverConfig},
    config_password,
    errors::MirrorMoverError,
};
use serde::{Deserialize, Serialize};

/// Gitlab configuration
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GitlabConfig {
    /// Group to migrate, empty for your own projects
    pub group: Option<String>,

    /// Gitlab token
    pub token: Option<String>,

    /// Instance URL
    pub url: Option<String>,

    /// Projects per page
    pub per_page: Option<u8>,
}

impl GitlabConfig {
    /// Get the gitlab platform
    /// # Errors
    /// Error if the URL is invalid or the token can't be read or saved
    pub fn get_platform(config: &mut MirrorMoverConfig) -> Result<GitlabPlatform, MirrorMoverError> {
        let file = config.config_data.gitlab.clone().unwrap_or_default();
        let cli = &config.cli_args;
        let group = pick_value(&cli.gitlab_group, &file.group).unwrap_or_default();
        let url = pick_value(&cli.gitlab_url, &file.url).unwrap_or_else(|| GITLAB_URL.to_string());
        let url = validate_url(&url)?;
        let per_page = file.per_page.unwrap_or(GITLAB_PER_PAGE);
        let token = match cli.gitlab_token.clone() {
            Some(token) => token,
            None => config_password!(
                config,
                gitlab,
                GitlabConfig,
                token,
                "your gitlab token (https://gitlab.com/-/user_settings/personal_access_tokens)"
            ),
        };
        Ok(GitlabPlatform::new(url, group, token, per_page))
    }
}
