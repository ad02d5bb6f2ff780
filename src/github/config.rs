//! Github configuration
use super::{platform::GithubPlatform, GITHUB_API_URL, GITHUB_PER_PAGE};
use crate::{
    config::{pick_value, validate_url, MirrorMoverConfig},
    config_password,
    errors::MirrorMoverError,
};
use serde::{Deserialize, Serialize};

/// Github configuration
#[derive(Deserialize, Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct GithubConfig {
    /// Organization receiving the repositories, empty for your own account
    pub org: Option<String>,

    /// Github token
    pub token: Option<String>,

    /// API URL
    pub url: Option<String>,

    /// Repositories per page
    pub per_page: Option<u8>,
}

impl GithubConfig {
    /// Get the github platform
    /// # Errors
    /// Error if the URL is invalid or the token can't be read or saved
    pub fn get_platform(config: &mut MirrorMoverConfig) -> Result<GithubPlatform, MirrorMoverError> {
        let file = config.config_data.github.clone().unwrap_or_default();
        let cli = &config.cli_args;
        let org = pick_value(&cli.github_org, &file.org).unwrap_or_default();
        let url =
            pick_value(&cli.github_url, &file.url).unwrap_or_else(|| GITHUB_API_URL.to_string());
        let url = validate_url(&url)?;
        let per_page = file.per_page.unwrap_or(GITHUB_PER_PAGE);
        let token = match cli.github_token.clone() {
            Some(token) => token,
            None => config_password!(
                config,
                github,
                GithubConfig,
                token,
                "your github token (https://github.com/settings/personal-access-tokens)"
            ),
        };
        Ok(GithubPlatform::new(url, org, token, per_page))
    }
}
