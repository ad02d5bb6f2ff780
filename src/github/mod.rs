//! GitHub API module, the destination of the repositories.
pub(crate) mod config;
pub(crate) mod platform;
pub(crate) mod repo;

/// GitHub API URL
const GITHUB_API_URL: &str = "https://api.github.com";

/// GitHub API Header
const GITHUB_API_HEADER: &str = "X-GitHub-Api-Version";

/// GitHub API Version
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Default number of repositories per page
const GITHUB_PER_PAGE: u8 = 100;
