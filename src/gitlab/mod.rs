//! GitLab API module, the source of the projects.
pub(crate) mod config;
pub(crate) mod platform;
pub(crate) mod repo;

/// GitLab URL
const GITLAB_URL: &str = "https://gitlab.com";

/// Path of the v4 API, relative to the instance URL
const GITLAB_API_PATH: &str = "api/v4";

/// Header holding the token
const GITLAB_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Header holding the next page number, empty on the last page
const GITLAB_NEXT_PAGE_HEADER: &str = "x-next-page";

/// Default number of projects per page
const GITLAB_PER_PAGE: u8 = 100;
