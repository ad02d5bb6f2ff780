//! # mirror-mover
//!
//! Mirror every GitLab project of a group (or of your account) to GitHub
//!
//! Projects already present on GitHub, compared by name with spaces replaced
//! by hyphens and ignoring case, are skipped. Every other project gets a new
//! GitHub repository, then is copied with `git clone --mirror` and
//! `git push --mirror` through a working copy under `./Repositories`.
//!
//! ## Usage
//!
//! ```txt
//! Usage: mirror-mover [OPTIONS]
//!
//! Options:
//!      --gitlab-group <GITLAB_GROUP>  GitLab group to migrate [env: GITLAB_GROUP=] [aliases: gitlaborg]
//!      --gitlab-token <GITLAB_TOKEN>  GitLab access token [env: GITLAB_TOKEN] [aliases: gitlabtoken]
//!      --gitlab-url <GITLAB_URL>      GitLab instance URL [env: GITLAB_URL=]
//!      --github-org <GITHUB_ORG>      GitHub organization receiving the repositories [env: GITHUB_ORG=] [aliases: githuborg]
//!      --github-token <GITHUB_TOKEN>  GitHub access token [env: GITHUB_TOKEN] [aliases: githubtoken]
//!      --github-url <GITHUB_URL>      GitHub API URL [env: GITHUB_API_URL=]
//!      --git <GIT>                    git executable used to clone and push [env: MIRROR_MOVER_GIT=] [default: git]
//!  -c, --config <CONFIG>              Custom configuration file path
//!      --show-config-path             Show the current config path
//!  -v, --verbose...                   Verbose mode (-v, -vv, -vvv)
//!  -h, --help                         Print help
//! ```
//!
//! A repository created on GitHub is not deleted when its clone or push
//! fails afterwards: it stays there, empty.

#![warn(clippy::all, rust_2018_idioms)]
#![deny(
    missing_docs,
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![warn(clippy::multiple_crate_versions)]

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod macros;
pub(crate) mod mirror;
pub(crate) mod platform;
pub(crate) mod reconcile;
pub(crate) mod sync;
pub(crate) mod utils;
pub(crate) use macros::config_password;

mod github;
mod gitlab;

pub use cli::{mirror_mover_main, MirrorMoverCli};
pub use config::MirrorMoverConfig;
pub use errors::{MirrorMoverError, MirrorMoverErrorKind};
pub use utils::main_sync;
