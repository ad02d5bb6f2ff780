//! Capabilities of the source and destination platforms
use std::{future::Future, path::Path, pin::Pin};

use crate::{
    errors::MirrorMoverError,
    utils::{DestinationRepository, NewRepository, SourceProject},
};

/// Boxed future returned by the platform traits
pub(crate) type PlatformFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, MirrorMoverError>> + Send + 'a>>;

/// Platform the projects are read from
pub trait ProjectSource: Sync + Send {
    /// List every project of the configured group (or of the account)
    fn list_projects(&self) -> PlatformFuture<'_, Vec<SourceProject>>;

    /// Group the projects are listed from, empty for the account itself
    fn get_owner(&self) -> &str;

    /// Base URL of the platform
    fn get_remote_url(&self) -> &str;
}

/// Platform the repositories are created on
pub trait RepoDestination: Sync + Send {
    /// List every repository of the configured organization (or of the account)
    fn list_repos(&self) -> PlatformFuture<'_, Vec<DestinationRepository>>;

    /// Create a repository and return it
    fn create_repo(&self, repo: NewRepository) -> PlatformFuture<'_, DestinationRepository>;

    /// Organization the repositories live in, empty for the account itself
    fn get_owner(&self) -> &str;

    /// Base URL of the platform
    fn get_remote_url(&self) -> &str;
}

/// Tool copying every ref of a repository
pub trait MirrorTool: Sync + Send {
    /// Mirror clone `url` into `destination`
    fn mirror_clone(&self, url: &str, destination: &Path) -> PlatformFuture<'_, ()>;

    /// Mirror push the repository at `repo_dir` to `url`
    fn mirror_push(&self, repo_dir: &Path, url: &str) -> PlatformFuture<'_, ()>;
}

/// Known platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformType {
    /// GitLab, the source
    Gitlab,
    /// GitHub, the destination
    Github,
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformType::Gitlab => write!(f, "gitlab"),
            PlatformType::Github => write!(f, "github"),
        }
    }
}
