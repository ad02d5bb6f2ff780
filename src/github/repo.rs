//! Github Repo struct and conversion to DestinationRepository struct
use crate::utils::DestinationRepository;
use serde::{Deserialize, Serialize};

/// Github Repo
#[derive(Deserialize, Default, Debug, Clone)]
pub struct RepoGithub {
    /// Repository name
    pub name: String,

    /// Owner and name, `owner/name`
    pub full_name: String,

    /// SSH URL, used to push
    pub ssh_url: String,
}

impl From<RepoGithub> for DestinationRepository {
    fn from(repo: RepoGithub) -> Self {
        DestinationRepository {
            name: repo.name,
            push_url: repo.ssh_url,
        }
    }
}

/// Body of the topics replacement request
#[derive(Serialize, Debug, Clone)]
pub struct TopicsGithub<'a> {
    /// Every topic of the repository
    pub names: &'a [String],
}
