//! Gitlab project struct and conversion to SourceProject struct
use crate::utils::{SourceProject, Visibility};
use serde::Deserialize;

/// Gitlab project, as returned by the projects endpoints
#[derive(Deserialize, Default, Debug, Clone)]
pub struct GitlabProject {
    /// Project name
    pub name: String,

    /// Project description
    pub description: Option<String>,

    /// Project visibility
    #[serde(default)]
    pub visibility: Visibility,

    /// Default branch, missing on empty projects
    pub default_branch: Option<String>,

    /// Topics, since GitLab 14.5
    #[serde(default)]
    pub topics: Vec<String>,

    /// Topics, on older instances
    #[serde(default)]
    pub tag_list: Vec<String>,

    /// SSH clone URL
    pub ssh_url_to_repo: String,
}

impl From<GitlabProject> for SourceProject {
    fn from(project: GitlabProject) -> Self {
        let tags = if project.topics.is_empty() {
            project.tag_list
        } else {
            project.topics
        };
        SourceProject {
            name: project.name,
            description: project.description.unwrap_or_default(),
            visibility: project.visibility,
            default_branch: project.default_branch.unwrap_or_default(),
            tags,
            clone_url: project.ssh_url_to_repo,
        }
    }
}
