//! Find which source projects are missing on the destination
use crate::utils::{DestinationRepository, SourceProject};

/// Result of comparing the source projects with the destination repositories
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Reconciliation {
    /// Projects with no repository of the same name on the destination, in source order
    pub candidates: Vec<SourceProject>,

    /// Names of the projects already present on the destination, in source order
    pub skipped: Vec<String>,
}

/// Name a project gets on the destination: spaces become hyphens
pub fn normalize_name(name: &str) -> String {
    name.replace(' ', "-")
}

/// Whether a repository with the project's name already exists
fn exists_on_destination(project: &SourceProject, repos: &[DestinationRepository]) -> bool {
    let name = normalize_name(&project.name).to_lowercase();
    repos.iter().any(|repo| repo.name.to_lowercase() == name)
}

/// Split the source projects into migration candidates and skipped names
pub fn reconcile(projects: Vec<SourceProject>, repos: &[DestinationRepository]) -> Reconciliation {
    let mut reconciliation = Reconciliation::default();
    for project in projects {
        if exists_on_destination(&project, repos) {
            reconciliation.skipped.push(project.name);
        } else {
            reconciliation.candidates.push(project);
        }
    }
    reconciliation
}
