//! Migrate projects from the source to the destination platform
use std::fs::remove_dir_all;
use std::path::PathBuf;

use log::{error, info};

use crate::errors::{MirrorMoverError, MirrorMoverErrorKind};
use crate::platform::{MirrorTool, RepoDestination};
use crate::reconcile::Reconciliation;
use crate::utils::{NewRepository, SourceProject};

/// Project whose migration failed
#[derive(Debug)]
pub struct FailedMigration {
    /// Name of the project
    pub name: String,

    /// What went wrong
    pub error: MirrorMoverError,
}

/// Outcome of a run: every source project ends up in exactly one list
#[derive(Debug, Default)]
pub struct MigrationReport {
    /// Projects created and mirrored on the destination
    pub migrated: Vec<String>,

    /// Projects whose migration failed
    pub failed: Vec<FailedMigration>,

    /// Projects already present on the destination
    pub skipped: Vec<String>,
}

impl MigrationReport {
    /// Empty report carrying the skipped projects
    pub fn new(skipped: Vec<String>) -> Self {
        Self {
            skipped,
            ..Default::default()
        }
    }

    /// Print the summary to the console
    pub fn print(&self) {
        println!("Migrated: {}", self.migrated.len());
        if !self.failed.is_empty() {
            println!("Failed: {}", self.failed.len());
            for failed in &self.failed {
                println!("- {}: {}", failed.name, failed.error);
            }
        }
        if !self.skipped.is_empty() {
            println!("Skipped: [{}]", self.skipped.join(", "));
        }
    }
}

/// Creates and mirrors the candidates one after the other
pub(crate) struct Migrator<'a> {
    /// Platform the repositories are created on
    destination: &'a dyn RepoDestination,

    /// Clone and push implementation
    mirror: &'a dyn MirrorTool,

    /// Directory holding one mirror clone per project
    clone_root: PathBuf,
}

impl<'a> Migrator<'a> {
    /// Create a migrator cloning under `clone_root`
    pub(crate) fn new(
        destination: &'a dyn RepoDestination,
        mirror: &'a dyn MirrorTool,
        clone_root: PathBuf,
    ) -> Self {
        Self {
            destination,
            mirror,
            clone_root,
        }
    }

    /// Migrate every candidate, in order. A failure only skips its candidate.
    pub(crate) async fn migrate_all(&self, reconciliation: Reconciliation) -> MigrationReport {
        let mut report = MigrationReport::new(reconciliation.skipped);
        let total = reconciliation.candidates.len();
        for (idx, project) in reconciliation.candidates.into_iter().enumerate() {
            info!("[{}/{}] {}", idx + 1, total, project.name);
            match self.migrate_one(&project).await {
                Ok(()) => {
                    println!("{}: Successfully migrated", project.name);
                    report.migrated.push(project.name);
                }
                Err(e) => {
                    error!("{}: {e}", project.name);
                    report.failed.push(FailedMigration {
                        name: project.name,
                        error: e,
                    });
                }
            }
        }
        report
    }

    /// Create the repository, clone the project, push the mirror
    async fn migrate_one(&self, project: &SourceProject) -> Result<(), MirrorMoverError> {
        println!("Creating destination repository for {}", project.name);
        let repo = self
            .destination
            .create_repo(NewRepository::from(project))
            .await
            .map_err(|e| e.with_kind(MirrorMoverErrorKind::Create))?;

        let clone_path = self.clone_root.join(&project.name);
        if clone_path.exists() {
            remove_dir_all(&clone_path)
                .map_err(|e| MirrorMoverError::with_source(MirrorMoverErrorKind::Filesystem, e))?;
        }

        println!("Cloning {} to push up", project.clone_url);
        self.mirror
            .mirror_clone(&project.clone_url, &clone_path)
            .await?;

        println!("Pushing up project {}", project.name);
        self.mirror.mirror_push(&clone_path, &repo.push_url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformFuture;
    use crate::utils::DestinationRepository;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records every call, in order
    #[derive(Default)]
    struct Journal(Mutex<Vec<String>>);

    impl Journal {
        fn push(&self, entry: String) {
            self.0.lock().unwrap().push(entry);
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    #[derive(Default)]
    struct FakeDestination {
        journal: Journal,
        refuse: Vec<String>,
    }

    impl RepoDestination for FakeDestination {
        fn list_repos(&self) -> PlatformFuture<'_, Vec<DestinationRepository>> {
            Box::pin(async { Ok(vec![]) })
        }

        fn create_repo(&self, repo: NewRepository) -> PlatformFuture<'_, DestinationRepository> {
            Box::pin(async move {
                self.journal.push(format!("create {}", repo.name));
                if self.refuse.contains(&repo.name) {
                    return Err(MirrorMoverError::new(MirrorMoverErrorKind::Reqwest)
                        .with_text("name already exists on this account"));
                }
                Ok(DestinationRepository {
                    push_url: format!("git@github.com:acme/{}.git", repo.name),
                    name: repo.name,
                })
            })
        }

        fn get_owner(&self) -> &str {
            "acme"
        }

        fn get_remote_url(&self) -> &str {
            "https://api.github.com"
        }
    }

    #[derive(Default)]
    struct FakeMirror {
        journal: Journal,
        failing_clones: Vec<String>,
    }

    impl MirrorTool for FakeMirror {
        fn mirror_clone(&self, url: &str, destination: &Path) -> PlatformFuture<'_, ()> {
            let url = url.to_string();
            let destination = destination.to_path_buf();
            Box::pin(async move {
                self.journal.push(format!("clone {url}"));
                if self.failing_clones.contains(&url) {
                    return Err(MirrorMoverError::new(MirrorMoverErrorKind::Process));
                }
                std::fs::create_dir_all(destination)?;
                Ok(())
            })
        }

        fn mirror_push(&self, repo_dir: &Path, url: &str) -> PlatformFuture<'_, ()> {
            let entry = format!("push {} {url}", repo_dir.display());
            Box::pin(async move {
                self.journal.push(entry);
                Ok(())
            })
        }
    }

    fn project(name: &str) -> SourceProject {
        SourceProject {
            name: name.to_string(),
            clone_url: format!("git@gitlab.com:acme/{name}.git"),
            ..Default::default()
        }
    }

    fn candidates(names: &[&str]) -> Reconciliation {
        Reconciliation {
            candidates: names.iter().map(|name| project(name)).collect(),
            skipped: vec!["billing-svc".to_string()],
        }
    }

    #[tokio::test]
    async fn migrates_with_normalized_name() {
        let dir = tempfile::tempdir().unwrap();
        let destination = FakeDestination::default();
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&destination, &mirror, dir.path().to_path_buf());

        let report = migrator.migrate_all(candidates(&["Payments API"])).await;

        assert_eq!(report.migrated, vec!["Payments API".to_string()]);
        assert_eq!(report.skipped, vec!["billing-svc".to_string()]);
        assert!(report.failed.is_empty());
        assert_eq!(
            destination.journal.entries(),
            vec!["create Payments-API".to_string()]
        );
        let clone_path = dir.path().join("Payments API");
        assert_eq!(
            mirror.journal.entries(),
            vec![
                "clone git@gitlab.com:acme/Payments API.git".to_string(),
                format!(
                    "push {} git@github.com:acme/Payments-API.git",
                    clone_path.display()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn failed_creation_skips_clone_and_push() {
        let dir = tempfile::tempdir().unwrap();
        let destination = FakeDestination {
            refuse: vec!["web".to_string()],
            ..Default::default()
        };
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&destination, &mirror, dir.path().to_path_buf());

        let report = migrator.migrate_all(candidates(&["web", "api"])).await;

        assert_eq!(report.migrated, vec!["api".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "web");
        assert_eq!(report.failed[0].error.kind(), &MirrorMoverErrorKind::Create);
        assert!(mirror
            .journal
            .entries()
            .iter()
            .all(|entry| !entry.contains("acme/web")));
    }

    #[tokio::test]
    async fn failed_cleanup_skips_clone() {
        let dir = tempfile::tempdir().unwrap();
        // a plain file where the clone directory goes can't be removed as a directory
        std::fs::write(dir.path().join("web"), b"not a directory").unwrap();
        let destination = FakeDestination::default();
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&destination, &mirror, dir.path().to_path_buf());

        let report = migrator.migrate_all(candidates(&["web"])).await;

        assert!(report.migrated.is_empty());
        assert_eq!(
            report.failed[0].error.kind(),
            &MirrorMoverErrorKind::Filesystem
        );
        assert_eq!(
            destination.journal.entries(),
            vec!["create web".to_string()]
        );
        assert!(mirror.journal.entries().is_empty());
    }

    #[tokio::test]
    async fn failed_clone_skips_push() {
        let dir = tempfile::tempdir().unwrap();
        let destination = FakeDestination::default();
        let mirror = FakeMirror {
            failing_clones: vec!["git@gitlab.com:acme/web.git".to_string()],
            ..Default::default()
        };
        let migrator = Migrator::new(&destination, &mirror, dir.path().to_path_buf());

        let report = migrator.migrate_all(candidates(&["web", "api"])).await;

        assert_eq!(report.migrated, vec!["api".to_string()]);
        assert_eq!(report.failed[0].name, "web");
        assert_eq!(report.failed[0].error.kind(), &MirrorMoverErrorKind::Process);
        let pushes: Vec<String> = mirror
            .journal
            .entries()
            .into_iter()
            .filter(|entry| entry.starts_with("push"))
            .collect();
        assert_eq!(pushes.len(), 1);
        assert!(pushes[0].ends_with("acme/api.git"));
    }

    #[tokio::test]
    async fn stale_clone_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("web").join("refs");
        std::fs::create_dir_all(&stale).unwrap();
        std::fs::write(stale.join("old"), b"stale").unwrap();
        let destination = FakeDestination::default();
        let mirror = FakeMirror::default();
        let migrator = Migrator::new(&destination, &mirror, dir.path().to_path_buf());

        let report = migrator.migrate_all(candidates(&["web"])).await;

        assert_eq!(report.migrated, vec!["web".to_string()]);
        assert!(!stale.exists());
        assert!(dir.path().join("web").is_dir());
    }
}
