//! Utility functions
use std::io::{stdin, stdout, BufRead, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::join;

use crate::config::MirrorMoverConfig;
use crate::errors::{MirrorMoverError, MirrorMoverErrorKind};
use crate::github::config::GithubConfig;
use crate::gitlab::config::GitlabConfig;
use crate::mirror::GitCli;
use crate::platform::{MirrorTool, ProjectSource, RepoDestination};
use crate::reconcile::{normalize_name, reconcile};
use crate::sync::{MigrationReport, Migrator};

/// Directory, relative to the working directory, holding the mirror clones
pub const CLONE_DIR: &str = "Repositories";

/// Visibility of a source project
#[derive(Deserialize, Serialize, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone
    Public,
    /// Visible to every logged-in user
    Internal,
    /// Visible to members only
    #[default]
    Private,
}

/// Project found on the source platform
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct SourceProject {
    /// Name of the project
    pub name: String,

    /// Description of the project, may be empty
    pub description: String,

    /// Visibility of the project
    pub visibility: Visibility,

    /// Default branch, empty for a project without commits
    pub default_branch: String,

    /// Tags (topics) of the project
    pub tags: Vec<String>,

    /// URL to clone the project from
    pub clone_url: String,
}

impl SourceProject {
    /// Name the project gets on the destination
    pub fn destination_name(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Repository found on the destination platform
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct DestinationRepository {
    /// Name of the repository
    pub name: String,

    /// URL to push the mirror to
    pub push_url: String,
}

/// Repository to create on the destination platform
#[derive(Serialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct NewRepository {
    /// Name of the repository
    pub name: String,

    /// Description of the repository
    pub description: String,

    /// Whether the repository is private
    pub private: bool,

    /// Default branch of the repository
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_branch: String,

    /// Topics of the repository
    pub topics: Vec<String>,
}

impl From<&SourceProject> for NewRepository {
    fn from(project: &SourceProject) -> Self {
        NewRepository {
            name: project.destination_name(),
            description: project.description.clone(),
            private: project.visibility == Visibility::Private,
            default_branch: project.default_branch.clone(),
            topics: project.tags.clone(),
        }
    }
}

/// Answer given to the confirmation prompt
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Confirmation {
    /// The user answered yes
    Proceed,
    /// The user answered anything else
    Declined,
    /// stdin was closed before any answer
    Cancelled,
}

/// Read one line, without its line ending. `None` on end of input.
/// # Errors
/// Error if the reader fails
pub(crate) fn read_answer<R: BufRead>(reader: &mut R) -> Result<Option<String>, MirrorMoverError> {
    let mut s = String::new();
    let read = reader
        .read_line(&mut s)
        .map_err(|e| MirrorMoverError::with_source(MirrorMoverErrorKind::Prompt, e))?;
    if read == 0 {
        return Ok(None);
    }
    if let Some('\n') = s.chars().next_back() {
        s.pop();
    }
    if let Some('\r') = s.chars().next_back() {
        s.pop();
    }
    Ok(Some(s))
}

/// Show the projects and ask for confirmation before touching the destination
/// # Errors
/// Error if stdin can't be read or stdout can't be written
pub(crate) fn confirm_migration<R: BufRead, W: Write>(
    project_names: &[&str],
    skipped: usize,
    reader: &mut R,
    writer: &mut W,
) -> Result<Confirmation, MirrorMoverError> {
    writeln!(writer, "Are you sure you wish to copy the following repositories?")?;
    for name in project_names {
        writeln!(writer, "{name}")?;
    }
    if skipped > 0 {
        writeln!(
            writer,
            "({skipped} of them already exist at the destination and will be skipped)"
        )?;
    }
    writeln!(writer, "[yes/No]")?;
    writer.flush()?;
    Ok(match read_answer(reader)? {
        None => Confirmation::Cancelled,
        Some(answer) if answer.eq_ignore_ascii_case("yes") => Confirmation::Proceed,
        Some(_) => Confirmation::Declined,
    })
}

/// Get password from the user
pub(crate) fn get_password() -> Result<String, MirrorMoverError> {
    rpassword::read_password()
        .map_err(|e| MirrorMoverError::new_with_source("Error reading password", e))
}

/// Describe the owner of a listing
fn describe_owner(owner: &str) -> String {
    if owner.is_empty() {
        "your account".to_string()
    } else {
        format!("'{owner}'")
    }
}

/// List both sides, ask for confirmation, then migrate the missing projects.
///
/// Returns `None` when the user declined or cancelled.
/// # Errors
/// Error if a listing fails or the confirmation can't be read
pub(crate) async fn run_migration<R: BufRead, W: Write>(
    source: &dyn ProjectSource,
    destination: &dyn RepoDestination,
    mirror: &dyn MirrorTool,
    clone_root: PathBuf,
    reader: &mut R,
    writer: &mut W,
) -> Result<Option<MigrationReport>, MirrorMoverError> {
    println!(
        "Listing projects of {} on {}",
        describe_owner(source.get_owner()),
        source.get_remote_url()
    );
    println!(
        "Listing repositories of {} on {}",
        describe_owner(destination.get_owner()),
        destination.get_remote_url()
    );
    let (projects, repos) = join!(source.list_projects(), destination.list_repos());
    let projects = projects?;
    let repos = repos?;
    println!("Number of projects in source: {}", projects.len());
    println!("Number of repositories in destination: {}", repos.len());

    let all_names: Vec<String> = projects.iter().map(|p| p.name.clone()).collect();
    let reconciliation = reconcile(projects, &repos);
    if reconciliation.candidates.is_empty() {
        println!("Nothing to migrate");
        return Ok(Some(MigrationReport::new(reconciliation.skipped)));
    }

    let names: Vec<&str> = all_names.iter().map(String::as_str).collect();
    match confirm_migration(&names, reconciliation.skipped.len(), reader, writer)? {
        Confirmation::Proceed => {}
        Confirmation::Declined | Confirmation::Cancelled => {
            writeln!(writer, "Process cancelled, exiting.")?;
            return Ok(None);
        }
    }

    let migrator = Migrator::new(destination, mirror, clone_root);
    Ok(Some(migrator.migrate_all(reconciliation).await))
}

/// Main function to migrate repositories
/// # Errors
/// Error if the configuration is invalid, a listing fails or the prompt fails
pub async fn main_sync(config: MirrorMoverConfig) -> Result<(), MirrorMoverError> {
    let mut config = config;
    let source = GitlabConfig::get_platform(&mut config)?;
    let destination = GithubConfig::get_platform(&mut config)?;
    let clone_root = std::env::current_dir()
        .map_err(|e| MirrorMoverError::with_source(MirrorMoverErrorKind::Filesystem, e))?
        .join(CLONE_DIR);

    let mirror = GitCli::with_program(config.cli_args.git.clone());
    let stdin = stdin();
    let mut reader = stdin.lock();
    let mut writer = stdout();
    let report = run_migration(
        &source,
        &destination,
        &mirror,
        clone_root,
        &mut reader,
        &mut writer,
    )
    .await?;
    if let Some(report) = report {
        report.print();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlatformFuture;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Mutex;

    fn ask(input: &str) -> (Confirmation, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut writer = Vec::new();
        let answer =
            confirm_migration(&["billing-svc", "Payments API"], 0, &mut reader, &mut writer)
                .unwrap();
        (answer, String::from_utf8(writer).unwrap())
    }

    #[test]
    fn confirmation_accepts_yes_in_any_case() {
        assert_eq!(ask("yes\n").0, Confirmation::Proceed);
        assert_eq!(ask("Yes\n").0, Confirmation::Proceed);
        assert_eq!(ask("YES\r\n").0, Confirmation::Proceed);
        assert_eq!(ask("yes").0, Confirmation::Proceed);
    }

    #[test]
    fn confirmation_declines_anything_else() {
        assert_eq!(ask("no\n").0, Confirmation::Declined);
        assert_eq!(ask("\n").0, Confirmation::Declined);
        assert_eq!(ask("y\n").0, Confirmation::Declined);
        assert_eq!(ask("yes please\n").0, Confirmation::Declined);
    }

    #[test]
    fn confirmation_cancelled_on_end_of_input() {
        assert_eq!(ask("").0, Confirmation::Cancelled);
    }

    #[test]
    fn confirmation_lists_projects_in_order() {
        let (_, shown) = ask("no\n");
        assert_eq!(
            shown,
            "Are you sure you wish to copy the following repositories?\n\
             billing-svc\nPayments API\n[yes/No]\n"
        );
    }

    #[test]
    fn new_repository_from_project() {
        let project = SourceProject {
            name: "Payments API".to_string(),
            description: "".to_string(),
            visibility: Visibility::Private,
            default_branch: "main".to_string(),
            tags: vec!["billing".to_string()],
            clone_url: "git@gitlab.com:acme/payments-api.git".to_string(),
        };
        let repo = NewRepository::from(&project);
        assert_eq!(repo.name, "Payments-API");
        assert!(repo.private);
        assert_eq!(repo.topics, vec!["billing".to_string()]);

        let internal = SourceProject {
            visibility: Visibility::Internal,
            ..project
        };
        assert!(!NewRepository::from(&internal).private);
    }

    struct FakeSource(Vec<SourceProject>);

    impl ProjectSource for FakeSource {
        fn list_projects(&self) -> PlatformFuture<'_, Vec<SourceProject>> {
            let projects = self.0.clone();
            Box::pin(async move { Ok(projects) })
        }

        fn get_owner(&self) -> &str {
            "acme"
        }

        fn get_remote_url(&self) -> &str {
            "https://gitlab.example"
        }
    }

    #[derive(Default)]
    struct FakeDestination {
        existing: Vec<DestinationRepository>,
        fail_listing: bool,
        created: Mutex<Vec<String>>,
    }

    impl RepoDestination for FakeDestination {
        fn list_repos(&self) -> PlatformFuture<'_, Vec<DestinationRepository>> {
            let repos = self.existing.clone();
            let fail = self.fail_listing;
            Box::pin(async move {
                if fail {
                    return Err(MirrorMoverError::new(MirrorMoverErrorKind::Fetch));
                }
                Ok(repos)
            })
        }

        fn create_repo(&self, repo: NewRepository) -> PlatformFuture<'_, DestinationRepository> {
            Box::pin(async move {
                self.created.lock().unwrap().push(repo.name.clone());
                Ok(DestinationRepository {
                    push_url: format!("git@github.example:acme/{}.git", repo.name),
                    name: repo.name,
                })
            })
        }

        fn get_owner(&self) -> &str {
            "acme"
        }

        fn get_remote_url(&self) -> &str {
            "https://api.github.example"
        }
    }

    struct NoopMirror;

    impl MirrorTool for NoopMirror {
        fn mirror_clone(&self, _url: &str, _destination: &Path) -> PlatformFuture<'_, ()> {
            Box::pin(async { Ok(()) })
        }

        fn mirror_push(&self, _repo_dir: &Path, _url: &str) -> PlatformFuture<'_, ()> {
            Box::pin(async { Ok(()) })
        }
    }

    fn project(name: &str) -> SourceProject {
        SourceProject {
            name: name.to_string(),
            clone_url: format!("git@gitlab.example:acme/{name}.git"),
            ..Default::default()
        }
    }

    fn existing(name: &str) -> DestinationRepository {
        DestinationRepository {
            name: name.to_string(),
            push_url: format!("git@github.example:acme/{name}.git"),
        }
    }

    #[tokio::test]
    async fn run_migrates_only_missing_projects() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource(vec![project("billing-svc"), project("Payments API")]);
        let destination = FakeDestination {
            existing: vec![existing("billing-svc")],
            ..Default::default()
        };
        let mut reader = Cursor::new(b"yes\n".to_vec());
        let mut writer = Vec::new();
        let report = run_migration(
            &source,
            &destination,
            &NoopMirror,
            dir.path().join(CLONE_DIR),
            &mut reader,
            &mut writer,
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(report.migrated, vec!["Payments API".to_string()]);
        assert_eq!(report.skipped, vec!["billing-svc".to_string()]);
        assert!(report.failed.is_empty());
        assert_eq!(
            *destination.created.lock().unwrap(),
            vec!["Payments-API".to_string()]
        );
    }

    #[tokio::test]
    async fn run_does_not_write_when_declined_or_cancelled() {
        for input in ["no\n", ""] {
            let dir = tempfile::tempdir().unwrap();
            let source = FakeSource(vec![project("Payments API")]);
            let destination = FakeDestination::default();
            let mut reader = Cursor::new(input.as_bytes().to_vec());
            let mut writer = Vec::new();
            let report = run_migration(
                &source,
                &destination,
                &NoopMirror,
                dir.path().join(CLONE_DIR),
                &mut reader,
                &mut writer,
            )
            .await
            .unwrap();

            assert!(report.is_none());
            assert!(destination.created.lock().unwrap().is_empty());
            let shown = String::from_utf8(writer).unwrap();
            assert!(shown.ends_with("Process cancelled, exiting.\n"));
        }
    }

    #[tokio::test]
    async fn run_skips_prompt_when_everything_exists() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource(vec![project("billing svc")]);
        let destination = FakeDestination {
            existing: vec![existing("Billing-Svc")],
            ..Default::default()
        };
        let mut reader = Cursor::new(Vec::new());
        let mut writer = Vec::new();
        let report = run_migration(
            &source,
            &destination,
            &NoopMirror,
            dir.path().join(CLONE_DIR),
            &mut reader,
            &mut writer,
        )
        .await
        .unwrap()
        .unwrap();

        assert!(writer.is_empty());
        assert!(report.migrated.is_empty());
        assert_eq!(report.skipped, vec!["billing svc".to_string()]);
    }

    #[tokio::test]
    async fn run_aborts_when_a_listing_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource(vec![project("Payments API")]);
        let destination = FakeDestination {
            fail_listing: true,
            ..Default::default()
        };
        let mut reader = Cursor::new(b"yes\n".to_vec());
        let mut writer = Vec::new();
        let err = run_migration(
            &source,
            &destination,
            &NoopMirror,
            dir.path().join(CLONE_DIR),
            &mut reader,
            &mut writer,
        )
        .await
        .unwrap_err();

        assert_eq!(err.kind(), &MirrorMoverErrorKind::Fetch);
        assert!(destination.created.lock().unwrap().is_empty());
    }
}
