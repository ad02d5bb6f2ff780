//! Mirror clone and push through the git binary
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::debug;
use tokio::process::Command;

use crate::errors::{MirrorMoverError, MirrorMoverErrorKind};
use crate::platform::{MirrorTool, PlatformFuture};

/// Runs `git clone --mirror` and `git push --mirror`
#[derive(Debug, Clone)]
pub struct GitCli {
    /// git executable
    program: OsString,
}

impl GitCli {
    /// Use `program` as the git executable
    pub fn with_program<S: Into<OsString>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run the program with `args`, inside `current_dir` if given
    async fn run(
        &self,
        args: Vec<OsString>,
        current_dir: Option<PathBuf>,
    ) -> Result<(), MirrorMoverError> {
        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = current_dir {
            command.current_dir(dir);
        }
        let output = command.output().await.map_err(|e| {
            MirrorMoverError::with_source(MirrorMoverErrorKind::Process, e)
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("{}: {}", self.program.to_string_lossy(), stderr.trim());
        }
        if !output.status.success() {
            let subcommand = args
                .first()
                .map(|a| a.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(
                MirrorMoverError::new(MirrorMoverErrorKind::Process).with_text(&format!(
                    "{} {} exited with {}",
                    self.program.to_string_lossy(),
                    subcommand,
                    output.status
                )),
            );
        }
        Ok(())
    }
}

impl MirrorTool for GitCli {
    fn mirror_clone(&self, url: &str, destination: &Path) -> PlatformFuture<'_, ()> {
        let args = vec![
            OsString::from("clone"),
            OsString::from("--mirror"),
            OsString::from(url),
            destination.as_os_str().to_owned(),
        ];
        Box::pin(async move { self.run(args, None).await })
    }

    fn mirror_push(&self, repo_dir: &Path, url: &str) -> PlatformFuture<'_, ()> {
        let args = vec![
            OsString::from("push"),
            OsString::from("--mirror"),
            OsString::from(url),
        ];
        let repo_dir = repo_dir.to_path_buf();
        Box::pin(async move { self.run(args, Some(repo_dir)).await })
    }
}
