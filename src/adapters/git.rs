use crate::domain::ports::{CommandRunner, RepositoryCloner, VersionControl};
use crate::utils::error::{OrbitError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;

/// Drives the `git` executable for one working tree.
pub struct GitCli<R: CommandRunner> {
    runner: R,
    binary: String,
    workdir: PathBuf,
}

impl<R: CommandRunner> GitCli<R> {
    pub fn new(runner: R, binary: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            binary: binary.into(),
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    async fn git(&self, args: &[&str], cwd: Option<&Path>) -> Result<()> {
        let output = self
            .runner
            .run(&self.binary, args, cwd)
            .await
            .map_err(|e| OrbitError::CommandFailed {
                program: self.binary.clone(),
                status: "not started".to_string(),
                stderr: e.to_string(),
            })?;

        if output.success() {
            return Ok(());
        }

        Err(OrbitError::CommandFailed {
            program: format!("{} {}", self.binary, args.first().copied().unwrap_or_default()),
            status: output.status_text(),
            stderr: output.diagnostic(),
        })
    }
}

#[async_trait]
impl<R: CommandRunner> VersionControl for GitCli<R> {
    /// Stages every change in the repository, deletions included.
    async fn stage_all(&self) -> Result<()> {
        self.git(&["add", "-A", ":/"], Some(&self.workdir)).await
    }

    async fn commit(&self) -> Result<()> {
        self.git(
            &["commit", "-m", "", "--allow-empty-message", "--allow-empty"],
            Some(&self.workdir),
        )
        .await
    }

    async fn push(&self) -> Result<()> {
        self.git(&["push"], Some(&self.workdir)).await
    }
}

#[async_trait]
impl<R: CommandRunner> RepositoryCloner for GitCli<R> {
    async fn clone_repository(&self, url: &Url, destination: &Path) -> Result<()> {
        let destination_str = destination.to_string_lossy();
        self.git(&["clone", url.as_str(), &destination_str], Some(&self.workdir))
            .await
            .map_err(|e| OrbitError::CloneFailed {
                url: url.to_string(),
                diagnostic: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::testing::RecordingRunner;

    #[tokio::test]
    async fn test_sync_commands_run_in_workdir() {
        let runner = RecordingRunner::new();
        let git = GitCli::new(runner.clone(), "git", "/srv/project");

        git.stage_all().await.unwrap();
        git.commit().await.unwrap();
        git.push().await.unwrap();

        let invocations = runner.invocations();
        let args: Vec<Vec<String>> = invocations.iter().map(|i| i.args.clone()).collect();
        assert_eq!(
            args,
            vec![
                vec!["add", "-A", ":/"],
                vec!["commit", "-m", "", "--allow-empty-message", "--allow-empty"],
                vec!["push"],
            ]
        );
        assert!(invocations
            .iter()
            .all(|i| i.program == "git" && i.cwd.as_deref() == Some(Path::new("/srv/project"))));
    }

    #[tokio::test]
    async fn test_push_failure_reports_stderr() {
        let runner = RecordingRunner::new().then_output(1, "", "fatal: no upstream branch\n");
        let git = GitCli::new(runner, "git", ".");

        let err = git.push().await.unwrap_err();

        match err {
            OrbitError::CommandFailed { program, status, stderr } => {
                assert_eq!(program, "git push");
                assert_eq!(status, "exit status 1");
                assert_eq!(stderr, "fatal: no upstream branch");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clone_into_named_directory() {
        let runner = RecordingRunner::new();
        let git = GitCli::new(runner.clone(), "git", ".");
        let url = Url::parse("http://mew.hackedu.us:4000/git/p1.git").unwrap();

        git.clone_repository(&url, Path::new("hello")).await.unwrap();

        assert_eq!(
            runner.invocations()[0].args,
            vec!["clone", "http://mew.hackedu.us:4000/git/p1.git", "hello"]
        );
    }

    #[tokio::test]
    async fn test_clone_failure_is_clone_failed() {
        let runner = RecordingRunner::new().then_output(128, "", "fatal: repository not found");
        let git = GitCli::new(runner, "git", ".");
        let url = Url::parse("http://localhost/git/missing.git").unwrap();

        let err = git.clone_repository(&url, Path::new("missing")).await.unwrap_err();

        match err {
            OrbitError::CloneFailed { url, diagnostic } => {
                assert_eq!(url, "http://localhost/git/missing.git");
                assert!(diagnostic.contains("repository not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_git_binary() {
        let runner = RecordingRunner::new().then_spawn_error(std::io::ErrorKind::NotFound);
        let git = GitCli::new(runner, "git", ".");

        let err = git.stage_all().await.unwrap_err();
        assert!(matches!(err, OrbitError::CommandFailed { ref status, .. } if status == "not started"));
    }
}
