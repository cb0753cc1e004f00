//! Scripted `CommandRunner` shared by adapter tests.

use crate::domain::ports::{CommandOutput, CommandRunner};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

/// Replays queued replies in order; once the queue is empty every command
/// succeeds with no output.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    replies: Arc<Mutex<VecDeque<std::io::Result<CommandOutput>>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_output(self, code: i32, stdout: &str, stderr: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }));
        self
    }

    pub fn then_spawn_error(self, kind: std::io::ErrorKind) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(std::io::Error::from(kind)));
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> std::io::Result<CommandOutput> {
        self.invocations.lock().unwrap().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(CommandOutput {
                    code: Some(0),
                    ..CommandOutput::default()
                })
            })
    }
}
