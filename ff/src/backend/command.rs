//! External-command completion client
//!
//! Pipes the prompt into a configured command's stdin and reads the
//! completion from its stdout. Any CLI that wraps a hosted model works.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{BackendError, CompletionClient};

/// Completion client backed by a child process
#[derive(Debug, Clone)]
pub struct CommandClient {
    program: String,
    args: Vec<String>,
    model: String,
}

impl CommandClient {
    /// Create a client from an argv list (program first)
    pub fn new(argv: &[String], model: impl Into<String>) -> Result<Self, BackendError> {
        debug!(?argv, "CommandClient::new: called");
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| BackendError::Unavailable("remote command is empty".to_string()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl CompletionClient for CommandClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        debug!(program = %self.program, prompt_len = prompt.len(), "CommandClient::complete: called");
        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BackendError::Unavailable(format!("Failed to spawn {}: {}", self.program, e)))?;

        // Write stdin while draining output; an echoing child blocks on a full stdout pipe
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(prompt.as_bytes()).await?;
                // Dropping stdin closes the pipe so the child sees EOF
            }
            Ok::<(), std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        debug!(status = ?output.status, stdout_len = output.stdout.len(), "CommandClient::complete: finished");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::Service(format!(
                "Exit code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        match fed {
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                debug!("CommandClient::complete: child closed stdin early");
            }
            Err(e) => return Err(e.into()),
            Ok(()) => {}
        }

        let completion = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if completion.is_empty() {
            return Err(BackendError::Malformed("Empty completion".to_string()));
        }
        Ok(completion)
    }
}
