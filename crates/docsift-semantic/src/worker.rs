//! One long-lived inference worker process.
//!
//! A worker owns its child process and both stream ends for the process's
//! whole life. Exchanges are strictly alternating (one request line out,
//! one response line in), and exclusivity is structural: a worker value
//! moves into exactly one runner task, so its streams can never be used
//! concurrently.

use std::collections::HashSet;
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, trace};

use docsift_core::{Error, MatchOutcome, Result};

use crate::config::{MatcherConfig, WorkerCommand};
use crate::protocol::{MatchRequest, MatchResponse, ReadyAck, StartupConfig};

/// Lifecycle state of one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Starting,
    Ready,
    Busy,
    Failed,
    Closed,
}

/// A launched worker process with exclusive stream ownership.
pub struct InferenceWorker {
    id: usize,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// Tag names this process has already embedded; requests ship only
    /// the unseen remainder.
    seen_tags: HashSet<String>,
    embedding_dim: usize,
    state: WorkerState,
}

impl InferenceWorker {
    /// Launch the worker process and complete the startup handshake.
    ///
    /// Sends one configuration line and waits (bounded by
    /// `startup_timeout`) for exactly one ready acknowledgement. Any
    /// other response fails the startup; the child is killed when the
    /// partially built worker drops.
    pub async fn spawn(
        id: usize,
        command: &WorkerCommand,
        config: &MatcherConfig,
        startup_timeout: Duration,
    ) -> Result<Self> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::WorkerStartup(format!("failed to launch {}: {}", command.program, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::WorkerStartup("stdin pipe unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| Error::WorkerStartup("stdout pipe unavailable".to_string()))?;

        let mut worker = Self {
            id,
            child,
            stdin,
            stdout,
            seen_tags: HashSet::new(),
            embedding_dim: 0,
            state: WorkerState::Starting,
        };

        worker
            .write_line(&StartupConfig::from(config))
            .await
            .map_err(|e| Error::WorkerStartup(format!("failed to send config: {e}")))?;

        let line = tokio::time::timeout(startup_timeout, worker.read_line())
            .await
            .map_err(|_| {
                Error::WorkerStartup(format!(
                    "worker {id} timed out after {}ms waiting for ready",
                    startup_timeout.as_millis()
                ))
            })?
            .map_err(|e| Error::WorkerStartup(format!("failed to read ready message: {e}")))?;

        let ack: ReadyAck = serde_json::from_str(&line)
            .map_err(|e| Error::WorkerStartup(format!("failed to parse ready message: {e}")))?;
        if !ack.is_ready() {
            return Err(Error::WorkerStartup(format!(
                "unexpected startup status: {}",
                ack.status
            )));
        }

        debug!(
            worker_id = id,
            embedding_dim = ack.embedding_dim,
            "Worker ready"
        );

        worker.embedding_dim = ack.embedding_dim;
        worker.state = WorkerState::Ready;
        Ok(worker)
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Run one task through the worker.
    ///
    /// An inference error reported by the worker leaves it usable for
    /// further tasks; any I/O or protocol failure marks it failed.
    pub async fn process(&mut self, text: &str, candidate_tags: &[String]) -> Result<MatchOutcome> {
        self.state = WorkerState::Busy;
        match self.exchange(text, candidate_tags).await {
            Ok(outcome) => {
                self.state = WorkerState::Ready;
                Ok(outcome)
            }
            Err(e) if e.is_worker_recoverable() => {
                self.state = WorkerState::Ready;
                Err(e)
            }
            Err(e) => {
                self.state = WorkerState::Failed;
                Err(e)
            }
        }
    }

    async fn exchange(&mut self, text: &str, candidate_tags: &[String]) -> Result<MatchOutcome> {
        let new_tags: Vec<String> = candidate_tags
            .iter()
            .filter(|tag| !self.seen_tags.contains(*tag))
            .cloned()
            .collect();

        let request = MatchRequest::Delta {
            text: text.to_string(),
            new_tags: new_tags.clone(),
        };
        self.write_line(&request).await?;

        let line = self.read_line().await?;
        let response: MatchResponse = serde_json::from_str(&line)
            .map_err(|e| Error::Protocol(format!("malformed response line: {e}")))?;

        if let Some(message) = response.error {
            return Err(Error::Inference(message));
        }

        if let Some(info) = &response.debug_info {
            trace!(
                worker_id = self.id,
                processing_time_ms = info.processing_time_ms,
                total_tags_considered = info.total_tags_considered,
                tags_above_threshold = info.tags_above_threshold,
                newly_cached_tags = info.newly_cached_tags,
                "Worker reported match stats"
            );
        }

        self.seen_tags.extend(new_tags);

        Ok(MatchOutcome {
            suggested_tags: response.suggested_tags,
            similarities: response.similarities,
        })
    }

    async fn write_line<T: Serialize>(&mut self, message: &T) -> Result<()> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line).await?;
        if read == 0 {
            return Err(Error::Protocol(
                "worker closed its output stream".to_string(),
            ));
        }
        Ok(line.trim_end().to_string())
    }

    /// Close the worker: signal end-of-input, kill the process, release
    /// the streams.
    pub async fn close(self) {
        let Self {
            id, mut child, stdin, ..
        } = self;
        debug!(worker_id = id, "Closing worker");

        // Dropping stdin delivers EOF to a well-behaved child
        drop(stdin);
        let _ = child.start_kill();
        let _ = child.wait().await;
    }
}
