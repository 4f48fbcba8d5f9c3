//! Process Runner
//!
//! Runs external commands off the interactive thread. Each spawned job gets
//! its own tokio task; the task captures the full stdout and stderr of the
//! child and sends a single [`Completion`] once the child exits.
//!
//! ```text
//! ┌──────────────────┐  spawn()   ┌──────────────────┐
//! │ interactive side │──────────▶ │  job task (1/job) │
//! │  (Shell)         │            │  wait_with_output │
//! │  completion_rx ◀─┼────────────┤  completion_tx    │
//! └──────────────────┘            └──────────────────┘
//! ```
//!
//! Spawn failures are not a separate signal: they arrive through the same
//! completion path with the error text in `stderr` and exit code `-1`.

pub mod signals;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::config::ShellConfig;
use crate::error::{Error, Result};

/// Identifier of a spawned job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.0.simple().to_string();
        f.write_str(&id[..8])
    }
}

/// What to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    /// Executable to launch
    pub program: PathBuf,
    /// Arguments passed to the executable
    pub args: Vec<String>,
    /// The command as the user typed it, for messages
    pub display: String,
}

impl ProcessSpec {
    /// Run `line` through the configured OS shell
    pub fn shell(line: &str, config: &ShellConfig) -> Self {
        let mut args = config.shell_args.clone();
        args.push(line.to_string());
        Self {
            program: config.shell_path.clone(),
            args,
            display: line.to_string(),
        }
    }

    /// Run a program directly with arguments
    pub fn program(program: impl Into<PathBuf>, args: Vec<String>, display: &str) -> Self {
        Self {
            program: program.into(),
            args,
            display: display.to_string(),
        }
    }
}

/// Captured result of one process
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessResult {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `-1` when the process did not report one
    pub exit_code: i32,
}

impl ProcessResult {
    /// Result standing in for a process that could not be run
    pub fn from_error(err: &Error) -> Self {
        Self {
            stdout: String::new(),
            stderr: err.to_string(),
            exit_code: -1,
        }
    }

    fn interrupted() -> Self {
        Self {
            exit_code: -1,
            ..Self::default()
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// How a job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOutcome {
    /// The process ran to completion (or failed to start)
    Finished,
    /// Stopped on request
    Cancelled,
    /// Stopped by the configured timeout
    TimedOut,
}

/// Completion event sent from a job task to the interactive side
#[derive(Debug, Clone)]
pub struct Completion {
    pub job: JobId,
    pub command: String,
    pub result: ProcessResult,
    pub outcome: JobOutcome,
}

/// Run one process to completion and capture all of its output
pub async fn execute(spec: &ProcessSpec, cwd: &Path) -> ProcessResult {
    match spawn_child(spec, cwd) {
        Ok(child) => collect(child).await,
        Err(e) => {
            warn!("{}", e);
            ProcessResult::from_error(&e)
        }
    }
}

fn spawn_child(spec: &ProcessSpec, cwd: &Path) -> Result<Child> {
    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    command.process_group(0);

    command.spawn().map_err(|e| Error::CommandSpawnFailed {
        command: spec.display.clone(),
        reason: e.to_string(),
    })
}

async fn collect(child: Child) -> ProcessResult {
    match child.wait_with_output().await {
        Ok(output) => ProcessResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        },
        Err(e) => ProcessResult::from_error(&Error::Io(e)),
    }
}

/// Job body: wait for the child, a cancel request, or the timeout
async fn run_job(
    spec: ProcessSpec,
    cwd: PathBuf,
    mut cancel_rx: oneshot::Receiver<()>,
    timeout: Option<Duration>,
) -> (ProcessResult, JobOutcome) {
    let child = match spawn_child(&spec, &cwd) {
        Ok(child) => child,
        Err(e) => {
            warn!("{}", e);
            return (ProcessResult::from_error(&e), JobOutcome::Finished);
        }
    };
    let pid = child.id();

    let deadline = async move {
        match timeout {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };

    // Dropping the collect future drops the child, which kills it
    tokio::select! {
        result = collect(child) => (result, JobOutcome::Finished),
        Ok(()) = &mut cancel_rx => {
            stop_group(pid);
            (ProcessResult::interrupted(), JobOutcome::Cancelled)
        }
        _ = deadline => {
            stop_group(pid);
            (ProcessResult::interrupted(), JobOutcome::TimedOut)
        }
    }
}

fn stop_group(pid: Option<u32>) {
    if let Some(pid) = pid {
        if let Err(e) = signals::terminate_group(pid) {
            debug!("Process group {} already gone: {}", pid, e);
        }
    }
}

/// Spawns jobs on the tokio runtime and hands out cancellation
pub struct ProcessRunner {
    handle: Handle,
    completion_tx: mpsc::UnboundedSender<Completion>,
    /// Jobs whose completion has not been consumed; the sender is taken on cancel
    jobs: HashMap<JobId, Option<oneshot::Sender<()>>>,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Create a runner on the current tokio runtime.
    ///
    /// Returns the receiving end of the completion channel; it has exactly
    /// one consumer.
    pub fn new(timeout: Option<Duration>) -> Result<(Self, mpsc::UnboundedReceiver<Completion>)> {
        let handle = Handle::try_current().map_err(|e| Error::NoRuntime {
            reason: e.to_string(),
        })?;
        Ok(Self::with_handle(handle, timeout))
    }

    /// Create a runner that spawns onto `handle`
    pub fn with_handle(
        handle: Handle,
        timeout: Option<Duration>,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let runner = Self {
            handle,
            completion_tx,
            jobs: HashMap::new(),
            timeout,
        };
        (runner, completion_rx)
    }

    /// Start `spec` in `cwd` and return immediately
    pub fn spawn(&mut self, spec: ProcessSpec, cwd: PathBuf) -> JobId {
        let job = JobId::new();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.jobs.insert(job, Some(cancel_tx));

        let completion_tx = self.completion_tx.clone();
        let timeout = self.timeout;
        info!("Spawning job {}: {} in {:?}", job, spec.display, cwd);

        self.handle.spawn(async move {
            let command = spec.display.clone();
            let (result, outcome) = run_job(spec, cwd, cancel_rx, timeout).await;
            debug!(
                "Job {} ended ({:?}, exit code {})",
                job, outcome, result.exit_code
            );
            let completion = Completion {
                job,
                command,
                result,
                outcome,
            };
            if completion_tx.send(completion).is_err() {
                debug!("Completion for job {} dropped; receiver closed", job);
            }
        });

        job
    }

    /// Request cancellation of one job. Returns `false` if it already ended.
    pub fn cancel(&mut self, job: JobId) -> bool {
        match self.jobs.get_mut(&job).and_then(Option::take) {
            Some(cancel_tx) => cancel_tx.send(()).is_ok(),
            None => false,
        }
    }

    /// Request cancellation of every job still running
    pub fn cancel_all(&mut self) -> usize {
        let jobs: Vec<JobId> = self.jobs.keys().copied().collect();
        jobs.into_iter().filter(|job| self.cancel(*job)).count()
    }

    /// Forget a job whose completion has been consumed
    pub fn finish(&mut self, job: JobId) {
        self.jobs.remove(&job);
    }

    /// Jobs spawned whose completion has not been consumed yet
    pub fn running_jobs(&self) -> usize {
        self.jobs.len()
    }
}
