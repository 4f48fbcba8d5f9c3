//! Interactive command shell
//!
//! [`Shell`] parses each submitted line, runs built-ins directly against the
//! [`Session`], and hands everything else to the [`ProcessRunner`]. Job
//! output comes back as [`Completion`] events that the shell drains into its
//! [`OutputBuffer`], so the buffer has a single writer. Completions from
//! concurrent jobs land in whatever order the jobs finish.

pub mod builtins;
pub mod history;
pub mod output;
pub mod session;

use std::path::PathBuf;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::config::ShellConfig;
use crate::error::{Error, Result};
use crate::execution::{Completion, JobId, JobOutcome, ProcessRunner, ProcessSpec};
use crate::models::{Command, OutputKind, Verb};

pub use history::History;
pub use output::OutputBuffer;
pub use session::Session;

/// What `submit` did with a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank input; nothing recorded
    Ignored,
    /// Handled synchronously by a built-in
    Builtin(Verb),
    /// Started a background job
    Spawned(JobId),
    /// The command failed; an error line was written
    Failed(Verb),
}

pub struct Shell {
    config: ShellConfig,
    session: Session,
    output: OutputBuffer,
    runner: ProcessRunner,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl Shell {
    /// Create a shell on the current tokio runtime
    pub fn new(config: ShellConfig) -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| Error::NoRuntime {
            reason: e.to_string(),
        })?;
        Self::with_handle(config, handle)
    }

    /// Create a shell whose jobs run on `handle`
    pub fn with_handle(config: ShellConfig, handle: Handle) -> Result<Self> {
        let cwd = match &config.working_directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        let history = match &config.history_file {
            Some(path) => History::with_file(path.clone(), config.history_limit).unwrap_or_else(|e| {
                warn!("Could not load history from {}: {}", path.display(), e);
                History::new(config.history_limit)
            }),
            None => History::new(config.history_limit),
        };

        let timeout = config.command_timeout_ms.map(Duration::from_millis);
        let (runner, completions) = ProcessRunner::with_handle(handle, timeout);

        info!("Shell started in {}", cwd.display());
        Ok(Self {
            output: OutputBuffer::new(config.output_limit),
            session: Session::new(cwd, history),
            config,
            runner,
            completions,
        })
    }

    /// Submit one typed line.
    ///
    /// Every non-blank line is recorded in history before dispatch, whatever
    /// the outcome. Spawned jobs return immediately.
    pub fn submit(&mut self, input: &str) -> Dispatch {
        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(_) => return Dispatch::Ignored,
        };
        let line = input.trim();

        self.session.history_mut().push(line.to_string());
        let echo = format!("{} {}", self.session.prompt(), line);
        self.output.push(&echo, OutputKind::Echo);

        let verb = command.verb;
        debug!("Dispatching {} ({})", line, verb);
        match self.dispatch(command, line) {
            Ok(dispatch) => dispatch,
            Err(e) => {
                self.output.push(&e.to_string(), OutputKind::Error);
                Dispatch::Failed(verb)
            }
        }
    }

    fn dispatch(&mut self, command: Command, line: &str) -> Result<Dispatch> {
        match command.verb {
            Verb::Cd => {
                self.session.change_dir(&command.raw_args)?;
            }
            Verb::Pwd => {
                let cwd = self.session.cwd().display().to_string();
                self.output.push(&cwd, OutputKind::Stdout);
            }
            Verb::List => {
                for entry in builtins::list_dir(self.session.cwd())? {
                    self.output.push(&entry, OutputKind::Stdout);
                }
            }
            Verb::Clear => self.output.clear(),
            Verb::Help => self.output.push(builtins::HELP_TEXT, OutputKind::Info),
            Verb::Python => return self.run_python(&command.raw_args, line).map(Dispatch::Spawned),
            Verb::External => {
                let spec = ProcessSpec::shell(line, &self.config);
                return Ok(Dispatch::Spawned(self.spawn(spec)));
            }
        }
        Ok(Dispatch::Builtin(command.verb))
    }

    /// Run a script relative to the working directory, if it exists
    fn run_python(&mut self, script: &str, line: &str) -> Result<JobId> {
        let path = self.session.cwd().join(script);
        if !path.is_file() {
            return Err(Error::ScriptNotFound {
                script: script.to_string(),
            });
        }

        self.output
            .push(&format!("Running {}...", script), OutputKind::Info);
        let spec = ProcessSpec::program(
            &self.config.python_executable,
            vec![path.to_string_lossy().to_string()],
            line,
        );
        Ok(self.spawn(spec))
    }

    fn spawn(&mut self, spec: ProcessSpec) -> JobId {
        let cwd: PathBuf = self.session.cwd().to_path_buf();
        self.runner.spawn(spec, cwd)
    }

    /// Recall the previous history entry, clamped at the oldest
    pub fn history_previous(&mut self) -> Option<String> {
        self.session
            .history_mut()
            .previous_entry()
            .map(str::to_string)
    }

    /// Recall the next history entry; empty once past the newest
    pub fn history_next(&mut self) -> String {
        self.session.history_mut().next_entry().to_string()
    }

    /// Cancel every running job. Their completions still arrive.
    pub fn stop(&mut self) -> usize {
        let stopped = self.runner.cancel_all();
        let message = match stopped {
            0 => "No running commands".to_string(),
            n => format!("Stopping {} running command(s)", n),
        };
        self.output.push(&message, OutputKind::Info);
        stopped
    }

    /// Drain completions that have already arrived; returns how many
    pub fn poll_completions(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(completion) = self.completions.try_recv() {
            self.render_completion(completion);
            drained += 1;
        }
        drained
    }

    /// Wait for the next completion and render it.
    ///
    /// Returns `None` straight away when no job is outstanding.
    pub async fn next_completion(&mut self) -> Option<JobId> {
        if self.runner.running_jobs() == 0 {
            return None;
        }
        let completion = self.completions.recv().await?;
        let job = completion.job;
        self.render_completion(completion);
        Some(job)
    }

    /// Wait until every outstanding job has completed
    pub async fn wait_idle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    fn render_completion(&mut self, completion: Completion) {
        self.runner.finish(completion.job);
        let Completion {
            command,
            result,
            outcome,
            ..
        } = completion;

        match outcome {
            JobOutcome::Finished => {
                self.output.push(&result.stdout, OutputKind::Stdout);
                self.output.push(&result.stderr, OutputKind::Stderr);
                if result.exit_code > 0 {
                    self.output.push(
                        &format!("Command exited with code: {}", result.exit_code),
                        OutputKind::Info,
                    );
                }
            }
            JobOutcome::Cancelled => {
                self.output
                    .push(&format!("Stopped: {}", command), OutputKind::Info);
            }
            JobOutcome::TimedOut => {
                self.output
                    .push(&format!("Command timed out: {}", command), OutputKind::Error);
            }
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut OutputBuffer {
        &mut self.output
    }

    pub fn prompt(&self) -> String {
        self.session.prompt()
    }

    pub fn running_jobs(&self) -> usize {
        self.runner.running_jobs()
    }
}
