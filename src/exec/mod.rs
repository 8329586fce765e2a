//! External tool invocation.
//!
//! Commands are shell command lines so that ARG_MAX batching can be
//! delegated to `xargs`, which reads its arguments from stdin. Every stage
//! whose exit status matters runs as its own command. `CommandRunner` is the
//! seam tests use to substitute canned tool output.

use crate::config::ParserConfig;
use crate::error::{Result, XcTestError};
use crate::timeout::{with_timeout, TimeoutConfig};
use std::io::ErrorKind;
use std::process::{Output, Stdio};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs a shell command line and returns its standard output.
pub trait CommandRunner {
    /// Execute `command`, wait for it to finish and return stdout as text
    /// without trailing line terminators.
    ///
    /// A non-zero exit status is reported as [`XcTestError::CommandFailed`].
    fn run(&self, command: &str) -> Result<String>;

    /// Like [`CommandRunner::run`], with `input` written to the command's
    /// stdin.
    fn run_with_input(&self, command: &str, input: &str) -> Result<String>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &str) -> Result<String> {
        (**self).run(command)
    }

    fn run_with_input(&self, command: &str, input: &str) -> Result<String> {
        (**self).run_with_input(command, input)
    }
}

/// Production runner: `<shell> -c <command>` with the caller's environment.
///
/// Calls block the current thread. From inside an async runtime the child is
/// driven on a separate thread, so the caller's runtime thread is blocked
/// but never re-entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRunner {
    shell: String,
    timeout_seconds: Option<u64>,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            timeout_seconds: None,
        }
    }

    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(config.shell.clone()).with_timeout(config.timeout_seconds)
    }

    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn execute(&self, command: &str, input: Option<&str>) -> Result<String> {
        info!(command = %command, shell = %self.shell, "Running command");

        let drive = || -> Result<Output> {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(self.spawn_and_wait(command, input))
        };

        // A runtime cannot be started on a thread that is already driving one.
        let output = if tokio::runtime::Handle::try_current().is_ok() {
            std::thread::scope(|scope| {
                scope
                    .spawn(drive)
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })?
        } else {
            drive()?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            warn!(
                command = %command,
                status = %output.status,
                stderr = %stderr,
                "Command failed"
            );
            return Err(XcTestError::CommandFailed {
                command: command.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim_end_matches(['\n', '\r']).to_string();
        debug!(command = %command, bytes = stdout.len(), "Command completed");
        Ok(stdout)
    }

    async fn spawn_and_wait(&self, command: &str, input: Option<&str>) -> Result<Output> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout can take down every pipeline stage.
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd.spawn()?;
        let pid = child.id();
        let stdin = child.stdin.take();

        // stdin is fed while stdout and stderr are drained, so neither a large
        // symbol list nor a large dump can fill a pipe and stall the child.
        let feed = async move {
            if let (Some(mut pipe), Some(input)) = (stdin, input) {
                match pipe.write_all(input.as_bytes()).await {
                    // the child may exit without reading everything
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };
        let wait = async move {
            let (fed, output) = tokio::join!(feed, child.wait_with_output());
            fed?;
            Ok::<_, XcTestError>(output?)
        };

        match self.timeout_seconds {
            Some(seconds) => {
                let result = with_timeout(TimeoutConfig::new(seconds, command), wait).await;
                if matches!(result, Err(XcTestError::Timeout { .. })) {
                    kill_process_group(pid);
                }
                result
            }
            None => wait.await,
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<String> {
        self.execute(command, None)
    }

    fn run_with_input(&self, command: &str, input: &str) -> Result<String> {
        self.execute(command, Some(input))
    }
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pid) = pid else { return };
    // SAFETY: kill(2) takes plain integers and touches no memory of ours.
    let rc = unsafe { libc::kill(-(pid as libc::pid_t), libc::SIGKILL) };
    if rc != 0 {
        debug!(
            pgid = pid,
            error = %std::io::Error::last_os_error(),
            "Process group already gone"
        );
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

/// Quote `arg` for inclusion in a POSIX shell command line.
pub fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}
