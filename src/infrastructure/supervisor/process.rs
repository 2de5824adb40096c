use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};

use super::error::{Result, SupervisorError};

/// A command line tokenized shell-style, ready to spawn without a shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommand {
    raw: String,
    program: String,
    args: Vec<String>,
}

impl ServiceCommand {
    /// Tokenize `raw` with POSIX shell quoting rules
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = shlex::split(raw)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| SupervisorError::InvalidCommand(raw.to_string()))?
            .into_iter();

        let program = parts
            .next()
            .ok_or_else(|| SupervisorError::InvalidCommand(raw.to_string()))?;

        Ok(Self {
            raw: raw.to_string(),
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run to completion, failing on a non-zero exit
    pub async fn run(&self) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| SupervisorError::StopCommandIo {
                command: self.raw.clone(),
                source,
            })?;
        self.check(status)
    }

    /// Blocking variant of [`ServiceCommand::run`] for use from `Drop`
    pub fn run_blocking(&self) -> Result<()> {
        let status = std::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| SupervisorError::StopCommandIo {
                command: self.raw.clone(),
                source,
            })?;
        self.check(status)
    }

    fn check(&self, status: std::process::ExitStatus) -> Result<()> {
        if status.success() {
            Ok(())
        } else {
            Err(SupervisorError::StopCommandFailed {
                command: self.raw.clone(),
                status,
            })
        }
    }
}

impl fmt::Display for ServiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Exclusive ownership of one spawned service process
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    command: String,
}

impl ProcessHandle {
    /// Spawn `command`. With `quiet`, the child's stdout and stderr are discarded.
    pub fn spawn(command: &ServiceCommand, quiet: bool) -> Result<Self> {
        let output = || if quiet { Stdio::null() } else { Stdio::inherit() };

        let child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(output())
            .stderr(output())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SupervisorError::Spawn { source })?;

        tracing::info!(
            command = %command,
            pid = child.id(),
            "Spawned service process"
        );

        Ok(Self {
            child,
            command: command.to_string(),
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Whether the process has already exited (reaping it if so)
    pub fn has_exited(&mut self) -> Result<bool> {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                tracing::warn!(
                    command = %self.command,
                    status = %status,
                    "Service process exited"
                );
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(source) => Err(SupervisorError::Terminate { source }),
        }
    }

    /// SIGTERM, wait up to `grace`, then kill
    pub async fn terminate(mut self, grace: Duration) -> Result<()> {
        let Some(pid) = self.child.id() else {
            // Already reaped
            return Ok(());
        };

        let signalled = i32::try_from(pid)
            .ok()
            .map(|raw| kill(Pid::from_raw(raw), Signal::SIGTERM));

        match signalled {
            Some(Ok(())) => {
                tracing::debug!(pid, grace = ?grace, "Sent SIGTERM to service process");
                match tokio::time::timeout(grace, self.child.wait()).await {
                    Ok(Ok(status)) => {
                        tracing::info!(pid, status = %status, "Service process stopped");
                        return Ok(());
                    }
                    Ok(Err(source)) => return Err(SupervisorError::Terminate { source }),
                    Err(_) => {
                        tracing::warn!(pid, "Service process ignored SIGTERM, killing");
                    }
                }
            }
            Some(Err(Errno::ESRCH)) => return Ok(()),
            Some(Err(errno)) => {
                tracing::warn!(pid, error = %errno, "SIGTERM failed, killing");
            }
            None => {}
        }

        self.child
            .kill()
            .await
            .map_err(|source| SupervisorError::Terminate { source })?;
        tracing::info!(pid, "Service process killed");
        Ok(())
    }

    /// Start killing the process without waiting
    pub fn kill_now(&mut self) -> Result<()> {
        self.child
            .start_kill()
            .map_err(|source| SupervisorError::Terminate { source })
    }
}
