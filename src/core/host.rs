//! Host boundary.
//!
//! Everything the bootstrap needs from the operating system (program
//! lookup, running external commands, and the process environment) goes
//! through [`Host`], so the orchestration logic can be exercised against a
//! fake in tests.

use std::fmt;
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{BootstrapError, Result};

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Prefix the invocation with `sudo`.
    pub fn elevated(self) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Operating-system services used by a bootstrap run.
pub trait Host {
    /// Locate `program` on the search path.
    fn which(&self, program: &str) -> Option<PathBuf>;

    /// Run to completion, failing on a non-zero exit.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Run to completion and return trimmed stdout, failing on a non-zero exit.
    /// Stderr is not shown to the user.
    fn capture(&self, invocation: &Invocation) -> Result<String>;

    /// Read a variable from the process environment.
    fn var(&self, name: &str) -> Option<String>;

    /// Set a variable in the process environment (inherited by children).
    fn set_var(&self, name: &str, value: &str);

    /// Whether the current user is root.
    fn is_root(&self) -> bool;
}

/// The real operating system.
///
/// Child stdout and stderr are appended to the run log when one is
/// configured. Every command is killed once `timeout` elapses.
#[derive(Debug, Clone)]
pub struct System {
    log: Option<PathBuf>,
    timeout: Duration,
}

impl System {
    pub fn new(log: Option<PathBuf>, timeout: Duration) -> Self {
        Self { log, timeout }
    }

    fn log_stdio(&self, invocation: &Invocation) -> (Stdio, Stdio) {
        let Some(path) = &self.log else {
            return (Stdio::inherit(), Stdio::inherit());
        };

        match open_log(path, invocation) {
            Ok(file) => match file.try_clone() {
                Ok(clone) => (Stdio::from(file), Stdio::from(clone)),
                Err(_) => (Stdio::from(file), Stdio::inherit()),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open run log");
                (Stdio::inherit(), Stdio::inherit())
            }
        }
    }

    fn wait(&self, invocation: &Invocation, mut command: Command) -> Result<()> {
        debug!(command = %invocation, "running");

        let mut child = command.spawn().map_err(|e| BootstrapError::CommandFailed {
            command: invocation.to_string(),
            status: format!("failed to start: {}", e),
        })?;

        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                debug!(command = %invocation, %status, "finished");
                if status.success() {
                    return Ok(());
                }
                return Err(BootstrapError::CommandFailed {
                    command: invocation.to_string(),
                    status: status.to_string(),
                }
                .into());
            }

            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(BootstrapError::Timeout {
                    command: invocation.to_string(),
                    secs: self.timeout.as_secs(),
                }
                .into());
            }

            thread::sleep(Duration::from_millis(100));
        }
    }
}

impl Host for System {
    fn which(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    fn run(&self, invocation: &Invocation) -> Result<()> {
        let (stdout, stderr) = self.log_stdio(invocation);
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(stderr);
        self.wait(invocation, command)
    }

    fn capture(&self, invocation: &Invocation) -> Result<String> {
        // Unnamed and already unlinked, so nothing else can open it.
        let mut out = tempfile::tempfile()?;
        let writer = out.try_clone()?;

        let stderr = match &self.log {
            Some(_) => self.log_stdio(invocation).1,
            None => Stdio::null(),
        };
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(writer))
            .stderr(stderr);

        self.wait(invocation, command)?;

        let mut captured = String::new();
        out.seek(SeekFrom::Start(0))?;
        out.read_to_string(&mut captured)?;
        Ok(captured.trim().to_string())
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_var(&self, name: &str, value: &str) {
        std::env::set_var(name, value);
    }

    fn is_root(&self) -> bool {
        whoami::username() == "root"
    }
}

fn open_log(path: &Path, invocation: &Invocation) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "$ {}", invocation)?;
    Ok(file)
}

/// Prepend `dir` to a PATH-style value unless it is already listed.
pub fn prepend_path(current: Option<&str>, dir: &Path) -> Option<String> {
    let current = current.unwrap_or("");
    if std::env::split_paths(current).any(|p| p == dir) {
        return None;
    }

    let mut paths = vec![dir.to_path_buf()];
    paths.extend(std::env::split_paths(current).filter(|p| !p.as_os_str().is_empty()));
    std::env::join_paths(paths)
        .ok()
        .map(|joined| joined.to_string_lossy().into_owned())
}
