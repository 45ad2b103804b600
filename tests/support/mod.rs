//! Test support utilities for agentmux integration tests.
//!
//! Every test gets its own home directory and a bin directory holding fake
//! `node`, `npm`, assistant and `tmux` programs. The binary under test sees
//! only that bin directory on PATH, so nothing on the real machine is
//! installed or touched.

#![allow(dead_code)]

pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with isolated temp directories.
pub struct Test {
    /// Temporary home directory
    pub home: TempDir,
    /// Directory standing in for the system PATH
    pub bin: TempDir,
}

impl Test {
    /// An empty machine: nothing installed.
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        let bin = TempDir::new().expect("failed to create temp bin");
        Self { home, bin }
    }

    /// A machine with node, npm, tmux and every assistant CLI installed.
    pub fn ready() -> Self {
        let t = Self::new();
        t.install(&["node", "npm", "claude", "gemini", "codex", "tmux"]);
        t
    }

    /// Install fake programs into the bin directory.
    pub fn install(&self, programs: &[&str]) {
        for program in programs {
            let script = fixtures::script(program);
            write_executable(&self.bin.path().join(program), script);
        }
    }

    pub fn profile(&self) -> PathBuf {
        self.home.path().join(".bashrc")
    }

    pub fn tmux_conf(&self) -> PathBuf {
        self.home.path().join(".tmux.conf")
    }

    pub fn secrets(&self) -> PathBuf {
        self.home.path().join(".agentmux").join("keys.env")
    }

    pub fn run_log(&self) -> PathBuf {
        self.home.path().join(".agentmux").join("bootstrap.log")
    }

    /// File the fake tmux appends its arguments to.
    pub fn tmux_log(&self) -> PathBuf {
        self.home.path().join("tmux-calls.log")
    }

    /// Every tmux invocation so far, one argument string per call.
    pub fn tmux_calls(&self) -> Vec<String> {
        read(&self.tmux_log())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Write `~/.agentmux/config.toml`.
    pub fn write_config(&self, contents: &str) {
        let dir = self.home.path().join(".agentmux");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), contents).expect("failed to write config");
    }
}

/// Read a file, treating a missing one as empty.
pub fn read(path: &std::path::Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

fn write_executable(path: &std::path::Path, contents: &str) {
    fs::write(path, contents).expect("failed to write fake program");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .expect("failed to mark fake program executable");
    }
}
