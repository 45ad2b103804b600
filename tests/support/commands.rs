//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables from the developer's environment that would leak into a run.
const SCRUBBED: &[&str] = &[
    "ANTHROPIC_API_KEY",
    "GEMINI_API_KEY",
    "OPENAI_API_KEY",
    "AGENTMUX_CONFIG",
    "AGENTMUX_LOG",
    "TMUX",
    "FAKE_TMUX_HAS_SESSION",
];

impl Test {
    /// Create an agentmux command with an isolated environment.
    ///
    /// - HOME points at the temporary home directory
    /// - PATH contains only the fake bin directory
    /// - SHELL is bash, so the profile is `~/.bashrc`
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("agentmux").expect("failed to find agentmux binary");
        for var in SCRUBBED {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("PATH", self.bin.path());
        cmd.env("SHELL", "/bin/bash");
        cmd.env("NO_COLOR", "1");
        cmd.env("FAKE_TMUX_LOG", self.tmux_log());
        cmd.current_dir(self.home.path());
        cmd
    }

    /// Shortcut for `agentmux up --no-attach`.
    pub fn up(&self) -> Output {
        self.cmd()
            .args(["up", "--no-attach"])
            .output()
            .expect("failed to run agentmux up")
    }

    /// `agentmux up --no-attach` with extra environment variables.
    pub fn up_with_env(&self, vars: &[(&str, &str)]) -> Output {
        let mut cmd = self.cmd();
        cmd.args(["up", "--no-attach"]);
        for (k, v) in vars {
            cmd.env(k, v);
        }
        cmd.output().expect("failed to run agentmux up")
    }

    /// Shortcut for `agentmux status`.
    pub fn status(&self) -> Output {
        self.cmd()
            .arg("status")
            .output()
            .expect("failed to run agentmux status")
    }

    /// Shortcut for `agentmux status --json`.
    pub fn status_json(&self) -> Output {
        self.cmd()
            .args(["status", "--json"])
            .output()
            .expect("failed to run agentmux status --json")
    }
}
