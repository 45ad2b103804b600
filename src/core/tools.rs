//! Tool provisioning.
//!
//! [`ensure_tool_present`] is the install-if-missing primitive every
//! provisioning step is built on, and [`TOOLS`] lists the assistant CLIs the
//! workspace launches.

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use crate::error::{BootstrapError, Error, Result};

/// An assistant CLI installed from npm.
#[derive(Debug, PartialEq, Eq)]
pub struct Tool {
    /// Pane label.
    pub label: &'static str,
    /// Binary name on PATH.
    pub binary: &'static str,
    /// npm package providing the binary.
    pub package: &'static str,
    /// Environment variable holding the tool's API key.
    pub secret: &'static str,
    /// Fixed arguments passed at launch.
    pub args: &'static [&'static str],
}

/// The assistant CLIs, in pane order.
///
/// Every argument set is intentionally empty: each CLI starts in its default
/// interactive mode with its own permission prompts left on.
pub const TOOLS: &[Tool] = &[
    Tool {
        label: "Claude",
        binary: "claude",
        package: "@anthropic-ai/claude-code",
        secret: "ANTHROPIC_API_KEY",
        args: &[],
    },
    Tool {
        label: "Gemini",
        binary: "gemini",
        package: "@google/gemini-cli",
        secret: "GEMINI_API_KEY",
        args: &[],
    },
    Tool {
        label: "Codex",
        binary: "codex",
        package: "@openai/codex",
        secret: "OPENAI_API_KEY",
        args: &[],
    },
];

impl Tool {
    /// Shell command line launching the tool.
    pub fn command_line(&self) -> String {
        std::iter::once(self.binary)
            .chain(self.args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Provisioning state of one tool.
///
/// `Unknown → Checking → {Present | Installing → {Present | Failed}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    Unknown,
    Checking,
    Installing,
    Present,
    Failed,
}

impl ToolState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: ToolState) -> bool {
        use ToolState::*;
        matches!(
            (self, next),
            (Unknown, Checking)
                | (Checking, Present)
                | (Checking, Installing)
                | (Installing, Present)
                | (Installing, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ToolState::Present | ToolState::Failed)
    }
}

impl fmt::Display for ToolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolState::Unknown => "unknown",
            ToolState::Checking => "checking",
            ToolState::Installing => "installing",
            ToolState::Present => "present",
            ToolState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// How a tool became present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provisioned {
    AlreadyPresent,
    Installed,
}

/// Tracks one tool through its state machine.
#[derive(Debug)]
struct Tracker<'a> {
    name: &'a str,
    state: ToolState,
}

impl<'a> Tracker<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            state: ToolState::Unknown,
        }
    }

    fn advance(&mut self, next: ToolState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(tool = self.name, from = %self.state, to = %next, "state");
        self.state = next;
    }
}

/// Make sure `name` is present, installing it when the detector says it is not.
///
/// Runs `detect`; if it reports absent, runs `install` and then `detect`
/// again. Safe to call repeatedly: the installer only runs while the
/// detector reports the tool missing.
///
/// # Errors
///
/// - `BootstrapError::ToolInstallFailed` if the installer fails.
/// - `BootstrapError::PrerequisiteMissing` if the tool is still absent
///   after a successful install.
/// - Errors of kind `UnsupportedPlatform` or `Timeout` raised by the
///   installer are passed through unchanged.
pub fn ensure_tool_present<D, I>(name: &str, mut detect: D, install: I) -> Result<Provisioned>
where
    D: FnMut() -> bool,
    I: FnOnce() -> Result<()>,
{
    let mut tracker = Tracker::new(name);

    tracker.advance(ToolState::Checking);
    if detect() {
        tracker.advance(ToolState::Present);
        return Ok(Provisioned::AlreadyPresent);
    }

    tracker.advance(ToolState::Installing);
    info!(tool = name, "not found, installing");

    if let Err(e) = install() {
        tracker.advance(ToolState::Failed);
        return Err(match e {
            Error::Bootstrap(
                err @ (BootstrapError::UnsupportedPlatform { .. } | BootstrapError::Timeout { .. }),
            ) => err.into(),
            other => BootstrapError::ToolInstallFailed {
                tool: name.to_string(),
                reason: other.to_string(),
            }
            .into(),
        });
    }

    if !detect() {
        tracker.advance(ToolState::Failed);
        return Err(BootstrapError::PrerequisiteMissing {
            name: name.to_string(),
        }
        .into());
    }

    tracker.advance(ToolState::Present);
    info!(tool = name, "installed");
    Ok(Provisioned::Installed)
}
