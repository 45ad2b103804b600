//! tmux implementation of [`Multiplexer`].
//!
//! Control commands go through the [`Host`] so they share its timeout and
//! run log. Attaching replaces the current process with the tmux client.

use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::core::host::{Host, Invocation};
use crate::core::session::{Multiplexer, PaneId};
use crate::error::{Result, SessionError};

/// Window name used for the workspace.
const WINDOW: &str = "workspace";

/// Format string printing the id of a newly created pane.
const PANE_ID_FORMAT: &str = "#{pane_id}";

/// tmux driven through its command-line interface.
pub struct Tmux<'a> {
    host: &'a dyn Host,
}

impl<'a> Tmux<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        Self { host }
    }

    fn invocation<I, S>(args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::new("tmux", args)
    }

    fn run(&self, action: &str, args: &[&str]) -> Result<()> {
        self.host
            .run(&Self::invocation(args.iter().copied()))
            .map_err(|e| multiplexer_error(action, e))
    }

    fn pane_id(&self, action: &str, args: &[&str]) -> Result<PaneId> {
        let out = self
            .host
            .capture(&Self::invocation(args.iter().copied()))
            .map_err(|e| multiplexer_error(action, e))?;

        let id = out.lines().next().unwrap_or("").trim().to_string();
        if id.is_empty() {
            return Err(SessionError::Multiplexer {
                action: action.to_string(),
                reason: "tmux did not report a pane id".to_string(),
            }
            .into());
        }
        debug!(action, pane = %id, "pane created");
        Ok(id)
    }
}

fn multiplexer_error(action: &str, e: crate::error::Error) -> crate::error::Error {
    SessionError::Multiplexer {
        action: action.to_string(),
        reason: e.to_string(),
    }
    .into()
}

/// Exact-match target for a session name.
fn exact(session: &str) -> String {
    format!("={}", session)
}

impl Multiplexer for Tmux<'_> {
    fn has_session(&self, session: &str) -> Result<bool> {
        // has-session exits non-zero both for a missing session and for no
        // running server; either way there is nothing to attach to.
        let target = exact(session);
        Ok(self
            .host
            .capture(&Self::invocation(["has-session", "-t", target.as_str()]))
            .is_ok())
    }

    fn kill_session(&self, session: &str) -> Result<()> {
        let target = exact(session);
        self.run("kill-session", &["kill-session", "-t", &target])
    }

    fn new_session(&self, session: &str) -> Result<PaneId> {
        self.pane_id(
            "new-session",
            &[
                "new-session",
                "-d",
                "-s",
                session,
                "-n",
                WINDOW,
                "-P",
                "-F",
                PANE_ID_FORMAT,
            ],
        )
    }

    fn split_pane(&self, target: &PaneId) -> Result<PaneId> {
        self.pane_id(
            "split-window",
            &["split-window", "-t", target, "-P", "-F", PANE_ID_FORMAT],
        )
    }

    fn select_layout(&self, session: &str, layout: &str) -> Result<()> {
        let window = format!("{}:{}", exact(session), WINDOW);
        self.run("select-layout", &["select-layout", "-t", &window, layout])
    }

    fn set_title(&self, pane: &PaneId, title: &str) -> Result<()> {
        self.run("select-pane", &["select-pane", "-t", pane, "-T", title])
    }

    fn send_command(&self, pane: &PaneId, command: &str) -> Result<()> {
        self.run("send-keys", &["send-keys", "-t", pane, "-l", command])?;
        self.run("send-keys", &["send-keys", "-t", pane, "Enter"])
    }

    fn select_pane(&self, pane: &PaneId) -> Result<()> {
        self.run("select-pane", &["select-pane", "-t", pane])
    }

    fn reload_config(&self, config: &Path) -> Result<bool> {
        // list-sessions fails instead of starting a server when none runs.
        if self
            .host
            .capture(&Self::invocation(["list-sessions"]))
            .is_err()
        {
            debug!("no tmux server running, nothing to reload");
            return Ok(false);
        }

        let path = config.display().to_string();
        self.run("source-file", &["source-file", &path])?;
        Ok(true)
    }

    fn attach(&self, session: &str) -> Result<()> {
        let target = exact(session);

        if self.host.var("TMUX").is_some_and(|v| !v.is_empty()) {
            return self.run("switch-client", &["switch-client", "-t", &target]);
        }

        let mut command = Command::new("tmux");
        command.args(["attach-session", "-t", &target]);
        debug!(session, "attaching");

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;

            // exec only returns on failure.
            let err = command.exec();
            Err(multiplexer_error("attach-session", err.into()))
        }

        #[cfg(not(unix))]
        {
            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(SessionError::Multiplexer {
                    action: "attach-session".to_string(),
                    reason: status.to_string(),
                }
                .into())
            }
        }
    }
}
