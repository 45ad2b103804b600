//! Session layout and creation.
//!
//! The workspace is one tmux session with one window of tiled panes. Pane
//! creation goes through [`Multiplexer`] so the layout logic runs against a
//! fake in tests; [`crate::core::tmux::Tmux`] is the real implementation.

use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::core::tools::TOOLS;
use crate::error::Result;

/// Label of the plain shell pane.
pub const SHELL_LABEL: &str = "Shell";

/// Layout algorithm applied to the window.
pub const TILED: &str = "tiled";

/// One pane of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSpec {
    /// Title shown in the pane border.
    pub label: String,
    /// Command typed into the pane on startup; `None` leaves a plain shell.
    pub command: Option<String>,
}

/// A fixed arrangement of panes. Not persisted; rebuilt every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub panes: Vec<PaneSpec>,
}

impl Layout {
    /// The workspace layout: one pane per assistant tool, then a shell.
    pub fn workspace() -> Self {
        let mut panes: Vec<PaneSpec> = TOOLS
            .iter()
            .map(|tool| PaneSpec {
                label: tool.label.to_string(),
                command: Some(tool.command_line()),
            })
            .collect();
        panes.push(PaneSpec {
            label: SHELL_LABEL.to_string(),
            command: None,
        });
        Self { panes }
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.panes.iter().map(|p| p.label.as_str()).collect()
    }
}

/// Identifier of a pane as reported by the multiplexer (e.g. `%3`).
pub type PaneId = String;

/// Terminal multiplexer control interface.
pub trait Multiplexer {
    /// Whether a session named `session` exists.
    fn has_session(&self, session: &str) -> Result<bool>;

    /// Destroy `session`.
    fn kill_session(&self, session: &str) -> Result<()>;

    /// Create a detached session and return its first pane.
    fn new_session(&self, session: &str) -> Result<PaneId>;

    /// Split `target` and return the new pane.
    fn split_pane(&self, target: &PaneId) -> Result<PaneId>;

    /// Apply a layout algorithm to the session's window.
    fn select_layout(&self, session: &str, layout: &str) -> Result<()>;

    /// Set the border title of `pane`.
    fn set_title(&self, pane: &PaneId, title: &str) -> Result<()>;

    /// Type `command` into `pane` and press enter.
    fn send_command(&self, pane: &PaneId, command: &str) -> Result<()>;

    /// Focus `pane`.
    fn select_pane(&self, pane: &PaneId) -> Result<()>;

    /// Hand the invoking terminal over to `session`.
    fn attach(&self, session: &str) -> Result<()>;

    /// Re-read `config` in an already running server.
    ///
    /// Returns `false` without doing anything when no server is running.
    fn reload_config(&self, config: &Path) -> Result<bool>;
}

/// How session creation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// A fresh session was created.
    Created { panes: Vec<PaneId> },
    /// An old session was destroyed and rebuilt.
    Recreated { panes: Vec<PaneId> },
    /// An old session exists and the user chose to keep it.
    Declined,
}

/// Create `session` with `layout`.
///
/// When the session already exists `confirm` decides whether it is
/// destroyed and rebuilt; a refusal leaves it untouched and returns
/// [`SessionOutcome::Declined`]. Does not attach.
pub fn create_session<M, C>(
    mux: &M,
    session: &str,
    layout: &Layout,
    confirm: C,
) -> Result<SessionOutcome>
where
    M: Multiplexer + ?Sized,
    C: FnOnce(&str) -> Result<bool>,
{
    let existed = mux.has_session(session)?;
    if existed {
        if !confirm(session)? {
            info!(session, "keeping existing session");
            return Ok(SessionOutcome::Declined);
        }
        info!(session, "destroying existing session");
        mux.kill_session(session)?;
    }

    let panes = build_panes(mux, session, layout)?;

    Ok(if existed {
        SessionOutcome::Recreated { panes }
    } else {
        SessionOutcome::Created { panes }
    })
}

fn build_panes<M>(mux: &M, session: &str, layout: &Layout) -> Result<Vec<PaneId>>
where
    M: Multiplexer + ?Sized,
{
    let first = mux.new_session(session)?;
    let mut panes = vec![first];

    // Re-tile after every split so the window always has room for the next.
    for _ in 1..layout.len() {
        let last = panes[panes.len() - 1].clone();
        let pane = mux.split_pane(&last)?;
        mux.select_layout(session, TILED)?;
        panes.push(pane);
    }
    mux.select_layout(session, TILED)?;

    for (pane, spec) in panes.iter().zip(&layout.panes) {
        mux.set_title(pane, &spec.label)?;
        if let Some(command) = &spec.command {
            mux.send_command(pane, command)?;
        }
        debug!(pane = %pane, label = %spec.label, "pane ready");
    }

    mux.select_pane(&panes[0])?;
    info!(session, panes = panes.len(), "session created");
    Ok(panes)
}
