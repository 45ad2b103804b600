//! Up command.
//!
//! Runs the full bootstrap and hands the terminal to the workspace session.

use std::path::Path;
use tracing::info;

use crate::cli::output;
use crate::cli::terminal::Console;
use crate::core::bootstrap::Bootstrap;
use crate::core::config::Settings;
use crate::core::host::System;
use crate::core::session::Multiplexer;
use crate::core::tmux::Tmux;
use crate::error::Result;

/// Bootstrap everything, then attach unless `no_attach`.
pub fn execute(config: Option<&Path>, yes: bool, no_attach: bool) -> Result<()> {
    let settings = Settings::load(config)?;
    let host = System::new(Some(settings.log.clone()), settings.timeout);
    let tmux = Tmux::new(&host);
    let console = Console::new(yes);

    info!(session = %settings.session, "starting bootstrap");
    let summary = Bootstrap::new(&host, &tmux, &console, &settings).run()?;

    if summary.declined() {
        output::blank();
        output::hint(&format!(
            "run {} to use the existing session",
            output::cmd("agentmux attach")
        ));
        return Ok(());
    }

    // A child process cannot change its parent's environment.
    output::blank();
    output::hint(&format!(
        "run {} or open a new shell to load PATH, keys and the {} alias",
        output::cmd(&format!("source {}", settings.profile.display())),
        output::cmd(&settings.alias)
    ));
    output::dimmed(&format!("log: {}", settings.log.display()));

    if no_attach {
        output::hint(&format!(
            "attach later with {}",
            output::cmd(&format!("agentmux attach  # or: {}", settings.alias))
        ));
        return Ok(());
    }

    tmux.attach(&settings.session)
}
