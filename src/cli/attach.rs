//! Attach command.

use std::path::Path;

use crate::core::config::Settings;
use crate::core::host::System;
use crate::core::session::Multiplexer;
use crate::core::tmux::Tmux;
use crate::error::{Result, SessionError};

/// Attach to the workspace session if it exists.
pub fn execute(config: Option<&Path>) -> Result<()> {
    let settings = Settings::load(config)?;
    let host = System::new(None, settings.timeout);
    let tmux = Tmux::new(&host);

    if !tmux.has_session(&settings.session)? {
        return Err(SessionError::NotFound(settings.session).into());
    }

    tmux.attach(&settings.session)
}
