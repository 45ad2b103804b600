//! Interactive terminal for the bootstrap orchestrator.
//!
//! Prompts only when stdin is a terminal. Without one, session recreation
//! is refused and missing keys are skipped.

use std::io::{self, IsTerminal};

use dialoguer::{Confirm, Password};
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::bootstrap::Terminal;
use crate::error::Result;

/// Console-backed [`Terminal`].
pub struct Console {
    assume_yes: bool,
    interactive: bool,
}

impl Console {
    /// `assume_yes` answers the recreation prompt without asking.
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            interactive: io::stdin().is_terminal(),
        }
    }
}

impl Terminal for Console {
    fn step(&self, message: &str) {
        output::step(message);
    }

    fn done(&self, message: &str) {
        output::success(message);
    }

    fn confirm_recreate(&self, session: &str) -> Result<bool> {
        output::warn(&format!("session {} already exists", session));

        if self.assume_yes {
            return Ok(true);
        }
        if !self.interactive {
            output::hint("not a terminal; pass --yes to recreate it");
            return Ok(false);
        }

        Confirm::new()
            .with_prompt("Destroy it and start fresh?")
            .default(false)
            .interact()
            .map_err(Into::into)
    }

    fn ask_secret(&self, name: &str) -> Result<Option<Zeroizing<String>>> {
        if !self.interactive {
            return Ok(None);
        }

        let value = Zeroizing::new(
            Password::new()
                .with_prompt(format!("{} (enter to skip)", name))
                .allow_empty_password(true)
                .interact()?,
        );

        if value.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }
}
