//! Completions command.

use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use std::io::Write;

use crate::cli::{Cli, Shell};
use crate::error::Result;

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
        }
    }
}

/// Print the completion script for `shell` to stdout.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut stdout = std::io::stdout().lock();

    generate(CompletionShell::from(shell), &mut cmd, name, &mut stdout);
    stdout.flush()?;
    Ok(())
}
