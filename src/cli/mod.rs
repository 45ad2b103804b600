//! Command-line interface.

pub mod attach;
pub mod completions;
pub mod logging;
pub mod output;
pub mod status;
pub mod terminal;
pub mod up;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// agentmux - Claude, Gemini and Codex side by side in tmux.
#[derive(Parser)]
#[command(
    name = "agentmux",
    about = "Install Claude, Gemini and Codex CLIs and open them side by side in tmux",
    version,
    after_help = "Run with no command to bootstrap and attach."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config.toml (default: ~/.agentmux/config.toml)
    #[arg(long, global = true, env = "AGENTMUX_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Install what is missing, configure tmux, and open the workspace
    Up {
        /// Recreate an existing session without asking
        #[arg(short, long)]
        yes: bool,
        /// Set everything up but do not attach
        #[arg(long)]
        no_attach: bool,
    },

    /// Attach to the workspace session
    Attach,

    /// Show what is installed, saved and running
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Option<Command>, config: Option<PathBuf>) -> crate::error::Result<()> {
    use Command::*;

    let command = command.unwrap_or(Up {
        yes: false,
        no_attach: false,
    });

    match command {
        Up { yes, no_attach } => up::execute(config.as_deref(), yes, no_attach),
        Attach => attach::execute(config.as_deref()),
        Status { json } => status::execute(config.as_deref(), json),
        Completions { shell } => completions::execute(shell),
    }
}
