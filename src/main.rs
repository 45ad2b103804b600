//! agentmux - Claude, Gemini and Codex side by side in tmux.

use clap::Parser;

use agentmux::cli::output;
use agentmux::cli::{execute, logging, Cli, Command};
use agentmux::core::config::Settings;
use agentmux::error::{BootstrapError, ConfigError, Error, SessionError};

fn main() {
    let cli = Cli::parse();

    // Only bootstrap runs are mirrored into the run log.
    let run_log = match cli.command {
        None | Some(Command::Up { .. }) => Settings::load(cli.config.as_deref())
            .ok()
            .map(|s| s.log),
        _ => None,
    };
    logging::init(cli.verbose, run_log.as_deref());

    if let Err(e) = execute(cli.command, cli.config) {
        let suggestion = match &e {
            Error::Bootstrap(BootstrapError::UnsupportedPlatform { .. }) => {
                Some("install node and tmux manually, then rerun agentmux")
            }
            Error::Session(SessionError::NotFound(_)) => Some("run: agentmux up"),
            Error::Config(ConfigError::Parse(_)) | Error::Config(ConfigError::InvalidValue { .. }) => {
                Some("check ~/.agentmux/config.toml")
            }
            Error::Config(ConfigError::NoHomeDir) => Some("set HOME and rerun"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
