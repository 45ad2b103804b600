//! Constants used throughout agentmux.
//!
//! Centralizes file names, defaults, and the literal configuration lines
//! written to the user's tmux config.

/// Application directory relative to HOME (~/.agentmux).
pub const APP_DIR: &str = ".agentmux";

/// Configuration file name inside the application directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Secret file name inside the application directory.
pub const SECRETS_FILE: &str = "keys.env";

/// Persistent run log inside the application directory.
pub const LOG_FILE: &str = "bootstrap.log";

/// Default user-local npm prefix relative to HOME.
pub const DEFAULT_PREFIX: &str = ".npm-global";

/// tmux configuration file relative to HOME.
pub const TMUX_CONF: &str = ".tmux.conf";

/// Reserved tmux session identifier.
pub const DEFAULT_SESSION: &str = "agents";

/// Shell shortcut that attaches to the reserved session.
pub const DEFAULT_ALIAS: &str = "agents";

/// Default per-command timeout for installers, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 900;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "AGENTMUX_LOG";

/// Lines appended to the tmux config.
pub const TMUX_CONF_LINES: &[&str] = &[
    "set -g mouse on",
    "set -g pane-border-status top",
    "set -g pane-border-format \" #{pane_title} \"",
    "set -g status-interval 5",
    "set -g default-terminal \"screen-256color\"",
];
