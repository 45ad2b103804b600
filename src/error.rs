//! Error types.
//!
//! Every fatal condition in a bootstrap run maps to one variant here. A
//! declined session recreation is not an error and never reaches this module.

use thiserror::Error;

/// Top-level error for all agentmux operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while provisioning the runtime, tools, or multiplexer.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("{name} is not available and could not be installed")]
    PrerequisiteMissing { name: String },

    #[error("failed to install {tool}: {reason}")]
    ToolInstallFailed { tool: String, reason: String },

    #[error("no supported package manager found to install {needed}")]
    UnsupportedPlatform { needed: String },

    #[error("`{command}` exited with {status}")]
    CommandFailed { command: String, status: String },

    #[error("`{command}` did not finish within {secs}s")]
    Timeout { command: String, secs: u64 },
}

/// Failures talking to the terminal multiplexer.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no session named '{0}'")]
    NotFound(String),

    #[error("tmux {action} failed: {reason}")]
    Multiplexer { action: String, reason: String },
}

/// Failures loading or validating `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unable to determine home directory")]
    NoHomeDir,
}

/// Rejected inputs for secrets and configuration lines.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("secret name cannot be empty")]
    EmptyKey,

    #[error("invalid secret name '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value for '{key}' contains a line break")]
    MultilineValue { key: String },

    #[error("configuration line for {file} contains a line break")]
    InvalidLine { file: String },
}

pub type Result<T> = std::result::Result<T, Error>;
