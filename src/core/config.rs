//! Configuration file management.
//!
//! Reads the optional `~/.agentmux/config.toml` and resolves it into
//! [`Settings`]: absolute paths and options used by a bootstrap run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// On-disk configuration. Every field is optional.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub install: InstallSection,
    #[serde(default)]
    pub paths: PathsSection,
}

/// `[session]` table.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSection {
    /// Reserved tmux session identifier.
    pub name: Option<String>,
    /// Shell shortcut that attaches to the session.
    pub alias: Option<String>,
}

/// `[install]` table.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallSection {
    /// User-local npm prefix.
    pub prefix: Option<String>,
    /// Per-command timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[paths]` table.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    pub secrets: Option<String>,
    pub log: Option<String>,
    pub tmux_conf: Option<String>,
    pub profile: Option<String>,
}

/// Resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub home: PathBuf,
    pub session: String,
    pub alias: String,
    pub prefix: PathBuf,
    pub timeout: Duration,
    pub secrets: PathBuf,
    pub log: PathBuf,
    pub tmux_conf: PathBuf,
    pub profile: PathBuf,
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        Ok(home_dir()?
            .join(constants::APP_DIR)
            .join(constants::CONFIG_FILE))
    }

    /// Load configuration from `path`.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file exists but cannot be read,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            debug!("no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Resolve into [`Settings`] against `home`, picking the profile from `shell`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a value fails validation.
    pub fn resolve(&self, home: &Path, shell: Option<&str>) -> Result<Settings> {
        let session = self
            .session
            .name
            .clone()
            .unwrap_or_else(|| constants::DEFAULT_SESSION.to_string());
        validate_identifier("session.name", &session)?;

        let alias = self
            .session
            .alias
            .clone()
            .unwrap_or_else(|| constants::DEFAULT_ALIAS.to_string());
        validate_identifier("session.alias", &alias)?;

        let timeout_secs = self
            .install
            .timeout_secs
            .unwrap_or(constants::DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "install.timeout_secs",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        let app_dir = home.join(constants::APP_DIR);
        let pick = |value: &Option<String>, default: PathBuf| {
            value
                .as_deref()
                .map(|v| expand_home(v, home))
                .unwrap_or(default)
        };

        let settings = Settings {
            home: home.to_path_buf(),
            session,
            alias,
            prefix: pick(&self.install.prefix, home.join(constants::DEFAULT_PREFIX)),
            timeout: Duration::from_secs(timeout_secs),
            secrets: pick(&self.paths.secrets, app_dir.join(constants::SECRETS_FILE)),
            log: pick(&self.paths.log, app_dir.join(constants::LOG_FILE)),
            tmux_conf: pick(&self.paths.tmux_conf, home.join(constants::TMUX_CONF)),
            profile: pick(&self.paths.profile, default_profile(home, shell)),
        };

        debug!(?settings, "settings resolved");
        Ok(settings)
    }
}

impl Settings {
    /// Load the config at `path` (or the default path) and resolve it against
    /// the current user's home directory and `$SHELL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let home = home_dir()?;
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Config::default_path()?,
        };
        let shell = std::env::var("SHELL").ok();
        Config::load(&config_path)?.resolve(&home, shell.as_deref())
    }

    /// Directory holding the launch binaries installed under the prefix.
    pub fn prefix_bin(&self) -> PathBuf {
        self.prefix.join("bin")
    }

    /// Profile line putting the prefix on PATH.
    pub fn path_line(&self) -> String {
        format!("export PATH=\"{}:$PATH\"", self.prefix_bin().display())
    }

    /// Profile line sourcing the secret file when it exists.
    pub fn source_secrets_line(&self) -> String {
        let secrets = self.secrets.display();
        format!("[ -f \"{secrets}\" ] && . \"{secrets}\"")
    }

    /// Profile line defining the attach shortcut.
    pub fn alias_line(&self) -> String {
        format!(
            "alias {}='tmux attach-session -t {}'",
            self.alias, self.session
        )
    }
}

/// The current user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| ConfigError::NoHomeDir.into())
}

/// Choose the shell startup file for `shell` (usually `$SHELL`).
pub fn default_profile(home: &Path, shell: Option<&str>) -> PathBuf {
    let name = shell
        .and_then(|s| Path::new(s).file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("");

    match name {
        "zsh" => home.join(".zshrc"),
        "bash" => home.join(".bashrc"),
        _ => home.join(".profile"),
    }
}

fn expand_home(value: &str, home: &Path) -> PathBuf {
    if value == "~" {
        return home.to_path_buf();
    }
    match value.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(value),
    }
}

fn validate_identifier(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "cannot be empty".to_string(),
        }
        .into());
    }
    if let Some(bad) = value
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, ':' | '.' | '\'' | '"'))
    {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("'{}' contains forbidden character '{}'", value, bad),
        }
        .into());
    }
    Ok(())
}
