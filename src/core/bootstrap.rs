//! Bootstrap orchestrator.
//!
//! Runs the fixed sequence of idempotent steps that turns a machine into the
//! agent workspace:
//!
//! ```text
//! runtime → install prefix → tools → secrets → multiplexer config → session
//! ```
//!
//! Every step checks before it acts, so re-running after a failure is the
//! recovery path. The first fatal error aborts the run; completed steps are
//! not rolled back. Attaching to the session is left to the caller.

use serde::Serialize;
use std::fs;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::core::config::Settings;
use crate::core::constants;
use crate::core::host::{self, Host, Invocation};
use crate::core::lines;
use crate::core::platform::{PackageManager, SystemPackage};
use crate::core::secrets::{SecretOutcome, SecretStore};
use crate::core::session::{self, Layout, Multiplexer, SessionOutcome};
use crate::core::tools::{self, Provisioned, TOOLS};
use crate::error::{BootstrapError, Result};

/// The orchestrator's interaction channel with the user.
pub trait Terminal {
    /// A step is starting.
    fn step(&self, message: &str);

    /// A step finished.
    fn done(&self, message: &str);

    /// Ask whether the existing `session` should be destroyed and rebuilt.
    /// Non-interactive terminals must answer `false`.
    fn confirm_recreate(&self, session: &str) -> Result<bool>;

    /// Ask for a secret that is missing from the environment.
    /// Returns `None` to skip it. Non-interactive terminals must return `None`.
    fn ask_secret(&self, name: &str) -> Result<Option<Zeroizing<String>>>;
}

/// What a run did.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub package_manager: Option<&'static str>,
    pub runtime: Option<Provisioned>,
    pub tools: Vec<(String, Provisioned)>,
    pub secrets: Vec<(String, SecretOutcome)>,
    pub multiplexer: Option<Provisioned>,
    pub profile_lines_added: usize,
    pub tmux_lines_added: usize,
    pub session: Option<SessionOutcome>,
}

impl Summary {
    fn new(package_manager: Option<&'static PackageManager>) -> Self {
        Self {
            package_manager: package_manager.map(|pm| pm.id),
            runtime: None,
            tools: Vec::new(),
            secrets: Vec::new(),
            multiplexer: None,
            profile_lines_added: 0,
            tmux_lines_added: 0,
            session: None,
        }
    }

    /// Whether the user chose to keep an existing session.
    pub fn declined(&self) -> bool {
        matches!(self.session, Some(SessionOutcome::Declined))
    }
}

/// One bootstrap run.
pub struct Bootstrap<'a> {
    host: &'a dyn Host,
    mux: &'a dyn Multiplexer,
    terminal: &'a dyn Terminal,
    settings: &'a Settings,
    package_manager: Option<&'static PackageManager>,
    layout: Layout,
}

impl<'a> Bootstrap<'a> {
    /// Prepare a run, selecting the package manager once.
    pub fn new(
        host: &'a dyn Host,
        mux: &'a dyn Multiplexer,
        terminal: &'a dyn Terminal,
        settings: &'a Settings,
    ) -> Self {
        let package_manager = PackageManager::detect(host);
        debug!(
            package_manager = package_manager.map(|pm| pm.id),
            "platform detected"
        );
        Self {
            host,
            mux,
            terminal,
            settings,
            package_manager,
            layout: Layout::workspace(),
        }
    }

    /// Run every step in order.
    ///
    /// # Errors
    ///
    /// The first fatal step error. A declined session recreation is not an
    /// error; see [`Summary::declined`].
    pub fn run(&self) -> Result<Summary> {
        let mut summary = Summary::new(self.package_manager);

        summary.runtime = Some(self.ensure_runtime()?);
        summary.profile_lines_added += self.configure_prefix()?;
        summary.tools = self.install_tools()?;
        let (secrets, added) = self.persist_secrets()?;
        summary.secrets = secrets;
        summary.profile_lines_added += added;
        let (multiplexer, tmux_lines, profile_lines) = self.configure_multiplexer()?;
        summary.multiplexer = Some(multiplexer);
        summary.tmux_lines_added = tmux_lines;
        summary.profile_lines_added += profile_lines;
        summary.session = Some(self.create_session()?);

        info!(?summary, "bootstrap finished");
        Ok(summary)
    }

    fn system_install(&self, package: SystemPackage) -> Result<()> {
        let pm = self
            .package_manager
            .ok_or_else(|| BootstrapError::UnsupportedPlatform {
                needed: package.display_name().to_string(),
            })?;
        self.terminal.step(&format!(
            "installing {} with {}",
            package.display_name(),
            pm.id
        ));
        pm.install(self.host, package)
    }

    /// Step 1: Node.js and npm.
    pub fn ensure_runtime(&self) -> Result<Provisioned> {
        self.terminal.step("checking node runtime");
        let host = self.host;
        let provisioned = tools::ensure_tool_present(
            "node",
            || host.which("node").is_some() && host.which("npm").is_some(),
            || self.system_install(SystemPackage::Node),
        )?;
        self.terminal.done(&describe("node", provisioned));
        Ok(provisioned)
    }

    /// Step 2: user-local npm prefix on PATH.
    ///
    /// Returns the number of profile lines added.
    pub fn configure_prefix(&self) -> Result<usize> {
        let prefix = &self.settings.prefix;
        self.terminal
            .step(&format!("configuring npm prefix {}", prefix.display()));

        fs::create_dir_all(self.settings.prefix_bin())?;

        let wanted = prefix.display().to_string();
        let current = self
            .host
            .capture(&Invocation::new("npm", ["config", "get", "prefix"]))?;
        if current != wanted {
            debug!(%current, %wanted, "updating npm prefix");
            self.host.run(&Invocation::new(
                "npm",
                ["config", "set", "prefix", wanted.as_str()],
            ))?;
        }

        if let Some(path) = host::prepend_path(
            self.host.var("PATH").as_deref(),
            &self.settings.prefix_bin(),
        ) {
            self.host.set_var("PATH", &path);
        }

        let added = usize::from(lines::append_line_if_absent(
            &self.settings.profile,
            &self.settings.path_line(),
        )?);
        self.terminal.done("npm prefix configured");
        Ok(added)
    }

    /// Step 3: the assistant CLIs.
    pub fn install_tools(&self) -> Result<Vec<(String, Provisioned)>> {
        let mut results = Vec::with_capacity(TOOLS.len());
        for tool in TOOLS {
            self.terminal.step(&format!("checking {}", tool.binary));
            let host = self.host;
            let provisioned = tools::ensure_tool_present(
                tool.binary,
                || host.which(tool.binary).is_some(),
                || {
                    self.terminal
                        .step(&format!("installing {} ({})", tool.binary, tool.package));
                    host.run(&Invocation::new("npm", ["install", "-g", tool.package]))
                },
            )?;
            self.terminal.done(&describe(tool.binary, provisioned));
            results.push((tool.binary.to_string(), provisioned));
        }
        Ok(results)
    }

    /// Step 4: API keys.
    ///
    /// Returns each key's outcome and the number of profile lines added.
    pub fn persist_secrets(&self) -> Result<(Vec<(String, SecretOutcome)>, usize)> {
        let store = SecretStore::new(&self.settings.secrets);
        let mut outcomes = Vec::with_capacity(TOOLS.len());

        for tool in TOOLS {
            let value = match self.host.var(tool.secret).filter(|v| !v.is_empty()) {
                Some(v) => Zeroizing::new(v),
                None => match self.terminal.ask_secret(tool.secret)? {
                    Some(v) => v,
                    None => Zeroizing::new(String::new()),
                },
            };

            let outcome = persist_secret(self.host, &store, tool.secret, &value)?;
            let message = match outcome {
                SecretOutcome::Skipped => format!("{} not provided, skipped", tool.secret),
                SecretOutcome::Recorded => format!("{} saved", tool.secret),
                SecretOutcome::AlreadyRecorded { differs: false } => {
                    format!("{} already saved", tool.secret)
                }
                SecretOutcome::AlreadyRecorded { differs: true } => format!(
                    "{} already saved with a different value, keeping the saved one",
                    tool.secret
                ),
            };
            self.terminal.done(&message);
            outcomes.push((tool.secret.to_string(), outcome));
        }

        let added = usize::from(lines::append_line_if_absent(
            &self.settings.profile,
            &self.settings.source_secrets_line(),
        )?);
        Ok((outcomes, added))
    }

    /// Step 5: tmux itself, its config, and the attach shortcut.
    ///
    /// Returns how tmux was provisioned, tmux config lines added, and profile
    /// lines added.
    pub fn configure_multiplexer(&self) -> Result<(Provisioned, usize, usize)> {
        self.terminal.step("checking tmux");
        let host = self.host;
        let provisioned = tools::ensure_tool_present(
            "tmux",
            || host.which("tmux").is_some(),
            || self.system_install(SystemPackage::Tmux),
        )?;

        let tmux_lines = lines::append_lines_if_absent(
            &self.settings.tmux_conf,
            constants::TMUX_CONF_LINES.iter().copied(),
        )?;
        if tmux_lines > 0 {
            // A server started before the change would not see the new lines.
            match self.mux.reload_config(&self.settings.tmux_conf) {
                Ok(true) => debug!("tmux config reloaded in running server"),
                Ok(false) => {}
                Err(e) => warn!(error = %e, "could not reload tmux config"),
            }
        }
        let profile_lines = usize::from(lines::append_line_if_absent(
            &self.settings.profile,
            &self.settings.alias_line(),
        )?);

        self.terminal.done(&describe("tmux", provisioned));
        Ok((provisioned, tmux_lines, profile_lines))
    }

    /// Step 6: the workspace session.
    pub fn create_session(&self) -> Result<SessionOutcome> {
        self.terminal
            .step(&format!("creating session {}", self.settings.session));
        let outcome = session::create_session(
            self.mux,
            &self.settings.session,
            &self.layout,
            |name| self.terminal.confirm_recreate(name),
        )?;

        match &outcome {
            SessionOutcome::Declined => {
                self.terminal
                    .done(&format!("kept existing session {}", self.settings.session))
            }
            SessionOutcome::Created { panes } | SessionOutcome::Recreated { panes } => self
                .terminal
                .done(&format!(
                    "session {} ready with {} panes",
                    self.settings.session,
                    panes.len()
                )),
        }
        Ok(outcome)
    }
}

/// Record `value` under `name` (first write wins) and export it to the
/// current process environment.
///
/// An empty value is neither recorded nor exported.
pub fn persist_secret(
    host: &dyn Host,
    store: &SecretStore,
    name: &str,
    value: &str,
) -> Result<SecretOutcome> {
    let outcome = store.persist(name, value)?;
    if outcome != SecretOutcome::Skipped {
        host.set_var(name, value);
    }
    Ok(outcome)
}

fn describe(name: &str, provisioned: Provisioned) -> String {
    match provisioned {
        Provisioned::AlreadyPresent => format!("{} already installed", name),
        Provisioned::Installed => format!("{} installed", name),
    }
}
