//! Platform package managers.
//!
//! A static table maps each supported package manager to the commands that
//! install system packages with it. The first one found on PATH is selected
//! once at startup.

use crate::core::host::{Host, Invocation};

/// System packages the bootstrap may need to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPackage {
    /// Node.js runtime together with npm.
    Node,
    /// The tmux terminal multiplexer.
    Tmux,
}

impl SystemPackage {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Tmux => "tmux",
        }
    }
}

/// Installer capability for one package manager.
#[derive(Debug, PartialEq, Eq)]
pub struct PackageManager {
    /// Identifier shown to users.
    pub id: &'static str,
    /// Binary looked up on PATH to detect the manager.
    pub binary: &'static str,
    /// Whether installs need root.
    pub privileged: bool,
    /// Arguments preceding package names in an install.
    pub install: &'static [&'static str],
    /// Index refresh run before the first install, if any.
    pub refresh: Option<&'static [&'static str]>,
    /// Package names providing Node.js and npm.
    pub node: &'static [&'static str],
    /// Package names providing tmux.
    pub tmux: &'static [&'static str],
}

/// Supported package managers in detection order.
pub const PACKAGE_MANAGERS: &[PackageManager] = &[
    PackageManager {
        id: "homebrew",
        binary: "brew",
        privileged: false,
        install: &["install"],
        refresh: None,
        node: &["node"],
        tmux: &["tmux"],
    },
    PackageManager {
        id: "apt",
        binary: "apt-get",
        privileged: true,
        install: &["install", "-y"],
        refresh: Some(&["update"]),
        node: &["nodejs", "npm"],
        tmux: &["tmux"],
    },
    PackageManager {
        id: "dnf",
        binary: "dnf",
        privileged: true,
        install: &["install", "-y"],
        refresh: None,
        node: &["nodejs", "npm"],
        tmux: &["tmux"],
    },
    PackageManager {
        id: "yum",
        binary: "yum",
        privileged: true,
        install: &["install", "-y"],
        refresh: None,
        node: &["nodejs", "npm"],
        tmux: &["tmux"],
    },
    PackageManager {
        id: "pacman",
        binary: "pacman",
        privileged: true,
        install: &["-S", "--noconfirm", "--needed"],
        refresh: Some(&["-Sy"]),
        node: &["nodejs", "npm"],
        tmux: &["tmux"],
    },
    PackageManager {
        id: "zypper",
        binary: "zypper",
        privileged: true,
        install: &["--non-interactive", "install"],
        refresh: None,
        node: &["nodejs", "npm"],
        tmux: &["tmux"],
    },
    PackageManager {
        id: "apk",
        binary: "apk",
        privileged: true,
        install: &["add"],
        refresh: Some(&["update"]),
        node: &["nodejs", "npm"],
        tmux: &["tmux"],
    },
];

impl PackageManager {
    /// Select the first package manager available on this host.
    pub fn detect(host: &dyn Host) -> Option<&'static PackageManager> {
        PACKAGE_MANAGERS
            .iter()
            .find(|pm| host.which(pm.binary).is_some())
    }

    /// Look up a package manager by identifier.
    pub fn by_id(id: &str) -> Option<&'static PackageManager> {
        PACKAGE_MANAGERS.iter().find(|pm| pm.id == id)
    }

    fn packages(&self, package: SystemPackage) -> &'static [&'static str] {
        match package {
            SystemPackage::Node => self.node,
            SystemPackage::Tmux => self.tmux,
        }
    }

    /// Commands that install `package`, in order.
    ///
    /// Privileged managers are wrapped in `sudo` unless running as root.
    pub fn install_commands(&self, package: SystemPackage, as_root: bool) -> Vec<Invocation> {
        let elevate = |inv: Invocation| {
            if self.privileged && !as_root {
                inv.elevated()
            } else {
                inv
            }
        };

        let mut commands = Vec::new();
        if let Some(refresh) = self.refresh {
            commands.push(elevate(Invocation::new(self.binary, refresh.iter().copied())));
        }

        let args = self
            .install
            .iter()
            .chain(self.packages(package).iter())
            .copied();
        commands.push(elevate(Invocation::new(self.binary, args)));
        commands
    }

    /// Install `package` through `host`.
    pub fn install(&self, host: &dyn Host, package: SystemPackage) -> crate::error::Result<()> {
        for invocation in self.install_commands(package, host.is_root()) {
            host.run(&invocation)?;
        }
        Ok(())
    }
}
