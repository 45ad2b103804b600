//! Status command - show what is installed, saved and running.

use serde::Serialize;
use std::path::Path;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::host::{self, Host, System};
use crate::core::platform::PackageManager;
use crate::core::secrets::SecretStore;
use crate::core::session::Multiplexer;
use crate::core::tmux::Tmux;
use crate::core::tools::TOOLS;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct Report {
    package_manager: Option<&'static str>,
    programs: Vec<Program>,
    secrets: Vec<Secret>,
    secrets_file: String,
    session: String,
    session_running: bool,
}

#[derive(Debug, Serialize)]
struct Program {
    name: &'static str,
    installed: bool,
}

#[derive(Debug, Serialize)]
struct Secret {
    name: &'static str,
    saved: bool,
}

/// Show a status overview.
pub fn execute(config: Option<&Path>, json: bool) -> Result<()> {
    let settings = Settings::load(config)?;
    let system = System::new(None, settings.timeout);

    // Tools installed under the prefix count even before the profile is reloaded.
    if let Some(path) = host::prepend_path(system.var("PATH").as_deref(), &settings.prefix_bin())
    {
        system.set_var("PATH", &path);
    }

    let report = collect(&system, &settings)?;

    if json {
        output::data(&serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::kv(
        "package manager",
        report.package_manager.unwrap_or("none found"),
    );

    output::section("Programs");
    for program in &report.programs {
        output::kv(
            program.name,
            if program.installed { "installed" } else { "missing" },
        );
    }

    output::section("Keys");
    output::dimmed(&output::path(&settings.secrets));
    for secret in &report.secrets {
        output::kv(secret.name, if secret.saved { "saved" } else { "not saved" });
    }

    output::section("Session");
    output::kv(
        &report.session,
        if report.session_running {
            "running"
        } else {
            "not running"
        },
    );

    Ok(())
}

fn collect(host: &dyn Host, settings: &Settings) -> Result<Report> {
    let mut names: Vec<&'static str> = vec!["node", "npm"];
    names.extend(TOOLS.iter().map(|t| t.binary));
    names.push("tmux");

    let programs: Vec<Program> = names
        .into_iter()
        .map(|name| Program {
            name,
            installed: host.which(name).is_some(),
        })
        .collect();

    let recorded = SecretStore::new(&settings.secrets).names()?;
    let secrets = TOOLS
        .iter()
        .map(|t| Secret {
            name: t.secret,
            saved: recorded.iter().any(|n| n == t.secret),
        })
        .collect();

    let tmux_installed = programs.iter().any(|p| p.name == "tmux" && p.installed);
    let session_running = tmux_installed && Tmux::new(host).has_session(&settings.session)?;

    Ok(Report {
        package_manager: PackageManager::detect(host).map(|pm| pm.id),
        programs,
        secrets,
        secrets_file: settings.secrets.display().to_string(),
        session: settings.session.clone(),
        session_running,
    })
}
