//! Secret store.
//!
//! API keys are kept in a shell-sourceable file of `export NAME="VALUE"`
//! lines with owner-only permissions. Entries are append-only and the first
//! recorded value for a name wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::validation;
use crate::error::Result;

/// Result of persisting one secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretOutcome {
    /// No value was supplied; nothing was recorded.
    Skipped,
    /// The value was appended to the store.
    Recorded,
    /// A value was already recorded and kept as is.
    AlreadyRecorded {
        /// Whether the supplied value differs from the recorded one.
        differs: bool,
    },
}

/// Append-only secret file.
#[derive(Debug, Clone)]
pub struct SecretStore {
    path: PathBuf,
}

impl SecretStore {
    /// Open the store at `path`. The file is created lazily on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the secret file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded entries, first occurrence of each name.
    ///
    /// A missing file yields an empty map. Lines that are not
    /// `export NAME=...` assignments are ignored.
    pub fn entries(&self) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = BTreeMap::new();
        for line in contents.lines() {
            if let Some((name, value)) = parse_export(line) {
                entries.entry(name).or_insert(value);
            }
        }
        Ok(entries)
    }

    /// Recorded secret names, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.entries()?.into_keys().collect())
    }

    /// Persist `value` under `name` unless a value is already recorded.
    ///
    /// An empty `value` is never written. A previously recorded value is
    /// never replaced, even when `value` differs from it.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for an invalid name or a value spanning
    /// more than one line, or an IO error if the file cannot be written.
    pub fn persist(&self, name: &str, value: &str) -> Result<SecretOutcome> {
        validation::validate_key(name)?;

        if value.is_empty() {
            debug!(name, "no value supplied, skipping");
            return Ok(SecretOutcome::Skipped);
        }
        validation::validate_value(name, value)?;

        if let Some(recorded) = self.entries()?.get(name) {
            let differs = recorded != value;
            if differs {
                warn!(name, "a different value is already recorded, keeping it");
            }
            return Ok(SecretOutcome::AlreadyRecorded { differs });
        }

        self.append(&format_export(name, value))?;
        debug!(name, path = %self.path.display(), "secret recorded");
        Ok(SecretOutcome::Recorded)
    }

    fn append(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(parent, fs::Permissions::from_mode(0o700))?;
                }
            }
        }

        let needs_newline = match fs::read(&self.path) {
            Ok(bytes) => !bytes.is_empty() && !bytes.ends_with(b"\n"),
            Err(_) => false,
        };

        #[cfg(unix)]
        let mut file = {
            use std::os::unix::fs::OpenOptionsExt;

            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .mode(0o600)
                .open(&self.path)?
        };

        #[cfg(not(unix))]
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if needs_newline {
            file.write_all(b"\n")?;
        }
        file.write_all(line.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;

        // Tighten permissions even when the file predates us.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

/// Format one `export NAME="VALUE"` line.
pub fn format_export(name: &str, value: &str) -> String {
    format!("export {}=\"{}\"", name, escape_value(value))
}

fn parse_export(line: &str) -> Option<(String, String)> {
    let rest = line.trim().strip_prefix("export ")?;
    let (name, raw) = rest.split_once('=')?;
    let name = name.trim();
    if validation::validate_key(name).is_err() {
        return None;
    }
    Some((name.to_string(), unquote_value(raw.trim())))
}

/// Escape a value for a POSIX double-quoted string.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '"' | '$' | '`' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn unquote_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    if !(raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"')) {
        return raw.to_string();
    }

    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | '"' | '$' | '`')) => out.push(next),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
