//! Input validation for secrets and configuration lines.

use crate::error::{Result, ValidationError};

/// Validate a secret name.
///
/// Secret names must be valid environment variable names:
/// - Only A-Z, a-z, 0-9, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    if key.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: "cannot start with a digit".to_string(),
        }
        .into());
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a configuration line destined for `file`.
///
/// A line is the unit of set membership, so it must not span lines itself.
pub fn validate_line(file: &std::path::Path, line: &str) -> Result<()> {
    if line.contains('\n') || line.contains('\r') {
        return Err(ValidationError::InvalidLine {
            file: file.display().to_string(),
        }
        .into());
    }
    Ok(())
}

/// Validate a secret value for `key`.
///
/// Each entry in the secret file is one line, so a value must not span lines.
pub fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.contains('\n') || value.contains('\r') {
        return Err(ValidationError::MultilineValue {
            key: key.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Read the permission bits of a file (Unix only).
#[cfg(unix)]
pub fn file_mode(path: &std::path::Path) -> Result<u32> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    Ok(metadata.permissions().mode() & 0o777)
}
