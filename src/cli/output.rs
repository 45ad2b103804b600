//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: paths, commands, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info
//!
//! Every message is also emitted as a tracing event so it lands in the run
//! log next to the output of the commands that produced it.

use console::style;
use std::fmt::Display;
use tracing::info;

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ claude installed`
pub fn success(msg: &str) {
    info!("{}", msg);
    if colors_enabled() {
        println!("{} {}", style("✓").green(), msg);
    } else {
        println!("✓ {}", msg);
    }
}

/// Print an error message to stderr (red).
///
/// Example: `✗ no supported package manager found to install node`
pub fn error(msg: &str) {
    info!(kind = "error", "{}", msg);
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message (yellow).
///
/// Example: `⚠ session agents already exists`
pub fn warn(msg: &str) {
    info!(kind = "warn", "{}", msg);
    if colors_enabled() {
        println!("{} {}", style("⚠").yellow(), msg);
    } else {
        println!("⚠ {}", msg);
    }
}

/// Print a hint message (cyan).
///
/// Example: `→ run agentmux attach`
pub fn hint(msg: &str) {
    info!("{}", msg);
    if colors_enabled() {
        println!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        println!("→ {}", msg);
    }
}

/// Print an in-progress step (dimmed).
///
/// Example: `· checking tmux`
pub fn step(msg: &str) {
    info!("{}", msg);
    if colors_enabled() {
        println!("{} {}", style("·").dim(), style(msg).dim());
    } else {
        println!("· {}", msg);
    }
}

/// Print a bold section header.
fn header(title: &str) {
    if colors_enabled() {
        println!("{}", style(title).bold());
    } else {
        println!("{}", title);
    }
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  tmux  present`
pub fn kv(label: &str, value: impl Display) {
    if colors_enabled() {
        println!(
            "  {}  {}",
            style(format!("{:<18}", label)).dim(),
            style(value.to_string()).bold()
        );
    } else {
        println!("  {:<18}  {}", label, value);
    }
}

/// Print a horizontal rule separator.
fn rule() {
    if colors_enabled() {
        println!("{}", style("─".repeat(RULE_WIDTH)).dim());
    } else {
        println!("{}", "─".repeat(RULE_WIDTH));
    }
}

/// Format a path in cyan.
pub fn path(p: &std::path::Path) -> String {
    let p = p.display().to_string();
    if colors_enabled() {
        style(p).cyan().to_string()
    } else {
        p
    }
}

/// Format a command string in green.
pub fn cmd(c: &str) -> String {
    if colors_enabled() {
        style(c).green().to_string()
    } else {
        c.to_string()
    }
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    if colors_enabled() {
        println!("{}", style(msg).dim());
    } else {
        println!("{}", msg);
    }
}

/// Print raw data (JSON, etc.) without decoration.
pub fn data(msg: &str) {
    println!("{}", msg);
}

/// Print an empty line.
pub fn blank() {
    println!();
}

/// Print a section header with a separator line.
///
/// ```text
/// Tools
/// ────────────────────────────────────────────────────────
/// ```
pub fn section(title: &str) {
    blank();
    header(title);
    rule();
}
