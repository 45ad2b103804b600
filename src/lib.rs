//! agentmux - Bootstrap Claude, Gemini and Codex into one tmux workspace.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── up            # Full bootstrap, then attach
//! │   ├── attach        # Attach to the workspace session
//! │   ├── status        # Report what is installed and saved
//! │   ├── terminal      # Progress output and prompts
//! │   ├── logging       # stderr and run-log tracing layers
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── bootstrap     # Step orchestrator
//!     ├── config        # config.toml and resolved settings
//!     ├── constants     # File names and defaults
//!     ├── host          # Process / environment boundary
//!     ├── lines         # Append-line-if-absent
//!     ├── platform      # Package manager table
//!     ├── secrets       # Append-only API key store
//!     ├── session       # Layout and Multiplexer trait
//!     ├── tmux          # tmux Multiplexer
//!     ├── tools         # Assistant CLI table, ensure-tool-present
//!     └── validation    # Secret names and config lines
//! ```
//!
//! Every step is check-then-act, so running `agentmux up` again after a
//! failure picks up where the last run stopped.

pub mod cli;
pub mod core;
pub mod error;
