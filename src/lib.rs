//! Quill - the core of a small code editor with an embedded command shell
//!
//! This library holds everything of the editor that is not drawing: the
//! incremental syntax highlighter and the interactive command shell.
//!
//! ## Module Organization
//!
//! ### Highlighting
//!
//! - [`highlight`] - Rule table, line tokenizer, per-line highlight cache
//!
//! ### Shell
//!
//! - [`shell`] - Command dispatch, session (cwd, history), output buffer
//! - [`execution`] - Asynchronous process runner with cancellation
//! - [`models`] - Commands and output lines
//!
//! ### Ambient
//!
//! - [`config`] - Configuration values and the file loader
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use quill::{init, HighlightCoordinator, RuleTable};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = init()?;
//! let table = Arc::new(RuleTable::new(&config.highlight)?);
//!
//! let mut buffer = HighlightCoordinator::new(table);
//! buffer.set_text("def foo(x):  # comment");
//! let spans = buffer.spans(0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **Interactive thread:** owns the [`Shell`] and writes its output buffer
//! - **Job tasks:** one tokio task per external command, reporting back
//!   through a single-consumer channel (`tokio::mpsc`)
//!
//! The highlighter is synchronous and never touches the runtime.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod execution;
pub mod highlight;
pub mod models;
pub mod shell;

// Re-exports for core functionality
pub use config::{Config, HighlightConfig, ShellConfig};
pub use error::{Error, Result};
pub use execution::{Completion, JobId, JobOutcome, ProcessResult, ProcessRunner, ProcessSpec};
pub use highlight::{tokenize, tokenize_line, HighlightCoordinator, LineState, RuleTable, Span, StyleTag};
pub use models::{Command, OutputKind, OutputLine, Verb};
pub use shell::{Dispatch, Shell};

pub use config::loader::ConfigLoader;

/// The current version of Quill from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The package name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load configuration from the default search path.
///
/// Missing or unreadable configuration is not an error: the failure is
/// logged and the defaults are returned. Only an invalid default would fail.
pub fn init() -> Result<Config> {
    info!("Initializing {} v{}", NAME, VERSION);

    let config = match ConfigLoader::load() {
        Ok(config) => {
            info!("Configuration loaded from default location");
            config
        }
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults", e);
            Config::default()
        }
    };

    config::loader::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from an explicit file
pub fn init_with_config(config_path: &std::path::Path) -> Result<Config> {
    info!(
        "Initializing {} v{} with config: {}",
        NAME,
        VERSION,
        config_path.display()
    );

    if !config_path.exists() {
        return Err(Error::ConfigNotFound);
    }
    ConfigLoader::load_from_file(config_path)
}
