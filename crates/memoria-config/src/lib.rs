// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Memoria chunking engine.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `MEMORIA_*` environment variable overrides, and
//! miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use memoria_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("file change threshold: {}", config.chunking.file_change_threshold);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::MemoriaConfig;

use std::path::{Path, PathBuf};

/// Load configuration from the standard locations and validate it.
///
/// Deserialization errors are converted to diagnostics with spans into
/// whichever config files exist; validation runs only when loading succeeded
/// and reports every failed check at once.
pub fn load_and_validate() -> Result<MemoriaConfig, Vec<ConfigError>> {
    checked(loader::load_config(), standard_sources)
}

/// Load one specific file (plus `MEMORIA_*` overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<MemoriaConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        read_source(path).into_iter().collect()
    })
}

/// Load configuration from a TOML string and validate it. No files or
/// environment variables are consulted.
pub fn load_and_validate_str(toml_content: &str) -> Result<MemoriaConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![(diagnostic::INLINE_SOURCE.to_string(), toml_content.to_string())]
    })
}

fn checked(
    loaded: Result<MemoriaConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<MemoriaConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Figment reports file sources by absolute path; key the text the same way.
fn read_source(path: &Path) -> Option<(String, String)> {
    let content = std::fs::read_to_string(path).ok()?;
    let name = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    Some((name.display().to_string(), content))
}

/// Text of every standard config file that exists, keyed by the path figment
/// reports for it.
fn standard_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG));

    [Some(local), loader::user_config_path(), Some(PathBuf::from(loader::SYSTEM_CONFIG))]
        .into_iter()
        .flatten()
        .filter_map(|path| read_source(&path))
        .collect()
}
