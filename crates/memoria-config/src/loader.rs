// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./memoria.toml` > `~/.config/memoria/memoria.toml` >
//! `/etc/memoria/memoria.toml` with environment variable overrides via `MEMORIA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MemoriaConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/memoria/memoria.toml";
pub(crate) const LOCAL_CONFIG: &str = "memoria.toml";

/// Top-level tables an environment key may address.
const SECTIONS: [&str; 4] = ["server", "chunking", "embedding", "resilience"];

/// `~/.config/memoria/memoria.toml` (platform equivalent), if a config dir exists.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("memoria").join(LOCAL_CONFIG))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/memoria/memoria.toml` (system-wide)
/// 3. `~/.config/memoria/memoria.toml` (user XDG config)
/// 4. `./memoria.toml` (local directory)
/// 5. `MEMORIA_*` environment variables
pub fn load_config() -> Result<MemoriaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MemoriaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MemoriaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MemoriaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MemoriaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MemoriaConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MEMORIA_CHUNKING_MAX_EMBEDDING_CONTENT_LENGTH` must map to
/// `chunking.max_embedding_content_length`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("MEMORIA_").map(|key| {
        let key = key.as_str().to_ascii_lowercase();
        for section in SECTIONS {
            if let Some(rest) = key
                .strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key.into()
    })
}
