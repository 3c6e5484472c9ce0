// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as positive thresholds and known provider names.

use crate::diagnostic::ConfigError;
use crate::model::MemoriaConfig;

/// Smallest segment size that still yields meaningful chunks.
const MIN_MAX_CONTENT_LENGTH: usize = 100;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const EMBEDDING_PROVIDERS: &[&str] = &["openai", "disabled"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MemoriaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.server.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "server.log_level `{}` is not one of {}",
                config.server.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    let chunking = &config.chunking;
    if chunking.file_change_threshold == 0 {
        errors.push(ConfigError::Validation {
            message: "chunking.file_change_threshold must be at least 1".to_string(),
        });
    }

    if chunking.time_threshold_minutes == 0 {
        errors.push(ConfigError::Validation {
            message: "chunking.time_threshold_minutes must be at least 1".to_string(),
        });
    }

    if chunking.max_content_length < MIN_MAX_CONTENT_LENGTH {
        errors.push(ConfigError::Validation {
            message: format!(
                "chunking.max_content_length must be at least {MIN_MAX_CONTENT_LENGTH}, got {}",
                chunking.max_content_length
            ),
        });
    }

    if chunking.max_embedding_content_length == 0 {
        errors.push(ConfigError::Validation {
            message: "chunking.max_embedding_content_length must be positive".to_string(),
        });
    }

    let embedding = &config.embedding;
    if !EMBEDDING_PROVIDERS.contains(&embedding.provider.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "embedding.provider `{}` is not one of {}",
                embedding.provider,
                EMBEDDING_PROVIDERS.join(", ")
            ),
        });
    }

    if embedding.provider == "openai" {
        if embedding.endpoint.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "embedding.endpoint must not be empty".to_string(),
            });
        }
        if embedding.model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "embedding.model must not be empty".to_string(),
            });
        }
        if embedding.dimensions == 0 {
            errors.push(ConfigError::Validation {
                message: "embedding.dimensions must be positive".to_string(),
            });
        }
    }

    let resilience = &config.resilience;
    if resilience.failure_threshold == 0 {
        errors.push(ConfigError::Validation {
            message: "resilience.failure_threshold must be at least 1".to_string(),
        });
    }

    if resilience.success_threshold == 0 {
        errors.push(ConfigError::Validation {
            message: "resilience.success_threshold must be at least 1".to_string(),
        });
    }

    if resilience.max_half_open_requests == 0 {
        errors.push(ConfigError::Validation {
            message: "resilience.max_half_open_requests must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
