// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment load failures into miette diagnostics.
//!
//! Unknown keys are matched against the section's known keys so a typo like
//! `file_change_treshold` comes back with a suggestion. When the offending
//! TOML text is available the diagnostic points at the exact key.

#![allow(unused_assignments)] // triggered by code from miette's Diagnostic derive

use figment::error::{Error as FigmentError, Kind};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a known key must beat to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Source name used for configuration loaded from a string.
pub(crate) const INLINE_SOURCE: &str = "<inline>";

/// A configuration problem, renderable with [`render_errors`].
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(memoria::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest known key, if any is similar enough.
        suggestion: Option<String>,
        /// Comma-separated keys accepted in the same section.
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(memoria::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `chunking.file_change_threshold`.
        key: String,
        detail: String,
        expected: String,
        #[label("this value")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(memoria::config::missing_key),
        help("set `{key}` in memoria.toml")
    )]
    MissingKey { key: String },

    /// A value parsed but failed a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(memoria::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(memoria::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(key) => format!("did you mean `{key}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error carried by `err` into a diagnostic.
///
/// `toml_sources` pairs a source name (file path, or `<inline>`) with its
/// text; it is only used to attach source spans.
pub fn figment_to_config_errors(
    err: FigmentError,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| to_config_error(&error, toml_sources))
        .collect()
}

fn to_config_error(error: &FigmentError, toml_sources: &[(String, String)]) -> ConfigError {
    match &error.kind {
        Kind::UnknownField(field, expected) => {
            // For unknown fields the error path is the enclosing section.
            let (span, src) = span_for(error, &error.path, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: field.to_string(),
        },
        Kind::InvalidType(actual, expected) => {
            let (section, field) = match error.path.split_last() {
                Some((field, section)) => (section, field.as_str()),
                None => (&[][..], ""),
            };
            let (span, src) = span_for(error, section, field, toml_sources);
            ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
                span,
                src,
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

/// Pick the TOML text the error came from and find `field` under `section`.
fn span_for(
    error: &FigmentError,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let file = error
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });
    let wanted = file.as_deref().unwrap_or(INLINE_SOURCE);

    let Some((name, text)) = toml_sources.iter().find(|(name, _)| name == wanted) else {
        return (None, None);
    };
    if field.is_empty() {
        return (None, None);
    }
    match find_key_offset(text, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(name, text.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` as a key in `content`, searching after the
/// `[section]` header named by the first element of `section` (or from the
/// top when `section` is empty).
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = match section.first() {
        Some(name) => {
            let header = format!("[{name}]");
            content.find(&header)? + header.len()
        }
        None => 0,
    };

    let mut line_start = start;
    for line in content[start..].split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        let rest = &line[indent..];
        let is_key = rest
            .strip_prefix(field)
            .and_then(|after| after.chars().next())
            .is_some_and(|c| c == '=' || c == ' ' || c == '\t');
        if is_key {
            return Some(line_start + indent);
        }
        line_start += line.len();
    }
    None
}

/// The known key most similar to `unknown`, if any scores above the
/// suggestion threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, key)| key.to_string())
}

/// Print each error to stderr as a graphical miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHUNKING_KEYS: &[&str] = &[
        "todo_completion_trigger",
        "file_change_threshold",
        "time_threshold_minutes",
        "max_content_length",
        "max_embedding_content_length",
    ];

    #[test]
    fn suggests_threshold_for_typo() {
        assert_eq!(
            suggest_key("file_change_treshold", CHUNKING_KEYS),
            Some("file_change_threshold".to_string())
        );
    }

    #[test]
    fn suggests_closest_of_similar_keys() {
        assert_eq!(
            suggest_key("max_content_lenght", CHUNKING_KEYS),
            Some("max_content_length".to_string())
        );
    }

    #[test]
    fn unrelated_key_gets_no_suggestion() {
        assert_eq!(suggest_key("zzzzzz", CHUNKING_KEYS), None);
    }

    #[test]
    fn key_offset_inside_section() {
        let content = "[server]\nlog_level = \"info\"\n\n[chunking]\n  todo_trigger = true\n";
        let section = vec!["chunking".to_string()];
        let offset = find_key_offset(content, &section, "todo_trigger").unwrap();
        assert_eq!(&content[offset..offset + "todo_trigger".len()], "todo_trigger");
    }

    #[test]
    fn key_offset_ignores_longer_keys_with_same_prefix() {
        let content = "[chunking]\nmax_content_length_x = 1\nmax_content_length = 2\n";
        let section = vec!["chunking".to_string()];
        let offset = find_key_offset(content, &section, "max_content_length").unwrap();
        assert!(content[offset..].starts_with("max_content_length = 2"));
    }

    #[test]
    fn key_offset_requires_section() {
        let content = "[server]\nlog_level = \"info\"\n";
        let section = vec!["chunking".to_string()];
        assert_eq!(find_key_offset(content, &section, "log_level"), None);
    }

    #[test]
    fn unknown_key_help_text() {
        let help = unknown_key_help(Some("max_content_length"), "a, b");
        assert!(help.starts_with("did you mean `max_content_length`?"));
        assert_eq!(unknown_key_help(None, "a, b"), "valid keys: a, b");
    }
}
