// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extractive summaries, embedding text, and roll-up summary content.

use std::collections::BTreeSet;

use memoria_core::types::{ChunkType, ConversationChunk, Outcome};

/// Chunk groups of this size get a rolling summary.
pub const ROLLING_SUMMARY_INTERVAL: usize = 5;

/// A conversation needs more than this many chunks for a session summary.
pub const SESSION_SUMMARY_MIN_CHUNKS: usize = 3;

pub const ROLLING_SUMMARY_TAGS: [&str; 2] = ["summary", "aggregated"];
pub const SESSION_SUMMARY_TAGS: [&str; 2] = ["session-summary", "final"];

const SUMMARY_LINE_MIN_CHARS: usize = 20;
const SUMMARY_LINE_MAX_CHARS: usize = 150;
const FALLBACK_LIMIT_CHARS: usize = 100;
const FALLBACK_KEEP_CHARS: usize = 97;

/// One-line summary: the first reasonably sized line, else a truncation.
pub fn extractive_summary(content: &str) -> String {
    let line = content.lines().map(str::trim).find(|line| {
        let len = line.chars().count();
        len > SUMMARY_LINE_MIN_CHARS && len < SUMMARY_LINE_MAX_CHARS
    });
    if let Some(line) = line {
        return line.to_string();
    }

    if content.chars().count() > FALLBACK_LIMIT_CHARS {
        let head: String = content.chars().take(FALLBACK_KEEP_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// Text sent to the embedding service for `chunk`, at most `max_len` bytes.
pub fn embedding_text(chunk: &ConversationChunk, max_len: usize) -> String {
    let mut parts = vec![format!("Type: {}", chunk.chunk_type)];
    if !chunk.summary.is_empty() {
        parts.push(format!("Summary: {}", chunk.summary));
    }
    parts.push(format!("Content: {}", chunk.content));
    if let Some(repository) = chunk.metadata.repository.as_deref().filter(|r| !r.is_empty()) {
        parts.push(format!("Repository: {repository}"));
    }
    if !chunk.metadata.tags.is_empty() {
        parts.push(format!("Tags: {}", chunk.metadata.tags.join(", ")));
    }

    let mut text = parts.join(" ");
    truncate_on_char_boundary(&mut text, max_len);
    text
}

fn truncate_on_char_boundary(text: &mut String, max_len: usize) {
    if text.len() <= max_len {
        return;
    }
    let mut at = max_len;
    while !text.is_char_boundary(at) {
        at -= 1;
    }
    text.truncate(at);
}

/// Content for a rolling summary over a group of segment chunks.
pub fn rolling_summary_content(chunks: &[ConversationChunk]) -> String {
    let mut lines = vec!["Summary of recent conversation:".to_string()];
    lines.extend(
        chunks
            .iter()
            .filter(|c| !c.summary.is_empty())
            .map(|c| format!("- {}", c.summary)),
    );
    lines.join("\n")
}

/// Content for the session summary over every chunk a call produced.
pub fn session_summary_content(chunks: &[ConversationChunk]) -> String {
    let mut lines = vec![
        "Session Summary:".to_string(),
        format!("Total chunks: {}", chunks.len()),
    ];

    for chunk_type in ChunkType::ALL {
        let count = chunks.iter().filter(|c| c.chunk_type == chunk_type).count();
        if count > 0 {
            lines.push(format!("- {chunk_type}: {count}"));
        }
    }

    let successes = chunks
        .iter()
        .filter(|c| c.metadata.outcome == Some(Outcome::Success))
        .count();
    lines.push(format!("Successful outcomes: {successes}"));

    let mut tools: Vec<&str> = Vec::new();
    for tool in chunks.iter().flat_map(|c| &c.metadata.tools_used) {
        if !tools.contains(&tool.as_str()) {
            tools.push(tool);
        }
    }
    if !tools.is_empty() {
        lines.push(format!("Tools used: {}", tools.join(", ")));
    }

    let files: BTreeSet<&str> = chunks
        .iter()
        .flat_map(|c| &c.metadata.files_modified)
        .map(String::as_str)
        .collect();
    if !files.is_empty() {
        lines.push(format!("Files modified: {}", files.len()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use memoria_core::types::ChunkMetadata;

    use super::*;

    fn chunk(chunk_type: ChunkType, summary: &str, metadata: ChunkMetadata) -> ConversationChunk {
        let mut chunk = ConversationChunk::new("s1", "content", chunk_type, metadata).unwrap();
        chunk.summary = summary.to_string();
        chunk
    }

    #[test]
    fn summary_picks_first_mid_length_line() {
        let content = "Hi\n   The parser drops trailing commas in arrays   \nmore";
        assert_eq!(
            extractive_summary(content),
            "The parser drops trailing commas in arrays"
        );
    }

    #[test]
    fn summary_falls_back_to_truncation() {
        let content = "z".repeat(300);
        let summary = extractive_summary(&content);
        assert_eq!(summary.chars().count(), 100);
        assert!(summary.ends_with("..."));

        assert_eq!(extractive_summary("short"), "short");
    }

    #[test]
    fn embedding_text_layout() {
        let metadata = ChunkMetadata {
            repository: Some("memoria".into()),
            tags: vec!["api".into(), "bug".into()],
            ..Default::default()
        };
        let mut c = chunk(ChunkType::Problem, "it breaks", metadata);
        c.content = "body".into();
        assert_eq!(
            embedding_text(&c, 8000),
            "Type: problem Summary: it breaks Content: body Repository: memoria Tags: api, bug"
        );
    }

    #[test]
    fn embedding_text_is_truncated_without_splitting_chars() {
        let mut c = chunk(ChunkType::Discussion, "", ChunkMetadata::default());
        c.content = "ü".repeat(50);
        let text = embedding_text(&c, 30);
        assert!(text.len() <= 30);
        assert!(text.starts_with("Type: discussion Content: "));
    }

    #[test]
    fn rolling_summary_skips_empty_summaries() {
        let chunks = vec![
            chunk(ChunkType::Problem, "first", ChunkMetadata::default()),
            chunk(ChunkType::Solution, "", ChunkMetadata::default()),
            chunk(ChunkType::Solution, "third", ChunkMetadata::default()),
        ];
        assert_eq!(
            rolling_summary_content(&chunks),
            "Summary of recent conversation:\n- first\n- third"
        );
    }

    #[test]
    fn session_summary_aggregates() {
        let with = |outcome, tools: &[&str], files: &[&str]| ChunkMetadata {
            outcome: Some(outcome),
            tools_used: tools.iter().map(|t| t.to_string()).collect(),
            files_modified: files.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        };
        let chunks = vec![
            chunk(ChunkType::Solution, "a", with(Outcome::Success, &["Edit", "Bash"], &["a.rs"])),
            chunk(ChunkType::Problem, "b", with(Outcome::Failed, &["Bash", "Read"], &["a.rs", "b.rs"])),
            chunk(ChunkType::Solution, "c", with(Outcome::Success, &[], &[])),
            chunk(ChunkType::CodeChange, "d", with(Outcome::InProgress, &[], &[])),
        ];

        assert_eq!(
            session_summary_content(&chunks),
            "Session Summary:\n\
             Total chunks: 4\n\
             - code_change: 1\n\
             - solution: 2\n\
             - problem: 1\n\
             Successful outcomes: 2\n\
             Tools used: Edit, Bash, Read\n\
             Files modified: 2"
        );
    }
}
