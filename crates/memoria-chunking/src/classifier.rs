// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-based classification of chunk content.
//!
//! Assigns a [`ChunkType`], [`Difficulty`], [`Outcome`], topical tags, and
//! smart tags. All functions are pure; the only ambient input is the
//! session's [`ChunkingContext`], passed explicitly.

use memoria_core::types::{ChunkMetadata, ChunkType, ChunkingContext, Difficulty, Outcome};

use crate::patterns::{
    matches_any, ARCHITECTURAL, CODE, FRAMEWORKS, GOTCHA, HIGH_IMPACT, PERFORMANCE, PROBLEM,
    REUSABLE, SOLUTION, TECH_TAGS,
};
use crate::scorer;

const ARCHITECTURE_KEYWORDS: &[&str] = &["decision", "architecture", "design", "approach"];

const COMPLEXITY_KEYWORDS: &[&str] = &[
    "complex",
    "complicated",
    "challenging",
    "difficult",
    "architecture",
    "design pattern",
    "algorithm",
    "performance",
    "optimization",
    "scale",
    "async",
    "concurrent",
    "parallel",
    "security",
    "authentication",
    "authorization",
];

const SUCCESS_KEYWORDS: &[&str] = &["completed", "fixed", "solved", "working", "success", "done"];
const FAILURE_KEYWORDS: &[&str] = &["failed", "error", "broken", "not working", "issue"];

/// Content longer than this (in bytes) counts as one complexity point.
const LONG_CONTENT_BYTES: usize = 2000;

/// Classify content into a chunk type. First matching rule wins.
pub fn classify_type(content: &str) -> ChunkType {
    let lower = content.to_lowercase();

    if ARCHITECTURE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        ChunkType::ArchitectureDecision
    } else if matches_any(&CODE, &lower) {
        ChunkType::CodeChange
    } else if matches_any(&SOLUTION, &lower) {
        ChunkType::Solution
    } else if matches_any(&PROBLEM, &lower) {
        ChunkType::Problem
    } else {
        ChunkType::Discussion
    }
}

/// Estimate difficulty from complexity keywords, length, and session activity.
pub fn assess_difficulty(content: &str, context: &ChunkingContext) -> Difficulty {
    let lower = content.to_lowercase();

    let mut score = COMPLEXITY_KEYWORDS
        .iter()
        .filter(|k| lower.contains(*k))
        .count();
    if content.len() > LONG_CONTENT_BYTES {
        score += 1;
    }
    if context.tools_used.len() > 5 {
        score += 1;
    }
    if context.file_modifications.len() > 3 {
        score += 1;
    }

    match score {
        0 => Difficulty::Simple,
        1 | 2 => Difficulty::Moderate,
        _ => Difficulty::Complex,
    }
}

/// Decide where the work ended up. Success beats failure; anything else is
/// still in progress.
pub fn assess_outcome(content: &str) -> Outcome {
    let lower = content.to_lowercase();
    let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    if hit(SUCCESS_KEYWORDS) {
        Outcome::Success
    } else if hit(FAILURE_KEYWORDS) {
        Outcome::Failed
    } else {
        Outcome::InProgress
    }
}

/// Technology and framework tags, in table order.
pub fn extract_tags(content: &str) -> Vec<String> {
    let lower = content.to_lowercase();

    let tech = TECH_TAGS
        .iter()
        .filter(|(_, re)| re.is_match(&lower))
        .map(|(tag, _)| *tag);
    let frameworks = FRAMEWORKS.iter().copied().filter(|f| lower.contains(f));

    tech.chain(frameworks).map(str::to_string).collect()
}

/// Specialised tags flagging high-value content. At most one tag per pattern group.
pub fn detect_smart_tags(content: &str) -> Vec<String> {
    let groups = [
        ("high-impact", &*HIGH_IMPACT),
        ("reusable-pattern", &*REUSABLE),
        ("gotcha", &*GOTCHA),
        ("architecture", &*ARCHITECTURAL),
        ("performance", &*PERFORMANCE),
    ];
    let mut tags: Vec<String> = groups
        .iter()
        .filter(|(_, group)| matches_any(group, content))
        .map(|(tag, _)| tag.to_string())
        .collect();

    let lower = content.to_lowercase();
    let keyword_tags: [(&str, [&str; 2]); 5] = [
        ("testing", ["test", "testing"]),
        ("documentation", ["document", "readme"]),
        ("security", ["security", "auth"]),
        ("devops", ["deploy", "ci/cd"]),
        ("api", ["api", "endpoint"]),
    ];
    for (tag, needles) in keyword_tags {
        if needles.iter().any(|n| lower.contains(n)) {
            tags.push(tag.to_string());
        }
    }

    tags
}

/// Merge classifier and scorer output into caller-supplied metadata.
///
/// Tools and files fall back to the session context when the caller left
/// them empty. Tags are appended without duplicates. Difficulty and outcome
/// are only filled when unset. Extended metadata is always recomputed.
pub fn enrich_metadata(
    mut metadata: ChunkMetadata,
    content: &str,
    context: &ChunkingContext,
) -> ChunkMetadata {
    if metadata.tools_used.is_empty() {
        metadata.tools_used = context.tools_used.clone();
    }
    if metadata.files_modified.is_empty() {
        metadata.files_modified = context.file_modifications.clone();
    }

    metadata.extend_tags(extract_tags(content));

    if metadata.difficulty.is_none() {
        metadata.difficulty = Some(assess_difficulty(content, context));
    }
    if metadata.outcome.is_none() {
        metadata.outcome = Some(assess_outcome(content));
    }

    metadata.extend_tags(detect_smart_tags(content));

    metadata.extended = Some(scorer::extended_metadata(content, &metadata));
    metadata
}
