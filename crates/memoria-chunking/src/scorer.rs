// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Significance scoring for chunk content.
//!
//! Scores are additive and saturate at 1.0; intermediate sums above 1.0 are
//! expected for content that hits many patterns.

use std::collections::BTreeMap;

use memoria_core::types::{
    ChunkMetadata, ComplexityIndicators, Difficulty, ExtendedMetadata, LearningValue, Outcome,
    SignificanceLevel,
};

use crate::patterns::{
    matches_any, ARCHITECTURAL, GOTCHA, HIGH_IMPACT, REUSABLE, TECHNICAL_CONCEPTS,
    TECHNICAL_WORDS,
};

const CODE_FENCE: &str = "```";

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// How much this chunk matters, in `[0.0, 1.0]`.
pub fn impact_score(content: &str, metadata: &ChunkMetadata) -> f64 {
    let mut score: f64 = match metadata.outcome {
        Some(Outcome::Success) => 0.3,
        Some(Outcome::Failed) => 0.1,
        Some(Outcome::InProgress) => 0.15,
        Some(Outcome::Abandoned) => 0.05,
        None => 0.2,
    };

    if matches_any(&HIGH_IMPACT, content) {
        score += 0.3;
    }
    if matches_any(&ARCHITECTURAL, content) {
        score += 0.2;
    }
    if metadata.tools_used.len() > 3 {
        score += 0.1;
    }
    if metadata.files_modified.len() > 2 {
        score += 0.1;
    }
    if content.len() > 500 {
        score += 0.1;
    }

    score.min(1.0)
}

/// How likely this chunk is to help in a future session, in `[0.0, 1.0]`.
pub fn reusability_score(content: &str) -> f64 {
    let lower = content.to_lowercase();
    let mut score = 0.0;

    if matches_any(&REUSABLE, content) {
        score += 0.4;
    }
    if contains_any(&lower, &["config", "setup"]) {
        score += 0.2;
    }
    if contains_any(&lower, &["utility", "helper"]) {
        score += 0.3;
    }
    if contains_any(&lower, &["best practice", "recommended"]) {
        score += 0.2;
    }
    if content.contains(CODE_FENCE) || lower.contains("template") {
        score += 0.1;
    }
    if contains_any(&lower, &["document", "guide"]) {
        score += 0.1;
    }

    f64::min(score, 1.0)
}

/// Bucket the mean of impact and reusability.
pub fn significance_level(impact: f64, reusability: f64) -> SignificanceLevel {
    let combined = (impact + reusability) / 2.0;
    if combined >= 0.8 {
        SignificanceLevel::Critical
    } else if combined >= 0.6 {
        SignificanceLevel::High
    } else if combined >= 0.4 {
        SignificanceLevel::Medium
    } else {
        SignificanceLevel::Low
    }
}

/// Technical concept labels present in `content`, in a fixed order.
pub fn technical_concepts(content: &str) -> Vec<String> {
    TECHNICAL_CONCEPTS
        .iter()
        .filter(|(_, re)| re.is_match(content))
        .map(|(concept, _)| concept.to_string())
        .collect()
}

pub fn complexity_indicators(content: &str, metadata: &ChunkMetadata) -> ComplexityIndicators {
    let lower = content.to_lowercase();
    ComplexityIndicators {
        content_length: content.len(),
        tools_count: metadata.tools_used.len(),
        files_count: metadata.files_modified.len(),
        code_blocks: content.matches(CODE_FENCE).count(),
        technical_density: TECHNICAL_WORDS.iter().filter(|w| lower.contains(*w)).count(),
    }
}

/// Rough minutes of work represented by a chunk. Unbounded.
pub fn time_investment_minutes(content: &str, metadata: &ChunkMetadata) -> u32 {
    let mut minutes: usize = 5;

    if content.len() > 1000 {
        minutes += 10;
    } else if content.len() > 500 {
        minutes += 5;
    }

    minutes += metadata.tools_used.len() * 2;
    minutes += metadata.files_modified.len() * 3;

    minutes += match metadata.difficulty {
        Some(Difficulty::Complex) => 15,
        Some(Difficulty::Moderate) => 7,
        Some(Difficulty::Simple) => 2,
        None => 0,
    };

    if contains_any(&content.to_lowercase(), &["debug", "troubleshoot"]) {
        minutes += 10;
    }

    u32::try_from(minutes).unwrap_or(u32::MAX)
}

pub fn learning_value(content: &str, impact: f64) -> LearningValue {
    if impact >= 0.7 || matches_any(&GOTCHA, content) {
        return LearningValue::High;
    }

    let lower = content.to_lowercase();
    if contains_any(&lower, &["best practice", "lesson"]) || matches_any(&ARCHITECTURAL, content) {
        LearningValue::Medium
    } else {
        LearningValue::Low
    }
}

/// Compute the full extended metadata block for already-classified metadata.
///
/// `metadata` must carry the final outcome, difficulty, tools, and files,
/// since impact and time estimates read them.
pub fn extended_metadata(content: &str, metadata: &ChunkMetadata) -> ExtendedMetadata {
    let impact = impact_score(content, metadata);
    let reusability = reusability_score(content);

    ExtendedMetadata {
        impact_score: impact,
        reusability_score: reusability,
        significance_level: significance_level(impact, reusability),
        technical_concepts: technical_concepts(content),
        complexity_indicators: complexity_indicators(content, metadata),
        time_investment_minutes: time_investment_minutes(content, metadata),
        learning_value: learning_value(content, impact),
        extra: BTreeMap::new(),
    }
}
