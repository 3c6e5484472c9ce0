// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decides when accumulated conversation should be cut into a chunk.

use memoria_config::model::ChunkingConfig;
use memoria_core::types::{ChunkingContext, ConversationFlow};
use strum::{Display, IntoStaticStr};

/// Minimum fraction of the new tool list that must also appear in the
/// previous one for the two contexts to count as the same task.
const TOOL_OVERLAP_RATIO: f64 = 0.3;

/// Verification phases longer than this many minutes close a chunk.
const VERIFICATION_MINUTES: u32 = 5;

/// Each tool name is assumed to stand for this many bytes of content.
const CONTENT_BYTES_PER_TOOL_CHAR: usize = 10;

/// Why a chunk boundary was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TriggerReason {
    TodoCompleted,
    FileChanges,
    TimeElapsed,
    VerificationComplete,
    ContextSwitch,
    ContentVolume,
}

/// Evaluate the trigger rules in priority order against `context`.
///
/// `previous` is the most recent context recorded at chunk creation, if
/// any. Returns the first rule that fires.
pub fn evaluate(
    config: &ChunkingConfig,
    context: &ChunkingContext,
    previous: Option<&ChunkingContext>,
) -> Option<TriggerReason> {
    if config.todo_completion_trigger && context.has_completed_todos() {
        return Some(TriggerReason::TodoCompleted);
    }
    if context.file_modifications.len() >= config.file_change_threshold {
        return Some(TriggerReason::FileChanges);
    }
    if context.elapsed_minutes >= config.time_threshold_minutes {
        return Some(TriggerReason::TimeElapsed);
    }
    if context.flow == ConversationFlow::Verification
        && context.elapsed_minutes > VERIFICATION_MINUTES
    {
        return Some(TriggerReason::VerificationComplete);
    }
    if has_context_switch(previous, context) {
        return Some(TriggerReason::ContextSwitch);
    }
    if estimated_content_volume(context) > config.max_content_length {
        return Some(TriggerReason::ContentVolume);
    }
    None
}

/// Returns true if `current` looks like a different task than `previous`.
///
/// A changed flow, a tool list sharing less than 30% with the previous
/// one, or a file list sharing nothing with the previous one all count.
pub fn has_context_switch(previous: Option<&ChunkingContext>, current: &ChunkingContext) -> bool {
    let Some(previous) = previous else {
        return false;
    };

    if previous.flow != current.flow {
        return true;
    }

    if !current.tools_used.is_empty() && !previous.tools_used.is_empty() {
        let shared = current
            .tools_used
            .iter()
            .filter(|tool| previous.tools_used.contains(tool))
            .count();
        if (shared as f64) / (current.tools_used.len() as f64) < TOOL_OVERLAP_RATIO {
            return true;
        }
    }

    if !current.file_modifications.is_empty() && !previous.file_modifications.is_empty() {
        let any_shared = current
            .file_modifications
            .iter()
            .any(|file| previous.file_modifications.contains(file));
        if !any_shared {
            return true;
        }
    }

    false
}

/// Coarse proxy for buffered content size, derived from tool-name lengths.
pub fn estimated_content_volume(context: &ChunkingContext) -> usize {
    context
        .tools_used
        .iter()
        .map(|tool| tool.len() * CONTENT_BYTES_PER_TOOL_CHAR)
        .sum()
}
