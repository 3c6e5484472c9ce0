// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session context updates and the bounded context history.

use std::collections::VecDeque;

use memoria_core::types::{ChunkingContext, ConversationFlow, TodoItem};

/// Number of context snapshots kept for context-switch detection.
pub const HISTORY_CAPACITY: usize = 10;

/// Partial update to the current session context.
///
/// Only fields that are `Some` are applied; everything else is left as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextUpdate {
    pub todos: Option<Vec<TodoItem>>,
    pub files: Option<Vec<String>>,
    pub tools: Option<Vec<String>>,
    pub flow: Option<ConversationFlow>,
    pub elapsed_minutes: Option<u32>,
}

impl ContextUpdate {
    pub fn todos(mut self, todos: Vec<TodoItem>) -> Self {
        self.todos = Some(todos);
        self
    }

    pub fn files(mut self, files: Vec<String>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn tools(mut self, tools: Vec<String>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn flow(mut self, flow: ConversationFlow) -> Self {
        self.flow = Some(flow);
        self
    }

    pub fn elapsed_minutes(mut self, minutes: u32) -> Self {
        self.elapsed_minutes = Some(minutes);
        self
    }

    /// Apply the present fields to `context`.
    pub fn apply_to(self, context: &mut ChunkingContext) {
        if let Some(todos) = self.todos {
            context.current_todos = todos;
        }
        if let Some(files) = self.files {
            context.file_modifications = files;
        }
        if let Some(tools) = self.tools {
            context.tools_used = tools;
        }
        if let Some(flow) = self.flow {
            context.flow = flow;
        }
        if let Some(minutes) = self.elapsed_minutes {
            context.elapsed_minutes = minutes;
        }
    }
}

/// FIFO ring of the last [`HISTORY_CAPACITY`] contexts, oldest first.
#[derive(Debug, Clone, Default)]
pub struct ContextHistory {
    entries: VecDeque<ChunkingContext>,
}

impl ContextHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Record a snapshot, evicting the oldest once full.
    pub fn push(&mut self, context: ChunkingContext) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(context);
    }

    /// Most recently recorded snapshot.
    pub fn latest(&self) -> Option<&ChunkingContext> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChunkingContext> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_applies_only_present_fields() {
        let mut context = ChunkingContext {
            tools_used: vec!["Read".into()],
            elapsed_minutes: 4,
            ..Default::default()
        };

        ContextUpdate::default()
            .files(vec!["src/lib.rs".into()])
            .flow(ConversationFlow::Implementation)
            .apply_to(&mut context);

        assert_eq!(context.tools_used, vec!["Read"]);
        assert_eq!(context.elapsed_minutes, 4);
        assert_eq!(context.file_modifications, vec!["src/lib.rs"]);
        assert_eq!(context.flow, ConversationFlow::Implementation);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let mut context = ChunkingContext {
            tools_used: vec!["Read".into()],
            ..Default::default()
        };
        let before = context.clone();
        ContextUpdate::default().apply_to(&mut context);
        assert_eq!(context, before);
    }

    #[test]
    fn history_evicts_oldest() {
        let mut history = ContextHistory::new();
        for minutes in 0..15 {
            history.push(ChunkingContext {
                elapsed_minutes: minutes,
                ..Default::default()
            });
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.iter().next().map(|c| c.elapsed_minutes), Some(5));
        assert_eq!(history.latest().map(|c| c.elapsed_minutes), Some(14));

        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }
}
