// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splits a raw multi-turn conversation into logical segments.
//!
//! Segments close on boundary lines (speaker turns, section markers,
//! numbered items, step/task headings), when the buffer outgrows the
//! configured maximum, and on a double blank line once the buffer is large.

use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::Split;

use crate::patterns::{matches_any, SEGMENT_BOUNDARY};

/// A buffer longer than this is flushed on a double blank line.
const PARAGRAPH_FLUSH_BYTES: usize = 500;

/// Stateless conversation splitter.
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    max_content_length: usize,
}

impl Segmenter {
    /// `max_content_length` is the largest segment, in bytes, before trimming.
    pub fn new(max_content_length: usize) -> Self {
        Self {
            max_content_length: max_content_length.max(1),
        }
    }

    pub fn max_content_length(&self) -> usize {
        self.max_content_length
    }

    /// Lazily split `conversation`. Empty segments are never yielded.
    pub fn split<'a>(&self, conversation: &'a str) -> Segments<'a> {
        Segments {
            lines: conversation.split('\n').peekable(),
            buffer: String::new(),
            ready: VecDeque::new(),
            max: self.max_content_length,
        }
    }
}

/// Single-pass iterator over the segments of one conversation.
pub struct Segments<'a> {
    lines: Peekable<Split<'a, char>>,
    buffer: String,
    ready: VecDeque<String>,
    max: usize,
}

impl Segments<'_> {
    fn emit(&mut self, text: &str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            self.ready.push_back(trimmed.to_string());
        }
    }

    fn flush(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        self.emit(&buffer);
    }

    /// Cut max-sized pieces off the front of an oversized buffer.
    fn cut_oversized(&mut self) {
        while self.buffer.len() > self.max {
            let at = char_boundary_at_most(&self.buffer, self.max);
            let rest = self.buffer.split_off(at);
            let piece = std::mem::replace(&mut self.buffer, rest);
            self.emit(&piece);
        }
    }

    fn consume(&mut self, line: &str) {
        if is_boundary(line) && !self.buffer.is_empty() {
            self.flush();
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');

        self.cut_oversized();

        let paragraph_break = line.is_empty() && self.lines.peek().is_some_and(|next| next.is_empty());
        if paragraph_break && self.buffer.len() > PARAGRAPH_FLUSH_BYTES {
            self.flush();
        }
    }
}

impl Iterator for Segments<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(segment) = self.ready.pop_front() {
                return Some(segment);
            }
            match self.lines.next() {
                Some(line) => self.consume(line),
                None if !self.buffer.is_empty() => self.flush(),
                None => return None,
            }
        }
    }
}

/// Returns true if `line` opens a new segment.
pub fn is_boundary(line: &str) -> bool {
    matches_any(&SEGMENT_BOUNDARY, line)
}

/// Largest char boundary `<= max`, but always past the first char.
fn char_boundary_at_most(s: &str, max: usize) -> usize {
    let mut at = max.min(s.len());
    while !s.is_char_boundary(at) {
        at -= 1;
    }
    if at == 0 {
        at = s.chars().next().map_or(s.len(), char::len_utf8);
    }
    at
}
