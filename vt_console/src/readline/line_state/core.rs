// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{History, display_width};
use strip_ansi_escapes::strip_str;

/// Editing state of one console: the line in progress, the cursor within it, the prompt
/// shown in front of it, and the history of submitted lines.
#[derive(Debug, Default, Clone)]
pub struct LineState {
    /// Line in progress, exactly as received.
    pub line: Vec<u8>,

    /// Byte offset into `line`, always on a code point boundary.
    pub cursor: usize,

    /// May contain ANSI styling, which takes no columns.
    pub prompt: String,

    pub history: History,
}

impl LineState {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Replace the line in progress without rendering. The cursor moves to the end.
    pub fn set_line(&mut self, line: impl Into<Vec<u8>>) {
        self.line = line.into();
        self.cursor = self.line.len();
    }

    #[must_use]
    pub fn line_as_string(&self) -> String {
        String::from_utf8_lossy(&self.line).into_owned()
    }

    /// Columns taken by the prompt once styling is removed.
    #[must_use]
    pub fn prompt_width(&self) -> usize {
        display_width(strip_str(&self.prompt).as_bytes())
    }

    /// 1-based terminal column of the byte offset `offset` within the line.
    #[must_use]
    pub fn column_of(&self, offset: usize) -> u16 {
        let offset = offset.min(self.line.len());
        let width = self.prompt_width() + display_width(&self.line[..offset]) + 1;
        u16::try_from(width).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_skips_prompt_styling() {
        let mut line_state = LineState::new("\x1b[32m> \x1b[0m");
        assert_eq!(line_state.prompt_width(), 2);

        line_state.set_line("a日b");
        assert_eq!(line_state.cursor, 5);
        assert_eq!(line_state.column_of(0), 3);
        assert_eq!(line_state.column_of(1), 4);
        assert_eq!(line_state.column_of(4), 6);
        assert_eq!(line_state.column_of(line_state.cursor), 7);
        assert_eq!(line_state.column_of(99), 7);
    }

    #[test]
    fn test_line_as_string_is_lossy() {
        let mut line_state = LineState::new("");
        line_state.set_line(vec![b'o', b'k', 0xFF]);
        assert_eq!(line_state.line_as_string(), "ok\u{FFFD}");
    }
}
