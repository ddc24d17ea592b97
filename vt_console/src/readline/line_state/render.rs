// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::core::LineState;
use crate::{BEL, CHA_CURSOR_COLUMN, CsiSequence, EL_ERASE_ALL, EL_ERASE_LINE,
            EL_ERASE_TO_END, NEW_LINE_SEQ, ok};
use std::io::{self, Write};

fn write_csi(term: &mut dyn Write, final_char: u8, args: &[u16]) -> io::Result<()> {
    write!(term, "{}", CsiSequence::new(final_char, args))
}

impl LineState {
    /// Move the terminal cursor to the column of byte offset `offset` (CHA).
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn move_cursor_to(&self, term: &mut dyn Write, offset: usize) -> io::Result<()> {
        write_csi(term, CHA_CURSOR_COLUMN, &[self.column_of(offset)])
    }

    /// Erase the whole row and draw prompt and line, then place the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render_line(&self, term: &mut dyn Write) -> io::Result<()> {
        write_csi(term, EL_ERASE_LINE, &[EL_ERASE_ALL])?;
        write_csi(term, CHA_CURSOR_COLUMN, &[1])?;
        term.write_all(self.prompt.as_bytes())?;
        term.write_all(&self.line)?;
        self.move_cursor_to(term, self.cursor)?;
        ok!()
    }

    /// Redraw from byte offset `from` to the end of the line, for edits that shorten it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render_tail(&self, term: &mut dyn Write, from: usize) -> io::Result<()> {
        self.move_cursor_to(term, from)?;
        write_csi(term, EL_ERASE_LINE, &[EL_ERASE_TO_END])?;
        term.write_all(&self.line[from..])?;
        self.move_cursor_to(term, self.cursor)?;
        ok!()
    }

    /// Write the bytes from `from` onward over the old tail, for edits that only grow the
    /// line, so nothing needs erasing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn render_inserted(&self, term: &mut dyn Write, from: usize) -> io::Result<()> {
        term.write_all(&self.line[from..])?;
        self.move_cursor_to(term, self.cursor)?;
        ok!()
    }

    /// Signal that an edit had no effect.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn ring_bell(&self, term: &mut dyn Write) -> io::Result<()> {
        tracing::debug!(cursor = self.cursor, "bell");
        term.write_all(&[BEL])
    }

    pub(super) fn render_submit(&self, term: &mut dyn Write) -> io::Result<()> {
        term.write_all(NEW_LINE_SEQ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::StdoutMock;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_line_writes_prompt_and_line() {
        let mut line_state = LineState::new("$ ");
        line_state.set_line("hello");
        line_state.cursor = 1;
        let mut stdout_mock = StdoutMock::default();

        line_state.render_line(&mut stdout_mock).unwrap();

        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[2K\x1b[1G$ hello\x1b[4G"
        );
    }

    #[test]
    fn test_render_tail_erases_to_end() {
        let mut line_state = LineState::new("> ");
        line_state.set_line("abd");
        line_state.cursor = 2;
        let mut stdout_mock = StdoutMock::default();

        line_state.render_tail(&mut stdout_mock, 2).unwrap();

        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[5G\x1b[0Kd\x1b[5G"
        );
    }

    #[test]
    fn test_render_inserted_rewrites_tail() {
        let mut line_state = LineState::new("");
        line_state.set_line("abc");
        line_state.cursor = 2;
        let mut stdout_mock = StdoutMock::default();

        line_state.render_inserted(&mut stdout_mock, 1).unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "bc\x1b[3G");
    }

    #[test]
    fn test_bell() {
        let line_state = LineState::new("");
        let mut stdout_mock = StdoutMock::default();
        line_state.ring_bell(&mut stdout_mock).unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer(), vec![BEL]);
    }
}
