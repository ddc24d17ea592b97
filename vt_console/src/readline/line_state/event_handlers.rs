// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::core::LineState;
use crate::{CHA_CURSOR_COLUMN, CNL_CURSOR_NEXT_LINE, CPL_CURSOR_PREV_LINE, CR,
            CUB_CURSOR_BACK, CUD_CURSOR_DOWN, CUF_CURSOR_FORWARD, CUU_CURSOR_UP,
            ConsoleError, ControlBreak, CsiSequence, DEL, HT, LF, ReadlineEvent, Token,
            code_point_offset, first_code_point_len, last_code_point_len};
use std::io::Write;

/// Result of one handler: `Some` ends the current `read_line`.
pub type HandlerResult = Result<Option<ReadlineEvent>, ConsoleError>;

impl LineState {
    /// Apply one token to the line and write the matching redraw to `term`. The caller
    /// flushes `term`.
    ///
    /// Returns `Some` when the token ends the read: a submitted line or an interrupt.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    pub fn apply_token_and_render(
        &mut self,
        token: Token,
        term: &mut dyn Write,
    ) -> HandlerResult {
        match token {
            Token::ByteRun(bytes) => handle_insert(self, &bytes, term),
            Token::Control(byte) => handle_control(self, byte, term),
            Token::Csi(csi) => handle_csi(self, &csi, term),
            Token::Escape(esc) => {
                tracing::trace!(?esc, "escape sequence ignored while editing");
                Ok(None)
            }
        }
    }
}

/// Handle a lone control byte: Enter, Backspace (DEL), Tab, or an interrupt.
pub fn handle_control(
    line_state: &mut LineState,
    byte: u8,
    term: &mut dyn Write,
) -> HandlerResult {
    match byte {
        CR | LF => handle_enter(line_state, term),
        DEL => handle_backspace(line_state, term),
        HT => {
            line_state.ring_bell(term)?;
            Ok(None)
        }
        _ => {
            let control_break = ControlBreak(byte);
            tracing::debug!(%control_break, "line editing interrupted");
            Ok(Some(ReadlineEvent::Interrupted(control_break)))
        }
    }
}

/// Handle the CSI sequences arrow keys and cursor keys send. Others are ignored.
pub fn handle_csi(
    line_state: &mut LineState,
    csi: &CsiSequence,
    term: &mut dyn Write,
) -> HandlerResult {
    let count = usize::from(csi.arg_at(0, 1).max(1));
    match csi.final_char {
        CUU_CURSOR_UP => {
            handle_history_previous(line_state, count, term)?;
        }
        CUD_CURSOR_DOWN => {
            handle_history_next(line_state, count, term)?;
        }
        CUF_CURSOR_FORWARD => handle_right(line_state, count, term)?,
        CUB_CURSOR_BACK => handle_left(line_state, count, term)?,
        CNL_CURSOR_NEXT_LINE => {
            if handle_history_next(line_state, count, term)? {
                handle_move_to(line_state, 0, term)?;
            }
        }
        CPL_CURSOR_PREV_LINE => {
            if handle_history_previous(line_state, count, term)? {
                handle_move_to(line_state, 0, term)?;
            }
        }
        CHA_CURSOR_COLUMN => {
            let index = usize::from(csi.arg_at(0, 1)).saturating_sub(1);
            let offset = code_point_offset(&line_state.line, index);
            handle_move_to(line_state, offset, term)?;
        }
        _ => tracing::trace!(%csi, "CSI sequence ignored while editing"),
    }
    Ok(None)
}

/// Insert at the cursor. The cursor ends up after the inserted bytes.
fn handle_insert(
    line_state: &mut LineState,
    bytes: &[u8],
    term: &mut dyn Write,
) -> HandlerResult {
    let from = line_state.cursor;
    let tail = line_state.line.split_off(from);
    line_state.line.extend_from_slice(bytes);
    line_state.line.extend_from_slice(&tail);
    line_state.cursor += bytes.len();
    line_state.render_inserted(term, from)?;
    Ok(None)
}

/// Delete the code point before the cursor.
fn handle_backspace(line_state: &mut LineState, term: &mut dyn Write) -> HandlerResult {
    if line_state.cursor == 0 {
        line_state.ring_bell(term)?;
        return Ok(None);
    }
    let len = last_code_point_len(&line_state.line[..line_state.cursor]);
    let from = line_state.cursor - len;
    line_state.line.drain(from..line_state.cursor);
    line_state.cursor = from;
    line_state.render_tail(term, from)?;
    Ok(None)
}

fn handle_enter(line_state: &mut LineState, term: &mut dyn Write) -> HandlerResult {
    line_state.render_submit(term)?;
    let line = std::mem::take(&mut line_state.line);
    line_state.cursor = 0;
    if line_state.history.update(&line) {
        tracing::debug!(entries = line_state.history.len(), "history appended");
    }
    Ok(Some(ReadlineEvent::Line(String::from_utf8_lossy(&line).into_owned())))
}

fn handle_right(
    line_state: &mut LineState,
    count: usize,
    term: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if line_state.cursor == line_state.line.len() {
        line_state.ring_bell(term)?;
        return Ok(());
    }
    for _ in 0..count {
        let rest = &line_state.line[line_state.cursor..];
        if rest.is_empty() {
            break;
        }
        line_state.cursor += first_code_point_len(rest);
    }
    line_state.move_cursor_to(term, line_state.cursor)?;
    Ok(())
}

fn handle_left(
    line_state: &mut LineState,
    count: usize,
    term: &mut dyn Write,
) -> Result<(), ConsoleError> {
    if line_state.cursor == 0 {
        line_state.ring_bell(term)?;
        return Ok(());
    }
    for _ in 0..count {
        if line_state.cursor == 0 {
            break;
        }
        line_state.cursor -= last_code_point_len(&line_state.line[..line_state.cursor]);
    }
    line_state.move_cursor_to(term, line_state.cursor)?;
    Ok(())
}

fn handle_move_to(
    line_state: &mut LineState,
    offset: usize,
    term: &mut dyn Write,
) -> Result<(), ConsoleError> {
    line_state.cursor = offset.min(line_state.line.len());
    line_state.move_cursor_to(term, line_state.cursor)?;
    Ok(())
}

/// Returns `false` (after ringing the bell) when already at the oldest entry.
fn handle_history_previous(
    line_state: &mut LineState,
    count: usize,
    term: &mut dyn Write,
) -> Result<bool, ConsoleError> {
    let Some(entry) = line_state.history.search_previous(count) else {
        line_state.ring_bell(term)?;
        return Ok(false);
    };
    line_state.line = entry.to_vec();
    line_state.cursor = line_state.line.len();
    line_state.render_line(term)?;
    Ok(true)
}

/// Returns `false` (after ringing the bell) when already at the fresh line.
fn handle_history_next(
    line_state: &mut LineState,
    count: usize,
    term: &mut dyn Write,
) -> Result<bool, ConsoleError> {
    let Some(entry) = line_state.history.search_next(count) else {
        line_state.ring_bell(term)?;
        return Ok(false);
    };
    line_state.line = entry.to_vec();
    line_state.cursor = line_state.line.len();
    line_state.render_line(term)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BEL, test_fixtures::StdoutMock};
    use pretty_assertions::assert_eq;

    fn apply(
        line_state: &mut LineState,
        stdout_mock: &mut StdoutMock,
        tokens: Vec<Token>,
    ) -> Option<ReadlineEvent> {
        let mut last = None;
        for token in tokens {
            last = line_state.apply_token_and_render(token, stdout_mock).unwrap();
        }
        last
    }

    fn csi(final_char: u8, args: &[u16]) -> Token {
        Token::Csi(CsiSequence::new(final_char, args))
    }

    fn bytes(text: &str) -> Token { Token::ByteRun(text.as_bytes().to_vec()) }

    fn line_state_with_history(entries: &[&str]) -> LineState {
        let mut line_state = LineState::new("> ");
        for entry in entries {
            line_state.history.update(entry.as_bytes());
        }
        line_state
    }

    #[test]
    fn test_insert_in_middle() {
        let mut line_state = LineState::new("");
        let mut stdout_mock = StdoutMock::default();
        apply(&mut line_state, &mut stdout_mock, vec![
            bytes("ad"),
            csi(CUB_CURSOR_BACK, &[]),
            bytes("bc"),
        ]);
        assert_eq!(line_state.line, b"abcd");
        assert_eq!(line_state.cursor, 3);
        assert!(stdout_mock.get_copy_of_buffer_as_string().ends_with("bcd\x1b[4G"));
    }

    #[test]
    fn test_insert_then_delete_multibyte_round_trip() {
        let mut line_state = LineState::new("");
        let mut stdout_mock = StdoutMock::default();
        apply(&mut line_state, &mut stdout_mock, vec![
            bytes("ab"),
            csi(CUB_CURSOR_BACK, &[]),
        ]);
        let (line_before, cursor_before) = (line_state.line.clone(), line_state.cursor);

        apply(&mut line_state, &mut stdout_mock, vec![bytes("€")]);
        assert_eq!(line_state.line, "a€b".as_bytes());
        assert_eq!(line_state.cursor, 4);

        apply(&mut line_state, &mut stdout_mock, vec![Token::Control(DEL)]);
        assert_eq!(line_state.line, line_before);
        assert_eq!(line_state.cursor, cursor_before);
    }

    #[test]
    fn test_cursor_steps_over_code_points() {
        let mut line_state = LineState::new("");
        let mut stdout_mock = StdoutMock::default();
        apply(&mut line_state, &mut stdout_mock, vec![bytes("é🦀x")]);

        apply(&mut line_state, &mut stdout_mock, vec![csi(CUB_CURSOR_BACK, &[2])]);
        assert_eq!(line_state.cursor, 2);

        apply(&mut line_state, &mut stdout_mock, vec![csi(CUF_CURSOR_FORWARD, &[])]);
        assert_eq!(line_state.cursor, 6);

        apply(&mut line_state, &mut stdout_mock, vec![csi(CUB_CURSOR_BACK, &[0])]);
        assert_eq!(line_state.cursor, 2);
    }

    #[test]
    fn test_boundary_bells_leave_state_alone() {
        let mut line_state = line_state_with_history(&["one"]);
        let mut stdout_mock = StdoutMock::default();

        // Left at start of an empty line, right at its end.
        let snapshot_of =
            |it: &LineState| (it.line.clone(), it.cursor, it.history.clone());
        for token in [
            csi(CUB_CURSOR_BACK, &[]),
            csi(CUF_CURSOR_FORWARD, &[]),
            Token::Control(DEL),
        ] {
            stdout_mock.clear();
            let snapshot = snapshot_of(&line_state);
            apply(&mut line_state, &mut stdout_mock, vec![token]);
            assert_eq!(stdout_mock.get_copy_of_buffer(), vec![BEL]);
            assert_eq!(snapshot_of(&line_state), snapshot);
        }

        // Down while showing the fresh line.
        for token in [csi(CUD_CURSOR_DOWN, &[]), csi(CNL_CURSOR_NEXT_LINE, &[])] {
            stdout_mock.clear();
            apply(&mut line_state, &mut stdout_mock, vec![token]);
            assert_eq!(stdout_mock.get_copy_of_buffer(), vec![BEL]);
            assert_eq!(line_state.history.index(), 1);
        }

        // Up while showing the oldest entry.
        apply(&mut line_state, &mut stdout_mock, vec![csi(CUU_CURSOR_UP, &[])]);
        for token in [csi(CUU_CURSOR_UP, &[]), csi(CPL_CURSOR_PREV_LINE, &[])] {
            stdout_mock.clear();
            apply(&mut line_state, &mut stdout_mock, vec![token]);
            assert_eq!(stdout_mock.get_copy_of_buffer(), vec![BEL]);
            assert_eq!(line_state.history.index(), 0);
            assert_eq!(line_state.line, b"one");
            assert_eq!(line_state.cursor, 3);
        }
    }

    #[test]
    fn test_history_navigation_replaces_line() {
        let mut line_state = line_state_with_history(&["one", "two", "three"]);
        let mut stdout_mock = StdoutMock::default();

        apply(&mut line_state, &mut stdout_mock, vec![csi(CUU_CURSOR_UP, &[2])]);
        assert_eq!(line_state.line, b"two");
        assert_eq!(line_state.cursor, 3);
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string()
                .ends_with("\x1b[2K\x1b[1G> two\x1b[6G")
        );

        apply(&mut line_state, &mut stdout_mock, vec![csi(CPL_CURSOR_PREV_LINE, &[])]);
        assert_eq!(line_state.line, b"one");
        assert_eq!(line_state.cursor, 0);

        apply(&mut line_state, &mut stdout_mock, vec![csi(CUD_CURSOR_DOWN, &[5])]);
        assert_eq!(line_state.line, b"");
        assert_eq!(line_state.history.index(), 3);
    }

    #[test]
    fn test_move_to_column() {
        let mut line_state = LineState::new("");
        let mut stdout_mock = StdoutMock::default();
        apply(&mut line_state, &mut stdout_mock, vec![
            bytes("a€bc"),
            csi(CHA_CURSOR_COLUMN, &[3]),
        ]);
        assert_eq!(line_state.cursor, 4);

        apply(&mut line_state, &mut stdout_mock, vec![csi(CHA_CURSOR_COLUMN, &[])]);
        assert_eq!(line_state.cursor, 0);

        apply(&mut line_state, &mut stdout_mock, vec![csi(CHA_CURSOR_COLUMN, &[40])]);
        assert_eq!(line_state.cursor, 6);
    }

    #[test]
    fn test_enter_submits_and_records_history() {
        let mut line_state = LineState::new("");
        let mut stdout_mock = StdoutMock::default();

        let event = apply(&mut line_state, &mut stdout_mock, vec![
            bytes("hi"),
            Token::Control(CR),
        ]);
        assert_eq!(event, Some(ReadlineEvent::Line("hi".into())));
        assert_eq!(line_state.history.entries(), &[b"hi".to_vec()]);
        assert_eq!(line_state.line, b"");
        assert_eq!(line_state.cursor, 0);
        assert!(stdout_mock.get_copy_of_buffer_as_string().ends_with("\r\n"));

        let event = apply(&mut line_state, &mut stdout_mock, vec![
            bytes("hi"),
            Token::Control(LF),
        ]);
        assert_eq!(event, Some(ReadlineEvent::Line("hi".into())));
        let event = apply(&mut line_state, &mut stdout_mock, vec![Token::Control(CR)]);
        assert_eq!(event, Some(ReadlineEvent::Line(String::new())));
        assert_eq!(line_state.history.len(), 1);
    }

    #[test]
    fn test_interrupt_keeps_line() {
        let mut line_state = LineState::new("");
        let mut stdout_mock = StdoutMock::default();
        let event = apply(&mut line_state, &mut stdout_mock, vec![
            bytes("half"),
            Token::Control(0x03),
        ]);
        assert_eq!(event, Some(ReadlineEvent::Interrupted(ControlBreak(0x03))));
        assert_eq!(line_state.line, b"half");
        assert_eq!(line_state.cursor, 4);
    }

    #[test]
    fn test_tab_and_unknown_sequences() {
        let mut line_state = LineState::new("");
        let mut stdout_mock = StdoutMock::default();
        let event = apply(&mut line_state, &mut stdout_mock, vec![
            Token::Control(HT),
            csi(b'~', &[3]),
            Token::Escape(crate::EscSequence::new(b'O')),
        ]);
        assert_eq!(event, None);
        assert_eq!(stdout_mock.get_copy_of_buffer(), vec![BEL]);
        assert_eq!(line_state.line, b"");
    }
}
