// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BEL, ConsoleError, CsiSequence, DSR_CURSOR_POSITION,
            DSR_CURSOR_POSITION_RESPONSE, DSR_DEVICE_STATUS, HVP_CURSOR_POSITION,
            InputDevice, LineState, OutputDevice, ReadlineEvent, StdMutex,
            TokenDispatcher, TokenScanner, lock_output_device_as_mut, ok};
use std::{io::Write,
          sync::{MutexGuard, PoisonError}};

/// Position reported by the terminal, 1-based exactly as received.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CursorPosition {
    pub row: u16,
    pub col: u16,
}

/// Interactive console over a byte oriented terminal.
///
/// One thread runs [`Self::read_line`] while others may query the terminal, e.g. with
/// [`Self::cursor_position`]. Share it with an [`std::sync::Arc`]. Keystrokes and replies
/// arrive on the same input stream and are told apart by the [`TokenDispatcher`].
///
/// Locks:
/// - `line_state` is held for the whole of a [`Self::read_line`] call, so the inspection
///   helpers ([`Self::current_line`], [`Self::cursor`], [`Self::history`]) block while a
///   read is in progress.
/// - The output device is locked once per token, so other threads can write queries in
///   between.
pub struct Console {
    dispatcher: TokenDispatcher,
    output_device: OutputDevice,
    prompt: StdMutex<String>,
    line_state: StdMutex<LineState>,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("dispatcher", &self.dispatcher)
            .field("prompt", &self.prompt())
            .finish_non_exhaustive()
    }
}

impl Console {
    #[must_use]
    pub fn new(input_device: InputDevice, output_device: OutputDevice) -> Self {
        Self {
            dispatcher: TokenDispatcher::new(TokenScanner::new(input_device)),
            output_device,
            prompt: StdMutex::new(String::new()),
            line_state: StdMutex::new(LineState::default()),
        }
    }

    /// Console on the process's stdin and stdout. Put the terminal in raw mode first,
    /// see [`crate::RawModeGuard`].
    #[must_use]
    pub fn new_stdio() -> Self {
        Self::new(InputDevice::new_stdin(), OutputDevice::new_stdout())
    }

    /// The dispatcher, for queries this type has no helper for.
    #[must_use]
    pub fn dispatcher(&self) -> &TokenDispatcher { &self.dispatcher }

    #[must_use]
    pub fn output_device(&self) -> &OutputDevice { &self.output_device }

    #[must_use]
    pub fn prompt(&self) -> String {
        self.prompt
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Takes effect at the next [`Self::read_line`].
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        *self.prompt.lock().unwrap_or_else(PoisonError::into_inner) = prompt.into();
    }

    fn lock_line_state(&self) -> MutexGuard<'_, LineState> {
        self.line_state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Edit a line until it is submitted or interrupted.
    ///
    /// The row is redrawn first with the prompt and whatever is left of a line that an
    /// earlier read returned [`ReadlineEvent::Interrupted`] for.
    ///
    /// # Errors
    ///
    /// Returns an error when the input stream fails or ends, a malformed sequence
    /// arrives, or writing to the output device fails.
    pub fn read_line(&self) -> Result<ReadlineEvent, ConsoleError> {
        let mut line_state = self.lock_line_state();
        line_state.prompt = self.prompt();
        {
            let mut term = self.output_device.lock();
            line_state.render_line(&mut *term)?;
            term.flush()?;
        }

        loop {
            let token = self.dispatcher.next()?;
            let maybe_event = {
                let mut term = self.output_device.lock();
                let maybe_event = line_state.apply_token_and_render(token, &mut *term)?;
                term.flush()?;
                maybe_event
            };
            if let Some(event) = maybe_event {
                return Ok(event);
            }
        }
    }

    /// Ask the terminal where its cursor is (DSR 6) and wait for the report. Keystrokes
    /// that arrive before the report stay queued for [`Self::read_line`].
    ///
    /// # Errors
    ///
    /// Returns an error when writing the query fails or the input stream fails before
    /// the report arrives.
    pub fn cursor_position(&self) -> Result<CursorPosition, ConsoleError> {
        let claim = self.dispatcher.claim_csi(DSR_CURSOR_POSITION_RESPONSE);
        self.write_csi(DSR_DEVICE_STATUS, &[DSR_CURSOR_POSITION])?;
        let csi = claim.wait_csi()?;
        let position = CursorPosition {
            row: csi.arg(0),
            col: csi.arg(1),
        };
        tracing::debug!(?position, "cursor position report");
        ok!(position)
    }

    /// Move the terminal cursor (HVP). `row` and `col` are 1-based.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output device fails.
    pub fn set_cursor_position(&self, row: u16, col: u16) -> Result<(), ConsoleError> {
        self.write_csi(HVP_CURSOR_POSITION, &[row, col])
    }

    /// Write one CSI sequence and flush.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the output device fails.
    pub fn write_csi(&self, final_char: u8, args: &[u16]) -> Result<(), ConsoleError> {
        let term = lock_output_device_as_mut!(self.output_device);
        write!(term, "{}", CsiSequence::new(final_char, args))?;
        term.flush()?;
        ok!()
    }

    /// # Errors
    ///
    /// Returns an error if writing to the output device fails.
    pub fn bell(&self) -> Result<(), ConsoleError> {
        let term = lock_output_device_as_mut!(self.output_device);
        term.write_all(&[BEL])?;
        term.flush()?;
        ok!()
    }

    /// Replace the line in progress without drawing it. The next [`Self::read_line`]
    /// shows it with the cursor at its end.
    pub fn set_line(&self, line: impl Into<Vec<u8>>) {
        self.lock_line_state().set_line(line);
    }

    /// The line in progress, e.g. what was typed before an interrupt.
    #[must_use]
    pub fn current_line(&self) -> String { self.lock_line_state().line_as_string() }

    /// Byte offset of the cursor within [`Self::current_line`].
    #[must_use]
    pub fn cursor(&self) -> usize { self.lock_line_state().cursor }

    /// Submitted lines, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock_line_state()
            .history
            .entries()
            .iter()
            .map(|it| String::from_utf8_lossy(it).into_owned())
            .collect()
    }
}
