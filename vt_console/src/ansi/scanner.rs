// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Byte stream to [`Token`] state machine.
//!
//! Each call to [`TokenScanner::next_token`] recognizes exactly one token starting at the
//! front of the unconsumed buffer:
//!
//! 1. `ESC`, then one byte `x`:
//!    - `x == '['` continues as CSI (step 2).
//!    - `x` in `% # ( )` reads one payload byte: [`Token::Escape`] with payload.
//!    - otherwise [`Token::Escape`] without payload.
//! 2. CSI (`ESC [` or the single byte `0x9B`): ASCII digits accumulate into the current
//!    argument group, `;` closes the group (empty groups are `0`), and any other byte is
//!    the final character. A group in progress is closed by the final character, so
//!    `ESC [ m` has no arguments and `ESC [ 1 ; 2 H` has two.
//! 3. A control byte (`0x00..=0x1F` or `0x7F`) is emitted as [`Token::Control`].
//! 4. Anything else starts a [`Token::ByteRun`] that extends over the bytes already
//!    buffered, up to the first control byte or sequence introducer. The run ends at the
//!    end of buffered data instead of blocking for more.
//!
//! Only steps 1 and 2 block on the source for more bytes. When the source fails in the
//! middle of a token nothing is consumed: the partial bytes stay at the front of the
//! buffer and the error is returned.

use crate::{C0_LAST, CSI_8BIT, CSI_ARG_SEPARATOR, CSI_BRACKET, CsiArgs, CsiSequence, DEL,
            ESC, EscSequence, InputDevice, ProtocolError, Token};
use std::io::{self, Read};

/// Size of each physical read from the source.
pub const READ_CHUNK_SIZE: usize = 512;

const EXPECTED_CSI_ARG: &str = "CSI argument digit that fits in u16";

/// Failure of a single [`TokenScanner::next_token`] call.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Stream(#[from] io::Error),
}

impl From<ScanError> for crate::ConsoleError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Protocol(it) => crate::ConsoleError::Protocol(it),
            ScanError::Stream(it) => crate::ConsoleError::Stream(it),
        }
    }
}

/// Owns the raw byte source and the buffer of bytes read but not yet turned into tokens.
pub struct TokenScanner {
    source: InputDevice,
    buffer: Vec<u8>,
    chunk: Box<[u8; READ_CHUNK_SIZE]>,
}

impl std::fmt::Debug for TokenScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenScanner")
            .field("pending_bytes", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

/// Bytes that end a [`Token::ByteRun`].
fn is_run_terminator(byte: u8) -> bool {
    byte <= C0_LAST || byte == DEL || byte == ESC || byte == CSI_8BIT
}

impl TokenScanner {
    #[must_use]
    pub fn new(source: InputDevice) -> Self {
        Self {
            source,
            buffer: Vec::with_capacity(READ_CHUNK_SIZE),
            chunk: Box::new([0; READ_CHUNK_SIZE]),
        }
    }

    /// Bytes read from the source that are not part of a produced token yet.
    #[must_use]
    pub fn pending_bytes(&self) -> &[u8] { &self.buffer }

    /// Recognize the next token. Blocks on the source while a sequence is incomplete.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Stream`] when the source fails or reaches end-of-stream
    ///   ([`io::ErrorKind::UnexpectedEof`]).
    /// - [`ScanError::Protocol`] when a CSI argument does not fit in a `u16`.
    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        let mut cursor = 0;
        let token = self.scan(&mut cursor)?;
        self.buffer.drain(..cursor);
        tracing::trace!(kind = %token.kind(), ?token, "scanned token");
        Ok(token)
    }

    fn scan(&mut self, cursor: &mut usize) -> Result<Token, ScanError> {
        let byte = self.fetch(cursor)?;
        match byte {
            ESC => self.scan_escape(cursor),
            CSI_8BIT => self.scan_csi(cursor),
            _ if byte <= C0_LAST || byte == DEL => Ok(Token::Control(byte)),
            _ => {
                while let Some(&next) = self.buffer.get(*cursor) {
                    if is_run_terminator(next) {
                        break;
                    }
                    *cursor += 1;
                }
                Ok(Token::ByteRun(self.buffer[..*cursor].to_vec()))
            }
        }
    }

    fn scan_escape(&mut self, cursor: &mut usize) -> Result<Token, ScanError> {
        let introducer = self.fetch(cursor)?;
        if introducer == CSI_BRACKET {
            return self.scan_csi(cursor);
        }
        if EscSequence::takes_payload(introducer) {
            let payload = self.fetch(cursor)?;
            return Ok(Token::Escape(EscSequence::with_payload(introducer, payload)));
        }
        Ok(Token::Escape(EscSequence::new(introducer)))
    }

    fn scan_csi(&mut self, cursor: &mut usize) -> Result<Token, ScanError> {
        let mut args = CsiArgs::new();
        let mut group: Option<u16> = None;
        loop {
            let byte = self.fetch(cursor)?;
            match byte {
                b'0'..=b'9' => {
                    let digit = u16::from(byte - b'0');
                    let value = group
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|it| it.checked_add(digit))
                        .ok_or_else(|| {
                            tracing::warn!(byte, "CSI argument overflow");
                            ProtocolError {
                                byte,
                                expected: EXPECTED_CSI_ARG,
                            }
                        })?;
                    group = Some(value);
                }
                CSI_ARG_SEPARATOR => args.push(group.take().unwrap_or(0)),
                final_char => {
                    args.extend(group);
                    return Ok(Token::Csi(CsiSequence {
                        final_char,
                        args,
                    }));
                }
            }
        }
    }

    /// Byte at `cursor`, reading from the source until it is buffered.
    fn fetch(&mut self, cursor: &mut usize) -> Result<u8, ScanError> {
        while *cursor >= self.buffer.len() {
            self.fill_buffer()?;
        }
        let byte = self.buffer[*cursor];
        *cursor += 1;
        Ok(byte)
    }

    fn fill_buffer(&mut self) -> io::Result<()> {
        loop {
            match self.source.read(&mut self.chunk[..]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "terminal input closed",
                    ));
                }
                Ok(count) => {
                    self.buffer.extend_from_slice(&self.chunk[..count]);
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}
