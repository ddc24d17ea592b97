// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Error types for the console.
//!
//! - [`ProtocolError`]: unexpected byte while decoding a sequence. Not recoverable for
//!   that read, the stream is not resynchronized.
//! - [`ControlBreak`]: a control byte that is not an editing key arrived while reading a
//!   line. This is an expected outcome, see [`crate::ReadlineEvent::Interrupted`].
//! - [`ConsoleError`]: everything a console operation can fail with.

use crate::{DEL, NUL};
use std::{fmt::{self, Display, Formatter},
          io};

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConsoleError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Protocol(#[from] ProtocolError),

    /// The input source ended or failed, or writing to the output device failed.
    #[error("console stream failure: {0}")]
    #[diagnostic(
        code(r3bl_vt_console::stream),
        help("The terminal input was closed or the output could not be written.")
    )]
    Stream(#[from] io::Error),

    /// Produced by [`crate::ReadlineEvent::into_line`] for callers that treat an
    /// interrupt as an error.
    #[error("line editing interrupted by {0}")]
    #[diagnostic(code(r3bl_vt_console::interrupted))]
    Interrupted(ControlBreak),
}

impl ConsoleError {
    /// `true` when the input source reached end-of-stream.
    #[must_use]
    pub fn is_end_of_stream(&self) -> bool {
        matches!(
            self,
            ConsoleError::Stream(err) if err.kind() == io::ErrorKind::UnexpectedEof
        )
    }
}

/// An unexpected byte where the scanner accepted only `expected`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("unexpected byte 0x{byte:02x}, expected {expected}")]
#[diagnostic(
    code(r3bl_vt_console::protocol),
    help("The terminal sent a malformed control sequence.")
)]
pub struct ProtocolError {
    pub byte: u8,
    pub expected: &'static str,
}

/// Control byte that ended a line read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ControlBreak(pub u8);

impl Display for ControlBreak {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            NUL => write!(f, "NUL"),
            DEL => write!(f, "DEL"),
            byte @ 0x01..=0x1F => write!(f, "Ctrl-{}", char::from(byte + b'A' - 1)),
            byte => write!(f, "CBreak-{byte:x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0x00, "NUL")]
    #[test_case(0x7F, "DEL")]
    #[test_case(0x03, "Ctrl-C")]
    #[test_case(0x04, "Ctrl-D")]
    #[test_case(0x1A, "Ctrl-Z")]
    #[test_case(0x1F, "Ctrl-_")]
    #[test_case(0x9B, "CBreak-9b")]
    fn test_control_break_display(byte: u8, expected: &str) {
        assert_eq!(ControlBreak(byte).to_string(), expected);
    }

    #[test]
    fn test_end_of_stream() {
        let err = ConsoleError::from(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(err.is_end_of_stream());

        let err = ConsoleError::from(ProtocolError {
            byte: b'9',
            expected: "digit",
        });
        assert!(!err.is_end_of_stream());
        assert_eq!(err.to_string(), "unexpected byte 0x39, expected digit");
    }
}
