// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::SendRawInput;
use std::io::{self, Read};

/// Blocking byte source a console reads keystrokes and terminal replies from. See
/// [`crate::test_fixtures::InputMock`] for testing.
#[allow(missing_debug_implementations)]
pub struct InputDevice {
    pub resource: Box<SendRawInput>,
    pub is_mock: bool,
}

impl Default for InputDevice {
    fn default() -> Self { Self::new_stdin() }
}

impl InputDevice {
    #[must_use]
    pub fn new_stdin() -> Self {
        Self {
            resource: Box::new(io::stdin()),
            is_mock: false,
        }
    }

    /// Wrap any reader, for example a pty master or a socket.
    #[must_use]
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            resource: Box::new(reader),
            is_mock: false,
        }
    }
}

impl Read for InputDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.resource.read(buf) }
}
