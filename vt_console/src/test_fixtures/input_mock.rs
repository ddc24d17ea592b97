// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::InputDevice;
use std::{io::{self, Read},
          sync::mpsc::{self, Receiver, Sender}};

/// Blocking byte source fed from a channel. Each [`InputSender::send`] becomes at most
/// one chunk returned by [`Read::read`] (split only when the caller's buffer is
/// smaller), which makes read boundaries deterministic in tests. Once every
/// [`InputSender`] is dropped and the queued chunks are drained, reads return `Ok(0)`.
#[allow(missing_debug_implementations)]
pub struct InputMock {
    receiver: Receiver<Vec<u8>>,
    leftover: Vec<u8>,
}

/// Feeds an [`InputMock`]. Safe to clone and to move to another thread.
#[derive(Clone, Debug)]
pub struct InputSender {
    sender: Sender<Vec<u8>>,
}

impl InputSender {
    /// Queue `bytes` for the mock. Ignored if the mock was already dropped.
    pub fn send(&self, bytes: impl AsRef<[u8]>) {
        let _unused = self.sender.send(bytes.as_ref().to_vec());
    }
}

impl InputMock {
    #[must_use]
    pub fn new_pair() -> (InputMock, InputSender) {
        let (sender, receiver) = mpsc::channel();
        (
            InputMock {
                receiver,
                leftover: Vec::new(),
            },
            InputSender { sender },
        )
    }
}

impl Read for InputMock {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.leftover.is_empty() {
            match self.receiver.recv() {
                Ok(chunk) => self.leftover = chunk,
                Err(_) => return Ok(0),
            }
        }
        let count = buf.len().min(self.leftover.len());
        buf[..count].copy_from_slice(&self.leftover[..count]);
        self.leftover.drain(..count);
        Ok(count)
    }
}

impl From<InputMock> for InputDevice {
    fn from(mock: InputMock) -> Self {
        InputDevice {
            resource: Box::new(mock),
            is_mock: true,
        }
    }
}

pub trait InputDeviceExt {
    fn new_mock() -> (InputDevice, InputSender);
}

impl InputDeviceExt for InputDevice {
    fn new_mock() -> (InputDevice, InputSender) {
        let (input_mock, sender) = InputMock::new_pair();
        (input_mock.into(), sender)
    }
}
