// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{SafeRawTerminal, SendRawTerminal, StdMutex};
use std::sync::{Arc, MutexGuard, PoisonError};

pub type LockedOutputDevice<'a> = &'a mut dyn std::io::Write;

/// Macro to simplify locking and getting a mutable reference to the output device.
/// Don't call this again in the same scope, it will deadlock! A safe approach is
/// to use this macro in a separate block scope.
///
/// ```
/// use r3bl_vt_console::{lock_output_device_as_mut, OutputDevice, LockedOutputDevice};
/// let device = OutputDevice::new_stdout();
/// { // Start a new block scope to avoid deadlock.
///     let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
///     let _ = mut_ref.write_all(b"\x07");
/// } // The lock is released here.
/// ```
#[macro_export]
macro_rules! lock_output_device_as_mut {
    ($device:expr) => {
        &mut *$device.lock()
    };
}

/// Output sink of a console. Safe to clone, clones share one lock.
///
/// This lock is separate from the input dispatcher's lock, so redraws issued while
/// reading input can never deadlock against a thread waiting for a token.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(std::io::stdout())),
            is_mock: false,
        }
    }

    /// Wrap any writer, for example a pty master or a socket.
    #[must_use]
    pub fn new(writer: impl std::io::Write + Send + 'static) -> Self {
        Self {
            resource: Arc::new(StdMutex::new(writer)),
            is_mock: false,
        }
    }

    /// Locks the output device for writing. A poisoned lock is recovered.
    pub fn lock(&self) -> MutexGuard<'_, SendRawTerminal> {
        self.resource.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{OutputDeviceExt, StdoutMock};
    use std::io::Write;

    #[test]
    fn test_stdout_output_device_is_not_mock() {
        let device = OutputDevice::new_stdout();
        assert!(!device.is_mock);
    }

    #[test]
    fn test_clones_share_the_sink() {
        let (device, stdout_mock) = OutputDevice::new_mock();
        let clone = device.clone();
        {
            let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
            mut_ref.write_all(b"ab").unwrap();
        }
        {
            let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(clone);
            mut_ref.write_all(b"cd").unwrap();
        }
        assert!(device.is_mock);
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "abcd");
    }

    #[test]
    fn test_wraps_any_writer() {
        let stdout_mock = StdoutMock::default();
        let device = OutputDevice::new(stdout_mock.clone());
        device.lock().write_all(b"\x1b[2K").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "");
        assert_eq!(stdout_mock.get_copy_of_buffer(), b"\x1b[2K".to_vec());
    }
}
