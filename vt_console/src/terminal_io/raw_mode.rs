// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommonResult, ok};
use miette::{IntoDiagnostic, WrapErr};

/// Puts the controlling terminal in raw mode for as long as it is alive, so keystrokes
/// reach the console byte by byte and without local echo. Cooked mode is restored on
/// drop.
#[derive(Debug)]
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// # Errors
    ///
    /// Returns an error if stdin is not a terminal or its mode cannot be changed.
    pub fn try_new() -> CommonResult<Self> {
        crossterm::terminal::enable_raw_mode()
            .into_diagnostic()
            .wrap_err("Could not enable raw mode")?;
        tracing::debug!("raw mode enabled");
        ok!(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        match crossterm::terminal::disable_raw_mode() {
            Ok(()) => tracing::debug!("raw mode disabled"),
            Err(err) => tracing::error!(%err, "could not disable raw mode"),
        }
    }
}
