// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ConsoleError, ControlBreak};

/// Outcome of [`crate::Console::read_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadlineEvent {
    /// The user submitted a line with Enter (CR or LF). Invalid UTF-8 is replaced.
    Line(String),

    /// A control byte that is not an editing key was pressed, e.g. `Ctrl-C` or `Ctrl-D`.
    /// The line in progress is kept, so the next read resumes it.
    Interrupted(ControlBreak),
}

impl ReadlineEvent {
    /// Turn an interrupt into [`ConsoleError::Interrupted`], for callers that only care
    /// about submitted lines.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Interrupted`] for [`ReadlineEvent::Interrupted`].
    pub fn into_line(self) -> Result<String, ConsoleError> {
        match self {
            ReadlineEvent::Line(line) => Ok(line),
            ReadlineEvent::Interrupted(control_break) => {
                Err(ConsoleError::Interrupted(control_break))
            }
        }
    }
}
