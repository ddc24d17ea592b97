// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Line editing state machine driven by [`Token`]s.
//!
//! | Module           | Responsibility                                          |
//! |------------------|---------------------------------------------------------|
//! | `core`           | [`LineState`] struct, column math                       |
//! | `event_handlers` | Token dispatch: insert, delete, cursor, history, submit |
//! | `render`         | Minimal redraws with CSI sequences                      |
//!
//! The line is kept as raw bytes. Insertion and rendering work on bytes, while cursor
//! movement and deletion step over whole code points. Every terminal repositioning is
//! an absolute `CHA`, so a redraw never depends on where the terminal cursor was left.
//!
//! [`Token`]: crate::Token

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Private modules organized by functional responsibility.
mod core;
mod event_handlers;
mod render;

// Public re-exports (expose stable API).
pub use self::core::*;
pub use event_handlers::*;
