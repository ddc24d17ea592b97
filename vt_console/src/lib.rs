// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Blocking VT102 console
//!
//! This crate lets a program drive an interactive character terminal over a plain byte
//! stream. It is made of three tightly coupled layers:
//!
//! ```text
//! raw bytes (stdin, pty, socket)
//!    │
//! ┌──▼──────────────────────────────┐
//! │  TokenScanner                   │  bytes → Token (ByteRun, Control, Escape, Csi)
//! └─────────────────────────────────┘
//!    │
//! ┌──▼──────────────────────────────┐
//! │  TokenDispatcher                │  "next token matching P", shared by many threads
//! └─────────────────────────────────┘
//!    │                  │
//!    ▼                  ▼
//! Console::read_line   Console::cursor_position (CSI 6 n → CSI row ; col R)
//! ```
//!
//! 1. [`TokenScanner`] decodes the terminal's escape / CSI protocol.
//! 2. [`TokenDispatcher`] lets several callers share one input stream. Each asks for the
//!    next token that satisfies its own predicate, tokens nobody asked for yet are kept
//!    in arrival order, and only one caller performs a physical read at a time.
//! 3. [`Console`] runs a readline-style line editor with in-memory history on top of the
//!    dispatcher's catch-all predicate, while other threads can interleave status
//!    queries such as [`Console::cursor_position`].
//!
//! # Example
//!
//! ```no_run
//! use r3bl_vt_console::{Console, ReadlineEvent, RawModeGuard};
//!
//! # fn main() -> miette::Result<()> {
//! let _raw_mode = RawModeGuard::try_new()?;
//! let console = Console::new_stdio();
//! console.set_prompt("> ");
//! loop {
//!     match console.read_line()? {
//!         ReadlineEvent::Line(line) => println!("{line}\r"),
//!         ReadlineEvent::Interrupted(control_break) => {
//!             println!("{control_break}\r");
//!             break;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules.
pub mod ansi;
pub mod decl_macros;
pub mod error;
pub mod log;
pub mod readline;
pub mod terminal_io;
pub mod test_fixtures;

// Re-export.
pub use ansi::*;
pub use error::*;
pub use log::*;
pub use readline::*;
pub use terminal_io::*;

// Type aliases.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// It is basically `miette::Result<T, miette::Report>`. Used by setup code and binaries.
pub type CommonResult<T> = miette::Result<T>;
