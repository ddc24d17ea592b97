// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! VT102 input protocol layer.
//!
//! | Module       | Responsibility                                                  |
//! |--------------|-----------------------------------------------------------------|
//! | `constants`  | Control bytes, introducers, CSI final chars, DSR parameters     |
//! | `token`      | [`Token`] sum type and wire serialization                       |
//! | `utf8`       | Code point length helpers for the line editor                   |
//! | `scanner`    | [`TokenScanner`]: bytes → tokens                                |
//! | `dispatcher` | [`TokenDispatcher`]: predicate dispatch shared across threads   |

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

// Attach.
pub mod constants;
pub mod dispatcher;
pub mod scanner;
pub mod token;
pub mod utf8;

// Re-export.
pub use constants::*;
pub use dispatcher::*;
pub use scanner::*;
pub use token::*;
pub use utf8::*;
