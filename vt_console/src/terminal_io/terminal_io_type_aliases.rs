// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::StdMutex;
use std::sync::Arc;

/// Type alias for a `Send`-able output sink (stdout, pty, socket, mock).
pub type SendRawTerminal = dyn std::io::Write + Send;
/// Type alias for a `Send`-able output sink wrapped in an `Arc<StdMutex>`.
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

/// Type alias for a `Send`-able blocking byte source.
pub type SendRawInput = dyn std::io::Read + Send;
