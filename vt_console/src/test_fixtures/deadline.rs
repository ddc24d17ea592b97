// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::{Duration, Instant};

/// How long tests wait for another thread before failing.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Bounds a polling loop in a test, so a stuck thread fails the test instead of
/// hanging the suite.
///
/// ```
/// use r3bl_vt_console::test_fixtures::Deadline;
///
/// let deadline = Deadline::default();
/// loop {
///     assert!(deadline.has_time_remaining(), "Timeout: condition never became true");
///     // ... check the condition ...
/// #   break;
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
}

impl Deadline {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now() + timeout,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool { Instant::now() >= self.expires_at }

    #[must_use]
    pub fn has_time_remaining(&self) -> bool { !self.is_expired() }
}

impl Default for Deadline {
    fn default() -> Self { Self::new(DEFAULT_DEADLINE) }
}
