// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! In-memory stand-ins for the terminal, used by unit and integration tests.

// Attach sources.
pub mod deadline;
pub mod input_mock;
pub mod stdout_mock;

// Re-export.
pub use deadline::*;
pub use input_mock::*;
pub use stdout_mock::*;
