// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod console;
pub mod line_state;
pub mod readline_event;
pub mod readline_history;

// Re-export.
pub use console::*;
pub use line_state::*;
pub use readline_event::*;
pub use readline_history::*;
