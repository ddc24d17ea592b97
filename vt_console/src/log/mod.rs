// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Logging setup. The console draws on the terminal it logs about, so in raw mode point
//! the logs at a file ([`WriterConfig::File`]) rather than stdout.

// Attach sources.
pub mod rolling_file_appender_impl;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
