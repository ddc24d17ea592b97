// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

/// Log file used when a file writer is requested without a path.
pub const DEFAULT_LOG_FILE_NAME: &str = "vt_console_log.txt";

/// Configure the tracing logging to suit your needs. You can display the logs to a:
/// 1. file,
/// 2. stdout or stderr,
/// 3. both.
///
/// Pass it to [`crate::init_tracing`].
///
/// Fields:
/// - `writer_config`: [`WriterConfig`] to choose where to write the logs.
/// - `level_filter`: [`LevelFilter::OFF`] turns logging off entirely.
/// - `scope`: [`TracingScope`] chooses between a process wide and a thread local
///   subscriber.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
    pub scope: TracingScope,
}

/// - `String` is the file path to use for the log file. Eg: `/tmp/vtc_shell.log`.
/// - [`DisplayPreference`] is the preferred display to use for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String /* log file path */),
    DisplayAndFile(DisplayPreference, String /* log file path */),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

/// A thread local subscriber is great for tests, since each test runs on its own thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TracingScope {
    #[default]
    Global,
    ThreadLocal,
}

impl TracingConfig {
    /// Log to both the given [`DisplayPreference`] and a file.
    #[must_use]
    pub fn new_file_and_display(
        filename: Option<String>,
        preferred_display: DisplayPreference,
    ) -> Self {
        Self {
            writer_config: WriterConfig::DisplayAndFile(
                preferred_display,
                filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter: LevelFilter::DEBUG,
            scope: TracingScope::Global,
        }
    }

    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level_filter: LevelFilter::DEBUG,
            scope: TracingScope::Global,
        }
    }

    #[must_use]
    pub fn new_file(filename: Option<String>) -> Self {
        Self {
            writer_config: WriterConfig::File(
                filename.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter: LevelFilter::DEBUG,
            scope: TracingScope::Global,
        }
    }

    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: TracingScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn get_writer_config(&self) -> WriterConfig { self.writer_config.clone() }

    #[must_use]
    pub fn get_level_filter(&self) -> LevelFilter { self.level_filter }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builders() {
        let it = TracingConfig::new_file(None)
            .with_level_filter(LevelFilter::TRACE)
            .with_scope(TracingScope::ThreadLocal);
        assert_eq!(
            it.get_writer_config(),
            WriterConfig::File(DEFAULT_LOG_FILE_NAME.to_string())
        );
        assert_eq!(it.get_level_filter(), LevelFilter::TRACE);
        assert_eq!(it.scope, TracingScope::ThreadLocal);

        let it = TracingConfig::new_file_and_display(
            Some("a.log".into()),
            DisplayPreference::Stderr,
        );
        assert_eq!(
            it.get_writer_config(),
            WriterConfig::DisplayAndFile(DisplayPreference::Stderr, "a.log".into())
        );
        assert_eq!(it.get_level_filter(), LevelFilter::DEBUG);
        assert_eq!(it.scope, TracingScope::Global);
    }
}
