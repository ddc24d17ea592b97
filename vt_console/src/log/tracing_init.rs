// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommonResult, DisplayPreference, TracingConfig, TracingScope, WriterConfig,
            log::rolling_file_appender_impl};
use miette::IntoDiagnostic;
use tracing::subscriber::DefaultGuard;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, registry::LookupSpan,
                         util::SubscriberInitExt};

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_thread_names(true)
            .with_target(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Initialize the tracing system with the provided [`TracingConfig`].
///
/// - [`TracingScope::Global`] installs a process wide subscriber and returns `None`.
/// - [`TracingScope::ThreadLocal`] returns the guard that keeps the subscriber active on
///   the current thread until it is dropped.
///
/// Nothing is installed when the level filter is [`LevelFilter::OFF`] or the writer is
/// [`WriterConfig::None`].
///
/// # Errors
///
/// Returns an error if the log file can't be created, or a global subscriber is already
/// installed.
pub fn init_tracing(tracing_config: TracingConfig) -> CommonResult<Option<DefaultGuard>> {
    if tracing_config.get_level_filter() == LevelFilter::OFF {
        return Ok(None);
    }

    let scope = tracing_config.scope;
    let Some(layers) = try_create_layers(tracing_config)? else {
        return Ok(None);
    };
    let subscriber = tracing_subscriber::registry().with(layers);

    match scope {
        TracingScope::Global => {
            subscriber.try_init().into_diagnostic()?;
            Ok(None)
        }
        TracingScope::ThreadLocal => {
            Ok(Some(tracing::subscriber::set_default(subscriber)))
        }
    }
}

/// Returns the layers. This does not initialize the tracing system, [`init_tracing`]
/// does.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> CommonResult<Option<Vec<Box<DynLayer<tracing_subscriber::Registry>>>>> {
    if tracing_config.get_writer_config() == WriterConfig::None {
        return Ok(None);
    }

    let level_filter = tracing_config.get_level_filter();
    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> = vec![];

    // Level filter for the whole registry, in addition to the per layer ones.
    return_it.push(Box::new(level_filter));

    if let Some(layer) =
        try_create_display_layer(level_filter, tracing_config.get_writer_config())?
    {
        return_it.push(layer);
    }

    if let Some(layer) =
        try_create_file_layer(level_filter, tracing_config.get_writer_config())?
    {
        return_it.push(layer);
    }

    Ok(Some(return_it))
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Never fails today. The signature matches [`try_create_file_layer`].
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> CommonResult<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(display_pref, _)
        | WriterConfig::Display(display_pref) => match display_pref {
            DisplayPreference::Stdout => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stdout)
                    .with_filter(level_filter),
            )),
            DisplayPreference::Stderr => Some(Box::new(
                fmt_layer
                    .with_writer(std::io::stderr)
                    .with_filter(level_filter),
            )),
        },
        WriterConfig::None | WriterConfig::File(_) => None,
    })
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Returns an error if the log file can't be created.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: WriterConfig,
) -> CommonResult<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!().with_ansi(false);

    Ok(match writer_config {
        WriterConfig::DisplayAndFile(_, log_file_path)
        | WriterConfig::File(log_file_path) => {
            let file = rolling_file_appender_impl::try_create(log_file_path.as_str())?;
            Some(Box::new(
                fmt_layer.with_writer(file).with_filter(level_filter),
            ))
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_file(dir: &tempfile::TempDir) -> String {
        dir.path()
            .join("vt_console_test.log")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_try_create_display_layer() {
        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_display_layer(
                LevelFilter::DEBUG,
                WriterConfig::Display(DisplayPreference::Stdout),
            )
            .unwrap();
        assert!(layer.is_some());
    }

    #[test]
    fn test_try_create_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = temp_log_file(&dir);

        let layer: Option<Box<DynLayer<tracing_subscriber::Registry>>> =
            try_create_file_layer(
                LevelFilter::DEBUG,
                WriterConfig::File(file_path.clone()),
            )
            .unwrap();

        assert!(layer.is_some());
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_try_create_both_layers() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = temp_log_file(&dir);

        let tracing_config = TracingConfig::new_file_and_display(
            Some(file_path.clone()),
            DisplayPreference::Stderr,
        );

        let layers = try_create_layers(tracing_config).unwrap().unwrap();
        assert_eq!(layers.len(), 3);
        assert!(std::path::Path::new(&file_path).exists());
    }

    #[test]
    fn test_no_layers_for_none_writer() {
        let tracing_config = TracingConfig {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::DEBUG,
            scope: TracingScope::ThreadLocal,
        };
        assert!(try_create_layers(tracing_config).unwrap().is_none());
    }

    #[test]
    fn test_level_off_installs_nothing() {
        let tracing_config = TracingConfig::new_display(DisplayPreference::Stdout)
            .with_level_filter(LevelFilter::OFF)
            .with_scope(TracingScope::ThreadLocal);
        assert!(init_tracing(tracing_config).unwrap().is_none());
    }

    #[test]
    fn test_thread_local_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = temp_log_file(&dir);

        let tracing_config = TracingConfig::new_file(Some(file_path.clone()))
            .with_level_filter(LevelFilter::INFO)
            .with_scope(TracingScope::ThreadLocal);
        let guard = init_tracing(tracing_config).unwrap();
        assert!(guard.is_some());

        tracing::info!("kept message");
        tracing::debug!("filtered message");
        drop(guard);

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert!(content.contains("kept message"));
        assert!(!content.contains("filtered message"));
    }
}
