// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

/// Appender that writes to exactly `path_str`, without rotation. Wrapping it in
/// `tracing_appender::non_blocking` loses lines on exit, so it is used as is.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no parent directory
/// - The path has no file name
pub fn try_create(
    path_str: &str,
) -> miette::Result<tracing_appender::rolling::RollingFileAppender> {
    let path = Path::new(path_str);

    let parent = match path.parent() {
        Some(it) if it.as_os_str().is_empty() => Path::new("."),
        Some(it) => it,
        None => miette::bail!(
            "Can't access the folder of log file {}. It might not exist.",
            path.display()
        ),
    };

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!("Log file path {} has no file name.", path.display())
    })?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}
