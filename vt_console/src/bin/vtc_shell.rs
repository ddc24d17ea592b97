// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Small shell on top of [`Console`]. Try it in a real terminal:
//!
//! ```text
//! cargo run --bin vtc_shell -- --log-file /tmp/vtc_shell.log --log-level debug
//! ```
//!
//! Commands: `cursor` (query the cursor position from a second thread), `home`,
//! `history`, `exit`. Anything else is echoed back. Ctrl-C or Ctrl-D quits.

use clap::Parser;
use r3bl_vt_console::{CommonResult, Console, ConsoleError, CursorPosition, RawModeGuard,
                      ReadlineEvent, TracingConfig, ok};
use std::{io::Write, sync::Arc};
use tracing_core::LevelFilter;

#[derive(Debug, Parser)]
#[command(bin_name = "vtc_shell")]
#[command(about = "Line editor over a raw VT102 terminal, with cursor position queries")]
#[command(version)]
#[command(next_line_help = true)]
pub struct CLIArg {
    #[arg(long, short = 'p', default_value = "vtc> ", help = "Prompt to display")]
    pub prompt: String,

    #[arg(
        long,
        short = 'l',
        help = "Log to this file. The terminal is in raw mode, so logs never go to stdout"
    )]
    pub log_file: Option<String>,

    #[arg(
        long,
        default_value = "info",
        help = "One of: off, error, warn, info, debug, trace"
    )]
    pub log_level: LevelFilter,

    #[arg(long, help = "Leave the terminal in cooked mode, e.g. when input is piped")]
    pub no_raw_mode: bool,
}

fn main() -> CommonResult<()> {
    let cli_arg = CLIArg::parse();

    if let Some(log_file) = cli_arg.log_file.clone() {
        r3bl_vt_console::init_tracing(
            TracingConfig::new_file(Some(log_file)).with_level_filter(cli_arg.log_level),
        )?;
    }
    // % is Display, ? is Debug.
    tracing::info!(message = "Start vtc_shell", cli_arg = ?cli_arg);

    let _raw_mode = if cli_arg.no_raw_mode {
        None
    } else {
        Some(RawModeGuard::try_new()?)
    };

    let console = Arc::new(Console::new_stdio());
    console.set_prompt(cli_arg.prompt);
    run_repl(&console)?;

    tracing::info!(message = "Stop vtc_shell");
    ok!()
}

fn run_repl(console: &Arc<Console>) -> Result<(), ConsoleError> {
    loop {
        let line = match console.read_line() {
            Ok(ReadlineEvent::Line(line)) => line,
            Ok(ReadlineEvent::Interrupted(control_break)) => {
                print_line(console, &format!("interrupted by {control_break}"))?;
                return ok!();
            }
            Err(error) if error.is_end_of_stream() => return ok!(),
            Err(error) => return Err(error),
        };

        match line.trim() {
            "" => {}
            "exit" => return ok!(),
            "cursor" => {
                // Queries work from any thread, even while another one is reading.
                let console_clone = Arc::clone(console);
                let position = std::thread::spawn(move || console_clone.cursor_position())
                    .join()
                    .map_err(|_| {
                        let msg = "query thread panicked";
                        ConsoleError::Stream(std::io::Error::other(msg))
                    })??;
                let CursorPosition { row, col } = position;
                print_line(console, &format!("row {row}, col {col}"))?;
            }
            "home" => console.set_cursor_position(1, 1)?,
            "history" => {
                for (index, entry) in console.history().iter().enumerate() {
                    print_line(console, &format!("{index:>4}  {entry}"))?;
                }
            }
            other => print_line(console, other)?,
        }
    }
}

/// Raw mode turns off output post processing, so lines end with an explicit CR LF.
fn print_line(console: &Console, text: &str) -> Result<(), ConsoleError> {
    let mut term = console.output_device().lock();
    write!(term, "{text}\r\n")?;
    term.flush()?;
    ok!()
}
