//! schooldesk: admin CLI for the local document store.
//!
//! `schooldesk [--root DIR] [--json] [-v] COMMAND` runs one command against
//! the store at `DIR` (or `$SCHOOLDESK_ROOT`, default `lib/Games`) and exits.

mod commands;
mod format;
mod parse;
mod state;
mod value;

use std::process;

use schooldesk_engine::Store;
use tracing_subscriber::EnvFilter;

use commands::{build_cli, DEFAULT_ROOT};
use format::{format_error, format_output, OutputMode};
use parse::matches_to_action;
use state::SessionState;

fn main() {
    let matches = build_cli().get_matches();

    init_tracing(matches.get_count("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let action = match matches_to_action(&matches) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(2);
        }
    };

    let root = matches
        .get_one::<String>("root")
        .map(String::as_str)
        .unwrap_or(DEFAULT_ROOT);
    let store = match Store::open(root) {
        Ok(store) => store,
        Err(e) => {
            eprintln!(
                "{}",
                format_error(&format!("Failed to open store: {}", e), output_mode)
            );
            process::exit(1);
        }
    };

    let state = SessionState::new(store);
    match state.execute(action) {
        Ok(output) => {
            let formatted = format_output(&output, output_mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
            process::exit(output.exit_code());
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, output_mode));
            process::exit(if e.is_caller_error() { 2 } else { 1 });
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("schooldesk={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
