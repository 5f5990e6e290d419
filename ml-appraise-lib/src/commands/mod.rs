//! Command-line interface and orchestration for ml-appraise
//!
//! This module implements the CLI commands and wires the other modules together into the
//! end-to-end scoring pipeline. It handles argument parsing, environment validation,
//! configuration management, progress display and report output.
//!
//! # Commands
//!
//! - **score**: Validate the environment, classify the input into entries, collect facts for
//!   every entry, run the metrics and stream one NDJSON row per entry (or render a console
//!   report), optionally writing a CSV file as well
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file, including its metric weights
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the appropriate
//! command handler. Failures are printed to the host's error stream and end the process with
//! status 1.
//!
//! Configuration lives in a TOML file (`appraise.toml` by default) holding concurrency limits,
//! the metric timeout and retry policy, service URLs and the metric weights.

mod common;
mod config;
mod environment;
mod host;
mod init;
mod progress_reporter;
mod run;
mod score;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use score::{ScoreArgs, score_entries};
pub use validate::{ValidateArgs, validate_config};
