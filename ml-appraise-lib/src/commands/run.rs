//! Command dispatch logic for ml-appraise

use super::{InitArgs, ScoreArgs, ValidateArgs, init_config, score_entries, validate_config};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "ml-appraise", version, author, long_about = None)]
#[command(about = "Appraise the trustworthiness of machine-learning models, datasets and code")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score the models referenced by a URL, a URL list file, or a JSON array file
    Score(Box<ScoreArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Parse command-line arguments and run the selected subcommand
///
/// `args` includes the program name, as produced by `std::env::args()`.
///
/// # Errors
///
/// Returns an error if the executed command fails. The failure has already been reported to the
/// host's error stream and the host has been asked to exit with status 1.
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        Command::Score(score_args) => score_entries(host, score_args).await,
        Command::Init(init_args) => init_config(host, init_args),
        Command::Validate(validate_args) => validate_config(host, validate_args),
    }
}
