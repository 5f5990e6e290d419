use super::Host;
use super::config::Config;
use crate::Result;
use crate::scoring::Registry;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file (default is `appraise.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,
}

/// Load a configuration and check that a scoring registry can be built from it.
fn validate_config_inner(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Registry> {
    let config = Config::load(base_dir, config_path)?;
    Registry::builtin(&config.weights)
}

pub fn validate_config<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    let config_path = args.config.as_ref();

    match validate_config_inner(Utf8Path::new("."), config_path) {
        Ok(registry) => {
            let _ = writeln!(host.output(), "Configuration file is valid ({} metrics weighted)", registry.len());
            if let Some(path) = config_path {
                let _ = writeln!(host.output(), "Config file: {path}");
            } else {
                let _ = writeln!(host.output(), "Using default configuration (no config file given)");
            }
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "Configuration validation failed: {e:#}");
            host.exit(1);
            Err(e)
        }
    }
}
