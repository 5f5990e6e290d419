use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path (default is `appraise.toml` in the current directory)
    #[arg(value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME));

    if let Err(e) = Config::save_default(&output) {
        let _ = writeln!(host.error(), "{e:#}");
        host.exit(1);
        return Err(e);
    }

    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_init_writes_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("custom.toml")).unwrap();

        let mut host = TestHost::default();
        init_config(&mut host, &InitArgs { output: Some(path.clone()) }).unwrap();

        assert!(host.output_text().contains("custom.toml"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), crate::commands::config::DEFAULT_CONFIG_TOML);
    }

    #[test]
    fn test_init_reports_unwritable_path() {
        let mut host = TestHost::default();
        let args = InitArgs {
            output: Some(Utf8PathBuf::from("/definitely/not/here/appraise.toml")),
        };

        let _ = init_config(&mut host, &args).unwrap_err();
        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_text().contains("/definitely/not/here/appraise.toml"));
    }
}
