//! CLI module for format-to-as.
//!
//! Reads Ruby files (or stdin), rewrites `format:` request options to `as:`
//! and prints, checks, or writes the result.

pub mod rewrite;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{RewriteConfig, DEFAULT_CONFIG_FILE};
use crate::write::WriteMode;

/// Exit status when `--check` finds files that would change.
pub const EXIT_CHANGES: u8 = 1;
/// Exit status for I/O, parse and config errors.
pub const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "format-to-as")]
#[command(
    about = "Rewrite `format:` to `as:` in Rails controller test requests",
    long_about = None
)]
pub struct Cli {
    /// Ruby files to rewrite (`-` or none: read stdin)
    pub files: Vec<PathBuf>,

    /// Rewrite files in place
    #[arg(short, long, conflicts_with = "check")]
    pub write: bool,

    /// Exit with status 1 if any file would change; write nothing
    #[arg(long)]
    pub check: bool,

    /// Config file (default: .format-to-as.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comma-separated method names to rewrite, overriding the config
    #[arg(short, long, value_delimiter = ',')]
    pub methods: Option<Vec<String>>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,

    /// Log per-file details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn mode(&self) -> WriteMode {
        if self.write {
            WriteMode::InPlace
        } else {
            WriteMode::DryRun
        }
    }

    fn reads_stdin(&self) -> bool {
        self.files.is_empty() || self.files.iter().all(|path| path == Path::new("-"))
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

/// Resolve the effective config: explicit file, else the default file if
/// present, then `--methods` on top.
pub fn load_config(cli: &Cli) -> Result<RewriteConfig> {
    let config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            RewriteConfig::load(path)?
        }
        None => RewriteConfig::load(Path::new(DEFAULT_CONFIG_FILE))?,
    };

    Ok(match &cli.methods {
        Some(methods) => config.with_methods(methods.iter().map(|m| m.trim().to_string())),
        None => config,
    })
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli).context("loading config")?;

    if cli.reads_stdin() {
        if cli.write {
            bail!("--write needs file arguments");
        }
        return rewrite::stdin(&config, cli.check, cli.json);
    }

    rewrite::files(&cli.files, &config, cli.mode(), cli.check, cli.json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from([
            "format-to-as",
            "--check",
            "-m",
            "get,update",
            "a_test.rb",
            "b_test.rb",
        ]);

        assert!(cli.check);
        assert_eq!(cli.mode(), WriteMode::DryRun);
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.methods, Some(vec!["get".to_string(), "update".to_string()]));
        assert!(!cli.reads_stdin());
    }

    #[test]
    fn test_write_conflicts_with_check() {
        let result = Cli::try_parse_from(["format-to-as", "--write", "--check", "a.rb"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_stdin_detection() {
        assert!(Cli::parse_from(["format-to-as"]).reads_stdin());
        assert!(Cli::parse_from(["format-to-as", "-"]).reads_stdin());
    }

    #[test]
    fn test_methods_override_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(&path, "[rule]\nmethods = [\"get\"]\n").unwrap();

        let cli = Cli::parse_from([
            "format-to-as",
            "-c",
            path.to_str().unwrap(),
            "--methods",
            "post, update",
        ]);
        let config = load_config(&cli).unwrap();

        assert!(config.rule.allows("update"));
        assert!(config.rule.allows("post"));
        assert!(!config.rule.allows("get"));
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let cli = Cli::parse_from(["format-to-as", "-c", path.to_str().unwrap()]);
        assert!(load_config(&cli).is_err());
    }
}
