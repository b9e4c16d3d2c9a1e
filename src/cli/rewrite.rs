//! Rewrite commands: stdin filter and file batches.
//!
//! Rewritten source always goes to stdout in print mode; `--json` only
//! changes the summary, which moves to stderr when stdout carries source.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io::{Read, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use super::{EXIT_CHANGES, EXIT_ERROR};
use crate::config::RewriteConfig;
use crate::rewrite::rewrite_source;
use crate::write::{batch_rewrite_files, BatchWriteResult, WriteError, WriteMode, WriteResult};

/// Text a command produces, and its exit status.
#[derive(Debug, Default)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
    pub status: u8,
}

impl Output {
    fn emit(self) -> Result<ExitCode> {
        std::io::stdout().write_all(self.stdout.as_bytes())?;
        std::io::stderr().write_all(self.stderr.as_bytes())?;
        Ok(ExitCode::from(self.status))
    }
}

/// Rewrite stdin to stdout.
pub fn stdin(config: &RewriteConfig, check: bool, json: bool) -> Result<ExitCode> {
    let mut source = String::new();
    std::io::stdin()
        .read_to_string(&mut source)
        .context("reading stdin")?;

    render_stdin(&source, config, check, json)?.emit()
}

pub fn render_stdin(
    source: &str,
    config: &RewriteConfig,
    check: bool,
    json: bool,
) -> Result<Output> {
    let rewritten = rewrite_source(source, config)?;
    let mut out = Output::default();

    if !check {
        out.stdout.push_str(&rewritten.output);
    }
    if json {
        let summary = serde_json::to_string_pretty(&rewritten)?;
        let stream = if check { &mut out.stdout } else { &mut out.stderr };
        writeln!(stream, "{}", summary)?;
    }
    if check && rewritten.changed(source) {
        out.status = EXIT_CHANGES;
    }
    Ok(out)
}

/// Rewrite the given files in parallel.
///
/// Without `--write` or `--check` the rewritten text goes to stdout, with a
/// `==> path <==` header per file when there is more than one.
pub fn files(
    paths: &[PathBuf],
    config: &RewriteConfig,
    mode: WriteMode,
    check: bool,
    json: bool,
) -> Result<ExitCode> {
    let results = batch_rewrite_files(paths, config, mode);
    render_files(paths, results, mode, check, json)?.emit()
}

pub fn render_files(
    paths: &[PathBuf],
    results: Vec<std::result::Result<WriteResult, WriteError>>,
    mode: WriteMode,
    check: bool,
    json: bool,
) -> Result<Output> {
    let prints_source = !check && mode == WriteMode::DryRun;
    let mut out = Output::default();

    let mut had_error = false;
    for (path, result) in paths.iter().zip(&results) {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                had_error = true;
                writeln!(out.stderr, "error: {}: {}", path.display(), e)?;
                continue;
            }
        };

        if prints_source {
            if paths.len() > 1 {
                writeln!(out.stdout, "==> {} <==", result.path)?;
            }
            out.stdout.push_str(&result.output);
        }
        if json {
            continue;
        }
        for failure in &result.failures {
            writeln!(
                out.stderr,
                "{}:{}:{}: left unchanged: {}",
                result.path, failure.line, failure.column, failure.message
            )?;
        }
        if check && result.changed {
            writeln!(out.stdout, "would rewrite {}", result.path)?;
        } else if mode == WriteMode::InPlace && result.changed {
            writeln!(out.stdout, "rewrote {} ({} calls)", result.path, result.rewritten)?;
        }
    }

    let summary = BatchWriteResult::from_results(results);
    if json {
        let stream = if prints_source { &mut out.stderr } else { &mut out.stdout };
        writeln!(stream, "{}", summary.to_json())?;
    }

    out.status = if had_error {
        EXIT_ERROR
    } else if check && summary.changed > 0 {
        EXIT_CHANGES
    } else {
        0
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::rewrite_file;
    use tempfile::tempdir;

    const SOURCE: &str = "get :index, format: :json\n";

    #[test]
    fn test_stdin_json_keeps_source_on_stdout() {
        let out = render_stdin(SOURCE, &RewriteConfig::default(), false, true).unwrap();

        assert_eq!(out.stdout, "get :index, as: :json\n");
        assert!(out.stderr.contains("\"rewritten\": 1"), "summary on stderr: {}", out.stderr);
        assert_eq!(out.status, 0);
    }

    #[test]
    fn test_stdin_check() {
        let out = render_stdin(SOURCE, &RewriteConfig::default(), true, false).unwrap();
        assert!(out.stdout.is_empty());
        assert_eq!(out.status, EXIT_CHANGES);

        let out = render_stdin("get :index, as: :json\n", &RewriteConfig::default(), true, true)
            .unwrap();
        assert!(out.stdout.contains("\"rewritten\": 0"));
        assert_eq!(out.status, 0);
    }

    #[test]
    fn test_files_json_keeps_source_on_stdout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a_test.rb");
        std::fs::write(&path, SOURCE).unwrap();

        let results = vec![rewrite_file(&path, &RewriteConfig::default(), WriteMode::DryRun)];
        let out = render_files(&[path], results, WriteMode::DryRun, false, true).unwrap();

        assert_eq!(out.stdout, "get :index, as: :json\n");
        assert!(out.stderr.contains("\"total_files\": 1"));
    }

    #[test]
    fn test_files_check_reports_and_errors() {
        let dir = tempdir().unwrap();
        let changed = dir.path().join("a_test.rb");
        let missing = dir.path().join("missing.rb");
        std::fs::write(&changed, SOURCE).unwrap();

        let paths = vec![changed.clone(), missing];
        let results = paths
            .iter()
            .map(|p| rewrite_file(p, &RewriteConfig::default(), WriteMode::DryRun))
            .collect();
        let out = render_files(&paths, results, WriteMode::DryRun, true, false).unwrap();

        assert!(out.stdout.contains(&format!("would rewrite {}", changed.display())));
        assert!(out.stderr.contains("missing.rb"));
        assert_eq!(out.status, EXIT_ERROR);
    }
}
