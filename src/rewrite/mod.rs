//! The `format:` → `as:` rewrite.
//!
//! Per call: [`extractor`] validates and flattens the options hash,
//! [`normalizer`] promotes `format` to `as`, [`builder`] rebuilds the call
//! with sorted keys, and [`driver`] prints it back into the buffer.

pub mod builder;
pub mod driver;
pub mod extractor;
pub mod mapping;
pub mod normalizer;

pub use driver::{CallFailure, DriverReport, RewriteDriver, RewriteStats};
pub use extractor::{extract, Extraction, SkipReason, ValidationError};
pub use mapping::{ArgValue, ArgumentMap, Entry, Key};

use serde::Serialize;
use tracing::debug;

use crate::config::RewriteConfig;
use crate::error::Result;
use crate::parser::parse;
use crate::write::SourceRewriter;

/// Output of [`rewrite_source`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewritten {
    #[serde(skip)]
    pub output: String,
    pub stats: RewriteStats,
    pub failures: Vec<CallFailure>,
}

impl Rewritten {
    pub fn changed(&self, original: &str) -> bool {
        self.output != original
    }
}

/// Rewrite every matching call in `source`.
///
/// Text outside rewritten calls is kept byte for byte. Calls that fail
/// validation are reported in [`Rewritten::failures`] and left as written;
/// only a source that does not parse is an error.
pub fn rewrite_source(source: &str, config: &RewriteConfig) -> Result<Rewritten> {
    let root = parse(source)?;
    let mut rewriter = SourceRewriter::new(source);
    let report = RewriteDriver::new(&config.rule).run(&root, &mut rewriter);

    debug!(
        rewritten = report.stats.rewritten,
        skipped = report.stats.skipped,
        failed = report.stats.failed,
        "rewrite finished"
    );

    Ok(Rewritten {
        output: rewriter.apply(),
        stats: report.stats,
        failures: report.failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewriteError;

    #[test]
    fn test_rewrite_source() {
        let config = RewriteConfig::default();
        let result = rewrite_source("get :images_path, format: :x\n", &config).unwrap();

        assert_eq!(result.output, "get :images_path, as: :x\n");
        assert!(result.changed("get :images_path, format: :x\n"));
        assert_eq!(result.stats.rewritten, 1);
    }

    #[test]
    fn test_syntax_error_is_refused() {
        let config = RewriteConfig::default();
        let err = rewrite_source("get(:index, format: :json\n", &config).unwrap_err();
        assert!(matches!(err, RewriteError::Syntax { .. }));
    }

    #[test]
    fn test_configured_methods() {
        let config = RewriteConfig::default().with_methods(["update"]);
        let result = rewrite_source("update :x, format: :js\nget :y, format: :js\n", &config).unwrap();
        assert_eq!(result.output, "update :x, as: :js\nget :y, format: :js\n");
    }
}
