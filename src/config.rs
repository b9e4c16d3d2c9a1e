//
//  config.rs
//  format-to-as
//
//  Created by hak (tharun)
//

//! Rewriter configuration, read from `.format-to-as.toml`.
//!
//! ```toml
//! [rule]
//! methods = ["get", "post", "put", "patch", "delete", "head"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, RewriteError};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = ".format-to-as.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewriteConfig {
    #[serde(default)]
    pub rule: RuleConfig,
}

/// Which calls the rewrite applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Method names whose calls are normalized.
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
}

fn default_methods() -> Vec<String> {
    ["get", "post", "put", "patch", "delete", "head"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            methods: default_methods(),
        }
    }
}

impl RuleConfig {
    pub fn allows(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m == method)
    }
}

impl RewriteConfig {
    /// Load config from a TOML file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&contents).map_err(|e| RewriteError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Replace the method allow-list.
    pub fn with_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule.methods = methods.into_iter().map(Into::into).collect();
        self
    }
}
