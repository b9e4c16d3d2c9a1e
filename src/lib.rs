//! # format-to-as
//!
//! Rewrites Rails controller and integration test requests from the Rails 4
//! `format:` option to the Rails 5 `as:` keyword.
//!
//! ```text
//! get :images_path, format: :json, params: {limit: 10, sort: 'new'}
//! get :images_path, params: {limit: 10, sort: 'new', format: :json}
//! ```
//!
//! both become
//!
//! ```text
//! get :images_path, as: :json, params: { limit: 10, sort: 'new' }
//! ```
//!
//! Only allow-listed calls with an `action, options` argument shape are
//! touched; all other text is kept byte for byte.
//!
//! ## Quick Start
//!
//! ```rust
//! use format_to_as::{rewrite_source, RewriteConfig};
//!
//! let source = "post :image_path, params: { id: 1, format: :x }\n";
//! let result = rewrite_source(source, &RewriteConfig::default()).unwrap();
//! assert_eq!(result.output, "post :image_path, as: :x, params: { id: 1 }\n");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod parser;
pub mod rewrite;
pub mod syntax;
pub mod write;

// Re-exports for convenience
pub use config::RewriteConfig;
pub use error::{Result, RewriteError};
pub use rewrite::{rewrite_source, Rewritten};
pub use write::{rewrite_file, SourceRewriter, WriteMode};
