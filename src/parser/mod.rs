//! Ruby parsing: tree-sitter front end lowered into the crate's node model.

mod convert;
mod helpers;

use tree_sitter::Parser;

use crate::error::{Result, RewriteError};
use crate::syntax::Node;
use convert::Converter;
use helpers::first_error;

/// Parse Ruby source into a [`Node`] tree.
///
/// Input with syntax errors is refused: rewriting code tree-sitter had to
/// recover from risks splicing text into the wrong place.
pub fn parse(source: &str) -> Result<Node> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_ruby::LANGUAGE.into())
        .map_err(|e| RewriteError::ParserInit(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or(RewriteError::ParseFailed)?;

    let root = tree.root_node();
    if let Some((line, column)) = first_error(&root) {
        return Err(RewriteError::Syntax { line, column });
    }

    Ok(Converter::new(source).convert(root))
}
