//! Whole-tree traversal: extract, normalize, rebuild and print every matching
//! call, registering the printed text with a [`SourceRewriter`].

use serde::Serialize;
use tracing::{trace, warn};

use super::builder::rebuild_call;
use super::extractor::{extract, Extraction, SkipReason};
use crate::config::RuleConfig;
use crate::syntax::{print_call_head, Call, Node, Span};
use crate::write::{Replacement, SourceRewriter};

/// Per-call counters for one source unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Calls whose text changed.
    pub rewritten: usize,
    /// Allow-listed calls left alone because of their shape.
    pub skipped: usize,
    /// Calls that failed validation and were left unmodified.
    pub failed: usize,
}

/// A call the driver could not rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallFailure {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriverReport {
    pub stats: RewriteStats,
    pub failures: Vec<CallFailure>,
}

impl DriverReport {
    fn fail(&mut self, span: Span, message: String) {
        self.stats.failed += 1;
        self.failures.push(CallFailure {
            line: span.line,
            column: span.column,
            message,
        });
    }
}

pub struct RewriteDriver<'c> {
    rule: &'c RuleConfig,
}

impl<'c> RewriteDriver<'c> {
    pub fn new(rule: &'c RuleConfig) -> Self {
        Self { rule }
    }

    /// Visit `root` in source order and register a replacement for every
    /// call that rewrites to different text.
    pub fn run(&self, root: &Node, rewriter: &mut SourceRewriter<'_>) -> DriverReport {
        let mut report = DriverReport::default();
        self.visit(root, rewriter, &mut report);
        report
    }

    fn visit(&self, node: &Node, rewriter: &mut SourceRewriter<'_>, report: &mut DriverReport) {
        if let Node::Call(call) = node {
            self.process(call, rewriter, report);
        }
        for child in node.children() {
            self.visit(child, rewriter, report);
        }
    }

    fn process(&self, call: &Call, rewriter: &mut SourceRewriter<'_>, report: &mut DriverReport) {
        let span = call.span;
        let map = match extract(call, self.rule) {
            Ok(Extraction::Mapping(map)) => map,
            Ok(Extraction::NotApplicable(reason)) => {
                trace!(%span, method = %call.method, %reason, "skipping call");
                if reason != SkipReason::MethodNotAllowed {
                    report.stats.skipped += 1;
                }
                return;
            }
            Err(err) => {
                warn!(line = span.line, column = span.column, "{}: {}", call.method, err);
                report.fail(span, err.to_string());
                return;
            }
        };

        let rebuilt = rebuild_call(call, &map, &mut |node: &Node| self.rewrite_tree(node));
        let text = print_call_head(&rebuilt);
        if rewriter.source_text(span.range()) == Some(text.as_str()) {
            trace!(%span, "call already in canonical form");
            return;
        }

        match rewriter.replace(span.range(), text) {
            Ok(Replacement::Registered) => report.stats.rewritten += 1,
            Ok(Replacement::Absorbed) => {
                trace!(%span, "rewrite already covered by an enclosing call");
                report.stats.rewritten += 1;
            }
            Err(err) => {
                warn!(line = span.line, column = span.column, "{}: {}", call.method, err);
                report.fail(span, err.to_string());
            }
        }
    }

    /// Rewrite every matching call inside `node`, returning the new tree.
    ///
    /// Used for sub-trees that end up inside an enclosing call's replacement
    /// text. Failures are left as written; [`run`](Self::run) reports them
    /// when it reaches the same call.
    pub fn rewrite_tree(&self, node: &Node) -> Node {
        if let Node::Call(call) = node {
            if let Ok(Extraction::Mapping(map)) = extract(call, self.rule) {
                let rebuilt = rebuild_call(call, &map, &mut |child: &Node| self.rewrite_tree(child));
                return Node::Call(rebuilt);
            }
        }
        node.map_children(&mut |child: &Node| self.rewrite_tree(child))
    }
}
