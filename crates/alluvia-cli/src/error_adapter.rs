//! Error adapter for converting AlluviaError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use alluvia::{AlluviaError, ValidationError};

/// Adapter giving an [`AlluviaError`] a diagnostic code and, where one
/// exists, a hint on how to fix the input.
pub struct ErrorAdapter<'a>(pub &'a AlluviaError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            AlluviaError::Io(_) => "alluvia::io",
            AlluviaError::Config(_) => "alluvia::config",
            AlluviaError::Parse(_) => "alluvia::parse",
            AlluviaError::Validation(_) => "alluvia::validation",
            AlluviaError::Layout(_) => "alluvia::layout",
            AlluviaError::Reference(_) => "alluvia::reference",
            AlluviaError::Export(_) => "alluvia::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            AlluviaError::Validation(err) => validation_help(err)?,
            AlluviaError::Parse(_) => {
                "expected an object with `categories`, `nodes` and `lines` keys"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

fn validation_help(err: &ValidationError) -> Option<&'static str> {
    match err {
        ValidationError::MissingNodeDefinitions(_) | ValidationError::NoNodes(_) => {
            Some("declare at least one node for the category under `nodes`")
        }
        ValidationError::UndeclaredCategory(_) => {
            Some("add the category to `categories` or remove its node definitions")
        }
        ValidationError::MissingPlacement { .. } => {
            Some("every line needs a node in every category")
        }
        ValidationError::UnknownNode { .. } | ValidationError::UnknownSubnode { .. } => {
            Some("labels are case-sensitive and must be declared under `nodes`")
        }
        ValidationError::UnexpectedSubnode { .. } => {
            Some("declare the node's `subnodes` or drop the subnode tag from the line")
        }
        ValidationError::UnknownAnchor(_) => Some("the anchor must be one of `categories`"),
        ValidationError::VerticalBudgetExceeded { .. } => {
            Some("lower `node_min_height` or `node_gap` in the layout configuration")
        }
        ValidationError::LinesOverflowNode { .. } => {
            Some("spread the lines over more nodes or lower `node_gap` and `node_min_height`")
        }
        ValidationError::NoCategories
        | ValidationError::DuplicateCategory(_)
        | ValidationError::NoLines => None,
    }
}

/// Convert an [`AlluviaError`] into a list of reportable errors.
pub fn to_reportables(err: &AlluviaError) -> Vec<ErrorAdapter<'_>> {
    vec![ErrorAdapter(err)]
}
