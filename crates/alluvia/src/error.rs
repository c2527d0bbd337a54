//! Error types for Alluvia operations.
//!
//! [`AlluviaError`] is the error returned by the public API. Problems with
//! the chart description itself are reported as [`ValidationError`]s, which
//! are detected before any layout work starts.

use std::io;

use thiserror::Error;

use alluvia_core::identifier::Id;

/// The main error type for Alluvia operations.
#[derive(Debug, Error)]
pub enum AlluviaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse chart data: {0}")]
    Parse(String),

    #[error("Invalid chart data: {0}")]
    Validation(#[from] ValidationError),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Reference error: {0}")]
    Reference(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for AlluviaError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

/// A chart description that cannot be laid out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("no categories declared")]
    NoCategories,

    #[error("category `{0}` is declared more than once")]
    DuplicateCategory(Id),

    #[error("category `{0}` has no node definitions")]
    MissingNodeDefinitions(Id),

    #[error("node definitions given for category `{0}`, which is not in the category list")]
    UndeclaredCategory(Id),

    #[error("category `{0}` declares no nodes")]
    NoNodes(Id),

    #[error("no lines to lay out")]
    NoLines,

    #[error("line `{line}` has no node for category `{category}`")]
    MissingPlacement { line: Id, category: Id },

    #[error("line `{line}` references unknown node `{node}` in category `{category}`")]
    UnknownNode { line: Id, category: Id, node: Id },

    #[error(
        "line `{line}` references unknown subnode `{subnode}` of node `{node}` in category `{category}`"
    )]
    UnknownSubnode {
        line: Id,
        category: Id,
        node: Id,
        subnode: Id,
    },

    #[error(
        "line `{line}` tags subnode `{subnode}` but node `{node}` in category `{category}` declares no subnodes"
    )]
    UnexpectedSubnode {
        line: Id,
        category: Id,
        node: Id,
        subnode: Id,
    },

    #[error("anchor category `{0}` is not declared")]
    UnknownAnchor(Id),

    #[error(
        "nodes of category `{category}` need {overhead} of the vertical space for minimum heights and gaps, leaving nothing for lines"
    )]
    VerticalBudgetExceeded { category: Id, overhead: f32 },

    #[error(
        "node `{node}` in category `{category}` carries {lines} lines needing {needed} of height, but is only {height} high"
    )]
    LinesOverflowNode {
        category: Id,
        node: Id,
        lines: usize,
        needed: f32,
        height: f32,
    },
}
