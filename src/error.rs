//! Error types for the font size tool
//!
//! None of these ever reach the host editor: the API layer logs them and
//! treats the interaction as a no-op.

use thiserror::Error;

/// Failures raised by a document backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// A call into the browser DOM threw
    #[error("DOM call failed: {0}")]
    Js(String),

    /// The node is no longer attached where the operation needs it
    #[error("node is detached from the document")]
    Detached,

    /// An element-only operation was given another kind of node
    #[error("node is not an element")]
    NotAnElement,

    /// A range boundary points outside its container
    #[error("range boundary out of bounds: offset {offset} > length {len}")]
    InvalidBoundary { offset: usize, len: usize },

    /// Markup could not be read into a document
    #[error("invalid markup: {0}")]
    Markup(String),
}

/// Top-level tool error
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error(transparent)]
    Dom(#[from] DomError),

    /// Host configuration could not be read at all
    #[error("invalid tool config: {0}")]
    Config(String),
}

pub type DomResult<T> = Result<T, DomError>;
