use crate::core::validate::ValidationErrors;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VbriefError {
    #[error("invalid index: index={index} len={len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("key not found: key={0:?}")]
    KeyNotFound(String),
    #[error("document does not contain a todoList")]
    NoTodoList,
    #[error("document does not contain a plan")]
    NoPlan,
    #[error("document is nil")]
    NilDocument,
    #[error("no matching items found")]
    NoMatchingItems,
    #[error("extensions not supported: {0:?}")]
    ExtensionsNotSupported(Vec<String>),
    #[error("unknown format: {0:?}")]
    UnknownFormat(String),
    #[error("document too large: max={max}")]
    DocumentTooLarge { max: usize },
    #[error("{0}")]
    ValidationFailed(ValidationErrors),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TRON syntax error at {line}:{column}: {message}")]
    Tron {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

impl VbriefError {
    /// True for misuse of the mutation API (bad index, missing key or
    /// sub-structure, unbound updater, empty match) as opposed to data-quality
    /// or decoding failures.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            VbriefError::InvalidIndex { .. }
                | VbriefError::KeyNotFound(_)
                | VbriefError::NoTodoList
                | VbriefError::NoPlan
                | VbriefError::NilDocument
                | VbriefError::NoMatchingItems
        )
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            VbriefError::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}
