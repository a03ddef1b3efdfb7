use std::fmt::{self, Display};

/// Errors produced by model parsers and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownMediaKind(String),
    UnknownList(String),
    UnknownTimeWindow(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownMediaKind(raw) => {
                write!(f, "unknown media kind: {raw}")
            }
            ModelError::UnknownList(raw) => write!(f, "unknown list: {raw}"),
            ModelError::UnknownTimeWindow(raw) => {
                write!(f, "unknown time window: {raw} (expected day or week)")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
