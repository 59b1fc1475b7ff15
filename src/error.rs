//! Error types for the analysis engine
//!
//! Referential-integrity failures are programming errors in the calling
//! visitor and are returned immediately. Parse failures are scoped to one
//! file and end up in the scan report instead.

use crate::model::EntityId;
use thiserror::Error;

/// Errors raised by the index, the dependency graph and the scan loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("an entity with key '{0}' is already indexed")]
    DuplicateKey(String),

    #[error("parent entity {parent} of '{key}' is not indexed")]
    UnknownParent { key: String, parent: EntityId },

    #[error("entity {0} is not indexed")]
    UnknownEntity(EntityId),

    #[error("cannot add {usage} edge {from} -> {to}: endpoint {missing} is not indexed")]
    UnindexedEndpoint {
        from: EntityId,
        to: EntityId,
        usage: crate::graph::EdgeUsage,
        missing: EntityId,
    },

    #[error("the project root cannot be removed")]
    RootRemoval,
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Failure reported by an [`AstParser`](crate::scanner::AstParser) for one file.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    /// Line where parsing stopped, when the parser knows it
    pub line: Option<u32>,
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(line: u32, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("IO error: {}", err))
    }
}
