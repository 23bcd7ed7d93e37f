//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::catalog::FieldType;

/// Domain errors represent structural violations of condition trees.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed condition node: {node}")]
    MalformedNode { node: String },

    #[error("rule for field '{field}' has no value control")]
    MissingValue { field: String },

    #[error("field type '{field_type}' is not supported (field '{field}', choice '{choice}')")]
    UnsupportedFieldType {
        field: String,
        choice: String,
        field_type: FieldType,
    },

    #[error("field catalog is empty, cannot build a rule")]
    EmptyCatalog,

    #[error("live tree has no root node")]
    EmptyTree,

    #[error("node not found in live tree")]
    NodeNotFound,

    #[error("node is not a conditional")]
    NotAConditional,

    #[error("node is not a rule")]
    NotARule,

    #[error("the root conditional cannot be removed")]
    RootRemoval,

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("unknown operator '{operator}' for field '{field}'")]
    UnknownOperator { field: String, operator: String },

    #[error("choice for field '{field}' cannot be cleared")]
    ClearedChoice { field: String },

    #[error("rule for field '{field}' has no value source selector")]
    NoValueSource { field: String },

    #[error("invalid node path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
