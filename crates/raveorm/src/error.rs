//! Error types for raveorm

use thiserror::Error;

/// Result type alias for statement construction.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type alias for operations that reach a driver.
pub type OrmResult<T> = Result<T, OrmError>;

/// Contract violations raised while building or rendering a statement.
///
/// These are programmer errors in call sequencing. They abort the statement
/// being built and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A required clause is missing at render time, or no statement kind is set.
    #[error("Incomplete {kind} statement")]
    IncompleteStatement { kind: String },

    /// The clause is already present.
    #[error("Cannot add {clause} statement: already present")]
    DuplicateClause { clause: String },

    /// The clause's prerequisites are missing, or it does not apply to the current kind.
    #[error("Cannot add {clause} statement: {reason}")]
    PrerequisiteMissing { clause: String, reason: String },

    /// A table argument does not resolve to a table name.
    #[error("Unsupported table in {clause}: {target}")]
    UnsupportedTarget { clause: String, target: String },

    /// Row or column data is neither a mapping nor an entity, or is empty.
    #[error("Bad data in {clause}: {reason}")]
    BadDataShape { clause: String, reason: String },

    /// A WHERE condition is not a well-formed tree.
    #[error("Bad where construction: {0}")]
    BadConditionShape(String),

    /// The statement was already rendered and can no longer change.
    #[error("Cannot add {clause} statement: statement already rendered")]
    Finalized { clause: String },
}

impl QueryError {
    pub(crate) fn incomplete(kind: impl Into<String>) -> Self {
        Self::IncompleteStatement { kind: kind.into() }
    }

    pub(crate) fn duplicate(clause: impl Into<String>) -> Self {
        Self::DuplicateClause {
            clause: clause.into(),
        }
    }

    pub(crate) fn prerequisite(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PrerequisiteMissing {
            clause: clause.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_target(clause: impl Into<String>, target: impl Into<String>) -> Self {
        Self::UnsupportedTarget {
            clause: clause.into(),
            target: target.into(),
        }
    }

    pub(crate) fn bad_data(clause: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadDataShape {
            clause: clause.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_condition(reason: impl Into<String>) -> Self {
        Self::BadConditionShape(reason.into())
    }
}

/// Error types for database operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// The statement could not be built.
    #[error("Incorrect query: {0}")]
    Query(#[from] QueryError),

    /// The driver failed to run the statement.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Entity or primary key setup error
    #[error("Entity error: {0}")]
    Entity(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create an entity error
    pub fn entity(message: impl Into<String>) -> Self {
        Self::Entity(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error was raised while building the statement
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// The builder error, if this is one.
    pub fn as_query_error(&self) -> Option<&QueryError> {
        match self {
            Self::Query(err) => Some(err),
            _ => None,
        }
    }
}
