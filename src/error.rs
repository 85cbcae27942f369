//! Error types for sparqlburger.

use thiserror::Error;

use crate::ast::PatternId;

/// The main error type for building query trees.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required clause field was never supplied.
    #[error("Missing argument: {clause} requires '{argument}'")]
    MissingArgument {
        clause: &'static str,
        argument: &'static str,
    },

    /// Attaching `child` under `parent` would make a pattern reachable from itself.
    #[error("Cyclic nesting: pattern {child} cannot be nested into {parent}")]
    CyclicNesting { parent: PatternId, child: PatternId },

    /// The pattern already belongs to another parent pattern.
    #[error("Pattern {child} is already nested in {parent}")]
    AlreadyNested { child: PatternId, parent: PatternId },

    /// The handle was not issued by this arena.
    #[error("Unknown pattern: {0}")]
    UnknownPattern(PatternId),

    /// A pattern was flagged both OPTIONAL and UNION.
    #[error("A graph pattern cannot be both OPTIONAL and UNION")]
    ConflictingModifiers,

    /// Failed to tokenize a recipe triple.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Invalid recipe or configuration content.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuilderError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a missing argument error.
    pub fn missing(clause: &'static str, argument: &'static str) -> Self {
        Self::MissingArgument { clause, argument }
    }
}

impl From<toml::de::Error> for BuilderError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for BuilderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for builder operations.
pub type BuildResult<T> = Result<T, BuilderError>;
