use thiserror::Error;

use crate::kind::{NameKind, ParticleKind};

/// Classification a particle was required to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Class {
    Term,
    Predicate,
    Name,
    Variable,
}

/// A call to a particle source violated the particle type algebra.
///
/// These are contract violations of the caller, not malformed external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    #[error("expected a name of kind {expected}, got {found}")]
    NameKind {
        expected: NameKind,
        found: NameKind,
    },

    #[error("{kind} argument {index} is not a {expected}")]
    ArgumentClass {
        kind: ParticleKind,
        index: usize,
        expected: Class,
    },

    #[error("{kind} construction requires {expected} parts, got {found}")]
    PartCount {
        kind: ParticleKind,
        expected: &'static str,
        found: usize,
    },

    #[error("{kind} construction part {index} must be a {expected}, got {found}")]
    PartShape {
        kind: ParticleKind,
        index: usize,
        expected: Class,
        found: ParticleKind,
    },

    #[error("{0} particles cannot be built from parts")]
    NotConstructible(ParticleKind),
}

/// Input text did not match the grammar, or the underlying stream failed.
///
/// Formats as `"<message> at <line>:<col> (pos=<byteOffset>)"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column} (pos={offset})")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// Failure of a reader entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The particle source refused a particle the reader assembled.
    #[error("{error} at {line}:{column} (pos={offset})")]
    Construction {
        #[source]
        error: InvalidArgument,
        line: usize,
        column: usize,
        offset: usize,
    },
}

impl ReadError {
    /// Returns the syntax error, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ReadError::Syntax(err) => Some(err),
            ReadError::Construction { .. } => None,
        }
    }

    /// `(line, column, offset)` at which the failure was detected.
    pub fn position(&self) -> (usize, usize, usize) {
        match self {
            ReadError::Syntax(err) => (err.line, err.column, err.offset),
            ReadError::Construction {
                line,
                column,
                offset,
                ..
            } => (*line, *column, *offset),
        }
    }
}

/// Failure of a writer.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A dialect writer refused to print a node.
    #[error("cannot write {kind} particle: {reason}")]
    Rejected { kind: ParticleKind, reason: String },
}

pub type ConstructResult<T> = Result<T, InvalidArgument>;
pub type ReadResult<T> = Result<T, ReadError>;
pub type WriteResult<T> = Result<T, WriteError>;
