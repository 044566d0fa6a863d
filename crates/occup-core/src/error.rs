//! Error types for occup.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Format error in {origin}{}: {message}", line_suffix(.line))]
    Format {
        origin: String,
        line: Option<usize>,
        message: String,
    },

    #[error("Cannot read `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unterminated `[` in `{0}`")]
    UnterminatedBracket(String),

    #[error("Invalid template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Duplicate phrase `{phrase}`: already tagged {existing}, cannot retag as {requested}")]
    DuplicatePhrase {
        phrase: String,
        existing: u32,
        requested: u32,
    },

    #[error("Empty phrase")]
    EmptyPhrase,

    #[error("Named entities do not match tokens: {0}")]
    EntityMismatch(String),

    #[error("{origin} line {line}: {source}")]
    Located {
        origin: String,
        line: usize,
        source: Box<Error>,
    },

    #[error("Tagger error: {0}")]
    Tagger(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of failures, used by callers to decide what to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or missing input files, entity/token misalignment.
    InputFormat,
    /// Conflicting or invalid dictionary/template definitions.
    DefinitionConflict,
    /// A resolved fact broke an invariant the compiler should have enforced.
    Internal,
    /// I/O, external process or configuration failures.
    Environment,
}

impl Error {
    /// Create a format error for an input identified by `origin`.
    pub fn format(origin: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
        Error::Format {
            origin: origin.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid-template error.
    pub fn invalid_template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidTemplate {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal-consistency error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Attach a file and line number to an error raised while loading that line.
    pub fn at(self, origin: impl Into<String>, line: usize) -> Self {
        Error::Located {
            origin: origin.into(),
            line,
            source: Box::new(self),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Format { .. }
            | Error::Read { .. }
            | Error::UnterminatedBracket(_)
            | Error::EntityMismatch(_) => ErrorCategory::InputFormat,
            Error::InvalidTemplate { .. } | Error::DuplicatePhrase { .. } | Error::EmptyPhrase => {
                ErrorCategory::DefinitionConflict
            }
            Error::Located { source, .. } => source.category(),
            Error::Internal(_) => ErrorCategory::Internal,
            Error::Tagger(_) | Error::Config(_) | Error::Io(_) | Error::Json(_) => {
                ErrorCategory::Environment
            }
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" line {}", l)).unwrap_or_default()
}
