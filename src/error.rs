use std::io;

use thiserror::Error;

pub type Result<T, E = JamError> = std::result::Result<T, E>;

/// Everything that can stop a run, from configuration through the last case.
#[derive(Debug, Error)]
pub enum JamError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("first input line must be the number of test cases, found {found:?}")]
    MalformedCaseCount { found: String },

    #[error(
        "input ended before line {line} - does the framing plan match the input layout?"
    )]
    PrematureEndOfInput { line: u64 },

    #[error("could not derive a line count from header {header:?}: {source}")]
    InvalidLineCount {
        header: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("runner has already been started once")]
    AlreadyStarted,

    #[error("transform failed on case #{case}: {source}")]
    Transform {
        case: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl JamError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        JamError::Configuration(message.into())
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        JamError::Io {
            context: context.into(),
            source,
        }
    }
}
