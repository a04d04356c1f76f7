//! Domain error type shared by the AWS and git helpers.
//!
//! Subcommands wrap these in `anyhow` at the edge; everything below `cmd/`
//! returns `Result<_, OpsError>` so callers can match on the kind.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpsError {
    /// External process finished unsuccessfully. The exit code is the only diagnostic.
    #[error("command exited with non-zero code {0}")]
    NonZeroExitCode(i32),

    /// Process was killed by a signal (no exit code available).
    #[error("`{program}` was terminated by a signal")]
    Terminated { program: String },

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` did not finish within {limit:?}")]
    Timeout { program: String, limit: Duration },

    /// Stdout was not valid JSON.
    #[error("unexpected output from `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode put-parameter input: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("response is missing `{0}`")]
    MissingField(String),

    #[error("{0}")]
    NoResourceFound(String),

    #[error("{0}")]
    NoParametersFound(String),

    #[error("{0}")]
    InvalidInput(String),
}

pub type OpsResult<T> = std::result::Result<T, OpsError>;
