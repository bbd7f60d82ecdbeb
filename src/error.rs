//! Error types for authsetup.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("convex backend at {url} is not reachable")]
    Unreachable { url: String },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("convex env set {key} failed (exit code {code})")]
    CommandFailed { key: String, code: i32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key generation errors.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("failed to generate signing key: {0}")]
    Generate(#[from] rsa::Error),

    #[error("failed to encode private key: {0}")]
    Encode(#[from] rsa::pkcs8::Error),

    #[error("failed to serialize JWKS: {0}")]
    Jwks(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CommandFailed { code, .. } => *code,
            _ => 1,
        }
    }

    /// Actionable suggestion printed after the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::Unreachable { .. } => {
                Some("start the local backend with `npx convex dev`, then rerun")
            }
            Error::Spawn { .. } => Some("install the convex CLI: npm install convex"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
