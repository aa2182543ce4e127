//! Error type shared by every layer of the core library.

use std::path::PathBuf;

/// Failures surfaced by configuration, URL derivation and the credential helper.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Inputs are missing, contradictory or name an unknown provider.
    #[error("{0}")]
    Configuration(String),

    /// A clone URL cannot be expressed in the requested transport.
    #[error("cannot convert custom provider clone url {url} into {target} form")]
    UrlConversion { url: String, target: &'static str },

    #[error("could not parse url {url}: {source}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Malformed credential-helper traffic.
    #[error("credential protocol error: {0}")]
    Protocol(String),

    /// Reading or editing a Git config file failed, including syntax errors.
    #[error("git config: {0}")]
    Git(#[from] git2::Error),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("interrupted before {0} could be written")]
    Cancelled(PathBuf),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
