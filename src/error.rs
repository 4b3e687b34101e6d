/// Every way a problem operation can fail.
///
/// `Transport` and `Status` are the transport failures; callers are not
/// expected to treat 4xx and 5xx differently. The error is `Clone` because a
/// single failed fetch is handed to every reader waiting on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{operation}: {message}")]
    Transport {
        operation: Operation,
        message: String,
    },

    #[error("{operation}: server responded with HTTP {status}")]
    Status { operation: Operation, status: u16 },

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{0}")]
    NotReady(&'static str),
}

impl Error {
    pub fn transport(operation: Operation, source: impl fmt::Display) -> Self {
        Error::Transport {
            operation,
            message: source.to_string(),
        }
    }

    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::Status { .. })
    }
}

/// The backend call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
    Touch,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operation::List => "Failed to fetch problems",
            Operation::Create => "Failed to create problem",
            Operation::Update => "Failed to update problem",
            Operation::Delete => "Failed to delete problem",
            Operation::Touch => "Failed to update timestamp",
        };
        f.write_str(text)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use std::fmt;
use thiserror::Error;
