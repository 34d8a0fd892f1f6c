//! Error taxonomy for the relay protocol.

use thiserror::Error;

/// Everything that can go wrong between this client and the relay.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("invalid invite code: {0}")]
    MalformedInvite(String),

    #[error("file needs a non-empty name")]
    UnnamedFile,

    #[error("could not reach the relay")]
    Network(#[source] reqwest::Error),

    #[error("relay rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("no active session for this invite code")]
    SessionNotFound,

    #[error("unexpected relay response: {0}")]
    Protocol(String),
}

/// Coarse classification of a failed transfer.
///
/// This is what the state machine stores and what callers branch on for
/// messaging; the full [`TransferError`] keeps the underlying cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInvite,
    UnnamedFile,
    Network,
    Rejected,
    SessionNotFound,
    Protocol,
}

impl TransferError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::MalformedInvite(_) => ErrorKind::MalformedInvite,
            TransferError::UnnamedFile => ErrorKind::UnnamedFile,
            TransferError::Network(_) => ErrorKind::Network,
            TransferError::Rejected { .. } => ErrorKind::Rejected,
            TransferError::SessionNotFound => ErrorKind::SessionNotFound,
            TransferError::Protocol(_) => ErrorKind::Protocol,
        }
    }
}
