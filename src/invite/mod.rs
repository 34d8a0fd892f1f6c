//! Invite code parsing and formatting.
//!
//! The relay keys a live session by the port its one-shot file server was
//! allocated, so the human-shareable invite code is that number rendered as
//! text. Parsing happens before any request goes out, which is where typos
//! get caught.

use std::fmt;
use std::num::NonZeroU16;
use std::str::FromStr;

use crate::common::TransferError;

/// Identifier of a live session on the relay.
///
/// Valid only until the relay expires the session or a redeem consumes it;
/// the only way to learn which is to redeem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InviteCode(NonZeroU16);

impl InviteCode {
    pub fn new(port: u16) -> Result<Self, TransferError> {
        NonZeroU16::new(port).map(Self).ok_or_else(|| {
            TransferError::MalformedInvite("session number must be between 1 and 65535".into())
        })
    }

    pub fn port(&self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InviteCode {
    type Err = TransferError;

    /// Tolerates surrounding whitespace from copy/paste; everything else
    /// must be decimal digits naming a port in 1-65535.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TransferError::MalformedInvite("empty invite code".into()));
        }
        // u16::from_str would accept a leading '+'
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TransferError::MalformedInvite(format!(
                "not a session number: '{trimmed}'"
            )));
        }
        let port: u16 = trimmed.parse().map_err(|_| {
            TransferError::MalformedInvite(format!("session number out of range: {trimmed}"))
        })?;
        Self::new(port)
    }
}
