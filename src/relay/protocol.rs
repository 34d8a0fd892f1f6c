//! Wire types and header parsing for the relay's HTTP contract.

use serde::Deserialize;

/// Successful upload response body: `{"port": 51342}`.
#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub port: u16,
}

/// Pulls the quoted filename out of a `Content-Disposition` value.
///
/// The relay sends `attachment; filename="<name>"`. Anything not matching
/// the quoted pattern (an unquoted or empty filename included) yields `None`
/// and the caller falls back to a default name instead of erroring.
pub fn attachment_filename(value: &str) -> Option<String> {
    let marker = "filename=\"";
    let start = value.find(marker)? + marker.len();
    let rest = &value[start..];
    let end = rest.find('"')?;
    if end == 0 {
        return None;
    }
    Some(rest[..end].to_string())
}
