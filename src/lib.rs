pub mod common;
pub mod invite;
pub mod logging;
pub mod output;
pub mod relay;
pub mod transfer;

// Constants shared between the client and the relay wire contract
pub mod config {
    /// Name used when a download response carries no usable filename.
    pub const FALLBACK_FILENAME: &str = "downloaded-file";
}
