//! Terminal status helpers for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::common::ErrorKind;
use crate::invite::InviteCode;

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn finish_spinner_success(spinner: &ProgressBar, msg: &str) {
    spinner.finish_with_message(format!("{} {}", style("✓").green().bold(), msg));
}

pub fn finish_spinner_error(spinner: &ProgressBar, msg: &str) {
    spinner.finish_with_message(format!("{} {}", style("✗").red().bold(), msg));
}

/// Prints the invite code block shown to the sender.
pub fn print_invite_code(code: &InviteCode) {
    println!();
    println!("  Invite code: {}", style(code).cyan().bold());
    println!("  Share it with the receiver. It works once.");
    println!();
}

/// One user-facing line per failure class; the protocol layer classifies,
/// this is where wording lives.
pub fn describe_failure(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::MalformedInvite => "That invite code is not valid. Check for typos and try again.",
        ErrorKind::UnnamedFile => "The file needs a non-empty name before it can be shared.",
        ErrorKind::Network => "Could not reach the relay. Check your connection and try again.",
        ErrorKind::Rejected => "The relay refused the request. The file may be too large.",
        ErrorKind::SessionNotFound => {
            "No file is waiting behind that invite code. It may have expired or already been collected."
        }
        ErrorKind::Protocol => "The relay sent an unexpected response. Try again in a moment.",
    }
}
