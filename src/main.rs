use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use linkdrop::common::config::{apply_relay_override, load_config};
use linkdrop::common::FileDescriptor;
use linkdrop::invite::InviteCode;
use linkdrop::logging::init_logging;
use linkdrop::output;
use linkdrop::relay::RelayClient;
use linkdrop::transfer::{save, TransferMachine, TransferState};

#[derive(Parser)]
#[command(name = "linkdrop")]
#[command(about = "Share a file once through a short invite code")]
struct Cli {
    /// More -v, more logs
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Relay service URL (overrides config file and environment)
    #[arg(long, global = true)]
    relay: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a file with the relay and print its invite code
    Send {
        #[arg(help = "Path to file to send")]
        file: PathBuf,
    },
    /// Redeem an invite code and save the file
    Receive {
        #[arg(help = "Invite code shared by the sender")]
        code: String,
        /// Directory to save into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Error: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = apply_relay_override(load_config()?, cli.relay);
    let client = RelayClient::from_settings(&config.relay)?;

    match cli.command {
        Commands::Send { file } => send(client, file).await,
        Commands::Receive { code, output } => receive(client, code, output).await,
    }
}

async fn send(client: RelayClient, file: PathBuf) -> anyhow::Result<()> {
    // Fail fast before spinning anything up
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let descriptor = FileDescriptor::from_path(&file).await?;

    let spinner = output::spinner("Uploading file...");
    let machine = TransferMachine::new();
    machine.drive(client.register(&descriptor)).await;

    match machine.state() {
        TransferState::Succeeded(code) => {
            output::finish_spinner_success(&spinner, &format!("Shared {}", descriptor.name()));
            output::print_invite_code(&code);
            Ok(())
        }
        TransferState::Failed(kind) => {
            output::finish_spinner_error(&spinner, "Upload failed");
            anyhow::bail!(output::describe_failure(kind));
        }
        state => {
            output::finish_spinner_error(&spinner, "Upload failed");
            anyhow::bail!("transfer did not settle: {state:?}");
        }
    }
}

async fn receive(client: RelayClient, code: String, output_dir: PathBuf) -> anyhow::Result<()> {
    // Decode locally first; a typo never reaches the network
    let code: InviteCode = code.parse()?;

    let spinner = output::spinner("Downloading file...");
    let machine = TransferMachine::new();
    machine.drive(client.redeem(code)).await;

    match machine.state() {
        TransferState::Succeeded(result) => {
            let path = save::save_to_dir(&result, &output_dir).await?;
            output::finish_spinner_success(&spinner, &format!("Saved {}", path.display()));
            Ok(())
        }
        TransferState::Failed(kind) => {
            output::finish_spinner_error(&spinner, "Download failed");
            anyhow::bail!(output::describe_failure(kind));
        }
        state => {
            output::finish_spinner_error(&spinner, "Download failed");
            anyhow::bail!("transfer did not settle: {state:?}");
        }
    }
}
