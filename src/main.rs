//! gonitctl - command-line client for the gonit process supervisor
//!
//! Talks to a running gonit daemon over its JSON-RPC socket.

use clap::Parser;
use commands::Commands;
use gonit_client::{cli, commands, common::logging};

#[derive(Parser)]
#[command(name = "gonitctl", about = "Control a running gonit daemon")]
#[command(version, long_about = None)]
struct Cli {
    /// RPC server URL: a socket path, unix:///path or tcp://host:port
    /// (default: ~/.gonit.sock)
    #[arg(short = 's', long = "socket", global = true)]
    socket: Option<String>,

    /// Treat the name as a process group
    #[arg(short = 'g', long, global = true)]
    group: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    let result = match cli::connect(cli.socket) {
        Ok(client) => cli::dispatch(&client, cli.command, cli.group).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
