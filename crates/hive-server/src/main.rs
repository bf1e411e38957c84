//! hive-server: an in-memory key-value server where every key is its
//! own actor. Strings, hashes, lists, and sets over a line-oriented,
//! Redis-like command protocol.

mod server;
mod session;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

/// In-memory key-value server with per-key actor scheduling.
#[derive(Parser)]
#[command(name = "hive-server", version, about)]
struct Args {
    /// Host to bind to.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 9999)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    match server::run(&args.host, args.port).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
