//! TCP server: binds, accepts, and hands each connection a cheap
//! clone of the system handle.

use std::sync::Arc;

use hive_core::System;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, error, info};

use crate::session;

/// Binds to `host:port` and runs the accept loop until ctrl-c.
///
/// The actor system is created here and lives for the whole process;
/// each connection gets its own session task.
pub async fn run(host: &str, port: u16) -> std::io::Result<()> {
    let system = System::new();
    let listener = TcpListener::bind((host, port)).await?;
    info!("hive listening on {host}:{port}");

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                debug!(%peer, "accepted connection");

                let system = Arc::clone(&system);
                tokio::spawn(async move {
                    match session::handle(stream, system).await {
                        Ok(()) => debug!(%peer, "connection closed"),
                        Err(e) => error!(%peer, "connection error: {e}"),
                    }
                });
            }
            _ = signal::ctrl_c() => {
                info!("received ctrl-c, shutting down");
                return Ok(());
            }
        }
    }
}
