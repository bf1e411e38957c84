//! Per-connection client session.
//!
//! Reads newline-delimited commands from a TCP stream, routes each
//! payload to the owning actor (creating it on demand), and writes
//! replies back. Supports pipelining by draining every complete line
//! in the buffer before the next read, batching all replies into a
//! single write.
//!
//! The session is also the orchestrator for the client-owned
//! multi-key commands (`mget`, `mset`, `msetnx`) — cross-key work the
//! key-owning actors cannot do safely themselves.

use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use hive_core::{ActorHandle, System};
use hive_protocol::payload::DIRECTORY_KEY;
use hive_protocol::{registry, NodeType, Payload, Reply};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Initial read buffer capacity. Commands are short lines; 4KB is
/// comfortable without over-allocating per connection.
const BUF_CAPACITY: usize = 4096;

/// Maximum buffered bytes before we disconnect the client. Prevents a
/// client that never sends a newline from consuming unbounded memory.
const MAX_BUF_SIZE: usize = 1024 * 1024;

/// Ask timeout for session → actor requests. Generous compared to the
/// 2s actor fan-out timeout so inner timeouts surface first.
const SESSION_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives one client connection to completion. Returns when the peer
/// closes the socket; every in-command error becomes that command's
/// reply, never a connection fault.
pub async fn handle(mut stream: TcpStream, system: Arc<System>) -> std::io::Result<()> {
    let mut buf = BytesMut::with_capacity(BUF_CAPACITY);
    let mut out = BytesMut::with_capacity(BUF_CAPACITY);

    loop {
        // drain every complete line the buffer holds, batching the
        // replies into a single write
        out.clear();
        while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            let line = buf.split_to(pos + 1);
            let line = String::from_utf8_lossy(&line[..pos]);
            let Some(payload) = Payload::parse(&line) else {
                continue; // blank line
            };
            let reply = route(payload, &system).await;
            out.extend_from_slice(reply.render().as_bytes());
            out.extend_from_slice(b"\n");
        }
        if !out.is_empty() {
            stream.write_all(&out).await?;
        }

        // a partial line may never complete; cap what we retain
        if buf.len() > MAX_BUF_SIZE {
            stream.write_all(b"line too long\n").await?;
            return Ok(());
        }

        // 0 bytes read means the peer closed cleanly
        if stream.read_buf(&mut buf).await? == 0 {
            return Ok(());
        }
    }
}

/// Routes one payload: protocol errors first, then the client-owned
/// commands, then the single-key handle path. Key commands need no
/// special case — the parser already pointed them at the directory's
/// well-known name, which always resolves.
async fn route(payload: Payload, system: &Arc<System>) -> Reply {
    let Some(node_type) = payload.node_type else {
        return Reply::Error("Unknown command".to_owned());
    };
    if payload.is_client_command() {
        return client_command(payload, system).await;
    }
    if payload.key.is_empty() {
        return Reply::Error("Too few parameters".to_owned());
    }
    handle_key(payload, node_type, system).await
}

/// The single-key handle path: resolve, enforce the existence
/// preconditions, create on demand, dispatch.
async fn handle_key(payload: Payload, node_type: NodeType, system: &Arc<System>) -> Reply {
    match system.resolve(&payload.key) {
        Some(handle) => {
            // conditional-create commands never touch an existing actor
            if registry::cant_exist(&payload.command) {
                return Reply::Int(0);
            }
            ask(&handle, payload).await
        }
        None => {
            // must-exist commands never materialize an actor
            if registry::must_exist(&payload.command) {
                return Reply::Int(0);
            }
            match system.resolve_or_create(&payload.key, node_type).await {
                Some(handle) => ask(&handle, payload).await,
                None => Reply::Error("Unknown command".to_owned()),
            }
        }
    }
}

async fn ask(handle: &ActorHandle, payload: Payload) -> Reply {
    match handle.ask(payload, SESSION_TIMEOUT).await {
        Ok(reply) => reply,
        Err(e) => Reply::Error(e.to_string()),
    }
}

/// Executes a client-owned multi-key command. These are sequences of
/// independent per-key operations: atomic within each participating
/// actor, not across them.
async fn client_command(payload: Payload, system: &Arc<System>) -> Reply {
    match payload.command.as_str() {
        "mget" => mget(&payload.args, system).await,
        "mset" => {
            if let Err(reply) = write_pairs(&payload.args, system).await {
                return reply;
            }
            Reply::ok()
        }
        "msetnx" => msetnx(&payload.args, system).await,
        _ => Reply::Error("Unknown command".to_owned()),
    }
}

/// Fans out `get` to each named key, collecting replies in request
/// order. A key with no live actor contributes `None` — reads never
/// materialize actors here.
async fn mget(keys: &[String], system: &Arc<System>) -> Reply {
    if keys.is_empty() {
        return Reply::Error("Too few parameters".to_owned());
    }
    let mut results = Vec::with_capacity(keys.len());
    for key in keys {
        match system.resolve(key) {
            None => results.push(Reply::None),
            Some(handle) => {
                let reply = ask(&handle, Payload::internal("get", key, vec![])).await;
                results.push(reply);
            }
        }
    }
    Reply::List(results)
}

/// Fires `set` at each (key, value) pair, creating string actors on
/// demand. The sends are not awaited for replies — each destination
/// serializes its own inbox, so the writes land in order.
async fn write_pairs(args: &[String], system: &Arc<System>) -> Result<(), Reply> {
    if args.is_empty() || args.len() % 2 != 0 {
        return Err(Reply::Error("Too few parameters".to_owned()));
    }
    for pair in args.chunks_exact(2) {
        if let Some(handle) = system.resolve_or_create(&pair[0], NodeType::String).await {
            handle
                .tell(Payload::internal("set", &pair[0], vec![pair[1].clone()]))
                .await;
        }
    }
    Ok(())
}

/// `mset` guarded on existence: proceeds only when none of the listed
/// keys exist. Each key is checked individually against the directory,
/// since a single multi-key `exists` answers "all live", which cannot
/// distinguish "none exist" from "some exist".
async fn msetnx(args: &[String], system: &Arc<System>) -> Reply {
    if args.is_empty() || args.len() % 2 != 0 {
        return Reply::Error("Too few parameters".to_owned());
    }
    let directory = system.directory();
    for pair in args.chunks_exact(2) {
        let query = Payload::internal("exists", DIRECTORY_KEY, vec![pair[0].clone()]);
        match directory.ask(query, SESSION_TIMEOUT).await {
            Ok(Reply::Int(0)) => {}
            Ok(_) => return Reply::Int(0),
            Err(e) => return Reply::Error(e.to_string()),
        }
    }
    if let Err(reply) = write_pairs(args, system).await {
        return reply;
    }
    Reply::Int(1)
}
