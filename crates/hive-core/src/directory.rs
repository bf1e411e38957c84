//! The key directory: the actor behind the well-known name `keys`.
//!
//! Its state is the authoritative set of live key names — a key is a
//! member exactly while a value actor for it exists. Structurally it
//! is a set actor with a dispatch overlay: the directory-specific
//! commands are handled first and everything else falls through to
//! the ordinary set vocabulary, so the inherited behavior of the
//! source system (a key directory that *is* a set) is preserved by
//! composition instead of inheritance.
//!
//! The directory holds key names only, never actor handles; stop
//! signals for DEL are routed by name through the [`System`].

use std::sync::{Arc, Weak};

use hive_protocol::payload::DIRECTORY_KEY;
use hive_protocol::{NodeType, Payload, Reply};
use tokio::sync::{mpsc, Notify};
use tracing::debug;

use crate::actor::{self, ActorHandle, Envelope};
use crate::scan;
use crate::system::System;
use crate::value::{SetValue, TOO_FEW, WRONGTYPE_MSG};

/// Spawns the directory actor. Takes a weak system reference because
/// the system owns the directory handle — the cycle is broken by
/// upgrading per message.
pub(crate) fn spawn_directory(system: Weak<System>) -> ActorHandle {
    let (handle, rx, stop) = actor::mailbox();
    tokio::spawn(run_directory(rx, stop, system));
    handle
}

async fn run_directory(
    mut rx: mpsc::Receiver<Envelope>,
    stop: Arc<Notify>,
    system: Weak<System>,
) {
    let mut members = SetValue::new();
    loop {
        tokio::select! {
            biased;
            _ = stop.notified() => break,
            envelope = rx.recv() => match envelope {
                Some(envelope) => {
                    let reply = dispatch(&mut members, &envelope.payload, &system).await;
                    if let Some(reply_tx) = envelope.reply {
                        let _ = reply_tx.send(reply);
                    }
                }
                None => break,
            }
        }
    }
    debug!("key directory stopped");
}

/// The overlay dispatch: directory commands first, set vocabulary as
/// the fallback. The directory answers to both the key and the set
/// node type.
async fn dispatch(members: &mut SetValue, payload: &Payload, system: &Weak<System>) -> Reply {
    if !matches!(
        payload.node_type,
        Some(NodeType::Key) | Some(NodeType::Set)
    ) {
        return Reply::Error(WRONGTYPE_MSG.to_owned());
    }

    match payload.command.as_str() {
        "add" => {
            let Some(key) = payload.args.first() else {
                return Reply::Error(TOO_FEW.to_owned());
            };
            Reply::from_bool(members.insert(key.clone()))
        }
        "keys" => Reply::strings(members.iter().cloned().collect()),
        "scan" => scan::scan(members.iter(), &payload.args),
        "exists" => {
            if payload.args.is_empty() {
                return Reply::Error(TOO_FEW.to_owned());
            }
            // 1 only when every queried key is live
            Reply::from_bool(payload.args.iter().all(|key| members.contains(key)))
        }
        "randomkey" => match members.random_member() {
            Some(key) => Reply::Simple(key),
            None => Reply::None,
        },
        "del" => {
            if payload.args.is_empty() {
                return Reply::Error(TOO_FEW.to_owned());
            }
            let system = system.upgrade();
            let mut present = 0;
            for key in &payload.args {
                if members.remove(key) {
                    present += 1;
                    if let Some(ref system) = system {
                        system.stop(key);
                    }
                }
            }
            Reply::Int(present)
        }
        _ => match system.upgrade() {
            Some(system) => {
                actor::set_command(DIRECTORY_KEY, members, payload, &system).await
            }
            None => members.apply(&payload.command, &payload.args),
        },
    }
}
