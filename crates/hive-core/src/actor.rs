//! Value actors: one tokio task per live key.
//!
//! Commands arrive as [`Payload`]s over a bounded mpsc mailbox and
//! replies go back on a per-request oneshot. A stop signal (DEL)
//! bypasses the mailbox entirely — the loop polls it with bias, so
//! messages still queued behind the stop are discarded.
//!
//! Most commands are pure state transitions and go straight to
//! [`ValueState::apply`]. The cross-key commands (`rpoplpush`,
//! `smove`, set algebra) are handled here in the loop instead, where
//! the [`System`] handle is in scope for resolving peer actors.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use hive_protocol::{NodeType, Payload, Reply};
use tokio::sync::{mpsc, oneshot, Notify};
use tracing::debug;

use crate::error::ActorError;
use crate::system::System;
use crate::value::{ListValue, SetValue, ValueState, TOO_FEW, WRONGTYPE_MSG};

/// Mailbox capacity per actor. Deep enough to absorb bursts from a
/// handful of connections without meaningful back-pressure.
pub(crate) const MAILBOX_BUFFER: usize = 64;

/// Ask timeout for actor-to-actor fan-out (set algebra). Shorter than
/// the session timeout so a wedged peer surfaces here first.
const FANOUT_TIMEOUT: Duration = Duration::from_secs(2);

/// A payload bundled with its reply channel. `reply` is `None` for
/// fire-and-forget sends.
#[derive(Debug)]
pub(crate) struct Envelope {
    pub(crate) payload: Payload,
    pub(crate) reply: Option<oneshot::Sender<Reply>>,
}

/// A cloneable handle for sending commands to an actor.
#[derive(Debug, Clone)]
pub struct ActorHandle {
    tx: mpsc::Sender<Envelope>,
    stop: Arc<Notify>,
}

impl ActorHandle {
    /// Sends a payload and waits for the reply under `timeout`.
    pub async fn ask(&self, payload: Payload, timeout: Duration) -> Result<Reply, ActorError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            payload,
            reply: Some(reply_tx),
        };
        self.tx
            .send(envelope)
            .await
            .map_err(|_| ActorError::Stopped)?;
        match tokio::time::timeout(timeout, reply_rx).await {
            Err(_) => Err(ActorError::Timeout),
            Ok(Err(_)) => Err(ActorError::Stopped),
            Ok(Ok(reply)) => Ok(reply),
        }
    }

    /// Sends a payload without waiting for a reply. The send itself is
    /// awaited so that successive tells from one sender reach the
    /// receiver's mailbox in order.
    pub async fn tell(&self, payload: Payload) {
        let envelope = Envelope {
            payload,
            reply: None,
        };
        let _ = self.tx.send(envelope).await;
    }

    /// Raises the out-of-band stop signal. The actor exits before
    /// processing anything still queued in its mailbox.
    pub(crate) fn stop(&self) {
        self.stop.notify_one();
    }
}

/// Creates a handle plus the receiving side of a fresh mailbox.
pub(crate) fn mailbox() -> (ActorHandle, mpsc::Receiver<Envelope>, Arc<Notify>) {
    let (tx, rx) = mpsc::channel(MAILBOX_BUFFER);
    let stop = Arc::new(Notify::new());
    let handle = ActorHandle {
        tx,
        stop: Arc::clone(&stop),
    };
    (handle, rx, stop)
}

/// Spawns a value actor task owning `state` and returns its handle.
pub(crate) fn spawn_value_actor(
    key: String,
    state: ValueState,
    system: Arc<System>,
) -> ActorHandle {
    let (handle, rx, stop) = mailbox();
    tokio::spawn(run_value_actor(key, state, rx, stop, system));
    handle
}

/// The actor's main loop: one message to completion at a time, until
/// the stop signal fires or every handle is gone.
async fn run_value_actor(
    key: String,
    mut state: ValueState,
    mut rx: mpsc::Receiver<Envelope>,
    stop: Arc<Notify>,
    system: Arc<System>,
) {
    loop {
        tokio::select! {
            biased;
            _ = stop.notified() => break,
            envelope = rx.recv() => match envelope {
                Some(envelope) => {
                    let reply = dispatch(&key, &mut state, &envelope.payload, &system).await;
                    if let Some(reply_tx) = envelope.reply {
                        let _ = reply_tx.send(reply);
                    }
                }
                None => break,
            }
        }
    }
    debug!(key, "value actor stopped");
}

/// Verifies the payload targets this actor's type, then executes it.
async fn dispatch(
    key: &str,
    state: &mut ValueState,
    payload: &Payload,
    system: &Arc<System>,
) -> Reply {
    if payload.node_type != Some(state.node_type()) {
        return Reply::Error(WRONGTYPE_MSG.to_owned());
    }
    match state {
        ValueState::List(list) if payload.command == "rpoplpush" => {
            rpoplpush(list, payload, system).await
        }
        ValueState::Set(set) if is_cross_key_set_command(&payload.command) => {
            set_command(key, set, payload, system).await
        }
        _ => state.apply(payload),
    }
}

fn is_cross_key_set_command(command: &str) -> bool {
    matches!(
        command,
        "sdiff" | "sinter" | "sunion" | "sdiffstore" | "sinterstore" | "sunionstore" | "smove"
    )
}

/// Pops this list's tail and forwards it to the destination list with
/// a fire-and-forget `lpush`. The destination is created through the
/// standard path if needed; ordering there is preserved because its
/// mailbox is serial.
async fn rpoplpush(list: &mut ListValue, payload: &Payload, system: &Arc<System>) -> Reply {
    let Some(destination) = payload.args.first() else {
        return Reply::Error(TOO_FEW.to_owned());
    };
    match list.pop_tail() {
        None => Reply::None,
        Some(value) => {
            if let Some(handle) = system.resolve_or_create(destination, NodeType::List).await {
                handle
                    .tell(Payload::internal("lpush", destination, vec![value.clone()]))
                    .await;
            }
            Reply::Simple(value)
        }
    }
}

/// Executes a set command that may reach across keys. Shared with the
/// key directory, which is a set actor under an overlay and inherits
/// the full vocabulary. Falls through to the local set vocabulary for
/// everything else.
pub(crate) async fn set_command(
    key: &str,
    set: &mut SetValue,
    payload: &Payload,
    system: &Arc<System>,
) -> Reply {
    match payload.command.as_str() {
        "sdiff" | "sinter" | "sunion" => {
            let others = match gather_members(key, set, &payload.args, system).await {
                Ok(others) => others,
                Err(reply) => return reply,
            };
            let result = fold(set, &payload.command, &others);
            Reply::strings(result.into_iter().collect())
        }
        "sdiffstore" | "sinterstore" | "sunionstore" => {
            let others = match gather_members(key, set, &payload.args, system).await {
                Ok(others) => others,
                Err(reply) => return reply,
            };
            let base = payload.command.trim_end_matches("store").to_owned();
            let result = fold(set, &base, &others);
            Reply::Int(set.replace(result) as i64)
        }
        "smove" => {
            let (Some(destination), Some(member)) = (payload.args.first(), payload.args.get(1))
            else {
                return Reply::Error(TOO_FEW.to_owned());
            };
            if !set.remove(member) {
                return Reply::Int(0);
            }
            if let Some(handle) = system.resolve_or_create(destination, NodeType::Set).await {
                handle
                    .tell(Payload::internal("sadd", destination, vec![member.clone()]))
                    .await;
            }
            Reply::Int(1)
        }
        _ => set.apply(&payload.command, &payload.args),
    }
}

/// Asks each named key for its members. A key with no live actor
/// contributes the empty set; a reference to this actor's own key is
/// answered from local state, since asking our own mailbox from inside
/// a handler would deadlock until the timeout.
async fn gather_members(
    own_key: &str,
    set: &SetValue,
    names: &[String],
    system: &Arc<System>,
) -> Result<Vec<HashSet<String>>, Reply> {
    let mut others = Vec::with_capacity(names.len());
    for name in names {
        if name == own_key {
            others.push(set.members().clone());
            continue;
        }
        let Some(handle) = system.resolve(name) else {
            others.push(HashSet::new());
            continue;
        };
        match handle
            .ask(Payload::internal("smembers", name, vec![]), FANOUT_TIMEOUT)
            .await
        {
            Ok(reply) => match reply.as_string_items() {
                Some(members) => others.push(members.into_iter().collect()),
                // a wrong-type reply contributes nothing
                None => others.push(HashSet::new()),
            },
            Err(e) => return Err(Reply::Error(e.to_string())),
        }
    }
    Ok(others)
}

/// Folds the gathered member sets against the local set. The fold
/// starts from this actor's own members, which is what makes the
/// non-commutative `sdiff` come out right.
fn fold(set: &SetValue, base_command: &str, others: &[HashSet<String>]) -> HashSet<String> {
    match base_command {
        "sdiff" => set.diff(others),
        "sinter" => set.inter(others),
        _ => set.union(others),
    }
}
