//! The actor system: name → handle resolution and actor lifecycle.
//!
//! All references between actors are discovered by name through this
//! registry — nobody holds a direct reference to another actor's
//! state. The registry itself is a lock-free concurrent map of
//! cheap-clone handles, so resolution never serializes sessions.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hive_protocol::payload::DIRECTORY_KEY;
use hive_protocol::{NodeType, Payload};
use tracing::debug;

use crate::actor::{spawn_value_actor, ActorHandle};
use crate::directory;
use crate::value::ValueState;

/// Process-wide actor registry. Create once at startup, share as
/// `Arc<System>`; cloning the inner handles is cheap.
pub struct System {
    actors: DashMap<String, ActorHandle>,
    directory: ActorHandle,
}

impl System {
    /// Builds a system with the key directory spawned and registered
    /// under its well-known name.
    pub fn new() -> Arc<System> {
        Arc::new_cyclic(|weak| {
            let directory = directory::spawn_directory(weak.clone());
            let actors = DashMap::new();
            actors.insert(DIRECTORY_KEY.to_owned(), directory.clone());
            System { actors, directory }
        })
    }

    /// Looks up the live actor registered under `key`.
    pub fn resolve(&self, key: &str) -> Option<ActorHandle> {
        self.actors.get(key).map(|entry| entry.value().clone())
    }

    /// The key directory's handle.
    pub fn directory(&self) -> ActorHandle {
        self.directory.clone()
    }

    /// Resolves the actor for `key`, creating a fresh one of the given
    /// type when none exists. Creation is atomic per key — concurrent
    /// callers all receive the same actor — and registers the key with
    /// the directory concurrently with the first command delivery.
    ///
    /// Returns `None` when `node_type` is not a value type.
    pub async fn resolve_or_create(
        self: &Arc<Self>,
        key: &str,
        node_type: NodeType,
    ) -> Option<ActorHandle> {
        if let Some(handle) = self.resolve(key) {
            return Some(handle);
        }
        let state = ValueState::new(node_type)?;

        let (handle, created) = match self.actors.entry(key.to_owned()) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => {
                let handle = spawn_value_actor(key.to_owned(), state, Arc::clone(self));
                entry.insert(handle.clone());
                (handle, true)
            }
        };

        if created {
            debug!(key, kind = node_type.name(), "created value actor");
            self.directory
                .tell(Payload::internal("add", DIRECTORY_KEY, vec![key.to_owned()]))
                .await;
        }
        Some(handle)
    }

    /// Removes the actor registered under `key` and raises its stop
    /// signal. Anything still queued in its mailbox is discarded.
    pub fn stop(&self, key: &str) -> bool {
        match self.actors.remove(key) {
            Some((_, handle)) => {
                handle.stop();
                true
            }
            None => false,
        }
    }
}
