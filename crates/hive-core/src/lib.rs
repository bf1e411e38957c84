//! hive-core: the per-key actor runtime.
//!
//! Every live key is its own actor: a tokio task owning one value
//! (string, hash, list, or set) and a serial mailbox. Commands against
//! distinct keys run in parallel; commands against one key are
//! processed one at a time, which gives per-key linearizability with
//! no locks anywhere on the data path.
//!
//! The [`System`] is the name registry: it resolves keys to actor
//! handles, creates actors on demand, and routes stop signals. The
//! key directory — itself an actor, registered under the well-known
//! name `keys` — tracks the authoritative set of live keys and serves
//! KEYS / SCAN / EXISTS / DEL.

pub mod actor;
mod directory;
pub mod error;
pub mod scan;
pub mod system;
pub mod value;

pub use actor::ActorHandle;
pub use error::ActorError;
pub use system::System;
pub use value::{ValueState, WRONGTYPE_MSG};
