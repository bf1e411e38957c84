//! Value states: the four data types a key actor can hold.
//!
//! Each state is a plain struct with synchronous command handlers
//! operating on owned data — no locking, no I/O. The actor loop owns
//! exactly one state, verifies the payload's node type against it,
//! and hands local commands to [`ValueState::apply`]. Cross-key
//! commands (`rpoplpush`, `smove`, set algebra) are handled by the
//! actor itself, where the system handle is in scope.

use std::collections::{HashMap, HashSet, VecDeque};

use hive_protocol::{NodeType, Payload, Reply};

use crate::scan;

mod hash;
mod list;
mod set;
mod string;

pub use hash::HashValue;
pub use list::ListValue;
pub use set::SetValue;
pub use string::StringValue;

pub const WRONGTYPE_MSG: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

pub(crate) const TOO_FEW: &str = "Too few parameters";
pub(crate) const NOT_IMPLEMENTED: &str = "Not implemented";
pub(crate) const NOT_AN_INTEGER: &str = "value is not an integer or out of range";
pub(crate) const NOT_A_FLOAT: &str = "value is not a valid float";

/// The state held by one value actor. Exactly one variant per key.
#[derive(Debug)]
pub enum ValueState {
    String(StringValue),
    Hash(HashValue),
    List(ListValue),
    Set(SetValue),
}

impl ValueState {
    /// Fresh zero state for a value-owning node type. `Key` and
    /// `Client` are not value types and yield `None`.
    pub fn new(node_type: NodeType) -> Option<ValueState> {
        match node_type {
            NodeType::String => Some(ValueState::String(StringValue::new())),
            NodeType::Hash => Some(ValueState::Hash(HashValue::new())),
            NodeType::List => Some(ValueState::List(ListValue::new())),
            NodeType::Set => Some(ValueState::Set(SetValue::new())),
            NodeType::Key | NodeType::Client => None,
        }
    }

    /// The node type tag this state answers to.
    pub fn node_type(&self) -> NodeType {
        match self {
            ValueState::String(_) => NodeType::String,
            ValueState::Hash(_) => NodeType::Hash,
            ValueState::List(_) => NodeType::List,
            ValueState::Set(_) => NodeType::Set,
        }
    }

    /// Dispatches a single-key command against this state. The caller
    /// has already verified the payload's node type.
    pub fn apply(&mut self, payload: &Payload) -> Reply {
        match self {
            ValueState::String(v) => v.apply(&payload.command, &payload.args),
            ValueState::Hash(v) => v.apply(&payload.command, &payload.args),
            ValueState::List(v) => v.apply(&payload.command, &payload.args),
            ValueState::Set(v) => v.apply(&payload.command, &payload.args),
        }
    }
}

/// Parses an integer argument, mapping failure to the canonical
/// coercion error.
pub(crate) fn parse_int(token: &str) -> Result<i64, Reply> {
    token
        .parse::<i64>()
        .map_err(|_| Reply::Error(NOT_AN_INTEGER.to_owned()))
}

/// Resolves a possibly-negative index against a collection of `len`
/// elements. Negative indices count back from the tail. Returns `None`
/// when the resolved index is out of range.
pub(crate) fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        index + len as i64
    } else {
        index
    };
    if resolved < 0 || resolved >= len as i64 {
        None
    } else {
        Some(resolved as usize)
    }
}

/// Resolves a `[start, end)` slice against `len` elements, clamping
/// out-of-range bounds. Negative bounds count back from the tail.
/// An inverted range collapses to an empty one.
pub(crate) fn clamp_slice(start: i64, end: i64, len: usize) -> (usize, usize) {
    let clamp = |i: i64| -> usize {
        let resolved = if i < 0 { i + len as i64 } else { i };
        resolved.clamp(0, len as i64) as usize
    };
    let s = clamp(start);
    let e = clamp(end);
    (s, e.max(s))
}
