//! The command registry: dispatch metadata for every known command.
//!
//! Each command is owned by exactly one node type. The session uses
//! this table to decide routing before any actor is materialized,
//! which is what lets the must-exist and cannot-exist preconditions
//! run without creating or touching an actor.

/// The six ownership groups a command can belong to.
///
/// The first four are the value-actor types. `Key` commands target the
/// key directory (the well-known actor named `keys`), and `Client`
/// commands are executed by the session itself because they span
/// multiple keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    String,
    Hash,
    List,
    Set,
    Key,
    Client,
}

impl NodeType {
    /// Human-readable type name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeType::String => "string",
            NodeType::Hash => "hash",
            NodeType::List => "list",
            NodeType::Set => "set",
            NodeType::Key => "key",
            NodeType::Client => "client",
        }
    }
}

/// Returns the node type that owns `command`, or `None` for an
/// unknown command. Commands are matched lowercase.
pub fn node_type(command: &str) -> Option<NodeType> {
    use NodeType::*;

    let owner = match command {
        "get" | "set" | "setnx" | "getset" | "append" | "getrange" | "setrange" | "strlen"
        | "incr" | "incrby" | "decr" | "decrby" | "incrbyfloat" | "bitcount" | "setex"
        | "psetex" | "setbit" | "getbit" | "bitpos" => String,

        "hget" | "hset" | "hsetnx" | "hgetall" | "hkeys" | "hvals" | "hdel" | "hexists"
        | "hlen" | "hmget" | "hmset" | "hincrby" | "hincrbyfloat" | "hscan" => Hash,

        "lpush" | "rpush" | "lpushx" | "rpushx" | "lpop" | "rpop" | "lset" | "lindex"
        | "lrem" | "lrange" | "ltrim" | "llen" | "linsert" | "rpoplpush" | "blpop"
        | "brpop" | "brpoplpush" => List,

        "sadd" | "srem" | "scard" | "sismember" | "smembers" | "srandmember" | "spop"
        | "sdiff" | "sinter" | "sunion" | "sdiffstore" | "sinterstore" | "sunionstore"
        | "smove" | "sscan" => Set,

        "add" | "keys" | "scan" | "exists" | "randomkey" | "del" => Key,

        "mget" | "mset" | "msetnx" => Client,

        _ => return None,
    };
    Some(owner)
}

/// Commands that require the key to already exist. The session replies
/// `0` for a missing key instead of creating an actor.
pub fn must_exist(command: &str) -> bool {
    matches!(command, "lpushx" | "rpushx")
}

/// Commands that require the key to NOT exist. The session replies `0`
/// for an existing key instead of forwarding, so the actor never sees
/// a conditional write it would have to reject.
pub fn cant_exist(command: &str) -> bool {
    matches!(command, "setnx")
}
