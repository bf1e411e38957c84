//! Payload parsing: one command line → one routable request.
//!
//! The transport hands us a single line with the trailing newline
//! already stripped. Tokenization is plain whitespace splitting —
//! there is no quoting or escaping in this protocol, so a value can
//! never contain a space.

use crate::registry::{self, NodeType};

/// The well-known name the key directory actor is registered under.
/// Key commands (`keys`, `scan`, `del`, …) implicitly target it.
pub const DIRECTORY_KEY: &str = "keys";

/// A parsed command, ready for routing.
///
/// `node_type` is `None` for unknown commands; the parser still
/// produces a payload so the session can report the error itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Command token, folded to lowercase.
    pub command: String,
    /// The node type that owns the command, from the registry.
    pub node_type: Option<NodeType>,
    /// Target key. The directory name for key commands, empty for
    /// client commands and for key-owning commands missing their key.
    pub key: String,
    /// Remaining tokens.
    pub args: Vec<String>,
}

impl Payload {
    /// Parses one command line. Returns `None` for a blank line.
    ///
    /// Key and client commands do not consume a key token: everything
    /// after the command is an argument. For all other commands the
    /// second token is the key.
    pub fn parse(line: &str) -> Option<Payload> {
        let mut tokens = line.split_whitespace();
        let command = tokens.next()?.to_lowercase();
        let node_type = registry::node_type(&command);

        let (key, args) = match node_type {
            Some(NodeType::Key) => (
                DIRECTORY_KEY.to_owned(),
                tokens.map(str::to_owned).collect(),
            ),
            Some(NodeType::Client) | None => {
                (String::new(), tokens.map(str::to_owned).collect())
            }
            Some(_) => (
                tokens.next().map(str::to_owned).unwrap_or_default(),
                tokens.map(str::to_owned).collect(),
            ),
        };

        Some(Payload {
            command,
            node_type,
            key,
            args,
        })
    }

    /// Builds a payload for an actor-to-actor or session-to-actor send,
    /// bypassing the line parser. The command must be a registered one.
    pub fn internal(command: &str, key: &str, args: Vec<String>) -> Payload {
        Payload {
            command: command.to_owned(),
            node_type: registry::node_type(command),
            key: key.to_owned(),
            args,
        }
    }

    /// True if the session executes this command itself (multi-key
    /// orchestration like `mget`).
    pub fn is_client_command(&self) -> bool {
        self.node_type == Some(NodeType::Client)
    }

    /// True if this command targets the key directory.
    pub fn is_key_command(&self) -> bool {
        self.node_type == Some(NodeType::Key)
    }
}
