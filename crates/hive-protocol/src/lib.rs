//! hive-protocol: the line-oriented command protocol.
//!
//! Hive speaks a Redis-like vocabulary over a plain text transport:
//! one whitespace-separated command per `\n`-terminated line, one
//! reply per command (collection replies are joined with `\n`).
//!
//! This crate knows nothing about sockets or actors. It provides the
//! command registry (which node type owns each command, plus the
//! must-exist / cannot-exist precondition sets), the [`Payload`]
//! parser that turns a line into a routable request, and the
//! [`Reply`] value that renders back to wire text.
//!
//! # quick start
//!
//! ```
//! use hive_protocol::{registry, NodeType, Payload, Reply};
//!
//! let payload = Payload::parse("SET greeting hello").unwrap();
//! assert_eq!(payload.command, "set");
//! assert_eq!(payload.node_type, Some(NodeType::String));
//! assert_eq!(payload.key, "greeting");
//!
//! assert_eq!(Reply::ok().render(), "OK");
//! ```

pub mod payload;
pub mod registry;
pub mod reply;

pub use payload::Payload;
pub use registry::NodeType;
pub use reply::Reply;
