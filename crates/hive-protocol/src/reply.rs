//! Reply values and their wire rendering.
//!
//! Every command produces exactly one [`Reply`]. The wire format is
//! textual: the rendered reply plus a terminal `\n`, with collection
//! elements joined by `\n` first. Errors are plain strings with no
//! sentinel prefix — clients distinguish them by content only.

/// The result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A string value, including status replies like `OK`.
    Simple(String),
    /// An integer, rendered in decimal. Booleans render as `0` / `1`.
    Int(i64),
    /// An absent value (missing hash field, pop from an empty list…).
    /// Renders as the literal string `None`.
    None,
    /// An ordered collection, rendered as elements joined by `\n`.
    List(Vec<Reply>),
    /// A human-readable error. Returned as the command's reply, never
    /// as a connection-level fault.
    Error(String),
}

impl Reply {
    /// The canonical `OK` status reply.
    pub fn ok() -> Reply {
        Reply::Simple("OK".to_owned())
    }

    /// Converts a boolean result to its `0` / `1` wire form.
    pub fn from_bool(b: bool) -> Reply {
        Reply::Int(i64::from(b))
    }

    /// Wraps a list of strings as a collection reply.
    pub fn strings(items: Vec<String>) -> Reply {
        Reply::List(items.into_iter().map(Reply::Simple).collect())
    }

    /// Renders this reply to its wire text, without the terminal `\n`.
    pub fn render(&self) -> String {
        match self {
            Reply::Simple(s) => s.clone(),
            Reply::Int(n) => n.to_string(),
            Reply::None => "None".to_owned(),
            Reply::List(items) => items
                .iter()
                .map(Reply::render)
                .collect::<Vec<_>>()
                .join("\n"),
            Reply::Error(msg) => msg.clone(),
        }
    }

    /// Extracts the elements of a collection reply as plain strings.
    ///
    /// Used by fan-out commands that ask another actor for `smembers`
    /// and fold the result. Non-list replies (and lists holding
    /// anything but simple strings) return `None`.
    pub fn as_string_items(&self) -> Option<Vec<String>> {
        match self {
            Reply::List(items) => items
                .iter()
                .map(|item| match item {
                    Reply::Simple(s) => Some(s.clone()),
                    _ => Option::None,
                })
                .collect(),
            _ => Option::None,
        }
    }
}
